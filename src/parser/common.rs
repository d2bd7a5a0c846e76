use tree_sitter::Node;

/// Extract text from a node
pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Direct children of a node, comments and punctuation included, with the
/// statement terminators (`\n`, `;`) left out
pub fn children<'a>(node: Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| child.is_named() || !matches!(child.kind(), "\n" | ";" | "\0"))
        .collect()
}

/// First descendant (depth-first, self included) of the given kind
pub fn find_descendant<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    if node.kind() == kind {
        return Some(node);
    }
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find_map(|child| find_descendant(child, kind));
    found
}
