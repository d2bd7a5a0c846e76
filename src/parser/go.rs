use super::common::{find_descendant, node_text};
use crate::error::{Error, Result};
use tree_sitter::{Node, Parser as TsParser, Tree};

/// Go source parser using tree-sitter
pub struct GoParser {
    parser: TsParser,
}

impl GoParser {
    pub fn new() -> Result<Self> {
        let mut parser = TsParser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| Error::Grammar(e.to_string()))?;
        Ok(Self { parser })
    }

    pub fn parse(&mut self, source: &str) -> Result<Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| Error::Grammar("parser returned no tree".to_string()))
    }
}

/// Declared name of a function, method, type spec or type alias
pub fn declared_name<'a>(node: Node<'_>, source: &'a str) -> Option<&'a str> {
    node.child_by_field_name("name")
        .map(|name| node_text(name, source))
}

/// Receiver type of a method with pointer markers and type parameters
/// removed: `func (l *List[T]) Push(...)` gives `List`.
pub fn receiver_type_name<'a>(method: Node<'_>, source: &'a str) -> Option<&'a str> {
    let receiver = method.child_by_field_name("receiver")?;
    let param = find_descendant(receiver, "parameter_declaration")?;
    let ty = param.child_by_field_name("type")?;
    let ident = find_descendant(ty, "type_identifier")?;
    Some(node_text(ident, source))
}
