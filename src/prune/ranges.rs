//! Byte ranges of declarations, widened so that nothing a declaration owns
//! outlives it: its documentation comment, comments trailing it on the same
//! line, its statement separator, and the rest of its line.

use super::editor::DeletionRange;
use tree_sitter::Node;

fn is_comment(node: &Node<'_>) -> bool {
    node.kind() == "comment"
}

/// Start of the documentation comment attached to `siblings[i]`, or the
/// node's own start when it has none.
///
/// The doc comment is the run of comments directly above the node with no
/// blank line in between. Comments that open the node's own line belong to
/// it as well. A comment sharing its line with a preceding token
/// trails that token and is never documentation.
pub fn doc_start(siblings: &[Node<'_>], i: usize) -> usize {
    let mut start = siblings[i].start_byte();
    let mut row = siblings[i].start_position().row;

    // Comments opening the declaration's own line, as in `/* c */ func F()`
    let mut first = i;
    while first > 0
        && is_comment(&siblings[first - 1])
        && siblings[first - 1].end_position().row == row
    {
        first -= 1;
    }
    let line_opens_with_comment =
        first == 0 || siblings[first - 1].end_position().row != siblings[first].start_position().row;
    if first < i && line_opens_with_comment {
        start = siblings[first].start_byte();
        row = siblings[first].start_position().row;
    } else {
        first = i;
    }

    for j in (0..first).rev() {
        let comment = siblings[j];
        if !is_comment(&comment) || comment.end_position().row + 1 != row {
            break;
        }
        if j > 0 && siblings[j - 1].end_position().row == comment.start_position().row {
            break;
        }
        start = comment.start_byte();
        row = comment.start_position().row;
    }

    start
}

/// End of `siblings[i]` including comments that follow it on the same line
pub fn trailing_end(siblings: &[Node<'_>], i: usize) -> usize {
    let node = siblings[i];
    let row = node.end_position().row;
    siblings[i + 1..]
        .iter()
        .take_while(|n| is_comment(n) && n.start_position().row == row)
        .last()
        .map(|n| n.end_byte())
        .unwrap_or_else(|| node.end_byte())
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Widen `[start, end)` to whole lines where the declaration stands alone on
/// them, swallowing one `;` separator and, when the declaration sat between
/// two blank lines, one of those blank lines.
pub fn widen(source: &str, start: usize, end: usize) -> DeletionRange {
    let bytes = source.as_bytes();

    let mut s = start;
    while s > 0 && is_blank(bytes[s - 1]) {
        s -= 1;
    }
    let at_line_start = s == 0 || bytes[s - 1] == b'\n';
    if !at_line_start {
        s = start;
    }

    let skip_blanks = |mut e: usize| {
        while e < bytes.len() && is_blank(bytes[e]) {
            e += 1;
        }
        e
    };

    let mut e = skip_blanks(end);
    let mut separated = false;
    if bytes.get(e) == Some(&b';') {
        e = skip_blanks(e + 1);
        separated = true;
    }
    if bytes[e..].starts_with(b"\r\n") {
        e += 2;
    } else if bytes.get(e) == Some(&b'\n') {
        e += 1;
    } else if !separated {
        e = end;
    }

    let blank_before = at_line_start && s >= 2 && bytes[s - 1] == b'\n' && bytes[s - 2] == b'\n';
    if blank_before && e > end && bytes.get(e) == Some(&b'\n') {
        e += 1;
    }

    DeletionRange::new(s, e)
}

/// Full deletion range of `siblings[i]`
pub fn declaration_range(source: &str, siblings: &[Node<'_>], i: usize) -> DeletionRange {
    widen(source, doc_start(siblings, i), trailing_end(siblings, i))
}
