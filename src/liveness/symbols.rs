//! Classification of raw `go tool nm` entries.
//!
//! Linker symbol tables carry many entries that do not correspond to a
//! source declaration. They are sorted out by an ordered rule table; the
//! first rule that matches a name decides what happens to it.

use regex::Regex;

/// What a rule does with a matching symbol name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolAction {
    /// Drop the entry
    Deny,
    /// Strip the matched prefix and keep the remainder as a type name
    TypeDescriptor,
}

/// One row of the classification table
#[derive(Debug, Clone, Copy)]
pub struct SymbolRule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub action: SymbolAction,
}

/// Built-in rules, in evaluation order
pub const RULES: &[SymbolRule] = &[
    SymbolRule {
        // generated algorithms, init tasks, anonymous closures, byte literals
        name: "double-dot",
        matches: |s| s.contains(".."),
        action: SymbolAction::Deny,
    },
    SymbolRule {
        name: "itab",
        matches: |s| s.contains(','),
        action: SymbolAction::Deny,
    },
    SymbolRule {
        name: "float-constant",
        matches: |s| s.starts_with('$'),
        action: SymbolAction::Deny,
    },
    SymbolRule {
        name: "linker-internal",
        matches: |s| s.starts_with("go:"),
        action: SymbolAction::Deny,
    },
    SymbolRule {
        name: "type-descriptor",
        matches: |s| s.starts_with("type:") || s.starts_with("type."),
        action: SymbolAction::TypeDescriptor,
    },
];

/// A parsed `address kind name` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSymbol<'a> {
    pub address: &'a str,
    pub kind: char,
    pub name: &'a str,
}

impl<'a> RawSymbol<'a> {
    /// Parse one nm line. Undefined references carry no address and are
    /// rejected along with anything else that is not a triple.
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        let (address, rest) = line.split_once(char::is_whitespace)?;
        if !address.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let rest = rest.trim_start();
        let (kind, name) = rest.split_once(char::is_whitespace)?;
        let mut kind_chars = kind.chars();
        let kind = kind_chars.next()?;
        if kind_chars.next().is_some() {
            return None;
        }
        let name = name.trim();
        if name.is_empty() || kind == 'U' {
            return None;
        }
        Some(Self {
            address,
            kind,
            name,
        })
    }
}

/// Rule table plus user-supplied deny patterns
#[derive(Debug, Default)]
pub struct SymbolFilter {
    extra_deny: Vec<Regex>,
}

impl SymbolFilter {
    pub fn new(extra_deny: Vec<Regex>) -> Self {
        Self { extra_deny }
    }

    /// Map a raw symbol name to the declaration name it stands for, or
    /// `None` when it is synthetic.
    pub fn classify(&self, raw: &str) -> Option<String> {
        // Type arguments may contain commas and dots of their own.
        let stripped = strip_type_args(raw);
        let mut name = stripped.as_str();
        if let Some(rule) = RULES.iter().find(|r| (r.matches)(name)) {
            match rule.action {
                SymbolAction::Deny => return None,
                SymbolAction::TypeDescriptor => {
                    name = name[5..].trim_start_matches('*');
                    // type:.eq.main.T and friends
                    if name.is_empty() || name.starts_with('.') {
                        return None;
                    }
                }
            }
        }
        if self.extra_deny.iter().any(|re| re.is_match(name)) {
            return None;
        }
        Some(normalize(name))
    }
}

/// Drop every bracketed type-argument list from a symbol name
pub fn strip_type_args(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    for c in name.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ if depth > 0 => {}
            _ => out.push(c),
        }
    }
    out
}

/// Remove type-argument lists and unwrap pointer receivers:
/// `main.(*List[go.shape.int]).Push` becomes `main.List.Push`.
pub fn normalize(name: &str) -> String {
    strip_type_args(name)
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '*'))
        .collect()
}

/// Split a normalized symbol into its package prefix and the dotted
/// remainder. The prefix ends at the first `.` after the last `/`, which
/// is unambiguous because the linker escapes dots in the final path
/// element.
pub fn split_package(name: &str) -> Option<(&str, &str)> {
    let last_slash = name.rfind('/').map(|i| i + 1).unwrap_or(0);
    let dot = name[last_slash..].find('.')? + last_slash;
    Some((&name[..dot], &name[dot + 1..]))
}

/// Escape an import path the way the Go linker names symbols
pub fn path_to_prefix(path: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let last_slash = path.rfind('/');
    let mut out = String::with_capacity(path.len());
    for (i, b) in path.bytes().enumerate() {
        let after_slash = last_slash.map_or(true, |s| i > s);
        if b <= b' ' || (b == b'.' && after_slash) || b == b'%' || b == b'"' || b >= 0x7f {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0xf) as usize] as char);
        } else {
            out.push(b as char);
        }
    }
    out
}
