use std::fmt;

/// First point where a report departs from its expectation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// 1-based line number
    pub line: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "first difference at line {}:", self.line)?;
        match &self.expected {
            Some(line) => writeln!(f, "  expected: {}", line)?,
            None => writeln!(f, "  expected: <end of file>")?,
        }
        match &self.actual {
            Some(line) => write!(f, "  actual:   {}", line),
            None => write!(f, "  actual:   <end of file>"),
        }
    }
}

/// Compare a rendered report with the committed expectation
pub fn compare(expected: &str, actual: &str) -> Option<Mismatch> {
    if expected == actual {
        return None;
    }

    let mut want = expected.split('\n');
    let mut got = actual.split('\n');
    let mut line = 1;
    loop {
        match (want.next(), got.next()) {
            (Some(a), Some(b)) if a == b => line += 1,
            (a, b) => {
                return Some(Mismatch {
                    line,
                    expected: a.map(str::to_string),
                    actual: b.map(str::to_string),
                })
            }
        }
    }
}
