//! Line scanner: finds `#pragma` annotation lines in shader source.

use std::iter::Enumerate;
use std::str::Lines;

/// The marker that opens an annotation line.
pub const PRAGMA_MARKER: &str = "#pragma";

/// Returns the annotation payload of `line` if its trimmed content starts
/// with the pragma marker, with the marker and surrounding whitespace
/// stripped. `#pragmafoo` is not a pragma line.
fn annotation_of(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix(PRAGMA_MARKER)?;
    match rest.chars().next() {
        None => Some(""),
        Some(c) if c.is_whitespace() => Some(rest.trim()),
        Some(_) => None,
    }
}

/// Lazy iterator over the pragma annotation lines of one source unit.
///
/// Yields `(line_number, annotation_text)` with 1-based line numbers.
/// Non-pragma lines are skipped; malformed annotation payloads are forwarded
/// verbatim for the parser to reject.
#[derive(Debug, Clone)]
pub struct PragmaLines<'a> {
    lines: Enumerate<Lines<'a>>,
}

impl<'a> Iterator for PragmaLines<'a> {
    type Item = (u32, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, line) in self.lines.by_ref() {
            if let Some(text) = annotation_of(line) {
                return Some((idx as u32 + 1, text));
            }
        }
        None
    }
}

/// Scans `source` for pragma annotation lines.
pub fn pragma_lines(source: &str) -> PragmaLines<'_> {
    PragmaLines {
        lines: source.lines().enumerate(),
    }
}

/// Returns `source` with every pragma line removed, so a downstream shader
/// compiler never sees the annotations. All other lines are preserved
/// byte-for-byte, line terminators included.
pub fn strip_pragmas(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for line in source.split_inclusive('\n') {
        if annotation_of(line).is_none() {
            out.push_str(line);
        }
    }
    out
}
