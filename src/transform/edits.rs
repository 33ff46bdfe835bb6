//! Edit list recorded while walking the source and applied in one pass.

use super::error::StripError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) replacement: String,
}

#[derive(Debug, Default)]
pub(crate) struct Edits {
    list: Vec<Edit>,
}

impl Edits {
    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    /// Drop every edit recorded after the first `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.list.truncate(len);
    }

    /// Whether any edit touches `start..end`.
    pub(crate) fn any_within(&self, start: usize, end: usize) -> bool {
        self.list.iter().any(|e| e.start >= start && e.end <= end)
    }

    pub(crate) fn remove(&mut self, start: usize, end: usize) {
        if start < end {
            self.replace(start, end, String::new());
        }
    }

    /// Replace `start..end`, superseding edits already recorded inside it.
    pub(crate) fn replace(&mut self, start: usize, end: usize, replacement: String) {
        self.list.retain(|e| !(e.start >= start && e.end <= end));
        self.list.push(Edit {
            start,
            end,
            replacement,
        });
    }

    /// Remove a whole statement. When the statement is alone on its lines the
    /// lines go too, so type-only declarations leave no blank gap behind.
    pub(crate) fn remove_statement(&mut self, source: &str, start: usize, end: usize) {
        let (start, end) = statement_lines(source, start, end);
        self.remove(start, end);
    }

    /// Replace a whole statement, keeping surrounding text intact.
    pub(crate) fn replace_statement(&mut self, start: usize, end: usize, replacement: String) {
        self.replace(start, end, replacement);
    }

    /// Apply the edits to `source`.
    pub(crate) fn apply(mut self, source: &str) -> Result<String, StripError> {
        self.list.sort_by_key(|e| (e.start, e.end));

        let mut out = String::with_capacity(source.len());
        let mut cursor = 0;
        for edit in &self.list {
            if edit.start < cursor {
                return Err(StripError::OverlappingEdits {
                    pos: edit.start,
                });
            }
            let (Some(kept), true) = (source.get(cursor..edit.start), edit.end <= source.len())
            else {
                return Err(StripError::OverlappingEdits {
                    pos: edit.start,
                });
            };
            out.push_str(kept);
            out.push_str(&edit.replacement);
            cursor = edit.end;
        }
        out.push_str(source.get(cursor..).unwrap_or_default());
        Ok(out)
    }
}

fn statement_lines(source: &str, start: usize, end: usize) -> (usize, usize) {
    let bytes = source.as_bytes();
    let Some(before) = source.get(..start) else {
        return (start, end);
    };
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    if !before[line_start..].trim().is_empty() {
        return (start, end);
    }

    let mut after = end;
    while matches!(bytes.get(after), Some(b' ' | b'\t' | b'\r')) {
        after += 1;
    }
    match bytes.get(after) {
        Some(b'\n') => (line_start, after + 1),
        None => (line_start, after),
        Some(_) => (start, end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sorted() {
        let mut edits = Edits::default();
        edits.remove(5, 13);
        edits.replace(0, 3, "const".to_string());
        assert_eq!(edits.apply("let x: number = 1").unwrap(), "const x = 1");
    }

    #[test]
    fn test_overlap_is_error() {
        let mut edits = Edits::default();
        edits.remove(0, 4);
        edits.remove(2, 6);
        assert!(edits.apply("abcdefgh").is_err());
    }

    #[test]
    fn test_enclosing_edit_supersedes() {
        let mut edits = Edits::default();
        edits.remove(2, 4);
        edits.remove(0, 6);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits.apply("abcdefgh").unwrap(), "gh");
    }

    #[test]
    fn test_statement_removal_takes_line() {
        let source = "a;\n  type T = 1;\nb;\n";
        let start = source.find("type").unwrap();
        let end = source.find("1;").unwrap() + 2;
        let mut edits = Edits::default();
        edits.remove_statement(source, start, end);
        assert_eq!(edits.apply(source).unwrap(), "a;\nb;\n");
    }

    #[test]
    fn test_statement_removal_shares_line() {
        let source = "a; type T = 1; b;";
        let start = source.find("type").unwrap();
        let end = source.find("1;").unwrap() + 2;
        let mut edits = Edits::default();
        edits.remove_statement(source, start, end);
        assert_eq!(edits.apply(source).unwrap(), "a;  b;");
    }
}
