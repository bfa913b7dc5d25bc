// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Byte spans and line lookup for source units.

/// A byte span in a source unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Span used for nodes that were synthesized rather than parsed.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where each line of a unit begins, for turning offsets into `line:col`.
#[derive(Debug, Clone)]
pub struct LineMap {
    starts: Vec<usize>,
}

impl LineMap {
    pub fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(at, _)| at + 1))
            .collect();
        LineMap { starts }
    }

    /// 1-based `(line, column)` of a byte offset. A newline belongs to the
    /// line it terminates.
    pub fn offset_to_line_col(&self, offset: usize) -> (u32, u32) {
        let line = self.starts.partition_point(|&start| start <= offset).max(1);
        let column = offset - self.starts[line - 1] + 1;
        (line as u32, column as u32)
    }

    /// Text of a 1-based line, without its newline.
    pub fn line_text<'a>(&self, source: &'a str, line: u32) -> Option<&'a str> {
        let index = (line as usize).checked_sub(1)?;
        let start = *self.starts.get(index)?;
        let end = match self.starts.get(index + 1) {
            Some(next) => next - 1,
            None => source.len(),
        };
        source.get(start..end)
    }

    pub fn line_count(&self) -> u32 {
        self.starts.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source() {
        let map = LineMap::new("");
        assert_eq!(map.offset_to_line_col(0), (1, 1));
        assert_eq!(map.line_count(), 1);
        assert_eq!(map.line_text("", 1), Some(""));
    }

    #[test]
    fn lines_of_a_namespace() {
        let src = "namespace A {\n    open B;\n}";
        let map = LineMap::new(src);
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.offset_to_line_col(0), (1, 1));
        assert_eq!(map.offset_to_line_col(18), (2, 5));
        assert_eq!(map.line_text(src, 2), Some("    open B;"));
        assert_eq!(map.line_text(src, 3), Some("}"));
        assert_eq!(map.line_text(src, 4), None);
        assert_eq!(map.line_text(src, 0), None);
    }

    #[test]
    fn newline_ends_its_line() {
        let map = LineMap::new("ab\ncd\n");
        assert_eq!(map.offset_to_line_col(2), (1, 3));
        assert_eq!(map.offset_to_line_col(3), (2, 1));
        assert_eq!(map.offset_to_line_col(6), (3, 1));
    }

    #[test]
    fn span_union() {
        let a = Span::new(4, 9);
        let b = Span::new(2, 6);
        assert_eq!(a.to(b), Span::new(2, 9));
        assert_eq!(a.len(), 5);
        assert!(Span::DUMMY.is_empty());
    }
}
