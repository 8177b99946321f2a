//! Half-open byte ranges into template source.

/// A half-open byte range `[start, end)` into a template string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The text covered by this span.
    pub fn slice<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }

    /// Span of the line containing `self.start`, excluding its line break.
    pub fn line_span(&self, source: &str) -> Span {
        let start = source[..self.start].rfind('\n').map_or(0, |i| i + 1);
        let end = source[self.start..]
            .find('\n')
            .map_or(source.len(), |i| self.start + i);
        Span::new(start, end)
    }

    /// 1-based line number of `self.start`.
    pub fn line_number(&self, source: &str) -> usize {
        source[..self.start].matches('\n').count() + 1
    }
}
