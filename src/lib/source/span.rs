use crate::*;
use std::ops::Range;

/// A half-open character range within one source.
#[derive(Clone, Debug, PartialEq)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Span {
        Span { start, end }
    }

    pub fn at_range(source: &Arc<Source>, range: Range<usize>) -> Span {
        Span::new(
            Location::at_offset(source, range.start),
            Location::at_offset(source, range.end),
        )
    }

    /// From the start of this span to the end of the other.
    pub fn through(&self, other: &Span) -> Span {
        Span::new(self.start.clone(), other.end.clone())
    }

    /// Both ends are inclusive, so a token ending where the span ends
    /// is still inside it.
    pub fn contains_location(&self, location: &Location) -> bool {
        self.start.uri == location.uri
            && self.start.offset <= location.offset
            && location.offset <= self.end.offset
    }

    pub fn range(&self) -> Range<usize> {
        self.start.offset..self.end.offset
    }

    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_of_a_call() {
        let source = Source::test("runtime.GOMAXPROCS(512)\n");
        let argument = Span::at_range(&source, 19..22);

        assert_eq!(argument.len(), 3);
        assert_eq!(source.text(&argument), "512");
        assert!(argument.contains_location(&Location::at_offset(&source, 22)));
        assert!(!argument.contains_location(&Location::at_offset(&source, 23)));

        let call = Span::at_range(&source, 0..7).through(&Span::at_range(&source, 22..23));
        assert_eq!(call.range(), 0..23);
        assert_eq!(call.to_string(), "test::1:1");
    }
}
