use crate::*;

#[derive(Clone, PartialEq, Debug)]
pub struct Location {
    pub uri: URI,
    pub offset: usize,
    pub line: usize,
    pub character: usize,
}

impl Location {
    pub fn at_offset(source: &Arc<Source>, offset: usize) -> Location {
        let mut line = 1;
        let mut character = 1;
        for c in source.code.chars().take(offset) {
            if c == '\n' {
                line += 1;
                character = 1;
            } else {
                character += 1;
            }
        }
        Location {
            uri: source.uri.clone(),
            offset,
            line,
            character,
        }
    }

    pub fn at_position(source: &Arc<Source>, line: usize, character: usize) -> Location {
        let mut offset = 0;
        let mut current_line = 1;
        let mut chars = source.code.chars();

        while current_line < line {
            match chars.next() {
                None => return Location::at_end_of(source),
                Some('\n') => current_line += 1,
                Some(_) => {}
            }
            offset += 1;
        }

        for _ in 1..character {
            match chars.next() {
                None | Some('\n') => break,
                Some(_) => offset += 1,
            }
        }

        Location::at_offset(source, offset)
    }

    pub fn at_end_of(source: &Arc<Source>) -> Location {
        Location::at_offset(source, source.len())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}:{}", self.uri, self.line, self.character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODE: &str = "package main\n\nfunc main() {\n\truntime.GOMAXPROCS(512)\n}\n";

    fn at(offset: usize) -> (usize, usize) {
        let location = Location::at_offset(&Source::test(CODE), offset);
        (location.line, location.character)
    }

    #[test]
    fn offsets_to_lines_and_characters() {
        assert_eq!(at(0), (1, 1));
        assert_eq!(at(8), (1, 9));
        assert_eq!(at(13), (2, 1));
        assert_eq!(at(14), (3, 1));
        assert_eq!(at(29), (4, 2));
    }

    #[test]
    fn end_of_source() {
        let source = Source::test(CODE);
        let end = Location::at_end_of(&source);
        assert_eq!(end.offset, CODE.chars().count());
        assert_eq!((end.line, end.character), (6, 1));
    }

    #[test]
    fn positions_to_offsets() {
        let source = Source::test(CODE);
        assert_eq!(Location::at_position(&source, 4, 20).offset, 47);
        assert_eq!(Location::at_position(&source, 1, 100).offset, 12);
        assert_eq!(Location::at_position(&source, 9, 1).offset, CODE.len());
    }

    #[test]
    fn display() {
        let location = Location::at_offset(&Source::test(CODE), 29);
        assert_eq!(location.to_string(), "test::4:2");
    }
}
