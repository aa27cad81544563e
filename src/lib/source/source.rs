use crate::*;
use std::io::{self, Read};
use std::path::PathBuf;

pub struct Source {
    pub uri: URI,
    pub code: String,
}

impl Source {
    pub fn new(uri: URI, code: String) -> Arc<Source> {
        Arc::new(Source { uri, code })
    }

    pub fn file(path: PathBuf) -> io::Result<Arc<Source>> {
        let path = path.canonicalize()?;
        Ok(Self::new(
            URI::File(path.clone()),
            std::fs::read_to_string(path)?,
        ))
    }

    pub fn stdin() -> io::Result<Arc<Source>> {
        let mut code = String::new();
        io::stdin().read_to_string(&mut code)?;
        Ok(Self::new(URI::Stdin, code))
    }

    /// Reads every file matching the glob pattern. An invalid pattern
    /// matches nothing, and files that cannot be read are skipped.
    pub fn files<S: AsRef<str>>(pattern: S) -> io::Result<Vec<Arc<Source>>> {
        let paths = match glob::glob(pattern.as_ref()) {
            Ok(paths) => paths,
            Err(err) => {
                warn!("Invalid file pattern {:?}: {}", pattern.as_ref(), err);
                return Ok(vec![]);
            }
        };

        Ok(paths
            .filter_map(Result::ok)
            .filter(|path| path.is_file())
            .filter_map(|path| match Self::file(path.clone()) {
                Ok(source) => Some(source),
                Err(err) => {
                    warn!("Skipping {}: {}", path.display(), err);
                    None
                }
            })
            .collect())
    }

    pub fn scratch(code: &str) -> Arc<Source> {
        Self::new(URI::Scratch, code.into())
    }

    /// A new source with the same URI, where the characters
    /// in the given range have been replaced.
    pub fn splice(&self, range: std::ops::Range<usize>, text: &str) -> Arc<Source> {
        let chars: Vec<char> = self.code.chars().collect();
        let start = range.start.min(chars.len());
        let end = range.end.min(chars.len()).max(start);

        let mut code: String = chars[..start].iter().collect();
        code.push_str(text);
        code.extend(chars[end..].iter());

        Self::new(self.uri.clone(), code)
    }

    /// The source text covered by the span, by character offsets.
    pub fn text(&self, span: &Span) -> String {
        self.code
            .chars()
            .skip(span.start.offset)
            .take(span.len())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.code.chars().count()
    }

    #[cfg(test)]
    pub fn test(code: &str) -> Arc<Source> {
        Self::new(URI::Test, code.into())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.uri)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Source({})", self.uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splicing_replaces_range() {
        let source = Source::test("f(512)");
        let spliced = source.splice(2..5, "256");
        assert_eq!(spliced.code, "f(256)");
        assert_eq!(spliced.uri, source.uri);
    }

    #[test]
    fn splicing_counts_characters() {
        let source = Source::test("å(512)");
        assert_eq!(source.splice(2..5, "1").code, "å(1)");
    }

    #[test]
    fn text_of_span() {
        let source = Source::test("x := 300");
        let span = Span::at_range(&source, 5..8);
        assert_eq!(source.text(&span), "300");
    }

    #[test]
    fn unreadable_files_are_skipped() {
        let dir = std::env::temp_dir().join(format!("goinspect-files-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("main.go"), "package main\n").unwrap();
        std::fs::write(dir.join("binary.go"), [0xffu8, 0xfe, 0x00]).unwrap();

        let sources = Source::files(dir.join("*.go").to_str().unwrap()).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].code, "package main\n");
    }
}
