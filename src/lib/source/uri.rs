use std::fmt;
use std::path::PathBuf;

#[derive(PartialEq, Eq, Debug, Clone, Hash)]
pub enum URI {
    #[cfg(test)]
    Test,

    /// Sources that only live in memory, such as
    /// snippets created by the element factory.
    Scratch,
    File(PathBuf),
    Stdin,
}

impl URI {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            URI::File(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for URI {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            #[cfg(test)]
            URI::Test => write!(f, "test:"),

            URI::Scratch => write!(f, "scratch:"),
            URI::File(path) => write!(f, "file://{}", path.display()),
            URI::Stdin => write!(f, "stdin:"),
        }
    }
}
