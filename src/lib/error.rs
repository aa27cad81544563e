use crate::*;

pub type GoInspectResult<T> = Result<T, GoInspectError>;

#[derive(Debug)]
pub enum GoInspectError {
    IO(std::io::Error),
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
}

impl fmt::Display for GoInspectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for GoInspectError {}

impl From<std::io::Error> for GoInspectError {
    fn from(err: std::io::Error) -> Self {
        GoInspectError::IO(err)
    }
}

impl From<serde_yaml::Error> for GoInspectError {
    fn from(err: serde_yaml::Error) -> Self {
        GoInspectError::Yaml(err)
    }
}

impl From<serde_json::Error> for GoInspectError {
    fn from(err: serde_json::Error) -> Self {
        GoInspectError::Json(err)
    }
}
