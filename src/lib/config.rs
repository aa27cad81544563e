use crate::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::marker::PhantomData;
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "goinspect.yml";

/// A YAML file that reads as the default value when it doesn't exist.
pub struct ManifestFile<T> {
    file_name: PathBuf,
    phantom: PhantomData<T>,
}

impl<T> ManifestFile<T> {
    pub fn new<P: Into<PathBuf>>(file_name: P) -> ManifestFile<T> {
        ManifestFile {
            file_name: file_name.into(),
            phantom: PhantomData,
        }
    }
}

impl<T> ManifestFile<T>
where
    T: DeserializeOwned + Default,
{
    pub fn load(&self) -> GoInspectResult<T> {
        match File::open(&self.file_name) {
            Ok(file) => Ok(serde_yaml::from_reader(file)?),
            _ => Ok(T::default()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Globs of the files checked when none are given.
    pub include: Vec<String>,

    /// Names of inspections to skip.
    pub disabled: Vec<String>,

    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            include: vec!["**/*.go".into()],
            disabled: vec![],
            log_file: None,
        }
    }
}

impl Config {
    pub fn load() -> GoInspectResult<Config> {
        ManifestFile::new(CONFIG_FILE_NAME).load()
    }

    pub fn is_disabled(&self, inspection: &str) -> bool {
        self.disabled.iter().any(|d| d == inspection)
    }
}
