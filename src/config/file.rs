// src/config/file.rs

use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use crate::error::{Error, Result};
use super::FromIni;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    // Reference text the engine is built over
    pub text_file: Option<PathBuf>,
    // One query per line
    pub queries_file: Option<PathBuf>,
    // JSON Lines output, stdout when unset
    pub output_file: Option<PathBuf>,
}

fn optional_path(value: &str) -> Option<PathBuf> {
    let cleaned = value.trim_matches('"');
    if cleaned.is_empty() {
        None
    } else {
        Some(PathBuf::from(cleaned))
    }
}

impl FromIni for FileConfig {
    fn from_ini_section(&mut self, _section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        match key {
            "text_file" => {
                self.text_file = optional_path(value);
                Some(Ok(()))
            },
            "queries_file" => {
                self.queries_file = optional_path(value);
                Some(Ok(()))
            },
            "output_file" => {
                self.output_file = optional_path(value);
                Some(Ok(()))
            },
            _ => None,
        }
    }
}

impl FileConfig {
    pub fn validate(&self) -> Result<()> {
        for path in [&self.text_file, &self.queries_file].into_iter().flatten() {
            if !path.exists() {
                return Err(Error::Config(
                    format!("Input file does not exist: {:?}", path)
                ));
            }
        }
        Ok(())
    }
}
