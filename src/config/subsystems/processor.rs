// src/config/subsystems/processor.rs

use serde::{Serialize, Deserialize};
use log::{warn, LevelFilter};
use crate::error::{Error, Result};
use crate::config::FromIni;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    // Worker threads for batch queries, 0 means rayon's default pool
    pub thread_count: usize,

    // Log level
    pub log_level: String,
    #[serde(skip)]
    level_filter: Option<LevelFilter>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            thread_count: 0,
            log_level: "info".to_string(),
            level_filter: Some(LevelFilter::Info),
        }
    }
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().trim_matches('"').to_lowercase().as_str() {
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        "none" | "off" => Some(LevelFilter::Off),
        _ => None,
    }
}

impl FromIni for ProcessorConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "processor" {
            return None;
        }

        match key {
            "thread_count" => {
                match value.parse::<usize>() {
                    Ok(count) => {
                        // Thread count of 0 is valid (means rayon default)
                        let num_cpus = num_cpus::get();
                        if count > num_cpus * 2 {
                            warn!("thread_count {} exceeds twice the available cores ({})", count, num_cpus);
                        }
                        self.thread_count = count;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::Config(
                        format!("Invalid thread_count: {}", value)
                    ))),
                }
            },
            "log_level" => {
                match parse_level(value) {
                    Some(level) => {
                        self.log_level = value.trim_matches('"').to_lowercase();
                        self.level_filter = Some(level);
                        Some(Ok(()))
                    },
                    None => Some(Err(Error::Config(
                        format!("Invalid log_level (error, warn, info, debug, trace, none): {}", value)
                    ))),
                }
            },
            _ => None,
        }
    }
}

impl ProcessorConfig {
    pub fn get_log_level(&self) -> LevelFilter {
        // If we have a cached level, return it
        if let Some(level) = self.level_filter {
            return level;
        }
        parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    /// Threads a batch run will actually use.
    pub fn effective_threads(&self) -> usize {
        if self.thread_count == 0 {
            num_cpus::get()
        } else {
            self.thread_count
        }
    }

    pub fn validate(&self) -> Result<()> {
        if parse_level(&self.log_level).is_none() {
            return Err(Error::Config(
                format!("Invalid log_level: {}", self.log_level)
            ));
        }
        Ok(())
    }
}
