pub mod file;
pub mod subsystems;

use serde::{Serialize, Deserialize};
use std::fmt;
use std::path::Path;
use std::fs;
use crate::error::Result;
use log::{warn, trace};

pub trait FromIni {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>>;
}

/// A config line that was skipped while parsing, leaving the default in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    InvalidValue { line: usize, key: String, value: String, reason: String },
    UnknownKey { line: usize, section: String, key: String },
    MalformedLine { line: usize, text: String },
}

impl ConfigIssue {
    pub fn line(&self) -> usize {
        match self {
            Self::InvalidValue { line, .. }
            | Self::UnknownKey { line, .. }
            | Self::MalformedLine { line, .. } => *line,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Self::InvalidValue { key, .. } | Self::UnknownKey { key, .. } => Some(key),
            Self::MalformedLine { .. } => None,
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { line, key, value, reason } => {
                write!(f, "line {}: error processing config key {}={}: {}", line, key, value, reason)
            },
            Self::UnknownKey { line, section, key } => {
                write!(f, "line {}: unrecognized config key {} in section [{}]", line, key, section)
            },
            Self::MalformedLine { line, text } => {
                write!(f, "line {}: ignoring malformed config line: {}", line, text)
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NazirConfig {
    // File paths
    pub files: file::FileConfig,

    // Subsystem configs
    pub matcher: subsystems::MatcherConfig,
    pub processor: subsystems::ProcessorConfig,
}

impl NazirConfig {
    pub fn validate(&self) -> Result<()> {
        self.files.validate()?;
        self.matcher.validate()?;
        self.processor.validate()?;
        Ok(())
    }

    /// Reads, parses and validates an INI file. Skipped lines are logged at
    /// warn level, so a logger should be installed before calling this.
    pub fn from_ini<P: AsRef<Path>>(path: P) -> Result<Self> {
        let absolute_path = std::fs::canonicalize(&path)
            .unwrap_or_else(|_| path.as_ref().to_path_buf());

        trace!("Loading configuration from: {:?}", absolute_path);

        let content = fs::read_to_string(&path)?;
        let config = Self::from_ini_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses INI content without validating it. Bad values are logged and
    /// leave the default in place.
    pub fn from_ini_str(content: &str) -> Result<Self> {
        let (config, issues) = Self::parse_ini_str(content);
        for issue in &issues {
            warn!("{}", issue);
        }
        Ok(config)
    }

    /// Parses INI content, returning every line that could not be applied.
    pub fn parse_ini_str(content: &str) -> (Self, Vec<ConfigIssue>) {
        let mut config = Self::default();
        let mut issues = Vec::new();
        let mut current_section = String::new();

        for (line_num, line) in content.lines().enumerate() {
            let line_num = line_num + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_section = line[1..line.len()-1].trim().to_string();
                trace!("  Line {}: Found section: [{}]", line_num, current_section);
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                // Delegate to appropriate subsystem config
                let handled = match current_section.as_str() {
                    "file" => config.files.from_ini_section(&current_section, key, value),
                    "processor" => config.processor.from_ini_section(&current_section, key, value),
                    s if s == "matcher" || s.starts_with("matcher.") => {
                        config.matcher.from_ini_section(&current_section, key, value)
                    },
                    _ => None,
                };

                match handled {
                    Some(Err(e)) => issues.push(ConfigIssue::InvalidValue {
                        line: line_num,
                        key: key.to_string(),
                        value: value.to_string(),
                        reason: e.to_string(),
                    }),
                    Some(Ok(())) => {},
                    None => issues.push(ConfigIssue::UnknownKey {
                        line: line_num,
                        section: current_section.clone(),
                        key: key.to_string(),
                    }),
                }
            } else {
                issues.push(ConfigIssue::MalformedLine { line: line_num, text: line.to_string() });
            }
        }

        (config, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_are_delegated() {
        let content = "\
# search settings
[matcher]
max_candidates = 5
candidate_threshold = 0.5

[matcher.scoring]
match_score = 4
delete_score = -2

[processor]
thread_count = 2
log_level = debug

[file]
output_file = \"out/matches.jsonl\"
";
        let config = NazirConfig::from_ini_str(content).unwrap();
        assert_eq!(config.matcher.max_candidates, 5);
        assert!((config.matcher.candidate_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.matcher.scoring.match_score, 4);
        assert_eq!(config.matcher.scoring.delete_score, -2);
        assert_eq!(config.matcher.scoring.insert_score, -4);
        assert_eq!(config.processor.thread_count, 2);
        assert_eq!(
            config.files.output_file.as_deref(),
            Some(Path::new("out/matches.jsonl"))
        );
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let content = "[matcher]\nmax_candidates = many\n[unknown]\nfoo = bar\n";
        let config = NazirConfig::from_ini_str(content).unwrap();
        assert_eq!(config.matcher.max_candidates, 10);
    }

    #[test]
    fn test_skipped_lines_are_reported() {
        let content = "\
[matcher]
max_candidates = many
candidate_thresold = 0.5
candidate_threshold = 0.7
not a setting
[unknown]
foo = bar
";
        let (config, issues) = NazirConfig::parse_ini_str(content);
        assert_eq!(config.matcher.max_candidates, 10);
        assert!((config.matcher.candidate_threshold - 0.7).abs() < f64::EPSILON);

        assert_eq!(issues.len(), 4);
        assert!(matches!(&issues[0], ConfigIssue::InvalidValue { line: 2, key, .. } if key == "max_candidates"));
        assert_eq!(issues[1], ConfigIssue::UnknownKey {
            line: 3,
            section: "matcher".to_string(),
            key: "candidate_thresold".to_string(),
        });
        assert_eq!(issues[2].line(), 5);
        assert_eq!(issues[2].key(), None);
        assert_eq!(issues[3].key(), Some("foo"));
        assert!(issues[0].to_string().contains("max_candidates=many"));
        assert!(issues[1].to_string().contains("[matcher]"));
    }

    #[test]
    fn test_clean_config_has_no_issues() {
        let (_, issues) = NazirConfig::parse_ini_str("[matcher]\nmax_candidates = 4\n");
        assert!(issues.is_empty());
    }
}
