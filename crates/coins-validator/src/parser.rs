//! Profile DSL parser

use crate::builder::{build_inference_query, build_validation_query};
use crate::model::{InferenceQuery, Profile, ValidationQuery};
use crate::scanner::{directive_value, LineScanner};
use crate::ProfileError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, error};

pub const PROFILE_CHECK_TAG: (&str, &str) = ("<ProfileCheck>", "</ProfileCheck>");
pub const SCHEMA_INFERENCE_TAG: (&str, &str) = ("<SchemaInference>", "</SchemaInference>");
pub const DATA_INFERENCE_TAG: (&str, &str) = ("<DataInference>", "</DataInference>");
pub const VALIDATION_RULE_TAG: (&str, &str) = ("<ValidationRule>", "</ValidationRule>");

/// What to do when the stream fails between blocks.
///
/// A failure inside a rule block is always an invalid-profile error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopLevelIoPolicy {
    /// Log it and keep the profile read so far
    #[default]
    Truncate,
    /// Return the read failure to the caller
    Fail,
}

/// Parser options
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub top_level_io: TopLevelIoPolicy,
}

/// Parsed profile plus the reason parsing stopped early, if it did
#[derive(Debug, Clone)]
pub struct ParseReport {
    pub profile: Profile,
    pub interrupted: Option<String>,
}

impl ParseReport {
    pub fn is_complete(&self) -> bool {
        self.interrupted.is_none()
    }
}

/// Profile parser
#[derive(Debug, Clone, Default)]
pub struct ProfileParser {
    options: ParseOptions,
}

/// Fields collected before the name check
#[derive(Default)]
struct PartialProfile {
    name: Option<String>,
    author: Option<String>,
    rules: Vec<Collected>,
}

enum Collected {
    ProfileCheck(ValidationQuery),
    SchemaInference(InferenceQuery),
    DataInference(InferenceQuery),
    ValidationRule(ValidationQuery),
}

impl ProfileParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn strict() -> Self {
        Self::new(ParseOptions { top_level_io: TopLevelIoPolicy::Fail })
    }

    /// Parse one profile from a byte stream
    pub fn parse<R: Read>(&self, reader: R) -> Result<Profile, ProfileError> {
        self.parse_with_report(reader).map(|report| report.profile)
    }

    /// Parse one profile, reporting a truncated read instead of hiding it
    pub fn parse_with_report<R: Read>(&self, reader: R) -> Result<ParseReport, ProfileError> {
        let mut scanner = LineScanner::new(BufReader::new(reader));
        let mut partial = PartialProfile::default();
        let mut interrupted = None;

        while let Some(line) = scanner.next_line() {
            let line = match line {
                Ok(line) => line,
                Err(e) => match self.options.top_level_io {
                    TopLevelIoPolicy::Fail => return Err(ProfileError::Io(e)),
                    TopLevelIoPolicy::Truncate => {
                        error!("Problem reading profile file at line {}: {}", scanner.line_number() + 1, e);
                        interrupted = Some(e.to_string());
                        break;
                    }
                },
            };

            if line.starts_with("ProfileName") {
                partial.name = Some(directive_value(&line));
            } else if line.starts_with("ProfileAuthor") {
                partial.author = Some(directive_value(&line));
            } else if line.starts_with(PROFILE_CHECK_TAG.0) {
                let rule = build_validation_query(&mut scanner, PROFILE_CHECK_TAG.1)?;
                partial.rules.push(Collected::ProfileCheck(rule));
            } else if line.starts_with(SCHEMA_INFERENCE_TAG.0) {
                let rule = build_inference_query(&mut scanner, SCHEMA_INFERENCE_TAG.1)?;
                partial.rules.push(Collected::SchemaInference(rule));
            } else if line.starts_with(DATA_INFERENCE_TAG.0) {
                let rule = build_inference_query(&mut scanner, DATA_INFERENCE_TAG.1)?;
                partial.rules.push(Collected::DataInference(rule));
            } else if line.starts_with(VALIDATION_RULE_TAG.0) {
                let rule = build_validation_query(&mut scanner, VALIDATION_RULE_TAG.1)?;
                partial.rules.push(Collected::ValidationRule(rule));
            } else {
                debug!("Ignoring top-level line {}: {}", scanner.line_number(), line);
            }
        }

        let profile = partial.finish()?;
        Ok(ParseReport { profile, interrupted })
    }

    /// Parse a profile file from disk
    pub fn parse_path(&self, path: impl AsRef<Path>) -> Result<Profile, ProfileError> {
        let file = File::open(path.as_ref())?;
        self.parse(file)
    }
}

impl PartialProfile {
    fn finish(self) -> Result<Profile, ProfileError> {
        let name = self.name.filter(|name| !name.is_empty()).ok_or_else(|| {
            ProfileError::InvalidProfile("No name specified inside the profile file.".to_string())
        })?;

        let mut profile = Profile::new(name)?;
        if let Some(author) = self.author {
            profile = profile.with_author(author);
        }
        for rule in self.rules {
            profile = match rule {
                Collected::ProfileCheck(rule) => profile.with_profile_check(rule),
                Collected::SchemaInference(rule) => profile.with_schema_inference(rule),
                Collected::DataInference(rule) => profile.with_data_inference(rule),
                Collected::ValidationRule(rule) => profile.with_validation_rule(rule),
            };
        }
        Ok(profile)
    }
}

impl Profile {
    /// Parse with default options
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ProfileError> {
        ProfileParser::default().parse(reader)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        ProfileParser::default().parse_path(path)
    }
}

impl FromStr for Profile {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profile::from_reader(s.as_bytes())
    }
}
