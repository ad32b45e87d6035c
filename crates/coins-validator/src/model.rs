//! Profile and rule records

use crate::ProfileError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validation rule: a query whose result decides conformance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationQuery {
    pub reference: Option<String>,
    pub description: Option<String>,
    /// How the query result is read, e.g. `boolean` or a row template
    pub result_format: Option<String>,
    /// Raw SPARQL text; `None` when the rule has no query sub-block
    pub query: Option<String>,
}

/// Inference rule: a query that derives new facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceQuery {
    pub reference: Option<String>,
    pub description: Option<String>,
    pub query: Option<String>,
}

impl ValidationQuery {
    pub fn new(
        reference: Option<String>,
        description: Option<String>,
        result_format: Option<String>,
        query: Option<String>,
    ) -> Self {
        Self { reference, description, result_format, query }
    }

    pub fn has_query(&self) -> bool {
        self.query.is_some()
    }
}

impl InferenceQuery {
    pub fn new(reference: Option<String>, description: Option<String>, query: Option<String>) -> Self {
        Self { reference, description, query }
    }

    pub fn has_query(&self) -> bool {
        self.query.is_some()
    }
}

/// Named bundle of validation and inference rules.
///
/// Each collection keeps the declaration order of the source text.
/// The name is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProfileRecord")]
pub struct Profile {
    name: String,
    author: Option<String>,
    profile_checks: Vec<ValidationQuery>,
    schema_inferences: Vec<InferenceQuery>,
    data_inferences: Vec<InferenceQuery>,
    validation_rules: Vec<ValidationQuery>,
}

/// Unchecked serde image of `Profile`
#[derive(Deserialize)]
struct ProfileRecord {
    name: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    profile_checks: Vec<ValidationQuery>,
    #[serde(default)]
    schema_inferences: Vec<InferenceQuery>,
    #[serde(default)]
    data_inferences: Vec<InferenceQuery>,
    #[serde(default)]
    validation_rules: Vec<ValidationQuery>,
}

impl TryFrom<ProfileRecord> for Profile {
    type Error = ProfileError;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        let mut profile = Profile::new(record.name)?;
        profile.author = record.author;
        profile.profile_checks = record.profile_checks;
        profile.schema_inferences = record.schema_inferences;
        profile.data_inferences = record.data_inferences;
        profile.validation_rules = record.validation_rules;
        Ok(profile)
    }
}

impl Profile {
    /// Empty profile with the given name; an empty name is an invalid profile
    pub fn new(name: impl Into<String>) -> Result<Self, ProfileError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ProfileError::InvalidProfile("Profile name must not be empty".to_string()));
        }
        Ok(Self {
            name,
            author: None,
            profile_checks: Vec::new(),
            schema_inferences: Vec::new(),
            data_inferences: Vec::new(),
            validation_rules: Vec::new(),
        })
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_profile_check(mut self, rule: ValidationQuery) -> Self {
        self.profile_checks.push(rule);
        self
    }

    pub fn with_schema_inference(mut self, rule: InferenceQuery) -> Self {
        self.schema_inferences.push(rule);
        self
    }

    pub fn with_data_inference(mut self, rule: InferenceQuery) -> Self {
        self.data_inferences.push(rule);
        self
    }

    pub fn with_validation_rule(mut self, rule: ValidationQuery) -> Self {
        self.validation_rules.push(rule);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn profile_checks(&self) -> &[ValidationQuery] {
        &self.profile_checks
    }

    pub fn schema_inferences(&self) -> &[InferenceQuery] {
        &self.schema_inferences
    }

    pub fn data_inferences(&self) -> &[InferenceQuery] {
        &self.data_inferences
    }

    pub fn validation_rules(&self) -> &[ValidationQuery] {
        &self.validation_rules
    }

    /// Total number of rules across the four collections
    pub fn rule_count(&self) -> usize {
        self.profile_checks.len()
            + self.schema_inferences.len()
            + self.data_inferences.len()
            + self.validation_rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_count() == 0
    }

    /// Human-readable summary
    pub fn to_simple_string(&self) -> String {
        let mut output = format!("Profile: {}\n", self.name);
        if let Some(author) = &self.author {
            output.push_str(&format!("  Author: {}\n", author));
        }

        output.push_str(&format!("  Profile checks: {}\n", self.profile_checks.len()));
        for rule in &self.profile_checks {
            output.push_str(&format!("    - {}\n", rule));
        }
        output.push_str(&format!("  Schema inferences: {}\n", self.schema_inferences.len()));
        for rule in &self.schema_inferences {
            output.push_str(&format!("    - {}\n", rule));
        }
        output.push_str(&format!("  Data inferences: {}\n", self.data_inferences.len()));
        for rule in &self.data_inferences {
            output.push_str(&format!("    - {}\n", rule));
        }
        output.push_str(&format!("  Validation rules: {}\n", self.validation_rules.len()));
        for rule in &self.validation_rules {
            output.push_str(&format!("    - {}\n", rule));
        }

        output
    }
}

impl fmt::Display for ValidationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.reference.as_deref().unwrap_or("<no reference>"),
            self.description.as_deref().unwrap_or("")
        )?;
        if let Some(format) = &self.result_format {
            write!(f, " [{}]", format)?;
        }
        Ok(())
    }
}

impl fmt::Display for InferenceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.reference.as_deref().unwrap_or("<no reference>"),
            self.description.as_deref().unwrap_or("")
        )
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} rules)", self.name, self.rule_count())
    }
}
