//! Rule block builders
//!
//! A block runs from its opening tag (consumed by the parser) to the first
//! line ending with the closing tag. Inside it, `Reference`, `Description`
//! and `ResultFormat` directives fill the rule fields and a `<SparqlQuery>`
//! sub-block carries the raw query text.

use crate::model::{InferenceQuery, ValidationQuery};
use crate::scanner::{closes, directive_value, LineScanner};
use crate::ProfileError;
use std::io::{self, BufRead};
use tracing::{debug, error};

pub const QUERY_START_TAG: &str = "<SparqlQuery>";
pub const QUERY_END_TAG: &str = "</SparqlQuery>";

/// Which directives a block accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Validation,
    Inference,
}

#[derive(Debug, Default)]
struct BlockFields {
    reference: Option<String>,
    description: Option<String>,
    result_format: Option<String>,
    query: Option<String>,
}

/// Build a validation rule from the lines up to `end_tag`.
pub fn build_validation_query<R: BufRead>(
    scanner: &mut LineScanner<R>,
    end_tag: &str,
) -> Result<ValidationQuery, ProfileError> {
    let fields = read_block(scanner, end_tag, BlockKind::Validation)?;
    Ok(ValidationQuery::new(
        fields.reference,
        fields.description,
        fields.result_format,
        fields.query,
    ))
}

/// Build an inference rule from the lines up to `end_tag`.
pub fn build_inference_query<R: BufRead>(
    scanner: &mut LineScanner<R>,
    end_tag: &str,
) -> Result<InferenceQuery, ProfileError> {
    let fields = read_block(scanner, end_tag, BlockKind::Inference)?;
    Ok(InferenceQuery::new(fields.reference, fields.description, fields.query))
}

fn read_block<R: BufRead>(
    scanner: &mut LineScanner<R>,
    end_tag: &str,
    kind: BlockKind,
) -> Result<BlockFields, ProfileError> {
    read_fields(scanner, end_tag, kind).map_err(|e| {
        error!("Read failure inside {} block at line {}: {}", end_tag, scanner.line_number(), e);
        ProfileError::InvalidProfile(format!("The profile file could not be interpreted: {}", e))
    })
}

fn read_fields<R: BufRead>(
    scanner: &mut LineScanner<R>,
    end_tag: &str,
    kind: BlockKind,
) -> io::Result<BlockFields> {
    let mut fields = BlockFields::default();

    while let Some(line) = scanner.next_line() {
        let line = line?;

        if closes(&line, end_tag) {
            break;
        }

        if line.starts_with("Reference") {
            fields.reference = Some(directive_value(&line));
        } else if line.starts_with("Description") {
            fields.description = Some(directive_value(&line));
        } else if kind == BlockKind::Validation && line.starts_with("ResultFormat") {
            fields.result_format = Some(directive_value(&line));
        } else if line.starts_with(QUERY_START_TAG) {
            fields.query = Some(read_query(scanner)?);
        } else {
            debug!("Ignoring unrecognized line in {} block: {}", end_tag, line);
        }
    }

    Ok(fields)
}

/// Collect query lines up to `</SparqlQuery>`; blank lines stay, comments go.
fn read_query<R: BufRead>(scanner: &mut LineScanner<R>) -> io::Result<String> {
    let mut query = String::new();

    while let Some(line) = scanner.next_raw_line() {
        let line = line?;

        if closes(&line, QUERY_END_TAG) {
            break;
        }
        if line.starts_with('#') {
            continue;
        }
        query.push_str(&line);
        query.push('\n');
    }

    Ok(query)
}
