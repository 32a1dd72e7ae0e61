//! Best-effort structured extraction from a raw model completion.
//!
//! Model output is not guaranteed well-formed, so extraction never fails:
//! when no parseable candidate is found the original completion text is
//! returned as-is and the pipeline degrades to plain-text display.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One differential diagnosis with a free-form confidence label
/// (`Low`/`Medium`/`High` in practice).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DifferentialDiagnosis {
    pub diagnosis: String,
    pub confidence: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteSummary {
    pub chief_complaint: String,
    pub history: String,
    pub key_findings: Vec<String>,
    pub differential_diagnoses: Vec<DifferentialDiagnosis>,
    pub recommended_actions: Vec<String>,
    pub red_flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordMetadata {
    pub model: String,
    pub response_time_ms: f64,
    pub confidence_score: f64,
}

/// The fixed-schema clinical summary the model is asked to produce.
///
/// Every field defaults, so a syntactically valid candidate with missing or
/// partial fields still parses; only malformed JSON degrades to raw text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClinicalNoteRecord {
    pub patient_id: String,
    pub timestamp: String,
    pub summary: NoteSummary,
    pub note_formatted: String,
    pub metadata: RecordMetadata,
}

/// Outcome of one extraction attempt. Exactly one variant per submission.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    Structured(ClinicalNoteRecord),
    RawText(String),
}

/// Extract a structured record from a raw completion.
///
/// Candidate search order: a triple-backtick fenced block (optionally tagged
/// `json`), then the greedy span from the first `{` to the last `}`. If no
/// candidate exists or the candidate is not valid JSON for the schema, the
/// original text is returned unchanged.
pub fn extract(raw: &str) -> ExtractionResult {
    let candidate = match fenced_block(raw).or_else(|| brace_span(raw)) {
        Some(candidate) => candidate,
        None => return ExtractionResult::RawText(raw.to_string()),
    };

    match serde_json::from_str::<ClinicalNoteRecord>(candidate) {
        Ok(record) => ExtractionResult::Structured(record),
        Err(e) => {
            debug!(error = %e, "Completion candidate is not schema JSON, degrading to raw text");
            ExtractionResult::RawText(raw.to_string())
        }
    }
}

/// Inner content of the first ``` fenced block, if the fence is closed.
fn fenced_block(raw: &str) -> Option<&str> {
    let open = raw.find("```")?;
    let mut body = &raw[open + 3..];
    if let Some(stripped) = body.strip_prefix("json") {
        body = stripped;
    }
    let close = body.find("```")?;
    Some(body[..close].trim())
}

/// Greedy first-`{`-to-last-`}` span.
fn brace_span(raw: &str) -> Option<&str> {
    let first = raw.find('{')?;
    let last = raw.rfind('}')?;
    if last > first {
        Some(&raw[first..=last])
    } else {
        None
    }
}
