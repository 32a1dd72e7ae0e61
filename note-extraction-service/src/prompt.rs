//! Fixed instruction template wrapped around the clinician's note.
//!
//! Building a prompt is pure and total: the note text is embedded verbatim,
//! never sanitized or truncated, and the instruction text never changes
//! between calls.

/// Extraction instructions with the target schema, shown to the model ahead
/// of the note text.
pub const EXTRACTION_INSTRUCTIONS: &str = r#"You are a clinical note formatter.
Given the following doctor note, extract the relevant information in this format:

{
  "patientId": "string",
  "timestamp": "YYYY-MM-DDTHH:MM:SSZ",
  "summary": {
    "chiefComplaint": "Short one-line summary",
    "history": "Concise history of present problem",
    "keyFindings": ["finding1", "finding2"],
    "differentialDiagnoses": [
      {"diagnosis": "Diagnosis A", "confidence": "High"},
      {"diagnosis": "Diagnosis B", "confidence": "Medium"}
    ],
    "recommendedActions": ["Action1", "Action2"],
    "redFlags": ["Flag1", "Flag2"]
  },
  "noteFormatted": "Cleaned-up clinical note text.",
  "metadata": {
    "model": "grok-v1",
    "responseTimeMs": 123,
    "confidenceScore": 0.87
  }
}"#;

/// Instructions plus the raw note, kept separate so each provider variant
/// can arrange them into its own message shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotePrompt {
    pub instructions: String,
    pub note: String,
}

impl NotePrompt {
    /// Single-message form: instructions and note folded into one user
    /// message (Groq variant).
    pub fn combined(&self) -> String {
        format!(
            "{}\n\nHere is the doctor note:\n{}",
            self.instructions, self.note
        )
    }
}

/// Wrap a free-text note in the fixed extraction instructions.
pub fn build_prompt(note: &str) -> NotePrompt {
    NotePrompt {
        instructions: EXTRACTION_INSTRUCTIONS.to_string(),
        note: note.to_string(),
    }
}
