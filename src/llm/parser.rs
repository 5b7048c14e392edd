//! Strict decoding of model output into [`ForecastResult`]
//!
//! The model is asked for a single JSON object, optionally inside a markdown
//! code fence. Anything else is rejected; values are never coerced.

use schemars::{r#gen::SchemaSettings, SchemaGenerator};
use serde_json::Value;
use tracing::debug;

use crate::models::ForecastResult;
use crate::{Result, SidekickError};

/// Render machine-readable output instructions for [`ForecastResult`].
///
/// The JSON Schema is generated inline (no `$ref`s) from the type itself, so
/// the instructions can never drift from what [`ResponseParser`] accepts.
pub fn format_instructions() -> Result<String> {
    let mut settings = SchemaSettings::draft07();
    settings.inline_subschemas = true;
    settings.meta_schema = None;

    let root = SchemaGenerator::new(settings).into_root_schema_for::<ForecastResult>();
    let schema = serde_json::to_string(&root)
        .map_err(|e| SidekickError::config(format!("Failed to render output schema: {e}")))?;

    Ok(format!(
        "You must format your output as a JSON value that adheres to the JSON Schema below.\n\
Your output will be parsed and type-checked against this schema, so every field must be \
present with exactly the type given, and there must be no trailing commas.\n\n\
Here is the JSON Schema your output must adhere to. Include the enclosing markdown codeblock:\n\
```json\n{schema}\n```"
    ))
}

#[derive(Debug, Clone)]
pub struct ResponseParser {
    format_instructions: String,
}

impl ResponseParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            format_instructions: format_instructions()?,
        })
    }

    #[must_use]
    pub fn format_instructions(&self) -> &str {
        &self.format_instructions
    }

    /// Parse raw completion text into a [`ForecastResult`].
    ///
    /// # Errors
    ///
    /// Returns [`SidekickError::SchemaValidation`] when the text is not a JSON
    /// object, or when `location` / `forecast` are missing or not strings.
    pub fn parse(&self, raw: &str) -> Result<ForecastResult> {
        let body = extract_json_block(raw);

        let value: Value = serde_json::from_str(body).map_err(|e| {
            SidekickError::schema_validation(format!("output is not valid JSON ({e}): {raw:?}"))
        })?;

        if !value.is_object() {
            return Err(SidekickError::schema_validation(format!(
                "expected a JSON object, got: {value}"
            )));
        }

        let result: ForecastResult = serde_json::from_value(value)
            .map_err(|e| SidekickError::schema_validation(e.to_string()))?;

        debug!("Parsed structured forecast for {}", result.location);
        Ok(result)
    }
}

/// Inner text of the first markdown code fence, or the trimmed input when
/// there is none.
fn extract_json_block(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };

    let after_fence = &trimmed[start + 3..];
    // Skip an info string such as `json` up to the end of the opening line.
    let content = match after_fence.find('\n') {
        Some(newline) if !after_fence[..newline].contains('{') => &after_fence[newline + 1..],
        _ => after_fence.trim_start_matches("json"),
    };

    match content.find("```") {
        Some(end) => content[..end].trim(),
        None => content.trim(),
    }
}
