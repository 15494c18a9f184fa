//! Analysis Prompt Builder
//!
//! Handlebars-rendered instruction plus the inline document, assembled into
//! one `generateContent` request. There is exactly one template so the
//! reply schema stays stable from call to call.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use docsight_models::{AnalysisRequest, GenerationParameters, InlineData, Part, UploadedDocument};
use docsight_utils::{AnalyzerError, AnalyzerResult, GenerationConfig};
use handlebars::Handlebars;
use serde::Serialize;

const TEMPLATE_NAME: &str = "document_analysis";

const ANALYSIS_TEMPLATE: &str = r#"You are a document analysis engine. Read the attached {{mime_type}} document "{{filename}}" and extract its content.

Return a JSON object with exactly this structure:
{{schema}}

Rules:
{{#each rules}}- {{this}}
{{/each}}"#;

const RESPONSE_SCHEMA: &str = r#"{
  "summary": "2-4 sentence overview of the document",
  "tables": [
    {
      "title": "table title or null",
      "description": "what the table contains or null",
      "headers": ["column name", "..."],
      "rows": [["cell value", "..."]],
      "location": "page or section where the table appears, or null"
    }
  ],
  "artworks": [
    { "title": "...", "artist": "...", "year": "...", "medium": "...", "price": 0.00 }
  ],
  "otherStructuredData": {
    "key_figures": { "values": { "figure name": "value" } },
    "lists": [ { "title": "...", "items": ["..."] } ]
  }
}"#;

const RULES: &[&str] = &[
    "Respond with the JSON object only: no markdown, no code fences, no commentary.",
    "The first character of the response must be { and the last must be }.",
    "Use null for any value that is missing or unreadable.",
    "Strip currency symbols and thousands separators from numeric fields such as prices.",
    "Every row must hold exactly one value per header, in header order.",
    "Use an empty array when the document has no tables, artworks or lists.",
];

#[derive(Serialize)]
struct PromptContext<'a> {
    filename: &'a str,
    mime_type: &'a str,
    schema: &'a str,
    rules: &'a [&'a str],
}

/// Builds the outbound request for one uploaded document.
pub struct PromptBuilder {
    handlebars: Handlebars<'static>,
    generation: GenerationParameters,
}

impl PromptBuilder {
    pub fn new(generation: &GenerationConfig) -> AnalyzerResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars
            .register_template_string(TEMPLATE_NAME, ANALYSIS_TEMPLATE)
            .map_err(|e| AnalyzerError::internal(format!("Invalid prompt template: {}", e)))?;

        Ok(Self {
            handlebars,
            generation: GenerationParameters {
                temperature: generation.temperature,
                top_k: generation.top_k,
                top_p: generation.top_p,
                max_output_tokens: generation.max_output_tokens,
                response_mime_type: generation.response_mime_type.clone(),
            },
        })
    }

    pub fn instruction(&self, document: &UploadedDocument) -> AnalyzerResult<String> {
        let context = PromptContext {
            filename: &document.filename,
            mime_type: &document.mime_type,
            schema: RESPONSE_SCHEMA,
            rules: RULES,
        };

        self.handlebars
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| AnalyzerError::internal(format!("Failed to render prompt: {}", e)))
    }

    pub fn build(&self, document: &UploadedDocument) -> AnalyzerResult<AnalysisRequest> {
        let text = self.instruction(document)?;
        let inline_data = InlineData {
            mime_type: document.mime_type.clone(),
            data: BASE64.encode(&document.data),
        };

        Ok(AnalysisRequest::user_turn(
            vec![Part::Text { text }, Part::InlineData { inline_data }],
            self.generation.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> UploadedDocument {
        UploadedDocument::new("Q3 <report> & notes.pdf", "application/pdf", b"%PDF-1.7".to_vec())
    }

    fn builder() -> PromptBuilder {
        PromptBuilder::new(&GenerationConfig::default()).unwrap()
    }

    #[test]
    fn test_instruction_declares_schema_and_rules() {
        let text = builder().instruction(&document()).unwrap();

        assert!(text.contains("\"otherStructuredData\""));
        assert!(text.contains("\"key_figures\""));
        assert!(text.contains("no markdown"));
        assert!(text.contains("must be { and the last must be }"));
        assert!(text.contains("Use null"));
        assert!(text.contains("Strip currency symbols"));
        assert!(text.contains("Q3 <report> & notes.pdf"));
    }

    #[test]
    fn test_instruction_is_deterministic() {
        let builder = builder();
        assert_eq!(
            builder.instruction(&document()).unwrap(),
            builder.instruction(&document()).unwrap()
        );
    }

    #[test]
    fn test_build_embeds_inline_pdf() {
        let request = builder().build(&document()).unwrap();
        let value = serde_json::to_value(&request).unwrap();
        let parts = &value["contents"][0]["parts"];

        assert_eq!(parts[1]["inlineData"]["mimeType"], "application/pdf");
        assert_eq!(parts[1]["inlineData"]["data"], "JVBERi0xLjc=");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 2048);
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
    }
}
