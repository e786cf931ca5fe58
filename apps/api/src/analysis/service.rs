//! The shared analysis routine behind both endpoints:
//! upstream call → assemble text → extract → advisory shape check.

use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use crate::extraction::validation::ExpectedShape;
use crate::extraction::{extract, ExtractionError};
use crate::llm_client::{ImageInput, LlmError, VisionModel};

const LOG_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum AnalysisFailure {
    #[error("upstream model call failed: {0}")]
    Upstream(#[from] LlmError),

    #[error("upstream model returned no text")]
    UpstreamEmpty,

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Joins upstream text fragments with newlines. No fragments → empty string.
pub fn assemble_text(fragments: &[String]) -> String {
    fragments.join("\n")
}

/// Runs one analysis and returns the extracted JSON untouched.
///
/// Shape violations against `S` are logged, never returned as errors.
pub async fn run_analysis<S: ExpectedShape>(
    model: &dyn VisionModel,
    prompt: &str,
    image: &ImageInput,
) -> Result<Value, AnalysisFailure> {
    let fragments = model.generate(prompt, image).await?;
    let raw = assemble_text(&fragments);

    if raw.trim().is_empty() {
        return Err(AnalysisFailure::UpstreamEmpty);
    }

    let value = extract(&raw)?;

    let violations = S::violations(&value);
    if !violations.is_empty() {
        warn!(
            shape = S::NAME,
            violation_count = violations.len(),
            violations = ?violations,
            "Model output does not match the expected shape"
        );
    }

    Ok(value)
}

/// Logs a failed analysis. Raw model text goes to the log, never to the client.
pub fn log_failure(operation: &str, failure: &AnalysisFailure) {
    match failure {
        AnalysisFailure::Upstream(e) => {
            error!(operation, "Upstream model call failed: {e}");
        }
        AnalysisFailure::UpstreamEmpty => {
            warn!(operation, "Upstream model returned empty text");
        }
        AnalysisFailure::Extraction(e) => {
            warn!(
                operation,
                kind = e.kind().as_str(),
                raw = %preview(e.raw()),
                "Could not extract JSON from model output: {e}"
            );
        }
    }
}

fn preview(raw: &str) -> String {
    let mut chars = raw.chars();
    let head: String = chars.by_ref().take(LOG_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted `VisionModel` for handler and service tests.

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::{ImageInput, LlmError, VisionModel};

    pub enum Reply {
        Fragments(Vec<String>),
        ApiError { status: u16, message: String },
    }

    pub struct ScriptedModel {
        reply: Reply,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub fn fragments(fragments: &[&str]) -> Self {
            Self::new(Reply::Fragments(
                fragments.iter().map(|f| f.to_string()).collect(),
            ))
        }

        pub fn api_error(status: u16, message: &str) -> Self {
            Self::new(Reply::ApiError {
                status,
                message: message.to_string(),
            })
        }

        fn new(reply: Reply) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl VisionModel for ScriptedModel {
        async fn generate(
            &self,
            prompt: &str,
            _image: &ImageInput,
        ) -> Result<Vec<String>, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Reply::Fragments(f) => Ok(f.clone()),
                Reply::ApiError { status, message } => Err(LlmError::Api {
                    status: *status,
                    message: message.clone(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedModel;
    use super::*;
    use crate::analysis::models::{AnalysisReport, ContextualAssessment};
    use crate::extraction::ExtractionErrorKind;
    use bytes::Bytes;
    use serde_json::json;

    fn image() -> ImageInput {
        ImageInput {
            mime_type: "image/jpeg".to_string(),
            bytes: Bytes::from_static(b"jpeg"),
        }
    }

    #[test]
    fn test_assemble_text_joins_with_newline() {
        let fragments = vec!["a".to_string(), "b".to_string()];
        assert_eq!(assemble_text(&fragments), "a\nb");
    }

    #[test]
    fn test_assemble_text_empty_list_is_empty_string() {
        assert_eq!(assemble_text(&[]), "");
    }

    #[tokio::test]
    async fn test_fragments_joined_into_valid_json_pass_through_unchanged() {
        let model = ScriptedModel::fragments(&[
            "{\"suitabilityScore\": 72, ",
            "\"relevanceExplanation\": \"ok\", \"actionableAdvice\": [\"a\",\"b\"], \"specificRisks\": [\"r\"]}",
        ]);
        let value = run_analysis::<ContextualAssessment>(&model, "p", &image())
            .await
            .unwrap();
        assert_eq!(
            value,
            json!({
                "suitabilityScore": 72,
                "relevanceExplanation": "ok",
                "actionableAdvice": ["a", "b"],
                "specificRisks": ["r"]
            })
        );
    }

    #[tokio::test]
    async fn test_nonconformant_shape_is_still_returned() {
        let model = ScriptedModel::fragments(&["{\"unexpected\": true}"]);
        let value = run_analysis::<AnalysisReport>(&model, "p", &image())
            .await
            .unwrap();
        assert_eq!(value, json!({"unexpected": true}));
    }

    #[tokio::test]
    async fn test_no_fragments_is_upstream_empty() {
        let model = ScriptedModel::fragments(&[]);
        let err = run_analysis::<AnalysisReport>(&model, "p", &image())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisFailure::UpstreamEmpty));
    }

    #[tokio::test]
    async fn test_whitespace_only_text_is_upstream_empty() {
        let model = ScriptedModel::fragments(&["  ", ""]);
        let err = run_analysis::<AnalysisReport>(&model, "p", &image())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisFailure::UpstreamEmpty));
    }

    #[tokio::test]
    async fn test_invalid_json_is_typed_parse_error() {
        let model = ScriptedModel::fragments(&["Here you go: {broken json}"]);
        let err = run_analysis::<AnalysisReport>(&model, "p", &image())
            .await
            .unwrap_err();
        match err {
            AnalysisFailure::Extraction(e) => assert_eq!(e.kind(), ExtractionErrorKind::ParseError),
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upstream_error_is_propagated() {
        let model = ScriptedModel::api_error(500, "boom");
        let err = run_analysis::<AnalysisReport>(&model, "p", &image())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisFailure::Upstream(LlmError::Api { status: 500, .. })));
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let long = "x".repeat(LOG_PREVIEW_CHARS + 10);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), LOG_PREVIEW_CHARS + 1);
        assert!(shown.ends_with('…'));
        assert_eq!(preview("short"), "short");
    }
}
