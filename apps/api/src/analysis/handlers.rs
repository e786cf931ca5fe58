//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::analysis::models::{AnalysisReport, ContextualAssessment};
use crate::analysis::prompts::{build_analysis_prompt, build_context_prompt};
use crate::analysis::service::{log_failure, run_analysis};
use crate::analysis::upload::UploadForm;
use crate::errors::AppError;
use crate::state::AppState;

pub const ANALYSIS_FAILED_MESSAGE: &str = "AI analysis failed";
pub const CONTEXT_FAILED_MESSAGE: &str = "Analisis AI gagal diproses. Silakan coba lagi nanti.";

/// POST /api/v1/analyze
///
/// Multipart: `image` (required), `notes` (optional).
/// 200 with the model's report, or 500 `{"error": "AI analysis failed"}`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let mut form = UploadForm::read(multipart.map_err(rejection)?).await?;
    let image = form.take_image()?;
    let prompt = build_analysis_prompt(form.text("notes"));

    match run_analysis::<AnalysisReport>(state.model.as_ref(), &prompt, &image).await {
        Ok(report) => Ok(Json(report).into_response()),
        Err(failure) => {
            log_failure("analyze", &failure);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": ANALYSIS_FAILED_MESSAGE })),
            )
                .into_response())
        }
    }
}

/// POST /api/v1/analyze/context
///
/// Multipart: `image` (required), `context` (required), `contextType` (optional).
/// 200 with the model's assessment, or 500 with a zero-score assessment.
pub async fn handle_analyze_context(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let mut form = UploadForm::read(multipart.map_err(rejection)?).await?;
    let image = form.take_image()?;
    let prompt = build_context_prompt(form.require_text("context")?, form.text("contextType"));

    match run_analysis::<ContextualAssessment>(state.model.as_ref(), &prompt, &image).await {
        Ok(assessment) => Ok(Json(assessment).into_response()),
        Err(failure) => {
            log_failure("analyze_context", &failure);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ContextualAssessment::degraded(CONTEXT_FAILED_MESSAGE)),
            )
                .into_response())
        }
    }
}

fn rejection(e: MultipartRejection) -> AppError {
    AppError::Validation(format!("Expected a multipart/form-data body: {}", e.body_text()))
}
