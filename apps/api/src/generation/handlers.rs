//! Axum route handlers for the Generation API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::generation::form::collect_form;
use crate::generation::generator::{generate_datasheet, GeneratedDatasheet};
use crate::generation::prompt_builder::build_prompt;
use crate::models::datasheet::{CompletionModel, DatasheetRequest};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PromptPreviewResponse {
    pub prompt: String,
    pub model: CompletionModel,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub datasheet: GeneratedDatasheet,
    /// Whether a logo was attached. The logo itself is re-sent on PDF export.
    pub has_logo: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/datasheets/prompt
///
/// Returns the exact prompt a submission would send, without calling the model.
pub async fn handle_preview_prompt(
    State(state): State<AppState>,
    Json(request): Json<DatasheetRequest>,
) -> Result<Json<PromptPreviewResponse>, AppError> {
    let custom_fields = request.custom_field_set()?;
    Ok(Json(PromptPreviewResponse {
        prompt: build_prompt(&request.spec, &custom_fields),
        model: request.model.unwrap_or(state.config.default_model),
    }))
}

/// POST /api/v1/datasheets/generate
///
/// Multipart form submission → prompt → completion → raw markdown.
pub async fn handle_generate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, AppError> {
    let submission = collect_form(multipart).await?;
    let model = submission.model.unwrap_or(state.config.default_model);

    let datasheet = generate_datasheet(
        state.llm.as_ref(),
        &submission.spec,
        &submission.custom_fields,
        model,
    )
    .await?;

    Ok(Json(GenerateResponse {
        datasheet,
        has_logo: submission.logo.is_some(),
    }))
}
