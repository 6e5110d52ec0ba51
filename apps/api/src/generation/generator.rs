//! Datasheet Generation — runs one submission through the pipeline.
//!
//! Flow: build_prompt → completion call → GeneratedDatasheet.
//! The completion call is a single attempt unless LLM_MAX_ATTEMPTS raises it;
//! failures surface to the caller as `AppError::Llm`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::generation::prompt_builder::build_prompt;
use crate::generation::prompts::DATASHEET_SYSTEM;
use crate::llm_client::CompletionClient;
use crate::models::datasheet::{CompletionModel, CustomFieldSet, ProductSpec};

/// The rendered result of one generation request.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDatasheet {
    /// Raw markdown exactly as the model returned it.
    pub markdown: String,
    pub model: CompletionModel,
    pub custom_field_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Builds the prompt and asks the completion service for a datasheet.
pub async fn generate_datasheet(
    llm: &dyn CompletionClient,
    spec: &ProductSpec,
    custom_fields: &CustomFieldSet,
    model: CompletionModel,
) -> Result<GeneratedDatasheet, AppError> {
    let prompt = build_prompt(spec, custom_fields);
    info!(
        "Generating datasheet: product='{}', model={}, prompt_chars={}",
        spec.name,
        model,
        prompt.chars().count()
    );

    let markdown = llm
        .complete(DATASHEET_SYSTEM, &prompt, model)
        .await
        .map_err(|e| AppError::Llm(format!("Datasheet generation failed: {e}")))?;

    Ok(GeneratedDatasheet {
        markdown,
        model,
        custom_field_count: custom_fields.len(),
        generated_at: Utc::now(),
    })
}
