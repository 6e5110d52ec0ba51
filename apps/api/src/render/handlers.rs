//! Axum route handlers for the export downloads.

use anyhow::{anyhow, Context};
use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::generation::form::{malformed, read_logo};
use crate::models::datasheet::ProductSpec;
use crate::render::docx::{export_docx, DOCX_MIME};
use crate::render::logo::Logo;
use crate::render::pdf::{render_pdf, PDF_MIME};
use crate::state::AppState;

pub const TEXT_MIME: &str = "text/plain; charset=utf-8";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TextExportRequest {
    pub markdown: String,
    #[serde(default)]
    pub product_name: String,
}

#[derive(Debug, Deserialize)]
pub struct DocxExportRequest {
    pub markdown: String,
    #[serde(default)]
    pub spec: ProductSpec,
}

#[derive(Debug, Default)]
struct PdfExportForm {
    markdown: String,
    product_name: String,
    logo: Option<Logo>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/datasheets/export/text
///
/// Returns the model output verbatim as a text download.
pub async fn handle_export_text(
    Json(request): Json<TextExportRequest>,
) -> Result<Response, AppError> {
    require_markdown(&request.markdown)?;
    let filename = attachment_name(&request.product_name, "txt");
    Ok(attachment(request.markdown.into_bytes(), TEXT_MIME, &filename))
}

/// POST /api/v1/datasheets/export/docx
///
/// Fills the configured Word template when it exists, otherwise builds a new
/// document, then appends the converted markdown.
pub async fn handle_export_docx(
    State(state): State<AppState>,
    Json(request): Json<DocxExportRequest>,
) -> Result<Response, AppError> {
    require_markdown(&request.markdown)?;

    let template = match state.config.existing_template() {
        Some(path) => Some(
            tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read template {}", path.display()))?,
        ),
        None => None,
    };
    info!(
        "DOCX export: product='{}', template={}",
        request.spec.name,
        template.is_some()
    );

    let filename = attachment_name(&request.spec.name, "docx");
    let bytes = tokio::task::spawn_blocking(move || {
        export_docx(&request.markdown, &request.spec, template.as_deref())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow!("spawn_blocking failed in DOCX export: {e}")))??;

    Ok(attachment(bytes, DOCX_MIME, &filename))
}

/// POST /api/v1/datasheets/export/pdf
///
/// Multipart: `markdown`, optional `product_name`, optional `logo` (PNG/JPEG).
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut form = PdfExportForm::default();
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "logo" => form.logo = read_logo(field).await?,
            "markdown" => form.markdown = field.text().await.map_err(malformed)?,
            "product_name" => form.product_name = field.text().await.map_err(malformed)?,
            _ => {}
        }
    }
    require_markdown(&form.markdown)?;

    let filename = attachment_name(&form.product_name, "pdf");
    let layout = state.pdf_layout.clone();
    let bytes = tokio::task::spawn_blocking(move || {
        let title = if form.product_name.trim().is_empty() {
            "Datasheet"
        } else {
            form.product_name.trim()
        };
        render_pdf(title, &form.markdown, form.logo.as_ref(), &layout)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow!("spawn_blocking failed in PDF export: {e}")))??;

    Ok(attachment(bytes, PDF_MIME, &filename))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn require_markdown(markdown: &str) -> Result<(), AppError> {
    if markdown.trim().is_empty() {
        return Err(AppError::Validation("markdown cannot be empty".to_string()));
    }
    Ok(())
}

fn attachment(body: Vec<u8>, mime: &str, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// `<slug>.<ext>` from the product name; `datasheet.<ext>` when nothing usable remains.
pub fn attachment_name(product_name: &str, ext: &str) -> String {
    let mut slug = String::new();
    for c in product_name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        format!("datasheet.{ext}")
    } else {
        format!("{slug}.{ext}")
    }
}
