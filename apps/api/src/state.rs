use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionClient;
use crate::render::PdfLayout;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only: nothing here changes between requests.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. Default: LlmClient. Tests swap in a stub.
    pub llm: Arc<dyn CompletionClient>,
    pub config: Config,
    /// Page geometry for the PDF export: A4, Courier 10pt, 6 mm lines.
    pub pdf_layout: PdfLayout,
}
