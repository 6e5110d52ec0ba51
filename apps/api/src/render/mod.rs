// Response Renderer: markdown classification, DOCX conversion and template
// filling, paginated PDF output, and the export download handlers.
// DOCX and PDF building is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod docx;
pub mod handlers;
pub mod layout;
pub mod logo;
pub mod markup;
pub mod pdf;
pub mod template;

pub use layout::PdfLayout;
