//! Markdown-to-Document Converter — emits classified lines as Word paragraphs.
//!
//! Headings map to `Heading{level}` styles, bullets to the `ListBullet` style
//! with a single-level bullet numbering, everything else to a plain paragraph.
//! When a template is supplied its attribute table is filled first, any style
//! the converter needs but the template lacks is added, and the converted
//! blocks are appended after the template's existing body.

use std::io::Cursor;

use docx_rs::{
    read_docx, AbstractNumbering, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat,
    Numbering, NumberingId, Paragraph, Run, SpecialIndentType, Start, Style, StyleType,
};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::datasheet::ProductSpec;
use crate::render::markup::{parse_blocks, LineKind, MAX_HEADING_LEVEL};
use crate::render::template::fill_template;

/// Numbering id reserved for bullets. High enough not to collide with the
/// numbering definitions a hand-made template usually carries.
const BULLET_NUMBERING_ID: usize = 901;

/// Heading font sizes in half-points, indexed by level - 1.
const HEADING_SIZES: [usize; MAX_HEADING_LEVEL as usize] = [32, 28, 26, 24, 22, 22];

const BULLET_STYLE: &str = "ListBullet";

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Builds the DOCX bytes for a generated datasheet.
///
/// `template` holds the raw bytes of the external template file when one is
/// configured and present; otherwise the document is built from scratch.
pub fn export_docx(
    markdown: &str,
    spec: &ProductSpec,
    template: Option<&[u8]>,
) -> Result<Vec<u8>, AppError> {
    let blocks = parse_blocks(markdown);

    let docx = match template {
        Some(bytes) => {
            let mut docx = read_docx(bytes).map_err(|e| {
                AppError::UnprocessableEntity(format!("Template document could not be read: {e}"))
            })?;
            let report = fill_template(&mut docx, spec);
            if report.is_empty() {
                info!("Template has no attribute rows to fill");
            } else {
                info!(
                    filled = ?report.filled,
                    removed = ?report.removed,
                    "Filled datasheet template"
                );
            }
            if !report.kept_placeholders.is_empty() {
                warn!(
                    kept = ?report.kept_placeholders,
                    "Template rows kept with placeholder text and no spec value"
                );
            }
            with_converter_styles(docx)
        }
        None => new_document(),
    };

    pack_docx(append_blocks(with_bullet_numbering(docx), &blocks))
}

/// A blank document carrying the heading and bullet styles the converter emits.
pub fn new_document() -> Docx {
    with_converter_styles(Docx::new())
}

/// Adds each converter style whose id `docx` does not define yet.
/// Styles a template already carries are left untouched.
fn with_converter_styles(docx: Docx) -> Docx {
    converter_styles().into_iter().fold(docx, |docx, style| {
        if has_style(&docx, &style.style_id) {
            docx
        } else {
            docx.add_style(style)
        }
    })
}

fn converter_styles() -> Vec<Style> {
    let mut styles: Vec<Style> = HEADING_SIZES
        .iter()
        .enumerate()
        .map(|(i, size)| {
            let level = i + 1;
            Style::new(format!("Heading{level}"), StyleType::Paragraph)
                .name(format!("Heading {level}"))
                .size(*size)
                .bold()
        })
        .collect();
    styles.push(Style::new(BULLET_STYLE, StyleType::Paragraph).name("List Bullet"));
    styles
}

pub fn has_style(docx: &Docx, style_id: &str) -> bool {
    docx.styles.styles.iter().any(|s| s.style_id == style_id)
}

fn with_bullet_numbering(docx: Docx) -> Docx {
    docx.add_abstract_numbering(
        AbstractNumbering::new(BULLET_NUMBERING_ID).add_level(
            Level::new(
                0,
                Start::new(1),
                NumberFormat::new("bullet"),
                LevelText::new("•"),
                LevelJc::new("left"),
            )
            .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None),
        ),
    )
    .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID))
}

/// Appends one paragraph per block, in order.
pub fn append_blocks(docx: Docx, blocks: &[LineKind]) -> Docx {
    blocks
        .iter()
        .filter_map(block_paragraph)
        .fold(docx, |docx, paragraph| docx.add_paragraph(paragraph))
}

fn block_paragraph(block: &LineKind) -> Option<Paragraph> {
    let paragraph = match block {
        LineKind::Heading { level, text } => {
            text_paragraph(text).style(&format!("Heading{level}"))
        }
        LineKind::Bullet { text } => text_paragraph(text)
            .style(BULLET_STYLE)
            .numbering(NumberingId::new(BULLET_NUMBERING_ID), IndentLevel::new(0)),
        LineKind::Paragraph { text } => text_paragraph(text),
        LineKind::Blank => return None,
    };
    Some(paragraph)
}

fn text_paragraph(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

pub fn pack_docx(docx: Docx) -> Result<Vec<u8>, AppError> {
    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| AppError::Document(format!("DOCX packaging failed: {e}")))?;
    Ok(buf.into_inner())
}
