//! Paginated Text Renderer — dumps the generated markdown as monospaced lines.
//!
//! No heading styling: every source line is printed verbatim in Courier at a
//! fixed line height. An optional logo sits at the top of the first page.

use printpdf::{
    BuiltinFont, FontId, Layer, Mm, Op, ParsedFont, PdfDocument, PdfPage,
    PdfSaveOptions, Pt, RawImage, RawImageData, RawImageFormat, TextItem, TextMatrix,
    TextRenderingMode, XObjectId, XObjectTransform,
};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::render::layout::{paginate, PdfLayout};
use crate::render::logo::Logo;

pub const PDF_MIME: &str = "application/pdf";

/// Renders `markdown` to PDF bytes.
pub fn render_pdf(
    title: &str,
    markdown: &str,
    logo: Option<&Logo>,
    layout: &PdfLayout,
) -> Result<Vec<u8>, AppError> {
    let reserved_mm = logo.map_or(0.0, |l| layout.logo_block_mm(l.aspect()));
    let pages = paginate(markdown, layout, reserved_mm);

    let mut doc = PdfDocument::new(title);
    let layer_id = doc.add_layer(&Layer::new("Datasheet"));

    let font_bytes = BuiltinFont::Courier.get_subset_font().bytes;
    let font = ParsedFont::from_bytes(&font_bytes, 0, &mut Vec::new())
        .ok_or_else(|| AppError::Document("Failed to parse built-in Courier font".to_string()))?;
    let font_id = doc.add_font(&font);

    let mut logo_op = logo.map(|l| {
        let image_id = doc.add_image(&raw_image(l));
        place_logo(image_id, l, layout)
    });

    for (index, lines) in pages.iter().enumerate() {
        let mut ops = vec![Op::BeginLayer {
            layer_id: layer_id.clone(),
        }];

        let mut top_mm = layout.page_height_mm - layout.margin_mm;
        if index == 0 {
            if let Some(op) = logo_op.take() {
                ops.push(op);
                top_mm -= reserved_mm;
            }
        }

        for (row, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let baseline_mm = top_mm - (row as f32 + 1.0) * layout.line_height_mm;
            ops.extend(text_line_ops(line, baseline_mm, &font_id, layout));
        }

        ops.push(Op::EndLayer {
            layer_id: layer_id.clone(),
        });
        doc.pages.push(PdfPage::new(
            Mm(layout.page_width_mm),
            Mm(layout.page_height_mm),
            ops,
        ));
    }

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        warn!("PDF generation produced {} warnings", warnings.len());
    }
    debug!("Rendered PDF: {} pages, {} bytes", pages.len(), bytes.len());
    Ok(bytes)
}

fn text_line_ops(line: &str, baseline_mm: f32, font_id: &FontId, layout: &PdfLayout) -> Vec<Op> {
    vec![
        Op::StartTextSection,
        Op::SetFontSize {
            size: Pt(layout.font_size_pt),
            font: font_id.clone(),
        },
        Op::SetTextMatrix {
            matrix: TextMatrix::Translate(Mm(layout.margin_mm).into(), Mm(baseline_mm).into()),
        },
        Op::SetTextRenderingMode {
            mode: TextRenderingMode::Fill,
        },
        Op::WriteText {
            items: vec![TextItem::Text(line.to_string())],
            font: font_id.clone(),
        },
        Op::EndTextSection,
    ]
}

fn raw_image(logo: &Logo) -> RawImage {
    RawImage {
        pixels: RawImageData::U8(logo.pixels.as_raw().clone()),
        width: logo.width() as usize,
        height: logo.height() as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    }
}

/// Places the logo at the top-left margin, sized by `PdfLayout::logo_size_mm`.
fn place_logo(image_id: XObjectId, logo: &Logo, layout: &PdfLayout) -> Op {
    let (width_mm, height_mm) = layout.logo_size_mm(logo.aspect());
    // printpdf sizes images by DPI: pixels / dpi = inches on the page.
    let dpi = logo.width() as f32 / (width_mm / 25.4);
    Op::UseXobject {
        id: image_id,
        transform: XObjectTransform {
            translate_x: Some(Mm(layout.margin_mm).into()),
            translate_y: Some(Mm(layout.page_height_mm - layout.margin_mm - height_mm).into()),
            dpi: Some(dpi),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::logo::png_fixture;

    #[test]
    fn test_renders_pdf_header() {
        let bytes = render_pdf(
            "TMP-117",
            "# Overview\n- Low power\nPlain text.",
            None,
            &PdfLayout::default(),
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_paragraph_only_document_renders() {
        let bytes = render_pdf("x", "No headings here.\nNone at all.", None, &PdfLayout::default())
            .unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_empty_markdown_renders_single_page() {
        let bytes = render_pdf("x", "", None, &PdfLayout::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_logo_is_embedded() {
        let logo = Logo::decode(&png_fixture(64, 32)).unwrap();
        let without = render_pdf("x", "Body", None, &PdfLayout::default()).unwrap();
        let with = render_pdf("x", "Body", Some(&logo), &PdfLayout::default()).unwrap();
        assert!(with.len() > without.len());
    }

    #[test]
    fn test_tall_logo_renders_with_text_on_first_page() {
        let logo = Logo::decode(&png_fixture(10, 100)).unwrap();
        let layout = PdfLayout::default();
        let reserved = layout.logo_block_mm(logo.aspect());
        assert!(reserved < layout.page_height_mm - 2.0 * layout.margin_mm);

        let bytes = render_pdf("x", "First line\nSecond line", Some(&logo), &layout).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_document_paginates() {
        let text = (0..120).map(|i| format!("- item {i}")).collect::<Vec<_>>().join("\n");
        let layout = PdfLayout::default();
        let expected_pages = paginate(&text, &layout, 0.0).len();
        assert_eq!(expected_pages, 3);
        let bytes = render_pdf("x", &text, None, &layout).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
