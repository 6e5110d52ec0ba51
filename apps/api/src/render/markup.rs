//! Line classifier for the generated markdown.
//!
//! One prefix test per line, no nesting, no inline markup.
//! Anything the classifier does not recognise (tables, `**bold**`, numbered lists)
//! is kept as literal paragraph text. The conversion is lossy and one-way.

/// Deepest heading level a document style exists for.
pub const MAX_HEADING_LEVEL: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Heading { level: u8, text: String },
    Bullet { text: String },
    Paragraph { text: String },
    Blank,
}

/// Classifies a single line by its first non-whitespace character.
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    match trimmed.chars().next() {
        None => LineKind::Blank,
        Some('#') => {
            let text = trimmed.trim_start_matches('#');
            let hashes = trimmed.len() - text.len();
            LineKind::Heading {
                level: hashes.clamp(1, MAX_HEADING_LEVEL as usize) as u8,
                text: text.trim().to_string(),
            }
        }
        Some('-') => LineKind::Bullet {
            text: trimmed[1..].trim().to_string(),
        },
        Some(_) => LineKind::Paragraph {
            text: trimmed.to_string(),
        },
    }
}

/// Classifies every line of `markdown`, dropping blank lines.
pub fn parse_blocks(markdown: &str) -> Vec<LineKind> {
    markdown
        .lines()
        .map(classify_line)
        .filter(|kind| *kind != LineKind::Blank)
        .collect()
}
