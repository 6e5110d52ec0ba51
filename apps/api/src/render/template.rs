//! Document Template Filler — substitutes spec values into the template's
//! attribute table.
//!
//! A row is recognised by the lower-cased text of its first cell. For a known
//! attribute:
//! - non-empty spec value: the second cell is replaced with the value
//! - empty value and blank second cell: the row is removed
//! - empty value and pre-filled second cell: the row is kept as-is
//!
//! The third case means a placeholder row survives with its placeholder text.
//! It is reported in `FillReport::kept_placeholders` rather than resolved here.

use docx_rs::{
    DocumentChild, Docx, Paragraph, ParagraphChild, Run, RunChild, Table, TableCell,
    TableCellContent, TableChild, TableRow, TableRowChild,
};

use crate::models::datasheet::{ProductSpec, SpecAttribute};

/// What the filler did to each recognised row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillReport {
    pub filled: Vec<SpecAttribute>,
    pub removed: Vec<SpecAttribute>,
    pub kept_placeholders: Vec<SpecAttribute>,
}

impl FillReport {
    pub fn is_empty(&self) -> bool {
        self.filled.is_empty() && self.removed.is_empty() && self.kept_placeholders.is_empty()
    }
}

/// Fills every top-level table in the document body.
pub fn fill_template(docx: &mut Docx, spec: &ProductSpec) -> FillReport {
    let mut report = FillReport::default();
    for child in docx.document.children.iter_mut() {
        if let DocumentChild::Table(table) = child {
            fill_table(table, spec, &mut report);
        }
    }
    report
}

enum RowAction {
    Fill(SpecAttribute),
    Remove(SpecAttribute),
    KeepPlaceholder(SpecAttribute),
    Untouched,
}

fn fill_table(table: &mut Table, spec: &ProductSpec, report: &mut FillReport) {
    let rows = std::mem::take(&mut table.rows);
    for mut child in rows {
        let TableChild::TableRow(row) = &mut child else {
            table.rows.push(child);
            continue;
        };
        match classify_row(row, spec) {
            RowAction::Remove(attr) => {
                report.removed.push(attr);
                continue;
            }
            RowAction::Fill(attr) => {
                if let Some(TableRowChild::TableCell(value_cell)) = row.cells.get_mut(1) {
                    set_cell_text(value_cell, spec.attribute(attr).trim());
                }
                report.filled.push(attr);
            }
            RowAction::KeepPlaceholder(attr) => report.kept_placeholders.push(attr),
            RowAction::Untouched => {}
        }
        table.rows.push(child);
    }
}

/// Removal looks at the destination cell as it was before substitution.
fn classify_row(row: &TableRow, spec: &ProductSpec) -> RowAction {
    let mut cells = row_cells(row);
    let (Some(label_cell), Some(value_cell)) = (cells.next(), cells.next()) else {
        return RowAction::Untouched;
    };
    let Some(attr) = SpecAttribute::from_label(&cell_text(label_cell)) else {
        return RowAction::Untouched;
    };

    if !spec.attribute(attr).trim().is_empty() {
        RowAction::Fill(attr)
    } else if cell_text(value_cell).trim().is_empty() {
        RowAction::Remove(attr)
    } else {
        RowAction::KeepPlaceholder(attr)
    }
}

fn row_cells(row: &TableRow) -> impl Iterator<Item = &TableCell> {
    row.cells.iter().filter_map(|child| match child {
        TableRowChild::TableCell(cell) => Some(cell),
        #[allow(unreachable_patterns)]
        _ => None,
    })
}

/// Replaces the cell content with a single plain paragraph, keeping cell properties.
fn set_cell_text(cell: &mut TableCell, value: &str) {
    let mut fresh = std::mem::replace(cell, TableCell::new());
    fresh.children.clear();
    *cell = fresh.add_paragraph(Paragraph::new().add_run(Run::new().add_text(value)));
}

/// Concatenated run text of every paragraph in the cell, one line per paragraph.
pub fn cell_text(cell: &TableCell) -> String {
    cell.children
        .iter()
        .filter_map(|content| match content {
            TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn paragraph_text(paragraph: &Paragraph) -> String {
    paragraph
        .children
        .iter()
        .filter_map(|child| match child {
            ParagraphChild::Run(run) => Some(run_text(run)),
            _ => None,
        })
        .collect()
}

fn run_text(run: &Run) -> String {
    run.children
        .iter()
        .filter_map(|child| match child {
            RunChild::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect()
}
