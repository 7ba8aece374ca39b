use scraper::{ElementRef, Html};

use crate::ExtractionResult;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("content is not a document: {0}")]
    NotADocument(String),
}

/// Records from the first table of a page, with counters for the rows and
/// tables that did not contribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionReport {
    pub records: ExtractionResult,
    pub tables_found: usize,
    pub dropped_rows: usize,
}

pub trait Extractor: Send + Sync {
    fn extract(&self, html: &str) -> Result<ExtractionReport, ExtractError>;
}

/// Extracts the first `<table>` in document order:
/// - header labels come from the `<th>` cells of the first row holding any
/// - every row after the first contributes its `<td>` cells
/// - rows whose cell count differs from the header count are dropped.
///
/// Later tables are never looked at. Rows of a nested table belong to that
/// nested table, not to the one containing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstTableExtractor;

impl Extractor for FirstTableExtractor {
    fn extract(&self, html: &str) -> Result<ExtractionReport, ExtractError> {
        if looks_binary(html) {
            return Err(ExtractError::NotADocument(
                "content is dominated by control characters".into(),
            ));
        }

        let doc = Html::parse_document(html);
        let tables: Vec<ElementRef<'_>> = elements_named(doc.root_element(), "table").collect();
        let Some(table) = tables.first().copied() else {
            return Ok(ExtractionReport::default());
        };

        let rows = rows_of(table);
        let headers = rows
            .iter()
            .map(|row| cell_texts(*row, "th"))
            .find(|labels| !labels.is_empty())
            .unwrap_or_default();

        let mut report = ExtractionReport {
            records: Vec::new(),
            tables_found: tables.len(),
            dropped_rows: 0,
        };
        for row in rows.iter().skip(1) {
            let cells = cell_texts(*row, "td");
            if cells.len() == headers.len() {
                report
                    .records
                    .push(headers.iter().cloned().zip(cells).collect());
            } else {
                report.dropped_rows += 1;
            }
        }
        Ok(report)
    }
}

/// Convenience wrapper over [`FirstTableExtractor`] returning only the records.
pub fn extract(html: &str) -> Result<ExtractionResult, ExtractError> {
    FirstTableExtractor
        .extract(html)
        .map(|report| report.records)
}

const SNIFF_CHARS: usize = 1024;

/// Binary payloads decoded as text show up as runs of control characters near
/// the start. A stray control character inside real markup does not count;
/// the HTML parser replaces it.
fn looks_binary(text: &str) -> bool {
    let (sampled, control) = text
        .chars()
        .take(SNIFF_CHARS)
        .fold((0usize, 0usize), |(sampled, control), c| {
            (sampled + 1, control + usize::from(is_binary_control(c)))
        });
    control * 8 > sampled
}

fn is_binary_control(c: char) -> bool {
    matches!(c, '\0'..='\u{8}' | '\u{b}' | '\u{e}'..='\u{1f}')
}

fn elements_named<'a>(
    scope: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    scope
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == name)
}

fn rows_of(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    elements_named(table, "tr")
        .filter(|row| owning_table(*row) == Some(table))
        .collect()
}

fn owning_table(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "table")
}

fn cell_texts(row: ElementRef<'_>, tag: &str) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| cell.value().name() == tag)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect()
}
