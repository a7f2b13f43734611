//! View variants, router, and plain-text rendering.
//!
//! Each view is a pure function from the artifact store to a [`Rendered`]
//! report. A missing or unreadable artifact degrades to an in-view notice;
//! it never escapes as an error from the router.

mod demography;
mod dynamics;
mod geography;
mod overview;
mod search;
mod texts;

use crate::artifacts::ArtifactStore;
use crate::errors::MemoriaError;
use crate::search::SearchQuery;
use crate::tables::ArtifactTable;

/// The six dashboard views.
#[derive(Clone, Debug)]
pub enum View {
    /// Headline metrics and top-level counts.
    Overview,
    /// Publication time series, seasonality, and activity half-life.
    Dynamics,
    /// Narrative analytics: types, sentiment, diversity, topics, entities.
    Texts,
    /// Inter-regional migration flows.
    Geography,
    /// Age × rank demographics and the convergence gap.
    Demography,
    /// Interactive search over the sample or full-text export.
    Search(SearchQuery),
}

impl View {
    /// Render the view against `store`.
    pub fn render(&self, store: &ArtifactStore) -> Rendered {
        match self {
            View::Overview => overview::render(store),
            View::Dynamics => dynamics::render(store),
            View::Texts => texts::render(store),
            View::Geography => geography::render(store),
            View::Demography => demography::render(store),
            View::Search(query) => search::render(store, query),
        }
    }
}

/// A rendered report: title plus ordered sections.
#[derive(Clone, Debug)]
pub struct Rendered {
    /// Report title.
    pub title: String,
    /// Ordered sections.
    pub sections: Vec<Section>,
}

impl Rendered {
    /// Format the whole report as plain text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&"═".repeat(display_width(&self.title)));
        out.push('\n');
        for section in &self.sections {
            out.push('\n');
            out.push_str(&section.heading);
            out.push('\n');
            out.push_str(&"─".repeat(display_width(&section.heading)));
            out.push('\n');
            out.push_str(section.body.trim_end());
            out.push('\n');
        }
        out
    }
}

/// One titled block of report text.
#[derive(Clone, Debug)]
pub struct Section {
    /// Section heading.
    pub heading: String,
    /// Section body (preformatted text).
    pub body: String,
}

/// Load a table and render it, degrading load failures to an in-view notice.
pub(crate) fn load_section<T, F>(store: &ArtifactStore, heading: &str, render: F) -> Section
where
    T: ArtifactTable,
    F: FnOnce(Vec<T>) -> String,
{
    let body = match store.load::<T>() {
        Ok(rows) => render(rows),
        Err(err) => notice(&err),
    };
    Section {
        heading: heading.to_string(),
        body,
    }
}

/// In-view notice text for a failed artifact load.
pub(crate) fn notice(err: &MemoriaError) -> String {
    format!("Данные недоступны: {err}")
}

/// Render an aligned plain-text table.
pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "(нет данных)".to_string();
    }
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|header| display_width(header)).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(columns) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    let mut out = String::new();
    for (idx, header) in headers.iter().enumerate() {
        out.push_str(&pad(header, widths[idx]));
        if idx + 1 < columns {
            out.push_str("  ");
        }
    }
    out.push('\n');
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(columns) {
            out.push_str(&pad(cell, widths[idx]));
            if idx + 1 < columns {
                out.push_str("  ");
            }
        }
        out.push('\n');
    }
    out
}

/// Unicode bar of width proportional to `value / max`, for inline charts.
pub(crate) fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.clamp(1, width))
}

/// Format an optional metric, rendering `None` as an explicit dash.
pub(crate) fn opt_metric(value: Option<f64>, digits: usize) -> String {
    match value {
        Some(value) => format!("{value:.digits$}"),
        None => "—".to_string(),
    }
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, width: usize) -> String {
    let mut out = text.to_string();
    for _ in display_width(text)..width {
        out.push(' ');
    }
    out
}
