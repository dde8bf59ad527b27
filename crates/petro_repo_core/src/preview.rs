//! crates/petro_repo_core/src/preview.rs
//!
//! File-type preview dispatch: given a document's declared file type,
//! select a rendering strategy and build the renderable content from the
//! raw preview body. Parsing failures degrade to the plain-text renderer
//! instead of failing the screen.

use serde_json::Value;

use crate::domain::Document;

//=========================================================================================
// File Kinds and Renderer Dispatch
//=========================================================================================

/// Known document file types, parsed case-insensitively from the declared
/// type or a file-name extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Doc,
    Docx,
    Csv,
    Xlsx,
    Json,
    Txt,
    Ppt,
    Pptx,
}

impl FileKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "json" => Some(Self::Json),
            "txt" | "text" => Some(Self::Txt),
            "ppt" => Some(Self::Ppt),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        file_name
            .rsplit_once('.')
            .and_then(|(_, extension)| Self::parse(extension))
    }
}

/// The rendering strategy for a declared file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    PaginatedBinary,
    StructuredTree,
    Tabular,
    PlainText,
    Unsupported,
}

/// Pure dispatch from declared file type to renderer. Anything without a
/// dedicated renderer falls through to the download prompt.
pub fn select_renderer(file_type: &str) -> RendererKind {
    match FileKind::parse(file_type) {
        Some(FileKind::Pdf) => RendererKind::PaginatedBinary,
        Some(FileKind::Json) => RendererKind::StructuredTree,
        Some(FileKind::Csv) => RendererKind::Tabular,
        Some(FileKind::Txt) => RendererKind::PlainText,
        _ => RendererKind::Unsupported,
    }
}

//=========================================================================================
// Tabular Content
//=========================================================================================

/// How many data rows the tabular viewer renders. The full row set stays in
/// the model; only rendering is limited.
pub const CSV_RENDER_LIMIT: usize = 100;

/// A parsed CSV body: fixed column headers from the first row, every data
/// row retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Splits raw CSV text into a header row and data rows. Blank lines are
    /// skipped; cells are a naive comma split, which is all the preview
    /// endpoint's text form calls for.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut lines = raw.lines().filter(|line| !line.trim().is_empty());
        let headers = split_row(lines.next()?);
        let rows = lines.map(split_row).collect();
        Some(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn all_rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The rows the viewer actually renders.
    pub fn visible_rows(&self) -> &[Vec<String>] {
        &self.rows[..self.rows.len().min(CSV_RENDER_LIMIT)]
    }

    /// The "showing first N of M" notice, present only when rendering is
    /// actually truncated.
    pub fn truncation_notice(&self) -> Option<String> {
        (self.rows.len() > CSV_RENDER_LIMIT).then(|| {
            format!(
                "Showing first {} of {} rows",
                CSV_RENDER_LIMIT,
                self.rows.len()
            )
        })
    }
}

fn split_row(line: &str) -> Vec<String> {
    line.split(',').map(|cell| cell.trim().to_string()).collect()
}

//=========================================================================================
// Preview Content
//=========================================================================================

/// Renderable preview state for one document. `Unavailable` is the distinct
/// not-available state for a missing document or missing content.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewContent {
    /// Binary handed to the external paginated viewer. Page and zoom state
    /// live in [`PdfViewerState`] once the viewer reports a page count.
    Pdf,
    Structured(Value),
    Table(CsvTable),
    Text(String),
    Unsupported { file_name: String },
    Unavailable,
}

/// Builds the preview for a document from the raw body the preview endpoint
/// served. Malformed JSON and malformed CSV degrade to plain text.
pub fn build_preview(document: &Document, body: Option<&str>) -> PreviewContent {
    let Some(body) = body else {
        return PreviewContent::Unavailable;
    };
    match select_renderer(&document.file_type) {
        RendererKind::PaginatedBinary => PreviewContent::Pdf,
        RendererKind::StructuredTree => match serde_json::from_str(body) {
            Ok(value) => PreviewContent::Structured(value),
            Err(_) => PreviewContent::Text(body.to_string()),
        },
        RendererKind::Tabular => match CsvTable::parse(body) {
            Some(table) => PreviewContent::Table(table),
            None => PreviewContent::Text(body.to_string()),
        },
        RendererKind::PlainText => PreviewContent::Text(body.to_string()),
        RendererKind::Unsupported => PreviewContent::Unsupported {
            file_name: document.file_name.clone(),
        },
    }
}

//=========================================================================================
// Paginated Binary Viewer State
//=========================================================================================

const ZOOM_MIN_TENTHS: u8 = 5; // 0.5x
const ZOOM_MAX_TENTHS: u8 = 20; // 2.0x
const ZOOM_STEP_TENTHS: u8 = 2; // 0.2x per step

/// Page navigation and zoom state for the paginated binary viewer.
///
/// Pages clamp to `[1, total_pages]` and zoom to `[0.5x, 2.0x]` in 0.2
/// steps. Zoom is stored in tenths so the steps stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfViewerState {
    page: u32,
    total_pages: u32,
    zoom_tenths: u8,
}

impl PdfViewerState {
    /// A viewer opened on page one at 1.0x zoom. The page count comes from
    /// the external viewer once the binary loads.
    pub fn new(total_pages: u32) -> Self {
        Self {
            page: 1,
            total_pages: total_pages.max(1),
            zoom_tenths: 10,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn zoom(&self) -> f32 {
        f32::from(self.zoom_tenths) / 10.0
    }

    pub fn go_to_page(&mut self, page: u32) {
        self.page = page.clamp(1, self.total_pages);
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.page.saturating_sub(1));
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom_tenths(self.zoom_tenths.saturating_add(ZOOM_STEP_TENTHS));
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom_tenths(self.zoom_tenths.saturating_sub(ZOOM_STEP_TENTHS));
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        let tenths = (zoom * 10.0).round().clamp(0.0, 255.0) as u8;
        self.set_zoom_tenths(tenths);
    }

    fn set_zoom_tenths(&mut self, tenths: u8) {
        self.zoom_tenths = tenths.clamp(ZOOM_MIN_TENTHS, ZOOM_MAX_TENTHS);
    }
}
