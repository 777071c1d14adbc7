use paper_split::PageSize;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub page_size: PageSize,
    /// Blank border kept on every side of the page
    pub margin_mm: f32,
    pub title: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin_mm: 0.0,
            title: "Split image".to_string(),
        }
    }
}

impl ExportOptions {
    pub fn with_page_size(page_size: PageSize) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }
}
