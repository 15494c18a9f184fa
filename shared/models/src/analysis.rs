use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalized document analysis, the `structuredData` of a successful
/// `/api/analyze` response.
///
/// Every field has a default so that a partially understood model reply
/// still produces a complete value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub artworks: Vec<Value>,
    #[serde(default)]
    pub other_structured_data: OtherStructuredData,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
            && self.tables.is_empty()
            && self.artworks.is_empty()
            && self.other_structured_data.is_empty()
    }

    /// Pad or truncate every table row to its header count.
    pub fn normalize_tables(&mut self) {
        for table in &mut self.tables {
            table.normalize_rows();
        }
    }
}

/// A table recovered from the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers,
            rows,
            ..Default::default()
        }
    }

    /// Short rows are padded with empty cells, long rows are cut to fit.
    pub fn normalize_rows(&mut self) {
        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
    }

    pub fn is_rectangular(&self) -> bool {
        self.rows.iter().all(|row| row.len() == self.headers.len())
    }
}

/// Auxiliary data the model may return alongside tables.
///
/// Unknown keys are preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherStructuredData {
    #[serde(default)]
    pub key_figures: KeyFigures,
    #[serde(default)]
    pub lists: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OtherStructuredData {
    pub fn is_empty(&self) -> bool {
        self.key_figures.values.is_empty()
            && self.key_figures.extra.is_empty()
            && self.lists.is_empty()
            && self.extra.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyFigures {
    #[serde(default)]
    pub values: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
