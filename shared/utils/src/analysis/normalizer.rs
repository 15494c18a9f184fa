//! Coerces an arbitrary JSON object into [`AnalysisResult`].
//!
//! Nothing here fails: wrong types become defaults, rows are squared up to
//! their headers and price-named fields are reformatted.

use docsight_models::{AnalysisResult, KeyFigures, OtherStructuredData, Table};
use serde_json::{Map, Value};

use super::price::{clean_price_fields, clean_price_text, is_price_field};

pub fn normalize(root: &Map<String, Value>) -> AnalysisResult {
    let mut result = AnalysisResult {
        summary: root.get("summary").map(coerce_string).unwrap_or_default(),
        tables: coerce_array(root.get("tables"))
            .iter()
            .filter_map(Value::as_object)
            .map(coerce_table)
            .collect(),
        artworks: coerce_array(root.get("artworks"))
            .iter()
            .cloned()
            .map(|mut artwork| {
                if let Some(object) = artwork.as_object_mut() {
                    clean_price_fields(object);
                }
                artwork
            })
            .collect(),
        other_structured_data: root
            .get("otherStructuredData")
            .and_then(Value::as_object)
            .map(coerce_other_data)
            .unwrap_or_default(),
    };
    finalize_tables(&mut result);
    result
}

/// Square every table's rows, then clean its price columns.
pub fn finalize_tables(result: &mut AnalysisResult) {
    result.normalize_tables();
    for table in &mut result.tables {
        clean_price_columns(table);
    }
}

fn clean_price_columns(table: &mut Table) {
    let price_columns: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, header)| is_price_field(header))
        .map(|(idx, _)| idx)
        .collect();

    for row in &mut table.rows {
        for &idx in &price_columns {
            let Some(cell) = row.get_mut(idx) else {
                continue;
            };
            if let Some(cleaned) = clean_price_text(cell) {
                *cell = cleaned;
            }
        }
    }
}

fn coerce_table(object: &Map<String, Value>) -> Table {
    let headers: Vec<String> = coerce_array(object.get("headers"))
        .iter()
        .map(coerce_string)
        .collect();

    let rows = coerce_array(object.get("rows"))
        .iter()
        .map(|row| match row {
            Value::Array(cells) => cells.iter().map(coerce_string).collect(),
            // Rows keyed by column name are laid out in header order.
            Value::Object(cells) => headers
                .iter()
                .map(|h| cells.get(h).map(coerce_string).unwrap_or_default())
                .collect(),
            other => vec![coerce_string(other)],
        })
        .collect();

    let location = match object.get("location") {
        None | Some(Value::Null) => None,
        Some(value) => Some(coerce_string(value)),
    };

    Table {
        title: object.get("title").map(coerce_string).unwrap_or_default(),
        description: object
            .get("description")
            .map(coerce_string)
            .unwrap_or_default(),
        headers,
        rows,
        location,
    }
}

fn coerce_other_data(object: &Map<String, Value>) -> OtherStructuredData {
    let mut extra = object.clone();
    let key_figures = extra.remove("key_figures");
    let lists = extra.remove("lists");

    OtherStructuredData {
        key_figures: key_figures
            .as_ref()
            .and_then(Value::as_object)
            .map(coerce_key_figures)
            .unwrap_or_default(),
        lists: coerce_array(lists.as_ref()).to_vec(),
        extra,
    }
}

fn coerce_key_figures(object: &Map<String, Value>) -> KeyFigures {
    let mut extra = object.clone();
    let mut values = match extra.remove("values") {
        Some(Value::Object(values)) => values,
        Some(_) => Map::new(),
        // A flat map of figures without the `values` wrapper.
        None => std::mem::take(&mut extra),
    };
    clean_price_fields(&mut values);

    KeyFigures { values, extra }
}

fn coerce_array(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
