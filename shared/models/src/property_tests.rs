//! Property-based tests for the analysis models
//!
//! Covers row normalization and serialization round-trip consistency.

use proptest::prelude::*;
use serde_json::{Map, Value};

use crate::{AnalysisResult, KeyFigures, OtherStructuredData, Table};

prop_compose! {
    fn arb_cell()(cell in "[A-Za-z0-9 .,$-]{0,12}") -> String {
        cell
    }
}

prop_compose! {
    fn arb_table()(
        title in "[A-Za-z ]{0,20}",
        description in "[A-Za-z ]{0,40}",
        headers in prop::collection::vec("[a-z_]{1,10}", 0..6),
        rows in prop::collection::vec(prop::collection::vec(arb_cell(), 0..9), 0..8),
        location in prop::option::of("page [0-9]{1,2}"),
    ) -> Table {
        Table { title, description, headers, rows, location }
    }
}

prop_compose! {
    fn arb_key_figures()(
        values in prop::collection::btree_map("[a-z_]{1,8}", -1_000_000i64..1_000_000, 0..5)
    ) -> KeyFigures {
        let values: Map<String, Value> = values
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect();
        KeyFigures { values, extra: Map::new() }
    }
}

prop_compose! {
    fn arb_analysis_result()(
        summary in "[A-Za-z .]{0,60}",
        tables in prop::collection::vec(arb_table(), 0..4),
        key_figures in arb_key_figures(),
        lists in prop::collection::vec("[a-z ]{0,10}".prop_map(Value::from), 0..4),
    ) -> AnalysisResult {
        AnalysisResult {
            summary,
            tables,
            artworks: Vec::new(),
            other_structured_data: OtherStructuredData {
                key_figures,
                lists,
                extra: Map::new(),
            },
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// After normalization every row has exactly as many cells as headers.
    #[test]
    fn prop_normalized_rows_match_header_count(mut table in arb_table()) {
        let original = table.clone();
        table.normalize_rows();

        prop_assert!(table.is_rectangular());
        prop_assert_eq!(table.rows.len(), original.rows.len());
        for (normalized, raw) in table.rows.iter().zip(&original.rows) {
            let kept = raw.len().min(original.headers.len());
            prop_assert_eq!(&normalized[..kept], &raw[..kept]);
            prop_assert!(normalized[kept..].iter().all(String::is_empty));
        }
    }

    /// Normalization is idempotent.
    #[test]
    fn prop_normalize_twice_is_noop(mut result in arb_analysis_result()) {
        result.normalize_tables();
        let once = result.clone();
        result.normalize_tables();
        prop_assert_eq!(result, once);
    }

    #[test]
    fn prop_serialization_round_trip(result in arb_analysis_result()) {
        let json = serde_json::to_string(&result).unwrap();
        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, result);
    }
}
