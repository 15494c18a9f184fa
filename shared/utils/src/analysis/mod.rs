//! Model Reply Analysis
//!
//! Recovers the fixed `{summary, tables, artworks, otherStructuredData}` shape
//! from whatever text the generative model sends back.

pub mod markdown;
pub mod normalizer;
pub mod parser;
pub mod price;

pub use markdown::extract_tables;
pub use normalizer::normalize;
pub use parser::{ParseOutcome, ParseStrategy, ResponseParser};
