//! # Docsight Domain Models
//!
//! Data types shared by the analyzer service and its utilities.
//!
//! ## Key Models
//!
//! - **UploadedDocument**: the in-memory PDF received from a client
//! - **AnalysisResult**: the normalized summary / tables / key figures shape
//! - **ResponseEnvelope**: the `{success, message, data, sessionId}` wrapper
//! - **AnalysisRequest**: the outbound `generateContent` body
//!
//! Nothing here is persisted; every value lives for a single request.

pub mod analysis;
pub mod document;
pub mod envelope;
pub mod upstream;

#[cfg(test)]
pub mod property_tests;

pub use analysis::*;
pub use document::*;
pub use envelope::*;
pub use upstream::*;
