pub mod analyze;
pub mod health;
pub mod metrics;

pub use analyze::*;
pub use health::*;
pub use metrics::*;
