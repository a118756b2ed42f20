//! Solar-aware scheduling: suitability scoring, window search,
//! recommendation synthesis and daily metrics.

pub mod metrics;
pub mod recommend;
pub mod suitability;
pub mod window;

pub use metrics::*;
pub use recommend::*;
pub use suitability::*;
pub use window::*;
