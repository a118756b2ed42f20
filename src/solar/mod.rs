//! Physics-based PV forecast model: solar geometry, plane-of-array
//! irradiance and power conversion.

pub mod irradiance;
pub mod output;
pub mod position;
pub mod series;

pub use irradiance::*;
pub use output::*;
pub use position::*;
pub use series::*;
