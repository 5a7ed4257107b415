pub mod params;
pub mod yield_model;

pub use params::YieldModelParams;
pub use yield_model::{ExpectedYield, ModelError, expected_log_return, expected_yield};
