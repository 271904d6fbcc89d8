//! Application Layer
//!
//! Orchestrates the domain through use cases.
//!
//! - **Ports**: Interfaces to the price history, strategy catalog and
//!   position stores
//! - **Use Cases**: Single simulation, strategy comparison, batch analysis

pub mod errors;
pub mod ports;
pub mod use_cases;

pub use errors::AnalysisError;
pub use ports::*;
pub use use_cases::*;
