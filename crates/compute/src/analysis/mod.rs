pub mod statistics;
pub mod timeseries;

pub use statistics::*;
pub use timeseries::*;
