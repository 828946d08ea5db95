pub mod error;
pub mod series;

pub mod momentum;
pub mod trend;

pub use error::IndicatorError;
pub use series::IndicatorSeries;
