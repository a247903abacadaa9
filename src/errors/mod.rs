pub mod types;
pub mod classification;

pub use types::ReviewError;
pub use classification::ErrorClassification;
