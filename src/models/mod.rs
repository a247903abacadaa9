pub mod record;
pub mod report;

pub use record::*;
pub use report::*;
