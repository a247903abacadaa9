pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod reporting;
pub mod session;
pub mod stream;
pub mod transport;
pub mod utils;
