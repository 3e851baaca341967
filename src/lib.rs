//! Document analyzer library

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod server;
pub mod storage;

pub use config::Config;
pub use error::{AnalyzerError, Result};
