pub mod config;
pub mod error;
pub mod inference;
pub mod ocr;
pub mod server;

pub use error::{Error, Result};
