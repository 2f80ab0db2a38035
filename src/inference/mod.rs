mod client;
mod tasks;
mod types;

pub use client::*;
pub use tasks::*;
pub use types::*;
