pub mod classify;
pub mod config;
pub mod domain;
pub mod error;
pub mod mail;
pub mod pipeline;
pub mod report;
pub mod store;

pub use error::{Error, Result};
