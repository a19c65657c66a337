//! The core of a personal expense tracker: expenses and spending limits for one user, the derived
//! views computed from them (category totals, a six month trend, limit progress), and budget
//! alerts that are de-duplicated over a 24 hour window.

pub mod advice;
pub mod analytics;
pub mod args;
pub mod commands;
mod config;
mod db;
mod error;
pub mod export;
pub mod model;
pub mod notify;
pub mod ocr;
pub mod search;
pub mod store;
#[cfg(test)]
mod test;
mod utils;

pub use config::Config;
pub use error::{Error, ErrorType, IntoResult, Result};
