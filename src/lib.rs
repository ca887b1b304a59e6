// src/lib.rs

#[macro_use]
pub mod macros;

pub mod browser;
pub mod cli;
pub mod config;
pub mod core;
pub mod csv;
pub mod error;
pub mod file;
pub mod log;
pub mod profile;
pub mod progress;
pub mod runner;
pub mod search;

pub use browser::{Browser, ElementHandle};
pub use error::{BrowserError, ScrapeError};
