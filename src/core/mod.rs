// src/core/mod.rs

pub mod html;
pub mod net;

pub use html::{Element, Selector};
pub use net::HttpBrowser;
