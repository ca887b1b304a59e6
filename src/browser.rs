// src/browser.rs
//
// The browsing session the scraper drives. One session is shared, mutably,
// by every stage of a run.
use std::time::Duration;

use async_trait::async_trait;

use crate::core::Element;
use crate::error::BrowserError;

/// Handle to an element returned by [`Browser::query`].
pub type ElementHandle = Element;

#[async_trait]
pub trait Browser: Send {
    /// Load `url`, failing with [`BrowserError::Timeout`] after `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// Succeed once `selector` is present on the current page.
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<(), BrowserError>;

    async fn fill(&mut self, selector: &str, value: &str) -> Result<(), BrowserError>;

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError>;

    async fn query(&mut self, selector: &str) -> Result<Vec<ElementHandle>, BrowserError>;

    async fn read_attribute(
        &mut self,
        handle: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        Ok(handle.attr(name).map(str::to_string))
    }

    /// Text of the first element matching `selector`.
    async fn read_text(&mut self, selector: &str) -> Result<String, BrowserError>;

    /// Full markup of the current page.
    async fn content(&mut self) -> Result<String, BrowserError>;

    /// URL of the current page, after redirects.
    fn url(&self) -> &str;

    /// Fixed pause.
    async fn wait(&mut self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
