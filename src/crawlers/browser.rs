use crate::error::BrowserError;
use serde_json::Value;
use std::time::Duration;

/// The browser collaborator the page scraper drives
///
/// One implementation talks to a real WebDriver server; tests substitute an
/// in-memory fake. Calls are made one at a time, never concurrently.
#[allow(async_fn_in_trait)]
pub trait Browser {
    /// Load `url` in the current window
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Wait until the document has a `<body>` element
    async fn wait_for_body(&mut self, timeout: Duration) -> Result<(), BrowserError>;

    /// Serialization of the current, rendered DOM
    async fn page_source(&mut self) -> Result<String, BrowserError>;

    /// Run `script` in the page and return its result
    async fn execute_script(&mut self, script: &str) -> Result<Value, BrowserError>;

    /// End the session
    async fn quit(self) -> Result<(), BrowserError>
    where
        Self: Sized;
}
