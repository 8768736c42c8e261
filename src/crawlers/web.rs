use crate::config::BrowserConfig;
use crate::crawlers::Browser;
use crate::error::BrowserError;
use fantoccini::error::CmdError;
use fantoccini::wd::{Capabilities, TimeoutConfiguration};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Value, json};
use std::time::Duration;

/// Local ports a WebDriver server commonly listens on
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// A headless Chrome session driven over the WebDriver protocol
pub struct WebDriverBrowser {
    client: Client,
    webdriver_url: String,
    current_url: Option<String>,
}

impl WebDriverBrowser {
    /// Starts a session with the configured capabilities and timeouts
    pub async fn connect(config: &BrowserConfig) -> Result<Self, BrowserError> {
        let capabilities = chrome_capabilities(config);
        let (client, webdriver_url) =
            connect_to_webdriver(&config.webdriver_url, &capabilities).await?;

        // Page load and script execution share the readiness timeout
        let timeout = config.timeout();
        client
            .update_timeouts(TimeoutConfiguration::new(
                Some(timeout),
                Some(timeout),
                None,
            ))
            .await?;

        ::log::info!(
            "Browser session ready at {} (timeout {}s, headless: {})",
            webdriver_url,
            config.timeout_secs,
            config.headless
        );

        Ok(Self {
            client,
            webdriver_url,
            current_url: None,
        })
    }

    fn command_error(&self, context: &str, error: CmdError) -> BrowserError {
        let url = self.current_url.as_deref().unwrap_or("<none>");
        if is_session_lost(&error) {
            ::log::warn!("Lost WebDriver session while {} {}", context, url);
        } else {
            ::log::debug!("WebDriver command failed while {} {}: {}", context, url, error);
        }
        BrowserError::Command(error)
    }
}

impl Browser for WebDriverBrowser {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.current_url = Some(url.to_string());
        self.client
            .goto(url)
            .await
            .map_err(|e| self.command_error("navigating to", e))
    }

    async fn wait_for_body(&mut self, timeout: Duration) -> Result<(), BrowserError> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css("body"))
            .await
        {
            Ok(_) => Ok(()),
            Err(CmdError::WaitTimeout) => Err(BrowserError::Timeout(timeout)),
            Err(e) => Err(self.command_error("waiting for body of", e)),
        }
    }

    async fn page_source(&mut self) -> Result<String, BrowserError> {
        self.client
            .source()
            .await
            .map_err(|e| self.command_error("getting source for", e))
    }

    async fn execute_script(&mut self, script: &str) -> Result<Value, BrowserError> {
        self.client
            .execute(script, Vec::new())
            .await
            .map_err(|e| self.command_error("running script on", e))
    }

    async fn quit(self) -> Result<(), BrowserError> {
        self.client.close().await?;
        ::log::debug!("Closed WebDriver session at {}", self.webdriver_url);
        Ok(())
    }
}

/// Builds Chrome capabilities from the browser configuration
pub fn chrome_capabilities(config: &BrowserConfig) -> Capabilities {
    let mut args = Vec::with_capacity(config.args.len() + 2);
    if config.headless {
        args.push("--headless".to_string());
    }
    args.extend(config.args.iter().cloned());
    args.push(format!("user-agent={}", config.user_agent));

    let mut capabilities = Capabilities::new();
    capabilities.insert("browserName".to_string(), json!("chrome"));
    capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    capabilities
}

/// Connects to the WebDriver instance, trying well-known local ports if the
/// configured one refuses
async fn connect_to_webdriver(
    webdriver_url: &str,
    capabilities: &Capabilities,
) -> Result<(Client, String), BrowserError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities.clone());

    let first_error = match builder.connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok((client, webdriver_url.to_string()));
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e.to_string()
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = builder.connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok((client, url.to_string()));
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(BrowserError::Session {
        url: webdriver_url.to_string(),
        message: first_error,
    })
}

fn is_session_lost(error: &CmdError) -> bool {
    let message = error.to_string();
    message.contains("Unable to find session") || message.contains("invalid session id")
}
