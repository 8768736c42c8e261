//! In-memory collaborators for tests
//!
//! `FakeBrowser` serves canned HTML per URL and can be told to fail in the
//! ways a real WebDriver session does. `KeywordClassifier` labels a text
//! positive when it contains one of its keywords.

use crate::classifier::SequenceClassifier;
use crate::crawlers::Browser;
use crate::error::{BrowserError, ClassifierError};
use crate::parsers::html;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// How a fake page behaves when visited
#[derive(Debug, Clone)]
pub enum FakePage {
    /// Loads normally and serves this HTML
    Html(String),
    /// Navigation never completes
    NavigationTimeout,
    /// Loads but the body never appears
    NoBody,
    /// Loads, then the page context is torn down before extraction
    TornDown,
    /// Navigation hangs past any timeout
    Hang,
}

pub struct FakeBrowser {
    pages: HashMap<String, FakePage>,
    current: Option<FakePage>,
    pub visited: Vec<String>,
    pub quit_called: Rc<Cell<bool>>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            current: None,
            visited: Vec::new(),
            quit_called: Rc::new(Cell::new(false)),
        }
    }

    pub fn with_page(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn with_html(self, url: &str, html: &str) -> Self {
        self.with_page(url, FakePage::Html(html.to_string()))
    }

    /// Builds a page whose body lists `texts` as separate elements
    pub fn with_texts(self, url: &str, texts: &[&str]) -> Self {
        let body = texts
            .iter()
            .map(|text| format!("<div><span>{}</span></div>", text))
            .collect::<String>();
        self.with_html(url, &format!("<html><body>{}</body></html>", body))
    }

    fn loaded_html(&self) -> Result<&str, BrowserError> {
        match &self.current {
            Some(FakePage::Html(html)) => Ok(html),
            Some(FakePage::TornDown) => Err(BrowserError::Rendering(
                "page context was discarded".to_string(),
            )),
            _ => Err(BrowserError::Rendering("no page loaded".to_string())),
        }
    }
}

impl Browser for FakeBrowser {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.visited.push(url.to_string());
        let page = self
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| BrowserError::Rendering(format!("unknown host for {}", url)))?;

        match page {
            FakePage::NavigationTimeout => Err(BrowserError::Timeout(Duration::from_secs(10))),
            FakePage::Hang => {
                std::future::pending::<()>().await;
                Ok(())
            }
            page => {
                self.current = Some(page);
                Ok(())
            }
        }
    }

    async fn wait_for_body(&mut self, timeout: Duration) -> Result<(), BrowserError> {
        match &self.current {
            Some(FakePage::NoBody) => Err(BrowserError::Timeout(timeout)),
            _ => Ok(()),
        }
    }

    async fn page_source(&mut self) -> Result<String, BrowserError> {
        self.loaded_html().map(str::to_string)
    }

    async fn execute_script(&mut self, script: &str) -> Result<Value, BrowserError> {
        if script != html::LEAF_TEXT_SCRIPT {
            return Err(BrowserError::Rendering("unexpected script".to_string()));
        }
        let texts = html::parse_leaf_texts(self.loaded_html()?);
        Ok(Value::from(texts))
    }

    async fn quit(self) -> Result<(), BrowserError> {
        self.quit_called.set(true);
        Ok(())
    }
}

/// Labels a text positive (class 1) when it contains any keyword,
/// case-insensitively
pub struct KeywordClassifier {
    keywords: Vec<String>,
    poison: Option<String>,
    batch_sizes: RefCell<Vec<usize>>,
}

impl KeywordClassifier {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            poison: None,
            batch_sizes: RefCell::new(Vec::new()),
        }
    }

    /// Fail any batch that contains `text`
    pub fn failing_on(mut self, text: &str) -> Self {
        self.poison = Some(text.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.batch_sizes.borrow().len()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.borrow().clone()
    }
}

impl SequenceClassifier for KeywordClassifier {
    fn predict(&self, texts: &[String]) -> Result<Vec<usize>, ClassifierError> {
        self.batch_sizes.borrow_mut().push(texts.len());
        if let Some(poison) = &self.poison {
            if texts.iter().any(|t| t == poison) {
                return Err(ClassifierError::Tokenizer("unencodable input".to_string()));
            }
        }
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                usize::from(self.keywords.iter().any(|k| lower.contains(k.as_str())))
            })
            .collect())
    }
}
