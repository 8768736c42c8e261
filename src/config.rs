use crate::error::ConfigError;
use crate::filter::CandidateFilterConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// How leaf text is pulled out of a rendered page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Serialize the rendered DOM and walk it in-process
    Dom,
    /// Run the leaf-text script inside the page, against the live DOM
    #[default]
    Script,
}

/// Device used for model inference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceConfig {
    /// CUDA when available, CPU otherwise
    #[default]
    Auto,
    Cpu,
    Cuda,
}

/// Configuration for the WebDriver browser session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Page-load, script and readiness timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent by the browser
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Extra command-line arguments for the browser
    #[serde(default = "default_browser_args")]
    pub args: Vec<String>,

    /// Leaf-text extraction strategy
    #[serde(default)]
    pub extraction: ExtractionMode,
}

/// Configuration for the product-name classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Directory holding config.json and model.safetensors
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    /// tokenizer.json location (defaults to one inside model_dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenizer_path: Option<PathBuf>,

    /// Number of candidates per inference call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Token limit applied by truncation
    #[serde(default = "default_max_sequence_length")]
    pub max_sequence_length: usize,

    /// Class index that marks a product name
    #[serde(default = "default_positive_class")]
    pub positive_class: usize,

    #[serde(default)]
    pub device: DeviceConfig,
}

/// Where run artifacts are written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

/// Configuration for the keyword index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_index_dir")]
    pub dir: PathBuf,

    /// Maximum number of hits returned by a search
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub filter: CandidateFilterConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub index: IndexConfig,
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_browser_args() -> Vec<String> {
    vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
    ]
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("furnitron/models/classifier")
}

fn default_batch_size() -> usize {
    64
}

fn default_max_sequence_length() -> usize {
    512
}

fn default_positive_class() -> usize {
    1
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("furnitron/data/inference_output")
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("indexdir")
}

fn default_result_limit() -> usize {
    50
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            headless: default_headless(),
            args: default_browser_args(),
            extraction: ExtractionMode::default(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            tokenizer_path: None,
            batch_size: default_batch_size(),
            max_sequence_length: default_max_sequence_length(),
            positive_class: default_positive_class(),
            device: DeviceConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dir: default_index_dir(),
            result_limit: default_result_limit(),
        }
    }
}

impl BrowserConfig {
    /// Timeout applied to navigation, scripts and the readiness wait
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ClassifierConfig {
    pub fn tokenizer_path(&self) -> PathBuf {
        self.tokenizer_path
            .clone()
            .unwrap_or_else(|| self.model_dir.join("tokenizer.json"))
    }
}

impl PipelineConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise start from defaults, then apply
    /// environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                config.browser.webdriver_url = webdriver_url;
            }
        }

        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Err(e) = Url::parse(&self.browser.webdriver_url) {
            return Err(ConfigError::Invalid {
                field: "browser.webdriver_url",
                message: e.to_string(),
            });
        }
        if self.browser.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "browser.timeout_secs",
                message: "must be at least 1".to_string(),
            });
        }
        if self.classifier.batch_size == 0 {
            return Err(ConfigError::Invalid {
                field: "classifier.batch_size",
                message: "must be at least 1".to_string(),
            });
        }
        if self.index.result_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "index.result_limit",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
