use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// How the browser session is started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Connect to an already running WebDriver server instead of spawning one.
    pub webdriver_url: Option<String>,
    /// WebDriver binary spawned when no URL is given.
    pub driver: Option<PathBuf>,
    /// Local port for the spawned driver.
    pub driver_port: u16,
    /// Seconds to wait for a spawned driver to report ready.
    pub driver_startup_secs: u64,
    /// Run Chrome without a window. Chosen per run, never persisted.
    #[serde(skip)]
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// Proxy for browser traffic, e.g. `http://127.0.0.1:8080`.
    pub proxy: Option<String>,
    /// Extra Chrome command line switches.
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: None,
            driver: Some(PathBuf::from("chromedriver")),
            driver_port: 9515,
            driver_startup_secs: 10,
            headless: true,
            window_width: 1280,
            window_height: 1024,
            proxy: None,
            extra_args: Vec::new(),
        }
    }
}

impl BrowserConfig {
    pub fn driver_startup_timeout(&self) -> Duration {
        Duration::from_secs(self.driver_startup_secs)
    }

    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = vec![format!(
            "--window-size={},{}",
            self.window_width, self.window_height
        )];
        if self.headless {
            args.push("--headless=new".to_string());
            args.push("--disable-gpu".to_string());
        }
        if let Some(proxy) = &self.proxy {
            args.push(format!("--proxy-server={proxy}"));
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// W3C capabilities requesting Chrome with [`Self::chrome_args`].
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert("browserName".to_string(), json!("chrome"));
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": self.chrome_args() }),
        );
        caps
    }
}
