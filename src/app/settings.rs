//! Dashboard settings: parse/write `dashboard.conf` and merge command-line overrides.
//!
//! The file uses the same `key = value` format as the theme and keymap files:
//!
//! ```text
//! api_url = https://jsonplaceholder.typicode.com
//! page_size = 5
//! timeout_secs = 10
//! ```

use std::time::Duration;

use crate::error::PageError;
use crate::pagination::{DEFAULT_PAGE_SIZE, PageSize};
use crate::service::DEFAULT_API_URL;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the user service (without `/users`).
    pub api_url: String,
    /// Cards per page. Kept signed so a bad value can be reported instead of wrapped.
    pub page_size: i64,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE as i64,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or write the defaults there and use them.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let cfg = Self::default();
        let _ = cfg.write_file(path);
        cfg
    }

    /// Returns `None` when the file cannot be read.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Parse settings text. Unknown keys and unparsable numbers are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut cfg = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else { continue };
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if rhs.is_empty() {
                continue;
            }
            match lhs {
                "api_url" => cfg.api_url = rhs.to_string(),
                "page_size" => {
                    if let Ok(n) = rhs.parse() {
                        cfg.page_size = n;
                    }
                }
                "timeout_secs" => {
                    if let Ok(n) = rhs.parse() {
                        cfg.timeout_secs = n;
                    }
                }
                _ => {}
            }
        }
        cfg
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        let buf = format!(
            "# user-dashboard settings\n\
             # Base URL of the REST user service (the dashboard calls <api_url>/users)\n\
             api_url = {}\n\
             # Cards per page; must be positive\n\
             page_size = {}\n\
             # Request timeout in seconds\n\
             timeout_secs = {}\n",
            self.api_url, self.page_size, self.timeout_secs
        );
        std::fs::write(path, buf)
    }

    /// Command-line values win over the file.
    pub fn apply_overrides(
        &mut self,
        api_url: Option<String>,
        page_size: Option<i64>,
        timeout_secs: Option<u64>,
    ) {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(n) = page_size {
            self.page_size = n;
        }
        if let Some(t) = timeout_secs {
            self.timeout_secs = t;
        }
    }

    pub fn page_size(&self) -> Result<PageSize, PageError> {
        PageSize::new(self.page_size)
    }

    /// Request timeout; zero is bumped to one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_known_keys_and_skips_the_rest() {
        let cfg = Settings::parse(
            "# c\napi_url = http://localhost:3000\npage_size = 12\ntimeout_secs = abc\ncolor = red\n",
        );
        assert_eq!(cfg.api_url, "http://localhost:3000");
        assert_eq!(cfg.page_size, 12);
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn negative_page_size_is_kept_and_rejected_on_use() {
        let cfg = Settings::parse("page_size = -1\n");
        assert_eq!(cfg.page_size, -1);
        assert_eq!(cfg.page_size(), Err(PageError::InvalidConfiguration(-1)));
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut cfg = Settings::parse("page_size = 3\napi_url = http://a\n");
        cfg.apply_overrides(None, Some(8), Some(2));
        assert_eq!(cfg.api_url, "http://a");
        assert_eq!(cfg.page_size, 8);
        assert_eq!(cfg.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn missing_file_is_written_with_defaults() {
        let path = std::env::temp_dir().join(format!("user_dashboard_settings_init_{}.conf", std::process::id()));
        let path = path.to_string_lossy().to_string();
        let _ = std::fs::remove_file(&path);

        let cfg = Settings::load_or_init(&path);
        assert_eq!(cfg, Settings::default());
        assert_eq!(Settings::from_file(&path), Some(Settings::default()));

        std::fs::write(&path, "page_size = 9\n").unwrap();
        assert_eq!(Settings::load_or_init(&path).page_size, 9);
        let _ = std::fs::remove_file(&path);
    }
}
