//! Client configuration: API endpoint, access token and polling behaviour.
//!
//! Values come from the `CDSAPI_URL` / `CDSAPI_KEY` environment variables first,
//! then from the credentials file (`CDSAPI_RC` or `~/.cdsapirc`), which holds
//! lines of the form `url: ...` and `key: ...`.

use crate::utils::get_rc_path;
use log::debug;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://cds.climate.copernicus.eu/api";

const URL_ENV: &str = "CDSAPI_URL";
const KEY_ENV: &str = "CDSAPI_KEY";
const RC_ENV: &str = "CDSAPI_RC";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to determine home directory")]
    HomeDirResolution,

    #[error("Failed to read credentials file '{0}'")]
    RcRead(PathBuf, #[source] std::io::Error),

    #[error("No API key configured; set CDSAPI_KEY or add 'key: <token>' to '{0}'")]
    MissingKey(PathBuf),

    #[error("Invalid API url '{0}'")]
    InvalidUrl(String, #[source] url::ParseError),
}

/// Contents of a `.cdsapirc` file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RcFile {
    pub url: Option<String>,
    pub key: Option<String>,
}

impl RcFile {
    pub fn parse(contents: &str) -> Self {
        let mut rc = RcFile::default();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim().to_string();
            match name.trim() {
                "url" => rc.url = Some(value),
                "key" => rc.key = Some(value),
                _ => {}
            }
        }
        rc
    }

    pub async fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(Self::parse(&contents))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::RcRead(path.to_path_buf(), e)),
        }
    }
}

/// How often a submitted job is polled.
///
/// The wait starts at `initial`, grows by `factor` after every poll and never
/// exceeds `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollSettings {
    pub initial: Duration,
    pub max: Duration,
    pub factor: f64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            max: Duration::from_secs(120),
            factor: 1.5,
        }
    }
}

impl PollSettings {
    /// Delay before the first status check.
    pub fn first(&self) -> Duration {
        self.initial.min(self.max)
    }

    /// Delay after `current`, never above `max`. A factor below 1 (or NaN)
    /// keeps the delay constant.
    pub fn next(&self, current: Duration) -> Duration {
        let factor = if self.factor.is_nan() {
            1.0
        } else {
            self.factor.max(1.0)
        };
        Duration::try_from_secs_f64(current.as_secs_f64() * factor)
            .unwrap_or(self.max)
            .min(self.max)
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub url: Url,
    pub key: String,
    pub poll: PollSettings,
}

impl ClientConfig {
    pub fn new(url: &str, key: impl Into<String>) -> Result<Self, ConfigError> {
        let url = Url::parse(url.trim_end_matches('/'))
            .map_err(|e| ConfigError::InvalidUrl(url.to_string(), e))?;
        Ok(Self {
            url,
            key: key.into(),
            poll: PollSettings::default(),
        })
    }

    pub fn with_poll(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    /// Resolves the configuration from the environment and the credentials file.
    pub async fn load() -> Result<Self, ConfigError> {
        let rc_path = match std::env::var_os(RC_ENV) {
            Some(path) => PathBuf::from(path),
            None => get_rc_path()?,
        };
        let rc = RcFile::load(&rc_path).await?;
        debug!(
            "Loaded credentials file {}: {}",
            rc_path.display(),
            rc.is_some()
        );
        Self::resolve(
            std::env::var(URL_ENV).ok(),
            std::env::var(KEY_ENV).ok(),
            rc,
            &rc_path,
        )
    }

    pub(crate) fn resolve(
        env_url: Option<String>,
        env_key: Option<String>,
        rc: Option<RcFile>,
        rc_path: &Path,
    ) -> Result<Self, ConfigError> {
        let rc = rc.unwrap_or_default();
        let url = env_url
            .or(rc.url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let key = env_key
            .or(rc.key)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingKey(rc_path.to_path_buf()))?;
        Self::new(&url, key.trim())
    }

    /// Joins path segments onto the API base url.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rc_file() {
        let rc = RcFile::parse(
            "# credentials\nurl: https://cds.climate.copernicus.eu/api\nkey: abc-123\nverify: 0\n",
        );
        assert_eq!(rc.url.as_deref(), Some("https://cds.climate.copernicus.eu/api"));
        assert_eq!(rc.key.as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_environment_takes_precedence() {
        let rc = RcFile {
            url: Some("https://rc.example/api".into()),
            key: Some("rc-key".into()),
        };
        let config = ClientConfig::resolve(
            Some("https://env.example/api".into()),
            Some("env-key".into()),
            Some(rc),
            Path::new("/tmp/.cdsapirc"),
        )
        .unwrap();
        assert_eq!(config.url.as_str(), "https://env.example/api");
        assert_eq!(config.key, "env-key");
    }

    #[test]
    fn test_defaults_url_and_requires_key() {
        let config = ClientConfig::resolve(
            None,
            None,
            Some(RcFile {
                url: None,
                key: Some("token".into()),
            }),
            Path::new("/tmp/.cdsapirc"),
        )
        .unwrap();
        assert_eq!(config.url.as_str(), DEFAULT_API_URL);

        let missing = ClientConfig::resolve(None, None, None, Path::new("/tmp/.cdsapirc"));
        assert!(matches!(missing, Err(ConfigError::MissingKey(_))));
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = ClientConfig::new("http://localhost:8080/api/", "k").unwrap();
        assert_eq!(
            config.endpoint("/retrieve/v1/jobs/42"),
            "http://localhost:8080/api/retrieve/v1/jobs/42"
        );
    }

    #[test]
    fn test_poll_backoff_is_capped() {
        let poll = PollSettings::default();
        assert_eq!(poll.next(Duration::from_secs(2)), Duration::from_secs(3));
        assert_eq!(poll.next(Duration::from_secs(100)), Duration::from_secs(120));
    }

    #[test]
    fn test_poll_backoff_with_extreme_settings() {
        let poll = PollSettings {
            initial: Duration::from_secs(600),
            max: Duration::from_secs(120),
            factor: f64::INFINITY,
        };
        assert_eq!(poll.first(), Duration::from_secs(120));
        assert_eq!(poll.next(Duration::from_secs(1)), Duration::from_secs(120));

        let poll = PollSettings {
            factor: f64::NAN,
            ..PollSettings::default()
        };
        assert_eq!(poll.next(Duration::from_secs(2)), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_missing_rc_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let rc = RcFile::load(&dir.path().join(".cdsapirc")).await.unwrap();
        assert!(rc.is_none());
    }
}
