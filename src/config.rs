use crate::error::ConfigError;
use crate::pimp::MatchPolicy;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "configs/config.json";

pub struct Config {
    pub discord_token: String,
    pub grok_api_key: String,
    pub twitter: TwitterCredentials,
    pub grok_endpoint: String,
    pub grok_model: String,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    pub cache_capacity: usize,
    pub cache_fallbacks: bool,
    pub match_policy: MatchPolicy,
    pub http_addr: String,
    pub twitter_api_base: String,
}

/// All four are required at startup. Trend lookups use app-only auth, so
/// the access token pair is carried but not sent.
#[derive(Clone)]
#[allow(dead_code)]
pub struct TwitterCredentials {
    pub api_key: String,
    pub api_secret_key: String,
    pub access_token: String,
    pub access_token_secret: String,
}

/// Values from `config.json`. Keys match the environment variable names.
#[derive(Deserialize, Default)]
#[serde(transparent)]
pub struct FileConfig(HashMap<String, serde_json::Value>);

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn get(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl Config {
    /// Reads `.env`-populated environment variables on top of the optional
    /// JSON config file. Aborts on the first missing credential.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("BOT_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let path = Path::new(&path);
        let file = if path.exists() {
            FileConfig::load(path)?
        } else {
            FileConfig::default()
        };

        Self::from_sources(&file, |key| env::var(key).ok())
    }

    pub fn from_sources<F>(file: &FileConfig, env_lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| {
            env_lookup(key)
                .or_else(|| file.get(key))
                .filter(|v| !v.trim().is_empty())
        };
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let discord_token = required("DISCORD_TOKEN")?;
        let grok_api_key = required("GROK_API_KEY")?;
        let twitter = TwitterCredentials {
            api_key: required("TWITTER_API_KEY")?,
            api_secret_key: required("TWITTER_API_SECRET_KEY")?,
            access_token: required("TWITTER_ACCESS_TOKEN")?,
            access_token_secret: required("TWITTER_ACCESS_TOKEN_SECRET")?,
        };

        let grok_endpoint = lookup("GROK_ENDPOINT")
            .unwrap_or_else(|| "https://api.x.ai/v1/chat/completions".to_string());
        let grok_model = lookup("GROK_MODEL").unwrap_or_else(|| "grok-2".to_string());
        let max_tokens = parse_or("GROK_MAX_TOKENS", lookup("GROK_MAX_TOKENS"), 150)?;
        let timeout_secs = parse_or("GROK_TIMEOUT_SECS", lookup("GROK_TIMEOUT_SECS"), 15)?;

        let cache_capacity: usize = parse_or("CACHE_CAPACITY", lookup("CACHE_CAPACITY"), 100)?;
        if cache_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "CACHE_CAPACITY",
                value: "0".to_string(),
            });
        }
        let cache_fallbacks = parse_or("CACHE_FALLBACKS", lookup("CACHE_FALLBACKS"), true)?;

        let match_policy = match lookup("CANNED_MATCH") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "CANNED_MATCH",
                value,
            })?,
            None => MatchPolicy::default(),
        };

        Ok(Self {
            discord_token,
            grok_api_key,
            twitter,
            grok_endpoint,
            grok_model,
            max_tokens,
            request_timeout: Duration::from_secs(timeout_secs),
            cache_capacity,
            cache_fallbacks,
            match_policy,
            http_addr: lookup("HTTP_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string()),
            twitter_api_base: lookup("TWITTER_API_BASE")
                .unwrap_or_else(|| "https://api.twitter.com".to_string()),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: v }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DISCORD_TOKEN", "discord"),
            ("GROK_API_KEY", "grok"),
            ("TWITTER_API_KEY", "tk"),
            ("TWITTER_API_SECRET_KEY", "ts"),
            ("TWITTER_ACCESS_TOKEN", "at"),
            ("TWITTER_ACCESS_TOKEN_SECRET", "ats"),
        ])
    }

    #[test]
    fn test_defaults_applied() {
        let vars = credentials();
        let config =
            Config::from_sources(&FileConfig::default(), |k| vars.get(k).map(|v| v.to_string()))
                .unwrap();

        assert_eq!(config.grok_model, "grok-2");
        assert_eq!(config.max_tokens, 150);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.cache_capacity, 100);
        assert!(config.cache_fallbacks);
        assert_eq!(config.match_policy, MatchPolicy::Sanitized);
    }

    #[test]
    fn test_missing_credential_fails_fast() {
        let mut vars = credentials();
        vars.remove("TWITTER_ACCESS_TOKEN_SECRET");
        let err =
            Config::from_sources(&FileConfig::default(), |k| vars.get(k).map(|v| v.to_string()))
                .err()
                .unwrap();
        assert!(matches!(err, ConfigError::Missing("TWITTER_ACCESS_TOKEN_SECRET")));
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let mut vars = credentials();
        vars.insert("GROK_API_KEY", "  ");
        let err =
            Config::from_sources(&FileConfig::default(), |k| vars.get(k).map(|v| v.to_string()))
                .err()
                .unwrap();
        assert!(matches!(err, ConfigError::Missing("GROK_API_KEY")));
    }

    #[test]
    fn test_env_overrides_file() {
        let file: FileConfig = serde_json::from_str(
            r#"{
                "DISCORD_TOKEN": "from-file",
                "GROK_API_KEY": "grok",
                "TWITTER_API_KEY": "tk",
                "TWITTER_API_SECRET_KEY": "ts",
                "TWITTER_ACCESS_TOKEN": "at",
                "TWITTER_ACCESS_TOKEN_SECRET": "ats",
                "CACHE_CAPACITY": 5
            }"#,
        )
        .unwrap();

        let config = Config::from_sources(&file, |k| {
            (k == "DISCORD_TOKEN").then(|| "from-env".to_string())
        })
        .unwrap();

        assert_eq!(config.discord_token, "from-env");
        assert_eq!(config.grok_api_key, "grok");
        assert_eq!(config.cache_capacity, 5);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut vars = credentials();
        vars.insert("CACHE_CAPACITY", "0");
        let err =
            Config::from_sources(&FileConfig::default(), |k| vars.get(k).map(|v| v.to_string()))
                .err()
                .unwrap();
        assert!(matches!(err, ConfigError::Invalid { key: "CACHE_CAPACITY", .. }));

        vars.insert("CACHE_CAPACITY", "10");
        vars.insert("CANNED_MATCH", "sometimes");
        let err =
            Config::from_sources(&FileConfig::default(), |k| vars.get(k).map(|v| v.to_string()))
                .err()
                .unwrap();
        assert!(matches!(err, ConfigError::Invalid { key: "CANNED_MATCH", .. }));
    }
}
