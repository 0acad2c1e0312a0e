use anyhow::{Context, Result, anyhow, bail};
use chrono::Duration;
use tracing::warn;

pub const DEFAULT_JWT_SECRET: &str = "change-me-in-production";
/// Upper bound for `JWT_EXPIRES_IN`.
pub const MAX_TOKEN_TTL_DAYS: i64 = 365;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expires_in: Duration,
    pub cors_origin: String,
    pub request_timeout: std::time::Duration,
    pub seed_demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_expires_in: Duration::hours(24),
            cors_origin: "*".to_string(),
            request_timeout: std::time::Duration::from_secs(30),
            seed_demo_data: false,
        }
    }
}

impl Config {
    /// Loads `.env` (if present) and then reads the process environment.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenv::dotenv() {
            if !e.not_found() {
                return Err(anyhow!(e).context("Failed to load .env file"));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            None => defaults.port,
        };

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if secret.is_empty() => bail!("JWT_SECRET must not be empty"),
            Some(secret) => secret,
            None => {
                warn!("JWT_SECRET not set, using the built-in development secret");
                defaults.jwt_secret
            }
        };

        let jwt_expires_in = match lookup("JWT_EXPIRES_IN") {
            Some(raw) => parse_duration(&raw)
                .with_context(|| format!("JWT_EXPIRES_IN is invalid: {:?}", raw))?,
            None => defaults.jwt_expires_in,
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => std::time::Duration::from_secs(raw.trim().parse::<u64>().with_context(
                || format!("REQUEST_TIMEOUT_SECS must be a number of seconds, got {:?}", raw),
            )?),
            None => defaults.request_timeout,
        };

        let seed_demo_data = match lookup("SEED_DEMO_DATA") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("SEED_DEMO_DATA must be a boolean, got {:?}", raw))?,
            None => defaults.seed_demo_data,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            jwt_secret,
            jwt_expires_in,
            cors_origin: lookup("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            request_timeout,
            seed_demo_data,
        })
    }
}

/// Accepts `<n>` (seconds) or `<n>` followed by `s`, `m`, `h` or `d`, up to
/// [`MAX_TOKEN_TTL_DAYS`].
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        Some((idx, _)) => raw.split_at(idx),
        None => (raw, "s"),
    };

    let value: i64 = digits
        .parse()
        .with_context(|| format!("expected a number in {:?}", raw))?;
    if value <= 0 {
        bail!("duration must be positive");
    }

    let duration = match unit {
        "s" => Duration::try_seconds(value),
        "m" => Duration::try_minutes(value),
        "h" => Duration::try_hours(value),
        "d" => Duration::try_days(value),
        other => bail!("unknown duration unit {:?}", other),
    }
    .ok_or_else(|| anyhow!("duration {:?} is out of range", raw))?;

    if duration > max_token_ttl() {
        bail!(
            "duration {:?} exceeds the maximum of {} days",
            raw,
            MAX_TOKEN_TTL_DAYS
        );
    }
    Ok(duration)
}

fn max_token_ttl() -> Duration {
    Duration::days(MAX_TOKEN_TTL_DAYS)
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => bail!("expected true or false"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.jwt_secret, DEFAULT_JWT_SECRET);
        assert_eq!(config.jwt_expires_in, Duration::hours(24));
        assert_eq!(config.cors_origin, "*");
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn test_reads_overrides() {
        let config = config_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8081"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRES_IN", "30m"),
            ("CORS_ORIGIN", "http://localhost:3001"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("SEED_DEMO_DATA", "true"),
        ])
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8081);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.jwt_expires_in, Duration::minutes(30));
        assert_eq!(config.cors_origin, "http://localhost:3001");
        assert_eq!(config.request_timeout, std::time::Duration::from_secs(5));
        assert!(config.seed_demo_data);
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(config_from(&[("PORT", "http")]).is_err());
        assert!(config_from(&[("PORT", "70000")]).is_err());
    }

    #[test]
    fn test_rejects_empty_secret() {
        assert!(config_from(&[("JWT_SECRET", "")]).is_err());
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("3600").unwrap(), Duration::seconds(3600));
        assert_eq!(parse_duration("45s").unwrap(), Duration::seconds(45));
        assert_eq!(parse_duration("15m").unwrap(), Duration::minutes(15));
        assert_eq!(parse_duration("24h").unwrap(), Duration::hours(24));
        assert_eq!(parse_duration("7d").unwrap(), Duration::days(7));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("h").is_err());
        assert!(parse_duration("0h").is_err());
        assert!(parse_duration("10w").is_err());
        assert!(parse_duration("1.5h").is_err());
    }

    #[test]
    fn test_parse_duration_rejects_out_of_range_values() {
        assert!(parse_duration("999999999999999d").is_err());
        assert!(parse_duration("100000000d").is_err());
        assert!(parse_duration("366d").is_err());
        assert_eq!(parse_duration("365d").unwrap(), Duration::days(365));
    }

    #[test]
    fn test_huge_token_lifetime_fails_config() {
        let err = config_from(&[("JWT_EXPIRES_IN", "999999999999999d")]).unwrap_err();
        assert!(format!("{:#}", err).contains("JWT_EXPIRES_IN"));
        assert!(config_from(&[("JWT_EXPIRES_IN", "100000000d")]).is_err());
    }
}
