use anyhow::{Result, anyhow};
use clap::Parser;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

const ENV_PREFIX: &str = "GUESTBOOK_";

/// Runtime settings. Precedence, lowest first: built-in defaults,
/// command-line flags, `GUESTBOOK_*` environment variables.
#[derive(Parser, Debug, Clone)]
#[command(name = "guestbook", about = "Guestbook web service")]
pub struct Config {
    /// Webserver port
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// SQLite database holding the entries
    #[arg(long, default_value = "sqlite:data/guestbook.db")]
    pub database_url: String,

    /// Maximum open database connections
    #[arg(long, default_value_t = 25)]
    pub db_max_connections: u32,

    /// Separate SQLite database for sessions; shares the entries database if unset
    #[arg(long)]
    pub session_database_url: Option<String>,

    /// Hours of inactivity after which a session expires
    #[arg(long, default_value_t = 24)]
    pub session_lifetime_hours: i64,

    /// Only send the session cookie over HTTPS
    #[arg(long)]
    pub secure_cookies: bool,

    /// Directory containing the built frontend (index.html, assets/, img/)
    #[arg(long, default_value = "frontend/dist")]
    pub frontend_dir: PathBuf,

    /// Upper bound on the time spent handling a single request
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config::parse_from(["guestbook"])
    }
}

impl Config {
    /// Flags from the command line, then the process environment on top.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Config::parse().with_env(|key| std::env::var(key).ok())
    }

    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        overlay(&mut self.port, "port", &lookup)?;
        overlay(&mut self.database_url, "database-url", &lookup)?;
        overlay(&mut self.db_max_connections, "db-max-connections", &lookup)?;
        overlay(&mut self.session_lifetime_hours, "session-lifetime-hours", &lookup)?;
        overlay(&mut self.secure_cookies, "secure-cookies", &lookup)?;
        overlay(&mut self.frontend_dir, "frontend-dir", &lookup)?;
        overlay(&mut self.request_timeout_secs, "request-timeout-secs", &lookup)?;

        if let Some(url) = lookup(&env_key("session-database-url")) {
            self.session_database_url = Some(url);
        }

        Ok(self)
    }
}

fn env_key(name: &str) -> String {
    format!("{ENV_PREFIX}{}", name.replace('-', "_").to_uppercase())
}

fn overlay<T>(slot: &mut T, name: &str, lookup: &impl Fn(&str) -> Option<String>) -> Result<()>
where
    T: FromStr,
    T::Err: Display,
{
    let key = env_key(name);
    if let Some(value) = lookup(&key) {
        *slot = value
            .parse()
            .map_err(|e| anyhow!("Invalid {key} value {value:?}: {e}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "sqlite:data/guestbook.db");
        assert_eq!(config.db_max_connections, 25);
        assert_eq!(config.session_lifetime_hours, 24);
        assert!(!config.secure_cookies);
        assert_eq!(config.session_database_url, None);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::parse_from(["guestbook", "--port", "9000", "--secure-cookies"]);
        assert_eq!(config.port, 9000);
        assert!(config.secure_cookies);
    }

    #[test]
    fn env_overrides_flags() {
        let flags = ["guestbook", "--port", "9000", "--db-max-connections", "5"];
        let config = Config::parse_from(flags)
            .with_env(env(&[
                ("GUESTBOOK_PORT", "9100"),
                ("GUESTBOOK_SESSION_DATABASE_URL", "sqlite:data/sessions.db"),
            ]))
            .unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(
            config.session_database_url.as_deref(),
            Some("sqlite:data/sessions.db")
        );
    }

    #[test]
    fn malformed_env_value_is_an_error() {
        let err = Config::default()
            .with_env(env(&[("GUESTBOOK_PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("GUESTBOOK_PORT"));
    }
}
