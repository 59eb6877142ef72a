//! Runtime configuration from environment variables with code defaults.

use std::env;
use std::path::PathBuf;

/// Hosted service the client talks to unless `ANVAYA_API_URL` overrides it.
pub const DEFAULT_BASE_URL: &str = "https://healthcare-backend-dev.vercel.app";

/// Which credential store backend to open at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// The operating system's credential service.
    Keyring,
    /// A plain token file under the app state directory.
    File,
}

impl StoreKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "keyring" => Some(StoreKind::Keyring),
            "file" => Some(StoreKind::File),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub store: StoreKind,
    pub token_file: PathBuf,
}

impl Config {
    /// Read `ANVAYA_API_URL`, `ANVAYA_TOKEN_STORE` and `ANVAYA_TOKEN_FILE`.
    /// Defaults: the hosted service, the file backend, `~/.anvaya/token`.
    pub fn from_env() -> Self {
        let base_url = env::var("ANVAYA_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let store = env::var("ANVAYA_TOKEN_STORE")
            .ok()
            .and_then(|s| StoreKind::parse(&s))
            .unwrap_or(StoreKind::File);
        let token_file = env::var("ANVAYA_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_token_file());
        Self { base_url, store, token_file }
    }
}

fn default_token_file() -> PathBuf {
    // HOME on unix, USERPROFILE on windows; relative to CWD when neither is set
    let home = env::var("HOME").or_else(|_| env::var("USERPROFILE"));
    match home {
        Ok(h) => PathBuf::from(h).join(".anvaya").join("token"),
        Err(_) => PathBuf::from(".anvaya").join("token"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_kind_parsing() {
        assert_eq!(StoreKind::parse("keyring"), Some(StoreKind::Keyring));
        assert_eq!(StoreKind::parse("FILE"), Some(StoreKind::File));
        assert_eq!(StoreKind::parse("vault"), None);
    }

    #[test]
    fn default_token_file_lands_in_dot_anvaya() {
        let p = default_token_file();
        assert!(p.ends_with(PathBuf::from(".anvaya").join("token")), "got {:?}", p);
    }
}
