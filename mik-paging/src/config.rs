//! Runtime configuration.
//!
//! # Environment Variables
//!
//! | Variable                      | Default        | Description                   |
//! |-------------------------------|----------------|-------------------------------|
//! | `MIK_PAGING_MAX_CURSOR_SIZE`  | 4 KiB (4096)   | Maximum accepted token length |
//!
//! Invalid or missing values fall back to the default.
//!
//! ```
//! use mik_paging::PagingConfig;
//!
//! let vars = vec![("MIK_PAGING_MAX_CURSOR_SIZE".to_string(), "512".to_string())];
//! let config = PagingConfig::from_vars(&vars);
//! assert_eq!(config.max_cursor_bytes, 512);
//! ```

use serde::Deserialize;

/// Default maximum token length (4KB). Bounds the work done on untrusted input.
pub const DEFAULT_MAX_CURSOR_BYTES: usize = 4 * 1024;

/// Environment variable overriding [`PagingConfig::max_cursor_bytes`].
pub const ENV_MAX_CURSOR_SIZE: &str = "MIK_PAGING_MAX_CURSOR_SIZE";

/// Pagination settings shared by the codec and the query builder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct PagingConfig {
    /// Tokens longer than this are rejected before decoding.
    pub max_cursor_bytes: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            max_cursor_bytes: DEFAULT_MAX_CURSOR_BYTES,
        }
    }
}

impl PagingConfig {
    /// Set the maximum token length.
    #[must_use]
    pub const fn with_max_cursor_bytes(mut self, max: usize) -> Self {
        self.max_cursor_bytes = max;
        self
    }

    /// Read settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let vars: Vec<(String, String)> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Read settings from an explicit list of variables.
    #[must_use]
    pub fn from_vars(vars: &[(String, String)]) -> Self {
        let mut config = Self::default();
        if let Some(max) = lookup(vars, ENV_MAX_CURSOR_SIZE)
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            config.max_cursor_bytes = max;
        }
        config
    }
}

fn lookup<'a>(vars: &'a [(String, String)], name: &str) -> Option<&'a str> {
    vars.iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_default() {
        assert_eq!(PagingConfig::default().max_cursor_bytes, 4096);
        assert_eq!(PagingConfig::from_vars(&[]), PagingConfig::default());
    }

    #[test]
    fn test_from_vars_override() {
        let config = PagingConfig::from_vars(&vars(&[(ENV_MAX_CURSOR_SIZE, "1024")]));
        assert_eq!(config.max_cursor_bytes, 1024);
    }

    #[test]
    fn test_from_vars_invalid_falls_back() {
        for bad in ["", "abc", "-5", "0"] {
            let config = PagingConfig::from_vars(&vars(&[(ENV_MAX_CURSOR_SIZE, bad)]));
            assert_eq!(config.max_cursor_bytes, DEFAULT_MAX_CURSOR_BYTES, "input {bad:?}");
        }
    }

    #[test]
    fn test_toml() {
        let config: PagingConfig = toml::from_str("max_cursor_bytes = 256").unwrap();
        assert_eq!(config.max_cursor_bytes, 256);

        let config: PagingConfig = toml::from_str("").unwrap();
        assert_eq!(config, PagingConfig::default());

        assert!(toml::from_str::<PagingConfig>("unknown = 1").is_err());
    }
}
