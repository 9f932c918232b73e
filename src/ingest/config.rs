// src/ingest/config.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::error::ConfigError;

const ENV_PATH: &str = "TICKERS_PATH";

/// Load the ticker list from an explicit path. Supports a JSON string
/// array or a TOML `symbols = [...]` table.
pub fn load_tickers_from(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::UnreadableTickers {
        path: path.to_path_buf(),
        source,
    })?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_tickers(&content, ext.as_str()).ok_or_else(|| ConfigError::UnsupportedTickerFormat {
        path: path.to_path_buf(),
    })
}

/// Load the ticker list using env var + fallbacks:
/// 1) $TICKERS_PATH
/// 2) config/tickers.json
/// 3) config/tickers.toml
pub fn load_tickers_default() -> Result<Vec<String>, ConfigError> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        return load_tickers_from(&PathBuf::from(p));
    }
    for candidate in ["config/tickers.json", "config/tickers.toml"] {
        let pb = PathBuf::from(candidate);
        if pb.exists() {
            return load_tickers_from(&pb);
        }
    }
    Err(ConfigError::MissingTickerFile)
}

fn parse_tickers(s: &str, hint_ext: &str) -> Option<Vec<String>> {
    // Try TOML first if hinted, JSON otherwise; fall back to the other.
    if hint_ext == "toml" {
        parse_toml(s).or_else(|| parse_json(s))
    } else {
        parse_json(s).or_else(|| parse_toml(s))
    }
    .map(clean_list)
}

fn parse_toml(s: &str) -> Option<Vec<String>> {
    #[derive(serde::Deserialize)]
    struct TomlTickers {
        symbols: Vec<String>,
    }
    toml::from_str::<TomlTickers>(s).ok().map(|t| t.symbols)
}

fn parse_json(s: &str) -> Option<Vec<String>> {
    serde_json::from_str::<Vec<String>>(s).ok()
}

/// Trim, drop empties, dedup. First-seen order is kept because the
/// catalog's feed order follows the ticker order.
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && seen.insert(t.to_string()) {
            out.push(t.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn dedup_trim_and_formats_work() {
        let json = r#"[" AAPL ", "", "MSFT", "MSFT", "AAPL"]"#;
        assert_eq!(
            parse_tickers(json, "json").unwrap(),
            vec!["AAPL".to_string(), "MSFT".to_string()]
        );

        let toml = r#"symbols = ["NVDA", "  TSLA  ", ""]"#;
        assert_eq!(
            parse_tickers(toml, "toml").unwrap(),
            vec!["NVDA".to_string(), "TSLA".to_string()]
        );
    }

    #[test]
    fn order_is_first_seen_not_sorted() {
        let json = r#"["ZM", "AAPL", "ZM", "MSFT"]"#;
        assert_eq!(
            parse_tickers(json, "json").unwrap(),
            vec!["ZM".to_string(), "AAPL".to_string(), "MSFT".to_string()]
        );
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Isolate CWD in a temp dir so the repo's config/ does not interfere
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_PATH);

        // No files in temp CWD -> missing
        assert!(matches!(
            load_tickers_default(),
            Err(ConfigError::MissingTickerFile)
        ));

        // Fallback path is picked up
        fs::create_dir_all(tmp.path().join("config")).unwrap();
        fs::write(tmp.path().join("config/tickers.json"), r#"["AAPL"]"#).unwrap();
        assert_eq!(load_tickers_default().unwrap(), vec!["AAPL".to_string()]);

        // Env var takes precedence
        let p_json = tmp.path().join("mine.json");
        fs::write(&p_json, r#"["NVDA"]"#).unwrap();
        env::set_var(ENV_PATH, p_json.display().to_string());
        assert_eq!(load_tickers_default().unwrap(), vec!["NVDA".to_string()]);
        env::remove_var(ENV_PATH);

        env::set_current_dir(&old).unwrap();
    }

    #[serial_test::serial]
    #[test]
    fn unreadable_and_garbage_paths_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.json");
        assert!(matches!(
            load_tickers_from(&missing),
            Err(ConfigError::UnreadableTickers { .. })
        ));

        let garbage = tmp.path().join("bad.json");
        fs::write(&garbage, "not a list at all").unwrap();
        assert!(matches!(
            load_tickers_from(&garbage),
            Err(ConfigError::UnsupportedTickerFormat { .. })
        ));
    }
}
