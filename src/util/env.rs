//! Environment helpers: centralized dotenv loading and ergonomic getters.
//! Call `init_env()` once early in each binary (or rely on lazy Once).
use std::str::FromStr;
use std::sync::Once;
use tracing::{debug, warn};

static INIT: Once = Once::new();

/// Load .env exactly once. Falls back to the crate root when the working
/// directory has none. Safe to call many times.
pub fn init_env() {
    INIT.call_once(|| {
        if dotenv::dotenv().is_ok() {
            return;
        }
        let candidate = format!("{}/.env", env!("CARGO_MANIFEST_DIR"));
        if dotenv::from_filename(&candidate).is_ok() {
            debug!(target = "env", path = %candidate, "loaded .env from crate root");
        }
    });
}

/// Get optional env var (None if unset or empty).
pub fn env_opt(key: &str) -> Option<String> {
    init_env();
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

/// Get parsed value with default fallback. Unparseable values are logged and ignored.
pub fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match env_opt(key) {
        Some(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                warn!(target = "env", key, value = %raw, "unparseable env value; using default");
                default
            }
        },
        None => default,
    }
}

/// Boolean flag; accepts 1/true/on/yes (case-insensitive) as true.
pub fn env_flag(key: &str, default: bool) -> bool {
    match env_opt(key) {
        Some(raw) => {
            let v = raw.to_ascii_lowercase();
            matches!(v.as_str(), "1" | "true" | "on" | "yes")
        }
        None => default,
    }
}

/// Parse a `name:value,name:value` header list. Entries without a colon are skipped.
pub fn parse_header_list(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let (k, v) = pair.split_once(':')?;
            let k = k.trim();
            if k.is_empty() {
                return None;
            }
            Some((k.to_string(), v.trim().to_string()))
        })
        .collect()
}

/// Header list read from `key`; empty when unset.
pub fn env_headers(key: &str) -> Vec<(String, String)> {
    env_opt(key)
        .map(|raw| parse_header_list(&raw))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_list_skips_malformed_entries() {
        let parsed = parse_header_list("x-channel-id: 1, broken ,:nope, x-store:main");
        assert_eq!(
            parsed,
            vec![
                ("x-channel-id".to_string(), "1".to_string()),
                ("x-store".to_string(), "main".to_string()),
            ]
        );
    }

    #[test]
    fn header_values_may_contain_colons() {
        let parsed = parse_header_list("x-origin:https://shop.example");
        assert_eq!(parsed[0].1, "https://shop.example");
    }

    #[test]
    fn parse_falls_back_on_garbage() {
        std::env::set_var("STOREFRONT_NAV_TEST_PARSE", "twenty");
        assert_eq!(env_parse("STOREFRONT_NAV_TEST_PARSE", 20u64), 20);
        std::env::set_var("STOREFRONT_NAV_TEST_PARSE", "45");
        assert_eq!(env_parse("STOREFRONT_NAV_TEST_PARSE", 20u64), 45);
    }

    #[test]
    fn flag_accepts_common_truthy_values() {
        std::env::set_var("STOREFRONT_NAV_TEST_FLAG", "On");
        assert!(env_flag("STOREFRONT_NAV_TEST_FLAG", false));
        std::env::set_var("STOREFRONT_NAV_TEST_FLAG", "0");
        assert!(!env_flag("STOREFRONT_NAV_TEST_FLAG", true));
        assert!(env_flag("STOREFRONT_NAV_TEST_FLAG_UNSET", true));
    }
}
