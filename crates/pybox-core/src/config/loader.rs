//! Unified environment variable loading.
//!
//! Central place for env access so fallback logic is not repeated in
//! business code.

use std::env;

/// Load `.env` from the current directory into the process environment
/// (never overrides variables that are already set). Runs at most once.
pub fn load_dotenv() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let path = env::current_dir()
            .map(|d| d.join(".env"))
            .unwrap_or_else(|_| std::path::PathBuf::from(".env"));
        if let Ok(content) = std::fs::read_to_string(&path) {
            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some(eq_pos) = line.find('=') {
                    let key = line[..eq_pos].trim();
                    let mut value = line[eq_pos + 1..].trim();
                    // Strip inline comment (# not inside quotes)
                    if let Some(hash_pos) = value.find('#') {
                        let before_hash = value[..hash_pos].trim_end();
                        if !before_hash.contains('"') && !before_hash.contains('\'') {
                            value = before_hash;
                        }
                    }
                    let value = value.trim_matches('"').trim_matches('\'');
                    if !key.is_empty() && env::var(key).is_err() {
                        env::set_var(key, value);
                    }
                }
            }
        }
    });
}

/// Read `key`, falling back to `default` when unset or empty.
pub fn env_or(key: &str, default: impl FnOnce() -> String) -> String {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default(),
    }
}

/// Read `key`, returning `None` when unset or empty.
pub fn env_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Read `key` as u64, falling back to `default` on unset or unparseable.
pub fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

/// Read `key` as bool ("1"/"true"/"yes", case-insensitive).
pub fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => {
            let v = v.trim().to_lowercase();
            v == "1" || v == "true" || v == "yes"
        }
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_returns_default_for_empty() {
        env::set_var("PYBOX_TEST_EMPTY", "  ");
        assert_eq!(env_or("PYBOX_TEST_EMPTY", || "d".to_string()), "d");
        env::remove_var("PYBOX_TEST_EMPTY");
    }

    #[test]
    fn env_u64_ignores_garbage() {
        env::set_var("PYBOX_TEST_U64", "not-a-number");
        assert_eq!(env_u64("PYBOX_TEST_U64", 42), 42);
        env::remove_var("PYBOX_TEST_U64");
    }

    #[test]
    fn env_bool_accepts_yes() {
        env::set_var("PYBOX_TEST_BOOL", "YES");
        assert!(env_bool("PYBOX_TEST_BOOL", false));
        env::remove_var("PYBOX_TEST_BOOL");
    }
}
