//! Naming rules for configuration environment variables.
//!
//! Plain settings map `site.name` to `SAFARI__SITE__NAME`; the `config`
//! crate reads those directly. Secrets are never written into config files:
//! a value of `"secret_from_env"` is replaced after loading from
//! `SAFARI_SECRET_SESSION_SECRET` or, failing that, `SESSION_SECRET`.

use serde_json::Value;
use std::env;
use tracing::warn;

pub const DEFAULT_PREFIX: &str = "SAFARI";
pub const SECRET_PREFIX: &str = "SAFARI_SECRET";
/// Placeholder in config files for values taken from the environment.
pub const SECRET_MARKER: &str = "secret_from_env";

const NESTING_SEPARATOR: &str = "__";

/// Prefix of plain config variables. `SAFARI_ENV_PREFIX` changes it, which
/// lets two deployments share one environment.
pub fn config_prefix() -> String {
    env::var("SAFARI_ENV_PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// `server.port` → `SAFARI__SERVER__PORT`
pub fn config_env_var(path: &str) -> String {
    let nested = path.split('.').collect::<Vec<_>>().join(NESTING_SEPARATOR);
    format!("{}{}{}", config_prefix(), NESTING_SEPARATOR, nested).to_uppercase()
}

/// Candidate names for a secret, most specific first:
/// `session.secret` → `SAFARI_SECRET_SESSION_SECRET`, `SESSION_SECRET`.
pub fn secret_env_vars(path: &str) -> [String; 2] {
    let flat = path.replace('.', "_").to_uppercase();
    [format!("{}_{}", SECRET_PREFIX, flat), flat]
}

pub fn is_secret_path(path: &str) -> bool {
    let path = path.to_lowercase();
    ["secret", "key", "password", "token"]
        .iter()
        .any(|word| path.contains(word))
}

/// Looks up the environment value for a config path.
pub fn lookup(path: &str) -> Option<String> {
    if is_secret_path(path) {
        secret_env_vars(path).into_iter().find_map(|name| env::var(name).ok())
    } else {
        env::var(config_env_var(path)).ok()
    }
}

/// Replaces every [`SECRET_MARKER`] string in `value` from the environment.
///
/// Returns how many values were replaced. Markers without a matching
/// variable are left in place and logged.
pub fn inject_env_vars(value: &mut Value) -> usize {
    fn visit(path: &mut Vec<String>, value: &mut Value) -> usize {
        match value {
            Value::Object(map) => map
                .iter_mut()
                .map(|(key, child)| {
                    path.push(key.clone());
                    let replaced = visit(path, child);
                    path.pop();
                    replaced
                })
                .sum(),
            Value::String(text) if text == SECRET_MARKER => {
                let dotted = path.join(".");
                match lookup(&dotted) {
                    Some(found) => {
                        *text = found;
                        1
                    }
                    None => {
                        warn!("{} asks for an environment value but none is set", dotted);
                        0
                    }
                }
            }
            _ => 0,
        }
    }

    visit(&mut Vec::new(), value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_env_var() {
        assert_eq!(config_env_var("server.host"), "SAFARI__SERVER__HOST");
        assert_eq!(config_env_var("api.base_url"), "SAFARI__API__BASE_URL");
    }

    #[test]
    fn test_secret_env_vars() {
        assert_eq!(
            secret_env_vars("session.secret"),
            ["SAFARI_SECRET_SESSION_SECRET".to_string(), "SESSION_SECRET".to_string()]
        );
    }

    #[test]
    fn test_is_secret_path() {
        assert!(is_secret_path("session.secret"));
        assert!(is_secret_path("api.token"));
        assert!(!is_secret_path("server.host"));
        assert!(!is_secret_path("booking.currency"));
    }

    #[test]
    fn test_inject_env_vars_replaces_marker() {
        std::env::set_var("SAFARI_SECRET_SESSION_SECRET", "from-the-environment");
        let mut value = json!({
            "session": { "secret": "secret_from_env" },
            "site": { "name": "x" },
            "logging": { "directory": "secret_from_env" }
        });
        assert_eq!(inject_env_vars(&mut value), 1);
        assert_eq!(value["session"]["secret"], "from-the-environment");
        assert_eq!(value["site"]["name"], "x");
        assert_eq!(value["logging"]["directory"], "secret_from_env");
        std::env::remove_var("SAFARI_SECRET_SESSION_SECRET");
    }
}
