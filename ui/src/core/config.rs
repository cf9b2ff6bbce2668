//! Deployment settings baked in at build time.
//!
//! The browser target has no process environment, so values are captured
//! with `option_env!` when the crate is compiled:
//!
//! | variable                 | default                      |
//! |--------------------------|------------------------------|
//! | `MEDILAB_API_BASE_URL`   | `http://localhost:5000/api`  |
//! | `MEDILAB_REQUIRE_AUTH`   | `true`                       |
//! | `MEDILAB_NOTICE_TTL_MS`  | `3000`                       |

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_NOTICE_TTL_MS: u64 = 3_000;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    /// When set, analysis and export need a session.
    pub require_auth: bool,
    pub notice_ttl_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            require_auth: true,
            notice_ttl_ms: DEFAULT_NOTICE_TTL_MS,
        }
    }
}

impl AppConfig {
    /// Settings captured from the build environment.
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| match key {
            "MEDILAB_API_BASE_URL" => option_env!("MEDILAB_API_BASE_URL"),
            "MEDILAB_REQUIRE_AUTH" => option_env!("MEDILAB_REQUIRE_AUTH"),
            "MEDILAB_NOTICE_TTL_MS" => option_env!("MEDILAB_NOTICE_TTL_MS"),
            _ => None,
        })
    }

    /// Builds a config from an arbitrary key lookup; unparsable values fall
    /// back to the defaults.
    pub fn from_lookup<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Self {
        let defaults = Self::default();
        let api_base_url = lookup("MEDILAB_API_BASE_URL")
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.api_base_url);
        let require_auth = lookup("MEDILAB_REQUIRE_AUTH")
            .and_then(parse_flag)
            .unwrap_or(defaults.require_auth);
        let notice_ttl_ms = lookup("MEDILAB_NOTICE_TTL_MS")
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(defaults.notice_ttl_ms);

        Self {
            api_base_url,
            require_auth,
            notice_ttl_ms,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lookup_yields_defaults() {
        assert_eq!(AppConfig::from_lookup(|_| None), AppConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_lookup(|key| match key {
            "MEDILAB_API_BASE_URL" => Some(" https://lab.example/api "),
            "MEDILAB_REQUIRE_AUTH" => Some("off"),
            "MEDILAB_NOTICE_TTL_MS" => Some("5000"),
            _ => None,
        });
        assert_eq!(config.api_base_url, "https://lab.example/api");
        assert!(!config.require_auth);
        assert_eq!(config.notice_ttl_ms, 5000);
    }

    #[test]
    fn garbage_values_fall_back() {
        let config = AppConfig::from_lookup(|key| match key {
            "MEDILAB_REQUIRE_AUTH" => Some("maybe"),
            "MEDILAB_NOTICE_TTL_MS" => Some("soon"),
            _ => None,
        });
        assert!(config.require_auth);
        assert_eq!(config.notice_ttl_ms, DEFAULT_NOTICE_TTL_MS);
    }
}
