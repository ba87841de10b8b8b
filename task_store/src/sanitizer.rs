//! Argument sanitizing
//!
//! Task arguments often carry credentials (`--spring.datasource.password=..`).
//! Values whose key looks sensitive are masked before they leave the store.

const REDACTED: &str = "******";

/// Key suffixes that mark a value as sensitive
const SENSITIVE_SUFFIXES: &[&str] = &[
    "password",
    "secret",
    "key",
    "token",
    "username",
    "url",
    "vcap_services",
];

/// Key fragments that mark a value as sensitive anywhere in the key
const SENSITIVE_FRAGMENTS: &[&str] = &["credentials"];

#[derive(Debug, Clone, Default)]
pub struct ArgumentSanitizer;

impl ArgumentSanitizer {
    pub fn new() -> Self {
        Self
    }

    /// Mask the value of a `key=value` or `--key=value` argument when its key is sensitive
    pub fn sanitize(&self, argument: &str) -> String {
        let Some((raw_key, _)) = argument.split_once('=') else {
            return argument.to_string();
        };

        let key = raw_key.trim().trim_start_matches("--");
        if self.is_sensitive(key) {
            format!("{}={}", raw_key, REDACTED)
        } else {
            argument.to_string()
        }
    }

    pub fn sanitize_arguments(&self, arguments: &[String]) -> Vec<String> {
        arguments.iter().map(|arg| self.sanitize(arg)).collect()
    }

    pub fn is_sensitive(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        SENSITIVE_SUFFIXES.iter().any(|suffix| key.ends_with(suffix))
            || SENSITIVE_FRAGMENTS.iter().any(|fragment| key.contains(fragment))
    }
}
