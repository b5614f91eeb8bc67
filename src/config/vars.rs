//! Environment variable interpolation for config files.
//!
//! Supported syntax:
//! - `$VAR` or `${VAR}`: value of VAR, error if unset
//! - `${VAR:-default}`: default if VAR is unset or empty
//! - `${VAR-default}`: default only if VAR is unset
//! - `$$`: literal `$`

use regex::{Captures, Regex};
use std::env;
use std::sync::LazyLock;

use crate::error::ConfigError;

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \$\$
        |
        \$\{
            (?P<braced>[A-Za-z_][A-Za-z0-9_]*)
            (?:
                (?P<op>:?-)
                (?P<default>[^}]*)
            )?
        \}
        |
        \$(?P<bare>[A-Za-z_][A-Za-z0-9_]*)
        ",
    )
    .expect("Invalid regex pattern")
});

/// Substitute environment variables in `input`.
///
/// Every unresolvable reference is collected, so a single error lists all
/// missing variables at once.
pub fn interpolate(input: &str) -> Result<String, ConfigError> {
    interpolate_with(input, |name| env::var(name).ok())
}

/// Substitute variables using `lookup` instead of the process environment.
pub fn interpolate_with<F>(input: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut errors = Vec::new();

    let text = ENV_VAR_PATTERN.replace_all(input, |caps: &Captures| {
        let whole = &caps[0];
        if whole == "$$" {
            return "$".to_string();
        }

        let name = caps
            .name("braced")
            .or_else(|| caps.name("bare"))
            .map(|m| m.as_str())
            .unwrap_or_default();
        let op = caps.name("op").map(|m| m.as_str());
        let default = caps.name("default").map(|m| m.as_str());

        match (lookup(name), default) {
            (Some(value), _) if value.contains(['\n', '\r']) => {
                errors.push(format!(
                    "environment variable '{name}' contains newlines, which is not allowed"
                ));
                whole.to_string()
            }
            (Some(value), Some(default)) if value.is_empty() && op == Some(":-") => {
                default.to_string()
            }
            (Some(value), _) => value,
            (None, Some(default)) => default.to_string(),
            (None, None) => {
                errors.push(format!("environment variable '{name}' is not set"));
                whole.to_string()
            }
        }
    });

    if errors.is_empty() {
        Ok(text.into_owned())
    } else {
        Err(ConfigError::EnvInterpolation {
            message: errors.join("\n"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_bare_and_braced() {
        let vars = lookup(&[("BUCKET", "landing"), ("ENV", "prod")]);
        let text = interpolate_with("s3://$BUCKET/${ENV}/in", vars).unwrap();
        assert_eq!(text, "s3://landing/prod/in");
    }

    #[test]
    fn test_defaults() {
        let vars = lookup(&[("EMPTY", "")]);
        assert_eq!(
            interpolate_with("${MISSING:-a} ${EMPTY:-b} ${EMPTY-c} ${MISSING-d}", vars).unwrap(),
            "a b  d"
        );
    }

    #[test]
    fn test_all_missing_variables_reported() {
        let err = interpolate_with("$FIRST and ${SECOND}", lookup(&[])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'FIRST' is not set"), "{message}");
        assert!(message.contains("'SECOND' is not set"), "{message}");
    }

    #[test]
    fn test_newline_rejected() {
        let err = interpolate_with("$MULTI", lookup(&[("MULTI", "a\nb")])).unwrap_err();
        assert!(err.to_string().contains("newlines"));
    }

    #[test]
    fn test_escape_sequence() {
        assert_eq!(interpolate_with("cost: $$5", lookup(&[])).unwrap(), "cost: $5");
    }

    #[test]
    fn test_process_environment() {
        // PATH is set in any environment that can run the tests.
        let text = interpolate("${PATH}").unwrap();
        assert!(!text.is_empty());
    }
}
