//! `${VAR}` and `${VAR:-default}` expansion in configuration strings.

use crate::ConfigError;

/// Variable referenced by a string but missing from the environment.
struct Unset(String);

/// Expand environment references in `value`.
///
/// Only the braced forms are recognized; a string without `${` is returned
/// as is, so literal `$` characters (in URLs, for example) survive.
/// `field` names the configuration key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let lookup = |name: &str| -> Result<Option<String>, Unset> {
        std::env::var(name).map(Some).map_err(|_| Unset(name.to_owned()))
    };

    shellexpand::env_with_context(value, lookup)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.cause.0),
        })
}

/// Expand an optional value in place.
pub(crate) fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(v) = value.as_deref() {
        *value = Some(expand_env(v, field)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_env("127.0.0.1", "server.host").unwrap(), "127.0.0.1");
        assert_eq!(
            expand_env("https://cdn.example/$ref", "assets.cdn").unwrap(),
            "https://cdn.example/$ref"
        );
    }

    #[test]
    fn test_expand_set_variable() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("RV_TEST_EXPAND_HOST", "0.0.0.0");
        }
        assert_eq!(
            expand_env("${RV_TEST_EXPAND_HOST}", "server.host").unwrap(),
            "0.0.0.0"
        );
        assert_eq!(
            expand_env("${RV_TEST_EXPAND_HOST:-localhost}", "server.host").unwrap(),
            "0.0.0.0"
        );
        unsafe {
            std::env::remove_var("RV_TEST_EXPAND_HOST");
        }
    }

    #[test]
    fn test_default_for_unset_variable() {
        assert_eq!(
            expand_env("${RV_TEST_EXPAND_UNSET:-slides}/decks", "deck.root").unwrap(),
            "slides/decks"
        );
    }

    #[test]
    fn test_unset_variable_error() {
        let err = expand_env("${RV_TEST_EXPAND_MISSING}", "assets.cdn").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("RV_TEST_EXPAND_MISSING"));
        assert!(message.contains("assets.cdn"));
    }

    #[test]
    fn test_expand_opt() {
        let mut none = None;
        expand_opt(&mut none, "deck.root").unwrap();
        assert_eq!(none, None);

        let mut some = Some("${RV_TEST_EXPAND_OPT:-talks}".to_owned());
        expand_opt(&mut some, "deck.root").unwrap();
        assert_eq!(some.as_deref(), Some("talks"));
    }
}
