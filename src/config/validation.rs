//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use regex::Regex;

/// Minimum length for a bearer token.
const MIN_TOKEN_LENGTH: usize = 30;

/// Maximum posts the API returns per page.
const MAX_PAGE_SIZE: u32 = 200;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_user(&config.account.user)?;
    validate_credentials(config)?;
    validate_options(config)?;

    Ok(())
}

/// Validate the targeted user reference (numeric ID or screen name).
pub fn validate_user(user: &str) -> Result<()> {
    let user = user.trim().trim_start_matches('@');

    if user.is_empty() {
        return Err(Error::MissingConfig(
            "user (set TWITTER_ID or pass --user)".to_string(),
        ));
    }

    // Screen names: 1-15 chars, alphanumeric and underscores. IDs: digits.
    let pattern = Regex::new(r"^(\d+|[A-Za-z0-9_]{1,15})$").unwrap();
    if !pattern.is_match(user) {
        return Err(Error::ConfigValidation {
            field: "user".to_string(),
            message: format!(
                "'{}' is neither a numeric user ID nor a valid screen name",
                user
            ),
        });
    }

    Ok(())
}

/// Require either a bearer token or a consumer key/secret pair.
pub fn validate_credentials(config: &Config) -> Result<()> {
    let creds = &config.credentials;

    if let Some(token) = non_empty(&creds.bearer_token) {
        return validate_token(token);
    }

    match (non_empty(&creds.consumer_key), non_empty(&creds.consumer_secret)) {
        (Some(key), Some(secret)) => {
            reject_placeholder("consumer_key", key)?;
            reject_placeholder("consumer_secret", secret)?;
            Ok(())
        }
        (Some(_), None) => Err(Error::MissingConfig("consumer_secret".to_string())),
        (None, Some(_)) => Err(Error::MissingConfig("consumer_key".to_string())),
        (None, None) => Err(Error::MissingConfig(
            "credentials (BEARER_TOKEN, or CONSUMER_KEY and CONSUMER_SECRET)".to_string(),
        )),
    }
}

/// Validate a bearer token.
pub fn validate_token(token: &str) -> Result<()> {
    if token.len() < MIN_TOKEN_LENGTH {
        return Err(Error::ConfigValidation {
            field: "bearer_token".to_string(),
            message: format!(
                "Token must be at least {} characters (got {})",
                MIN_TOKEN_LENGTH,
                token.len()
            ),
        });
    }

    reject_placeholder("bearer_token", token)
}

/// Validate numeric tuning options.
pub fn validate_options(config: &Config) -> Result<()> {
    let options = &config.options;

    if options.queue_size == 0 {
        return Err(positive("queue_size"));
    }
    if options.max_depth == 0 {
        return Err(positive("max_depth"));
    }
    if options.chunk_size == 0 {
        return Err(positive("chunk_size"));
    }
    if options.page_size == 0 || options.page_size > MAX_PAGE_SIZE {
        return Err(Error::ConfigValidation {
            field: "page_size".to_string(),
            message: format!("Must be between 1 and {}", MAX_PAGE_SIZE),
        });
    }

    Ok(())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn reject_placeholder(field: &str, value: &str) -> Result<()> {
    let lower = value.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_") {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: "Value appears to be a placeholder. Please provide your actual credential."
                .to_string(),
        });
    }
    Ok(())
}

fn positive(field: &str) -> Error {
    Error::ConfigValidation {
        field: field.to_string(),
        message: "Must be greater than zero".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_token(token: &str) -> Config {
        let mut config = Config::default();
        config.account.user = "19701628".to_string();
        config.credentials.bearer_token = Some(token.to_string());
        config
    }

    #[test]
    fn test_valid_users() {
        assert!(validate_user("19701628").is_ok());
        assert!(validate_user("@BBC").is_ok());
        assert!(validate_user("some_handle").is_ok());
    }

    #[test]
    fn test_invalid_users() {
        assert!(matches!(validate_user(""), Err(Error::MissingConfig(_))));
        assert!(validate_user("has space").is_err());
        assert!(validate_user("way_too_long_screen_name").is_err());
    }

    #[test]
    fn test_bearer_token_accepted() {
        let config = config_with_token("AAAAAAAAAAAAAAAAAAAAAMLheAAAAAAA0%2BuSeid");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let config = config_with_token("replaceme_replaceme_replaceme_replaceme");
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_missing_credentials() {
        let mut config = Config::default();
        config.account.user = "19701628".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(Error::MissingConfig(_))
        ));

        config.credentials.consumer_key = Some("xvz1evFS4wEEPTGEFPHBog".to_string());
        assert!(matches!(
            validate_config(&config),
            Err(Error::MissingConfig(field)) if field == "consumer_secret"
        ));

        config.credentials.consumer_secret =
            Some("L8qq9PZyRg6ieKGEKhZolGC0vJWLw8iEJ88DRdyOg".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_options() {
        let mut config = config_with_token("AAAAAAAAAAAAAAAAAAAAAMLheAAAAAAA0%2BuSeid");
        config.options.queue_size = 0;
        assert!(validate_config(&config).is_err());

        config.options.queue_size = 1;
        config.options.page_size = 800;
        assert!(validate_config(&config).is_err());
    }
}
