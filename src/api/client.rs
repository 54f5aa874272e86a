//! Twitter v1.1 REST API HTTP client.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::{header, Client, Response, StatusCode};
use url::Url;

use crate::api::auth::{bearer_header, encode_credential};
use crate::api::types::{ErrorResponse, TokenResponse, Tweet};
use crate::config::CredentialsConfig;
use crate::error::{Error, Result};

/// API base URL.
pub const API_BASE: &str = "https://api.twitter.com/";

/// Fallback wait when a 429 carries no reset header (one rate-limit window).
const DEFAULT_RATE_LIMIT_WAIT: u64 = 15 * 60;

/// The account whose posts are requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    Id(u64),
    ScreenName(String),
}

impl UserRef {
    /// Digits are treated as a user ID, anything else as a screen name.
    pub fn parse(input: &str) -> Self {
        let input = input.trim().trim_start_matches('@');
        match input.parse::<u64>() {
            Ok(id) => UserRef::Id(id),
            Err(_) => UserRef::ScreenName(input.to_string()),
        }
    }

    fn query_pair(&self) -> (&'static str, String) {
        match self {
            UserRef::Id(id) => ("user_id", id.to_string()),
            UserRef::ScreenName(name) => ("screen_name", name.clone()),
        }
    }
}

/// Authenticated API client.
#[derive(Debug, Clone)]
pub struct TwitterApi {
    client: Client,
    base_url: Url,
    token: String,
}

impl TwitterApi {
    /// Build a client against the public API, exchanging consumer credentials
    /// for a bearer token if needed.
    pub async fn connect(credentials: &CredentialsConfig, timeout: Duration) -> Result<Self> {
        Self::connect_to(API_BASE, credentials, timeout).await
    }

    /// Build a client against an arbitrary base URL.
    pub async fn connect_to(
        base_url: &str,
        credentials: &CredentialsConfig,
        timeout: Duration,
    ) -> Result<Self> {
        let client = build_http_client(timeout)?;
        let base_url = parse_base_url(base_url)?;

        let token = match credentials.bearer_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => {
                let key = credentials
                    .consumer_key
                    .as_deref()
                    .ok_or_else(|| Error::MissingConfig("consumer_key".to_string()))?;
                let secret = credentials
                    .consumer_secret
                    .as_deref()
                    .ok_or_else(|| Error::MissingConfig("consumer_secret".to_string()))?;
                obtain_bearer_token(&client, &base_url, key, secret).await?
            }
        };

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// The underlying HTTP client, shared with the media downloader.
    pub fn http_client(&self) -> Client {
        self.client.clone()
    }

    /// Make an authenticated GET request.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = self.base_url.join(path)?;

        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .header(header::AUTHORIZATION, bearer_header(&self.token))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited(rate_limit_wait(&response)));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Auth error response: {}", body);
            return Err(Error::Authentication(format!(
                "HTTP {}: {}",
                status,
                describe_error_body(&body).unwrap_or_else(|| "Authentication failed".to_string())
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(format!(
                "HTTP {}: {}",
                status,
                describe_error_body(&body).unwrap_or(body)
            )));
        }

        Ok(response)
    }

    async fn get_tweets(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<Tweet>> {
        let response = self.get(path, query).await?;
        let text = response.text().await?;
        tracing::debug!("{} response length: {} bytes", path, text.len());

        serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse {}: {} - Response: {}",
                path,
                e,
                preview(&text, 500)
            ))
        })
    }

    /// Get a page of posts liked by `user`, newest first, at or below `max_id`.
    pub async fn get_favorites(
        &self,
        user: &UserRef,
        count: u32,
        max_id: Option<u64>,
    ) -> Result<Vec<Tweet>> {
        let query = page_query(user, count, max_id, &[]);
        self.get_tweets("1.1/favorites/list.json", &query).await
    }

    /// Get a page of posts authored (or reposted) by `user`.
    pub async fn get_user_timeline(
        &self,
        user: &UserRef,
        count: u32,
        max_id: Option<u64>,
    ) -> Result<Vec<Tweet>> {
        let query = page_query(user, count, max_id, &[("include_rts", "true")]);
        self.get_tweets("1.1/statuses/user_timeline.json", &query).await
    }
}

/// Build the shared HTTP client with an overall per-request timeout.
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(concat!("twitter-media-dl/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))
}

/// At most `max_chars` characters of a response body, for error messages.
fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    if base_url.ends_with('/') {
        Ok(Url::parse(base_url)?)
    } else {
        Ok(Url::parse(&format!("{}/", base_url))?)
    }
}

/// Exchange consumer credentials for an app-only bearer token.
async fn obtain_bearer_token(
    client: &Client,
    base_url: &Url,
    key: &str,
    secret: &str,
) -> Result<String> {
    let url = base_url.join("oauth2/token")?;

    let response = client
        .post(url)
        .basic_auth(encode_credential(key), Some(encode_credential(secret)))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(Error::Authentication(format!(
            "Token request failed with HTTP {}: {}",
            status,
            describe_error_body(&text).unwrap_or(text)
        )));
    }

    let token: TokenResponse = serde_json::from_str(&text)?;
    if !token.token_type.eq_ignore_ascii_case("bearer") {
        return Err(Error::Authentication(format!(
            "Unexpected token type: {}",
            token.token_type
        )));
    }

    Ok(token.access_token)
}

fn page_query(
    user: &UserRef,
    count: u32,
    max_id: Option<u64>,
    extra: &[(&'static str, &str)],
) -> Vec<(&'static str, String)> {
    let mut query = vec![
        user.query_pair(),
        ("count", count.to_string()),
        ("tweet_mode", "extended".to_string()),
    ];
    if let Some(max_id) = max_id {
        query.push(("max_id", max_id.to_string()));
    }
    query.extend(extra.iter().map(|(k, v)| (*k, v.to_string())));
    query
}

fn rate_limit_wait(response: &Response) -> u64 {
    let reset = response
        .headers()
        .get("x-rate-limit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    match reset {
        Some(reset) => reset.saturating_sub(now),
        None => DEFAULT_RATE_LIMIT_WAIT,
    }
}

fn describe_error_body(body: &str) -> Option<String> {
    let parsed: ErrorResponse = serde_json::from_str(body).ok()?;
    let messages: Vec<String> = parsed
        .errors
        .iter()
        .map(|e| format!("{} (code {})", e.message, e.code))
        .collect();
    (!messages.is_empty()).then(|| messages.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn token_credentials() -> CredentialsConfig {
        CredentialsConfig {
            bearer_token: Some("test-token".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_user_ref_parse() {
        assert_eq!(UserRef::parse("19701628"), UserRef::Id(19701628));
        assert_eq!(
            UserRef::parse("@BBC"),
            UserRef::ScreenName("BBC".to_string())
        );
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let text = format!("{}日本", "a".repeat(499));
        assert_eq!(preview(&text, 500), format!("{}日", "a".repeat(499)));
        assert_eq!(preview("short", 500), "short");
    }

    #[tokio::test]
    async fn test_unparseable_multibyte_page_is_api_error() {
        let server = MockServer::start().await;
        let body = format!("{}日本", "x".repeat(499));

        Mock::given(method("GET"))
            .and(path("/1.1/favorites/list.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let api = TwitterApi::connect_to(&server.uri(), &token_credentials(), Duration::from_secs(5))
            .await
            .unwrap();
        let err = api
            .get_favorites(&UserRef::Id(1), 200, None)
            .await
            .unwrap_err();

        match err {
            Error::Api(message) => assert!(message.contains("Failed to parse")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_page_query() {
        let query = page_query(&UserRef::Id(7), 200, Some(99), &[("include_rts", "true")]);
        assert!(query.contains(&("user_id", "7".to_string())));
        assert!(query.contains(&("max_id", "99".to_string())));
        assert!(query.contains(&("tweet_mode", "extended".to_string())));
        assert!(query.contains(&("include_rts", "true".to_string())));
    }

    #[tokio::test]
    async fn test_get_favorites() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1.1/favorites/list.json"))
            .and(query_param("screen_name", "someone"))
            .and(query_param("max_id", "500"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": 499,
                "created_at": "Sun Mar 21 04:08:55 +0000 2021",
                "user": {"screen_name": "someone_else"}
            }])))
            .mount(&server)
            .await;

        let api = TwitterApi::connect_to(&server.uri(), &token_credentials(), Duration::from_secs(5))
            .await
            .unwrap();
        let tweets = api
            .get_favorites(&UserRef::parse("someone"), 200, Some(500))
            .await
            .unwrap();

        assert_eq!(tweets.len(), 1);
        assert_eq!(tweets[0].id, 499);
    }

    #[tokio::test]
    async fn test_timeline_includes_reposts() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1.1/statuses/user_timeline.json"))
            .and(query_param("include_rts", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let api = TwitterApi::connect_to(&server.uri(), &token_credentials(), Duration::from_secs(5))
            .await
            .unwrap();
        let tweets = api
            .get_user_timeline(&UserRef::Id(1), 10, None)
            .await
            .unwrap();

        assert!(tweets.is_empty());
    }

    #[tokio::test]
    async fn test_consumer_credentials_exchanged_for_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token_type": "bearer",
                "access_token": "exchanged"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/1.1/favorites/list.json"))
            .and(header("authorization", "Bearer exchanged"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let credentials = CredentialsConfig {
            bearer_token: None,
            consumer_key: Some("key".to_string()),
            consumer_secret: Some("secret".to_string()),
        };
        let api = TwitterApi::connect_to(&server.uri(), &credentials, Duration::from_secs(5))
            .await
            .unwrap();

        assert!(api.get_favorites(&UserRef::Id(1), 1, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_auth_and_rate_limit_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1.1/favorites/list.json"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "errors": [{"code": 89, "message": "Invalid or expired token."}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/1.1/statuses/user_timeline.json"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let api = TwitterApi::connect_to(&server.uri(), &token_credentials(), Duration::from_secs(5))
            .await
            .unwrap();

        match api.get_favorites(&UserRef::Id(1), 1, None).await {
            Err(Error::Authentication(message)) => assert!(message.contains("code 89")),
            other => panic!("expected authentication error, got {:?}", other),
        }

        assert!(matches!(
            api.get_user_timeline(&UserRef::Id(1), 1, None).await,
            Err(Error::RateLimited(DEFAULT_RATE_LIMIT_WAIT))
        ));
    }
}
