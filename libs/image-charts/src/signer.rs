//! Request URL assembly and HMAC signing.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::error::ConfigError;
use crate::query::NormalizedQuery;

/// Query key carrying the account id.
pub const ACCOUNT_KEY: &str = "icac";
/// Query key carrying the request signature.
pub const SIGNATURE_KEY: &str = "ichm";

type HmacSha256 = Hmac<Sha256>;

/// Lowercase hex HMAC-SHA256 of `query`, keyed by `secret`.
///
/// HMAC accepts keys of any length, so this does not fail in practice; the
/// `Result` mirrors the fallible key constructor of the `hmac` crate.
///
/// # Errors
/// Returns [`ConfigError::InvalidSecret`] if the key is rejected.
pub fn sign_query(secret: &str, query: &str) -> Result<String, ConfigError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ConfigError::InvalidSecret(e.to_string()))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Form-urlencode `query` in key order.
#[must_use]
pub fn serialize_query(query: &NormalizedQuery) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.iter())
        .finish()
}

/// Build the absolute request URL for `query`.
///
/// The account id, when configured, is added as `icac`. When a secret is
/// configured as well, `ichm` is appended last and covers exactly the
/// serialized query that precedes it.
///
/// # Errors
/// Returns [`ConfigError::InvalidSecret`] if signing fails, which
/// [`sign_query`] never does for any secret.
pub fn build_url(config: &ClientConfig, query: &NormalizedQuery) -> Result<Url, ConfigError> {
    let mut url = config.base_url().clone();

    let query = match config.account() {
        Some(account) if !account.is_empty() => query.clone().with(ACCOUNT_KEY, account),
        _ => query.clone(),
    };

    let serialized = serialize_query(&query);
    url.set_query((!serialized.is_empty()).then_some(serialized.as_str()));

    let secret = config.secret().filter(|s| !s.is_empty());
    let signed = match secret {
        Some(secret) if query.contains_key(ACCOUNT_KEY) => {
            let signature = sign_query(secret.expose(), &serialized)?;
            url.query_pairs_mut().append_pair(SIGNATURE_KEY, &signature);
            true
        }
        _ => false,
    };

    tracing::debug!(
        host = config.host(),
        path = config.path(),
        signed,
        "built chart request URL"
    );
    Ok(url)
}
