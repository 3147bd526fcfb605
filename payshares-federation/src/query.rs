//! Federation server queries.
//!
//! A query is a `GET {server}?q={value}&type={type}` answered by a JSON
//! record. The `memo` field of that record is a string on some servers and a
//! number on others; it is normalized to a single string form as soon as it is
//! decoded.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::Stage;
use crate::http::{get_limited, HttpClient};
use crate::Result;

/// Maximum size of a federation server response in bytes.
pub const FEDERATION_RESPONSE_MAX_SIZE: usize = 100 * 1024;

/// Kind of federation query, sent as the `type` parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    /// Resolve a `name*domain` address.
    Name,
    /// Reverse lookup of an account ID.
    Id,
    /// Forward a payment to a non-native destination.
    Forward,
    /// Look up the sender of a transaction.
    Txid,
}

impl QueryType {
    /// Wire value of the `type` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Id => "id",
            Self::Forward => "forward",
            Self::Txid => "txid",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Memo value of a federation record in canonical string form.
///
/// # Example
///
/// ```
/// use payshares_federation::FederationResponse;
///
/// let text: FederationResponse = serde_json::from_str(r#"{"memo": "123"}"#)?;
/// let number: FederationResponse = serde_json::from_str(r#"{"memo": 123}"#)?;
/// assert_eq!(text.memo, number.memo);
/// assert_eq!(number.memo.as_str(), "123");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireMemo", into = "String")]
pub struct Memo(String);

impl Memo {
    /// Create a memo from its string form.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The memo as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the record carried no memo.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Memo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Memo {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Memo> for String {
    fn from(memo: Memo) -> Self {
        memo.0
    }
}

/// What a `memo` field may hold on the wire. Never leaves this module.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireMemo {
    Text(String),
    Number(serde_json::Number),
    Null(()),
}

impl TryFrom<WireMemo> for Memo {
    type Error = String;

    fn try_from(wire: WireMemo) -> std::result::Result<Self, Self::Error> {
        match wire {
            WireMemo::Text(text) => Ok(Memo(text)),
            WireMemo::Number(number) => normalize_number(&number).map(Memo),
            WireMemo::Null(()) => Ok(Memo::default()),
        }
    }
}

/// Largest integer an `f64` holds exactly (2^53).
const MAX_EXACT_FLOAT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Base-10 rendering without exponent or trailing `.0`.
///
/// Only integers are accepted. Integers beyond the `u64`/`i64` range reach
/// this point already rounded to an `f64`, so they are rejected rather than
/// rendered with the wrong digits. Fractional numbers are rejected too.
fn normalize_number(number: &serde_json::Number) -> std::result::Result<String, String> {
    if let Some(n) = number.as_u64() {
        return Ok(n.to_string());
    }
    if let Some(n) = number.as_i64() {
        return Ok(n.to_string());
    }
    match number.as_f64() {
        // Covers `1000.0` and `1e3`; `Display` for f64 never uses an exponent
        // and drops a zero fraction.
        Some(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT_INTEGER => Ok(f.to_string()),
        _ => Err(format!(
            "memo {number} is not an integer that can be represented exactly"
        )),
    }
}

/// Record returned by a federation server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederationResponse {
    /// The resolved `name*domain` address.
    #[serde(default)]
    pub payshares_address: String,
    /// Account the address resolves to.
    #[serde(default)]
    pub account_id: String,
    /// Type of the memo (`id`, `text`, `hash`), empty if none.
    #[serde(default)]
    pub memo_type: String,
    /// Memo value in canonical string form.
    #[serde(default)]
    pub memo: Memo,
}

/// Issues queries against federation servers.
#[derive(Clone)]
pub struct QueryClient {
    http: Arc<dyn HttpClient>,
}

impl QueryClient {
    /// Create a query client issuing requests through `http`.
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// Query `server_url` for `value`.
    ///
    /// No validation beyond decoding is done on the returned record.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn query(
        &self,
        server_url: &str,
        query_type: QueryType,
        value: &str,
    ) -> Result<FederationResponse> {
        let url = url(server_url, query_type, value);
        let reader = get_limited(
            self.http.as_ref(),
            &url,
            Stage::Federation,
            FEDERATION_RESPONSE_MAX_SIZE,
        )
        .await?;

        reader.decode(Stage::Federation, decode_response)
    }
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient").finish_non_exhaustive()
    }
}

/// Build the request URL for a query.
///
/// Everything except ASCII alphanumerics and `-_.~` in `value` is
/// percent-encoded, including `*`, `+` and `@`.
pub fn url(server_url: &str, query_type: QueryType, value: &str) -> String {
    format!(
        "{server_url}?q={}&type={}",
        urlencoding::encode(value),
        query_type.as_str()
    )
}

/// Decode the first JSON value in `bytes`; anything after it is not inspected.
fn decode_response(bytes: &[u8]) -> std::result::Result<FederationResponse, serde_json::Error> {
    let mut stream = serde_json::Deserializer::from_slice(bytes).into_iter::<FederationResponse>();
    match stream.next() {
        Some(result) => result,
        None => serde_json::from_slice(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockHttpClient;
    use crate::FederationError;

    const ACCOUNT: &str = "GASTNVNLHVR3NFO3QACMHCJT3JUSIV4NBXDHDO4VTPDTNN65W3B2766C";

    fn client(http: &Arc<MockHttpClient>) -> QueryClient {
        QueryClient::new(http.clone())
    }

    #[test]
    fn test_url_encodes_reserved_characters() {
        assert_eq!(
            url("", QueryType::Name, "scott+receiver1@payshares.org*payshares.org"),
            "?q=scott%2Breceiver1%40payshares.org%2Apayshares.org&type=name"
        );
        assert_eq!(
            url("https://payshares.org/federation", QueryType::Id, ACCOUNT),
            format!("https://payshares.org/federation?q={ACCOUNT}&type=id")
        );
        assert_eq!(
            url("https://f.org/fed", QueryType::Txid, "a b&c=d"),
            "https://f.org/fed?q=a%20b%26c%3Dd&type=txid"
        );
    }

    #[test]
    fn test_query_type_wire_names() {
        assert_eq!(QueryType::Name.to_string(), "name");
        assert_eq!(QueryType::Id.to_string(), "id");
        assert_eq!(QueryType::Forward.to_string(), "forward");
        assert_eq!(QueryType::Txid.to_string(), "txid");
    }

    #[test]
    fn test_memo_normalization() {
        let cases = [
            (r#"{"memo": "123"}"#, "123"),
            (r#"{"memo": 123}"#, "123"),
            (r#"{"memo": "testing"}"#, "testing"),
            (r#"{"memo": 18446744073709551615}"#, "18446744073709551615"),
            (r#"{"memo": -7}"#, "-7"),
            (r#"{"memo": 1000.0}"#, "1000"),
            (r#"{"memo": 1e3}"#, "1000"),
            (r#"{"memo": null}"#, ""),
            (r#"{}"#, ""),
        ];
        for (json, expected) in cases {
            let record: FederationResponse = serde_json::from_str(json).unwrap();
            assert_eq!(record.memo.as_str(), expected, "input {json}");
        }
    }

    #[test]
    fn test_memo_rejects_other_shapes() {
        assert!(serde_json::from_str::<FederationResponse>(r#"{"memo": true}"#).is_err());
        assert!(serde_json::from_str::<FederationResponse>(r#"{"memo": [1]}"#).is_err());
    }

    #[test]
    fn test_memo_rejects_inexact_numbers() {
        let cases = [
            r#"{"memo": 123456789012345678901234567890}"#,
            r#"{"memo": 18446744073709551616}"#,
            r#"{"memo": -9223372036854775809}"#,
            r#"{"memo": 1.5}"#,
            r#"{"memo": 1e300}"#,
        ];
        for json in cases {
            let err = serde_json::from_str::<FederationResponse>(json).unwrap_err();
            assert!(
                err.to_string().contains("can be represented exactly"),
                "input {json}: {err}"
            );
        }
    }

    #[tokio::test]
    async fn test_query_oversized_integer_memo_is_decode_error() {
        let http = Arc::new(MockHttpClient::new());
        http.on_get(
            "https://payshares.org/federation",
            200,
            r#"{"account_id": "GA", "memo_type": "id", "memo": 123456789012345678901234567890}"#,
        );

        let err = client(&http)
            .query("https://payshares.org/federation", QueryType::Name, "scott*payshares.org")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FederationError::Decode {
                stage: Stage::Federation,
                ..
            }
        ));
        assert!(err.to_string().starts_with("json decode failed: "));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let record = decode_response(br#"{"account_id": "GA"} trailing"#).unwrap();
        assert_eq!(record.account_id, "GA");
        assert!(decode_response(b"").is_err());
        assert!(decode_response(b"   ").is_err());
    }

    #[tokio::test]
    async fn test_query_decodes_record() {
        let http = Arc::new(MockHttpClient::new());
        http.on_get_json(
            "https://payshares.org/federation",
            200,
            &serde_json::json!({
                "payshares_address": "scott*payshares.org",
                "account_id": ACCOUNT,
                "memo_type": "id",
                "memo": 123,
            }),
        );

        let record = client(&http)
            .query(
                "https://payshares.org/federation",
                QueryType::Name,
                "scott*payshares.org",
            )
            .await
            .unwrap();

        assert_eq!(record.payshares_address, "scott*payshares.org");
        assert_eq!(record.account_id, ACCOUNT);
        assert_eq!(record.memo_type, "id");
        assert_eq!(record.memo.to_string(), "123");
        assert_eq!(
            http.requests(),
            vec![
                "https://payshares.org/federation?q=scott%2Apayshares.org&type=name".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_query_status_error() {
        let http = Arc::new(MockHttpClient::new());
        http.not_found("https://404.org/federation");

        let err = client(&http)
            .query("https://404.org/federation", QueryType::Name, "scott*404.org")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed with (404)"));
        assert_eq!(err.stage(), Some(Stage::Federation));
    }

    #[tokio::test]
    async fn test_query_too_large() {
        let http = Arc::new(MockHttpClient::new());
        http.on_get_json(
            "https://toobig.org/federation",
            200,
            &serde_json::json!({
                "payshares_address": format!("{}*payshares.org", "0".repeat(FEDERATION_RESPONSE_MAX_SIZE)),
                "account_id": ACCOUNT,
                "memo_type": "id",
                "memo": "123",
            }),
        );

        let err = client(&http)
            .query("https://toobig.org/federation", QueryType::Name, "response*toobig.org")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FederationError::ResponseTooLarge {
                stage: Stage::Federation,
                limit: FEDERATION_RESPONSE_MAX_SIZE
            }
        );
        assert!(err.to_string().contains("federation response exceeds"));
    }

    #[tokio::test]
    async fn test_query_malformed_json() {
        let http = Arc::new(MockHttpClient::new());
        http.on_get(
            "https://bad.org/federation",
            200,
            "FEDERATION_SERVER=\"https://bad.org\"",
        );

        let err = client(&http)
            .query("https://bad.org/federation", QueryType::Id, ACCOUNT)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FederationError::Decode {
                stage: Stage::Federation,
                ..
            }
        ));
        assert!(err.to_string().starts_with("json decode failed"));
    }

    #[tokio::test]
    async fn test_query_transport_error() {
        let http = Arc::new(MockHttpClient::new());
        http.on_error("https://error.org/federation", "kaboom!");

        let err = client(&http)
            .query("https://error.org/federation", QueryType::Name, "scott*error.org")
            .await
            .unwrap_err();
        assert_eq!(err, FederationError::Transport("kaboom!".into()));
    }
}
