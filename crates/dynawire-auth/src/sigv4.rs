//! AWS Signature Version 4 signing for DynamoDB JSON requests.
//!
//! The flow:
//!
//! 1. Assemble the headers that travel with every call (`Content-Type`,
//!    `Host`, `X-Amz-Date`, `X-Amz-Target`, and `X-Amz-Security-Token` for
//!    temporary credentials).
//! 2. Build the canonical request from those headers and the payload hash.
//! 3. Build the string to sign from the timestamp, credential scope and the
//!    canonical request hash.
//! 4. Derive the signing key with the HMAC-SHA256 chain and sign.
//! 5. Add the `Authorization` header.
//!
//! Signing is a pure function of its inputs; the caller supplies the clock.
//! The main entry point is [`sign_request`].

use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderName, HeaderValue};
use sha2::{Digest, Sha256};
use tracing::trace;

use crate::canonical::{build_canonical_request, build_signed_headers_string};
use crate::credentials::Credentials;
use crate::error::AuthError;

/// The signing algorithm.
const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Content type of the DynamoDB JSON protocol.
pub const CONTENT_TYPE_JSON: &str = "application/x-amz-json-1.0";

const CONTENT_TYPE_NAME: &str = "content-type";
const HOST_NAME: &str = "host";
const X_AMZ_DATE: &str = "x-amz-date";
const X_AMZ_TARGET: &str = "x-amz-target";
const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

type HmacSha256 = Hmac<Sha256>;

/// Everything besides the payload that goes into a signature.
#[derive(Debug, Clone, Copy)]
pub struct SigningParams<'a> {
    /// Credentials to sign with.
    pub credentials: &'a Credentials,
    /// Region of the credential scope, e.g. `us-east-1`.
    pub region: &'a str,
    /// Service of the credential scope, `dynamodb` for real endpoints.
    pub service: &'a str,
    /// Value of the `Host` header: the endpoint authority, with port if any.
    pub host: &'a str,
    /// Signing time.
    pub timestamp: DateTime<Utc>,
}

/// Sign a JSON `POST /` request and return every header it must carry.
///
/// `target` is the full `X-Amz-Target` value such as
/// `DynamoDB_20120810.GetItem`.
///
/// # Errors
///
/// Returns [`AuthError::InvalidHeaderValue`] when the host, target or session
/// token contains characters that are illegal in an HTTP header.
pub fn sign_request(
    params: &SigningParams<'_>,
    target: &str,
    payload: &[u8],
) -> Result<HeaderMap, AuthError> {
    let amz_date = params.timestamp.format("%Y%m%dT%H%M%SZ").to_string();
    let date = params.timestamp.format("%Y%m%d").to_string();

    let mut signed: Vec<(&'static str, &str)> = vec![
        (CONTENT_TYPE_NAME, CONTENT_TYPE_JSON),
        (HOST_NAME, params.host),
        (X_AMZ_DATE, amz_date.as_str()),
        (X_AMZ_TARGET, target),
    ];
    if let Some(token) = params.credentials.session_token.as_deref() {
        signed.push((X_AMZ_SECURITY_TOKEN, token));
    }

    let payload_hash = hash_payload(payload);
    let canonical_request = build_canonical_request(&signed, &payload_hash);
    let canonical_hash = hex::encode(Sha256::digest(canonical_request.as_bytes()));
    let scope = credential_scope(&date, params.region, params.service);
    let string_to_sign = build_string_to_sign(&amz_date, &scope, &canonical_hash);
    trace!(canonical_request = %canonical_request, "built canonical request");

    let signing_key = derive_signing_key(
        &params.credentials.secret_access_key,
        &date,
        params.region,
        params.service,
    );
    let signature = compute_signature(&signing_key, &string_to_sign);
    let authorization = format!(
        "{ALGORITHM} Credential={}/{scope}, SignedHeaders={}, Signature={signature}",
        params.credentials.access_key_id,
        build_signed_headers_string(&signed),
    );

    let mut headers = HeaderMap::with_capacity(signed.len() + 1);
    for (name, value) in signed {
        headers.insert(HeaderName::from_static(name), header_value(name, value)?);
    }
    headers.insert(AUTHORIZATION, header_value("authorization", &authorization)?);
    Ok(headers)
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, AuthError> {
    HeaderValue::from_str(value).map_err(|_| AuthError::InvalidHeaderValue(name))
}

/// `<date>/<region>/<service>/aws4_request`.
#[must_use]
pub fn credential_scope(date: &str, region: &str, service: &str) -> String {
    format!("{date}/{region}/{service}/aws4_request")
}

/// Build the SigV4 string to sign.
///
/// ```text
/// AWS4-HMAC-SHA256\n
/// <timestamp>\n
/// <credential scope>\n
/// <hex(SHA256(canonical request))>
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n{canonical_request_hash}")
}

/// Derive the signing key with the HMAC-SHA256 chain.
///
/// ```text
/// DateKey              = HMAC-SHA256("AWS4" + secret_key, date)
/// DateRegionKey        = HMAC-SHA256(DateKey, region)
/// DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
/// SigningKey           = HMAC-SHA256(DateRegionServiceKey, "aws4_request")
/// ```
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let date_key = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let date_region_key = hmac_sha256(&date_key, region.as_bytes());
    let date_region_service_key = hmac_sha256(&date_region_key, service.as_bytes());
    hmac_sha256(&date_region_service_key, b"aws4_request")
}

/// Hex-encoded HMAC-SHA256 of `data` under `signing_key`.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Hex-encoded SHA-256 of the payload.
///
/// # Examples
///
/// ```
/// use dynawire_auth::sigv4::hash_payload;
///
/// assert_eq!(
///     hash_payload(b"{}"),
///     "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use http::header::{CONTENT_TYPE, HOST};

    use super::*;

    const TEST_ACCESS_KEY: &str = "AKIDEXAMPLE";
    const TEST_SECRET_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";
    const TEST_HOST: &str = "dynamodb.us-east-1.amazonaws.com";
    const TEST_TARGET: &str = "DynamoDB_20120810.ListTables";

    fn params(credentials: &Credentials) -> SigningParams<'_> {
        SigningParams {
            credentials,
            region: "us-east-1",
            service: "dynamodb",
            host: TEST_HOST,
            timestamp: Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap(),
        }
    }

    #[test]
    fn test_should_produce_known_authorization_header() {
        let creds = Credentials::new(TEST_ACCESS_KEY, TEST_SECRET_KEY);
        let headers = sign_request(&params(&creds), TEST_TARGET, b"{}").unwrap();

        assert_eq!(
            headers[AUTHORIZATION],
            "AWS4-HMAC-SHA256 \
             Credential=AKIDEXAMPLE/20150830/us-east-1/dynamodb/aws4_request, \
             SignedHeaders=content-type;host;x-amz-date;x-amz-target, \
             Signature=75214f17608dbd636679e18f6f89744844ae96fcd228b8147167152488d817de"
        );
        assert_eq!(headers[X_AMZ_DATE], "20150830T123600Z");
        assert_eq!(headers[X_AMZ_TARGET], TEST_TARGET);
        assert_eq!(headers[CONTENT_TYPE], CONTENT_TYPE_JSON);
        assert_eq!(headers[HOST], TEST_HOST);
        assert!(!headers.contains_key(X_AMZ_SECURITY_TOKEN));
    }

    #[test]
    fn test_should_sign_session_token_when_present() {
        let creds = Credentials::new(TEST_ACCESS_KEY, TEST_SECRET_KEY)
            .with_session_token("session-token-example");
        let headers = sign_request(&params(&creds), TEST_TARGET, b"{}").unwrap();

        assert_eq!(headers[X_AMZ_SECURITY_TOKEN], "session-token-example");
        assert_eq!(
            headers[AUTHORIZATION],
            "AWS4-HMAC-SHA256 \
             Credential=AKIDEXAMPLE/20150830/us-east-1/dynamodb/aws4_request, \
             SignedHeaders=content-type;host;x-amz-date;x-amz-security-token;x-amz-target, \
             Signature=3fd858b56e7f57b1488335bd962fb8c49b5b584a9044a69f0cbaefc10c79ba0e"
        );
    }

    #[test]
    fn test_should_change_signature_with_payload() {
        let creds = Credentials::new(TEST_ACCESS_KEY, TEST_SECRET_KEY);
        let a = sign_request(&params(&creds), TEST_TARGET, b"{}").unwrap();
        let b = sign_request(&params(&creds), TEST_TARGET, br#"{"Limit":1}"#).unwrap();
        assert_ne!(a[AUTHORIZATION], b[AUTHORIZATION]);
    }

    #[test]
    fn test_should_reject_host_with_illegal_characters() {
        let creds = Credentials::new(TEST_ACCESS_KEY, TEST_SECRET_KEY);
        let params = SigningParams {
            host: "bad\nhost",
            ..params(&creds)
        };
        let result = sign_request(&params, TEST_TARGET, b"{}");
        assert!(matches!(result, Err(AuthError::InvalidHeaderValue("host"))));
    }

    #[test]
    fn test_should_compute_signature_for_published_aws_vector() {
        let signing_key = derive_signing_key(
            "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY",
            "20130524",
            "us-east-1",
            "s3",
        );
        let string_to_sign = build_string_to_sign(
            "20130524T000000Z",
            &credential_scope("20130524", "us-east-1", "s3"),
            "7344ae5b7ee6c3e7e6b0fe0640412a37625d1fbfff95c48bbb2dc43964946972",
        );
        assert_eq!(
            compute_signature(&signing_key, &string_to_sign),
            "f0e8bdb87c964420e857bd35b5d6ed310bd44f0170aba48dd91039c6036bdb41"
        );
    }
}
