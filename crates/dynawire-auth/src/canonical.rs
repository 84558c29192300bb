//! Canonical request construction for AWS Signature Version 4.
//!
//! Every DynamoDB call is a `POST` to `/` with no query string, so the
//! canonical request reduces to:
//!
//! ```text
//! POST\n
//! /\n
//! \n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```

use std::collections::BTreeMap;

/// Build the canonical request for a JSON `POST /`.
///
/// `headers` must already contain every header that will be signed; all of
/// them are signed.
///
/// # Examples
///
/// ```
/// use dynawire_auth::canonical::build_canonical_request;
///
/// let canonical = build_canonical_request(
///     &[("Host", "dynamodb.us-east-1.amazonaws.com")],
///     "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a",
/// );
/// assert!(canonical.starts_with("POST\n/\n\nhost:dynamodb.us-east-1.amazonaws.com\n\nhost\n"));
/// ```
#[must_use]
pub fn build_canonical_request(headers: &[(&str, &str)], payload_hash: &str) -> String {
    let canonical = canonicalize_headers(headers);
    let canonical_headers = canonical
        .iter()
        .map(|(name, value)| format!("{name}:{value}"))
        .collect::<Vec<_>>()
        .join("\n");
    let signed_headers = build_signed_headers_string(headers);

    format!("POST\n/\n\n{canonical_headers}\n\n{signed_headers}\n{payload_hash}")
}

/// The `;`-separated, sorted, lowercase list of signed header names.
///
/// # Examples
///
/// ```
/// use dynawire_auth::canonical::build_signed_headers_string;
///
/// assert_eq!(
///     build_signed_headers_string(&[("X-Amz-Date", "x"), ("Host", "h")]),
///     "host;x-amz-date"
/// );
/// ```
#[must_use]
pub fn build_signed_headers_string(headers: &[(&str, &str)]) -> String {
    canonicalize_headers(headers)
        .into_keys()
        .collect::<Vec<_>>()
        .join(";")
}

/// Lowercase names, trim and collapse values, sort by name. Repeated names
/// are joined with commas.
fn canonicalize_headers(headers: &[(&str, &str)]) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = collapse_whitespace(value.trim());
        map.entry(name.to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    map
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
