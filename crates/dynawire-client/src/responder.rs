//! Turns an HTTP status and body into a typed output or a categorized error.
//!
//! Dispatch is two-tier: the status class picks the error family, then for
//! 4xx the `__type` discriminator is suffix-matched against the known error
//! codes. An unknown `__type` degrades to [`Error::UnknownClient`] instead of
//! failing the decode.

use http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use dynawire_model::DynamoDBErrorCode;

use crate::error::Error;

/// Header carrying the CRC32 of the response body, in decimal.
pub const CRC32_HEADER: &str = "x-amz-crc32";

/// Decode a response.
///
/// # Errors
///
/// - 200 with an undecodable body: [`Error::Server`].
/// - 4xx: [`Error::Client`] when `__type` is recognized, otherwise
///   [`Error::UnknownClient`].
/// - 5xx: [`Error::Server`].
/// - Any other status: [`Error::Unknown`].
///
/// # Examples
///
/// ```
/// use dynawire_client::responder::respond;
/// use dynawire_model::output::ListTablesOutput;
///
/// let out: ListTablesOutput = respond(200, br#"{"TableNames": ["A", "B"]}"#).unwrap();
/// assert_eq!(out.table_names, Some(vec!["A".to_owned(), "B".to_owned()]));
/// ```
pub fn respond<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, Error> {
    match status {
        200 => {
            // An empty 200 carries no fields; decode it as an empty object.
            let body = if body.is_empty() { b"{}".as_slice() } else { body };
            serde_json::from_slice(body).map_err(|_| Error::Server {
                status,
                body: body_text(body),
            })
        }
        400..=499 => Err(client_error(status, body)),
        500..=599 => Err(Error::Server {
            status,
            body: body_text(body),
        }),
        _ => Err(Error::Unknown {
            status: Some(status),
            message: body_text(body),
        }),
    }
}

/// Check the body against the `x-amz-crc32` header, when the header is
/// present.
///
/// # Errors
///
/// Returns [`Error::Server`] when the header does not match the body or cannot
/// be parsed; the body was damaged in transit, so the request may be resent.
pub fn verify_crc32(status: u16, headers: &HeaderMap, body: &[u8]) -> Result<(), Error> {
    let Some(expected) = headers.get(CRC32_HEADER) else {
        return Ok(());
    };
    let actual = crc32fast::hash(body);
    let matches = expected
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .is_some_and(|expected| expected == actual);
    if matches {
        Ok(())
    } else {
        Err(Error::Server {
            status,
            body: format!(
                "response body CRC32 {actual} does not match {CRC32_HEADER}: {}",
                body_text(body)
            ),
        })
    }
}

fn client_error(status: u16, body: &[u8]) -> Error {
    let raw = body_text(body);
    let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) else {
        return Error::UnknownClient { status, body: raw };
    };

    let code = fields
        .get("__type")
        .and_then(Value::as_str)
        .and_then(DynamoDBErrorCode::from_error_type);
    let Some(code) = code else {
        return Error::UnknownClient { status, body: raw };
    };

    let message = fields
        .get("Message")
        .or_else(|| fields.get("message"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();

    Error::Client {
        status,
        code,
        message,
        body: raw,
    }
}

fn body_text(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}
