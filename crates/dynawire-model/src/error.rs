//! DynamoDB client error codes.
//!
//! Error responses carry a `__type` field such as
//! `com.amazonaws.dynamodb.v20120810#ResourceNotFoundException`. The code is
//! recognized by suffix so that namespace changes and new prefixes do not break
//! classification; unrecognized codes are left to the caller to treat
//! generically.

use std::fmt;

/// Well-known DynamoDB client (4xx) error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DynamoDBErrorCode {
    /// The table already exists or is being modified.
    ResourceInUseException,
    /// The table or index does not exist.
    ResourceNotFoundException,
    /// A condition expression evaluated to false.
    ConditionalCheckFailedException,
    /// The request failed input validation.
    ValidationException,
    /// The request rate exceeded the provisioned throughput.
    ProvisionedThroughputExceededException,
    /// The account-level request rate was exceeded.
    RequestLimitExceeded,
    /// The request was throttled.
    ThrottlingException,
    /// Too many concurrent control-plane operations.
    LimitExceededException,
    /// An item collection grew beyond 10 GB.
    ItemCollectionSizeLimitExceededException,
    /// The caller is not authorized.
    AccessDeniedException,
    /// The access key or signature was not recognized.
    UnrecognizedClientException,
    /// The request signature did not match.
    InvalidSignatureException,
    /// The request signature has expired.
    ExpiredTokenException,
    /// The security token is invalid.
    IncompleteSignatureException,
    /// The payload could not be deserialized.
    SerializationException,
    /// The `X-Amz-Target` header was missing.
    MissingAction,
    /// A transaction was canceled.
    TransactionCanceledException,
    /// Another transaction is operating on the same item.
    TransactionConflictException,
}

/// Suffix table consulted in order; longer codes that end with a shorter code
/// must come first.
const CLIENT_ERROR_SUFFIXES: &[(&str, DynamoDBErrorCode)] = &[
    (
        "ItemCollectionSizeLimitExceededException",
        DynamoDBErrorCode::ItemCollectionSizeLimitExceededException,
    ),
    (
        "ProvisionedThroughputExceededException",
        DynamoDBErrorCode::ProvisionedThroughputExceededException,
    ),
    (
        "ConditionalCheckFailedException",
        DynamoDBErrorCode::ConditionalCheckFailedException,
    ),
    (
        "ResourceNotFoundException",
        DynamoDBErrorCode::ResourceNotFoundException,
    ),
    (
        "ResourceInUseException",
        DynamoDBErrorCode::ResourceInUseException,
    ),
    (
        "ValidationException",
        DynamoDBErrorCode::ValidationException,
    ),
    (
        "RequestLimitExceeded",
        DynamoDBErrorCode::RequestLimitExceeded,
    ),
    (
        "ThrottlingException",
        DynamoDBErrorCode::ThrottlingException,
    ),
    (
        "LimitExceededException",
        DynamoDBErrorCode::LimitExceededException,
    ),
    (
        "AccessDeniedException",
        DynamoDBErrorCode::AccessDeniedException,
    ),
    (
        "UnrecognizedClientException",
        DynamoDBErrorCode::UnrecognizedClientException,
    ),
    (
        "InvalidSignatureException",
        DynamoDBErrorCode::InvalidSignatureException,
    ),
    (
        "ExpiredTokenException",
        DynamoDBErrorCode::ExpiredTokenException,
    ),
    (
        "IncompleteSignatureException",
        DynamoDBErrorCode::IncompleteSignatureException,
    ),
    (
        "SerializationException",
        DynamoDBErrorCode::SerializationException,
    ),
    ("MissingAction", DynamoDBErrorCode::MissingAction),
    (
        "TransactionCanceledException",
        DynamoDBErrorCode::TransactionCanceledException,
    ),
    (
        "TransactionConflictException",
        DynamoDBErrorCode::TransactionConflictException,
    ),
];

impl DynamoDBErrorCode {
    /// Classify a `__type` value by suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use dynawire_model::DynamoDBErrorCode;
    ///
    /// assert_eq!(
    ///     DynamoDBErrorCode::from_error_type(
    ///         "com.amazonaws.dynamodb.v20120810#ResourceNotFoundException"
    ///     ),
    ///     Some(DynamoDBErrorCode::ResourceNotFoundException),
    /// );
    /// assert_eq!(DynamoDBErrorCode::from_error_type("com.example#Teapot"), None);
    /// ```
    #[must_use]
    pub fn from_error_type(error_type: &str) -> Option<Self> {
        CLIENT_ERROR_SUFFIXES
            .iter()
            .find(|(suffix, _)| error_type.ends_with(suffix))
            .map(|(_, code)| *code)
    }

    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        CLIENT_ERROR_SUFFIXES
            .iter()
            .find(|(_, code)| code == self)
            .map_or("UnknownError", |(suffix, _)| *suffix)
    }

    /// Whether this error signals throttling, i.e. the same request may
    /// succeed if resent later.
    #[must_use]
    pub fn is_throttling(&self) -> bool {
        matches!(
            self,
            Self::ProvisionedThroughputExceededException
                | Self::RequestLimitExceeded
                | Self::ThrottlingException
        )
    }
}

impl fmt::Display for DynamoDBErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_match_longest_suffix_first() {
        assert_eq!(
            DynamoDBErrorCode::from_error_type(
                "com.amazonaws.dynamodb.v20120810#ItemCollectionSizeLimitExceededException"
            ),
            Some(DynamoDBErrorCode::ItemCollectionSizeLimitExceededException),
        );
        assert_eq!(
            DynamoDBErrorCode::from_error_type(
                "com.amazonaws.dynamodb.v20120810#LimitExceededException"
            ),
            Some(DynamoDBErrorCode::LimitExceededException),
        );
    }

    #[test]
    fn test_should_match_validation_from_coral_namespace() {
        assert_eq!(
            DynamoDBErrorCode::from_error_type("com.amazon.coral.validate#ValidationException"),
            Some(DynamoDBErrorCode::ValidationException),
        );
    }

    #[test]
    fn test_should_round_trip_every_code_through_its_name() {
        for (suffix, code) in CLIENT_ERROR_SUFFIXES {
            assert_eq!(code.as_str(), *suffix);
            assert_eq!(DynamoDBErrorCode::from_error_type(suffix), Some(*code));
        }
    }

    #[test]
    fn test_should_flag_only_throttling_codes() {
        assert!(DynamoDBErrorCode::ProvisionedThroughputExceededException.is_throttling());
        assert!(DynamoDBErrorCode::ThrottlingException.is_throttling());
        assert!(!DynamoDBErrorCode::ValidationException.is_throttling());
        assert!(!DynamoDBErrorCode::LimitExceededException.is_throttling());
    }
}
