use thiserror::Error;

/// Errors raised while walking a bucket.
#[derive(Error, Debug)]
pub enum Error {
    /// The listing call itself failed (network, permissions, missing bucket, throttling).
    #[error("listing s3://{bucket}/{prefix} failed: {message}")]
    Listing {
        bucket: String,
        prefix: String,
        message: String,
    },

    /// The service answered, but without a field we need.
    #[error("malformed listing response for prefix {prefix:?}: {detail}")]
    MalformedResponse { prefix: String, detail: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_error_names_location() {
        let err = Error::Listing {
            bucket: "bucket".into(),
            prefix: "a/".into(),
            message: "AccessDenied".into(),
        };
        assert_eq!(err.to_string(), "listing s3://bucket/a/ failed: AccessDenied");
    }

    #[test]
    fn malformed_error_quotes_prefix() {
        let err = Error::MalformedResponse {
            prefix: "".into(),
            detail: "object without a key".into(),
        };
        assert!(err.to_string().contains("\"\""));
    }
}
