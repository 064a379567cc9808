//! Delivery errors. None are retried; the caller decides how to report them.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DispatchError>;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("error encoding JSON: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("error creating request: {0}")]
    RequestBuild(String),

    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl DispatchError {
    pub fn request_build(msg: impl Into<String>) -> Self {
        Self::RequestBuild(msg.into())
    }

    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: DispatchError = json_err.into();
        assert!(matches!(err, DispatchError::Encoding(_)));
        assert!(err.to_string().starts_with("error encoding JSON"));
    }

    #[test]
    fn test_constructors() {
        assert!(matches!(DispatchError::request_build("x"), DispatchError::RequestBuild(_)));
        assert!(matches!(DispatchError::delivery("x"), DispatchError::Delivery(_)));
    }
}
