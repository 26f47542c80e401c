use std::fmt::Display;

use serde::{Serialize, Serializer};

/// Body of a response with a leading `success` flag.
#[derive(Serialize)]
pub(crate) struct WithSuccess<'a, T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub body: &'a T,
}

/// Outcome of one toolkit operation.
///
/// Serializes as the payload's fields plus `"success": true`, or as
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResponse<T> {
    Ok(T),
    Err { error: String },
}

impl<T> ToolResponse<T> {
    pub fn error(error: impl Display) -> Self {
        Self::Err {
            error: error.to_string(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// The payload, if the operation succeeded.
    #[must_use]
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(body) => Some(body),
            Self::Err { .. } => None,
        }
    }
}

impl<T, E: Display> From<Result<T, E>> for ToolResponse<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(body) => Self::Ok(body),
            Err(e) => Self::error(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl<T: Serialize> Serialize for ToolResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Ok(body) => WithSuccess {
                success: true,
                body,
            }
            .serialize(serializer),
            Self::Err { error } => WithSuccess {
                success: false,
                body: &ErrorBody { error },
            }
            .serialize(serializer),
        }
    }
}
