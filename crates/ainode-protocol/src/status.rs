//! Response status carried by every RPC

use crate::Endpoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum StatusCode {
    Success = 200,
    IncompatibleVersion = 201,
    ConfigurationError = 202,
    InternalServerError = 305,
    /// The addressed config node is not the leader
    RedirectionRecommend = 400,
    IllegalParameter = 700,
    QueryNotFound = 701,
    NodeNotFound = 702,
}

impl StatusCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            200 => Some(StatusCode::Success),
            201 => Some(StatusCode::IncompatibleVersion),
            202 => Some(StatusCode::ConfigurationError),
            305 => Some(StatusCode::InternalServerError),
            400 => Some(StatusCode::RedirectionRecommend),
            700 => Some(StatusCode::IllegalParameter),
            701 => Some(StatusCode::QueryNotFound),
            702 => Some(StatusCode::NodeNotFound),
            _ => None,
        }
    }
}

/// Status of an RPC response
///
/// Unknown codes are kept verbatim in `code` so they can be surfaced to the
/// caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub code: i32,
    pub message: Option<String>,
    /// Leader hint, only meaningful with [`StatusCode::RedirectionRecommend`]
    pub redirect_node: Option<Endpoint>,
}

impl Status {
    pub fn new(code: StatusCode) -> Self {
        Self {
            code: code.code(),
            message: None,
            redirect_node: None,
        }
    }

    pub fn success() -> Self {
        Self::new(StatusCode::Success)
    }

    /// Redirect status, optionally naming the current leader
    pub fn redirect(leader: Option<Endpoint>) -> Self {
        Self {
            code: StatusCode::RedirectionRecommend.code(),
            message: None,
            redirect_node: leader,
        }
    }

    pub fn error(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: Some(message.into()),
            redirect_node: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == StatusCode::Success.code()
    }

    pub fn is_redirect(&self) -> bool {
        self.code == StatusCode::RedirectionRecommend.code()
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_code(self.code)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "code={}, message={}", self.code, message),
            None => write!(f, "code={}", self.code),
        }
    }
}
