use std::fmt;

use serde::{Deserialize, Serialize};

/// Who a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Invalid or unreachable input from the requester.
    CallerFault,
    /// Unexpected condition inside the service.
    ServiceFault,
}

impl FailureClass {
    pub fn status_code(self) -> u16 {
        match self {
            FailureClass::CallerFault => 400,
            FailureClass::ServiceFault => 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidRequest,
    FetchFailure,
    ExtractionFailure,
}

impl ErrorKind {
    pub fn class(self) -> FailureClass {
        match self {
            ErrorKind::InvalidRequest | ErrorKind::FetchFailure => FailureClass::CallerFault,
            ErrorKind::ExtractionFailure => FailureClass::ServiceFault,
        }
    }

    pub fn status_code(self) -> u16 {
        self.class().status_code()
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidRequest => write!(f, "invalid request"),
            ErrorKind::FetchFailure => write!(f, "fetch failure"),
            ErrorKind::ExtractionFailure => write!(f, "extraction failure"),
        }
    }
}

/// JSON body of a failed scrape call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorBody {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }
}
