//! Caller-visible "not found" failure.
//!
//! Repositories report absence as `Ok(None)`. Layers that require the
//! entity to exist convert that absence into [`ResourceNotFound`].

use std::error::Error;
use std::fmt::{Display, Formatter};

type BoxedCause = Box<dyn Error + Send + Sync + 'static>;

/// A requested resource could not be located.
#[derive(Debug)]
pub struct ResourceNotFound {
    message: String,
    source: Option<BoxedCause>,
}

impl ResourceNotFound {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps the underlying failure that caused the lookup to come up empty.
    pub fn with_source(message: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        Self {
            message: message.into(),
            source: Some(cause.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ResourceNotFound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for ResourceNotFound {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }
}
