// We want a few things here:
// 1. A way to create a new error with a backtrace
// 2. A way to centralize setting a breakpoint to trap any error in the system fairly soon
//    after it's created (or at least when it's propagated from a library we use back to us)
// 3. Same but for logging / emitting error messages into the tracing/logging system
// 4. A coarse kind on every error so callers (and the CLI) can say what class of
//    failure happened without downcasting.

use backtrace_error::DynBacktraceError;
use std::any::Any;
use std::borrow::Cow;
use tracing::error;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    SchemaViolation,
    ColumnNotFound,
    TypeMismatch,
    EmptyAggregation,
    Io,
    Other,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::SchemaViolation => "SchemaViolationError",
            ErrorKind::ColumnNotFound => "ColumnNotFoundError",
            ErrorKind::TypeMismatch => "TypeMismatchError",
            ErrorKind::EmptyAggregation => "EmptyAggregationError",
            ErrorKind::Io => "IoError",
            ErrorKind::Other => "Error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// The failures the engine itself can produce. Anything else arrives
// through the blanket `From` below and is classified as Io or Other.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("row {row}, column `{column}`: {reason}")]
    SchemaViolation {
        row: usize,
        column: String,
        reason: String,
    },
    #[error("{op}: no column named `{column}`")]
    ColumnNotFound { op: &'static str, column: String },
    #[error("{op}: column `{column}`: {reason}")]
    TypeMismatch {
        op: &'static str,
        column: String,
        reason: String,
    },
    #[error("{op}: average of `{column}` over a partition with no non-null values")]
    EmptyAggregation { op: &'static str, column: String },
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::SchemaViolation { .. } => ErrorKind::SchemaViolation,
            EngineError::ColumnNotFound { .. } => ErrorKind::ColumnNotFound,
            EngineError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            EngineError::EmptyAggregation { .. } => ErrorKind::EmptyAggregation,
        }
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    msg: String,
    #[allow(dead_code)]
    inner: DynBacktraceError,
}
pub type Result<T> = std::result::Result<T, Error>;

struct SimpleErr(Cow<'static, str>);
impl std::fmt::Debug for SimpleErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for SimpleErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for SimpleErr {}

impl<E: std::error::Error + Send + Sync + 'static> From<E> for Error {
    fn from(err: E) -> Error {
        Error::new(err)
    }
}

impl Error {
    pub fn new<E: std::error::Error + Send + Sync + 'static>(err: E) -> Error {
        error!(target: "kelvin", "{:?}", err);
        let any: &dyn Any = &err;
        let kind = if let Some(engine) = any.downcast_ref::<EngineError>() {
            engine.kind()
        } else if any.is::<std::io::Error>() {
            ErrorKind::Io
        } else {
            ErrorKind::Other
        };
        let msg = err.to_string();
        let inner = DynBacktraceError::from(err);
        Error { kind, msg, inner }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.msg
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.msg)
    }
}

pub fn err(msg: impl Into<Cow<'static, str>>) -> Error {
    let err = SimpleErr(msg.into());
    Error::new(err)
}

pub fn column_not_found(op: &'static str, column: impl Into<String>) -> Error {
    Error::new(EngineError::ColumnNotFound {
        op,
        column: column.into(),
    })
}

pub fn type_mismatch(
    op: &'static str,
    column: impl Into<String>,
    reason: impl Into<String>,
) -> Error {
    Error::new(EngineError::TypeMismatch {
        op,
        column: column.into(),
        reason: reason.into(),
    })
}
