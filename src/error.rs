//! Provides the [`Error`] type for Graphscribe.

use std::fmt::{Display, Formatter};

/// Error type for Graphscribe.
///
/// # Examples
///
/// ```rust
/// use graphscribe::Error;
///
/// let e = Error::UnknownType { name: "Widget".to_string() };
/// ```
#[derive(Debug)]
pub enum Error {
    /// Returned if a `SchemaConfig` file cannot be opened, typically because the file cannot
    /// be found on disk.
    ConfigOpenFailed { source: std::io::Error },

    /// Returned if a `SchemaConfig` fails to deserialize because the provided data does not
    /// match the expected YAML shape.
    DeserializationFailed { source: serde_yaml::Error },

    /// Returned if a filter references a field that does not exist on the type being filtered,
    /// uses an operator illegal for the field's scalar kind, supplies an empty id list, or
    /// otherwise combines clauses in a way the schema does not allow.
    InvalidFilter { message: String },

    /// Returned if a graph-query mutation object cannot be serialized to JSON.
    SerializationFailed { source: serde_json::Error },

    /// Returned if a rewrite operation references a type, field, or edge that is not present
    /// in the schema view.
    UnknownType { name: String },

    /// Returned if an operation requires a caller claim that is absent from the `AuthContext`.
    Unauthorized { rule: String },

    /// Returned if the operation requests an unsupported delete target, such as a union type,
    /// or a type with no persisted predicate.
    UnsupportedOperation { message: String },

    /// Returned if a [`crate::value::Value`] cannot be converted to or from the scalar or JSON
    /// type requested. The `src` field names the source type or value; `dst` names the target
    /// type.
    TypeConversionFailed { src: String, dst: String },

    /// Returned if Graphscribe fails to find an element within a schema that it expects to be
    /// present, such as a type or property referenced internally by the rewriter itself. This
    /// is very unlikely to result from problems with caller input, and most likely indicates an
    /// internal bug.
    SchemaItemNotFound { name: String },

    /// Returned by a custom auth-derived filter validator when validation fails. Unused by the
    /// delete rewrite path today; retained for parity with the add/update rewrite paths this
    /// crate does not yet implement.
    ValidationFailed { message: String },
}

/// Coarse classification of an [`Error`], for callers (such as a transport layer) that need to
/// map a failure to a GraphQL `errors[].extensions.code` without matching on every variant.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    UnknownType,
    InvalidFilter,
    Unauthorized,
    UnsupportedOperation,
    Internal,
}

impl Error {
    /// Returns the coarse [`ErrorKind`] this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownType { .. } => ErrorKind::UnknownType,
            Error::InvalidFilter { .. } => ErrorKind::InvalidFilter,
            Error::Unauthorized { .. } => ErrorKind::Unauthorized,
            Error::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
            Error::ConfigOpenFailed { .. }
            | Error::DeserializationFailed { .. }
            | Error::SerializationFailed { .. }
            | Error::TypeConversionFailed { .. }
            | Error::SchemaItemNotFound { .. }
            | Error::ValidationFailed { .. } => ErrorKind::Internal,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Error::ConfigOpenFailed { source } => {
                write!(f, "Schema config file could not be opened. Source error: {}", source)
            }
            Error::DeserializationFailed { source } => {
                write!(f, "Failed to deserialize schema config. Source error: {}", source)
            }
            Error::InvalidFilter { message } => {
                write!(f, "Filter is invalid: {}", message)
            }
            Error::SerializationFailed { source } => {
                write!(f, "Mutation object could not be serialized. Source error: {}", source)
            }
            Error::UnknownType { name } => {
                write!(f, "The following type or field is not present in the schema: {}", name)
            }
            Error::Unauthorized { rule } => {
                write!(f, "Operation requires a claim not present in the auth context: {}", rule)
            }
            Error::UnsupportedOperation { message } => {
                write!(f, "Unsupported operation: {}", message)
            }
            Error::TypeConversionFailed { src, dst } => {
                write!(f, "Could not convert value from {} to {}", src, dst)
            }
            Error::SchemaItemNotFound { name } => {
                write!(f, "The following item could not be found in the schema: {}", name)
            }
            Error::ValidationFailed { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ConfigOpenFailed { source } => Some(source),
            Error::DeserializationFailed { source } => Some(source),
            Error::SerializationFailed { source } => Some(source),
            Error::InvalidFilter { message: _ } => None,
            Error::UnknownType { name: _ } => None,
            Error::Unauthorized { rule: _ } => None,
            Error::UnsupportedOperation { message: _ } => None,
            Error::TypeConversionFailed { src: _, dst: _ } => None,
            Error::SchemaItemNotFound { name: _ } => None,
            Error::ValidationFailed { message: _ } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::ConfigOpenFailed { source: e }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::DeserializationFailed { source: e }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationFailed { source: e }
    }
}
