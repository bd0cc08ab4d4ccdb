pub mod fields;
pub mod runs;

pub use runs::{Run, decode, decode_wire, encode, expanded_len, flatten};

/// Errors raised while decoding or encoding a save document.
///
/// Every variant is terminal for the call that produced it; the codec does
/// not attempt partial recovery.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A required field is absent or has the wrong shape, or a cardinality
    /// rule (exactly one player) is violated.
    #[error("schema error at '{field}': {reason}")]
    Schema { field: String, reason: String },

    /// Counts or dimensions disagree with each other.
    #[error("inconsistent document: {0}")]
    Consistency(String),

    /// A closed enumeration received a value outside its set.
    #[error("unknown {kind} value: {value}")]
    UnknownEnumValue { kind: &'static str, value: String },

    /// The run-length tile stream cannot be expanded.
    #[error("malformed tile run stream: {0}")]
    MalformedRun(String),

    /// A tile sequence with no elements was handed to the run encoder.
    #[error("cannot run-length encode an empty tile sequence")]
    EmptyInput,

    /// A coordinate or plot index lies outside the world extent.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),
}

impl CodecError {
    pub fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::Schema {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::schema(field, "required field is missing")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_names_the_field() {
        let err = CodecError::missing("GameOptions");
        assert!(matches!(&err, CodecError::Schema { field, .. } if field == "GameOptions"));
        assert!(err.to_string().contains("GameOptions"));
    }

    #[test]
    fn unknown_enum_message_includes_kind_and_value() {
        let err = CodecError::UnknownEnumValue {
            kind: "tile type",
            value: "99".to_string(),
        };
        assert_eq!(err.to_string(), "unknown tile type value: 99");
    }
}
