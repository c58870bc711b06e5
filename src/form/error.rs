use thiserror::Error;

/// Configuration errors raised by the form engine.
///
/// These indicate a mistake in how a form was composed and are returned
/// instead of being stored. Failed validation is never an error here; it is
/// data kept in the form's error map.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FormError {
    #[error(
        "field \"{name}\" on the form \"{identification}\" is rendered more than once; \
         fields of one form need unique names"
    )]
    DuplicateField {
        identification: String,
        name: String,
    },

    #[error(
        "cannot validate \"{name}\" on the form \"{identification}\" because it is not an \
         initialized field"
    )]
    UnknownField {
        identification: String,
        name: String,
    },

    #[error("cannot write \"{name}\" on the form \"{identification}\": a parent segment holds a value")]
    PathBlocked {
        identification: String,
        name: String,
    },

    #[error("invalid field path \"{0}\"")]
    InvalidPath(String),

    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
}

pub type FormResult<T> = Result<T, FormError>;
