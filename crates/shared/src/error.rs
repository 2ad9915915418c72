use thiserror::Error;

use crate::domain::FieldName;

/// Rejections raised while editing or normalizing a form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown form field '{0}'")]
    UnknownField(String),
    #[error("'{value}' is not a valid {field} option")]
    InvalidOption { field: FieldName, value: String },
    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber { field: FieldName, value: String },
}

/// A categorical value outside its field's option set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized option '{0}'")]
pub struct UnknownOption(pub String);
