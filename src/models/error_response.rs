use serde::{Deserialize, Serialize};

use crate::schema::{Field, FieldKind, Schema, WireModel};

/// Problem with one field of a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorDetail {
    pub field: String,
    pub message: String,
}

/// Body of a `400 Bad Request` answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub errors: Vec<ErrorDetail>,
}

impl ErrorResponse {
    /// Detail messages reported for a given field.
    pub fn messages_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

pub(crate) static ERROR_DETAIL_SCHEMA: Schema = Schema {
    model: "ErrorDetail",
    fields: &[
        Field::required("field", "field", FieldKind::Str),
        Field::required("message", "message", FieldKind::Str),
    ],
};

pub(crate) static ERROR_RESPONSE_SCHEMA: Schema = Schema {
    model: "ErrorResponse",
    fields: &[
        Field::required("code", "code", FieldKind::Str),
        Field::required("message", "message", FieldKind::Str),
        Field::required("errors", "errors", FieldKind::ObjectList(&ERROR_DETAIL_SCHEMA)),
    ],
};

impl WireModel for ErrorDetail {
    fn schema() -> &'static Schema {
        &ERROR_DETAIL_SCHEMA
    }
}

impl WireModel for ErrorResponse {
    fn schema() -> &'static Schema {
        &ERROR_RESPONSE_SCHEMA
    }
}
