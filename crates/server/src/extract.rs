use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use db::validation::FieldErrors;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

const NON_FIELD_ERRORS: &str = "non_field_errors";

/// JSON body whose deserialization failures come back as field errors keyed by
/// the offending path. An empty body reads as `{}`; the content type is not checked.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| ApiError::BadRequest(err.body_text()))?;
        parse_body(&bytes).map(JsonBody)
    }
}

pub fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        bytes
    };
    let mut deserializer = serde_json::Deserializer::from_slice(raw);
    let parsed: Result<T, serde_path_to_error::Error<serde_json::Error>> =
        serde_path_to_error::deserialize(&mut deserializer);

    parsed.map_err(|err| {
        let path = err.path().to_string();
        let inner = err.into_inner();
        ApiError::Validation(field_errors_for(&path, &inner))
    })
}

fn field_errors_for(path: &str, err: &serde_json::Error) -> FieldErrors {
    let message = err.to_string();
    if let Some(field) = missing_field(&message) {
        let field = if path == "." {
            field.to_string()
        } else {
            format!("{path}.{field}")
        };
        return FieldErrors::single(&field, "This field is required.");
    }
    if err.is_syntax() || err.is_eof() {
        return FieldErrors::single(NON_FIELD_ERRORS, format!("JSON parse error - {message}"));
    }

    let field = if path == "." { NON_FIELD_ERRORS } else { path };
    let detail = message
        .split(" at line ")
        .next()
        .unwrap_or(message.as_str())
        .to_string();
    FieldErrors::single(field, detail)
}

/// Field name from serde's "missing field `name`" message.
fn missing_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}
