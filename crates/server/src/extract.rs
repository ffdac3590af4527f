//! JSON request bodies that fail through [`ServerError`].

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::ServerError;

/// Like `axum::Json`, but lenient about the envelope: the content type is not
/// checked and an empty or `null` body reads as `{}`. Every failure becomes a
/// `{ "error": .. }` response.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ServerError::Body(rejection.status(), rejection.body_text()))?;
        parse(&bytes).map(JsonBody)
    }
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ServerError> {
    let value = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(bytes)
            .map_err(|err| ServerError::Generic(format!("Invalid JSON body: {err}")))?
    };
    let value = match value {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(value)
        .map_err(|err| ServerError::Generic(format!("Invalid request body: {err}")))
}

#[cfg(test)]
mod tests {
    use api_types::category::CategoryCreate;

    use super::*;

    #[test]
    fn empty_and_null_bodies_read_as_empty_objects() {
        let empty: CategoryCreate = parse(b"").unwrap();
        assert_eq!(empty.name, None);
        let null: CategoryCreate = parse(b" null ").unwrap();
        assert_eq!(null.name, None);
    }

    #[test]
    fn malformed_json_is_a_generic_error() {
        let err = parse::<CategoryCreate>(b"{name:").unwrap_err();
        assert!(matches!(err, ServerError::Generic(message) if message.starts_with("Invalid JSON body")));
    }

    #[test]
    fn wrong_shape_is_a_generic_error() {
        let err = parse::<CategoryCreate>(b"[1, 2]").unwrap_err();
        assert!(matches!(err, ServerError::Generic(_)));
    }
}
