use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use serde_json::{json, Value};

/// Extension type to carry the configured operator PIN through request
/// extensions.
#[derive(Clone)]
pub struct ViewPin(pub Option<String>);

/// Extractor guarding operator endpoints: the X-View-Pin header must match
/// the configured PIN. With no PIN configured, every request is rejected.
pub struct OperatorPin;

impl<S> FromRequestParts<S> for OperatorPin
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let expected = parts
            .extensions
            .get::<ViewPin>()
            .and_then(|p| p.0.clone())
            .ok_or_else(unauthorized)?;

        let supplied = parts
            .headers
            .get("X-View-Pin")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(unauthorized)?;

        if supplied != expected {
            return Err(unauthorized());
        }

        Ok(OperatorPin)
    }
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Non autorizzato" })),
    )
}
