use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub(crate) const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id for one request, echoed in error bodies and logs.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuse a caller-supplied id when it is printable and non-empty.
    fn from_request(req: &Request) -> Self {
        let supplied = req
            .headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        Self(supplied.map_or_else(|| Uuid::new_v4().to_string(), str::to_owned))
    }
}

/// Attach a [`RequestId`] extension and mirror it on the response header.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = RequestId::from_request(&req);
    let header = HeaderValue::from_str(&id.0).ok();
    req.extensions_mut().insert(id);

    let mut response = next.run(req).await;
    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
