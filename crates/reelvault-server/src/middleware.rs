use axum::response::IntoResponse;
use axum::{
    Json,
    body::Body,
    http::{HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use serde_json::json;
use uuid::Uuid;

/// Media-type parameter carrying the requested API version.
pub const API_VERSION_PARAM: &str = "api-version";
/// Response header advertising the versions this server speaks.
pub const SUPPORTED_VERSIONS_HEADER: &str = "api-supported-versions";

const SUPPORTED_VERSIONS: [&str; 2] = ["1.0", "2.0"];

// Middleware that ensures each request has an X-Request-Id and mirrors it on the response
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let header_name = HeaderName::from_static("x-request-id");

    // If the incoming request already has a request-id, preserve it; otherwise generate one
    let req_id_value = req.headers().get(&header_name).cloned().unwrap_or_else(|| {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
    });

    // Add to request extensions for downstream usage (e.g., logging)
    req.extensions_mut().insert(req_id_value.clone());

    let mut res = next.run(req).await;

    // Add/propagate the request id header to response
    res.headers_mut().insert(header_name, req_id_value);

    res
}

/// API version negotiation middleware.
///
/// Clients may pin a version through the `api-version` media-type
/// parameter of the `Accept` header, e.g.
/// `Accept: application/json;api-version=1.0`. An absent parameter means
/// the latest version; an unsupported one is a 400. Every response
/// advertises the supported versions.
pub async fn api_version(req: Request<Body>, next: Next) -> Response {
    let requested = req
        .headers()
        .get("accept")
        .and_then(|v| v.to_str().ok())
        .and_then(extract_api_version);

    if let Some(version) = requested
        && !SUPPORTED_VERSIONS.contains(&version.as_str())
    {
        let mut res = (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("unsupported api version: {version}") })),
        )
            .into_response();
        append_supported_versions(&mut res);
        return res;
    }

    let mut res = next.run(req).await;
    append_supported_versions(&mut res);
    res
}

fn extract_api_version(accept: &str) -> Option<String> {
    // Accept may carry several media ranges; the parameter belongs to one
    // of them, so split into ranges before looking at parameters.
    accept
        .split(',')
        .find_map(|range| {
            range
                .split(';')
                .map(str::trim)
                .find_map(|part| part.strip_prefix(&format!("{API_VERSION_PARAM}=")))
        })
        .map(|v| v.trim_matches('"').to_string())
}

fn append_supported_versions(res: &mut Response) {
    if let Ok(value) = HeaderValue::from_str(&SUPPORTED_VERSIONS.join(", ")) {
        res.headers_mut()
            .insert(HeaderName::from_static(SUPPORTED_VERSIONS_HEADER), value);
    }
}
