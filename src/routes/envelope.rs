//! The `{status}` / `{error}` bodies every forwarder answers with.
use actix_web::{HttpResponse, http::header::ContentType};
use serde::Serialize;

#[derive(Serialize)]
struct StatusBody<'a> {
    status: &'a str,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

pub fn status_response(status: &str) -> HttpResponse {
    HttpResponse::Ok().json(StatusBody { status })
}

/// Failures are reported in the body; the status code stays `200 OK`.
pub fn error_response(error: &str) -> HttpResponse {
    HttpResponse::Ok().json(ErrorBody { error })
}

pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .content_type(ContentType::plaintext())
        .body("Method not allowed")
}
