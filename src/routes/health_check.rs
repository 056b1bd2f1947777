use actix_web::HttpResponse;

/// Liveness check; `TracingLogger` already gives the request its own span.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
