use axum::{
    extract::Request,
    http::{HeaderValue, header::CONTENT_TYPE},
    middleware::Next,
    response::Response,
};

pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let is_html = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/html"));
    let response_headers = response.headers_mut();
    if is_html {
        response_headers.insert(
            "Content-Security-Policy",
            HeaderValue::from_static(
                "default-src 'self';script-src 'self' 'unsafe-inline';style-src 'self' \
                 'unsafe-inline';img-src 'self' https://github.com \
                 https://avatars.githubusercontent.com data:;object-src 'self';\
                 frame-ancestors 'none';base-uri 'none'",
            ),
        );
    }
    response_headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    response_headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));
    response_headers
        .insert("Referrer-Policy", HeaderValue::from_static("strict-origin-when-cross-origin"));
    response_headers.insert("X-XSS-Protection", HeaderValue::from_static("1; mode=block"));
    response_headers.insert(
        "Strict-Transport-Security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    response
}
