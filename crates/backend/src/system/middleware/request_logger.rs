use axum::body::to_bytes;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Log every request: method, path, status, duration and response size
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Buffer the body to learn its real size
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                status = parts.status.as_u16(),
                duration_ms = start.elapsed().as_millis() as u64,
                "{} {} (body error: {})",
                method,
                uri.path(),
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let status = parts.status.as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;
    let size = format_number(bytes.len());

    if parts.status.is_server_error() {
        tracing::error!(status, duration_ms, size = %size, "{} {}", method, uri.path());
    } else if parts.status.is_client_error() {
        tracing::warn!(status, duration_ms, size = %size, "{} {}", method, uri.path());
    } else {
        tracing::info!(status, duration_ms, size = %size, "{} {}", method, uri.path());
    }

    Response::from_parts(parts, Body::from(bytes))
}

/// Thousands separated by commas
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
