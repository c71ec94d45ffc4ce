use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use caresuite_core::{AppError, UserIdentity};

use crate::error::ApiResult;

/// Header carrying the subject already authenticated by the gateway.
pub const SUBJECT_HEADER: &str = "x-user-subject";
/// Optional header carrying the caller's display name.
pub const DISPLAY_NAME_HEADER: &str = "x-user-name";

pub async fn require_auth(mut request: Request, next: Next) -> ApiResult<Response> {
    let identity = identity_from_headers(request.headers())?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn identity_from_headers(headers: &axum::http::HeaderMap) -> Result<UserIdentity, AppError> {
    let subject = headers
        .get(SUBJECT_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let display_name = headers
        .get(DISPLAY_NAME_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(subject);

    Ok(UserIdentity::new(subject, display_name))
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};
    use caresuite_core::AppError;

    use super::{DISPLAY_NAME_HEADER, SUBJECT_HEADER, identity_from_headers};

    #[test]
    fn missing_subject_is_unauthorized() {
        let headers = HeaderMap::new();

        assert!(matches!(
            identity_from_headers(&headers),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn blank_subject_is_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert(SUBJECT_HEADER, HeaderValue::from_static("   "));

        assert!(matches!(
            identity_from_headers(&headers),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn display_name_defaults_to_subject() {
        let mut headers = HeaderMap::new();
        headers.insert(SUBJECT_HEADER, HeaderValue::from_static("dr-okafor"));

        let identity = identity_from_headers(&headers);

        assert_eq!(
            identity.ok().map(|identity| identity.display_name().to_owned()),
            Some("dr-okafor".to_owned())
        );
    }

    #[test]
    fn display_name_header_is_used_when_present() {
        let mut headers = HeaderMap::new();
        headers.insert(SUBJECT_HEADER, HeaderValue::from_static("dr-okafor"));
        headers.insert(DISPLAY_NAME_HEADER, HeaderValue::from_static("Dr. Okafor"));

        let identity = identity_from_headers(&headers);

        assert_eq!(
            identity.ok().map(|identity| identity.display_name().to_owned()),
            Some("Dr. Okafor".to_owned())
        );
    }
}
