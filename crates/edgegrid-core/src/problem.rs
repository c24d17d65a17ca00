//! Normalization of API error responses.
//!
//! The APIs answer failures with problem-details JSON
//! (`{"type", "title", "detail", ...}`) most of the time, but gateways in
//! front of them also return HTML pages, XML documents or plain text. Every
//! one of these becomes a single [`ApiError`] so callers always get a status
//! and something readable.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::ApiFamily;

/// Problem-details body as sent by the APIs.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ProblemBody {
    /// Problem type URI.
    #[serde(rename = "type")]
    pub type_url: String,
    /// Short summary.
    pub title: String,
    /// Occurrence specific explanation.
    pub detail: String,
    /// Occurrence identifier.
    pub instance: String,
    /// Nested problems reported alongside the main one.
    pub errors: Vec<serde_json::Value>,
}

/// Outcome of interpreting an error body.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// The body matched the problem-details shape.
    Structured(ProblemBody),
    /// The body could not be interpreted and is kept verbatim.
    Raw(String),
}

impl ErrorBody {
    /// Interpret raw response bytes.
    ///
    /// Only a JSON object counts as structured; arrays and scalars stay raw.
    #[must_use]
    pub fn parse(body: &[u8]) -> Self {
        let problem = match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(value @ serde_json::Value::Object(_)) => {
                serde_json::from_value::<ProblemBody>(value).ok()
            }
            _ => None,
        };

        match problem {
            Some(problem) => Self::Structured(problem),
            None => Self::Raw(String::from_utf8_lossy(body).into_owned()),
        }
    }
}

/// Normalized API error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Problem type URI, empty when the body was not structured.
    #[serde(rename = "type")]
    pub type_url: String,
    /// Short summary.
    pub title: String,
    /// Explanation, or the raw body when it could not be parsed.
    pub detail: String,
    /// HTTP status of the response.
    pub status: u16,
    /// Occurrence identifier, when provided.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance: String,
    /// Nested problems, when provided.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<serde_json::Value>,
}

impl ApiError {
    /// Normalize a failed response. Never fails.
    #[must_use]
    pub fn from_response(family: ApiFamily, status: StatusCode, body: &[u8]) -> Self {
        match ErrorBody::parse(body) {
            ErrorBody::Structured(problem) => Self {
                type_url: problem.type_url,
                title: problem.title,
                detail: problem.detail,
                status: status.as_u16(),
                instance: problem.instance,
                errors: problem.errors,
            },
            ErrorBody::Raw(raw) => Self {
                title: family.unparsable_error_title().to_string(),
                detail: raw,
                status: status.as_u16(),
                ..Self::default()
            },
        }
    }

    /// Returns the status as a [`StatusCode`], if valid.
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.status).ok()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error {}: {}", self.status, self.title)?;
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback(family: ApiFamily, detail: &str, status: u16) -> ApiError {
        ApiError {
            type_url: String::new(),
            title: family.unparsable_error_title().to_string(),
            detail: detail.to_string(),
            status,
            ..ApiError::default()
        }
    }

    #[test]
    fn structured_body_is_copied() {
        let err = ApiError::from_response(
            ApiFamily::NetStorage,
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"type":"a","title":"b","detail":"c"}"#,
        );

        assert_eq!(
            err,
            ApiError {
                type_url: "a".into(),
                title: "b".into(),
                detail: "c".into(),
                status: 500,
                ..ApiError::default()
            }
        );
    }

    #[test]
    fn status_comes_from_response_not_body() {
        let err = ApiError::from_response(
            ApiFamily::Papi,
            StatusCode::FORBIDDEN,
            br#"{"type":"/papi/v1/errors/forbidden","title":"Forbidden","status":500,"instance":"/papi/v1/x#1","errors":[{"title":"x"}]}"#,
        );

        assert_eq!(err.status, 403);
        assert_eq!(err.status_code(), Some(StatusCode::FORBIDDEN));
        assert_eq!(err.instance, "/papi/v1/x#1");
        assert_eq!(err.errors.len(), 1);
    }

    #[test]
    fn plain_text_falls_back_to_raw() {
        let err = ApiError::from_response(
            ApiFamily::NetStorage,
            StatusCode::INTERNAL_SERVER_ERROR,
            b"test",
        );
        assert_eq!(err, fallback(ApiFamily::NetStorage, "test", 500));
    }

    #[test]
    fn html_xml_and_free_text_are_kept_verbatim() {
        let bodies = [
            "<HTML><HEAD>...</HEAD><BODY>...</BODY></HTML>",
            "<Root><Item id=\"1\" name=\"Example\" /></Root>",
            "Your request did not succeed as this operation has reached  the limit for your account. Please try after 2024-01-16T15:20:55.945Z",
            "  line one\n  line two\n",
        ];

        for body in bodies {
            let err = ApiError::from_response(
                ApiFamily::Iam,
                StatusCode::SERVICE_UNAVAILABLE,
                body.as_bytes(),
            );
            assert_eq!(err, fallback(ApiFamily::Iam, body, 503));
        }
    }

    #[test]
    fn empty_body_is_a_fallback() {
        let err = ApiError::from_response(ApiFamily::Cloudlets, StatusCode::BAD_GATEWAY, b"");
        assert_eq!(err, fallback(ApiFamily::Cloudlets, "", 502));
    }

    #[test]
    fn json_arrays_and_scalars_fall_back_to_raw() {
        for body in [r#"["a","b","c"]"#, "[]", "42", r#""text""#, "null"] {
            let err = ApiError::from_response(
                ApiFamily::Papi,
                StatusCode::INTERNAL_SERVER_ERROR,
                body.as_bytes(),
            );
            assert_eq!(err, fallback(ApiFamily::Papi, body, 500));
        }
        assert_eq!(ErrorBody::parse(b"[]"), ErrorBody::Raw("[]".into()));
    }

    #[test]
    fn object_with_mistyped_field_falls_back_to_raw() {
        let body = r#"{"title":5}"#;
        let err =
            ApiError::from_response(ApiFamily::Iam, StatusCode::BAD_REQUEST, body.as_bytes());
        assert_eq!(err, fallback(ApiFamily::Iam, body, 400));
    }

    #[test]
    fn binary_body_is_preserved_lossily() {
        let err = ApiError::from_response(
            ApiFamily::Papi,
            StatusCode::INTERNAL_SERVER_ERROR,
            &[0x66, 0x6f, 0xff, 0x6f],
        );
        assert_eq!(err.detail, "fo\u{fffd}o");
        assert!(err.type_url.is_empty());
    }

    #[test]
    fn parse_reports_strategy() {
        assert!(matches!(
            ErrorBody::parse(br#"{"title":"t"}"#),
            ErrorBody::Structured(ProblemBody { ref title, .. }) if title == "t"
        ));
        assert_eq!(ErrorBody::parse(b"oops"), ErrorBody::Raw("oops".into()));
    }

    #[test]
    fn display_includes_status_and_detail() {
        let err = ApiError {
            title: "Not Found".into(),
            detail: "no such include".into(),
            status: 404,
            ..ApiError::default()
        };
        assert_eq!(err.to_string(), "API error 404: Not Found: no such include");
    }
}
