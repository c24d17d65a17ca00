//! Response-link resolution.
//!
//! Activation, deactivation and creation endpoints answer with a link to the
//! new resource (`/papi/v1/properties/prp_123?contractId=ctr_1`) instead of
//! its identifier. The identifier is the final path segment of that link.

use thiserror::Error;

/// Reasons a response link cannot be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseLinkError {
    /// The link was empty.
    #[error("link is empty")]
    Empty,

    /// The link contains no `/`-delimited path.
    #[error("link `{0}` has no path segments")]
    NoSegments(String),

    /// The link ends with `/`, leaving no identifier.
    #[error("link `{0}` ends without an identifier")]
    TrailingSlash(String),
}

/// Extract the trailing identifier from a response link.
///
/// Query strings and fragments are ignored; absolute URLs and server-relative
/// paths are both accepted.
///
/// # Errors
///
/// Returns [`ResponseLinkError`] when the link is empty, has no `/`, or ends
/// with an empty segment.
pub fn parse_response_link(link: &str) -> Result<String, ResponseLinkError> {
    let path = link
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();

    if path.is_empty() {
        return Err(ResponseLinkError::Empty);
    }

    match path.rsplit_once('/') {
        None => Err(ResponseLinkError::NoSegments(link.to_string())),
        Some((_, "")) => Err(ResponseLinkError::TrailingSlash(link.to_string())),
        Some((_, id)) => Ok(id.to_string()),
    }
}

/// Success responses that carry a link whose identifier must be resolved.
pub trait LinkedResponse {
    /// The raw link returned by the API.
    fn response_link(&self) -> &str;

    /// Store the identifier resolved from [`Self::response_link`].
    fn attach_id(&mut self, id: String);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_trailing_segment() {
        assert_eq!(
            parse_response_link("/papi/v1/properties/prp_123").unwrap(),
            "prp_123"
        );
    }

    #[test]
    fn ignores_query_and_fragment() {
        assert_eq!(
            parse_response_link("/papi/v1/properties/prp_123?contractId=ctr_1&groupId=grp_2")
                .unwrap(),
            "prp_123"
        );
        assert_eq!(
            parse_response_link("/papi/v1/includes/inc_1/activations/atv_9#top").unwrap(),
            "atv_9"
        );
    }

    #[test]
    fn accepts_absolute_urls() {
        assert_eq!(
            parse_response_link("https://akab-host.luna.akamaiapis.net/papi/v1/includes/inc_1/activations/atv_42")
                .unwrap(),
            "atv_42"
        );
    }

    #[test]
    fn rejects_empty_link() {
        assert_eq!(parse_response_link(""), Err(ResponseLinkError::Empty));
        assert_eq!(parse_response_link("?a=b"), Err(ResponseLinkError::Empty));
    }

    #[test]
    fn rejects_trailing_slash() {
        assert!(matches!(
            parse_response_link("/papi/v1/properties/"),
            Err(ResponseLinkError::TrailingSlash(_))
        ));
        assert!(matches!(
            parse_response_link("/papi/v1/properties/?contractId=1"),
            Err(ResponseLinkError::TrailingSlash(_))
        ));
    }

    #[test]
    fn rejects_link_without_path() {
        assert_eq!(
            parse_response_link("prp_123"),
            Err(ResponseLinkError::NoSegments("prp_123".to_string()))
        );
    }
}
