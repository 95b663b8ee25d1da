/*
 * Responsibility
 * - find the raw bearer token in a request (pluggable: header, query, chain)
 * - `None` means "no token at all"; whether that is acceptable is decided downstream
 */
use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{HeaderMap, HeaderName, Uri, header};

pub trait TokenExtractor: Send + Sync {
    fn extract(&self, headers: &HeaderMap, uri: &Uri) -> Option<String>;
}

/// Reads a header (default `Authorization`), dropping an optional
/// case-insensitive `Bearer ` prefix.
#[derive(Debug, Clone)]
pub struct HeaderExtractor {
    name: HeaderName,
}

impl HeaderExtractor {
    pub fn new(name: HeaderName) -> Self {
        Self { name }
    }
}

impl Default for HeaderExtractor {
    fn default() -> Self {
        Self::new(header::AUTHORIZATION)
    }
}

impl TokenExtractor for HeaderExtractor {
    fn extract(&self, headers: &HeaderMap, _uri: &Uri) -> Option<String> {
        let value = headers.get(&self.name)?.to_str().ok()?.trim();
        let token = match value.split_once(char::is_whitespace) {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
            // "Bearer " with nothing after it, trimmed
            None if value.eq_ignore_ascii_case("bearer") => "",
            _ => value,
        };
        (!token.is_empty()).then(|| token.to_string())
    }
}

/// Reads a query parameter (default `access_token`).
#[derive(Debug, Clone)]
pub struct QueryExtractor {
    param: String,
}

impl QueryExtractor {
    pub fn new(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
        }
    }
}

impl Default for QueryExtractor {
    fn default() -> Self {
        Self::new("access_token")
    }
}

impl TokenExtractor for QueryExtractor {
    fn extract(&self, _headers: &HeaderMap, uri: &Uri) -> Option<String> {
        let Query(params) = Query::<HashMap<String, String>>::try_from_uri(uri).ok()?;
        params
            .get(&self.param)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

/// First extractor that finds a token wins.
pub struct ChainExtractor {
    extractors: Vec<Box<dyn TokenExtractor>>,
}

impl ChainExtractor {
    pub fn new(extractors: Vec<Box<dyn TokenExtractor>>) -> Self {
        Self { extractors }
    }

    /// `Authorization` header, then the `access_token` query parameter.
    pub fn oauth2() -> Self {
        Self::new(vec![
            Box::new(HeaderExtractor::default()),
            Box::new(QueryExtractor::default()),
        ])
    }
}

impl TokenExtractor for ChainExtractor {
    fn extract(&self, headers: &HeaderMap, uri: &Uri) -> Option<String> {
        self.extractors
            .iter()
            .find_map(|extractor| extractor.extract(headers, uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(auth: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        headers
    }

    fn root() -> Uri {
        Uri::from_static("/posts")
    }

    #[test]
    fn bearer_prefix_is_case_insensitive() {
        let ex = HeaderExtractor::default();
        assert_eq!(ex.extract(&headers("Bearer abc"), &root()).as_deref(), Some("abc"));
        assert_eq!(ex.extract(&headers("bearer abc"), &root()).as_deref(), Some("abc"));
        assert_eq!(ex.extract(&headers("BEARER   abc "), &root()).as_deref(), Some("abc"));
    }

    #[test]
    fn raw_header_value_is_passed_through() {
        let ex = HeaderExtractor::default();
        assert_eq!(ex.extract(&headers("abc.def.ghi"), &root()).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn empty_header_means_no_token() {
        let ex = HeaderExtractor::default();
        assert_eq!(ex.extract(&headers("Bearer "), &root()), None);
        assert_eq!(ex.extract(&headers("Bearer"), &root()), None);
        assert_eq!(ex.extract(&headers("bearer    "), &root()), None);
        assert_eq!(ex.extract(&HeaderMap::new(), &root()), None);
    }

    #[test]
    fn query_parameter() {
        let ex = QueryExtractor::default();
        let uri = Uri::from_static("/posts?page=2&access_token=abc");
        assert_eq!(ex.extract(&HeaderMap::new(), &uri).as_deref(), Some("abc"));
        assert_eq!(ex.extract(&HeaderMap::new(), &root()), None);
    }

    #[test]
    fn chain_prefers_header() {
        let ex = ChainExtractor::oauth2();
        let uri = Uri::from_static("/posts?access_token=from-query");
        assert_eq!(
            ex.extract(&headers("Bearer from-header"), &uri).as_deref(),
            Some("from-header")
        );
        assert_eq!(
            ex.extract(&HeaderMap::new(), &uri).as_deref(),
            Some("from-query")
        );
    }
}
