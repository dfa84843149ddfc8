//! Validation boundary between loosely typed inputs and the transport.
//!
//! Every string the caller handed over is parsed here, once. Anything the
//! transport would reject later is rejected now as `InvalidRequest`.

use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::Method;
use url::Url;

use crate::executor::error::{ExecResult, ExecutionError};
use crate::request::spec::RequestSpec;

/// A request whose method, URL and headers are known to be well formed.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    /// Outgoing headers in send order. Duplicate names are kept.
    pub headers: Vec<(HeaderName, HeaderValue)>,
    /// UTF-8 bytes of the body, absent when the caller's body was empty.
    pub body: Option<Vec<u8>>,
}

impl PreparedRequest {
    /// Parse and validate `spec`.
    ///
    /// Header order is: body content type (only with a body), the caller's
    /// headers in mapping order, then the synthesized `Cookie` header. An
    /// explicit `Cookie` entry in the caller's headers is sent as well.
    pub fn assemble(spec: &RequestSpec, default_content_type: &str) -> ExecResult<Self> {
        let method = Method::from_bytes(spec.method.as_bytes()).map_err(|e| {
            ExecutionError::InvalidRequest(format!("method '{}': {}", spec.method, e))
        })?;

        let url = Url::parse(&spec.url)
            .map_err(|e| ExecutionError::InvalidRequest(format!("url '{}': {}", spec.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ExecutionError::InvalidRequest(format!(
                "url '{}': unsupported scheme '{}'",
                spec.url,
                url.scheme()
            )));
        }

        let mut headers = Vec::with_capacity(spec.headers.len() + 2);

        let body = if spec.body.is_empty() {
            None
        } else {
            let content_type = spec.content_type.as_deref().unwrap_or(default_content_type);
            let value = HeaderValue::from_str(content_type).map_err(|e| {
                ExecutionError::InvalidRequest(format!("content type '{}': {}", content_type, e))
            })?;
            headers.push((CONTENT_TYPE, value));
            Some(spec.body.as_bytes().to_vec())
        };

        for (name, value) in spec.headers.iter() {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ExecutionError::InvalidRequest(format!("header name '{}': {}", name, e))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                ExecutionError::InvalidRequest(format!("header '{}' value: {}", name, e))
            })?;
            headers.push((header_name, header_value));
        }

        if let Some(cookie) = spec.cookie_header() {
            let value = HeaderValue::from_str(&cookie)
                .map_err(|e| ExecutionError::InvalidRequest(format!("cookie header: {}", e)))?;
            headers.push((COOKIE, value));
        }

        Ok(Self {
            method,
            url,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::error::ErrorKind;
    use crate::request::spec::DEFAULT_CONTENT_TYPE;

    fn spec(method: &str, url: &str) -> RequestSpec {
        RequestSpec::new(method, url)
    }

    fn header_values<'a>(prepared: &'a PreparedRequest, name: &HeaderName) -> Vec<&'a HeaderValue> {
        prepared
            .headers
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v)
            .collect()
    }

    #[test]
    fn test_headers_in_mapping_order() {
        let mut s = spec("GET", "http://localhost/");
        s.headers.insert("X-Third", "3");
        s.headers.insert("X-First", "1");
        s.headers.insert("X-Second", "2");

        let prepared = PreparedRequest::assemble(&s, DEFAULT_CONTENT_TYPE).unwrap();
        let got: Vec<(&str, &str)> = prepared
            .headers
            .iter()
            .map(|(n, v)| (n.as_str(), v.to_str().unwrap()))
            .collect();
        assert_eq!(got, vec![("x-third", "3"), ("x-first", "1"), ("x-second", "2")]);
    }

    #[test]
    fn test_empty_body_has_no_content_type() {
        let mut s = spec("POST", "http://localhost/");
        s.content_type = Some("application/json".into());

        let prepared = PreparedRequest::assemble(&s, DEFAULT_CONTENT_TYPE).unwrap();
        assert!(prepared.body.is_none());
        assert!(header_values(&prepared, &CONTENT_TYPE).is_empty());
        assert!(prepared.headers.is_empty());
    }

    #[test]
    fn test_body_gets_default_content_type() {
        let mut s = spec("POST", "http://localhost/");
        s.body = "a=1&b=2".into();

        let prepared = PreparedRequest::assemble(&s, DEFAULT_CONTENT_TYPE).unwrap();
        assert_eq!(prepared.body.as_deref(), Some("a=1&b=2".as_bytes()));
        assert_eq!(
            header_values(&prepared, &CONTENT_TYPE),
            vec![&HeaderValue::from_static("application/x-www-form-urlencoded")]
        );
    }

    #[test]
    fn test_body_uses_caller_content_type() {
        let mut s = spec("POST", "https://example.com/api");
        s.body = r#"{"a":1}"#.into();
        s.content_type = Some("application/json".into());

        let prepared = PreparedRequest::assemble(&s, DEFAULT_CONTENT_TYPE).unwrap();
        assert_eq!(prepared.headers[0].0, CONTENT_TYPE);
        assert_eq!(prepared.headers[0].1, "application/json");
    }

    #[test]
    fn test_cookie_header_appended_after_headers() {
        let mut s = spec("GET", "http://localhost/");
        s.headers.insert("Cookie", "explicit=1");
        s.cookies.insert("a", "1");
        s.cookies.insert("b", "2");

        let prepared = PreparedRequest::assemble(&s, DEFAULT_CONTENT_TYPE).unwrap();
        let cookies = header_values(&prepared, &COOKIE);
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0], "explicit=1");
        assert_eq!(cookies[1], "a=1; b=2");
        assert_eq!(prepared.headers.last().map(|(n, _)| n), Some(&COOKIE));
    }

    #[test]
    fn test_custom_method_passes_through() {
        let purge = spec("PURGE", "http://localhost/");
        let prepared = PreparedRequest::assemble(&purge, DEFAULT_CONTENT_TYPE).unwrap();
        assert_eq!(prepared.method.as_str(), "PURGE");
    }

    #[test]
    fn test_invalid_inputs_are_invalid_request() {
        let cases = vec![
            spec("", "http://localhost/"),
            spec("GE T", "http://localhost/"),
            spec("GET", "not a url"),
            spec("GET", "ftp://localhost/file"),
        ];
        for s in cases {
            let err = PreparedRequest::assemble(&s, DEFAULT_CONTENT_TYPE).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidRequest, "{:?}", s);
        }

        let mut bad_name = spec("GET", "http://localhost/");
        bad_name.headers.insert("Bad Header", "x");
        assert_eq!(
            PreparedRequest::assemble(&bad_name, DEFAULT_CONTENT_TYPE).unwrap_err().kind(),
            ErrorKind::InvalidRequest
        );

        let mut bad_value = spec("GET", "http://localhost/");
        bad_value.headers.insert("X-Ok", "line\nbreak");
        assert_eq!(
            PreparedRequest::assemble(&bad_value, DEFAULT_CONTENT_TYPE).unwrap_err().kind(),
            ErrorKind::InvalidRequest
        );

        let mut bad_type = spec("POST", "http://localhost/");
        bad_type.body = "x".into();
        bad_type.content_type = Some("text/plain\r\n".into());
        assert_eq!(
            PreparedRequest::assemble(&bad_type, DEFAULT_CONTENT_TYPE).unwrap_err().kind(),
            ErrorKind::InvalidRequest
        );
    }
}
