//! Rendering of request and response blocks into trace lines.
//!
//! Pure functions: nothing here touches a sink, so the layout is testable
//! without a backend.

use reqwest::header::HeaderMap;

use crate::executor::dispatch::ResponseRecord;
use crate::request::spec::RequestSpec;
use crate::request::version::{negotiated_label, ProtocolVersion};
use crate::trace::event::{TraceCategory, TraceEvent};

/// Lines describing the outgoing request, emitted before dispatch.
pub fn request_block(spec: &RequestSpec, ceiling: ProtocolVersion) -> Vec<TraceEvent> {
    let mut events = vec![
        TraceEvent::new(
            TraceCategory::RequestMeta,
            format!("Request Method: {} / {}", spec.method, ceiling),
        ),
        TraceEvent::new(TraceCategory::RequestMeta, format!("Url: {}", spec.url)),
    ];

    if !spec.headers.is_empty() {
        events.push(TraceEvent::new(TraceCategory::RequestHeader, "Request Headers:"));
        for (name, value) in spec.headers.iter() {
            events.push(TraceEvent::new(
                TraceCategory::RequestHeader,
                format!("  {}: {}", name, value),
            ));
        }
    }

    if !spec.cookies.is_empty() {
        events.push(TraceEvent::new(TraceCategory::RequestCookie, "Request Cookies:"));
        for (name, value) in spec.cookies.iter() {
            events.push(TraceEvent::new(
                TraceCategory::RequestCookie,
                format!("  {}={}", name, value),
            ));
        }
    }

    if !spec.body.is_empty() {
        events.push(TraceEvent::new(
            TraceCategory::RequestBody,
            format!("Request Body: {}", spec.body),
        ));
    }

    events
}

/// Lines describing the captured response.
pub fn response_block(record: &ResponseRecord, raw_output: bool) -> Vec<TraceEvent> {
    let mut events = vec![TraceEvent::new(
        TraceCategory::ResponseStatus,
        format!(
            "Response Code: {} / {}",
            record.status,
            negotiated_label(record.version)
        ),
    )];

    if record.headers.is_empty() {
        events.push(TraceEvent::new(TraceCategory::NoHeadersMarker, "No Headers Received"));
    } else {
        events.push(TraceEvent::new(TraceCategory::ResponseHeader, "Received Headers:"));
        events.extend(header_lines(&record.headers));
    }

    events.push(TraceEvent::new(TraceCategory::ResponseBody, "Received Payload:"));
    if raw_output {
        events.push(TraceEvent::new(TraceCategory::ResponseRaw, hex_dump(&record.raw)));
    }
    events.push(TraceEvent::new(TraceCategory::ResponseBody, record.text.clone()));

    events
}

/// One line per header name; repeated values are joined by a single space.
fn header_lines(headers: &HeaderMap) -> Vec<TraceEvent> {
    headers
        .keys()
        .map(|name| {
            let values = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(" ");
            TraceEvent::new(TraceCategory::ResponseHeader, format!("  {}: {}", name, values))
        })
        .collect()
}

/// Two-digit uppercase hex per byte, comma separated: `41, 42, 43`.
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(", ")
}
