use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

const TWIML_CONTENT_TYPE: &str = "application/xml";

/// A `<Response>` with zero or more `<Message>` replies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagingResponse {
    messages: Vec<String>,
}

impl MessagingResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, body: impl Into<String>) -> Self {
        self.messages.push(body.into());
        self
    }

    pub fn render(&self) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#);
        for body in &self.messages {
            xml.push_str("<Message>");
            xml.push_str(&escape_xml(body));
            xml.push_str("</Message>");
        }
        xml.push_str("</Response>");
        xml
    }
}

impl IntoResponse for MessagingResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, [(CONTENT_TYPE, TWIML_CONTENT_TYPE)], self.render()).into_response()
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
