//! XML envelopes shared by the live protocol and the HTTP registration endpoint.

use chrono::{DateTime, SecondsFormat, Utc};
use dropcatch_domain::ResultCode;
use std::borrow::Cow;
use std::fmt::Write;

pub const EPP_NS: &str = "urn:ietf:params:xml:ns:epp-1.0";
pub const DOMAIN_NS: &str = "urn:ietf:params:xml:ns:domain-1.0";
pub const DROP_NS: &str = "urn:dropcatch:params:xml:ns:drop-1.0";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Escapes the five XML special characters; borrows when nothing needs escaping.
#[must_use]
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

#[must_use]
pub fn timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Session greeting sent once per connection before any command is read.
#[must_use]
pub fn greeting(server_id: &str, now: DateTime<Utc>) -> String {
    format!(
        "{XML_DECL}<epp xmlns=\"{EPP_NS}\"><greeting><svID>{}</svID><svDate>{}</svDate>\
         <svcMenu><version>1.0</version><lang>en</lang><objURI>{DOMAIN_NS}</objURI></svcMenu>\
         </greeting></epp>",
        escape(server_id),
        timestamp(now),
    )
}

/// A `<response>` envelope with a result code, message and optional `resData` body.
///
/// `res_data` is inserted verbatim and must already be well-formed.
#[must_use]
pub fn response(code: ResultCode, message: &str, res_data: Option<&str>) -> String {
    let mut out = String::with_capacity(256);
    let _ = write!(
        out,
        "{XML_DECL}<epp xmlns=\"{EPP_NS}\"><response><result code=\"{}\"><msg>{}</msg></result>",
        code.code(),
        escape(message),
    );
    if let Some(data) = res_data {
        let _ = write!(out, "<resData>{data}</resData>");
    }
    out.push_str("</response></epp>");
    out
}

/// Response using the code's default message.
#[must_use]
pub fn result(code: ResultCode) -> String {
    response(code, code.message(), None)
}
