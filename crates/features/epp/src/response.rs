//! Command responses.

use chrono::{DateTime, Utc};
use dropcatch_domain::{DomainName, ResultCode};
use dropcatch_kernel::xml::{self, DOMAIN_NS};

#[must_use]
pub fn greeting(server_id: &str, now: DateTime<Utc>) -> String {
    xml::greeting(server_id, now)
}

#[must_use]
pub fn generic_success() -> String {
    xml::result(ResultCode::Success)
}

#[must_use]
pub fn check(name: &DomainName, available: bool) -> String {
    let data = format!(
        "<domain:chkData xmlns:domain=\"{DOMAIN_NS}\"><domain:cd>\
         <domain:name avail=\"{}\">{}</domain:name></domain:cd></domain:chkData>",
        u8::from(available),
        xml::escape(&name.to_string()),
    );
    xml::response(ResultCode::Success, ResultCode::Success.message(), Some(&data))
}

#[must_use]
pub fn create_success(name: &DomainName, created_at: DateTime<Utc>) -> String {
    let data = format!(
        "<domain:creData xmlns:domain=\"{DOMAIN_NS}\"><domain:name>{}</domain:name>\
         <domain:crDate>{}</domain:crDate></domain:creData>",
        xml::escape(&name.to_string()),
        xml::timestamp(created_at),
    );
    xml::response(ResultCode::Success, ResultCode::Success.message(), Some(&data))
}

#[must_use]
pub fn create_failure() -> String {
    xml::result(ResultCode::ObjectExists)
}
