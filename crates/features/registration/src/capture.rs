use crate::error::RegistrationError;
use dropcatch_domain::{CompetitorId, DropId, ResultCode};
use dropcatch_kernel::xml::{self, DROP_NS};
use roxmltree::{Document, Node};
use std::str::FromStr;

pub const DEFAULT_ATTEMPTS: u32 = 1;
pub const DEFAULT_DELAY_MS: i64 = 100;

/// A parsed `<command><capture>` document.
///
/// Fields are matched by local name, so `<drop:id>` and `<id>` are equivalent as long
/// as the document itself is namespace-well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub drop_id: DropId,
    pub name: String,
    pub attempts: u32,
    pub delay_ms: i64,
}

impl CaptureRequest {
    pub fn parse(body: &str) -> Result<Self, RegistrationError> {
        let doc = Document::parse(body).map_err(|e| RegistrationError::invalid(e.to_string()))?;
        let command = child(doc.root_element(), "command")
            .ok_or_else(|| RegistrationError::invalid("Missing <command>"))?;
        let capture =
            child(command, "capture").ok_or_else(|| RegistrationError::invalid("Missing <capture>"))?;

        let drop_id = field(capture, "id")
            .ok_or_else(|| RegistrationError::invalid("Missing <drop:id>"))
            .and_then(|raw| number::<u64>("drop:id", raw))?;
        let name = field(capture, "name")
            .ok_or_else(|| RegistrationError::invalid("Missing <drop:name>"))?
            .to_owned();
        let attempts =
            field(capture, "attempts").map_or(Ok(DEFAULT_ATTEMPTS), |raw| number("drop:attempts", raw))?;
        let delay_ms =
            field(capture, "delay_ms").map_or(Ok(DEFAULT_DELAY_MS), |raw| number("drop:delay_ms", raw))?;

        Ok(Self { drop_id: DropId(drop_id), name, attempts, delay_ms })
    }
}

fn child<'a, 'input>(parent: Node<'a, 'input>, local: &str) -> Option<Node<'a, 'input>> {
    parent.children().find(|n| n.is_element() && n.tag_name().name() == local)
}

/// Trimmed text of a child element; empty text counts as absent.
fn field<'a>(parent: Node<'a, '_>, local: &str) -> Option<&'a str> {
    child(parent, local).and_then(|n| n.text()).map(str::trim).filter(|t| !t.is_empty())
}

fn number<T: FromStr>(label: &str, raw: &str) -> Result<T, RegistrationError>
where
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| RegistrationError::invalid(format!("<{label}> {raw:?}: {e}")))
}

/// `1000` answer carrying the new competitor id.
#[must_use]
pub fn success_response(id: CompetitorId) -> String {
    let data = format!("<drop:competitor_id xmlns:drop=\"{DROP_NS}\">{id}</drop:competitor_id>");
    xml::response(ResultCode::Success, ResultCode::Success.message(), Some(&data))
}
