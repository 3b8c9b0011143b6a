use crate::error::EppError;
use dropcatch_domain::DomainName;
use roxmltree::Document;

/// A decoded client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Check(DomainName),
    Create(DomainName),
    /// Anything else, including `check`/`create` without a usable name.
    Other,
}

impl Command {
    /// Parses one frame payload.
    ///
    /// `check` and `create` are recognised by local name anywhere in the document and
    /// `check` takes precedence. The identity is the first `name` element with
    /// non-empty text.
    pub fn parse(payload: &[u8]) -> Result<Self, EppError> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| EppError::protocol(format!("payload is not UTF-8: {e}")))?;
        let doc = Document::parse(text)?;

        let has = |local: &str| doc.descendants().any(|n| n.is_element() && n.tag_name().name() == local);
        let build: fn(DomainName) -> Self = if has("check") {
            Self::Check
        } else if has("create") {
            Self::Create
        } else {
            return Ok(Self::Other);
        };

        let identity = doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "name")
            .filter_map(|n| n.text().map(str::trim))
            .find(|t| !t.is_empty());

        match identity {
            Some(raw) => DomainName::parse(raw)
                .map(build)
                .map_err(|e| EppError::protocol(format!("bad identity {raw:?}: {e}"))),
            None => Ok(Self::Other),
        }
    }
}
