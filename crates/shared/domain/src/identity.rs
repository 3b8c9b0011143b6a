use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("domain name is empty")]
    Empty,
    #[error("domain name has no suffix")]
    MissingSuffix,
    #[error("domain name has an empty label")]
    EmptyLabel,
}

/// A claimable identifier in `name.suffix` form.
///
/// The text is split at the first `.`, so `example.co.uk` has name `example` and
/// suffix `co.uk`. Both parts are stored lowercase; equality is therefore
/// case-insensitive with respect to the original input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainName {
    name: String,
    suffix: String,
}

impl DomainName {
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(IdentityError::Empty);
        }
        let (name, suffix) = raw.split_once('.').ok_or(IdentityError::MissingSuffix)?;
        Self::from_parts(name, suffix)
    }

    pub fn from_parts(name: &str, suffix: &str) -> Result<Self, IdentityError> {
        let (name, suffix) = (name.trim(), suffix.trim());
        if name.is_empty() || suffix.is_empty() {
            return Err(IdentityError::EmptyLabel);
        }
        Ok(Self { name: name.to_ascii_lowercase(), suffix: suffix.to_ascii_lowercase() })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.name, self.suffix)
    }
}

impl FromStr for DomainName {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DomainName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DomainName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
