//! Declared visibility as it appears in source, before it is mapped onto
//! the module tree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CrateGraphError;

/// The visibility written on a declaration.
///
/// This is purely syntactic: `pub(in a::b)` keeps its path as text, and it is
/// up to the resolver to decide which module (if any) it names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RawVisibility {
    /// No visibility keyword.
    #[default]
    Private,
    /// `pub`
    Public,
    /// `pub(crate)`
    Crate,
    /// `pub(super)`
    Super,
    /// `pub(self)`
    SelfModule,
    /// `pub(in path)`, with the path text as written.
    In(String),
}

impl RawVisibility {
    pub fn is_public(&self) -> bool {
        matches!(self, RawVisibility::Public)
    }
}

impl FromStr for RawVisibility {
    type Err = CrateGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let vis = match compact.as_str() {
            "" | "priv" | "private" => RawVisibility::Private,
            "pub" => RawVisibility::Public,
            "pub(crate)" => RawVisibility::Crate,
            "pub(super)" => RawVisibility::Super,
            "pub(self)" => RawVisibility::SelfModule,
            // `pub(in path)`: the space after `in` is significant, so this
            // one is peeled from the original text.
            _ => parse_restricted(s)
                .ok_or_else(|| CrateGraphError::InvalidVisibility(s.to_string()))?,
        };
        Ok(vis)
    }
}

fn parse_restricted(s: &str) -> Option<RawVisibility> {
    let inner = s
        .trim()
        .strip_prefix("pub")?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?
        .trim();
    let path = inner.strip_prefix("in")?;
    if !path.starts_with(char::is_whitespace) {
        return None;
    }
    let path: String = path.split_whitespace().collect();
    if path.is_empty() {
        return None;
    }
    Some(RawVisibility::In(path))
}

impl TryFrom<String> for RawVisibility {
    type Error = CrateGraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RawVisibility> for String {
    fn from(vis: RawVisibility) -> Self {
        vis.to_string()
    }
}

impl fmt::Display for RawVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawVisibility::Private => Ok(()),
            RawVisibility::Public => f.write_str("pub"),
            RawVisibility::Crate => f.write_str("pub(crate)"),
            RawVisibility::Super => f.write_str("pub(super)"),
            RawVisibility::SelfModule => f.write_str("pub(self)"),
            RawVisibility::In(path) => write!(f, "pub(in {path})"),
        }
    }
}
