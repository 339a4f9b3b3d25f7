//! Names and paths.
//!
//! Two kinds of paths show up during resolution: `ModPath`, the canonical
//! location of a module or item inside a specific crate, and `Path`, the
//! relative text a `use` or an expression writes (`super::a::b`, `crate::x`).

use std::borrow::Borrow;
use std::fmt;

use defmap_item_tree::CrateId;

/// An identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new(text: &str) -> Self {
        Name(text.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `_`, which binds nothing.
    pub fn is_underscore(&self) -> bool {
        self.0 == "_"
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Name::new(text)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Absolute location of a module or item: the owning crate plus the segments
/// from its root. The empty path is the crate root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModPath {
    krate: CrateId,
    segments: Vec<Name>,
}

impl ModPath {
    pub fn root(krate: CrateId) -> Self {
        ModPath { krate, segments: Vec::new() }
    }

    pub fn new(krate: CrateId, segments: Vec<Name>) -> Self {
        ModPath { krate, segments }
    }

    pub fn krate(&self) -> CrateId {
        self.krate
    }

    pub fn segments(&self) -> &[Name] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&Name> {
        self.segments.last()
    }

    /// The enclosing path, or `None` for the crate root.
    pub fn parent(&self) -> Option<ModPath> {
        let (_, init) = self.segments.split_last()?;
        Some(ModPath { krate: self.krate, segments: init.to_vec() })
    }

    pub fn append(&self, name: Name) -> ModPath {
        let mut segments = self.segments.clone();
        segments.push(name);
        ModPath { krate: self.krate, segments }
    }

    /// Renders the path with the given name for the crate root.
    pub fn display_with(&self, root: &str) -> String {
        let mut out = root.to_string();
        for segment in &self.segments {
            out.push_str("::");
            out.push_str(segment.as_str());
        }
        out
    }
}

/// How the leading part of a textual path is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    /// `a::b`
    Plain,
    /// `crate::a` (and `$crate::a`)
    Crate,
    /// `super::a` climbs one level, `self::a` is `Super(0)`.
    Super(u8),
    /// `::a`
    Abs,
}

/// A relative path as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    kind: PathKind,
    segments: Vec<Name>,
}

impl Path {
    pub fn new(kind: PathKind, segments: Vec<Name>) -> Self {
        Path { kind, segments }
    }

    /// A single plain segment.
    pub fn plain(name: Name) -> Self {
        Path { kind: PathKind::Plain, segments: vec![name] }
    }

    /// Parses `::`-separated path text. Returns `None` for empty segments,
    /// misplaced keywords, or a bare `::`.
    pub fn parse(text: &str) -> Option<Path> {
        let text = text.trim();
        let (abs, rest) = match text.strip_prefix("::") {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let raw: Vec<&str> = rest.split("::").map(str::trim).collect();
        if raw.iter().any(|segment| segment.is_empty()) {
            return None;
        }

        let mut kind = if abs { PathKind::Abs } else { PathKind::Plain };
        let mut idx = 0;
        if !abs {
            match raw[0] {
                "crate" | "$crate" => {
                    kind = PathKind::Crate;
                    idx = 1;
                }
                "self" => {
                    kind = PathKind::Super(0);
                    idx = 1;
                }
                "super" => kind = PathKind::Super(0),
                _ => {}
            }
            if let PathKind::Super(mut level) = kind {
                while raw.get(idx) == Some(&"super") {
                    level = level.checked_add(1)?;
                    idx += 1;
                }
                kind = PathKind::Super(level);
            }
        }

        let segments: Vec<Name> = raw[idx..].iter().map(|s| Name::new(s)).collect();
        let misplaced = segments
            .iter()
            .any(|s| matches!(s.as_str(), "crate" | "$crate" | "self" | "super"));
        if misplaced || (abs && segments.is_empty()) {
            return None;
        }
        Some(Path { kind, segments })
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    pub fn segments(&self) -> &[Name] {
        &self.segments
    }

    pub fn first_segment(&self) -> Option<&Name> {
        self.segments.first()
    }

    pub fn last_segment(&self) -> Option<&Name> {
        self.segments.last()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        match self.kind {
            PathKind::Plain => {}
            PathKind::Crate => parts.push("crate".to_string()),
            PathKind::Super(0) => parts.push("self".to_string()),
            PathKind::Super(n) => parts.extend((0..n).map(|_| "super".to_string())),
            PathKind::Abs => parts.push(String::new()),
        }
        parts.extend(self.segments.iter().map(|s| s.to_string()));
        f.write_str(&parts.join("::"))
    }
}
