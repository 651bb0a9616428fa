//! core type-safe wrappers used by the commit graph.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle to a commit owned by the [`GraphStore`](crate::graph::GraphStore).
///
/// Parent, merge-parent and child links are stored as handles, never as
/// owning pointers. Handles are allocated monotonically and never reused,
/// so a handle to a collected commit simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitKey(pub(crate) u64);

impl CommitKey {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// raw handle value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Layout column a commit or a reference lineage is drawn in.
pub type Swimlane = u32;

/// A display color, kept as the CSS-style string the renderer consumes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated branch name.
///
/// Branch names come straight from user input, so they are checked before
/// anything touches the graph:
/// - 1-64 characters
/// - ASCII alphanumerics plus `-`, `_`, `.` and `/`
/// - cannot start with `-`, `.` or `/`, cannot end with `/`, no `..`
/// - `HEAD` is reserved
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// the branch every new graph starts with
    pub const DEFAULT: &'static str = "master";

    const MAX_LEN: usize = 64;

    /// create a new BranchName, validating the input
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidNameError> {
        let name = name.into();
        validate_ref_name(&name, Self::MAX_LEN)?;
        Ok(Self(name))
    }

    /// the default branch
    pub fn default_branch() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    /// first character, used for auto-generated commit ids and the
    /// unambiguous-abbreviation rule
    pub fn initial(&self) -> char {
        // validated names are never empty
        self.0.chars().next().unwrap_or('?')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for BranchName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl TryFrom<String> for BranchName {
    type Error = InvalidNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BranchName> for String {
    fn from(value: BranchName) -> Self {
        value.0
    }
}

/// A validated tag name. Same character rules as [`BranchName`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
    const MAX_LEN: usize = 64;

    pub fn new(name: impl Into<String>) -> Result<Self, InvalidNameError> {
        let name = name.into();
        validate_ref_name(&name, Self::MAX_LEN)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for TagName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl TryFrom<String> for TagName {
    type Error = InvalidNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TagName> for String {
    fn from(value: TagName) -> Self {
        value.0
    }
}

/// Name reserved for the HEAD reference.
pub const HEAD: &str = "HEAD";

fn validate_ref_name(name: &str, max_len: usize) -> Result<(), InvalidNameError> {
    if name.is_empty() {
        return Err(InvalidNameError::Empty);
    }

    if name.len() > max_len {
        return Err(InvalidNameError::TooLong(name.len()));
    }

    if name == HEAD {
        return Err(InvalidNameError::Reserved(name.to_string()));
    }

    // checked above
    let first_char = name.chars().next().unwrap_or('-');
    if matches!(first_char, '-' | '.' | '/') {
        return Err(InvalidNameError::InvalidStart(first_char));
    }

    for (i, c) in name.chars().enumerate() {
        if !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_' | '.' | '/') {
            return Err(InvalidNameError::InvalidCharacter { char: c, position: i });
        }
    }

    if name.contains("..") || name.contains("//") || name.ends_with('/') {
        return Err(InvalidNameError::InvalidPath(name.to_string()));
    }

    Ok(())
}

/// Validate a caller-supplied commit id (merge ids, cherry-pick copies).
pub(crate) fn validate_commit_id(id: &str) -> Result<(), InvalidNameError> {
    if id.is_empty() {
        return Err(InvalidNameError::Empty);
    }
    if id.len() > 128 {
        return Err(InvalidNameError::TooLong(id.len()));
    }
    for (i, c) in id.chars().enumerate() {
        if c.is_whitespace() || c.is_control() {
            return Err(InvalidNameError::InvalidCharacter { char: c, position: i });
        }
    }
    Ok(())
}

/// error type for invalid names (branches, tags, commit ids)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidNameError {
    Empty,
    TooLong(usize),
    InvalidStart(char),
    InvalidCharacter { char: char, position: usize },
    Reserved(String),
    InvalidPath(String),
}

impl fmt::Display for InvalidNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "name cannot be empty"),
            Self::TooLong(len) => write!(f, "name too long: {} characters", len),
            Self::InvalidStart(c) => write!(f, "name cannot start with '{}'", c),
            Self::InvalidCharacter { char, position } => {
                write!(f, "invalid character '{}' at position {}", char.escape_debug(), position)
            }
            Self::Reserved(name) => write!(f, "'{}' is a reserved name", name),
            Self::InvalidPath(path) => write!(f, "malformed name: '{}'", path),
        }
    }
}

impl std::error::Error for InvalidNameError {}
