//! Domain name model (RFC 1035 §2.3.1, §3.1)
//!
//! Names are normalized at parse time: labels are lower-cased and validated
//! against the letter/digit/hyphen alphabet. The canonical text form is
//! lower-case and dot-terminated ("example.org."), which makes equality and
//! zone-containment checks purely structural.

use crate::errors::ResolverError;
use compact_str::CompactString;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Maximum length of the canonical text form, trailing dot included.
pub const MAX_NAME_LEN: usize = 255;

const MAX_LABEL_LEN: usize = 63;

/// One normalized DNS label.
///
/// A single leading underscore is tolerated for RFC 2782-style service
/// labels ("_sip", "_tcp").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(CompactString);

impl Label {
    pub fn new(text: &str) -> Result<Self, ResolverError> {
        if text.is_empty() {
            return Err(ResolverError::InvalidLabel("empty label".to_string()));
        }
        if text.len() > MAX_LABEL_LEN {
            return Err(ResolverError::InvalidLabel(format!(
                "'{}' is {} characters (max {})",
                text,
                text.len(),
                MAX_LABEL_LEN
            )));
        }

        let lowered = text.to_ascii_lowercase();
        let bytes = lowered.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            let ok = match b {
                b'a'..=b'z' | b'0'..=b'9' => true,
                b'-' => i != 0 && i != bytes.len() - 1,
                b'_' => i == 0,
                _ => false,
            };
            if !ok {
                return Err(ResolverError::InvalidLabel(format!(
                    "'{}' has an illegal character at position {}",
                    text, i
                )));
            }
        }

        Ok(Self(CompactString::from(lowered)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Label {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// An immutable, normalized domain name: the root, or an ordered sequence of
/// labels stored leaf-first ("ns1.example.org." is `["ns1", "example",
/// "org"]`). Suffix walks iterate the reverse order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DomainName {
    labels: SmallVec<[Label; 5]>,
}

impl DomainName {
    /// The root name, ".".
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label count; the root is level 0.
    pub fn level(&self) -> usize {
        self.labels.len()
    }

    /// Labels in leaf-to-root order.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Labels in root-to-leaf order, the order cache tries are walked in.
    pub fn labels_root_first(&self) -> impl DoubleEndedIterator<Item = &Label> {
        self.labels.iter().rev()
    }

    /// The name with the leaf label removed; `None` for the root.
    pub fn parent(&self) -> Option<DomainName> {
        if self.is_root() {
            return None;
        }
        Some(DomainName {
            labels: self.labels[1..].iter().cloned().collect(),
        })
    }

    /// Structural zone-containment test: true iff `other` is this name or
    /// one of its ancestors ("ns1.example.org." is below "example.org."
    /// and below "org.", but not below "example.com.").
    pub fn is_below(&self, other: &DomainName) -> bool {
        let n = self.labels.len();
        let m = other.labels.len();
        if m > n {
            return false;
        }
        self.labels[n - m..] == other.labels[..]
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            return f.write_str(".");
        }
        for label in &self.labels {
            write!(f, "{}.", label)?;
        }
        Ok(())
    }
}

impl FromStr for DomainName {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(ResolverError::InvalidName("empty name".to_string()));
        }
        if text == "." {
            return Err(ResolverError::InvalidName(
                "bare root is not a parseable name".to_string(),
            ));
        }

        let text = text.strip_suffix('.').unwrap_or(text);
        let mut labels = SmallVec::new();
        for part in text.split('.') {
            labels.push(Label::new(part)?);
        }

        let name = DomainName { labels };
        let canonical_len = name.to_string().len();
        if canonical_len > MAX_NAME_LEN {
            return Err(ResolverError::NameTooLong(canonical_len));
        }
        Ok(name)
    }
}

impl PartialEq<str> for DomainName {
    fn eq(&self, other: &str) -> bool {
        match other.trim() {
            "." => self.is_root(),
            text => text
                .parse::<DomainName>()
                .map_or(false, |name| name == *self),
        }
    }
}

impl PartialEq<&str> for DomainName {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
