use crate::ResolveError;
use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// RFC 1035 §2.3.4 limits.
pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_WIRE_LEN: usize = 255;

/// An absolute domain name held as raw labels.
///
/// Comparison and hashing ignore ASCII case, matching how name servers treat
/// owner names. `Display` always renders the fully qualified form with a
/// trailing dot.
#[derive(Debug, Clone)]
pub struct DomainName {
    labels: SmallVec<[Box<[u8]>; 4]>,
}

impl DomainName {
    pub fn root() -> Self {
        Self {
            labels: SmallVec::new(),
        }
    }

    /// Parses presentation text, rejecting anything that is not a plausible
    /// host name: letters, digits, `-` and `_`, with no label starting or
    /// ending in `-`. A trailing dot is optional.
    pub fn parse(text: &str) -> Result<Self, ResolveError> {
        if text == "." {
            return Ok(Self::root());
        }
        let trimmed = text.strip_suffix('.').unwrap_or(text);
        if trimmed.is_empty() {
            return Err(ResolveError::InvalidName(format!("'{}' is empty", text)));
        }

        let mut labels = SmallVec::new();
        for label in trimmed.split('.') {
            validate_label(text, label)?;
            labels.push(label.as_bytes().into());
        }

        let name = Self { labels };
        if name.wire_len() > MAX_NAME_WIRE_LEN {
            return Err(ResolveError::InvalidName(format!(
                "'{}' exceeds {} octets",
                text, MAX_NAME_WIRE_LEN
            )));
        }
        Ok(name)
    }

    /// Builds a name from labels read off the wire. Only length limits are
    /// enforced; label content is arbitrary octets.
    pub fn from_labels<I, L>(labels: I) -> Result<Self, ResolveError>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut name = Self::root();
        for label in labels {
            let label = label.as_ref();
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return Err(ResolveError::InvalidName(format!(
                    "label length {} out of range",
                    label.len()
                )));
            }
            name.labels.push(label.into());
        }
        if name.wire_len() > MAX_NAME_WIRE_LEN {
            return Err(ResolveError::InvalidName(format!(
                "name exceeds {} octets",
                MAX_NAME_WIRE_LEN
            )));
        }
        Ok(name)
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> impl DoubleEndedIterator<Item = &[u8]> + ExactSizeIterator {
        self.labels.iter().map(|l| &**l)
    }

    /// Encoded length including length octets and the terminating root.
    pub fn wire_len(&self) -> usize {
        self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1
    }

    /// The name with its first `n` labels removed.
    pub fn suffix(&self, n: usize) -> DomainName {
        Self {
            labels: self.labels.iter().skip(n).cloned().collect(),
        }
    }

    pub fn to_fqdn(&self) -> String {
        self.to_string()
    }
}

fn validate_label(text: &str, label: &str) -> Result<(), ResolveError> {
    if label.is_empty() {
        return Err(ResolveError::InvalidName(format!(
            "'{}' contains an empty label",
            text
        )));
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(ResolveError::InvalidName(format!(
            "label '{}' in '{}' exceeds {} octets",
            label, text, MAX_LABEL_LEN
        )));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(ResolveError::InvalidName(format!(
            "label '{}' in '{}' starts or ends with '-'",
            label, text
        )));
    }
    if let Some(bad) = label
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(ResolveError::InvalidName(format!(
            "'{}' contains invalid character {:?}",
            text, bad
        )));
    }
    Ok(())
}

impl PartialEq for DomainName {
    fn eq(&self, other: &Self) -> bool {
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(other.labels.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Eq for DomainName {}

impl Hash for DomainName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.labels.len().hash(state);
        for label in &self.labels {
            for byte in label.iter() {
                state.write_u8(byte.to_ascii_lowercase());
            }
        }
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            return f.write_str(".");
        }
        for label in &self.labels {
            for &byte in label.iter() {
                match byte {
                    b'.' | b'\\' => write!(f, "\\{}", byte as char)?,
                    b'!'..=b'~' => write!(f, "{}", byte as char)?,
                    _ => write!(f, "\\{:03}", byte)?,
                }
            }
            f.write_str(".")?;
        }
        Ok(())
    }
}

impl FromStr for DomainName {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
