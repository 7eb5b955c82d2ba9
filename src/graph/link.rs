//! Link type and related structures.
//!
//! Links are the flows between nodes. Each link has:
//! - A stable identifier (its position in the input list)
//! - Source and target node references, by name or by index
//! - A non-negative flow value

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

use super::node::NodeId;

/// Stable link identifier.
///
/// Links are processed in identifier order, which fixes their stacking order
/// on both endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct LinkId(pub u32);

impl LinkId {
    /// Create a new LinkId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Create a LinkId from a list position.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Get the list position.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Link({})", self.0)
    }
}

impl From<u32> for LinkId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Reference to a link endpoint: a node name or a zero-based index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRef {
    Name(String),
    /// Signed so that negative input survives until bounds checking.
    Index(i64),
}

impl From<&str> for NodeRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for NodeRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<i64> for NodeRef {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl From<usize> for NodeRef {
    fn from(index: usize) -> Self {
        Self::Index(index as i64)
    }
}

impl<'de> Deserialize<'de> for NodeRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NodeRefVisitor;

        impl Visitor<'_> for NodeRefVisitor {
            type Value = NodeRef;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a node name or a zero-based node index")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<NodeRef, E> {
                Ok(NodeRef::Name(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<NodeRef, E> {
                Ok(NodeRef::Name(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<NodeRef, E> {
                Ok(NodeRef::Index(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<NodeRef, E> {
                i64::try_from(v)
                    .map(NodeRef::Index)
                    .map_err(|_| E::custom(format!("node index {v} is too large")))
            }

            // JavaScript numbers arrive as f64
            fn visit_f64<E: de::Error>(self, v: f64) -> Result<NodeRef, E> {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                    Ok(NodeRef::Index(v as i64))
                } else {
                    Err(E::custom(format!("node index {v} is not an integer")))
                }
            }
        }

        deserializer.deserialize_any(NodeRefVisitor)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name:?}"),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Raw link value before numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkValue {
    Number(f64),
    /// Numeric text such as `"12.5"`.
    Text(String),
    /// Anything that cannot be a number (booleans, null, missing).
    Invalid(String),
}

impl LinkValue {
    /// Coerce to a finite, non-negative number.
    pub fn coerce(&self) -> Option<f64> {
        let value = match self {
            Self::Number(v) => *v,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
            Self::Invalid(_) => return None,
        };
        (value.is_finite() && value >= 0.0).then_some(value)
    }
}

impl Default for LinkValue {
    fn default() -> Self {
        Self::Invalid("undefined".to_string())
    }
}

impl From<f64> for LinkValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for LinkValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl fmt::Display for LinkValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(text) => f.write_str(text),
            Self::Invalid(what) => f.write_str(what),
        }
    }
}

impl<'de> Deserialize<'de> for LinkValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LinkValueVisitor;

        impl Visitor<'_> for LinkValueVisitor {
            type Value = LinkValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a link value")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<LinkValue, E> {
                Ok(LinkValue::Number(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<LinkValue, E> {
                Ok(LinkValue::Number(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<LinkValue, E> {
                Ok(LinkValue::Number(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<LinkValue, E> {
                Ok(LinkValue::Text(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<LinkValue, E> {
                Ok(LinkValue::Invalid(v.to_string()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<LinkValue, E> {
                Ok(LinkValue::Invalid("null".to_string()))
            }

            fn visit_none<E: de::Error>(self) -> Result<LinkValue, E> {
                Ok(LinkValue::Invalid("null".to_string()))
            }
        }

        deserializer.deserialize_any(LinkValueVisitor)
    }
}

/// Link descriptor as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinkSpec {
    pub source: NodeRef,
    pub target: NodeRef,
    #[serde(default)]
    pub value: LinkValue,
}

impl LinkSpec {
    pub fn new(source: impl Into<NodeRef>, target: impl Into<NodeRef>, value: impl Into<LinkValue>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value: value.into(),
        }
    }
}

/// Resolved link stored in the flow graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowLink {
    pub source: NodeId,
    pub target: NodeId,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_id() {
        let id = LinkId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.index(), 42);
        assert_eq!(format!("{}", id), "Link(42)");
    }

    #[test]
    fn test_node_ref_from_json() {
        let refs: Vec<NodeRef> = serde_json::from_str(r#"["Coal", 2, 3.0, -1]"#).unwrap();
        assert_eq!(
            refs,
            vec![
                NodeRef::Name("Coal".into()),
                NodeRef::Index(2),
                NodeRef::Index(3),
                NodeRef::Index(-1),
            ]
        );
        assert!(serde_json::from_str::<NodeRef>("1.5").is_err());
        assert!(serde_json::from_str::<NodeRef>("true").is_err());
    }

    #[test]
    fn test_link_value_coercion() {
        assert_eq!(LinkValue::Number(10.0).coerce(), Some(10.0));
        assert_eq!(LinkValue::Number(0.0).coerce(), Some(0.0));
        assert_eq!(LinkValue::from(" 12.5 ").coerce(), Some(12.5));
        assert_eq!(LinkValue::Number(-5.0).coerce(), None);
        assert_eq!(LinkValue::Number(f64::NAN).coerce(), None);
        assert_eq!(LinkValue::Number(f64::INFINITY).coerce(), None);
        assert_eq!(LinkValue::from("ten").coerce(), None);
        assert_eq!(LinkValue::default().coerce(), None);
    }

    #[test]
    fn test_link_spec_from_json() {
        let spec: LinkSpec =
            serde_json::from_str(r#"{"source":"A","target":1,"value":"7"}"#).unwrap();
        assert_eq!(spec, LinkSpec::new("A", 1usize, "7"));

        let missing: LinkSpec = serde_json::from_str(r#"{"source":0,"target":1}"#).unwrap();
        assert_eq!(missing.value, LinkValue::default());

        let null: LinkSpec =
            serde_json::from_str(r#"{"source":0,"target":1,"value":null}"#).unwrap();
        assert_eq!(null.value.coerce(), None);

        let flag: LinkSpec =
            serde_json::from_str(r#"{"source":0,"target":1,"value":true}"#).unwrap();
        assert_eq!(flag.value, LinkValue::Invalid("true".into()));
    }
}
