//! Tolerant navigation over parsed YAML documents
//!
//! Manifests are read as untyped `serde_yaml::Value` trees. Extractors never
//! index into those trees directly; they walk them with a [`Node`] cursor.
//! Every step checks both existence and type, and any miss turns the cursor
//! into an absent node that stays absent for the rest of the chain:
//!
//! ```
//! use pico_core::Document;
//!
//! let doc = Document::parse("spec:\n  replicas: 3\n").unwrap();
//!
//! assert_eq!(doc.root().get("spec").get("replicas").as_i64(), Some(3));
//! assert_eq!(doc.root().path("spec.template.spec.containers[0].image").as_str(), None);
//! ```
//!
//! A YAML `null` is treated the same as a missing key.

use serde::Deserialize;
use serde_yaml::{Mapping, Sequence, Value};

use crate::error::Result;

/// A parsed YAML document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Wrap an already parsed value
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Parse a single YAML document
    pub fn parse(yaml: &str) -> Result<Self> {
        let root: Value = serde_yaml::from_str(yaml)?;
        Ok(Self { root })
    }

    /// Parse every document of a `---` separated YAML stream
    ///
    /// An empty stream yields an empty vector.
    pub fn parse_all(yaml: &str) -> Result<Vec<Self>> {
        let mut documents = Vec::new();
        for de in serde_yaml::Deserializer::from_str(yaml) {
            let root = Value::deserialize(de)?;
            documents.push(Self { root });
        }
        Ok(documents)
    }

    /// Cursor positioned at the document root
    pub fn root(&self) -> Node<'_> {
        Node::new(&self.root)
    }

    /// The `kind` field, if the document has one
    pub fn kind(&self) -> Option<&str> {
        self.root().get("kind").as_str()
    }

    /// Whether the document has no content at all
    pub fn is_empty(&self) -> bool {
        !self.root().is_present()
    }

    /// Whether the top level is a mapping
    pub fn is_mapping(&self) -> bool {
        self.root().as_mapping().is_some()
    }
}

/// Outcome of a lookup: either the value that was found, or nothing
///
/// "Nothing" covers a missing key, an out of range index, a `null`, and a
/// step that expected a mapping or sequence but met something else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a Value),
    Absent,
}

impl<'a> Lookup<'a> {
    /// Whether a value was found
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The found value, if any
    pub fn into_option(self) -> Option<&'a Value> {
        match self {
            Self::Found(value) => Some(value),
            Self::Absent => None,
        }
    }
}

impl<'a> From<Lookup<'a>> for Option<&'a Value> {
    fn from(lookup: Lookup<'a>) -> Self {
        lookup.into_option()
    }
}

/// Chainable, short-circuiting cursor into a YAML tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node<'a>(Lookup<'a>);

impl<'a> Node<'a> {
    /// Cursor over `value`; tags are peeled off and `null` becomes absent
    pub fn new(value: &'a Value) -> Self {
        match untag(value) {
            Value::Null => Self::absent(),
            value => Self(Lookup::Found(value)),
        }
    }

    /// Cursor that points at nothing
    pub const fn absent() -> Self {
        Self(Lookup::Absent)
    }

    /// Look up a literal mapping key
    ///
    /// The key is not split, so annotation keys such as
    /// `collectord.io/index` work as expected.
    pub fn get(self, key: &str) -> Self {
        match self.0 {
            Lookup::Found(Value::Mapping(map)) => map.get(key).map_or(Self::absent(), Self::new),
            _ => Self::absent(),
        }
    }

    /// Look up a sequence element
    pub fn index(self, index: usize) -> Self {
        match self.0 {
            Lookup::Found(Value::Sequence(seq)) => {
                seq.get(index).map_or(Self::absent(), Self::new)
            }
            _ => Self::absent(),
        }
    }

    /// First sequence element
    pub fn first(self) -> Self {
        self.index(0)
    }

    /// Follow a dotted path such as `spec.template.spec.containers[0].image`
    ///
    /// Each dot separated segment is a mapping key, optionally followed by
    /// one or more `[n]` sequence indices. An empty path returns the node
    /// itself; a malformed path is absent.
    pub fn path(self, path: &str) -> Self {
        if path.is_empty() {
            return self;
        }

        let Some(segments) = parse_path(path) else {
            return Self::absent();
        };

        segments
            .into_iter()
            .fold(self, |node, segment| match segment {
                Segment::Key(key) => node.get(key),
                Segment::Index(index) => node.index(index),
            })
    }

    /// Underlying lookup outcome
    pub fn lookup(self) -> Lookup<'a> {
        self.0
    }

    /// Whether the cursor points at a non-null value
    pub fn is_present(self) -> bool {
        self.0.is_found()
    }

    /// Raw value, whatever its type
    pub fn value(self) -> Option<&'a Value> {
        self.0.into_option()
    }

    /// String value
    pub fn as_str(self) -> Option<&'a str> {
        match self.0 {
            Lookup::Found(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer value that fits in `i64`
    pub fn as_i64(self) -> Option<i64> {
        match self.0 {
            Lookup::Found(Value::Number(n)) => n.as_i64(),
            _ => None,
        }
    }

    /// Boolean value
    pub fn as_bool(self) -> Option<bool> {
        match self.0 {
            Lookup::Found(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Borrowed mapping
    pub fn as_mapping(self) -> Option<&'a Mapping> {
        match self.0 {
            Lookup::Found(Value::Mapping(map)) => Some(map),
            _ => None,
        }
    }

    /// Borrowed sequence
    pub fn as_sequence(self) -> Option<&'a Sequence> {
        match self.0 {
            Lookup::Found(Value::Sequence(seq)) => Some(seq),
            _ => None,
        }
    }

    /// A string, number or boolean
    pub fn as_scalar(self) -> Option<&'a Value> {
        match self.0 {
            Lookup::Found(value)
                if matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_)) =>
            {
                Some(value)
            }
            _ => None,
        }
    }

    /// Owned copy of the sub-tree, if it is a mapping
    pub fn mapping(self) -> Option<Mapping> {
        self.as_mapping().cloned()
    }

    /// Owned copy of the sub-tree, if it is a sequence
    pub fn sequence(self) -> Option<Sequence> {
        self.as_sequence().cloned()
    }

    /// Elements of a sequence; nothing when absent or not a sequence
    ///
    /// `null` elements are yielded as absent nodes so positions are kept.
    pub fn items(self) -> impl Iterator<Item = Node<'a>> {
        self.as_sequence().into_iter().flatten().map(Node::new)
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        value => value,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'p> {
    Key(&'p str),
    Index(usize),
}

fn parse_path(path: &str) -> Option<Vec<Segment<'_>>> {
    let mut segments = Vec::new();

    for part in path.split('.') {
        let (key, mut rest) = match part.find('[') {
            Some(pos) => part.split_at(pos),
            None => (part, ""),
        };

        if key.is_empty() && rest.is_empty() {
            return None;
        }
        if !key.is_empty() {
            segments.push(Segment::Key(key));
        }

        while !rest.is_empty() {
            let inner = rest.strip_prefix('[')?;
            let close = inner.find(']')?;
            let index = inner[..close].parse().ok()?;
            segments.push(Segment::Index(index));
            rest = &inner[close + 1..];
        }
    }

    Some(segments)
}
