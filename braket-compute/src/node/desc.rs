//! The canonical node-description format.
//!
//! [`NodeDesc`] mirrors the wire shape used for serialization, cloning, and persistence: an
//! object with a `type` tag from the closed kind set, a `value` string, an ordered `children`
//! array of the same shape, and an optional `id` for callers that need identity to round-trip.
//!
//! Turning a [`Node`] into a [`NodeDesc`] is infallible. The reverse direction re-validates the
//! arity table, so corrupted persisted state surfaces as a typed error naming the expected
//! range rather than as a malformed tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use super::{Kind, Node, NodeError};

/// The serialized shape of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDesc {
    /// The kind tag.
    #[serde(rename = "type")]
    pub kind: Kind,

    /// The free-form payload.
    pub value: String,

    /// The serialized children, in order.
    pub children: Vec<NodeDesc>,

    /// The rendered identity, present only when identity must round-trip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A failure while reading the canonical format.
#[derive(Debug)]
pub enum DescError {
    /// The input was not valid JSON for the canonical shape, or used an unknown kind tag.
    Json(serde_json::Error),

    /// The shape was valid but a node violated the arity table.
    Node(NodeError),
}

impl fmt::Display for DescError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DescError::Json(err) => write!(f, "{}", err),
            DescError::Node(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DescError {}

impl From<serde_json::Error> for DescError {
    fn from(err: serde_json::Error) -> Self {
        DescError::Json(err)
    }
}

impl From<NodeError> for DescError {
    fn from(err: NodeError) -> Self {
        DescError::Node(err)
    }
}

impl Node {
    /// Describes this tree in the canonical format, without identities.
    pub fn describe(&self) -> NodeDesc {
        self.describe_inner(false)
    }

    /// Describes this tree in the canonical format, carrying the rendered identity of every
    /// node. Used at boundaries where external callers address nodes for replacement.
    pub fn describe_with_ids(&self) -> NodeDesc {
        self.describe_inner(true)
    }

    fn describe_inner(&self, with_ids: bool) -> NodeDesc {
        NodeDesc {
            kind: self.kind,
            value: self.value.clone(),
            children: self.children.iter()
                .map(|child| child.describe_inner(with_ids))
                .collect(),
            id: with_ids.then(|| self.id.to_string()),
        }
    }

    /// Serializes this tree to canonical JSON, without identities.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.describe())
    }

    /// Deserializes a tree from canonical JSON, re-validating arity.
    ///
    /// Incoming identities are not restored; the rebuilt tree receives fresh identities, and any
    /// external mapping is the caller's concern.
    pub fn from_json(json: &str) -> Result<Node, DescError> {
        let desc: NodeDesc = serde_json::from_str(json)?;
        Ok(Node::try_from(desc)?)
    }
}

impl From<&Node> for NodeDesc {
    fn from(node: &Node) -> Self {
        node.describe()
    }
}

impl TryFrom<NodeDesc> for Node {
    type Error = NodeError;

    fn try_from(desc: NodeDesc) -> Result<Node, NodeError> {
        let children = desc.children.into_iter()
            .map(Node::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Node::new(desc.kind, desc.value, children)
    }
}
