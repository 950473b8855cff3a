//! Partition: an externally computed node → community assignment
//!
//! Community detection itself happens elsewhere. This type only indexes
//! the mapping in both directions.

use super::node::NodeId;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Opaque community identifier.
///
/// Deserializes from either a JSON string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CommunityId(String);

impl CommunityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommunityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CommunityId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<&str> for CommunityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for CommunityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = CommunityId;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a community id string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(CommunityId(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(CommunityId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(CommunityId(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Node → community mapping with the reverse index precomputed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "HashMap<NodeId, CommunityId>", into = "BTreeMap<NodeId, CommunityId>")]
pub struct Partition {
    membership: HashMap<NodeId, CommunityId>,
    members: BTreeMap<CommunityId, Vec<NodeId>>,
}

impl Partition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(node, community)` pairs. A repeated node keeps its last
    /// assignment.
    pub fn from_assignments<I, N, C>(assignments: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<NodeId>,
        C: Into<CommunityId>,
    {
        let membership: HashMap<NodeId, CommunityId> = assignments
            .into_iter()
            .map(|(n, c)| (n.into(), c.into()))
            .collect();
        Self::from(membership)
    }

    pub fn community_of(&self, node: &NodeId) -> Option<&CommunityId> {
        self.membership.get(node)
    }

    /// Members of a community, sorted by node id
    pub fn members(&self, community: &CommunityId) -> &[NodeId] {
        self.members.get(community).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Communities in id order with their sorted members
    pub fn communities(&self) -> impl Iterator<Item = (&CommunityId, &[NodeId])> {
        self.members.iter().map(|(c, m)| (c, m.as_slice()))
    }

    pub fn community_count(&self) -> usize {
        self.members.len()
    }

    pub fn node_count(&self) -> usize {
        self.membership.len()
    }

    pub fn is_empty(&self) -> bool {
        self.membership.is_empty()
    }
}

impl From<HashMap<NodeId, CommunityId>> for Partition {
    fn from(membership: HashMap<NodeId, CommunityId>) -> Self {
        let mut members: BTreeMap<CommunityId, Vec<NodeId>> = BTreeMap::new();
        for (node, community) in &membership {
            members.entry(community.clone()).or_default().push(node.clone());
        }
        for list in members.values_mut() {
            list.sort();
        }
        Self {
            membership,
            members,
        }
    }
}

impl From<Partition> for BTreeMap<NodeId, CommunityId> {
    fn from(partition: Partition) -> Self {
        partition.membership.into_iter().collect()
    }
}
