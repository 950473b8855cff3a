//! Multi-layer graph construction
//!
//! One [`LayerGraph`] per relation type, built by [`GraphLayerBuilder`]
//! from raw [`EdgeRecord`]s and merged into a combined graph.

mod builder;
mod edge;
mod hashtag;
mod layer_graph;
mod node;
mod partition;
mod stats;


pub use builder::{CombineMethod, GraphLayerBuilder, COMBINED};
pub use edge::{layer, EdgeRecord};
pub use hashtag::{build_cooccurrence_layer, cooccurrence_pairs};
pub use layer_graph::LayerGraph;
pub use node::{AccountId, NodeId};
pub use partition::{CommunityId, Partition};
pub use stats::{LayerNeighbors, LayerStatistics, NodeProfile};
