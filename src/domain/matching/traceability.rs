//! DataTraceability graph: which shared values connect two users, and how much.
//!
//! Nodes are the two users plus each key shared value; every edge runs from
//! a user to a value and carries that value's weighted contribution. The
//! matcher only emits the structure; rendering belongs to the UI.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

use super::result::KeySharedValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    User,
    Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceabilityGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl TraceabilityGraph {
    /// Builds the graph for a pair of users and their ranked shared values.
    ///
    /// Node ids are unique: a user compared with themselves appears once.
    pub fn build(user_a: &UserId, user_b: &UserId, shared: &[KeySharedValue]) -> Self {
        let users = if user_a == user_b {
            vec![user_a]
        } else {
            vec![user_a, user_b]
        };
        let user_nodes: Vec<GraphNode> = users
            .iter()
            .map(|user| GraphNode {
                id: user_node_id(user),
                kind: NodeKind::User,
                label: user.to_string(),
            })
            .collect();

        let mut nodes = user_nodes.clone();
        let mut edges = Vec::with_capacity(shared.len() * 2);

        for value in shared {
            let value_id = format!("value:{}", value.category.key());
            nodes.push(GraphNode {
                id: value_id.clone(),
                kind: NodeKind::Value,
                label: value.category.label().to_string(),
            });
            for user_node in &user_nodes {
                edges.push(GraphEdge {
                    source: user_node.id.clone(),
                    target: value_id.clone(),
                    weight: value.contribution,
                });
            }
        }

        Self { nodes, edges }
    }

    pub fn value_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Value)
    }
}

fn user_node_id(user: &UserId) -> String {
    format!("user:{}", user)
}
