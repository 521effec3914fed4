use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use eli5y_protocol::GroupIndex;

/// Parent to child edges between groups, checked for cycles.
pub struct GroupHierarchy {
    graph: DiGraph<GroupIndex, ()>,
}

impl GroupHierarchy {
    /// `children[i]` lists the direct children of group `i`. Indices must be
    /// below `children.len()`.
    pub fn new(children: &[Vec<GroupIndex>]) -> Self {
        let mut graph = DiGraph::with_capacity(children.len(), children.len());
        let nodes: Vec<NodeIndex> = (0..children.len())
            .map(|i| graph.add_node(GroupIndex(i as u32)))
            .collect();

        for (parent, kids) in children.iter().enumerate() {
            for child in kids {
                graph.add_edge(nodes[parent], nodes[child.get()], ());
            }
        }

        Self { graph }
    }

    /// A group that sits on a cycle, if there is one.
    pub fn find_cycle(&self) -> Option<GroupIndex> {
        toposort(&self.graph, None)
            .err()
            .map(|cycle| self.graph[cycle.node_id()])
    }

    /// Groups that are nobody's child, in index order.
    pub fn roots(&self) -> Vec<GroupIndex> {
        self.graph
            .node_indices()
            .filter(|n| {
                self.graph
                    .neighbors_directed(*n, petgraph::Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|n| self.graph[n])
            .collect()
    }
}
