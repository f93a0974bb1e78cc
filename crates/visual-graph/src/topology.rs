//! Graph topology over an id-keyed index
//!
//! [`GraphIndex`] maps node ids to dense indices and stores outgoing
//! adjacency per index. Traversals are iterative so deep graphs cannot
//! overflow the stack.

use std::collections::HashMap;

use crate::types::{Edge, VisualProject};

/// Dense adjacency view of a project
#[derive(Debug, Clone)]
pub struct GraphIndex<'a> {
    ids: Vec<&'a str>,
    positions: HashMap<&'a str, usize>,
    /// Outgoing edges per node, in project edge order
    outgoing: Vec<Vec<(usize, &'a Edge)>>,
    in_degree: Vec<usize>,
}

impl<'a> GraphIndex<'a> {
    /// Index a project; edges with a dangling endpoint are skipped
    pub fn new(project: &'a VisualProject) -> Self {
        let ids: Vec<&str> = project.nodes.iter().map(|n| n.id.as_str()).collect();
        let positions: HashMap<&str, usize> =
            ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let mut outgoing = vec![Vec::new(); ids.len()];
        let mut in_degree = vec![0; ids.len()];
        for edge in &project.edges {
            let (Some(&from), Some(&to)) = (
                positions.get(edge.source_node_id.as_str()),
                positions.get(edge.target_node_id.as_str()),
            ) else {
                continue;
            };
            outgoing[from].push((to, edge));
            in_degree[to] += 1;
        }

        Self {
            ids,
            positions,
            outgoing,
            in_degree,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn index_of(&self, node_id: &str) -> Option<usize> {
        self.positions.get(node_id).copied()
    }

    pub fn id_at(&self, index: usize) -> &'a str {
        self.ids[index]
    }

    /// Nodes with no incoming edge, in project order
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(|&i| self.in_degree[i] == 0)
    }

    /// Every edge that closes a directed cycle
    ///
    /// Depth-first search from each unvisited node in project order, with a
    /// recursion stack; an edge into a node currently on the stack is a back
    /// edge. Each cycle-closing edge is reported once, overlapping cycles are
    /// not merged.
    pub fn back_edges(&self) -> Vec<&'a Edge> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnStack,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.len()];
        let mut found = Vec::new();

        for start in 0..self.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            // (node, next outgoing edge to look at)
            let mut stack = vec![(start, 0usize)];
            marks[start] = Mark::OnStack;

            while let Some(frame) = stack.last_mut() {
                let (node, cursor) = *frame;
                match self.outgoing[node].get(cursor) {
                    Some(&(next, edge)) => {
                        frame.1 += 1;
                        match marks[next] {
                            Mark::OnStack => found.push(edge),
                            Mark::Unvisited => {
                                marks[next] = Mark::OnStack;
                                stack.push((next, 0));
                            }
                            Mark::Done => {}
                        }
                    }
                    None => {
                        marks[node] = Mark::Done;
                        stack.pop();
                    }
                }
            }
        }

        found
    }

    /// Length in nodes of the longest path starting at a root
    ///
    /// A lone root counts as depth 1; an empty graph has depth 0. A cyclic
    /// component with no root contributes nothing, and edges into a node that
    /// is still being expanded are ignored.
    pub fn max_depth(&self) -> usize {
        let mut depth: Vec<Option<usize>> = vec![None; self.len()];
        let mut on_stack = vec![false; self.len()];
        let mut best = 0;

        for root in self.roots() {
            let mut stack = vec![(root, 0usize)];
            on_stack[root] = true;

            while let Some(frame) = stack.last_mut() {
                let (node, cursor) = *frame;
                if let Some(&(next, _)) = self.outgoing[node].get(cursor) {
                    frame.1 += 1;
                    if depth[next].is_none() && !on_stack[next] {
                        on_stack[next] = true;
                        stack.push((next, 0));
                    }
                    continue;
                }

                let below = self.outgoing[node]
                    .iter()
                    .filter_map(|&(next, _)| depth[next])
                    .max()
                    .unwrap_or(0);
                depth[node] = Some(below + 1);
                on_stack[node] = false;
                stack.pop();
            }

            best = best.max(depth[root].unwrap_or(0));
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ProjectBuilder;

    fn chain(len: usize) -> VisualProject {
        let mut builder = ProjectBuilder::new("Chain");
        for i in 0..len {
            builder = builder.add_raw_node(format!("n{}", i), "state", (0.0, i as f64 * 100.0));
        }
        for i in 1..len {
            builder = builder.add_edge(format!("n{}", i - 1), "value", format!("n{}", i), "set");
        }
        builder.build()
    }

    #[test]
    fn test_roots_and_depth() {
        let project = chain(4);
        let index = GraphIndex::new(&project);
        assert_eq!(index.roots().collect::<Vec<_>>(), vec![0]);
        assert_eq!(index.max_depth(), 4);
        assert!(index.back_edges().is_empty());
    }

    #[test]
    fn test_empty_graph() {
        let project = ProjectBuilder::new("Empty").build();
        let index = GraphIndex::new(&project);
        assert!(index.is_empty());
        assert_eq!(index.max_depth(), 0);
    }

    #[test]
    fn test_two_node_cycle() {
        let project = ProjectBuilder::new("Loop")
            .add_raw_node("a", "state", (0.0, 0.0))
            .add_raw_node("b", "state", (0.0, 100.0))
            .add_edge("a", "value", "b", "set")
            .add_edge("b", "value", "a", "set")
            .build();
        let index = GraphIndex::new(&project);

        let back = index.back_edges();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].source_node_id, "b");
        // No roots inside a pure cycle
        assert_eq!(index.max_depth(), 0);
    }

    #[test]
    fn test_overlapping_cycles_not_deduped() {
        // a -> b -> a and a -> b -> c -> a share the a -> b edge
        let project = ProjectBuilder::new("Loops")
            .add_raw_node("a", "state", (0.0, 0.0))
            .add_raw_node("b", "state", (0.0, 0.0))
            .add_raw_node("c", "state", (0.0, 0.0))
            .add_edge("a", "value", "b", "set")
            .add_edge("b", "value", "a", "set")
            .add_edge("b", "value", "c", "set")
            .add_edge("c", "value", "a", "set")
            .build();

        assert_eq!(GraphIndex::new(&project).back_edges().len(), 2);
    }

    #[test]
    fn test_diamond_depth() {
        let project = ProjectBuilder::new("Diamond")
            .add_raw_node("top", "state", (0.0, 0.0))
            .add_raw_node("left", "state", (0.0, 0.0))
            .add_raw_node("right", "state", (0.0, 0.0))
            .add_raw_node("mid", "state", (0.0, 0.0))
            .add_raw_node("bottom", "state", (0.0, 0.0))
            .add_edge("top", "value", "left", "set")
            .add_edge("top", "value", "right", "set")
            .add_edge("right", "value", "mid", "set")
            .add_edge("left", "value", "bottom", "set")
            .add_edge("mid", "value", "bottom", "set")
            .build();

        let index = GraphIndex::new(&project);
        assert_eq!(index.max_depth(), 4);
        assert_eq!(index.id_at(index.index_of("mid").unwrap()), "mid");
    }

    #[test]
    fn test_dangling_edges_skipped() {
        let project = ProjectBuilder::new("Dangling")
            .add_raw_node("a", "state", (0.0, 0.0))
            .add_edge("a", "value", "ghost", "set")
            .build();
        let index = GraphIndex::new(&project);
        assert_eq!(index.max_depth(), 1);
    }
}
