//! Class hierarchy graph.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: `ClassName`
//! - Edges: `Extends` / `Implements`, pointing from subtype to supertype

use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use rustc_hash::FxHashMap;
use uigraph_core::ClassName;

/// Edge types in the hierarchy graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyEdge {
    Extends,
    Implements,
}

/// Subtype relation between registered classes.
///
/// Supertypes named before they are registered get a node immediately, so
/// classes can be registered in any order.
#[derive(Debug, Default)]
pub struct ClassHierarchy {
    graph: DiGraph<ClassName, HierarchyEdge>,
    index: FxHashMap<ClassName, NodeIndex>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, name: &ClassName) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.clone());
        self.index.insert(name.clone(), idx);
        idx
    }

    /// Record `sub` as a direct subtype of `sup`.
    pub fn add_edge(&mut self, sub: &ClassName, sup: &ClassName, edge: HierarchyEdge) {
        let from = self.node(sub);
        let to = self.node(sup);
        self.graph.update_edge(from, to, edge);
    }

    /// Number of inheritance steps from `sub` up to `sup`.
    ///
    /// `Some(0)` for the same class, `None` when `sup` is not a supertype.
    pub fn distance(&self, sub: &ClassName, sup: &ClassName) -> Option<u32> {
        if sub == sup {
            return Some(0);
        }
        let from = *self.index.get(sub)?;
        let to = *self.index.get(sup)?;
        dijkstra(&self.graph, from, Some(to), |_| 1u32)
            .get(&to)
            .copied()
    }

    pub fn is_subtype(&self, sub: &ClassName, sup: &ClassName) -> bool {
        self.distance(sub, sup).is_some()
    }

    /// `name` followed by all of its supertypes, nearest first.
    pub fn ancestors(&self, name: &ClassName) -> Vec<ClassName> {
        let Some(&start) = self.index.get(name) else {
            return vec![name.clone()];
        };
        let mut bfs = Bfs::new(&self.graph, start);
        let mut out = Vec::new();
        while let Some(idx) = bfs.next(&self.graph) {
            out.push(self.graph[idx].clone());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swing() -> ClassHierarchy {
        let mut h = ClassHierarchy::new();
        h.add_edge(&"JComponent".into(), &"Container".into(), HierarchyEdge::Extends);
        h.add_edge(&"Container".into(), &"Component".into(), HierarchyEdge::Extends);
        h.add_edge(&"JButton".into(), &"JComponent".into(), HierarchyEdge::Extends);
        h.add_edge(&"JButton".into(), &"Accessible".into(), HierarchyEdge::Implements);
        h
    }

    #[test]
    fn distance_counts_steps() {
        let h = swing();
        assert_eq!(h.distance(&"JButton".into(), &"JButton".into()), Some(0));
        assert_eq!(h.distance(&"JButton".into(), &"JComponent".into()), Some(1));
        assert_eq!(h.distance(&"JButton".into(), &"Component".into()), Some(3));
        assert_eq!(h.distance(&"JButton".into(), &"Accessible".into()), Some(1));
        assert_eq!(h.distance(&"Component".into(), &"JButton".into()), None);
    }

    #[test]
    fn ancestors_nearest_first() {
        let h = swing();
        let ancestors = h.ancestors(&"JButton".into());
        assert_eq!(ancestors[0], ClassName::from("JButton"));
        let pos = |n: &str| ancestors.iter().position(|a| a.name == n).unwrap();
        assert!(pos("JComponent") < pos("Container"));
        assert!(pos("Container") < pos("Component"));
        assert_eq!(ancestors.len(), 5);
    }

    #[test]
    fn unknown_class_is_its_own_only_ancestor() {
        let h = ClassHierarchy::new();
        assert_eq!(h.ancestors(&"JLabel".into()), vec![ClassName::from("JLabel")]);
        assert!(!h.is_subtype(&"JLabel".into(), &"Component".into()));
    }
}
