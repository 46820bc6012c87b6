// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2024, Olof Kraigher olof.kraigher@gmail.com

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use fnv::FnvHashMap;
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

pub use petgraph::graph::NodeIndex as VertexId;

/// A vertex that is identified by a unique key
pub trait Vertex {
    type Key: Hash + Eq + Clone + fmt::Debug;

    fn key(&self) -> &Self::Key;
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum EdgeStatus {
    Added,
    AlreadyExists,
    SelfLoop,
}

/// An edge of a [`KeyedGraph`] as seen from the outside
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Edge<'a, E> {
    pub source: VertexId,
    pub target: VertexId,
    pub weight: &'a E,
}

/// A directed graph whose vertices can be looked up by key.
///
/// Vertices and edges are iterated in the order they were added, so two
/// graphs built from the same input print identically.
#[derive(Clone, Debug)]
pub struct KeyedGraph<V: Vertex, E> {
    graph: DiGraph<V, E>,
    keys: FnvHashMap<V::Key, VertexId>,
}

impl<V: Vertex, E> Default for KeyedGraph<V, E> {
    fn default() -> Self {
        KeyedGraph {
            graph: DiGraph::new(),
            keys: FnvHashMap::default(),
        }
    }
}

impl<V: Vertex, E: PartialEq> KeyedGraph<V, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex with a key that is not yet in the graph.
    ///
    /// A vertex whose key is taken is not added, the error carries the id of
    /// the vertex that owns the key.
    pub fn add_vertex(&mut self, vertex: V) -> Result<VertexId, VertexId> {
        if let Some(id) = self.keys.get(vertex.key()) {
            return Err(*id);
        }
        let key = vertex.key().clone();
        let id = self.graph.add_node(vertex);
        self.keys.insert(key, id);
        Ok(id)
    }

    /// Add an edge from `source` to `target`.
    ///
    /// Self loops and edges equal to an existing edge between the same vertices are rejected.
    pub fn add_edge(&mut self, source: VertexId, target: VertexId, edge: E) -> EdgeStatus {
        if source == target {
            return EdgeStatus::SelfLoop;
        }
        if self
            .graph
            .edges_connecting(source, target)
            .any(|existing| existing.weight() == &edge)
        {
            return EdgeStatus::AlreadyExists;
        }
        self.graph.add_edge(source, target, edge);
        EdgeStatus::Added
    }
}

impl<V: Vertex, E> KeyedGraph<V, E> {
    pub fn num_vertices(&self) -> usize {
        self.graph.node_count()
    }

    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&V> {
        self.graph.node_weight(id)
    }

    pub fn vertex_id<Q>(&self, key: &Q) -> Option<VertexId>
    where
        V::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.keys.get(key).copied()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        V::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.vertex_id(key).and_then(|id| self.vertex(id))
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        V::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.keys.contains_key(key)
    }

    /// Vertices in the order they were added
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &V)> {
        self.graph
            .node_indices()
            .zip(self.graph.node_weights())
    }

    /// Edges in the order they were added
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_, E>> {
        self.graph.edge_references().map(|edge| Edge {
            source: edge.source(),
            target: edge.target(),
            weight: edge.weight(),
        })
    }

    pub fn has_edge(&self, source: VertexId, target: VertexId) -> bool {
        self.graph.find_edge(source, target).is_some()
    }

    fn directed(&self, id: VertexId, direction: Direction) -> Vec<Edge<'_, E>> {
        let mut edges: Vec<_> = self.graph.edges_directed(id, direction).collect();
        // petgraph iterates the most recent edge first
        edges.sort_by_key(|edge| edge.id());
        edges
            .into_iter()
            .map(|edge| Edge {
                source: edge.source(),
                target: edge.target(),
                weight: edge.weight(),
            })
            .collect()
    }

    /// Edges leaving the vertex in the order they were added
    pub fn outgoing(&self, id: VertexId) -> Vec<Edge<'_, E>> {
        self.directed(id, Direction::Outgoing)
    }

    /// Edges entering the vertex in the order they were added
    pub fn incoming(&self, id: VertexId) -> Vec<Edge<'_, E>> {
        self.directed(id, Direction::Incoming)
    }

    pub fn successors(&self, id: VertexId) -> Vec<VertexId> {
        self.outgoing(id).iter().map(|edge| edge.target).collect()
    }

    pub fn predecessors(&self, id: VertexId) -> Vec<VertexId> {
        self.incoming(id).iter().map(|edge| edge.source).collect()
    }

    pub fn in_degree(&self, id: VertexId) -> usize {
        self.graph.edges_directed(id, Direction::Incoming).count()
    }

    pub fn out_degree(&self, id: VertexId) -> usize {
        self.graph.edges_directed(id, Direction::Outgoing).count()
    }

    /// Strongly connected components with more than one vertex, each sorted by vertex id.
    /// The components are sorted by their first vertex.
    pub fn cycles(&self) -> Vec<Vec<VertexId>> {
        let mut cycles: Vec<Vec<VertexId>> = petgraph::algo::tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|mut component| {
                component.sort();
                component
            })
            .collect();
        cycles.sort();
        cycles
    }
}

impl<V, E> fmt::Display for KeyedGraph<V, E>
where
    V: Vertex,
    V::Key: fmt::Display,
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, vertex) in self.vertices() {
            writeln!(f, "{}", vertex.key())?;
        }
        for edge in self.edges() {
            let (Some(source), Some(target)) = (self.vertex(edge.source), self.vertex(edge.target))
            else {
                continue;
            };
            writeln!(f, "{} -> {} [{}]", source.key(), target.key(), edge.weight)?;
        }
        Ok(())
    }
}
