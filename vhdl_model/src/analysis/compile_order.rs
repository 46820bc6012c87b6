// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2024, Olof Kraigher olof.kraigher@gmail.com

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use itertools::Itertools;

use super::dependency::DependencyGraph;
use super::graph::{KeyedGraph, Vertex, VertexId};
use crate::ast::RefTarget;
use crate::data::*;
use crate::design::{Design, DocumentId, UnitId};

/// A document in the compile order graph, keyed by document id
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct DocumentVertex {
    document: DocumentId,
    name: String,
}

impl Vertex for DocumentVertex {
    type Key = DocumentId;

    fn key(&self) -> &DocumentId {
        &self.document
    }
}

impl DocumentVertex {
    /// The path of the document, or `<virtual N>` for virtual documents
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }
}

/// The first unit dependency that made one document depend on another
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct CompileEdge {
    pub source_unit: String,
    pub target_unit: String,
}

impl fmt::Display for CompileEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source_unit, self.target_unit)
    }
}

/// Documents and the documents they must be compiled after.
///
/// An edge `a -> b` means that a unit of `a` depends on a unit of `b`.
#[derive(Clone, Debug, Default)]
pub struct CompileOrderGraph {
    graph: KeyedGraph<DocumentVertex, CompileEdge>,
    // Indexed by document
    vertices: Vec<VertexId>,
}

pub(super) fn derive(design: &Design, dependency: &DependencyGraph) -> CompileOrderGraph {
    let mut graph = KeyedGraph::new();
    let mut vertices: Vec<VertexId> = Vec::with_capacity(design.num_documents());
    for (id, document) in design.documents() {
        let vertex = DocumentVertex {
            document: id,
            name: document.display_name(id.index()),
        };
        // Document ids are unique
        if let Ok(vertex) = graph.add_vertex(vertex) {
            vertices.push(vertex);
        }
    }

    let document_of = |target: RefTarget| -> Option<(VertexId, UnitId)> {
        match target {
            RefTarget::Unit(unit) => Some((*vertices.get(unit.document().index())?, unit)),
            RefTarget::Library(_) => None,
        }
    };

    for edge in dependency.graph().edges() {
        let (Some(source), Some(target)) = (
            dependency.vertex(edge.source),
            dependency.vertex(edge.target),
        ) else {
            continue;
        };
        let (Some((source_document, _)), Some((target_document, _))) =
            (document_of(source.target()), document_of(target.target()))
        else {
            continue;
        };

        if source_document != target_document && !graph.has_edge(source_document, target_document)
        {
            graph.add_edge(
                source_document,
                target_document,
                CompileEdge {
                    source_unit: source.key().to_owned(),
                    target_unit: target.key().to_owned(),
                },
            );
        }
    }

    log::debug!(
        "Compile order graph has {} documents and {} edges",
        graph.num_vertices(),
        graph.num_edges()
    );
    CompileOrderGraph { graph, vertices }
}

impl CompileOrderGraph {
    pub fn graph(&self) -> &KeyedGraph<DocumentVertex, CompileEdge> {
        &self.graph
    }

    pub fn num_vertices(&self) -> usize {
        self.graph.num_vertices()
    }

    pub fn num_edges(&self) -> usize {
        self.graph.num_edges()
    }

    pub fn vertex_of(&self, document: DocumentId) -> Option<VertexId> {
        self.vertices.get(document.index()).copied()
    }

    pub fn vertex(&self, document: DocumentId) -> Option<&DocumentVertex> {
        self.graph.get(&document)
    }

    /// The first loaded document with the display name
    pub fn get(&self, name: &str) -> Option<&DocumentVertex> {
        self.find(name).and_then(|id| self.graph.vertex(id))
    }

    fn find(&self, name: &str) -> Option<VertexId> {
        self.graph
            .vertices()
            .find(|(_, vertex)| vertex.name() == name)
            .map(|(id, _)| id)
    }

    /// Must the document named `source` be compiled after the one named `target`
    pub fn depends_on(&self, source: &str, target: &str) -> bool {
        match (self.find(source), self.find(target)) {
            (Some(source), Some(target)) => self.graph.has_edge(source, target),
            _ => false,
        }
    }

    /// The documents a document directly depends on
    pub fn dependencies(&self, document: DocumentId) -> Vec<DocumentId> {
        let Some(id) = self.vertex_of(document) else {
            return Vec::new();
        };
        self.graph
            .successors(id)
            .into_iter()
            .filter_map(|id| self.graph.vertex(id))
            .map(|vertex| vertex.document())
            .collect()
    }

    /// Groups of documents that depend on each other
    pub fn cycles(&self) -> Vec<Vec<DocumentId>> {
        self.graph
            .cycles()
            .into_iter()
            .map(|cycle| {
                cycle
                    .into_iter()
                    .filter_map(|id| self.graph.vertex(id))
                    .map(|vertex| vertex.document())
                    .collect()
            })
            .collect()
    }

    /// All documents so that each document comes after the documents it
    /// depends on. Among the documents that are ready, the one loaded first
    /// is picked.
    pub fn compile_order(&self) -> DiagnosticResult<Vec<DocumentId>> {
        let count = self.graph.num_vertices();
        let mut pending: Vec<usize> = self
            .graph
            .vertices()
            .map(|(id, _)| self.graph.out_degree(id))
            .collect();

        let mut ready: BinaryHeap<Reverse<VertexId>> = self
            .graph
            .vertices()
            .filter(|(id, _)| pending[id.index()] == 0)
            .map(|(id, _)| Reverse(id))
            .collect();

        let mut order = Vec::with_capacity(count);
        while let Some(Reverse(id)) = ready.pop() {
            if let Some(vertex) = self.graph.vertex(id) {
                order.push(vertex.document());
            }
            for dependent in self.graph.predecessors(id) {
                pending[dependent.index()] -= 1;
                if pending[dependent.index()] == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        if order.len() == count {
            Ok(order)
        } else {
            let remaining = self
                .graph
                .vertices()
                .filter(|(id, _)| pending[id.index()] > 0)
                .map(|(_, vertex)| vertex.name())
                .join(", ");
            Err(Diagnostic::error(
                Location::design(),
                format!(
                    "No compile order exists, these documents depend on each other: {}",
                    remaining
                ),
                ErrorCode::CircularCompileDependency,
            ))
        }
    }

    /// Report each group of documents that depend on each other
    pub(super) fn check_cycles(&self, design: &Design, diagnostics: &mut dyn DiagnosticHandler) {
        for cycle in self.cycles() {
            let Some((first, rest)) = cycle.split_first() else {
                continue;
            };
            let names = cycle
                .iter()
                .map(|id| design.document_location(*id).name)
                .join(", ");
            let mut diagnostic = Diagnostic::error(
                design.document_location(*first),
                format!("Circular compile dependency between {names}"),
                ErrorCode::CircularCompileDependency,
            );
            for other in rest {
                diagnostic.add_related(design.document_location(*other), "Part of the cycle");
            }
            diagnostics.push(diagnostic);
        }
    }
}

impl fmt::Display for CompileOrderGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, vertex) in self.graph.vertices() {
            writeln!(f, "{}", vertex.name())?;
        }
        for edge in self.graph.edges() {
            let (Some(source), Some(target)) =
                (self.graph.vertex(edge.source), self.graph.vertex(edge.target))
            else {
                continue;
            };
            writeln!(f, "{} -> {} [{}]", source.name(), target.name(), edge.weight)?;
        }
        Ok(())
    }
}
