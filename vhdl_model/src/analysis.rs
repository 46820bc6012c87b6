// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2019, Olof Kraigher olof.kraigher@gmail.com

//! Linking of references and derivation of the dependency, hierarchy and
//! compile order graphs

mod compile_order;
mod dependency;
mod graph;
mod hierarchy;
mod index;
mod link;

#[cfg(test)]
mod tests;

pub use compile_order::{CompileEdge, CompileOrderGraph, DocumentVertex};
pub use dependency::{DependencyGraph, EdgeClass, EdgeKind, UnitVertex, VertexKind};
pub use graph::{Edge, EdgeStatus, KeyedGraph, Vertex, VertexId};
pub use hierarchy::{HierarchyGraph, TopLevel, Twig};
pub use index::{DeclarationIndex, DeclarationKind, DeclaredItem};

use fnv::{FnvHashMap, FnvHashSet};

use crate::data::*;
use crate::design::{Design, DocumentId, UnitId};

/// The derived, read-only result of [`Design::analyze`]
#[derive(Clone, Debug)]
pub struct Analysis {
    diagnostics: Vec<Diagnostic>,
    dependency_graph: DependencyGraph,
    hierarchy_graph: HierarchyGraph,
    compile_order_graph: CompileOrderGraph,
    declarations: FnvHashMap<UnitId, DeclarationIndex>,
}

impl Analysis {
    /// Everything reported while analyzing, in the order it was found
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn diagnostics_for(&self, unit: UnitId) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diagnostic| diagnostic.unit() == Some(unit))
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.default_severity == Severity::Error)
    }

    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.dependency_graph
    }

    pub fn hierarchy_graph(&self) -> &HierarchyGraph {
        &self.hierarchy_graph
    }

    pub fn compile_order_graph(&self) -> &CompileOrderGraph {
        &self.compile_order_graph
    }

    /// The declarative region of an entity, architecture, package or package body
    pub fn declarations(&self, unit: UnitId) -> Option<&DeclarationIndex> {
        self.declarations.get(&unit)
    }

    pub fn top_level(&self) -> TopLevel {
        self.hierarchy_graph.top_level()
    }

    /// The top level unit if there is exactly one
    pub fn top_level_unit(&self) -> Option<UnitId> {
        match self.top_level() {
            TopLevel::Unique(root) => self.hierarchy_graph.vertex(root)?.unit(),
            TopLevel::None | TopLevel::Ambiguous(_) => None,
        }
    }

    /// Disambiguate the top level by the name of an entity or architecture
    pub fn select_top_level(&self, name: &str) -> DiagnosticResult<UnitId> {
        let root = self.hierarchy_graph.select_top_level(name)?;
        self.hierarchy_graph
            .vertex(root)
            .and_then(|vertex| vertex.unit())
            .ok_or_else(|| {
                Diagnostic::internal(Location::design(), "Top level vertex without design unit")
            })
    }

    pub fn compile_order(&self) -> DiagnosticResult<Vec<DocumentId>> {
        self.compile_order_graph.compile_order()
    }

    /// Design units outside predefined libraries that no top level candidate
    /// depends on, directly or indirectly. The architectures of a used entity
    /// and the body of a used package count as used.
    ///
    /// Every root of the hierarchy graph is a candidate, so with an ambiguous
    /// top level all candidates and what they reach are used. Without any
    /// root every unit outside the predefined libraries is unused.
    pub fn unused_units(&self) -> Vec<UnitId> {
        let graph = self.dependency_graph.graph();
        let mut used: FnvHashSet<VertexId> = FnvHashSet::default();
        let mut stack: Vec<VertexId> = self
            .hierarchy_graph
            .roots()
            .iter()
            .filter_map(|root| self.hierarchy_graph.vertex(*root))
            .filter_map(|vertex| self.dependency_graph.vertex_id(vertex.key()))
            .collect();

        while let Some(id) = stack.pop() {
            if !used.insert(id) {
                continue;
            }
            stack.extend(graph.successors(id));
            stack.extend(self.dependency_graph.implementations(id));
        }

        graph
            .vertices()
            .filter(|(id, vertex)| !vertex.is_predefined() && !used.contains(id))
            .filter_map(|(_, vertex)| vertex.unit())
            .collect()
    }
}

impl Design {
    /// Link all references and derive the dependency, hierarchy and compile
    /// order graphs from scratch.
    ///
    /// The result is kept until the design is modified and can be retrieved
    /// with [`Design::analysis`]. Returns all diagnostics found.
    pub fn analyze(&mut self) -> Vec<Diagnostic> {
        self.take_analysis();
        log::debug!(
            "Analyzing {} units in {} libraries and {} documents",
            self.num_units(),
            self.num_libraries(),
            self.num_documents()
        );

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let visibilities = link::link(self, &mut diagnostics);
        log::debug!("Linked references with {} diagnostics", diagnostics.len());

        let dependency_graph = dependency::build(self, &visibilities, &mut diagnostics);
        self.check_circular_dependencies(&dependency_graph, &mut diagnostics);

        let hierarchy_graph = hierarchy::derive(&dependency_graph);
        hierarchy_graph.check_top_level(&mut diagnostics);

        let compile_order_graph = compile_order::derive(self, &dependency_graph);
        compile_order_graph.check_cycles(self, &mut diagnostics);

        let declarations = index::index_units(self);

        log::debug!("Analysis done with {} diagnostics", diagnostics.len());
        self.set_analysis(Analysis {
            diagnostics: diagnostics.clone(),
            dependency_graph,
            hierarchy_graph,
            compile_order_graph,
            declarations,
        });
        diagnostics
    }

    /// Units that depend on each other through a chain of references
    fn check_circular_dependencies(
        &self,
        graph: &DependencyGraph,
        diagnostics: &mut dyn DiagnosticHandler,
    ) {
        for cycle in graph.graph().cycles() {
            let units: Vec<UnitId> = cycle
                .iter()
                .filter_map(|id| graph.vertex(*id)?.unit())
                .collect();

            for unit in units.iter() {
                let mut diagnostic = Diagnostic::circular_dependency(self.location_of(*unit));
                for other in units.iter().filter(|other| *other != unit) {
                    diagnostic.add_related(self.location_of(*other), "Part of the cycle");
                }
                diagnostics.push(diagnostic);
            }
        }
    }
}
