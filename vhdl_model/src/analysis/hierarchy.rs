// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2024, Olof Kraigher olof.kraigher@gmail.com

use std::fmt::Write;

use fnv::{FnvHashMap, FnvHashSet};

use super::dependency::{DependencyGraph, EdgeClass, EdgeKind, UnitVertex, VertexKind};
use super::graph::{KeyedGraph, VertexId};
use crate::data::*;

/// How the design resolves to a top level unit
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum TopLevel {
    Unique(VertexId),
    None,
    Ambiguous(Vec<VertexId>),
}

/// Position of a vertex in a tree view relative to its siblings,
/// together with the position of its parent
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Twig {
    MidBranch(Option<Box<Twig>>),
    EndLeaf(Option<Box<Twig>>),
}

impl Twig {
    pub fn upper(&self) -> Option<&Twig> {
        match self {
            Twig::MidBranch(upper) | Twig::EndLeaf(upper) => upper.as_deref(),
        }
    }

    pub fn depth(&self) -> usize {
        self.upper().map_or(0, |upper| upper.depth() + 1)
    }

    fn prefix(&self) -> String {
        // The root twig has no upper and draws nothing
        let Some(upper) = self.upper() else {
            return String::new();
        };
        let mut prefix = upper.indent();
        prefix.push_str(match self {
            Twig::MidBranch(_) => "├─ ",
            Twig::EndLeaf(_) => "└─ ",
        });
        prefix
    }

    fn indent(&self) -> String {
        let Some(upper) = self.upper() else {
            return String::new();
        };
        let mut indent = upper.indent();
        indent.push_str(match self {
            Twig::MidBranch(_) => "│  ",
            Twig::EndLeaf(_) => "   ",
        });
        indent
    }
}

/// The instantiation hierarchy over entities and architectures.
///
/// Implementation edges are kept from the dependency graph, instantiation
/// edges are reversed so that they point from the instantiated unit to the
/// architecture that instantiates it.
#[derive(Clone, Debug, Default)]
pub struct HierarchyGraph {
    graph: KeyedGraph<UnitVertex, EdgeKind>,
    roots: Vec<VertexId>,
}

pub(super) fn derive(dependency: &DependencyGraph) -> HierarchyGraph {
    let mut graph = KeyedGraph::new();
    let mut copied: FnvHashMap<VertexId, VertexId> = FnvHashMap::default();

    for (id, vertex) in dependency.graph().vertices() {
        if matches!(
            vertex.kind(),
            VertexKind::Entity | VertexKind::Architecture
        ) {
            // Keys are unique in the dependency graph
            if let Ok(copy) = graph.add_vertex(vertex.clone()) {
                copied.insert(id, copy);
            }
        }
    }

    for edge in dependency.graph().edges() {
        let (Some(source), Some(target)) = (copied.get(&edge.source), copied.get(&edge.target))
        else {
            continue;
        };
        match edge.weight.class() {
            EdgeClass::Implements => {
                graph.add_edge(*source, *target, *edge.weight);
            }
            EdgeClass::Instantiates => {
                graph.add_edge(*target, *source, *edge.weight);
            }
            EdgeClass::References => {}
        }
    }

    let roots = copied
        .iter()
        .filter(|(original, copy)| is_root(dependency, **original, &graph, **copy))
        .map(|(_, copy)| *copy)
        .collect::<FnvHashSet<_>>();
    // Roots in vertex order
    let roots: Vec<VertexId> = graph
        .vertices()
        .map(|(id, _)| id)
        .filter(|id| roots.contains(id))
        .collect();

    log::debug!(
        "Hierarchy graph has {} vertices, {} edges and {} roots",
        graph.num_vertices(),
        graph.num_edges(),
        roots.len()
    );
    HierarchyGraph { graph, roots }
}

/// A root is an architecture, or an entity without architectures, that is not
/// instantiated anywhere. Instantiating an entity counts for all its architectures.
fn is_root(
    dependency: &DependencyGraph,
    original: VertexId,
    graph: &KeyedGraph<UnitVertex, EdgeKind>,
    copy: VertexId,
) -> bool {
    let Some(vertex) = graph.vertex(copy) else {
        return false;
    };
    if vertex.is_predefined() {
        return false;
    }
    let has_implementation = graph
        .incoming(copy)
        .iter()
        .any(|edge| edge.weight.class() == EdgeClass::Implements);
    if has_implementation || dependency.is_instantiated(original) {
        return false;
    }
    match dependency.implemented(original) {
        Some(entity) => !dependency.is_instantiated(entity),
        None => true,
    }
}

impl HierarchyGraph {
    pub fn graph(&self) -> &KeyedGraph<UnitVertex, EdgeKind> {
        &self.graph
    }

    pub fn num_vertices(&self) -> usize {
        self.graph.num_vertices()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&UnitVertex> {
        self.graph.vertex(id)
    }

    pub fn vertex_id(&self, key: &str) -> Option<VertexId> {
        self.graph.vertex_id(key)
    }

    pub fn roots(&self) -> &[VertexId] {
        &self.roots
    }

    pub fn root_keys(&self) -> Vec<&str> {
        self.roots
            .iter()
            .filter_map(|id| self.vertex(*id))
            .map(|vertex| vertex.key())
            .collect()
    }

    pub fn top_level(&self) -> TopLevel {
        match self.roots.as_slice() {
            [] => TopLevel::None,
            [root] => TopLevel::Unique(*root),
            roots => TopLevel::Ambiguous(roots.to_vec()),
        }
    }

    /// Pick one of the roots by name. The name may be the entity name,
    /// `entity(architecture)` or the full vertex key, case-insensitive.
    pub fn select_top_level(&self, name: &str) -> DiagnosticResult<VertexId> {
        let wanted = name.to_lowercase();
        let matching: Vec<VertexId> = self
            .roots
            .iter()
            .copied()
            .filter(|id| {
                self.vertex(*id)
                    .is_some_and(|vertex| matches_name(vertex, &wanted))
            })
            .collect();

        match matching.as_slice() {
            [root] => Ok(*root),
            [] => Err(Diagnostic::error(
                Location::design(),
                format!("No top level candidate named '{name}'"),
                ErrorCode::NoTopLevel,
            )),
            candidates => {
                let mut diagnostic = Diagnostic::error(
                    Location::design(),
                    format!(
                        "'{}' matches {} top level candidates",
                        name,
                        candidates.len()
                    ),
                    ErrorCode::AmbiguousTopLevel,
                );
                for vertex in candidates.iter().filter_map(|id| self.vertex(*id)) {
                    diagnostic.add_related(location_of(vertex), "Candidate");
                }
                Err(diagnostic)
            }
        }
    }

    /// The units directly below a vertex: the units an architecture
    /// instantiates and the architectures of an entity
    pub fn children(&self, id: VertexId) -> Vec<VertexId> {
        self.graph.predecessors(id)
    }

    /// All vertices below `root` in depth first order, each with the twig
    /// describing where it is drawn. A unit that instantiates itself is not
    /// expanded again.
    pub fn tree(&self, root: VertexId) -> Vec<(Twig, VertexId)> {
        let mut tree = Vec::new();
        let mut path = Vec::new();
        self.collect_tree(root, Twig::EndLeaf(None), &mut path, &mut tree);
        tree
    }

    fn collect_tree(
        &self,
        id: VertexId,
        twig: Twig,
        path: &mut Vec<VertexId>,
        tree: &mut Vec<(Twig, VertexId)>,
    ) {
        let recursive = path.contains(&id);
        tree.push((twig.clone(), id));
        if recursive {
            return;
        }

        path.push(id);
        let mut children = self.children(id).into_iter().peekable();
        while let Some(child) = children.next() {
            let upper = Some(Box::new(twig.clone()));
            let child_twig = match children.peek() {
                Some(_) => Twig::MidBranch(upper),
                None => Twig::EndLeaf(upper),
            };
            self.collect_tree(child, child_twig, path, tree);
        }
        path.pop();
    }

    /// Vertices below `root` with their depth
    pub fn walk(&self, root: VertexId) -> Vec<(usize, VertexId)> {
        self.tree(root)
            .into_iter()
            .map(|(twig, id)| (twig.depth(), id))
            .collect()
    }

    /// Render the instantiation tree below `root`, one vertex key per line
    pub fn tree_view(&self, root: VertexId) -> String {
        let mut view = String::new();
        for (twig, id) in self.tree(root) {
            let key = self.vertex(id).map(|vertex| vertex.key()).unwrap_or_default();
            let _ = writeln!(view, "{}{}", twig.prefix(), key);
        }
        view
    }

    /// Report a missing or ambiguous top level
    pub(super) fn check_top_level(&self, diagnostics: &mut dyn DiagnosticHandler) {
        let has_design_units = self
            .graph
            .vertices()
            .any(|(_, vertex)| !vertex.is_predefined());

        match self.top_level() {
            TopLevel::Unique(_) => {}
            TopLevel::None if has_design_units => {
                diagnostics.push(Diagnostic::with_code(
                    Location::design(),
                    "No top level found, every entity and architecture is instantiated",
                    ErrorCode::NoTopLevel,
                ));
            }
            TopLevel::None => {}
            TopLevel::Ambiguous(roots) => {
                let mut diagnostic = Diagnostic::with_code(
                    Location::design(),
                    format!(
                        "Found {} top level candidates: {}",
                        roots.len(),
                        self.root_keys().join(", ")
                    ),
                    ErrorCode::AmbiguousTopLevel,
                );
                for vertex in roots.iter().filter_map(|id| self.vertex(*id)) {
                    diagnostic.add_related(location_of(vertex), "Candidate");
                }
                diagnostics.push(diagnostic);
            }
        }
    }
}

fn matches_name(vertex: &UnitVertex, wanted: &str) -> bool {
    if vertex.key() == wanted {
        return true;
    }
    match vertex.kind() {
        VertexKind::Entity => vertex.name() == wanted,
        VertexKind::Architecture => {
            let entity = vertex.primary_name().unwrap_or_default();
            entity == wanted || format!("{}({})", entity, vertex.name()) == wanted
        }
        _ => false,
    }
}

fn location_of(vertex: &UnitVertex) -> Location {
    match vertex.unit() {
        Some(unit) => Location::new(Subject::Unit(unit), vertex.key()),
        None => Location::new(Subject::Design, vertex.key()),
    }
}
