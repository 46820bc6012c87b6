// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2024, Olof Kraigher olof.kraigher@gmail.com

use std::fmt;

use fnv::FnvHashMap;
use strum::IntoStaticStr;

use super::graph::{EdgeStatus, KeyedGraph, Vertex, VertexId};
use super::link::{Visibilities, Visibility};
use crate::ast::search::{find_instances, FoundInstance};
use crate::ast::*;
use crate::data::*;
use crate::design::{Design, Library, LibraryId, UnitId, UnitKey};

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum VertexKind {
    Library,
    Context,
    Configuration,
    Entity,
    Architecture,
    Package,
    PackageBody,
}

impl VertexKind {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl From<AnyKind> for VertexKind {
    fn from(kind: AnyKind) -> Self {
        match kind {
            AnyKind::Primary(PrimaryKind::Context) => VertexKind::Context,
            AnyKind::Primary(PrimaryKind::Configuration) => VertexKind::Configuration,
            AnyKind::Primary(PrimaryKind::Entity) => VertexKind::Entity,
            AnyKind::Primary(PrimaryKind::Package) => VertexKind::Package,
            AnyKind::Secondary(SecondaryKind::Architecture) => VertexKind::Architecture,
            AnyKind::Secondary(SecondaryKind::PackageBody) => VertexKind::PackageBody,
        }
    }
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three classes of dependency edges
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum EdgeClass {
    /// Names the target in a clause
    References,
    /// A secondary unit implementing its primary unit
    Implements,
    /// An instantiation statement
    Instantiates,
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum EdgeKind {
    LibraryClause,
    UseClause,
    ContextReference,
    /// From a configuration to the entity it configures
    ConfigurationEntity,
    /// From an architecture to a configuration it instantiates
    ConfigurationReference,
    EntityImplementation,
    PackageImplementation,
    EntityInstantiation,
    ComponentInstantiation,
    ConfigurationInstantiation,
}

impl EdgeKind {
    pub fn class(&self) -> EdgeClass {
        use EdgeKind::*;
        match self {
            LibraryClause | UseClause | ContextReference | ConfigurationEntity
            | ConfigurationReference => EdgeClass::References,
            EntityImplementation | PackageImplementation => EdgeClass::Implements,
            EntityInstantiation | ComponentInstantiation | ConfigurationInstantiation => {
                EdgeClass::Instantiates
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A library or design unit in the dependency graph
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct UnitVertex {
    key: String,
    kind: VertexKind,
    predefined: bool,
    target: RefTarget,
    // Normalized simple name, the primary unit name for secondary units
    name: String,
    primary_name: Option<String>,
}

impl Vertex for UnitVertex {
    type Key = String;

    fn key(&self) -> &String {
        &self.key
    }
}

impl UnitVertex {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> VertexKind {
        self.kind
    }

    /// True if the vertex belongs to a library configured as predefined
    pub fn is_predefined(&self) -> bool {
        self.predefined
    }

    /// The model object the vertex represents
    pub fn target(&self) -> RefTarget {
        self.target
    }

    pub fn unit(&self) -> Option<UnitId> {
        match self.target {
            RefTarget::Unit(id) => Some(id),
            RefTarget::Library(_) => None,
        }
    }

    pub fn library(&self) -> Option<LibraryId> {
        match self.target {
            RefTarget::Library(id) => Some(id),
            RefTarget::Unit(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entity of an architecture, the package of a package body
    pub fn primary_name(&self) -> Option<&str> {
        self.primary_name.as_deref()
    }

    /// The entity name of entity and architecture vertices
    pub fn entity_name(&self) -> Option<&str> {
        match self.kind {
            VertexKind::Entity => Some(&self.name),
            VertexKind::Architecture => self.primary_name(),
            _ => None,
        }
    }
}

/// Structural dependencies between libraries and design units.
///
/// An edge points from the dependent unit to the unit or library it depends on.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    graph: KeyedGraph<UnitVertex, EdgeKind>,
    vertices: FnvHashMap<RefTarget, VertexId>,
}

impl DependencyGraph {
    pub fn graph(&self) -> &KeyedGraph<UnitVertex, EdgeKind> {
        &self.graph
    }

    pub fn num_vertices(&self) -> usize {
        self.graph.num_vertices()
    }

    pub fn num_edges(&self) -> usize {
        self.graph.num_edges()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&UnitVertex> {
        self.graph.vertex(id)
    }

    pub fn get(&self, key: &str) -> Option<&UnitVertex> {
        self.graph.get(key)
    }

    pub fn vertex_id(&self, key: &str) -> Option<VertexId> {
        self.graph.vertex_id(key)
    }

    /// The vertex of a library or design unit
    pub fn vertex_of(&self, target: RefTarget) -> Option<VertexId> {
        self.vertices.get(&target).copied()
    }

    pub fn vertex_of_unit(&self, unit: UnitId) -> Option<VertexId> {
        self.vertex_of(RefTarget::Unit(unit))
    }

    pub fn vertex_of_library(&self, library: LibraryId) -> Option<VertexId> {
        self.vertex_of(RefTarget::Library(library))
    }

    pub fn key_of(&self, id: VertexId) -> Option<&str> {
        self.vertex(id).map(|vertex| vertex.key())
    }

    /// Does an edge of the given kind go from the vertex with key `source` to the one with key `target`
    pub fn has_edge(&self, source: &str, target: &str, kind: EdgeKind) -> bool {
        let (Some(source), Some(target)) = (self.vertex_id(source), self.vertex_id(target)) else {
            return false;
        };
        self.graph
            .outgoing(source)
            .iter()
            .any(|edge| edge.target == target && *edge.weight == kind)
    }

    /// Edge keys and kinds as `(source, target, kind)`, in the order the edges were added
    pub fn edge_keys(&self) -> Vec<(&str, &str, EdgeKind)> {
        self.graph
            .edges()
            .filter_map(|edge| {
                Some((
                    self.key_of(edge.source)?,
                    self.key_of(edge.target)?,
                    *edge.weight,
                ))
            })
            .collect()
    }

    /// Units that are the target of an instantiation
    pub fn is_instantiated(&self, id: VertexId) -> bool {
        self.graph
            .incoming(id)
            .iter()
            .any(|edge| edge.weight.class() == EdgeClass::Instantiates)
    }

    /// The entity an architecture implements or the package a body implements
    pub fn implemented(&self, id: VertexId) -> Option<VertexId> {
        self.graph
            .outgoing(id)
            .iter()
            .find(|edge| edge.weight.class() == EdgeClass::Implements)
            .map(|edge| edge.target)
    }

    /// The architectures of an entity or the body of a package
    pub fn implementations(&self, id: VertexId) -> Vec<VertexId> {
        self.graph
            .incoming(id)
            .iter()
            .filter(|edge| edge.weight.class() == EdgeClass::Implements)
            .map(|edge| edge.source)
            .collect()
    }

    /// Add the vertex of a library or unit. Fails with the id of the vertex
    /// already using the key, the target is then left without a vertex.
    fn add_vertex(&mut self, vertex: UnitVertex) -> Result<VertexId, VertexId> {
        let target = vertex.target;
        if let Some(id) = self.vertices.get(&target) {
            return Ok(*id);
        }
        let id = self.graph.add_vertex(vertex)?;
        self.vertices.insert(target, id);
        Ok(id)
    }

    fn add_edge(&mut self, source: VertexId, target: RefTarget, kind: EdgeKind) {
        let Some(target) = self.vertex_of(target) else {
            return;
        };
        if self.graph.add_edge(source, target, kind) == EdgeStatus::Added {
            log::trace!(
                "{} -> {} [{}]",
                self.key_of(source).unwrap_or_default(),
                self.key_of(target).unwrap_or_default(),
                kind
            );
        }
    }
}

impl fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.graph)
    }
}

pub(super) fn build(
    design: &Design,
    visibilities: &Visibilities,
    diagnostics: &mut dyn DiagnosticHandler,
) -> DependencyGraph {
    let mut builder = GraphBuilder {
        design,
        graph: DependencyGraph::default(),
    };

    builder.add_vertices(diagnostics);
    builder.add_reference_edges();
    builder.add_implementation_edges(VertexKind::Architecture, EdgeKind::EntityImplementation);
    builder.add_implementation_edges(VertexKind::PackageBody, EdgeKind::PackageImplementation);
    builder.add_instantiation_edges(visibilities, diagnostics);

    log::debug!(
        "Dependency graph has {} vertices and {} edges",
        builder.graph.num_vertices(),
        builder.graph.num_edges()
    );
    builder.graph
}

struct GraphBuilder<'a> {
    design: &'a Design,
    graph: DependencyGraph,
}

impl<'a> GraphBuilder<'a> {
    fn add_vertices(&mut self, diagnostics: &mut dyn DiagnosticHandler) {
        for library in self.design.libraries() {
            let predefined = self.design.config().is_predefined(library.name());
            let name = library.ident().normalized().to_owned();
            let vertex = UnitVertex {
                key: name.clone(),
                kind: VertexKind::Library,
                predefined,
                target: RefTarget::Library(library.id()),
                name,
                primary_name: None,
            };
            self.add_or_report(vertex, diagnostics);

            let mut ids: Vec<UnitId> = Vec::with_capacity(library.num_units());
            ids.extend(library.contexts());
            ids.extend(library.configurations());
            for entity in library.entities() {
                ids.push(*entity);
                if let Some(unit) = self.design.unit(*entity) {
                    ids.extend(library.architectures_of_ident(unit.ident()));
                }
            }
            ids.extend(library.packages());
            ids.extend(library.package_bodies());
            // Architectures of missing entities
            ids.extend(library.architectures());

            for id in ids {
                self.add_unit_vertex(id, predefined, diagnostics);
            }
        }
    }

    fn add_unit_vertex(
        &mut self,
        id: UnitId,
        predefined: bool,
        diagnostics: &mut dyn DiagnosticHandler,
    ) {
        if self.graph.vertex_of_unit(id).is_some() {
            return;
        }
        let Some(unit) = self.design.design_unit(id) else {
            return;
        };
        let vertex = UnitVertex {
            key: unit.key(),
            kind: unit.kind().into(),
            predefined,
            target: RefTarget::Unit(id),
            name: unit.unit().ident().normalized().to_owned(),
            primary_name: unit
                .unit()
                .primary_name()
                .map(|name| name.normalized().to_owned()),
        };
        self.add_or_report(vertex, diagnostics);
    }

    fn add_or_report(&mut self, vertex: UnitVertex, diagnostics: &mut dyn DiagnosticHandler) {
        let target = vertex.target;
        let Err(existing) = self.graph.add_vertex(vertex) else {
            return;
        };
        let Some(other) = self.graph.vertex(existing).map(|vertex| vertex.target) else {
            return;
        };
        let location = self.location_of(target);
        diagnostics.push(
            Diagnostic::internal(
                &location,
                format!(
                    "'{}' has the same dependency graph key as another library or design unit",
                    location.name
                ),
            )
            .related(self.location_of(other), "Key already used here"),
        );
    }

    fn location_of(&self, target: RefTarget) -> Location {
        match target {
            RefTarget::Unit(id) => self.design.location_of(id),
            RefTarget::Library(id) => self.design.library_location(id),
        }
    }

    /// Units of a kind, or all units, in the order their vertices were created
    fn units_by_kind(&self, kind: Option<VertexKind>) -> Vec<(VertexId, UnitId)> {
        self.graph
            .graph()
            .vertices()
            .filter(|(_, vertex)| kind.map_or(true, |kind| vertex.kind() == kind))
            .filter_map(|(id, vertex)| Some((id, vertex.unit()?)))
            .collect()
    }

    fn add_reference_edges(&mut self) {
        for (source, id) in self.units_by_kind(None) {
            let Some(unit) = self.design.unit(id) else {
                continue;
            };

            for name in unit.library_references() {
                if let Some(target) = name.reference.get() {
                    self.graph.add_edge(source, target, EdgeKind::LibraryClause);
                }
            }
            for name in unit.package_references() {
                if let Some(target) = name.reference.get() {
                    self.graph.add_edge(source, target, EdgeKind::UseClause);
                }
            }
            for name in unit.context_references() {
                if let Some(target) = name.reference.get() {
                    self.graph.add_edge(source, target, EdgeKind::ContextReference);
                }
            }
            if let AnyDesignUnit::Primary(AnyPrimaryUnit::Configuration(config)) = unit {
                if let Some(target) = config.entity_name.reference.get() {
                    self.graph.add_edge(source, target, EdgeKind::ConfigurationEntity);
                }
            }
        }
    }

    fn add_implementation_edges(&mut self, kind: VertexKind, edge: EdgeKind) {
        for (source, id) in self.units_by_kind(Some(kind)) {
            let target = self
                .design
                .unit(id)
                .and_then(|unit| unit.primary_reference())
                .and_then(|reference| reference.get());
            if let Some(target) = target {
                self.graph.add_edge(source, target, edge);
            }
        }
    }

    fn add_instantiation_edges(
        &mut self,
        visibilities: &Visibilities,
        diagnostics: &mut dyn DiagnosticHandler,
    ) {
        let default_visibility = Visibility::default();
        for (source, id) in self.units_by_kind(Some(VertexKind::Architecture)) {
            let Some(unit) = self.design.design_unit(id) else {
                continue;
            };
            let visibility = visibilities.get(&id).unwrap_or(&default_visibility);
            let location = unit.location();

            for instance in find_instances(unit.unit().statements()) {
                self.add_instance(
                    source,
                    unit.library(),
                    visibility,
                    &instance,
                    &location,
                    diagnostics,
                );
            }
        }
    }

    fn add_instance(
        &mut self,
        source: VertexId,
        library: &Library,
        visibility: &Visibility,
        instance: &FoundInstance<'_>,
        location: &Location,
        diagnostics: &mut dyn DiagnosticHandler,
    ) {
        match instance.instance.unit {
            InstantiatedUnit::Entity(ref name, ref architecture) => {
                let Some(entity) = self.find_unit(library, visibility, name, AnyKind::ENTITY)
                else {
                    diagnostics.push(Diagnostic::with_code(
                        location,
                        format!(
                            "No entity '{}' found for instance '{}'",
                            name,
                            instance.path()
                        ),
                        ErrorCode::UnboundComponent,
                    ));
                    return;
                };

                let target = match architecture {
                    Some(architecture) => {
                        match self.find_architecture(entity, architecture) {
                            Some(arch) => arch,
                            None => {
                                diagnostics.push(Diagnostic::with_code(
                                    location,
                                    format!(
                                        "No architecture '{}' for entity '{}'",
                                        architecture, name
                                    ),
                                    ErrorCode::NoArchForEnt,
                                ));
                                entity
                            }
                        }
                    }
                    None => entity,
                };
                self.graph
                    .add_edge(source, RefTarget::Unit(target), EdgeKind::EntityInstantiation);
            }
            InstantiatedUnit::Component(ref name) => {
                match self.bind_component(library, visibility, name) {
                    Some(entity) => self.graph.add_edge(
                        source,
                        RefTarget::Unit(entity),
                        EdgeKind::ComponentInstantiation,
                    ),
                    None => diagnostics.push(Diagnostic::with_code(
                        location,
                        format!(
                            "Component '{}' of instance '{}' is not bound to any entity",
                            name,
                            instance.path()
                        ),
                        ErrorCode::UnboundComponent,
                    )),
                }
            }
            InstantiatedUnit::Configuration(ref name) => {
                let Some(config) =
                    self.find_unit(library, visibility, name, AnyKind::CONFIGURATION)
                else {
                    diagnostics.push(Diagnostic::with_code(
                        location,
                        format!(
                            "No configuration '{}' found for instance '{}'",
                            name,
                            instance.path()
                        ),
                        ErrorCode::UnboundComponent,
                    ));
                    return;
                };
                self.graph.add_edge(
                    source,
                    RefTarget::Unit(config),
                    EdgeKind::ConfigurationReference,
                );
                if let Some(target) = self.configured_unit(config) {
                    self.graph.add_edge(
                        source,
                        RefTarget::Unit(target),
                        EdgeKind::ConfigurationInstantiation,
                    );
                }
            }
        }
    }

    /// A primary unit named `name` or `lib.name`
    fn find_unit(
        &self,
        library: &Library,
        visibility: &Visibility,
        name: &Name,
        kind: AnyKind,
    ) -> Option<UnitId> {
        let (segments, all) = name.segments()?;
        let (library, name) = match segments.as_slice() {
            [name] => (library, *name),
            [library_name, name] => (
                self.design
                    .library(visibility.library(library_name.normalized())?)?,
                *name,
            ),
            _ => return None,
        };
        if all {
            return None;
        }
        self.primary_of_kind(library, name, kind)
    }

    fn primary_of_kind(&self, library: &Library, name: &Identifier, kind: AnyKind) -> Option<UnitId> {
        library
            .get(&UnitKey::Primary(name.normalized().to_owned()))
            .filter(|id| self.design.unit(*id).map(|unit| unit.kind()) == Some(kind))
    }

    fn find_architecture(&self, entity: UnitId, name: &Identifier) -> Option<UnitId> {
        let entity = self.design.design_unit(entity)?;
        entity.library().get(&UnitKey::Architecture(
            entity.unit().ident().normalized().to_owned(),
            name.normalized().to_owned(),
        ))
    }

    /// Default binding of a component: an entity with the same name in the
    /// own library, then in the other visible libraries
    fn bind_component(
        &self,
        library: &Library,
        visibility: &Visibility,
        name: &Name,
    ) -> Option<UnitId> {
        let component = name.suffix()?;
        std::iter::once(library.id())
            .chain(visibility.libraries())
            .filter_map(|id| self.design.library(id))
            .find_map(|library| self.primary_of_kind(library, component, AnyKind::ENTITY))
    }

    /// The architecture selected by a configuration, or its entity
    fn configured_unit(&self, config: UnitId) -> Option<UnitId> {
        let unit = self.design.unit(config)?;
        let entity = unit.primary_reference()?.unit()?;
        let selected = unit
            .as_configuration()?
            .architecture_name()
            .and_then(|architecture| self.find_architecture(entity, architecture));
        Some(selected.unwrap_or(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::Document;
    use pretty_assertions::assert_eq;

    #[test]
    fn colliding_key_is_reported_instead_of_shared() {
        let mut design = Design::new();
        let lib = design.create_library("lib").unwrap();
        let doc = design
            .add_document(
                Document::new("ent.vhd").with_unit(EntityDeclaration::new("ent").unwrap()),
                lib,
            )
            .unwrap();

        let mut builder = GraphBuilder {
            design: &design,
            graph: DependencyGraph::default(),
        };
        let mut diagnostics = Vec::new();
        builder.add_vertices(&mut diagnostics);
        assert_eq!(diagnostics, vec![]);

        let other = UnitId::new(doc, 1);
        let vertex = UnitVertex {
            target: RefTarget::Unit(other),
            ..builder.graph.get("lib.ent").unwrap().clone()
        };
        builder.add_or_report(vertex, &mut diagnostics);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::Internal);
        assert_eq!(builder.graph.num_vertices(), 2);
        assert_eq!(builder.graph.vertex_of_unit(other), None);
        assert_eq!(
            builder.graph.key_of(builder.graph.vertex_of_unit(UnitId::new(doc, 0)).unwrap()),
            Some("lib.ent")
        );
    }
}
