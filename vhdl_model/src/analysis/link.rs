// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2024, Olof Kraigher olof.kraigher@gmail.com

//! Resolution of library clauses, use clauses, context references and
//! secondary-to-primary unit links

use fnv::{FnvHashMap, FnvHashSet};

use crate::ast::*;
use crate::data::*;
use crate::design::{Design, Library, LibraryId, UnitId, UnitKey};
use crate::standard::VHDLStandard;

#[derive(Clone, Debug)]
struct VisibleLibrary {
    name: String,
    id: LibraryId,
    // Made visible by a library clause rather than implicitly
    explicit: bool,
}

/// Libraries and packages that are visible to a design unit through its
/// context clause, in the order they became visible
#[derive(Clone, Debug, Default)]
pub(super) struct Visibility {
    libraries: Vec<VisibleLibrary>,
    packages: Vec<(String, UnitId)>,
}

impl Visibility {
    /// The own library, also known as `work`, and the `std` library are always visible
    fn implicit(design: &Design, library: &Library) -> Visibility {
        let mut visibility = Visibility::default();
        visibility.add_library(library.ident().normalized(), library.id(), false);
        visibility.add_library("work", library.id(), false);
        if let Some(std) = design.library_id("std") {
            visibility.add_library("std", std, false);
        }
        visibility
    }

    fn add_library(&mut self, name: &str, id: LibraryId, explicit: bool) {
        if self.library(name).is_none() {
            self.libraries.push(VisibleLibrary {
                name: name.to_owned(),
                id,
                explicit,
            });
        }
    }

    fn add_package(&mut self, name: &str, id: UnitId) {
        if self.package(name).is_none() {
            self.packages.push((name.to_owned(), id));
        }
    }

    /// Look up a library by normalized name
    pub(super) fn library(&self, name: &str) -> Option<LibraryId> {
        self.libraries
            .iter()
            .find(|library| library.name == name)
            .map(|library| library.id)
    }

    fn package(&self, name: &str) -> Option<UnitId> {
        self.packages
            .iter()
            .find(|(package, _)| package == name)
            .map(|(_, id)| *id)
    }

    /// Distinct visible libraries, the own library first
    pub(super) fn libraries(&self) -> Vec<LibraryId> {
        let mut seen = FnvHashSet::default();
        self.libraries
            .iter()
            .map(|library| library.id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Add what another unit, such as a referenced context, makes visible
    fn import(&mut self, other: &Visibility) {
        for library in other.libraries.iter().filter(|library| library.explicit) {
            self.add_library(&library.name, library.id, true);
        }
        for (name, id) in other.packages.iter() {
            self.add_package(name, *id);
        }
    }
}

pub(super) type Visibilities = FnvHashMap<UnitId, Visibility>;

/// What the references of one unit resolved to, in the order of
/// [`AnyDesignUnit::library_references`] and friends
#[derive(Default)]
struct UnitLinks {
    libraries: Vec<Option<RefTarget>>,
    packages: Vec<Option<RefTarget>>,
    contexts: Vec<Option<RefTarget>>,
    primary: Option<RefTarget>,
}

impl UnitLinks {
    fn apply(self, unit: &mut AnyDesignUnit) {
        for (name, target) in unit.library_references_mut().into_iter().zip(self.libraries) {
            name.reference.set_opt(target);
        }
        for (name, target) in unit.package_references_mut().into_iter().zip(self.packages) {
            name.reference.set_opt(target);
        }
        for (name, target) in unit.context_references_mut().into_iter().zip(self.contexts) {
            name.reference.set_opt(target);
        }
        if let Some(reference) = unit.primary_reference_mut() {
            reference.set_opt(self.primary);
        }
    }
}

/// Resolve all references of all design units and store the result in the units.
///
/// Returns what each unit can see, for use by later phases.
pub(super) fn link(design: &mut Design, diagnostics: &mut dyn DiagnosticHandler) -> Visibilities {
    let ids: Vec<UnitId> = design.units(UnitKindSet::ALL).map(|unit| unit.id()).collect();
    for id in ids.iter() {
        if let Some(unit) = design.unit_mut(*id) {
            unit.clear_references();
        }
    }

    let mut resolved = Vec::with_capacity(ids.len());
    let mut visibilities = Visibilities::default();
    {
        let linker = Linker {
            design,
            standard: design.standard(),
        };
        for library in design.libraries() {
            for kind in AnyKind::link_order() {
                for id in library.units(UnitKindSet::only(kind)) {
                    let (links, visibility) = linker.link_unit(library, id, diagnostics);
                    resolved.push((id, links));
                    visibilities.insert(id, visibility);
                }
            }
        }
    }

    for (id, links) in resolved {
        if let Some(unit) = design.unit_mut(id) {
            links.apply(unit);
        }
    }
    visibilities
}

struct Linker<'a> {
    design: &'a Design,
    standard: VHDLStandard,
}

impl<'a> Linker<'a> {
    fn link_unit(
        &self,
        library: &Library,
        id: UnitId,
        diagnostics: &mut dyn DiagnosticHandler,
    ) -> (UnitLinks, Visibility) {
        let mut links = UnitLinks::default();
        let Some(unit) = self.design.unit(id) else {
            return (links, Visibility::default());
        };
        let location = self.design.location_of(id);

        if unit.kind() == AnyKind::CONTEXT && !self.standard.supports_contexts() {
            diagnostics.error(
                &location,
                format!(
                    "Context declarations require VHDL-2008 or later, the standard is {}",
                    self.standard
                ),
                ErrorCode::UnsupportedStandard,
            );
        }

        let mut visibility = Visibility::implicit(self.design, library);
        if let Some(primary_name) = unit.primary_name() {
            links.primary = self
                .find_primary(library, unit, primary_name, &location, diagnostics)
                .map(RefTarget::Unit);

            // Secondary units see what their primary unit sees
            if let Some(primary) = links.primary.and_then(|target| match target {
                RefTarget::Unit(primary) => self.design.unit(primary),
                RefTarget::Library(_) => None,
            }) {
                let mut ignored = UnitLinks::default();
                visibility = self.visibility_of(
                    library,
                    primary,
                    visibility,
                    &location,
                    &mut ignored,
                    &mut FnvHashSet::default(),
                    &mut NullDiagnostics,
                );
            }
        }

        let visibility = self.visibility_of(
            library,
            unit,
            visibility,
            &location,
            &mut links,
            &mut FnvHashSet::default(),
            diagnostics,
        );

        if let AnyDesignUnit::Primary(AnyPrimaryUnit::Configuration(config)) = unit {
            links.primary = self
                .resolve_entity(library, &visibility, &config.entity_name.item, &location, diagnostics)
                .map(RefTarget::Unit);
        }

        (links, visibility)
    }

    fn find_primary(
        &self,
        library: &Library,
        unit: &AnyDesignUnit,
        primary_name: &Identifier,
        location: &Location,
        diagnostics: &mut dyn DiagnosticHandler,
    ) -> Option<UnitId> {
        let (expected, code) = match unit.kind() {
            AnyKind::Secondary(SecondaryKind::PackageBody) => {
                (AnyKind::PACKAGE, ErrorCode::UnresolvedPackageBody)
            }
            _ => (AnyKind::ENTITY, ErrorCode::UnresolvedArchitecture),
        };

        let found = library
            .get(&UnitKey::Primary(primary_name.normalized().to_owned()))
            .filter(|id| self.kind_of(*id) == Some(expected));

        if found.is_none() {
            diagnostics.error(
                location,
                format!(
                    "No {} '{}' in library '{}'",
                    expected.describe(),
                    primary_name,
                    library.name()
                ),
                code,
            );
        }
        found
    }

    /// Process the context clause of a unit and the use clauses of its declarative part
    #[allow(clippy::too_many_arguments)]
    fn visibility_of(
        &self,
        library: &Library,
        unit: &AnyDesignUnit,
        mut visibility: Visibility,
        location: &Location,
        links: &mut UnitLinks,
        visited: &mut FnvHashSet<UnitId>,
        diagnostics: &mut dyn DiagnosticHandler,
    ) -> Visibility {
        for item in unit.context_clause().iter() {
            match item {
                ContextItem::Library(clause) => {
                    for name in clause.name_list.iter() {
                        let target = self.resolve_library(library, &name.item, location, diagnostics);
                        if let Some(id) = target {
                            visibility.add_library(name.item.normalized(), id, true);
                        }
                        links.libraries.push(target.map(RefTarget::Library));
                    }
                }
                ContextItem::Use(clause) => {
                    for name in clause.name_list.iter() {
                        let target = self.resolve_use(&visibility, &name.item, location, diagnostics);
                        self.use_package(&mut visibility, target);
                        links.packages.push(target);
                    }
                }
                ContextItem::Context(clause) => {
                    for name in clause.name_list.iter() {
                        if !self.standard.supports_contexts() {
                            diagnostics.error(
                                location,
                                format!(
                                    "Context reference '{}' requires VHDL-2008 or later",
                                    name.item
                                ),
                                ErrorCode::UnsupportedStandard,
                            );
                        }
                        let target = self.resolve_context(&visibility, &name.item, location, diagnostics);
                        if let Some(context) = target {
                            self.import_context(context, &mut visibility, visited);
                        }
                        links.contexts.push(target.map(RefTarget::Unit));
                    }
                }
            }
        }

        // Use clauses of the declarative part see everything of the context clause
        let context_uses = links.packages.len();
        for name in unit.package_references().into_iter().skip(context_uses) {
            let target = self.resolve_use(&visibility, &name.item, location, diagnostics);
            self.use_package(&mut visibility, target);
            links.packages.push(target);
        }

        visibility
    }

    fn use_package(&self, visibility: &mut Visibility, target: Option<RefTarget>) {
        if let Some(RefTarget::Unit(id)) = target {
            if let Some(package) = self.design.unit(id) {
                visibility.add_package(package.ident().normalized(), id);
            }
        }
    }

    fn import_context(
        &self,
        context: UnitId,
        visibility: &mut Visibility,
        visited: &mut FnvHashSet<UnitId>,
    ) {
        if !visited.insert(context) {
            return;
        }
        let Some(unit) = self.design.design_unit(context) else {
            return;
        };
        let imported = self.visibility_of(
            unit.library(),
            unit.unit(),
            Visibility::implicit(self.design, unit.library()),
            &unit.location(),
            &mut UnitLinks::default(),
            visited,
            &mut NullDiagnostics,
        );
        visibility.import(&imported);
    }

    fn kind_of(&self, id: UnitId) -> Option<AnyKind> {
        self.design.unit(id).map(|unit| unit.kind())
    }

    fn resolve_library(
        &self,
        library: &Library,
        name: &Identifier,
        location: &Location,
        diagnostics: &mut dyn DiagnosticHandler,
    ) -> Option<LibraryId> {
        if name.normalized() == "work" {
            return Some(library.id());
        }
        let found = self.design.find_library(name);
        if found.is_none() {
            diagnostics.push(Diagnostic::unresolved_reference(
                location,
                format!("No such library '{name}'"),
            ));
        }
        found
    }

    /// Find a primary unit of a specific kind by library name and unit name
    fn find_in_library(
        &self,
        visibility: &Visibility,
        library_name: &Identifier,
        name: &Identifier,
        expected: AnyKind,
        location: &Location,
        diagnostics: &mut dyn DiagnosticHandler,
    ) -> Option<UnitId> {
        let Some(library) = visibility
            .library(library_name.normalized())
            .and_then(|id| self.design.library(id))
        else {
            diagnostics.push(Diagnostic::unresolved_reference(
                location,
                format!("No library '{library_name}' is visible"),
            ));
            return None;
        };

        match library.get(&UnitKey::Primary(name.normalized().to_owned())) {
            Some(id) if self.kind_of(id) == Some(expected) => Some(id),
            Some(id) => {
                let actual = self.kind_of(id).map(|kind| kind.describe()).unwrap_or("unit");
                diagnostics.push(Diagnostic::unresolved_reference(
                    location,
                    format!(
                        "'{}' in library '{}' is {} {}, not {} {}",
                        name,
                        library.name(),
                        article(actual),
                        actual,
                        article(expected.describe()),
                        expected.describe(),
                    ),
                ));
                None
            }
            None => {
                diagnostics.push(Diagnostic::unresolved_reference(
                    location,
                    format!(
                        "No {} '{}' in library '{}'",
                        expected.describe(),
                        name,
                        library.name()
                    ),
                ));
                None
            }
        }
    }

    fn resolve_use(
        &self,
        visibility: &Visibility,
        name: &Name,
        location: &Location,
        diagnostics: &mut dyn DiagnosticHandler,
    ) -> Option<RefTarget> {
        let Some((segments, _)) = name.segments() else {
            diagnostics.push(Diagnostic::unresolved_reference(
                location,
                format!("Invalid name '{name}' in use clause"),
            ));
            return None;
        };
        let (first, rest) = segments.split_first()?;

        if let Some(library) = visibility.library(first.normalized()) {
            match rest.first() {
                // use lib.all
                None => Some(RefTarget::Library(library)),
                Some(package) => self
                    .find_in_library(
                        visibility,
                        first,
                        package,
                        AnyKind::PACKAGE,
                        location,
                        diagnostics,
                    )
                    .map(RefTarget::Unit),
            }
        } else if let Some(package) = visibility.package(first.normalized()) {
            // use pkg.item where pkg was made visible by an earlier use clause
            Some(RefTarget::Unit(package))
        } else {
            diagnostics.push(Diagnostic::unresolved_reference(
                location,
                format!("No library or package '{first}' is visible"),
            ));
            None
        }
    }

    fn resolve_context(
        &self,
        visibility: &Visibility,
        name: &Name,
        location: &Location,
        diagnostics: &mut dyn DiagnosticHandler,
    ) -> Option<UnitId> {
        match name.segments() {
            Some((segments, false)) if segments.len() == 2 => self.find_in_library(
                visibility,
                segments[0],
                segments[1],
                AnyKind::CONTEXT,
                location,
                diagnostics,
            ),
            _ => {
                diagnostics.push(Diagnostic::unresolved_reference(
                    location,
                    format!("Invalid context reference '{name}', expected library.context"),
                ));
                None
            }
        }
    }

    /// The entity named by a configuration declaration
    fn resolve_entity(
        &self,
        library: &Library,
        visibility: &Visibility,
        name: &Name,
        location: &Location,
        diagnostics: &mut dyn DiagnosticHandler,
    ) -> Option<UnitId> {
        match name.segments() {
            Some((segments, false)) if segments.len() == 1 => {
                let found = library
                    .get(&UnitKey::Primary(segments[0].normalized().to_owned()))
                    .filter(|id| self.kind_of(*id) == Some(AnyKind::ENTITY));
                if found.is_none() {
                    diagnostics.push(Diagnostic::unresolved_reference(
                        location,
                        format!("No entity '{}' in library '{}'", segments[0], library.name()),
                    ));
                }
                found
            }
            Some((segments, false)) if segments.len() == 2 => self.find_in_library(
                visibility,
                segments[0],
                segments[1],
                AnyKind::ENTITY,
                location,
                diagnostics,
            ),
            _ => {
                diagnostics.push(Diagnostic::unresolved_reference(
                    location,
                    format!("Invalid entity name '{name}' in configuration"),
                ));
                None
            }
        }
    }
}

fn article(noun: &str) -> &'static str {
    match noun.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}
