// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2018, Olof Kraigher olof.kraigher@gmail.com

use fnv::FnvHashMap;

use super::{LibraryId, UnitId};
use crate::ast::*;
use crate::data::*;

/// The name a design unit is registered under within its library.
/// All primary units share one namespace.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub enum UnitKey {
    Primary(String),
    Architecture(String, String),
    PackageBody(String),
}

impl UnitKey {
    pub fn of(unit: &AnyDesignUnit) -> UnitKey {
        match unit {
            AnyDesignUnit::Primary(primary) => {
                UnitKey::Primary(primary.ident().normalized().to_owned())
            }
            AnyDesignUnit::Secondary(AnySecondaryUnit::Architecture(arch)) => {
                UnitKey::Architecture(
                    arch.entity_name.item.normalized().to_owned(),
                    arch.ident.normalized().to_owned(),
                )
            }
            AnyDesignUnit::Secondary(AnySecondaryUnit::PackageBody(body)) => {
                UnitKey::PackageBody(body.ident.item.normalized().to_owned())
            }
        }
    }
}

/// A named collection of compiled design units.
///
/// The library lists its primary units. Architectures and package bodies are
/// reached through the primary unit they belong to. The units themselves are
/// owned by the documents they are declared in.
#[derive(Debug, Clone)]
pub struct Library {
    id: LibraryId,
    ident: Identifier,

    contexts: Vec<UnitId>,
    configurations: Vec<UnitId>,
    entities: Vec<UnitId>,
    packages: Vec<UnitId>,

    // Secondary units in registration order
    architectures: Vec<UnitId>,
    package_bodies: Vec<UnitId>,

    units: FnvHashMap<UnitKey, UnitId>,
    // entity name => architectures in registration order
    architectures_of: FnvHashMap<String, Vec<UnitId>>,
}

impl Library {
    pub(super) fn new(id: LibraryId, ident: Identifier) -> Library {
        Library {
            id,
            ident,
            contexts: Vec::new(),
            configurations: Vec::new(),
            entities: Vec::new(),
            packages: Vec::new(),
            architectures: Vec::new(),
            package_bodies: Vec::new(),
            units: FnvHashMap::default(),
            architectures_of: FnvHashMap::default(),
        }
    }

    pub fn id(&self) -> LibraryId {
        self.id
    }

    pub fn ident(&self) -> &Identifier {
        &self.ident
    }

    pub fn name(&self) -> &str {
        self.ident.name()
    }

    pub fn contexts(&self) -> &[UnitId] {
        &self.contexts
    }

    pub fn configurations(&self) -> &[UnitId] {
        &self.configurations
    }

    pub fn entities(&self) -> &[UnitId] {
        &self.entities
    }

    pub fn packages(&self) -> &[UnitId] {
        &self.packages
    }

    pub(crate) fn architectures(&self) -> &[UnitId] {
        &self.architectures
    }

    pub(crate) fn package_bodies(&self) -> &[UnitId] {
        &self.package_bodies
    }

    /// Ids of the units of the given kinds, grouped by kind
    pub fn units(&self, filter: UnitKindSet) -> Vec<UnitId> {
        let groups: [(AnyKind, &[UnitId]); 6] = [
            (AnyKind::CONTEXT, &self.contexts),
            (AnyKind::CONFIGURATION, &self.configurations),
            (AnyKind::ENTITY, &self.entities),
            (AnyKind::ARCHITECTURE, &self.architectures),
            (AnyKind::PACKAGE, &self.packages),
            (AnyKind::PACKAGE_BODY, &self.package_bodies),
        ];

        groups
            .into_iter()
            .filter(|(kind, _)| filter.contains(*kind))
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect()
    }

    pub fn num_units(&self) -> usize {
        self.units.len()
    }

    pub fn get(&self, key: &UnitKey) -> Option<UnitId> {
        self.units.get(key).copied()
    }

    /// Find a primary unit by name
    pub fn primary_unit(&self, name: &str) -> Option<UnitId> {
        self.get(&UnitKey::Primary(normalize(name)))
    }

    pub fn architecture(&self, entity_name: &str, name: &str) -> Option<UnitId> {
        self.get(&UnitKey::Architecture(
            normalize(entity_name),
            normalize(name),
        ))
    }

    /// Architectures of an entity in the order they were added
    pub fn architectures_of(&self, entity_name: &str) -> &[UnitId] {
        self.architectures_of
            .get(&normalize(entity_name))
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn architectures_of_ident(&self, entity_name: &Identifier) -> &[UnitId] {
        self.architectures_of
            .get(entity_name.normalized())
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn package_body(&self, package_name: &str) -> Option<UnitId> {
        self.get(&UnitKey::PackageBody(normalize(package_name)))
    }

    /// Check that a unit can be added without colliding with an existing one
    pub(super) fn check_vacant(&self, unit: &AnyDesignUnit) -> DiagnosticResult<UnitKey> {
        let key = UnitKey::of(unit);
        if self.units.contains_key(&key) {
            return Err(Diagnostic::duplicate_unit(
                Location::new(Subject::Library(self.id), self.name()),
                duplicate_message(&key, unit, self.name()),
            ));
        }
        Ok(key)
    }

    pub(super) fn insert(&mut self, key: UnitKey, kind: AnyKind, id: UnitId) {
        match kind {
            AnyKind::Primary(PrimaryKind::Context) => self.contexts.push(id),
            AnyKind::Primary(PrimaryKind::Configuration) => self.configurations.push(id),
            AnyKind::Primary(PrimaryKind::Entity) => self.entities.push(id),
            AnyKind::Primary(PrimaryKind::Package) => self.packages.push(id),
            AnyKind::Secondary(SecondaryKind::Architecture) => self.architectures.push(id),
            AnyKind::Secondary(SecondaryKind::PackageBody) => self.package_bodies.push(id),
        }
        if let UnitKey::Architecture(ref entity_name, _) = key {
            self.architectures_of
                .entry(entity_name.clone())
                .or_default()
                .push(id);
        }
        self.units.insert(key, id);
    }

    /// Move a unit to a new key after it was renamed
    pub(super) fn rekey(&mut self, old: &UnitKey, new: UnitKey, id: UnitId) {
        self.units.remove(old);
        if let UnitKey::Architecture(ref entity_name, _) = old {
            if let Some(ids) = self.architectures_of.get_mut(entity_name) {
                ids.retain(|other| *other != id);
            }
        }
        if let UnitKey::Architecture(ref entity_name, _) = new {
            let ids = self.architectures_of.entry(entity_name.clone()).or_default();
            // Keep registration order among the architectures of the entity
            let pos = ids
                .iter()
                .position(|other| *other > id)
                .unwrap_or(ids.len());
            ids.insert(pos, id);
        }
        self.units.insert(new, id);
    }
}

fn normalize(name: &str) -> String {
    match Identifier::new(name) {
        Ok(ident) => ident.normalized().to_owned(),
        // Never matches a registered unit
        Err(_) => name.to_owned(),
    }
}

fn duplicate_message(key: &UnitKey, unit: &AnyDesignUnit, library_name: &str) -> String {
    match key {
        UnitKey::Primary(..) => format!(
            "A primary unit has already been declared with name '{}' in library '{}'",
            unit.name(),
            library_name
        ),
        UnitKey::Architecture(..) => format!(
            "Duplicate architecture '{}' of entity '{}'",
            unit.name(),
            unit.primary_name().map(|ident| ident.name()).unwrap_or_default(),
        ),
        UnitKey::PackageBody(..) => {
            format!("Duplicate package body of package '{}'", unit.name())
        }
    }
}
