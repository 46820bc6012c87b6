// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2020, Olof Kraigher olof.kraigher@gmail.com

use super::*;
use strum::{EnumIter, IntoEnumIterator};

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, EnumIter)]
pub enum PrimaryKind {
    Entity,
    Configuration,
    Package,
    Context,
}

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, EnumIter)]
pub enum SecondaryKind {
    Architecture,
    PackageBody,
}

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum AnyKind {
    Primary(PrimaryKind),
    Secondary(SecondaryKind),
}

impl AnyKind {
    pub const ENTITY: AnyKind = AnyKind::Primary(PrimaryKind::Entity);
    pub const CONFIGURATION: AnyKind = AnyKind::Primary(PrimaryKind::Configuration);
    pub const PACKAGE: AnyKind = AnyKind::Primary(PrimaryKind::Package);
    pub const CONTEXT: AnyKind = AnyKind::Primary(PrimaryKind::Context);
    pub const ARCHITECTURE: AnyKind = AnyKind::Secondary(SecondaryKind::Architecture);
    pub const PACKAGE_BODY: AnyKind = AnyKind::Secondary(SecondaryKind::PackageBody);

    /// All kinds, in the order units of a library are linked in
    pub fn link_order() -> [AnyKind; 6] {
        [
            AnyKind::CONTEXT,
            AnyKind::PACKAGE,
            AnyKind::PACKAGE_BODY,
            AnyKind::ENTITY,
            AnyKind::ARCHITECTURE,
            AnyKind::CONFIGURATION,
        ]
    }

    pub fn iter() -> impl Iterator<Item = AnyKind> {
        PrimaryKind::iter()
            .map(AnyKind::Primary)
            .chain(SecondaryKind::iter().map(AnyKind::Secondary))
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, AnyKind::Primary(_))
    }

    fn bit(&self) -> u8 {
        match self {
            AnyKind::Primary(PrimaryKind::Entity) => 1 << 0,
            AnyKind::Primary(PrimaryKind::Configuration) => 1 << 1,
            AnyKind::Primary(PrimaryKind::Package) => 1 << 2,
            AnyKind::Primary(PrimaryKind::Context) => 1 << 3,
            AnyKind::Secondary(SecondaryKind::Architecture) => 1 << 4,
            AnyKind::Secondary(SecondaryKind::PackageBody) => 1 << 5,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            AnyKind::Primary(PrimaryKind::Entity) => "entity",
            AnyKind::Primary(PrimaryKind::Configuration) => "configuration",
            AnyKind::Primary(PrimaryKind::Package) => "package",
            AnyKind::Primary(PrimaryKind::Context) => "context",
            AnyKind::Secondary(SecondaryKind::Architecture) => "architecture",
            AnyKind::Secondary(SecondaryKind::PackageBody) => "package body",
        }
    }
}

/// A set of unit kinds used to filter unit iteration
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub struct UnitKindSet(u8);

impl UnitKindSet {
    pub const NONE: UnitKindSet = UnitKindSet(0);
    pub const ALL: UnitKindSet = UnitKindSet(0b11_1111);
    pub const PRIMARY: UnitKindSet = UnitKindSet(0b00_1111);
    pub const SECONDARY: UnitKindSet = UnitKindSet(0b11_0000);
    /// Units that may be preceded by a context clause
    pub const WITH_CONTEXT: UnitKindSet = UnitKindSet(0b11_0111);

    pub fn only(kind: AnyKind) -> UnitKindSet {
        UnitKindSet(kind.bit())
    }

    pub fn with(self, kind: AnyKind) -> UnitKindSet {
        UnitKindSet(self.0 | kind.bit())
    }

    pub fn contains(&self, kind: AnyKind) -> bool {
        self.0 & kind.bit() != 0
    }
}

impl Default for UnitKindSet {
    fn default() -> Self {
        UnitKindSet::ALL
    }
}

impl From<AnyKind> for UnitKindSet {
    fn from(kind: AnyKind) -> Self {
        UnitKindSet::only(kind)
    }
}

impl AnyPrimaryUnit {
    pub fn kind(&self) -> PrimaryKind {
        match self {
            AnyPrimaryUnit::Entity(..) => PrimaryKind::Entity,
            AnyPrimaryUnit::Configuration(..) => PrimaryKind::Configuration,
            AnyPrimaryUnit::Package(..) => PrimaryKind::Package,
            AnyPrimaryUnit::Context(..) => PrimaryKind::Context,
        }
    }
}

impl AnySecondaryUnit {
    pub fn kind(&self) -> SecondaryKind {
        match self {
            AnySecondaryUnit::Architecture(..) => SecondaryKind::Architecture,
            AnySecondaryUnit::PackageBody(..) => SecondaryKind::PackageBody,
        }
    }
}

impl HasIdent for AnyPrimaryUnit {
    fn ident(&self) -> &Identifier {
        match self {
            AnyPrimaryUnit::Entity(ref unit) => unit.ident(),
            AnyPrimaryUnit::Configuration(ref unit) => unit.ident(),
            AnyPrimaryUnit::Package(ref unit) => unit.ident(),
            AnyPrimaryUnit::Context(ref unit) => unit.ident(),
        }
    }
}

impl HasIdent for AnySecondaryUnit {
    fn ident(&self) -> &Identifier {
        match self {
            AnySecondaryUnit::Architecture(ref unit) => unit.ident(),
            AnySecondaryUnit::PackageBody(ref unit) => unit.ident(),
        }
    }
}

impl HasIdent for AnyDesignUnit {
    fn ident(&self) -> &Identifier {
        match self {
            AnyDesignUnit::Primary(ref unit) => unit.ident(),
            AnyDesignUnit::Secondary(ref unit) => unit.ident(),
        }
    }
}

fn uses_in(decl: &[Declaration]) -> impl Iterator<Item = &UseClause> {
    decl.iter().filter_map(|decl| match decl {
        Declaration::Use(use_clause) => Some(use_clause),
        _ => None,
    })
}

fn uses_in_mut(decl: &mut [Declaration]) -> impl Iterator<Item = &mut UseClause> {
    decl.iter_mut().filter_map(|decl| match decl {
        Declaration::Use(use_clause) => Some(use_clause),
        _ => None,
    })
}

impl AnyDesignUnit {
    pub fn kind(&self) -> AnyKind {
        match self {
            AnyDesignUnit::Primary(unit) => AnyKind::Primary(unit.kind()),
            AnyDesignUnit::Secondary(unit) => AnyKind::Secondary(unit.kind()),
        }
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, AnyDesignUnit::Primary(AnyPrimaryUnit::Entity(_)))
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, AnyDesignUnit::Primary(_))
    }

    pub fn as_entity(&self) -> Option<&EntityDeclaration> {
        match self {
            AnyDesignUnit::Primary(AnyPrimaryUnit::Entity(unit)) => Some(unit),
            _ => None,
        }
    }

    pub fn as_architecture(&self) -> Option<&ArchitectureBody> {
        match self {
            AnyDesignUnit::Secondary(AnySecondaryUnit::Architecture(unit)) => Some(unit),
            _ => None,
        }
    }

    pub fn as_package(&self) -> Option<&PackageDeclaration> {
        match self {
            AnyDesignUnit::Primary(AnyPrimaryUnit::Package(unit)) => Some(unit),
            _ => None,
        }
    }

    pub fn as_package_body(&self) -> Option<&PackageBody> {
        match self {
            AnyDesignUnit::Secondary(AnySecondaryUnit::PackageBody(unit)) => Some(unit),
            _ => None,
        }
    }

    pub fn as_configuration(&self) -> Option<&ConfigurationDeclaration> {
        match self {
            AnyDesignUnit::Primary(AnyPrimaryUnit::Configuration(unit)) => Some(unit),
            _ => None,
        }
    }

    pub fn as_context(&self) -> Option<&ContextDeclaration> {
        match self {
            AnyDesignUnit::Primary(AnyPrimaryUnit::Context(unit)) => Some(unit),
            _ => None,
        }
    }

    /// For a secondary unit, the name of the primary unit it belongs to
    pub fn primary_name(&self) -> Option<&Identifier> {
        match self {
            AnyDesignUnit::Secondary(AnySecondaryUnit::Architecture(unit)) => {
                Some(&unit.entity_name.item)
            }
            AnyDesignUnit::Secondary(AnySecondaryUnit::PackageBody(unit)) => Some(&unit.ident.item),
            AnyDesignUnit::Primary(_) => None,
        }
    }

    /// The link from a secondary unit to its primary unit,
    /// or from a configuration to its entity
    pub fn primary_reference(&self) -> Option<&Reference> {
        match self {
            AnyDesignUnit::Secondary(AnySecondaryUnit::Architecture(unit)) => {
                Some(&unit.entity_name.reference)
            }
            AnyDesignUnit::Secondary(AnySecondaryUnit::PackageBody(unit)) => {
                Some(&unit.ident.reference)
            }
            AnyDesignUnit::Primary(AnyPrimaryUnit::Configuration(unit)) => {
                Some(&unit.entity_name.reference)
            }
            _ => None,
        }
    }

    pub fn primary_reference_mut(&mut self) -> Option<&mut Reference> {
        match self {
            AnyDesignUnit::Secondary(AnySecondaryUnit::Architecture(unit)) => {
                Some(&mut unit.entity_name.reference)
            }
            AnyDesignUnit::Secondary(AnySecondaryUnit::PackageBody(unit)) => {
                Some(&mut unit.ident.reference)
            }
            AnyDesignUnit::Primary(AnyPrimaryUnit::Configuration(unit)) => {
                Some(&mut unit.entity_name.reference)
            }
            _ => None,
        }
    }

    /// The context clause preceding the unit. For a context declaration, its items.
    pub fn context_clause(&self) -> &ContextClause {
        match self {
            AnyDesignUnit::Primary(AnyPrimaryUnit::Entity(unit)) => &unit.context_clause,
            AnyDesignUnit::Primary(AnyPrimaryUnit::Configuration(unit)) => &unit.context_clause,
            AnyDesignUnit::Primary(AnyPrimaryUnit::Package(unit)) => &unit.context_clause,
            AnyDesignUnit::Primary(AnyPrimaryUnit::Context(unit)) => &unit.items,
            AnyDesignUnit::Secondary(AnySecondaryUnit::Architecture(unit)) => &unit.context_clause,
            AnyDesignUnit::Secondary(AnySecondaryUnit::PackageBody(unit)) => &unit.context_clause,
        }
    }

    pub fn context_clause_mut(&mut self) -> &mut ContextClause {
        match self {
            AnyDesignUnit::Primary(AnyPrimaryUnit::Entity(unit)) => &mut unit.context_clause,
            AnyDesignUnit::Primary(AnyPrimaryUnit::Configuration(unit)) => {
                &mut unit.context_clause
            }
            AnyDesignUnit::Primary(AnyPrimaryUnit::Package(unit)) => &mut unit.context_clause,
            AnyDesignUnit::Primary(AnyPrimaryUnit::Context(unit)) => &mut unit.items,
            AnyDesignUnit::Secondary(AnySecondaryUnit::Architecture(unit)) => {
                &mut unit.context_clause
            }
            AnyDesignUnit::Secondary(AnySecondaryUnit::PackageBody(unit)) => {
                &mut unit.context_clause
            }
        }
    }

    /// Libraries named by library clauses
    pub fn library_references(&self) -> Vec<&WithRef<Identifier>> {
        self.context_clause()
            .iter()
            .filter_map(|item| match item {
                ContextItem::Library(clause) => Some(clause),
                _ => None,
            })
            .flat_map(|clause| clause.name_list.iter())
            .collect()
    }

    pub fn library_references_mut(&mut self) -> Vec<&mut WithRef<Identifier>> {
        self.context_clause_mut()
            .iter_mut()
            .filter_map(|item| match item {
                ContextItem::Library(clause) => Some(clause),
                _ => None,
            })
            .flat_map(|clause| clause.name_list.iter_mut())
            .collect()
    }

    /// Names of use clauses, both from the context clause and from the
    /// declarative part of the unit itself
    pub fn package_references(&self) -> Vec<&WithRef<Name>> {
        let (context, declared): (&ContextClause, Vec<&UseClause>) = match self {
            AnyDesignUnit::Primary(AnyPrimaryUnit::Entity(unit)) => {
                (&unit.context_clause, uses_in(&unit.decl).collect())
            }
            AnyDesignUnit::Primary(AnyPrimaryUnit::Configuration(unit)) => {
                (&unit.context_clause, unit.decl.iter().collect())
            }
            AnyDesignUnit::Primary(AnyPrimaryUnit::Package(unit)) => {
                (&unit.context_clause, uses_in(&unit.decl).collect())
            }
            AnyDesignUnit::Primary(AnyPrimaryUnit::Context(unit)) => (&unit.items, Vec::new()),
            AnyDesignUnit::Secondary(AnySecondaryUnit::Architecture(unit)) => {
                (&unit.context_clause, uses_in(&unit.decl).collect())
            }
            AnyDesignUnit::Secondary(AnySecondaryUnit::PackageBody(unit)) => {
                (&unit.context_clause, uses_in(&unit.decl).collect())
            }
        };

        context
            .iter()
            .filter_map(|item| match item {
                ContextItem::Use(clause) => Some(clause),
                _ => None,
            })
            .chain(declared)
            .flat_map(|clause| clause.name_list.iter())
            .collect()
    }

    pub fn package_references_mut(&mut self) -> Vec<&mut WithRef<Name>> {
        let (context, declared): (&mut ContextClause, Vec<&mut UseClause>) = match self {
            AnyDesignUnit::Primary(AnyPrimaryUnit::Entity(unit)) => {
                (&mut unit.context_clause, uses_in_mut(&mut unit.decl).collect())
            }
            AnyDesignUnit::Primary(AnyPrimaryUnit::Configuration(unit)) => {
                (&mut unit.context_clause, unit.decl.iter_mut().collect())
            }
            AnyDesignUnit::Primary(AnyPrimaryUnit::Package(unit)) => {
                (&mut unit.context_clause, uses_in_mut(&mut unit.decl).collect())
            }
            AnyDesignUnit::Primary(AnyPrimaryUnit::Context(unit)) => {
                (&mut unit.items, Vec::new())
            }
            AnyDesignUnit::Secondary(AnySecondaryUnit::Architecture(unit)) => {
                (&mut unit.context_clause, uses_in_mut(&mut unit.decl).collect())
            }
            AnyDesignUnit::Secondary(AnySecondaryUnit::PackageBody(unit)) => {
                (&mut unit.context_clause, uses_in_mut(&mut unit.decl).collect())
            }
        };

        context
            .iter_mut()
            .filter_map(|item| match item {
                ContextItem::Use(clause) => Some(clause),
                _ => None,
            })
            .chain(declared)
            .flat_map(|clause| clause.name_list.iter_mut())
            .collect()
    }

    /// Names of context references
    pub fn context_references(&self) -> Vec<&WithRef<Name>> {
        self.context_clause()
            .iter()
            .filter_map(|item| match item {
                ContextItem::Context(clause) => Some(clause),
                _ => None,
            })
            .flat_map(|clause| clause.name_list.iter())
            .collect()
    }

    pub fn context_references_mut(&mut self) -> Vec<&mut WithRef<Name>> {
        self.context_clause_mut()
            .iter_mut()
            .filter_map(|item| match item {
                ContextItem::Context(clause) => Some(clause),
                _ => None,
            })
            .flat_map(|clause| clause.name_list.iter_mut())
            .collect()
    }

    /// Forget everything the link pass resolved
    pub fn clear_references(&mut self) {
        for name in self.library_references_mut() {
            name.reference.clear();
        }
        for name in self.package_references_mut() {
            name.reference.clear();
        }
        for name in self.context_references_mut() {
            name.reference.clear();
        }
        if let Some(reference) = self.primary_reference_mut() {
            reference.clear();
        }
    }

    /// The concurrent statements of entities and architectures
    pub fn statements(&self) -> &[LabeledConcurrentStatement] {
        match self {
            AnyDesignUnit::Primary(AnyPrimaryUnit::Entity(unit)) => &unit.statements,
            AnyDesignUnit::Secondary(AnySecondaryUnit::Architecture(unit)) => &unit.statements,
            _ => &[],
        }
    }

    pub fn documentation(&self) -> Option<&str> {
        match self {
            AnyDesignUnit::Primary(AnyPrimaryUnit::Entity(unit)) => unit.documentation(),
            AnyDesignUnit::Primary(AnyPrimaryUnit::Configuration(unit)) => unit.documentation(),
            AnyDesignUnit::Primary(AnyPrimaryUnit::Package(unit)) => unit.documentation(),
            AnyDesignUnit::Primary(AnyPrimaryUnit::Context(unit)) => unit.documentation(),
            AnyDesignUnit::Secondary(AnySecondaryUnit::Architecture(unit)) => unit.documentation(),
            AnyDesignUnit::Secondary(AnySecondaryUnit::PackageBody(unit)) => unit.documentation(),
        }
    }
}

impl From<EntityDeclaration> for AnyDesignUnit {
    fn from(unit: EntityDeclaration) -> Self {
        AnyDesignUnit::Primary(AnyPrimaryUnit::Entity(unit))
    }
}

impl From<ConfigurationDeclaration> for AnyDesignUnit {
    fn from(unit: ConfigurationDeclaration) -> Self {
        AnyDesignUnit::Primary(AnyPrimaryUnit::Configuration(unit))
    }
}

impl From<PackageDeclaration> for AnyDesignUnit {
    fn from(unit: PackageDeclaration) -> Self {
        AnyDesignUnit::Primary(AnyPrimaryUnit::Package(unit))
    }
}

impl From<ContextDeclaration> for AnyDesignUnit {
    fn from(unit: ContextDeclaration) -> Self {
        AnyDesignUnit::Primary(AnyPrimaryUnit::Context(unit))
    }
}

impl From<ArchitectureBody> for AnyDesignUnit {
    fn from(unit: ArchitectureBody) -> Self {
        AnyDesignUnit::Secondary(AnySecondaryUnit::Architecture(unit))
    }
}

impl From<PackageBody> for AnyDesignUnit {
    fn from(unit: PackageBody) -> Self {
        AnyDesignUnit::Secondary(AnySecondaryUnit::PackageBody(unit))
    }
}
