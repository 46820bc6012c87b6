// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2023, Olof Kraigher olof.kraigher@gmail.com

use fnv::FnvHashMap;
use strum::IntoStaticStr;

use crate::ast::*;
use crate::design::{Design, UnitId};
use crate::Identifier;

#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum DeclarationKind {
    Type,
    Subtype,
    Function,
    Procedure,
    Constant,
    Signal,
    Variable,
    SharedVariable,
    File,
    Component,
    Alias,
    Attribute,
    PackageInstance,
}

/// A named declaration and its position in the declarative part
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct DeclaredItem {
    pub kind: DeclarationKind,
    pub position: usize,
}

/// The names declared in one declarative region and the labeled statements
/// that open a nested region.
///
/// Names are normalized. Overloaded subprograms and a protected type with
/// its body share one name, in declaration order. Generate statements get
/// one index per alternative. A label used twice in the same region keeps
/// its first statement.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct DeclarationIndex {
    declarations: FnvHashMap<String, Vec<DeclaredItem>>,
    instances: FnvHashMap<String, usize>,
    generates: FnvHashMap<String, Vec<DeclarationIndex>>,
    blocks: FnvHashMap<String, DeclarationIndex>,
}

impl DeclarationIndex {
    pub fn new(
        declarations: &[Declaration],
        statements: &[LabeledConcurrentStatement],
    ) -> DeclarationIndex {
        let mut index = DeclarationIndex::default();
        index.add_declarations(declarations);
        index.add_statements(statements);
        index
    }

    fn of_generate_body(body: &GenerateBody) -> DeclarationIndex {
        DeclarationIndex::new(body.decl.as_deref().unwrap_or_default(), &body.statements)
    }

    fn add_declarations(&mut self, declarations: &[Declaration]) {
        for (position, decl) in declarations.iter().enumerate() {
            for (name, kind) in declared_names(decl) {
                self.declarations
                    .entry(name)
                    .or_default()
                    .push(DeclaredItem { kind, position });
            }
        }
    }

    fn add_statements(&mut self, statements: &[LabeledConcurrentStatement]) {
        for (position, stmt) in statements.iter().enumerate() {
            if !stmt.statement.requires_label() {
                continue;
            }
            let Some(label) = stmt.label.as_ref() else {
                continue;
            };
            let label = label.normalized();
            if self.has_label(label) {
                log::debug!("Label '{label}' is used more than once in the same region");
                continue;
            }

            match &stmt.statement {
                ConcurrentStatement::Instance(..) => {
                    self.instances.insert(label.to_owned(), position);
                }
                ConcurrentStatement::Block(block) => {
                    self.blocks.insert(
                        label.to_owned(),
                        DeclarationIndex::new(&block.decl, &block.statements),
                    );
                }
                ConcurrentStatement::ForGenerate(generate) => {
                    self.generates.insert(
                        label.to_owned(),
                        vec![DeclarationIndex::of_generate_body(&generate.body)],
                    );
                }
                ConcurrentStatement::IfGenerate(generate) => {
                    let alternatives = generate
                        .conds
                        .conditionals
                        .iter()
                        .map(|cond| &cond.item)
                        .chain(generate.conds.else_item.iter())
                        .map(DeclarationIndex::of_generate_body)
                        .collect();
                    self.generates.insert(label.to_owned(), alternatives);
                }
                ConcurrentStatement::CaseGenerate(generate) => {
                    let alternatives = generate
                        .sels
                        .alternatives
                        .iter()
                        .map(|alternative| DeclarationIndex::of_generate_body(&alternative.item))
                        .collect();
                    self.generates.insert(label.to_owned(), alternatives);
                }
                ConcurrentStatement::ProcedureCall(..)
                | ConcurrentStatement::Process(..)
                | ConcurrentStatement::Assert(..)
                | ConcurrentStatement::Assignment(..) => {}
            }
        }
    }

    fn has_label(&self, label: &str) -> bool {
        self.instances.contains_key(label)
            || self.generates.contains_key(label)
            || self.blocks.contains_key(label)
    }

    /// All declarations of a normalized name, empty when it is not declared
    pub fn lookup(&self, name: &str) -> &[DeclaredItem] {
        self.declarations
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    /// Sorted names with at least one declaration of the kind
    pub fn names_of(&self, kind: DeclarationKind) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .declarations
            .iter()
            .filter(|(_, items)| items.iter().any(|item| item.kind == kind))
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn num_names(&self) -> usize {
        self.declarations.len()
    }

    /// Position of an instantiation statement in the statement part
    pub fn instance(&self, label: &str) -> Option<usize> {
        self.instances.get(label).copied()
    }

    pub fn instance_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.instances.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    /// The region of each alternative of a generate statement
    pub fn generate(&self, label: &str) -> Option<&[DeclarationIndex]> {
        self.generates.get(label).map(Vec::as_slice)
    }

    pub fn block(&self, label: &str) -> Option<&DeclarationIndex> {
        self.blocks.get(label)
    }
}

fn designator_name(designator: &SubprogramDesignator) -> String {
    match designator {
        SubprogramDesignator::Identifier(ident) => ident.normalized().to_owned(),
        SubprogramDesignator::OperatorSymbol(op) => format!("\"{op}\""),
    }
}

fn subprogram_name(specification: &SubprogramSpecification) -> (String, DeclarationKind) {
    match specification {
        SubprogramSpecification::Function(function) => (
            designator_name(&function.designator),
            DeclarationKind::Function,
        ),
        SubprogramSpecification::Procedure(procedure) => (
            designator_name(&procedure.designator),
            DeclarationKind::Procedure,
        ),
    }
}

fn declared_names(decl: &Declaration) -> Vec<(String, DeclarationKind)> {
    let named =
        |ident: &Identifier, kind: DeclarationKind| vec![(ident.normalized().to_owned(), kind)];

    match decl {
        Declaration::Object(object) => {
            let kind = match object.class {
                ObjectClass::Constant => DeclarationKind::Constant,
                ObjectClass::Signal => DeclarationKind::Signal,
                ObjectClass::Variable if object.shared => DeclarationKind::SharedVariable,
                ObjectClass::Variable => DeclarationKind::Variable,
                ObjectClass::File => DeclarationKind::File,
            };
            object
                .idents
                .iter()
                .map(|ident| (ident.normalized().to_owned(), kind))
                .collect()
        }
        Declaration::Type(typ) => match typ.def {
            TypeDefinition::Subtype(..) => named(&typ.ident, DeclarationKind::Subtype),
            _ => named(&typ.ident, DeclarationKind::Type),
        },
        Declaration::Component(component) => named(&component.ident, DeclarationKind::Component),
        Declaration::Alias(alias) => named(&alias.designator, DeclarationKind::Alias),
        Declaration::Attribute(Attribute::Declaration(attr)) => {
            named(&attr.ident, DeclarationKind::Attribute)
        }
        Declaration::SubprogramDeclaration(subprogram) => {
            vec![subprogram_name(&subprogram.specification)]
        }
        Declaration::SubprogramBody(subprogram) => vec![subprogram_name(&subprogram.specification)],
        Declaration::Package(instance) => named(&instance.ident, DeclarationKind::PackageInstance),
        Declaration::Attribute(Attribute::Specification(..))
        | Declaration::Use(..)
        | Declaration::Configuration(..) => Vec::new(),
    }
}

/// Index the declarative region of every entity, architecture, package
/// and package body
pub(super) fn index_units(design: &Design) -> FnvHashMap<UnitId, DeclarationIndex> {
    let mut indexes = FnvHashMap::default();
    for unit in design.units(UnitKindSet::ALL) {
        let index = match unit.unit() {
            AnyDesignUnit::Primary(AnyPrimaryUnit::Entity(entity)) => {
                DeclarationIndex::new(&entity.decl, &entity.statements)
            }
            AnyDesignUnit::Primary(AnyPrimaryUnit::Package(package)) => {
                DeclarationIndex::new(&package.decl, &[])
            }
            AnyDesignUnit::Secondary(AnySecondaryUnit::Architecture(arch)) => {
                DeclarationIndex::new(&arch.decl, &arch.statements)
            }
            AnyDesignUnit::Secondary(AnySecondaryUnit::PackageBody(body)) => {
                DeclarationIndex::new(&body.decl, &[])
            }
            AnyDesignUnit::Primary(AnyPrimaryUnit::Configuration(..))
            | AnyDesignUnit::Primary(AnyPrimaryUnit::Context(..)) => continue,
        };
        indexes.insert(unit.id(), index);
    }
    log::debug!("Indexed the declarative regions of {} units", indexes.len());
    indexes
}
