// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2018, Olof Kraigher olof.kraigher@gmail.com

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::analysis::Analysis;
use crate::ast::*;
use crate::config::Config;
use crate::data::*;
use crate::design::*;
use crate::standard::VHDLStandard;

/// Builds a design from units grouped into documents, the default library
/// being `libname`
pub struct DesignBuilder {
    design: Design,
}

impl DesignBuilder {
    pub fn new() -> DesignBuilder {
        Self::with_standard(VHDLStandard::default())
    }

    pub fn with_standard(standard: VHDLStandard) -> DesignBuilder {
        let mut design = Design::with_config(Config::default().with_standard(standard));
        design.create_library("libname").unwrap();
        DesignBuilder { design }
    }

    pub fn library(&mut self, name: &str) -> LibraryId {
        self.design.get_or_create_library(name).unwrap()
    }

    /// Add a document with the given units to `libname`
    pub fn code(&mut self, path: &str, units: Vec<AnyDesignUnit>) -> DocumentId {
        self.code_in("libname", path, units)
    }

    pub fn code_in(&mut self, library: &str, path: &str, units: Vec<AnyDesignUnit>) -> DocumentId {
        let library = self.library(library);
        let mut document = Document::new(path);
        for unit in units {
            document.add_unit(unit);
        }
        self.design.add_document(document, library).unwrap()
    }

    pub fn analyze(&mut self) -> Vec<Diagnostic> {
        self.design.analyze()
    }

    pub fn analysis(&self) -> &Analysis {
        self.design.analysis().expect("design is analyzed")
    }

    pub fn design(&self) -> &Design {
        &self.design
    }

    pub fn design_mut(&mut self) -> &mut Design {
        &mut self.design
    }

    /// The unit with a key such as `libname.ent(rtl)`
    pub fn unit(&self, key: &str) -> UnitId {
        self.design
            .units(UnitKindSet::ALL)
            .find(|unit| unit.key() == key)
            .map(|unit| unit.id())
            .unwrap_or_else(|| panic!("No unit with key {key}"))
    }

    pub fn location(&self, key: &str) -> Location {
        self.design.location_of(self.unit(key))
    }

    pub fn document_location(&self, id: DocumentId) -> Location {
        self.design.document_location(id)
    }
}

pub fn entity(name: &str) -> EntityDeclaration {
    EntityDeclaration::new(name).unwrap()
}

pub fn architecture(name: &str, entity_name: &str) -> ArchitectureBody {
    ArchitectureBody::new(name, entity_name).unwrap()
}

pub fn package(name: &str) -> PackageDeclaration {
    PackageDeclaration::new(name).unwrap()
}

pub fn package_body(name: &str) -> PackageBody {
    PackageBody::new(name).unwrap()
}

pub fn context(name: &str, items: ContextClause) -> ContextDeclaration {
    ContextDeclaration::new(name).unwrap().with_items(items)
}

/// `configuration name of entity_name is for architecture end for; end;`
pub fn configuration(name: &str, entity_name: &str, architecture: Option<&str>) -> ConfigurationDeclaration {
    let config = ConfigurationDeclaration::new(name, entity_name).unwrap();
    match architecture {
        Some(architecture) => {
            config.with_block_config(BlockConfiguration::new(architecture).unwrap())
        }
        None => config,
    }
}

pub fn library_clause(names: &[&str]) -> ContextItem {
    ContextItem::library(names).unwrap()
}

pub fn use_clause(name: &str) -> ContextItem {
    ContextItem::use_clause(&[name]).unwrap()
}

pub fn context_reference(name: &str) -> ContextItem {
    ContextItem::context(&[name]).unwrap()
}

pub fn entity_instance(label: &str, name: &str, architecture: Option<&str>) -> LabeledConcurrentStatement {
    LabeledConcurrentStatement::instance(label, InstantiatedUnit::entity(name, architecture).unwrap())
        .unwrap()
}

pub fn component_instance(label: &str, name: &str) -> LabeledConcurrentStatement {
    LabeledConcurrentStatement::instance(label, InstantiatedUnit::component(name).unwrap()).unwrap()
}

pub fn configuration_instance(label: &str, name: &str) -> LabeledConcurrentStatement {
    LabeledConcurrentStatement::instance(label, InstantiatedUnit::configuration(name).unwrap())
        .unwrap()
}

/// An architecture of `entity_name` instantiating the given statements
pub fn structural(name: &str, entity_name: &str, statements: Vec<LabeledConcurrentStatement>) -> ArchitectureBody {
    statements
        .into_iter()
        .fold(architecture(name, entity_name), |arch, stmt| arch.with_statement(stmt))
}

pub fn check_no_diagnostics(diagnostics: &[Diagnostic]) {
    for err in diagnostics.iter() {
        println!("{}", err.show_default());
    }
    if !diagnostics.is_empty() {
        panic!("Found errors");
    }
}

/// Create map from diagnostic -> count
fn diagnostics_to_map(diagnostics: Vec<Diagnostic>) -> HashMap<Diagnostic, usize> {
    let mut map = HashMap::new();
    for diagnostic in diagnostics {
        match map.entry(diagnostic) {
            Entry::Occupied(mut entry) => {
                let count = *entry.get() + 1;
                entry.insert(count);
            }
            Entry::Vacant(entry) => {
                entry.insert(1);
            }
        }
    }
    map
}

/// Check diagnostics are equal without considering order
pub fn check_diagnostics(got: Vec<Diagnostic>, expected: Vec<Diagnostic>) {
    let mut expected = diagnostics_to_map(expected);
    let mut got = diagnostics_to_map(got);

    let mut found_errors = false;

    for (diagnostic, count) in expected.drain() {
        match got.remove(&diagnostic) {
            Some(got_count) => {
                if count != got_count {
                    found_errors = true;
                    println!("Got right diagnostic but wrong count {got_count}, expected {count}");
                    println!("{:?}", diagnostic);
                }
            }
            None => {
                found_errors = true;
                println!("Got no diagnostic, expected {count}");
                println!("{:?}", diagnostic);
            }
        }
    }

    for (diagnostic, count) in got.drain() {
        found_errors = true;
        println!("Got unexpected diagnostic {count} times");
        println!("{:?}", diagnostic);
    }

    if found_errors {
        panic!("Found errors");
    }
}

/// The error codes of the diagnostics, sorted
pub fn codes(diagnostics: &[Diagnostic]) -> Vec<ErrorCode> {
    let mut codes: Vec<ErrorCode> = diagnostics.iter().map(|diag| diag.code).collect();
    codes.sort_by_key(|code| code.as_str());
    codes
}
