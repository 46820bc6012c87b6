// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2018, Olof Kraigher olof.kraigher@gmail.com

use std::path::{Path, PathBuf};

use super::LibraryId;
use crate::ast::*;

/// The design units of one source file, in the order they were written.
///
/// A document without a path is virtual, such as the predefined libraries
/// or units assembled from snippets.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Document {
    path: Option<PathBuf>,
    pub(super) library: Option<LibraryId>,
    pub(super) units: Vec<AnyDesignUnit>,
    documentation: Option<String>,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>) -> Document {
        Document {
            path: Some(path.into()),
            ..Document::default()
        }
    }

    pub fn new_virtual() -> Document {
        Document::default()
    }

    pub fn with_unit(mut self, unit: impl Into<AnyDesignUnit>) -> Document {
        self.units.push(unit.into());
        self
    }

    pub fn add_unit(&mut self, unit: impl Into<AnyDesignUnit>) {
        self.units.push(unit.into());
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Document {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_virtual(&self) -> bool {
        self.path.is_none()
    }

    /// The library the document was compiled into, once registered
    pub fn library(&self) -> Option<LibraryId> {
        self.library
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    pub fn units(&self) -> &[AnyDesignUnit] {
        &self.units
    }

    pub fn units_of(&self, filter: UnitKindSet) -> impl Iterator<Item = &AnyDesignUnit> {
        self.units
            .iter()
            .filter(move |unit| filter.contains(unit.kind()))
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityDeclaration> {
        self.units.iter().filter_map(|unit| unit.as_entity())
    }

    pub fn architectures(&self) -> impl Iterator<Item = &ArchitectureBody> {
        self.units.iter().filter_map(|unit| unit.as_architecture())
    }

    pub fn packages(&self) -> impl Iterator<Item = &PackageDeclaration> {
        self.units.iter().filter_map(|unit| unit.as_package())
    }

    pub fn package_bodies(&self) -> impl Iterator<Item = &PackageBody> {
        self.units.iter().filter_map(|unit| unit.as_package_body())
    }

    pub fn contexts(&self) -> impl Iterator<Item = &ContextDeclaration> {
        self.units.iter().filter_map(|unit| unit.as_context())
    }

    pub fn configurations(&self) -> impl Iterator<Item = &ConfigurationDeclaration> {
        self.units.iter().filter_map(|unit| unit.as_configuration())
    }

    /// Display name used in diagnostics and compile order vertex keys
    pub(crate) fn display_name(&self, index: usize) -> String {
        match self.path {
            Some(ref path) => path.to_string_lossy().into_owned(),
            None => format!("<virtual {index}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn units_by_kind() {
        let doc = Document::new("ent.vhd")
            .with_unit(EntityDeclaration::new("ent").unwrap())
            .with_unit(ArchitectureBody::new("rtl", "ent").unwrap())
            .with_unit(PackageDeclaration::new("pkg").unwrap());

        assert_eq!(doc.entities().count(), 1);
        assert_eq!(doc.architectures().count(), 1);
        assert_eq!(doc.packages().count(), 1);
        assert_eq!(doc.package_bodies().count(), 0);
        assert_eq!(doc.units_of(UnitKindSet::PRIMARY).count(), 2);
        assert_eq!(doc.path(), Some(Path::new("ent.vhd")));
        assert!(!doc.is_virtual());
        assert_eq!(doc.library(), None);
    }

    #[test]
    fn virtual_document_name() {
        let doc = Document::new_virtual();
        assert!(doc.is_virtual());
        assert_eq!(doc.display_name(3), "<virtual 3>");
        assert_eq!(Document::new("a/b.vhd").display_name(0), "a/b.vhd");
    }
}
