// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2018, Olof Kraigher olof.kraigher@gmail.com

//! The root of the language model: libraries and documents

mod document;
mod library;
mod predefined;

pub use document::Document;
pub use library::{Library, UnitKey};

use fnv::{FnvHashMap, FnvHashSet};

use crate::analysis::Analysis;
use crate::ast::*;
use crate::config::Config;
use crate::data::*;
use crate::standard::VHDLStandard;

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct LibraryId(usize);

impl LibraryId {
    pub(crate) fn new(index: usize) -> LibraryId {
        LibraryId(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct DocumentId(usize);

impl DocumentId {
    pub(crate) fn new(index: usize) -> DocumentId {
        DocumentId(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// A design unit is identified by the document declaring it and its
/// position within that document
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct UnitId {
    document: DocumentId,
    index: usize,
}

impl UnitId {
    pub(crate) fn new(document: DocumentId, index: usize) -> UnitId {
        UnitId { document, index }
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// A registered design unit together with the library and document it belongs to
#[derive(Clone, Copy)]
pub struct DesignUnit<'a> {
    id: UnitId,
    library: &'a Library,
    document: &'a Document,
    unit: &'a AnyDesignUnit,
}

impl<'a> DesignUnit<'a> {
    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn library(&self) -> &'a Library {
        self.library
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn unit(&self) -> &'a AnyDesignUnit {
        self.unit
    }

    pub fn kind(&self) -> AnyKind {
        self.unit.kind()
    }

    pub fn name(&self) -> &'a str {
        self.unit.name()
    }

    /// The unique key of the unit such as `lib.ent(rtl)`, using normalized names
    pub fn key(&self) -> String {
        let library = self.library.ident().normalized();
        let name = self.unit.ident().normalized();
        match self.unit {
            AnyDesignUnit::Primary(_) => format!("{library}.{name}"),
            AnyDesignUnit::Secondary(AnySecondaryUnit::Architecture(arch)) => format!(
                "{library}.{}({name})",
                arch.entity_name.item.normalized()
            ),
            AnyDesignUnit::Secondary(AnySecondaryUnit::PackageBody(_)) => {
                format!("{library}.{name}(body)")
            }
        }
    }

    pub fn location(&self) -> Location {
        Location::new(Subject::Unit(self.id), self.key())
    }
}

/// The root of the model.
///
/// A design is built by creating libraries and adding documents to them.
/// [`Design::analyze`] then links all references and derives the dependency,
/// hierarchy and compile order graphs. Any modification through a `&mut`
/// method drops the previous analysis.
#[derive(Clone)]
pub struct Design {
    config: Config,
    libraries: Vec<Library>,
    // normalized library name => library
    library_names: FnvHashMap<String, LibraryId>,
    documents: Vec<Document>,
    analysis: Option<Analysis>,
}

impl Default for Design {
    fn default() -> Self {
        Design::new()
    }
}

impl Design {
    pub fn new() -> Design {
        Design::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Design {
        Design {
            config,
            libraries: Vec::new(),
            library_names: FnvHashMap::default(),
            documents: Vec::new(),
            analysis: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn standard(&self) -> VHDLStandard {
        self.config.standard()
    }

    pub fn set_config(&mut self, config: Config) {
        self.invalidate();
        self.config = config;
    }

    fn invalidate(&mut self) {
        if self.analysis.take().is_some() {
            log::debug!("Design modified, dropping previous analysis");
        }
    }

    pub fn create_library(&mut self, name: impl AsRef<str>) -> DiagnosticResult<LibraryId> {
        let ident = Identifier::new(name)?;
        if ident.normalized() == "work" {
            return Err(Diagnostic::error(
                Location::detached(ident.name()),
                "The 'work' library is not a valid library, 'work' always refers to the library of the design unit itself",
                ErrorCode::InvalidIdentifier,
            ));
        }

        if let Some(existing) = self.library_names.get(ident.normalized()) {
            let existing = &self.libraries[existing.index()];
            return Err(Diagnostic::error(
                Location::new(Subject::Library(existing.id()), existing.name()),
                format!("Library '{}' has already been created", ident.name()),
                ErrorCode::DuplicateLibrary,
            ));
        }

        self.invalidate();
        let id = LibraryId::new(self.libraries.len());
        log::trace!("Creating library '{}'", ident.name());
        self.library_names
            .insert(ident.normalized().to_owned(), id);
        self.libraries.push(Library::new(id, ident));
        Ok(id)
    }

    pub fn get_or_create_library(&mut self, name: impl AsRef<str>) -> DiagnosticResult<LibraryId> {
        match self.library_id(name.as_ref()) {
            Some(id) => Ok(id),
            None => self.create_library(name),
        }
    }

    pub fn library_id(&self, name: &str) -> Option<LibraryId> {
        let ident = Identifier::new(name).ok()?;
        self.library_names.get(ident.normalized()).copied()
    }

    pub(crate) fn find_library(&self, ident: &Identifier) -> Option<LibraryId> {
        self.library_names.get(ident.normalized()).copied()
    }

    pub fn library(&self, id: LibraryId) -> Option<&Library> {
        self.libraries.get(id.index())
    }

    pub fn get_library(&self, name: &str) -> Option<&Library> {
        self.library_id(name).and_then(|id| self.library(id))
    }

    /// Libraries in the order they were created
    pub fn libraries(&self) -> impl Iterator<Item = &Library> {
        self.libraries.iter()
    }

    pub fn num_libraries(&self) -> usize {
        self.libraries.len()
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(id.index())
    }

    /// Documents in the order they were added
    pub fn documents(&self) -> impl Iterator<Item = (DocumentId, &Document)> {
        self.documents
            .iter()
            .enumerate()
            .map(|(index, doc)| (DocumentId::new(index), doc))
    }

    pub fn num_documents(&self) -> usize {
        self.documents.len()
    }

    pub fn document_location(&self, id: DocumentId) -> Location {
        let name = self
            .document(id)
            .map(|doc| doc.display_name(id.index()))
            .unwrap_or_default();
        Location::new(Subject::Document(id), name)
    }

    /// Register a document and all its design units in a library.
    ///
    /// Nothing is registered if any unit collides with an existing unit of the
    /// library or with another unit of the same document.
    pub fn add_document(
        &mut self,
        mut document: Document,
        library: LibraryId,
    ) -> DiagnosticResult<DocumentId> {
        let lib = self.libraries.get(library.index()).ok_or_else(|| {
            Diagnostic::error(
                Location::detached(format!("library #{}", library.index())),
                "Unknown library",
                ErrorCode::UnknownLibrary,
            )
        })?;

        if let Some(path) = document.path() {
            if let Some((id, _)) = self.documents().find(|(_, doc)| doc.path() == Some(path)) {
                return Err(Diagnostic::error(
                    self.document_location(id),
                    format!(
                        "Document '{}' has already been added",
                        path.to_string_lossy()
                    ),
                    ErrorCode::DuplicateDocument,
                ));
            }
        }

        let mut keys = Vec::with_capacity(document.units.len());
        let mut seen = FnvHashSet::default();
        for unit in document.units.iter() {
            let key = lib.check_vacant(unit)?;
            if !seen.insert(key.clone()) {
                return Err(Diagnostic::duplicate_unit(
                    Location::new(Subject::Library(library), lib.name()),
                    format!(
                        "Design unit '{}' is declared twice in the same document",
                        unit.name()
                    ),
                ));
            }
            keys.push((key, unit.kind()));
        }

        self.invalidate();
        let id = DocumentId::new(self.documents.len());
        let lib = &mut self.libraries[library.index()];
        for (index, (key, kind)) in keys.into_iter().enumerate() {
            lib.insert(key, kind, UnitId::new(id, index));
        }

        log::trace!(
            "Added document '{}' with {} units to library '{}'",
            document.display_name(id.index()),
            document.units.len(),
            lib.name()
        );
        document.library = Some(library);
        self.documents.push(document);
        Ok(id)
    }

    /// Append a design unit to an already registered document
    pub fn add_unit(
        &mut self,
        document: DocumentId,
        unit: impl Into<AnyDesignUnit>,
    ) -> DiagnosticResult<UnitId> {
        let unit = unit.into();
        let (library, index) = match self.documents.get(document.index()) {
            Some(Document {
                library: Some(library),
                units,
                ..
            }) => (*library, units.len()),
            _ => {
                return Err(Diagnostic::internal(
                    Location::detached(unit.name()),
                    format!("Document #{} is not registered", document.index()),
                ))
            }
        };

        let lib = &mut self.libraries[library.index()];
        let key = lib.check_vacant(&unit)?;
        let id = UnitId::new(document, index);
        lib.insert(key, unit.kind(), id);

        self.invalidate();
        self.documents[document.index()].units.push(unit);
        Ok(id)
    }

    /// Modify a registered design unit in place.
    ///
    /// The unit may be renamed as long as the new name does not collide with
    /// another unit. Changing the kind of a unit is not allowed. On error the
    /// unit is left unchanged.
    pub fn modify_unit(
        &mut self,
        id: UnitId,
        modify: impl FnOnce(&mut AnyDesignUnit),
    ) -> DiagnosticResult<()> {
        let Some((library, unit)) = self.documents.get_mut(id.document().index()).and_then(
            |doc| Some((doc.library?, doc.units.get_mut(id.index())?)),
        ) else {
            return Err(Diagnostic::internal(
                Location::design(),
                format!("Unknown design unit {id:?}"),
            ));
        };

        let backup = unit.clone();
        let old_key = UnitKey::of(unit);
        modify(unit);
        let new_key = UnitKey::of(unit);

        if unit.kind() != backup.kind() {
            *unit = backup;
            return Err(Diagnostic::internal(
                Location::new(Subject::Unit(id), unit.name()),
                "The kind of a registered design unit cannot change",
            ));
        }

        let lib = &mut self.libraries[library.index()];
        if new_key != old_key {
            if let Err(err) = lib.check_vacant(unit) {
                *unit = backup;
                return Err(err);
            }
            lib.rekey(&old_key, new_key, id);
        }

        self.invalidate();
        Ok(())
    }

    pub fn unit(&self, id: UnitId) -> Option<&AnyDesignUnit> {
        self.document(id.document())?.units.get(id.index())
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut AnyDesignUnit> {
        self.documents
            .get_mut(id.document().index())?
            .units
            .get_mut(id.index())
    }

    pub fn design_unit(&self, id: UnitId) -> Option<DesignUnit<'_>> {
        let document = self.document(id.document())?;
        let library = self.library(document.library?)?;
        Some(DesignUnit {
            id,
            library,
            document,
            unit: document.units.get(id.index())?,
        })
    }

    /// All units of the given kinds in document load order
    pub fn units(&self, filter: UnitKindSet) -> impl Iterator<Item = DesignUnit<'_>> {
        self.documents().flat_map(move |(doc_id, document)| {
            let library = document.library.and_then(|id| self.library(id));
            document
                .units
                .iter()
                .enumerate()
                .filter(move |(_, unit)| filter.contains(unit.kind()))
                .filter_map(move |(index, unit)| {
                    Some(DesignUnit {
                        id: UnitId::new(doc_id, index),
                        library: library?,
                        document,
                        unit,
                    })
                })
        })
    }

    pub fn num_units(&self) -> usize {
        self.libraries.iter().map(|lib| lib.num_units()).sum()
    }

    /// Find a primary unit by library and unit name
    pub fn find_primary_unit(&self, library: &str, name: &str) -> Option<DesignUnit<'_>> {
        let id = self.get_library(library)?.primary_unit(name)?;
        self.design_unit(id)
    }

    pub fn find_architecture(
        &self,
        library: &str,
        entity_name: &str,
        name: &str,
    ) -> Option<DesignUnit<'_>> {
        let id = self
            .get_library(library)?
            .architecture(entity_name, name)?;
        self.design_unit(id)
    }

    pub fn location_of(&self, id: UnitId) -> Location {
        match self.design_unit(id) {
            Some(unit) => unit.location(),
            None => Location::new(Subject::Unit(id), format!("{id:?}")),
        }
    }

    pub fn library_location(&self, id: LibraryId) -> Location {
        let name = self
            .library(id)
            .map(|lib| lib.ident().normalized().to_owned())
            .unwrap_or_default();
        Location::new(Subject::Library(id), name)
    }

    /// The result of the last [`Design::analyze`], unless the design was modified since
    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    pub fn is_analyzed(&self) -> bool {
        self.analysis.is_some()
    }

    pub(crate) fn set_analysis(&mut self, analysis: Analysis) {
        self.analysis = Some(analysis);
    }

    pub(crate) fn take_analysis(&mut self) -> Option<Analysis> {
        self.analysis.take()
    }
}
