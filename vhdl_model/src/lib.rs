// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2018, Olof Kraigher olof.kraigher@gmail.com
#![allow(clippy::upper_case_acronyms)]

pub mod analysis;
pub mod ast;
mod config;
mod data;
pub mod design;
mod standard;

pub use crate::config::{Config, LibraryConfig, CONFIG_ENV_VAR};
pub use crate::data::{
    Diagnostic, DiagnosticHandler, DiagnosticResult, ErrorCode, Identifier, Location, Message,
    MessageHandler, MessageLogger, MessageType, NullDiagnostics, NullMessages, Severity,
    SeverityMap, Subject,
};
pub use crate::standard::VHDLStandard;

pub use crate::analysis::{
    Analysis, CompileOrderGraph, DeclarationIndex, DeclarationKind, DependencyGraph, EdgeClass,
    EdgeKind, HierarchyGraph, TopLevel, VertexKind,
};
pub use crate::design::{
    Design, DesignUnit, Document, DocumentId, Library, LibraryId, UnitId, UnitKey,
};
