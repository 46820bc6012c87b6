// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2018, Olof Kraigher olof.kraigher@gmail.com

use crate::data::{Diagnostic, Location, Severity};
use enum_map::{Enum, EnumMap};
use std::ops::{Index, IndexMut};
use strum::{EnumIter, EnumString, IntoStaticStr};

#[derive(
    PartialEq, Debug, Clone, Copy, Eq, Hash, EnumString, IntoStaticStr, EnumIter, Enum,
)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCode {
    // Construction
    /// A name does not follow the lexical rules of a VHDL identifier.
    ///
    /// # Example
    /// ```vhdl
    /// entity 1foo is
    ///        ~~~~ Invalid identifier '1foo': must start with a letter
    /// end entity;
    /// ```
    InvalidIdentifier,
    /// A design unit with the same name already exists in the scope it is registered in.
    ///
    /// # Example
    /// ```vhdl
    /// entity foo is
    /// end entity;
    ///
    /// package foo is
    ///         ~~~ A primary unit named 'foo' already exists in library 'lib'
    /// end package;
    /// ```
    DuplicateUnit,
    /// A library with the same name already exists in the design
    DuplicateLibrary,
    /// A document with the same path was already added to the design
    DuplicateDocument,
    /// A library handle or library name does not belong to the design
    UnknownLibrary,
    /// An interface item combines an object class with an interface role
    /// that VHDL does not allow.
    ///
    /// # Example
    /// ```vhdl
    /// entity foo is
    ///     port (
    ///         variable bar : natural
    ///         ~~~~~~~~ A port must be a signal
    ///     );
    /// end entity;
    /// ```
    InvalidInterfaceItem,

    // Linking
    /// A library, package or context named in a context clause does not exist.
    ///
    /// # Example
    /// ```vhdl
    /// library missing;
    ///         ~~~~~~~ No such library 'missing'
    /// use work.missing_pkg.all;
    ///          ~~~~~~~~~~~ No package or context 'missing_pkg' in library 'lib'
    /// ```
    UnresolvedReference,
    /// A package body without a package of the same name in the same library.
    ///
    /// # Example
    /// ```vhdl
    /// package body foo is
    ///              ~~~ No package 'foo' in library 'lib'
    /// end package body;
    /// ```
    UnresolvedPackageBody,
    /// An architecture of an entity that does not exist in the same library.
    ///
    /// # Example
    /// ```vhdl
    /// entity foo is
    /// end entity foo;
    ///
    /// architecture baz of bar is
    /// begin               ~~~ No entity 'bar' in library 'lib'
    /// end architecture;
    /// ```
    UnresolvedArchitecture,
    /// An instantiated unit that cannot be bound to any entity.
    ///
    /// # Example
    /// ```vhdl
    /// architecture rtl of top is
    ///     component missing is
    ///     end component;
    /// begin
    ///     inst: missing;
    ///           ~~~~~~~ Component 'missing' is not bound to any entity
    /// end architecture;
    /// ```
    UnboundComponent,
    /// No architecture was found for an entity while instantiating that entity.
    ///
    /// # Example
    /// ```vhdl
    /// entity foo is
    /// end foo;
    ///
    /// architecture bar of foo is
    /// begin
    /// end bar;
    ///
    /// -- In some other architecture
    /// foo_inst: entity work.foo(baz)
    ///                           ~~~ No architecture 'baz' for entity 'foo'
    /// ```
    NoArchForEnt,
    /// A circular dependency was found where one unit depends on another unit which
    /// (directly or indirectly) again depends on the first unit.
    ///
    /// # Example
    /// ```vhdl
    /// use work.bar;
    ///
    /// package foo is
    /// end package;
    ///
    /// use work.foo;
    ///
    /// package bar is
    /// end package;
    /// ```
    CircularDependency,
    /// A construct that the selected VHDL standard does not support.
    ///
    /// # Example
    /// ```vhdl
    /// -- With standard = "1993"
    /// context foo is
    /// ~~~~~~~ Context declarations require VHDL-2008 or later
    /// end context;
    /// ```
    UnsupportedStandard,

    // Topology
    /// Every entity and architecture of the design is instantiated by another one,
    /// so no top level could be found
    NoTopLevel,
    /// More than one entity or architecture is never instantiated
    AmbiguousTopLevel,
    /// Documents depend on each other so that no compile order exists
    CircularCompileDependency,

    /// An internal error that signifies that some precondition within vhdl_model wasn't met.
    Internal,
    /// A related error message. This error code is never generated directly and only used
    /// as 'drop-in' when related messages are drained from a bigger error message
    Related,
}

impl ErrorCode {
    pub fn default_severity(&self) -> Severity {
        use ErrorCode::*;
        match self {
            UnboundComponent | NoTopLevel | AmbiguousTopLevel => Severity::Warning,
            Related => Severity::Hint,
            _ => Severity::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The severity each error code is shown with, `None` disables the code
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct SeverityMap {
    inner: EnumMap<ErrorCode, Option<Severity>>,
}

impl Default for SeverityMap {
    fn default() -> Self {
        SeverityMap {
            inner: EnumMap::from_fn(|code: ErrorCode| Some(code.default_severity())),
        }
    }
}

impl Index<ErrorCode> for SeverityMap {
    type Output = Option<Severity>;

    fn index(&self, key: ErrorCode) -> &Self::Output {
        &self.inner[key]
    }
}

impl IndexMut<ErrorCode> for SeverityMap {
    fn index_mut(&mut self, key: ErrorCode) -> &mut Self::Output {
        &mut self.inner[key]
    }
}

/// Specialized diagnostics with pre-defined messages and error codes
impl Diagnostic {
    pub fn circular_dependency(item: impl AsRef<Location>) -> Diagnostic {
        Self::new(
            item,
            "Found circular dependency",
            Severity::Error,
            ErrorCode::CircularDependency,
        )
    }

    pub fn duplicate_unit(item: impl AsRef<Location>, msg: impl Into<String>) -> Diagnostic {
        Self::new(item, msg, Severity::Error, ErrorCode::DuplicateUnit)
    }

    pub fn unresolved_reference(item: impl AsRef<Location>, msg: impl Into<String>) -> Diagnostic {
        Self::new(item, msg, Severity::Error, ErrorCode::UnresolvedReference)
    }

    pub fn internal(item: impl AsRef<Location>, msg: impl Into<String>) -> Diagnostic {
        Self::new(item, msg, Severity::Error, ErrorCode::Internal)
    }
}
