// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2018, Olof Kraigher olof.kraigher@gmail.com

use crate::data::error_codes::{ErrorCode, SeverityMap};
use crate::design::{DocumentId, LibraryId, UnitId};
use std::convert::{AsRef, Into};
use strum::{EnumString, IntoStaticStr};

#[derive(PartialEq, Debug, Clone, Copy, Eq, Hash, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    Hint,
    Info,
    Warning,
    Error,
}

/// The model item a diagnostic is about
#[derive(PartialEq, Debug, Clone, Copy, Eq, Hash)]
pub enum Subject {
    Design,
    Library(LibraryId),
    Document(DocumentId),
    Unit(UnitId),
    /// An item not (yet) part of a design, such as a rejected identifier
    Detached,
}

/// Where a diagnostic points to: the subject and its printable name
#[derive(PartialEq, Debug, Clone, Eq, Hash)]
pub struct Location {
    pub subject: Subject,
    pub name: String,
}

impl Location {
    pub fn new(subject: Subject, name: impl Into<String>) -> Location {
        Location {
            subject,
            name: name.into(),
        }
    }

    pub fn detached(name: impl Into<String>) -> Location {
        Self::new(Subject::Detached, name)
    }

    pub fn design() -> Location {
        Self::new(Subject::Design, "design")
    }

    pub fn unit(&self) -> Option<UnitId> {
        if let Subject::Unit(unit) = self.subject {
            Some(unit)
        } else {
            None
        }
    }

    fn show(&self, message: &str) -> String {
        format!("{message}\n  --> {}\n", self.name)
    }
}

impl AsRef<Location> for Location {
    fn as_ref(&self) -> &Location {
        self
    }
}

#[must_use]
#[derive(PartialEq, Debug, Clone, Eq, Hash)]
pub struct Diagnostic {
    pub location: Location,
    pub message: String,
    pub default_severity: Severity,
    pub related: Vec<(Location, String)>,
    pub code: ErrorCode,
}

impl Diagnostic {
    pub fn new(
        item: impl AsRef<Location>,
        msg: impl Into<String>,
        severity: Severity,
        code: ErrorCode,
    ) -> Diagnostic {
        Diagnostic {
            location: item.as_ref().clone(),
            message: msg.into(),
            default_severity: severity,
            related: vec![],
            code,
        }
    }

    pub fn error(item: impl AsRef<Location>, msg: impl Into<String>, code: ErrorCode) -> Diagnostic {
        Self::new(item, msg, Severity::Error, code)
    }

    pub fn warning(
        item: impl AsRef<Location>,
        msg: impl Into<String>,
        code: ErrorCode,
    ) -> Diagnostic {
        Self::new(item, msg, Severity::Warning, code)
    }

    pub fn hint(item: impl AsRef<Location>, msg: impl Into<String>, code: ErrorCode) -> Diagnostic {
        Self::new(item, msg, Severity::Hint, code)
    }

    pub fn info(item: impl AsRef<Location>, msg: impl Into<String>, code: ErrorCode) -> Diagnostic {
        Self::new(item, msg, Severity::Info, code)
    }

    /// Create a diagnostic with the default severity of its error code
    pub fn with_code(
        item: impl AsRef<Location>,
        msg: impl Into<String>,
        code: ErrorCode,
    ) -> Diagnostic {
        Self::new(item, msg, code.default_severity(), code)
    }

    pub fn when(self, message: impl AsRef<str>) -> Diagnostic {
        Diagnostic {
            message: format!("{}, when {}", &self.message, message.as_ref()),
            location: self.location,
            default_severity: self.default_severity,
            related: vec![],
            code: self.code,
        }
    }

    pub fn related(self, item: impl AsRef<Location>, message: impl Into<String>) -> Diagnostic {
        let mut diagnostic = self;
        diagnostic.add_related(item, message);
        diagnostic
    }

    pub fn opt_related(
        self,
        item: Option<impl AsRef<Location>>,
        message: impl Into<String>,
    ) -> Diagnostic {
        let mut diagnostic = self;
        if let Some(item) = item {
            diagnostic.add_related(item, message);
        }
        diagnostic
    }

    pub fn add_related(&mut self, item: impl AsRef<Location>, message: impl Into<String>) {
        self.related
            .push((item.as_ref().to_owned(), message.into()));
    }

    pub fn drain_related(&mut self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::with_capacity(self.related.len());
        let related = std::mem::take(&mut self.related);
        for (location, msg) in related {
            diagnostics.push(Diagnostic::new(
                location,
                format!("related: {msg}"),
                Severity::Hint,
                ErrorCode::Related,
            ));
        }
        diagnostics
    }

    /// The unit this diagnostic is attached to, if any
    pub fn unit(&self) -> Option<UnitId> {
        self.location.unit()
    }

    /// Render the diagnostic with the severity the map assigns to its code.
    /// Returns `None` when the code is disabled.
    pub fn show(&self, severities: &SeverityMap) -> Option<String> {
        let severity = severities[self.code]?;
        Some(self.show_with(severity))
    }

    /// Render the diagnostic with its default severity
    pub fn show_default(&self) -> String {
        self.show_with(self.default_severity)
    }

    fn show_with(&self, severity: Severity) -> String {
        let mut result = String::new();
        for (location, message) in self.related.iter() {
            result.push_str(&location.show(&format!("related: {message}")));
            result.push('\n');
        }
        let severity: &str = severity.into();
        result.push_str(&self.location.show(&format!("{}: {}", severity, self.message)));
        result
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.location.name)
    }
}

impl std::error::Error for Diagnostic {}

pub type DiagnosticResult<T> = Result<T, Diagnostic>;

pub trait DiagnosticHandler {
    fn push(&mut self, diagnostic: Diagnostic);
}

impl<'a> dyn DiagnosticHandler + 'a {
    pub fn error(&mut self, item: impl AsRef<Location>, msg: impl Into<String>, code: ErrorCode) {
        self.push(Diagnostic::error(item, msg, code));
    }

    pub fn warning(&mut self, item: impl AsRef<Location>, msg: impl Into<String>, code: ErrorCode) {
        self.push(Diagnostic::warning(item, msg, code));
    }

    pub fn push_result<T>(&mut self, diagnostic: Result<T, Diagnostic>) {
        if let Err(diagnostic) = diagnostic {
            self.push(diagnostic);
        }
    }

    pub fn push_some(&mut self, diagnostic: Option<Diagnostic>) {
        if let Some(diagnostic) = diagnostic {
            self.push(diagnostic);
        }
    }

    pub fn append(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics.into_iter() {
            self.push(diagnostic);
        }
    }
}

impl DiagnosticHandler for Vec<Diagnostic> {
    fn push(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic)
    }
}

pub struct NullDiagnostics;

impl DiagnosticHandler for NullDiagnostics {
    fn push(&mut self, _diagnostic: Diagnostic) {
        // Ignore
    }
}

#[cfg(test)]
pub struct NoDiagnostics;

#[cfg(test)]
impl DiagnosticHandler for NoDiagnostics {
    fn push(&mut self, diagnostic: Diagnostic) {
        panic!("{}", diagnostic.show_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn show_warning() {
        assert_eq!(
            Diagnostic::warning(
                Location::detached("lib.foo"),
                "Greetings",
                ErrorCode::UnboundComponent
            )
            .show_default(),
            "\
warning: Greetings
  --> lib.foo
"
        );
    }

    #[test]
    fn show_error() {
        assert_eq!(
            Diagnostic::error(
                Location::detached("lib.foo(rtl)"),
                "Greetings",
                ErrorCode::UnresolvedArchitecture
            )
            .show_default(),
            "\
error: Greetings
  --> lib.foo(rtl)
"
        );
    }

    #[test]
    fn show_related() {
        let err = Diagnostic::error(
            Location::detached("lib.bar"),
            "Greetings",
            ErrorCode::CircularDependency,
        )
        .related(Location::detached("lib.foo"), "From here");

        assert_eq!(
            err.show_default(),
            "\
related: From here
  --> lib.foo

error: Greetings
  --> lib.bar
"
        );
    }

    #[test]
    fn show_respects_severity_map() {
        let diagnostic = Diagnostic::with_code(
            Location::detached("lib.top(rtl)"),
            "Component 'missing' is not bound to any entity",
            ErrorCode::UnboundComponent,
        );
        let mut severities = SeverityMap::default();
        assert_eq!(
            diagnostic.show(&severities),
            Some(
                "\
warning: Component 'missing' is not bound to any entity
  --> lib.top(rtl)
"
                .to_owned()
            )
        );

        severities[ErrorCode::UnboundComponent] = Some(Severity::Error);
        assert!(diagnostic.show(&severities).unwrap().starts_with("error: "));

        severities[ErrorCode::UnboundComponent] = None;
        assert_eq!(diagnostic.show(&severities), None);
    }

    #[test]
    fn drain_related_into_hints() {
        let mut err = Diagnostic::error(
            Location::detached("lib.bar"),
            "Greetings",
            ErrorCode::CircularDependency,
        )
        .related(Location::detached("lib.foo"), "From here");

        let related = err.drain_related();
        assert!(err.related.is_empty());
        assert_eq!(
            related,
            vec![Diagnostic::hint(
                Location::detached("lib.foo"),
                "related: From here",
                ErrorCode::Related
            )]
        );
    }
}
