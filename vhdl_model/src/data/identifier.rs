// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2018, Olof Kraigher olof.kraigher@gmail.com

use super::error_codes::ErrorCode;
use super::{Diagnostic, DiagnosticResult, Location};
use std::sync::Arc;

/// VHDL-2019 reserved words. A basic identifier may not be one of these.
const RESERVED_WORDS: &[&str] = &[
    "abs",
    "access",
    "after",
    "alias",
    "all",
    "and",
    "architecture",
    "array",
    "assert",
    "assume",
    "attribute",
    "begin",
    "block",
    "body",
    "buffer",
    "bus",
    "case",
    "component",
    "configuration",
    "constant",
    "context",
    "cover",
    "default",
    "disconnect",
    "downto",
    "else",
    "elsif",
    "end",
    "entity",
    "exit",
    "fairness",
    "file",
    "for",
    "force",
    "function",
    "generate",
    "generic",
    "group",
    "guarded",
    "if",
    "impure",
    "in",
    "inertial",
    "inout",
    "is",
    "label",
    "library",
    "linkage",
    "literal",
    "loop",
    "map",
    "mod",
    "nand",
    "new",
    "next",
    "nor",
    "not",
    "null",
    "of",
    "on",
    "open",
    "or",
    "others",
    "out",
    "package",
    "parameter",
    "port",
    "postponed",
    "private",
    "procedure",
    "process",
    "property",
    "protected",
    "pure",
    "range",
    "record",
    "register",
    "reject",
    "release",
    "rem",
    "report",
    "restrict",
    "return",
    "rol",
    "ror",
    "select",
    "sequence",
    "severity",
    "shared",
    "signal",
    "sla",
    "sll",
    "sra",
    "srl",
    "strong",
    "subtype",
    "then",
    "to",
    "transport",
    "type",
    "unaffected",
    "units",
    "until",
    "use",
    "variable",
    "view",
    "vmode",
    "vprop",
    "vunit",
    "wait",
    "when",
    "while",
    "with",
    "xnor",
    "xor",
];

pub fn is_reserved_word(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    RESERVED_WORDS.binary_search(&lower.as_str()).is_ok()
}

/// A case preserving VHDL identifier.
///
/// Basic identifiers compare case insensitively, extended identifiers
/// (`\like this\`) compare exactly. The normalized form is used as the
/// lookup key everywhere in the model.
#[derive(Clone, Debug, Eq)]
pub struct Identifier {
    name: Arc<str>,
    normalized: Arc<str>,
}

impl Identifier {
    /// Create an identifier, validating it against the VHDL lexical rules
    pub fn new(name: impl AsRef<str>) -> DiagnosticResult<Identifier> {
        let name = name.as_ref();
        if let Err(reason) = validate(name) {
            return Err(Diagnostic::error(
                Location::detached(name),
                format!("Invalid identifier '{name}': {reason}"),
                ErrorCode::InvalidIdentifier,
            ));
        }

        let normalized = if is_extended(name) {
            Arc::from(name)
        } else {
            Arc::from(name.to_ascii_lowercase())
        };

        Ok(Identifier {
            name: Arc::from(name),
            normalized,
        })
    }

    /// The name as written
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name used for case insensitive comparison
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn is_extended(&self) -> bool {
        is_extended(&self.name)
    }

    /// Case insensitive comparison against a plain string
    pub fn matches(&self, name: &str) -> bool {
        if self.is_extended() {
            *self.name == *name
        } else {
            self.normalized.eq_ignore_ascii_case(name)
        }
    }
}

fn is_extended(name: &str) -> bool {
    name.len() >= 2 && name.starts_with('\\') && name.ends_with('\\')
}

fn validate(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("identifier may not be empty");
    }

    if is_extended(name) {
        return validate_extended(&name[1..name.len() - 1]);
    }

    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return Err("must start with a letter"),
    }

    let mut previous = ' ';
    for c in chars {
        if !(c.is_ascii_alphanumeric() || c == '_') {
            return Err("may only contain letters, digits and underscores");
        }
        if c == '_' && previous == '_' {
            return Err("may not contain consecutive underscores");
        }
        previous = c;
    }

    if previous == '_' {
        return Err("may not end with an underscore");
    }

    if is_reserved_word(name) {
        return Err("reserved word");
    }

    Ok(())
}

/// The text between the enclosing backslashes. A backslash inside an
/// extended identifier is written twice.
fn validate_extended(inner: &str) -> Result<(), &'static str> {
    if inner.is_empty() {
        return Err("extended identifier may not be empty");
    }

    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c.is_control() {
            return Err("extended identifier may only contain graphic characters");
        }
        if c == '\\' && chars.next() != Some('\\') {
            return Err("backslash inside extended identifier must be doubled");
        }
    }
    Ok(())
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl std::hash::Hash for Identifier {
    fn hash<H: std::hash::Hasher>(&self, hasher: &mut H) {
        self.normalized.hash(hasher);
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl TryFrom<&str> for Identifier {
    type Error = Diagnostic;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Identifier::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn reserved_words_are_sorted() {
        let mut sorted = RESERVED_WORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, RESERVED_WORDS);
    }

    #[test]
    fn basic_identifiers_compare_case_insensitive() {
        let lower = Identifier::new("std_logic").unwrap();
        let upper = Identifier::new("STD_LOGIC").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(upper.name(), "STD_LOGIC");
        assert_eq!(upper.normalized(), "std_logic");
        assert!(upper.matches("Std_Logic"));
    }

    #[test]
    fn extended_identifiers_compare_exact() {
        let lower = Identifier::new("\\foo\\").unwrap();
        let upper = Identifier::new("\\FOO\\").unwrap();
        assert_ne!(lower, upper);
        assert!(lower.is_extended());
        assert!(!lower.matches("\\Foo\\"));
    }

    #[test]
    fn empty_identifier_is_invalid() {
        let err = Identifier::new("").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidIdentifier);
        assert_matches!(Identifier::new("\\\\"), Err(_));
    }

    #[test]
    fn backslash_in_extended_identifier_must_be_doubled() {
        assert!(Identifier::new("\\a\\\\b\\").is_ok());
        assert!(Identifier::new("\\\\\\\\").is_ok());
        assert_matches!(
            Identifier::new("\\a\\(\\"),
            Err(diagnostic) if diagnostic.code == ErrorCode::InvalidIdentifier
        );
        assert_matches!(Identifier::new("\\(\\x\\"), Err(_));
        assert_matches!(Identifier::new("\\\\\\"), Err(_));
        assert_matches!(Identifier::new("\\a\tb\\"), Err(_));
    }

    #[test]
    fn lexical_rules() {
        assert!(Identifier::new("lib_1").is_ok());
        assert!(Identifier::new("E1").is_ok());
        assert_matches!(Identifier::new("1abc"), Err(_));
        assert_matches!(Identifier::new("a__b"), Err(_));
        assert_matches!(Identifier::new("ab_"), Err(_));
        assert_matches!(Identifier::new("a-b"), Err(_));
        assert_matches!(Identifier::new("Entity"), Err(_));
        assert_matches!(Identifier::new("body"), Err(_));
    }
}
