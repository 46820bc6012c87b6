// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2020, Olof Kraigher olof.kraigher@gmail.com

//! The packages of the standard libraries `std` and `ieee` as virtual documents

use super::{Design, Document, LibraryId};
use crate::ast::*;
use crate::data::*;

struct PredefinedPackage {
    name: &'static str,
    uses: &'static [&'static str],
    has_body: bool,
    documentation: &'static str,
}

const STD_PACKAGES: &[PredefinedPackage] = &[
    PredefinedPackage {
        name: "standard",
        uses: &[],
        has_body: false,
        documentation: "Predefined types and operators (LRM 16.3)",
    },
    PredefinedPackage {
        name: "textio",
        uses: &[],
        has_body: true,
        documentation: "Formatted text input and output (LRM 16.4)",
    },
    PredefinedPackage {
        name: "env",
        uses: &[],
        has_body: true,
        documentation: "Access to the simulation environment (LRM 16.5)",
    },
];

const IEEE_PACKAGES: &[PredefinedPackage] = &[
    PredefinedPackage {
        name: "std_logic_1164",
        uses: &[],
        has_body: true,
        documentation: "Multivalue logic system (IEEE 1164)",
    },
    PredefinedPackage {
        name: "std_logic_textio",
        uses: &["std.textio.all", "ieee.std_logic_1164.all"],
        has_body: false,
        documentation: "Text input and output of std_logic values",
    },
    PredefinedPackage {
        name: "std_logic_misc",
        uses: &["ieee.std_logic_1164.all"],
        has_body: true,
        documentation: "Miscellaneous std_logic functions",
    },
    PredefinedPackage {
        name: "numeric_bit",
        uses: &[],
        has_body: true,
        documentation: "Arithmetic on bit vectors (IEEE 1076.3)",
    },
    PredefinedPackage {
        name: "numeric_bit_unsigned",
        uses: &["ieee.numeric_bit.all"],
        has_body: true,
        documentation: "Unsigned arithmetic on bit_vector",
    },
    PredefinedPackage {
        name: "numeric_std",
        uses: &["ieee.std_logic_1164.all"],
        has_body: true,
        documentation: "Arithmetic on std_logic vectors (IEEE 1076.3)",
    },
    PredefinedPackage {
        name: "numeric_std_unsigned",
        uses: &["ieee.std_logic_1164.all", "ieee.numeric_std.all"],
        has_body: true,
        documentation: "Unsigned arithmetic on std_ulogic_vector",
    },
    PredefinedPackage {
        name: "math_real",
        uses: &[],
        has_body: true,
        documentation: "Real valued mathematical functions (IEEE 1076.2)",
    },
    PredefinedPackage {
        name: "math_complex",
        uses: &["ieee.math_real.all"],
        has_body: true,
        documentation: "Complex valued mathematical functions (IEEE 1076.2)",
    },
    PredefinedPackage {
        name: "fixed_float_types",
        uses: &[],
        has_body: false,
        documentation: "Rounding and overflow styles of fixed and floating point",
    },
    PredefinedPackage {
        name: "fixed_generic_pkg",
        uses: &[
            "std.textio.all",
            "ieee.std_logic_1164.all",
            "ieee.numeric_std.all",
            "ieee.fixed_float_types.all",
        ],
        has_body: true,
        documentation: "Generic fixed point arithmetic",
    },
    PredefinedPackage {
        name: "fixed_pkg",
        uses: &["ieee.fixed_float_types.all", "ieee.fixed_generic_pkg"],
        has_body: false,
        documentation: "Instance of fixed_generic_pkg with default generics",
    },
    PredefinedPackage {
        name: "float_generic_pkg",
        uses: &[
            "std.textio.all",
            "ieee.std_logic_1164.all",
            "ieee.numeric_std.all",
            "ieee.fixed_float_types.all",
            "ieee.fixed_pkg.all",
        ],
        has_body: true,
        documentation: "Generic floating point arithmetic",
    },
    PredefinedPackage {
        name: "float_pkg",
        uses: &[
            "ieee.fixed_float_types.all",
            "ieee.fixed_pkg.all",
            "ieee.float_generic_pkg",
        ],
        has_body: false,
        documentation: "Instance of float_generic_pkg with default generics",
    },
];

fn package_document(package: &PredefinedPackage) -> DiagnosticResult<Document> {
    let mut context = Vec::new();
    let mut libraries: Vec<&str> = Vec::new();
    for name in package.uses {
        let library_name = name.split('.').next().unwrap_or_default();
        // std is visible without a library clause
        if library_name != "std" && !libraries.contains(&library_name) {
            libraries.push(library_name);
        }
    }
    if !libraries.is_empty() {
        context.push(ContextItem::library(&libraries)?);
    }
    for name in package.uses {
        context.push(ContextItem::use_clause(&[*name])?);
    }

    let mut document = Document::new_virtual()
        .with_documentation(package.documentation)
        .with_unit(
            PackageDeclaration::new(package.name)?
                .with_context(context)
                .with_documentation(package.documentation),
        );
    if package.has_body {
        document.add_unit(PackageBody::new(package.name)?);
    }
    Ok(document)
}

impl Design {
    fn load_predefined(
        &mut self,
        library: &str,
        packages: &[PredefinedPackage],
    ) -> DiagnosticResult<LibraryId> {
        if let Some(id) = self.library_id(library) {
            if self.library(id).is_some_and(|library| library.num_units() > 0) {
                log::debug!("Library '{library}' is already loaded");
                return Ok(id);
            }
        }

        let id = self.get_or_create_library(library)?;
        for package in packages {
            self.add_document(package_document(package)?, id)?;
        }
        log::debug!("Loaded {} predefined packages into '{library}'", packages.len());
        Ok(id)
    }

    /// Create the `std` library with the packages `standard`, `textio` and `env`.
    /// Does nothing if a non-empty `std` library already exists.
    pub fn load_std_library(&mut self) -> DiagnosticResult<LibraryId> {
        self.load_predefined("std", STD_PACKAGES)
    }

    /// Create the `ieee` library with the IEEE standard packages, loading
    /// the `std` library first since they depend on it.
    /// Does nothing if a non-empty `ieee` library already exists.
    pub fn load_ieee_library(&mut self) -> DiagnosticResult<LibraryId> {
        self.load_std_library()?;
        self.load_predefined("ieee", IEEE_PACKAGES)
    }
}
