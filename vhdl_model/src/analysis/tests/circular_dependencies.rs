// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2019, Olof Kraigher olof.kraigher@gmail.com

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn context() {
    let mut builder = DesignBuilder::new();
    builder.code(
        "ctx.vhd",
        vec![
            super::context(
                "ctx1",
                vec![library_clause(&["libname"]), context_reference("libname.ctx2")],
            )
            .into(),
            super::context(
                "ctx2",
                vec![library_clause(&["libname"]), context_reference("libname.ctx1")],
            )
            .into(),
        ],
    );

    let diagnostics = builder.analyze();
    check_diagnostics(
        diagnostics,
        vec![
            Diagnostic::circular_dependency(builder.location("libname.ctx1"))
                .related(builder.location("libname.ctx2"), "Part of the cycle"),
            Diagnostic::circular_dependency(builder.location("libname.ctx2"))
                .related(builder.location("libname.ctx1"), "Part of the cycle"),
        ],
    );
}

#[test]
fn use_package() {
    let mut builder = DesignBuilder::new();
    builder.code(
        "pkg.vhd",
        vec![
            package("pkg1")
                .with_context(vec![use_clause("work.pkg2.const")])
                .into(),
            package("pkg2")
                .with_context(vec![use_clause("work.pkg1.const")])
                .into(),
        ],
    );

    let diagnostics = builder.analyze();
    check_diagnostics(
        diagnostics,
        vec![
            Diagnostic::circular_dependency(builder.location("libname.pkg1"))
                .related(builder.location("libname.pkg2"), "Part of the cycle"),
            Diagnostic::circular_dependency(builder.location("libname.pkg2"))
                .related(builder.location("libname.pkg1"), "Part of the cycle"),
        ],
    );
}

#[test]
fn use_package_across_documents() {
    let mut builder = DesignBuilder::new();
    builder.code(
        "pkg1.vhd",
        vec![package("pkg1")
            .with_context(vec![use_clause("work.pkg2.all")])
            .into()],
    );
    builder.code(
        "pkg2.vhd",
        vec![package("pkg2")
            .with_context(vec![use_clause("work.pkg3.all")])
            .into()],
    );
    builder.code(
        "pkg3.vhd",
        vec![package("pkg3")
            .with_context(vec![use_clause("work.pkg1.all")])
            .into()],
    );

    let diagnostics = builder.analyze();
    assert_eq!(
        codes(&diagnostics),
        vec![
            ErrorCode::CircularCompileDependency,
            ErrorCode::CircularDependency,
            ErrorCode::CircularDependency,
            ErrorCode::CircularDependency,
        ]
    );
    let cycles = builder.analysis().dependency_graph().graph().cycles();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].len(), 3);
    assert!(builder.analysis().compile_order().is_err());
}

#[test]
fn package_body_may_use_package_that_uses_its_package() {
    let mut builder = DesignBuilder::new();
    builder.code(
        "pkg.vhd",
        vec![
            package("pkg1").into(),
            package("pkg2")
                .with_context(vec![use_clause("work.pkg1.all")])
                .into(),
            package_body("pkg1")
                .with_context(vec![use_clause("work.pkg2.all")])
                .into(),
        ],
    );

    check_no_diagnostics(&builder.analyze());
}

#[test]
fn use_of_own_package_is_not_an_edge() {
    let mut builder = DesignBuilder::new();
    builder.code(
        "pkg.vhd",
        vec![package("pkg")
            .with_declaration(UseClause::new(&["work.pkg.all"]).unwrap().into())
            .into()],
    );

    check_no_diagnostics(&builder.analyze());
    assert_eq!(builder.analysis().dependency_graph().num_edges(), 0);
}
