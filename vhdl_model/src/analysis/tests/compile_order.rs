// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2024, Olof Kraigher olof.kraigher@gmail.com

use super::*;
use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

#[test]
fn package_body_is_compiled_after_package() {
    let mut builder = DesignBuilder::new();
    let body = builder.code("body.vhd", vec![package_body("pkg").into()]);
    let pkg = builder.code("pkg.vhd", vec![package("pkg").into()]);

    check_no_diagnostics(&builder.analyze());
    let graph = builder.analysis().compile_order_graph();
    assert!(graph.depends_on("body.vhd", "pkg.vhd"));
    assert!(!graph.depends_on("pkg.vhd", "body.vhd"));
    assert_eq!(graph.dependencies(body), vec![pkg]);
    assert_eq!(builder.analysis().compile_order(), Ok(vec![pkg, body]));

    let edge = graph.graph().edges().next().unwrap();
    assert_eq!(edge.weight.to_string(), "libname.pkg(body) -> libname.pkg");
}

#[test]
fn units_in_same_document_add_no_edge() {
    let mut builder = DesignBuilder::new();
    let doc = builder.code(
        "pkg.vhd",
        vec![package("pkg").into(), package_body("pkg").into()],
    );

    check_no_diagnostics(&builder.analyze());
    let graph = builder.analysis().compile_order_graph();
    assert_eq!(graph.num_vertices(), 1);
    assert_eq!(graph.num_edges(), 0);
    assert_eq!(builder.analysis().compile_order(), Ok(vec![doc]));
}

#[test]
fn one_edge_per_pair_of_documents() {
    let mut builder = DesignBuilder::new();
    builder.code(
        "pkgs.vhd",
        vec![package("pkg1").into(), package("pkg2").into()],
    );
    builder.code(
        "user.vhd",
        vec![package("user")
            .with_context(vec![use_clause("work.pkg1.all"), use_clause("work.pkg2.all")])
            .into()],
    );

    check_no_diagnostics(&builder.analyze());
    let graph = builder.analysis().compile_order_graph();
    assert_eq!(graph.num_edges(), 1);
    let edge = graph.graph().edges().next().unwrap();
    assert_eq!(edge.weight.to_string(), "libname.user -> libname.pkg1");
}

#[test]
fn instantiation_adds_compile_dependency() {
    let mut builder = DesignBuilder::new();
    let top = builder.code(
        "top.vhd",
        vec![
            entity("top").into(),
            structural("rtl", "top", vec![component_instance("u_sub", "sub")]).into(),
        ],
    );
    let sub = builder.code("sub.vhd", vec![entity("sub").into()]);

    check_no_diagnostics(&builder.analyze());
    assert_eq!(builder.analysis().compile_order(), Ok(vec![sub, top]));
}

#[test]
fn compile_order_respects_every_dependency() {
    let mut builder = DesignBuilder::new();
    builder.code(
        "top.vhd",
        vec![
            entity("top")
                .with_context(vec![use_clause("work.types.all")])
                .into(),
            structural(
                "rtl",
                "top",
                vec![
                    entity_instance("u_a", "work.a", None),
                    entity_instance("u_b", "work.b", None),
                ],
            )
            .into(),
        ],
    );
    builder.code(
        "a.vhd",
        vec![
            entity("a").into(),
            architecture("rtl", "a")
                .with_context(vec![use_clause("work.util.all")])
                .into(),
        ],
    );
    builder.code("util_body.vhd", vec![package_body("util").into()]);
    builder.code(
        "util.vhd",
        vec![package("util")
            .with_context(vec![use_clause("work.types.all")])
            .into()],
    );
    builder.code("b.vhd", vec![entity("b").into()]);
    builder.code("types.vhd", vec![package("types").into()]);

    check_no_diagnostics(&builder.analyze());
    let analysis = builder.analysis();
    let order = analysis.compile_order().unwrap();
    assert_eq!(order.len(), builder.design().num_documents());

    let position = |document: DocumentId| order.iter().position(|id| *id == document).unwrap();
    let graph = analysis.compile_order_graph();
    for edge in graph.graph().edges() {
        let source = graph.graph().vertex(edge.source).unwrap().document();
        let target = graph.graph().vertex(edge.target).unwrap().document();
        assert!(position(target) < position(source), "{}", edge.weight);
    }

    let names: Vec<String> = order
        .iter()
        .map(|id| builder.document_location(*id).name)
        .collect();
    assert_eq!(
        names,
        vec!["b.vhd", "types.vhd", "util.vhd", "a.vhd", "top.vhd", "util_body.vhd"]
    );
}

#[test]
fn independent_documents_keep_load_order() {
    let mut builder = DesignBuilder::new();
    let docs: Vec<DocumentId> = ["c.vhd", "a.vhd", "b.vhd"]
        .iter()
        .enumerate()
        .map(|(i, path)| builder.code(path, vec![package(&format!("pkg{i}")).into()]))
        .collect();

    check_no_diagnostics(&builder.analyze());
    assert_eq!(builder.analysis().compile_order(), Ok(docs));
}

#[test]
fn circular_compile_dependency() {
    let mut builder = DesignBuilder::new();
    let a = builder.code(
        "a.vhd",
        vec![
            package("pkg_a").into(),
            package("pkg_c")
                .with_context(vec![use_clause("work.pkg_b.all")])
                .into(),
        ],
    );
    let b = builder.code(
        "b.vhd",
        vec![package("pkg_b")
            .with_context(vec![use_clause("work.pkg_a.all")])
            .into()],
    );

    let diagnostics = builder.analyze();
    check_diagnostics(
        diagnostics,
        vec![Diagnostic::error(
            builder.document_location(a),
            "Circular compile dependency between a.vhd, b.vhd",
            ErrorCode::CircularCompileDependency,
        )
        .related(builder.document_location(b), "Part of the cycle")],
    );

    let analysis = builder.analysis();
    assert_eq!(analysis.compile_order_graph().cycles(), vec![vec![a, b]]);
    assert_eq!(
        analysis.compile_order(),
        Err(Diagnostic::error(
            Location::design(),
            "No compile order exists, these documents depend on each other: a.vhd, b.vhd",
            ErrorCode::CircularCompileDependency,
        ))
    );
}

#[test]
fn virtual_documents() {
    let mut design = Design::new();
    let std = design.load_std_library().unwrap();
    let lib = design.create_library("lib").unwrap();
    let doc = design
        .add_document(
            Document::new_virtual().with_unit(
                package("pkg").with_context(vec![use_clause("std.textio.all")]),
            ),
            lib,
        )
        .unwrap();

    check_no_diagnostics(&design.analyze());
    let analysis = design.analysis().unwrap();
    let graph = analysis.compile_order_graph();
    let name = design.document_location(doc).name;
    assert_eq!(name, format!("<virtual {}>", doc.index()));
    assert!(graph.get(&name).is_some());

    let order = analysis.compile_order().unwrap();
    assert_eq!(order.last(), Some(&doc));
    assert_matches!(design.library(std), Some(library) if library.num_units() == 5);
}

#[cfg(unix)]
#[test]
fn documents_with_the_same_display_name_are_kept_apart() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let mut builder = DesignBuilder::new();
    let lib = builder.design().library_id("libname").unwrap();
    let mut add = |document: Document| builder.design_mut().add_document(document, lib).unwrap();
    let ff = add(Document::new(OsStr::from_bytes(b"a\xff.vhd")).with_unit(package("pkg0")));
    let fe = add(Document::new(OsStr::from_bytes(b"a\xfe.vhd")).with_unit(package("pkg1")));
    let lookalike = add(Document::new("<virtual 3>").with_unit(package("pkg2")));
    let virtual_doc = add(Document::new_virtual().with_unit(package("pkg3")));
    assert_eq!(virtual_doc.index(), 3);

    check_no_diagnostics(&builder.analyze());
    let analysis = builder.analysis();
    let graph = analysis.compile_order_graph();
    assert_eq!(graph.num_vertices(), 4);
    assert_eq!(
        graph.vertex(ff).unwrap().name(),
        graph.vertex(fe).unwrap().name()
    );
    assert_eq!(
        graph.vertex(lookalike).unwrap().name(),
        graph.vertex(virtual_doc).unwrap().name()
    );
    assert_eq!(
        analysis.compile_order(),
        Ok(vec![ff, fe, lookalike, virtual_doc])
    );
}
