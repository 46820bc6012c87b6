// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2024, Olof Kraigher olof.kraigher@gmail.com

use super::*;
use fnv::FnvHashSet;
use pretty_assertions::assert_eq;

fn generate(label: &str, statements: Vec<LabeledConcurrentStatement>) -> LabeledConcurrentStatement {
    LabeledConcurrentStatement::new(
        Some(label),
        ConcurrentStatement::ForGenerate(ForGenerateStatement {
            index_name: Identifier::new("i").unwrap(),
            discrete_range: DiscreteRange::Range(Range::new(
                Expression::integer(0),
                Direction::Ascending,
                Expression::integer(3),
            )),
            body: GenerateBody {
                statements,
                ..Default::default()
            },
        }),
    )
    .unwrap()
}

fn block(label: &str, statements: Vec<LabeledConcurrentStatement>) -> LabeledConcurrentStatement {
    LabeledConcurrentStatement::block(
        label,
        BlockStatement {
            guard_condition: None,
            header: BlockHeader::default(),
            decl: Vec::new(),
            statements,
        },
    )
    .unwrap()
}

#[test]
fn entity_and_architecture() {
    let mut design = Design::new();
    let lib = design.create_library("L").unwrap();
    design
        .add_document(
            Document::new("e1.vhd")
                .with_unit(entity("e1"))
                .with_unit(architecture("rtl", "e1")),
            lib,
        )
        .unwrap();

    check_no_diagnostics(&design.analyze());
    let graph = design.analysis().unwrap().dependency_graph();
    let keys: Vec<&str> = graph.graph().vertices().map(|(_, vertex)| vertex.key()).collect();
    assert_eq!(keys, vec!["l", "l.e1", "l.e1(rtl)"]);
    assert_eq!(
        graph.edge_keys(),
        vec![("l.e1(rtl)", "l.e1", EdgeKind::EntityImplementation)]
    );
    assert_eq!(graph.get("l.e1").unwrap().kind(), VertexKind::Entity);
    assert_eq!(graph.get("l.e1(rtl)").unwrap().kind(), VertexKind::Architecture);
    assert_eq!(graph.get("l.e1(rtl)").unwrap().entity_name(), Some("e1"));
    assert_eq!(graph.get("l").unwrap().kind(), VertexKind::Library);
}

#[test]
fn one_vertex_per_library_and_unit() {
    let mut builder = DesignBuilder::new();
    builder.code(
        "a.vhd",
        vec![
            package("pkg").into(),
            package_body("pkg").into(),
            entity("ent").into(),
            architecture("rtl", "ent").into(),
            architecture("fast", "ent").into(),
        ],
    );
    builder.code_in(
        "other",
        "b.vhd",
        vec![
            context("ctx", vec![]).into(),
            entity("ent").into(),
            configuration("cfg", "ent", None).into(),
        ],
    );
    builder.analyze();

    let design = builder.design();
    let graph = builder.analysis().dependency_graph();
    assert_eq!(
        graph.num_vertices(),
        design.num_libraries() + design.num_units()
    );
    let keys: FnvHashSet<&str> = graph.graph().vertices().map(|(_, vertex)| vertex.key()).collect();
    assert_eq!(keys.len(), graph.num_vertices());

    for unit in design.units(UnitKindSet::ALL) {
        let id = graph.vertex_of_unit(unit.id()).unwrap();
        assert_eq!(graph.key_of(id), Some(unit.key().as_str()));
    }
    for library in design.libraries() {
        assert!(graph.vertex_of_library(library.id()).is_some());
    }
}

#[test]
fn extended_identifiers_give_one_vertex_per_unit() {
    // Inner backslashes must be doubled
    assert!(EntityDeclaration::new("\\a\\(\\").is_err());
    assert!(ArchitectureBody::new("\\(\\x\\", "\\a\\").is_err());

    let mut builder = DesignBuilder::new();
    builder.code(
        "a.vhd",
        vec![
            entity("\\a\\").into(),
            architecture("\\x\\", "\\a\\").into(),
            entity("\\a\\\\(\\").into(),
            architecture("\\x\\", "\\a\\\\(\\").into(),
        ],
    );
    assert_eq!(
        codes(&builder.analyze()),
        vec![ErrorCode::AmbiguousTopLevel]
    );

    let design = builder.design();
    let graph = builder.analysis().dependency_graph();
    assert_eq!(graph.num_vertices(), 5);
    assert_eq!(
        graph.num_vertices(),
        design.num_libraries() + design.num_units()
    );
    for unit in design.units(UnitKindSet::ALL) {
        let id = graph.vertex_of_unit(unit.id()).unwrap();
        assert_eq!(graph.key_of(id), Some(unit.key().as_str()));
    }
    assert_eq!(
        graph.edge_keys(),
        vec![
            (
                "libname.\\a\\(\\x\\)",
                "libname.\\a\\",
                EdgeKind::EntityImplementation
            ),
            (
                "libname.\\a\\\\(\\(\\x\\)",
                "libname.\\a\\\\(\\",
                EdgeKind::EntityImplementation
            ),
        ]
    );
}

#[test]
fn entities_are_followed_by_their_architectures() {
    let mut builder = DesignBuilder::new();
    builder.code("a.vhd", vec![architecture("rtl", "ent").into()]);
    builder.code(
        "b.vhd",
        vec![package("pkg").into(), entity("ent").into()],
    );
    builder.analyze();

    let graph = builder.analysis().dependency_graph();
    let keys: Vec<&str> = graph.graph().vertices().map(|(_, vertex)| vertex.key()).collect();
    assert_eq!(
        keys,
        vec!["libname", "libname.ent", "libname.ent(rtl)", "libname.pkg"]
    );
}

#[test]
fn analysis_is_idempotent() {
    let mut builder = DesignBuilder::new();
    builder.code(
        "code.vhd",
        vec![
            package("pkg").into(),
            entity("sub").into(),
            architecture("rtl", "sub").into(),
            entity("top")
                .with_context(vec![use_clause("work.pkg.all")])
                .into(),
            structural("rtl", "top", vec![entity_instance("u1", "work.sub", None)]).into(),
        ],
    );

    let first = builder.analyze();
    let first_graph = builder.analysis().dependency_graph().to_string();
    let first_hierarchy = builder.analysis().hierarchy_graph().graph().to_string();
    let first_order = builder.analysis().compile_order_graph().to_string();

    let second = builder.analyze();
    assert_eq!(first, second);
    assert_eq!(first_graph, builder.analysis().dependency_graph().to_string());
    assert_eq!(
        first_hierarchy,
        builder.analysis().hierarchy_graph().graph().to_string()
    );
    assert_eq!(first_order, builder.analysis().compile_order_graph().to_string());
}

#[test]
fn entity_instantiation() {
    let mut builder = DesignBuilder::new();
    builder.code(
        "code.vhd",
        vec![
            entity("sub").into(),
            architecture("rtl", "sub").into(),
            architecture("fast", "sub").into(),
            entity("top").into(),
            structural(
                "rtl",
                "top",
                vec![
                    entity_instance("u1", "work.sub", None),
                    entity_instance("u2", "libname.sub", Some("fast")),
                ],
            )
            .into(),
        ],
    );

    check_no_diagnostics(&builder.analyze());
    let graph = builder.analysis().dependency_graph();
    assert!(graph.has_edge("libname.top(rtl)", "libname.sub", EdgeKind::EntityInstantiation));
    assert!(graph.has_edge(
        "libname.top(rtl)",
        "libname.sub(fast)",
        EdgeKind::EntityInstantiation
    ));
    assert!(!graph.has_edge(
        "libname.top(rtl)",
        "libname.sub(rtl)",
        EdgeKind::EntityInstantiation
    ));
}

#[test]
fn instantiation_of_missing_entity() {
    let mut builder = DesignBuilder::new();
    builder.code(
        "code.vhd",
        vec![
            entity("top").into(),
            structural("rtl", "top", vec![entity_instance("u1", "work.missing", None)]).into(),
        ],
    );

    let diagnostics = builder.analyze();
    check_diagnostics(
        diagnostics,
        vec![Diagnostic::with_code(
            builder.location("libname.top(rtl)"),
            "No entity 'work.missing' found for instance 'u1'",
            ErrorCode::UnboundComponent,
        )],
    );
    assert_eq!(
        builder.analysis().dependency_graph().edge_keys(),
        vec![("libname.top(rtl)", "libname.top", EdgeKind::EntityImplementation)]
    );
}

#[test]
fn instantiation_of_missing_architecture() {
    let mut builder = DesignBuilder::new();
    builder.code(
        "code.vhd",
        vec![
            entity("sub").into(),
            entity("top").into(),
            structural(
                "rtl",
                "top",
                vec![entity_instance("u1", "work.sub", Some("fast"))],
            )
            .into(),
        ],
    );

    let diagnostics = builder.analyze();
    check_diagnostics(
        diagnostics,
        vec![Diagnostic::error(
            builder.location("libname.top(rtl)"),
            "No architecture 'fast' for entity 'work.sub'",
            ErrorCode::NoArchForEnt,
        )],
    );
    assert!(builder.analysis().dependency_graph().has_edge(
        "libname.top(rtl)",
        "libname.sub",
        EdgeKind::EntityInstantiation
    ));
}

#[test]
fn component_binds_to_entity_in_own_library() {
    let mut builder = DesignBuilder::new();
    builder.code(
        "a.vhd",
        vec![
            entity("a").into(),
            structural("rtl", "a", vec![component_instance("x_inst", "x")])
                .with_declaration(ComponentDeclaration::new("x").unwrap().into())
                .into(),
        ],
    );
    builder.code("x.vhd", vec![entity("x").into()]);

    check_no_diagnostics(&builder.analyze());
    let analysis = builder.analysis();
    assert!(analysis.dependency_graph().has_edge(
        "libname.a(rtl)",
        "libname.x",
        EdgeKind::ComponentInstantiation
    ));
    assert_eq!(analysis.top_level_unit(), Some(builder.unit("libname.a(rtl)")));
}

#[test]
fn component_binds_to_entity_in_visible_library() {
    let mut builder = DesignBuilder::new();
    builder.code_in("other", "x.vhd", vec![entity("x").into()]);
    builder.code(
        "a.vhd",
        vec![
            entity("a").into(),
            structural("rtl", "a", vec![component_instance("x_inst", "x")])
                .with_context(vec![library_clause(&["other"])])
                .into(),
        ],
    );

    check_no_diagnostics(&builder.analyze());
    assert!(builder.analysis().dependency_graph().has_edge(
        "libname.a(rtl)",
        "other.x",
        EdgeKind::ComponentInstantiation
    ));
}

#[test]
fn unbound_component() {
    let mut builder = DesignBuilder::new();
    builder.code(
        "a.vhd",
        vec![
            entity("a").into(),
            structural("rtl", "a", vec![component_instance("y_inst", "y")]).into(),
        ],
    );

    let diagnostics = builder.analyze();
    check_diagnostics(
        diagnostics,
        vec![Diagnostic::warning(
            builder.location("libname.a(rtl)"),
            "Component 'y' of instance 'y_inst' is not bound to any entity",
            ErrorCode::UnboundComponent,
        )],
    );
}

#[test]
fn instances_nested_in_block_and_generate_statements() {
    let mut builder = DesignBuilder::new();
    builder.code(
        "code.vhd",
        vec![
            entity("sub").into(),
            entity("top").into(),
            structural(
                "rtl",
                "top",
                vec![
                    block("blk", vec![entity_instance("u1", "work.sub", None)]),
                    generate("gen", vec![component_instance("u2", "missing")]),
                ],
            )
            .into(),
        ],
    );

    let diagnostics = builder.analyze();
    check_diagnostics(
        diagnostics,
        vec![Diagnostic::with_code(
            builder.location("libname.top(rtl)"),
            "Component 'missing' of instance 'gen.u2' is not bound to any entity",
            ErrorCode::UnboundComponent,
        )],
    );
    assert!(builder.analysis().dependency_graph().has_edge(
        "libname.top(rtl)",
        "libname.sub",
        EdgeKind::EntityInstantiation
    ));
}

#[test]
fn configuration_instantiation() {
    let mut builder = DesignBuilder::new();
    builder.code(
        "sub.vhd",
        vec![
            entity("sub").into(),
            architecture("fast", "sub").into(),
            configuration("sub_fast", "sub", Some("fast")).into(),
        ],
    );
    builder.code(
        "top.vhd",
        vec![
            entity("top").into(),
            structural(
                "rtl",
                "top",
                vec![configuration_instance("u1", "work.sub_fast")],
            )
            .into(),
        ],
    );

    check_no_diagnostics(&builder.analyze());
    let graph = builder.analysis().dependency_graph();
    assert!(graph.has_edge(
        "libname.sub_fast",
        "libname.sub",
        EdgeKind::ConfigurationEntity
    ));
    assert!(graph.has_edge(
        "libname.top(rtl)",
        "libname.sub_fast",
        EdgeKind::ConfigurationReference
    ));
    assert!(graph.has_edge(
        "libname.top(rtl)",
        "libname.sub(fast)",
        EdgeKind::ConfigurationInstantiation
    ));
}

#[test]
fn edge_classes() {
    assert_eq!(EdgeKind::UseClause.class(), EdgeClass::References);
    assert_eq!(EdgeKind::ConfigurationReference.class(), EdgeClass::References);
    assert_eq!(EdgeKind::PackageImplementation.class(), EdgeClass::Implements);
    assert_eq!(EdgeKind::ComponentInstantiation.class(), EdgeClass::Instantiates);
    assert_eq!(EdgeKind::ConfigurationInstantiation.to_string(), "configuration_instantiation");
    assert_eq!(VertexKind::PackageBody.to_string(), "package_body");
}

#[test]
fn predefined_libraries_are_marked() {
    let mut builder = DesignBuilder::new();
    builder.design_mut().load_std_library().unwrap();
    builder.code("ent.vhd", vec![entity("ent").into()]);
    builder.analyze();

    let graph = builder.analysis().dependency_graph();
    assert!(graph.get("std").unwrap().is_predefined());
    assert!(graph.get("std.standard").unwrap().is_predefined());
    assert!(!graph.get("libname.ent").unwrap().is_predefined());
}
