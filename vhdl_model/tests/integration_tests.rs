// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2018, Olof Kraigher olof.kraigher@gmail.com

use std::io::Write;

use itertools::Itertools;
use pretty_assertions::assert_eq;
use vhdl_model::ast::*;
use vhdl_model::{
    Config, Design, DiagnosticResult, Document, EdgeKind, ErrorCode, LibraryId, NullMessages,
    Severity, TopLevel,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn uses(names: &[&str]) -> DiagnosticResult<ContextClause> {
    let mut items = vec![ContextItem::library(&["ieee"])?];
    for name in names {
        items.push(ContextItem::use_clause(&[*name])?);
    }
    Ok(items)
}

/// A small UART design spread over a few files, the way a project on disk would be
fn add_uart_project(design: &mut Design, lib: LibraryId) -> DiagnosticResult<()> {
    design.add_document(
        Document::new("rtl/uart_pkg.vhd")
            .with_unit(PackageDeclaration::new("uart_pkg")?.with_context(uses(&[
                "ieee.std_logic_1164.all",
                "ieee.numeric_std.all",
            ])?))
            .with_unit(PackageBody::new("uart_pkg")?),
        lib,
    )?;

    design.add_document(
        Document::new("rtl/uart_tx.vhd")
            .with_unit(EntityDeclaration::new("uart_tx")?.with_context(uses(&[
                "ieee.std_logic_1164.all",
                "work.uart_pkg.all",
            ])?))
            .with_unit(ArchitectureBody::new("rtl", "uart_tx")?),
        lib,
    )?;

    design.add_document(
        Document::new("rtl/uart_rx.vhd")
            .with_unit(EntityDeclaration::new("uart_rx")?.with_context(uses(&[
                "ieee.std_logic_1164.all",
                "work.uart_pkg.all",
            ])?))
            .with_unit(ArchitectureBody::new("rtl", "uart_rx")?),
        lib,
    )?;

    design.add_document(
        Document::new("rtl/uart.vhd")
            .with_unit(
                EntityDeclaration::new("uart")?
                    .with_context(uses(&["ieee.std_logic_1164.all"])?),
            )
            .with_unit(
                ArchitectureBody::new("structural", "uart")?
                    .with_declaration(ComponentDeclaration::new("uart_rx")?.into())
                    .with_statement(LabeledConcurrentStatement::instance(
                        "tx_inst",
                        InstantiatedUnit::entity("work.uart_tx", Some("rtl"))?,
                    )?)
                    .with_statement(LabeledConcurrentStatement::instance(
                        "rx_inst",
                        InstantiatedUnit::component("uart_rx")?,
                    )?),
            ),
        lib,
    )?;
    Ok(())
}

#[test]
fn analyzes_project_with_standard_libraries() {
    init_logging();
    let mut design = Design::new();
    design.load_ieee_library().unwrap();
    let lib = design.create_library("uart_lib").unwrap();
    add_uart_project(&mut design, lib).unwrap();

    let diagnostics = design.analyze();
    assert_eq!(diagnostics, vec![]);

    let analysis = design.analysis().unwrap();
    let graph = analysis.dependency_graph();
    assert!(graph.has_edge("uart_lib.uart_pkg", "ieee.numeric_std", EdgeKind::UseClause));
    assert!(graph.has_edge(
        "uart_lib.uart(structural)",
        "uart_lib.uart_tx(rtl)",
        EdgeKind::EntityInstantiation
    ));
    assert!(graph.has_edge(
        "uart_lib.uart(structural)",
        "uart_lib.uart_rx",
        EdgeKind::ComponentInstantiation
    ));

    let top = analysis.top_level_unit().unwrap();
    assert_eq!(design.design_unit(top).unwrap().key(), "uart_lib.uart(structural)");

    let hierarchy = analysis.hierarchy_graph();
    let TopLevel::Unique(root) = analysis.top_level() else {
        panic!("Expected a unique top level");
    };
    assert_eq!(
        hierarchy.tree_view(root),
        "\
uart_lib.uart(structural)
├─ uart_lib.uart_tx(rtl)
└─ uart_lib.uart_rx
   └─ uart_lib.uart_rx(rtl)
"
    );

    let order = analysis.compile_order().unwrap();
    let files = order
        .iter()
        .filter_map(|id| design.document(*id)?.path())
        .map(|path| path.to_string_lossy().into_owned())
        .collect_vec();
    assert_eq!(
        files,
        vec![
            "rtl/uart_pkg.vhd",
            "rtl/uart_tx.vhd",
            "rtl/uart_rx.vhd",
            "rtl/uart.vhd"
        ]
    );
    assert!(analysis.unused_units().is_empty());
}

#[test]
fn configuration_file_controls_standard_and_severities() {
    init_logging();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        b"
standard = '1993'

[libraries]
vendor.predefined = true

[lint]
ambiguous_top_level = false
unbound_component = 'error'
",
    )
    .unwrap();

    let mut config = Config::default();
    config.append(
        &Config::read_file_path(file.path()).unwrap(),
        &mut NullMessages,
    );
    let severities = *config.severities();

    let mut design = Design::with_config(config);
    let vendor = design.create_library("vendor").unwrap();
    design
        .add_document(
            Document::new("vendor/cells.vhd").with_unit(EntityDeclaration::new("and2").unwrap()),
            vendor,
        )
        .unwrap();

    let lib = design.create_library("lib").unwrap();
    design
        .add_document(
            Document::new("top.vhd")
                .with_unit(EntityDeclaration::new("top").unwrap())
                .with_unit(
                    ArchitectureBody::new("rtl", "top").unwrap().with_statement(
                        LabeledConcurrentStatement::instance(
                            "u_missing",
                            InstantiatedUnit::component("missing").unwrap(),
                        )
                        .unwrap(),
                    ),
                )
                .with_unit(ContextDeclaration::new("ctx").unwrap()),
            lib,
        )
        .unwrap();
    design
        .add_document(
            Document::new("alone.vhd").with_unit(EntityDeclaration::new("alone").unwrap()),
            lib,
        )
        .unwrap();

    let diagnostics = design.analyze();
    let codes = diagnostics.iter().map(|diag| diag.code).sorted_by_key(|code| code.as_str()).collect_vec();
    assert_eq!(
        codes,
        vec![
            ErrorCode::AmbiguousTopLevel,
            ErrorCode::UnboundComponent,
            ErrorCode::UnsupportedStandard
        ]
    );

    let shown = diagnostics
        .iter()
        .filter_map(|diag| Some((diag.code, severities[diag.code]?)))
        .sorted_by_key(|(code, _)| code.as_str())
        .collect_vec();
    assert_eq!(
        shown,
        vec![
            (ErrorCode::UnboundComponent, Severity::Error),
            (ErrorCode::UnsupportedStandard, Severity::Error)
        ]
    );

    // The predefined vendor cell is not a top level candidate
    let roots = design.analysis().unwrap().hierarchy_graph().root_keys();
    assert_eq!(roots, vec!["lib.top(rtl)", "lib.alone"]);
}

#[test]
fn reanalysis_after_fixing_a_design() {
    init_logging();
    let mut design = Design::new();
    let lib = design.create_library("lib").unwrap();
    let doc = design
        .add_document(
            Document::new("top.vhd").with_unit(ArchitectureBody::new("rtl", "top").unwrap()),
            lib,
        )
        .unwrap();

    let diagnostics = design.analyze();
    assert_eq!(
        diagnostics.iter().map(|diag| diag.code).collect_vec(),
        vec![ErrorCode::UnresolvedArchitecture]
    );
    assert_eq!(
        diagnostics[0].show_default(),
        "error: No entity 'top' in library 'lib'\n  --> lib.top(rtl)\n"
    );

    design
        .add_unit(doc, EntityDeclaration::new("top").unwrap())
        .unwrap();
    assert!(design.analysis().is_none());
    assert_eq!(design.analyze(), vec![]);
    assert!(design.analysis().unwrap().dependency_graph().has_edge(
        "lib.top(rtl)",
        "lib.top",
        EdgeKind::EntityImplementation
    ));
}
