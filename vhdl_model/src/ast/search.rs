// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2019, Olof Kraigher olof.kraigher@gmail.com

//! Walking the statement trees of design units

use super::*;

#[must_use]
#[derive(PartialEq, Debug)]
pub enum SearchResult {
    Found,
    NotFound,
}

#[must_use]
pub enum SearchState {
    Finished(SearchResult),
    NotFinished,
}

pub use SearchResult::*;
pub use SearchState::*;

macro_rules! return_if_found {
    ($result:expr) => {
        if let Found = $result {
            return Found;
        };
    };
}

macro_rules! return_if_finished {
    ($result:expr) => {
        if let Finished(result) = $result {
            return result;
        };
    };
}

/// Labels of the block and generate statements enclosing a statement
pub type Scope<'a> = [&'a Identifier];

pub trait Searcher {
    fn search_concurrent(
        &mut self,
        _scope: &Scope<'_>,
        _stmt: &LabeledConcurrentStatement,
    ) -> SearchState {
        NotFinished
    }

    fn search_sequential(&mut self, _stmt: &LabeledSequentialStatement) -> SearchState {
        NotFinished
    }
}

pub trait Search {
    fn search(&self, searcher: &mut impl Searcher) -> SearchResult {
        self.search_in(&mut Vec::new(), searcher)
    }

    fn search_in<'a>(
        &'a self,
        scope: &mut Vec<&'a Identifier>,
        searcher: &mut impl Searcher,
    ) -> SearchResult;
}

impl<T: Search> Search for Vec<T> {
    fn search_in<'a>(
        &'a self,
        scope: &mut Vec<&'a Identifier>,
        searcher: &mut impl Searcher,
    ) -> SearchResult {
        for elem in self.iter() {
            return_if_found!(elem.search_in(scope, searcher));
        }
        NotFound
    }
}

impl<T: Search> Search for Option<T> {
    fn search_in<'a>(
        &'a self,
        scope: &mut Vec<&'a Identifier>,
        searcher: &mut impl Searcher,
    ) -> SearchResult {
        for elem in self.iter() {
            return_if_found!(elem.search_in(scope, searcher));
        }
        NotFound
    }
}

/// Search nested statements with the label of the enclosing statement added to the scope
fn search_nested<'a, T: Search>(
    label: Option<&'a Identifier>,
    nested: &'a T,
    scope: &mut Vec<&'a Identifier>,
    searcher: &mut impl Searcher,
) -> SearchResult {
    if let Some(label) = label {
        scope.push(label);
    }
    let result = nested.search_in(scope, searcher);
    if label.is_some() {
        scope.pop();
    }
    result
}

impl Search for GenerateBody {
    fn search_in<'a>(
        &'a self,
        scope: &mut Vec<&'a Identifier>,
        searcher: &mut impl Searcher,
    ) -> SearchResult {
        search_nested(
            self.alternative_label.as_ref(),
            &self.statements,
            scope,
            searcher,
        )
    }
}

impl Search for LabeledConcurrentStatement {
    fn search_in<'a>(
        &'a self,
        scope: &mut Vec<&'a Identifier>,
        searcher: &mut impl Searcher,
    ) -> SearchResult {
        return_if_finished!(searcher.search_concurrent(scope, self));

        let label = self.label.as_ref();
        match self.statement {
            ConcurrentStatement::Block(ref block) => {
                search_nested(label, &block.statements, scope, searcher)
            }
            ConcurrentStatement::Process(ref process) => {
                process.statements.search_in(scope, searcher)
            }
            ConcurrentStatement::ForGenerate(ref gen) => {
                search_nested(label, &gen.body, scope, searcher)
            }
            ConcurrentStatement::IfGenerate(ref gen) => {
                if let Some(label) = label {
                    scope.push(label);
                }
                let mut result = NotFound;
                for cond in gen.conds.conditionals.iter() {
                    if let Found = cond.item.search_in(scope, searcher) {
                        result = Found;
                        break;
                    }
                }
                if result == NotFound {
                    result = gen.conds.else_item.search_in(scope, searcher);
                }
                if label.is_some() {
                    scope.pop();
                }
                result
            }
            ConcurrentStatement::CaseGenerate(ref gen) => {
                if let Some(label) = label {
                    scope.push(label);
                }
                let mut result = NotFound;
                for alternative in gen.sels.alternatives.iter() {
                    if let Found = alternative.item.search_in(scope, searcher) {
                        result = Found;
                        break;
                    }
                }
                if label.is_some() {
                    scope.pop();
                }
                result
            }
            ConcurrentStatement::Instance(..)
            | ConcurrentStatement::ProcedureCall(..)
            | ConcurrentStatement::Assert(..)
            | ConcurrentStatement::Assignment(..) => NotFound,
        }
    }
}

impl Search for LabeledSequentialStatement {
    fn search_in<'a>(
        &'a self,
        scope: &mut Vec<&'a Identifier>,
        searcher: &mut impl Searcher,
    ) -> SearchResult {
        return_if_finished!(searcher.search_sequential(self));

        match self.statement {
            SequentialStatement::If(ref ifstmt) => {
                for cond in ifstmt.conds.conditionals.iter() {
                    return_if_found!(cond.item.search_in(scope, searcher));
                }
                ifstmt.conds.else_item.search_in(scope, searcher)
            }
            SequentialStatement::Case(ref case_stmt) => {
                for alternative in case_stmt.alternatives.iter() {
                    return_if_found!(alternative.item.search_in(scope, searcher));
                }
                NotFound
            }
            SequentialStatement::Loop(ref loop_stmt) => {
                loop_stmt.statements.search_in(scope, searcher)
            }
            _ => NotFound,
        }
    }
}

/// An instantiation statement together with where it was found
#[derive(PartialEq, Debug, Clone)]
pub struct FoundInstance<'a> {
    /// Labels of the enclosing block and generate statements, outermost first
    pub scope: Vec<&'a Identifier>,
    pub label: Option<&'a Identifier>,
    pub instance: &'a InstantiationStatement,
}

impl FoundInstance<'_> {
    /// The hierarchical instance path, such as `gen_lanes.lane`
    pub fn path(&self) -> String {
        let mut path: Vec<&str> = self.scope.iter().map(|ident| ident.name()).collect();
        if let Some(label) = self.label {
            path.push(label.name());
        }
        path.join(".")
    }
}

/// All instantiation statements in declaration order, including those
/// nested in block and generate statements
pub fn find_instances(statements: &[LabeledConcurrentStatement]) -> Vec<FoundInstance<'_>> {
    let mut scope = Vec::new();
    let mut instances = Vec::new();
    collect_instances(statements, &mut scope, &mut instances);
    instances
}

fn collect_instances<'a>(
    statements: &'a [LabeledConcurrentStatement],
    scope: &mut Vec<&'a Identifier>,
    instances: &mut Vec<FoundInstance<'a>>,
) {
    for stmt in statements {
        let label = stmt.label.as_ref();
        match stmt.statement {
            ConcurrentStatement::Instance(ref instance) => instances.push(FoundInstance {
                scope: scope.clone(),
                label,
                instance,
            }),
            ConcurrentStatement::Block(ref block) => {
                collect_nested(label, std::iter::once(&block.statements), scope, instances)
            }
            ConcurrentStatement::ForGenerate(ref gen) => {
                collect_nested(label, std::iter::once(&gen.body.statements), scope, instances)
            }
            ConcurrentStatement::IfGenerate(ref gen) => collect_nested(
                label,
                gen.conds
                    .conditionals
                    .iter()
                    .map(|cond| &cond.item.statements)
                    .chain(gen.conds.else_item.iter().map(|body| &body.statements)),
                scope,
                instances,
            ),
            ConcurrentStatement::CaseGenerate(ref gen) => collect_nested(
                label,
                gen.sels
                    .alternatives
                    .iter()
                    .map(|alternative| &alternative.item.statements),
                scope,
                instances,
            ),
            _ => {}
        }
    }
}

fn collect_nested<'a>(
    label: Option<&'a Identifier>,
    bodies: impl Iterator<Item = &'a Vec<LabeledConcurrentStatement>>,
    scope: &mut Vec<&'a Identifier>,
    instances: &mut Vec<FoundInstance<'a>>,
) {
    if let Some(label) = label {
        scope.push(label);
    }
    for body in bodies {
        collect_instances(body, scope, instances);
    }
    if label.is_some() {
        scope.pop();
    }
}

/// Finds a concurrent statement by its label anywhere in the statement tree
pub struct FindLabel<'n> {
    label: &'n str,
    pub found_scope: Option<Vec<String>>,
}

impl<'n> FindLabel<'n> {
    pub fn new(label: &'n str) -> FindLabel<'n> {
        FindLabel {
            label,
            found_scope: None,
        }
    }
}

impl Searcher for FindLabel<'_> {
    fn search_concurrent(
        &mut self,
        scope: &Scope<'_>,
        stmt: &LabeledConcurrentStatement,
    ) -> SearchState {
        match stmt.label {
            Some(ref label) if label.matches(self.label) => {
                self.found_scope = Some(scope.iter().map(|ident| ident.name().to_owned()).collect());
                Finished(Found)
            }
            _ => NotFinished,
        }
    }
}

/// Counts processes and the sequential statements within them
#[derive(Default)]
pub struct StatementCounter {
    pub processes: usize,
    pub sequential: usize,
}

impl Searcher for StatementCounter {
    fn search_concurrent(
        &mut self,
        _scope: &Scope<'_>,
        stmt: &LabeledConcurrentStatement,
    ) -> SearchState {
        if let ConcurrentStatement::Process(..) = stmt.statement {
            self.processes += 1;
        }
        NotFinished
    }

    fn search_sequential(&mut self, _stmt: &LabeledSequentialStatement) -> SearchState {
        self.sequential += 1;
        NotFinished
    }
}

impl StatementCounter {
    pub fn count(statements: &[LabeledConcurrentStatement]) -> StatementCounter {
        let mut counter = StatementCounter::default();
        for stmt in statements {
            let _ = stmt.search(&mut counter);
        }
        counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn instance(label: &str, name: &str) -> LabeledConcurrentStatement {
        LabeledConcurrentStatement::instance(label, InstantiatedUnit::component(name).unwrap())
            .unwrap()
    }

    fn design() -> Vec<LabeledConcurrentStatement> {
        let gen = ForGenerateStatement {
            index_name: Identifier::new("i").unwrap(),
            discrete_range: DiscreteRange::Range(Range::new(
                Expression::integer(0),
                Direction::Ascending,
                Expression::integer(3),
            )),
            body: GenerateBody {
                statements: vec![instance("lane", "lane_ctrl")],
                ..GenerateBody::default()
            },
        };
        let block = BlockStatement {
            statements: vec![
                LabeledConcurrentStatement::new(
                    Some("gen_lanes"),
                    ConcurrentStatement::ForGenerate(gen),
                )
                .unwrap(),
            ],
            ..BlockStatement::default()
        };
        let process = ProcessStatement {
            statements: vec![
                LabeledSequentialStatement::new(None, SequentialStatement::Null).unwrap(),
                LabeledSequentialStatement::new(
                    None,
                    SequentialStatement::Loop(LoopStatement {
                        iteration_scheme: None,
                        statements: vec![LabeledSequentialStatement::new(
                            None,
                            SequentialStatement::Wait(WaitStatement::default()),
                        )
                        .unwrap()],
                    }),
                )
                .unwrap(),
            ],
            ..ProcessStatement::default()
        };

        vec![
            instance("u_top", "ctrl"),
            LabeledConcurrentStatement::block("blk", block).unwrap(),
            LabeledConcurrentStatement::process(None, process).unwrap(),
        ]
    }

    #[test]
    fn collects_nested_instances_in_order() {
        let statements = design();
        let found = find_instances(&statements);
        assert_eq!(
            found.iter().map(|inst| inst.path()).collect::<Vec<_>>(),
            vec!["u_top", "blk.gen_lanes.lane"]
        );
        assert_eq!(found[1].instance.unit.name().to_string(), "lane_ctrl");
    }

    #[test]
    fn finds_label_with_scope() {
        let statements = design();
        let mut searcher = FindLabel::new("LANE");
        assert_eq!(statements.search(&mut searcher), Found);
        assert_eq!(
            searcher.found_scope,
            Some(vec!["blk".to_owned(), "gen_lanes".to_owned()])
        );

        let mut searcher = FindLabel::new("missing");
        assert_eq!(statements.search(&mut searcher), NotFound);
    }

    #[test]
    fn counts_processes_and_sequential_statements() {
        let counter = StatementCounter::count(&design());
        assert_eq!(counter.processes, 1);
        assert_eq!(counter.sequential, 3);
    }
}
