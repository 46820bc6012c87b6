// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2018, Olof Kraigher olof.kraigher@gmail.com

//! The VHDL language model.
//!
//! Nodes are plain values owned by their enclosing node. Design units are owned
//! by the [`Document`](crate::Document) they are registered in and refer to
//! other units through handles stored in [`Reference`] slots, which the link
//! pass of [`Design::analyze`](crate::Design::analyze) fills in.
//!
//! Below the design unit, ownership is purely structural and no node knows
//! its parent. Only design units have a back reference, through their
//! [`UnitId`] to the owning document and its library.

mod display;
mod util;

mod any_design_unit;

pub mod search;

pub use self::any_design_unit::*;
pub use self::util::*;

use crate::data::*;
use crate::design::{LibraryId, UnitId};

/// LRM 15.8 Bit string literals
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum BaseSpecifier {
    B,
    O,
    X,
    UB,
    UO,
    UX,
    SB,
    SO,
    SX,
    D,
}

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum Operator {
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Xnor,
    Abs,
    Not,
    Minus,
    Plus,
    QueQue, // ?? conditional operator

    EQ,
    NE,
    LT,
    LTE,
    GT,
    GTE,
    QueEQ,
    QueNE,
    QueLT,
    QueLTE,
    QueGT,
    QueGTE,

    SLL,
    SRL,
    SLA,
    SRA,
    ROL,
    ROR,

    Concat,

    Times,
    Div,
    Mod,
    Rem,

    Pow,
}

/// LRM 9.2 Operators, grouped by precedence from lowest to highest
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, PartialOrd, Ord)]
pub enum OperatorClass {
    Condition,
    Logical,
    Relational,
    Matching,
    Shift,
    Adding,
    Sign,
    Multiplying,
    Miscellaneous,
}

/// LRM 8.6 Attribute names
#[derive(PartialEq, Debug, Clone)]
pub struct AttributeName {
    pub name: Name,
    pub attr: Identifier,
    pub expr: Option<Box<Expression>>,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum TypeAttribute {
    Subtype,
    Element,
}

/// LRM 8. Names
#[derive(PartialEq, Debug, Clone)]
pub enum Name {
    Simple(Identifier),
    Selected(Box<Name>, Identifier),
    SelectedAll(Box<Name>),
    Slice(Box<Name>, Box<DiscreteRange>),
    Attribute(Box<AttributeName>),
    CallOrIndexed(Box<CallOrIndexed>),
}

/// LRM 9.3.4 Function calls
#[derive(PartialEq, Debug, Clone)]
pub struct CallOrIndexed {
    pub name: Name,
    pub parameters: Vec<AssociationElement>,
}

/// LRM 9.3.3 Aggregates
#[derive(PartialEq, Debug, Clone)]
pub enum Choice {
    Expression(Expression),
    DiscreteRange(DiscreteRange),
    Others,
}

/// LRM 9.3.3 Aggregates
#[derive(PartialEq, Debug, Clone)]
pub enum ElementAssociation {
    Positional(Expression),
    Named(Vec<Choice>, Expression),
}

/// LRM 6.5.7 Association Lists
#[derive(PartialEq, Debug, Clone)]
pub enum ActualPart {
    Expression(Expression),
    Open,
}

/// LRM 6.5.7 Association Lists
#[derive(PartialEq, Debug, Clone)]
pub struct AssociationElement {
    pub formal: Option<Name>,
    pub actual: ActualPart,
}

/// LRM 6.5.7.2 Generic map aspects and 6.5.7.3 Port map aspects
pub type MapAspect = Vec<AssociationElement>;

/// LRM 15.5 Abstract literals
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum AbstractLiteral {
    Integer(u64),
    Real(f64),
}

/// LRM 15.8 Bit string literals
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct BitString {
    pub length: Option<u32>,
    pub base: BaseSpecifier,
    pub value: String,
}

/// LRM 5.2.4 Physical types
#[derive(PartialEq, Debug, Clone)]
pub struct PhysicalLiteral {
    pub value: AbstractLiteral,
    pub unit: Identifier,
}

/// LRM 9.3.2 Literals
#[derive(PartialEq, Debug, Clone)]
pub enum Literal {
    Integer(u64),
    Real(f64),
    Physical(PhysicalLiteral),
    Enumeration(Identifier),
    Character(char),
    String(String),
    BitString(BitString),
    Null,
}

/// LRM 9.3.7 Allocators
#[derive(PartialEq, Debug, Clone)]
pub enum Allocator {
    Qualified(QualifiedExpression),
    Subtype(SubtypeIndication),
}

/// LRM 9.3.5 Qualified expressions
#[derive(PartialEq, Debug, Clone)]
pub struct QualifiedExpression {
    pub type_mark: TypeMark,
    pub expr: Expression,
}

/// VHDL-2019 conditional expression, `when_true when condition else when_false`
#[derive(PartialEq, Debug, Clone)]
pub struct ConditionalExpression {
    pub when_true: Expression,
    pub condition: Expression,
    pub when_false: Expression,
}

/// LRM 9. Expressions
#[derive(PartialEq, Debug, Clone)]
pub enum Expression {
    Binary(Operator, Box<Expression>, Box<Expression>),
    Unary(Operator, Box<Expression>),
    Ternary(Box<ConditionalExpression>),

    /// LRM 9.3.3 Aggregates
    Aggregate(Vec<ElementAssociation>),

    /// LRM 9.3.5 Qualified expressions
    Qualified(Box<QualifiedExpression>),

    /// LRM 8 Names
    Name(Box<Name>),

    /// LRM 9.3.2 Literals
    Literal(Literal),

    /// LRM 9.3.7 Allocators
    New(Box<Allocator>),

    /// A parenthesized sub expression
    Parenthesized(Box<Expression>),
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Direction {
    Ascending,
    Descending,
}

/// LRM discrete_range
/// discrete_range ::= discrete_subtype_indication | range
/// range ::=
///     range_attribute_name
///   | simple_expression direction simple_expression
#[derive(PartialEq, Debug, Clone)]
pub enum DiscreteRange {
    Discrete(TypeMark, Option<Range>),
    Range(Range),
}

#[derive(PartialEq, Debug, Clone)]
pub struct RangeConstraint {
    pub direction: Direction,
    pub left_expr: Box<Expression>,
    pub right_expr: Box<Expression>,
}

#[derive(PartialEq, Debug, Clone)]
pub enum Range {
    Range(RangeConstraint),
    Attribute(Box<AttributeName>),
}

/// LRM: record_element_constraint
#[derive(PartialEq, Debug, Clone)]
pub struct ElementConstraint {
    pub ident: Identifier,
    pub constraint: Box<SubtypeConstraint>,
}

#[derive(PartialEq, Debug, Clone)]
pub enum SubtypeConstraint {
    Range(Range),
    /// Empty Vec means Open
    Array(Vec<DiscreteRange>, Option<Box<SubtypeConstraint>>),
    Record(Vec<ElementConstraint>),
}

/// LRM 6.3 Subtype declarations
#[derive(PartialEq, Debug, Clone)]
pub enum ResolutionIndication {
    FunctionName(Name),
    ArrayElement(Name),
    Unresolved,
}

#[derive(PartialEq, Debug, Clone)]
pub struct TypeMark {
    pub name: Name,
    pub attr: Option<TypeAttribute>,
}

/// LRM 6.3 Subtype declarations
#[derive(PartialEq, Debug, Clone)]
pub struct SubtypeIndication {
    pub resolution: ResolutionIndication,
    pub type_mark: TypeMark,
    pub constraint: Option<SubtypeConstraint>,
}

/// LRM 5.3 Array Types
#[derive(PartialEq, Debug, Clone)]
pub enum ArrayIndex {
    /// Unbounded
    /// {identifier} range <>
    IndexSubtypeDefintion(TypeMark),

    /// Constraint
    Discrete(DiscreteRange),
}

/// LRM 5.3.3 Record types
#[derive(PartialEq, Debug, Clone)]
pub struct ElementDeclaration {
    pub ident: Identifier,
    pub subtype: SubtypeIndication,
}

/// LRM 5.2.4 Physical types
#[derive(PartialEq, Debug, Clone)]
pub struct PhysicalTypeDeclaration {
    pub range: Range,
    pub primary_unit: Identifier,
    pub secondary_units: Vec<(Identifier, PhysicalLiteral)>,
}

/// LRM 5.6.2 Protected type declarations
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ProtectedTypeDeclaration {
    pub items: Vec<SubprogramDeclaration>,
}

/// LRM 5.6.3 Protected type bodies
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ProtectedTypeBody {
    pub decl: Vec<Declaration>,
}

/// LRM 5.2.2 Enumeration types
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum EnumerationLiteral {
    Identifier(Identifier),
    Character(char),
}

/// LRM 5 Types
#[derive(PartialEq, Debug, Clone)]
pub enum TypeDefinition {
    /// LRM 5.2 Scalar Types
    /// LRM 5.2.2 Enumeration types
    Enumeration(Vec<EnumerationLiteral>),
    /// LRM 5.2.3 Integer types
    Integer(Range),
    /// LRM 5.2.5 Floating-point types
    Real(Range),
    /// LRM 5.2.4 Physical types
    Physical(PhysicalTypeDeclaration),
    /// LRM 5.3 Composite Types
    /// LRM 5.3.2 Array types
    Array(Vec<ArrayIndex>, SubtypeIndication),
    /// LRM 5.3.3 Record types
    Record(Vec<ElementDeclaration>),
    /// LRM 5.4 Access types
    Access(SubtypeIndication),
    /// LRM 5.4.2 Incomplete type declarations
    Incomplete,
    /// LRM 5.5 File types
    File(TypeMark),
    /// LRM 5.6 Protected types
    Protected(ProtectedTypeDeclaration),
    ProtectedBody(ProtectedTypeBody),
    /// LRM 6.3 Subtype declarations
    Subtype(SubtypeIndication),
}

/// LRM 6.2 Type declarations
#[derive(PartialEq, Debug, Clone)]
pub struct TypeDeclaration {
    pub ident: Identifier,
    pub def: TypeDefinition,
    pub documentation: Option<String>,
}

/// LRM 6.4.2 Object Declarations
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum ObjectClass {
    Constant,
    Variable,
    Signal,
    File,
}

/// The interface list an object is declared in, `None` for plain object declarations
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Default)]
pub enum InterfaceRole {
    #[default]
    None,
    Generic,
    Port,
    Parameter,
}

/// LRM 6.5.2 Interface object declarations
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Default)]
pub enum Mode {
    #[default]
    In,
    Out,
    InOut,
    Buffer,
    Linkage,
}

/// LRM 6.4.2.5 File declarations
#[derive(PartialEq, Debug, Clone)]
pub struct FileOpenInformation {
    pub open_kind: Option<Expression>,
    pub file_name: Expression,
}

/// Any object declaration: constants, variables, signals and files, both as
/// plain declarations and as generic, port or parameter interface items.
///
/// The class and role tags decide which of the optional parts are allowed,
/// see [`ObjectDeclaration::has_mode`] and [`ObjectDeclaration::allows_default`].
#[derive(PartialEq, Debug, Clone)]
pub struct ObjectDeclaration {
    pub class: ObjectClass,
    pub role: InterfaceRole,
    pub idents: Vec<Identifier>,
    pub subtype_indication: SubtypeIndication,
    pub mode: Option<Mode>,
    pub expression: Option<Expression>,
    pub shared: bool,
    pub file_open: Option<FileOpenInformation>,
    pub documentation: Option<String>,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum SubprogramDesignator {
    Identifier(Identifier),
    OperatorSymbol(Operator),
}

/// LRM 4.2 Subprogram declaration
#[derive(PartialEq, Debug, Clone)]
pub struct ProcedureSpecification {
    pub designator: SubprogramDesignator,
    pub parameter_list: Vec<InterfaceDeclaration>,
}

/// LRM 4.2 Subprogram declaration
#[derive(PartialEq, Debug, Clone)]
pub struct FunctionSpecification {
    pub pure: bool,
    pub designator: SubprogramDesignator,
    pub parameter_list: Vec<InterfaceDeclaration>,
    pub return_type: TypeMark,
}

#[derive(PartialEq, Debug, Clone)]
pub enum SubprogramSpecification {
    Procedure(ProcedureSpecification),
    Function(FunctionSpecification),
}

/// LRM 4.2 Subprogram declarations
#[derive(PartialEq, Debug, Clone)]
pub struct SubprogramDeclaration {
    pub specification: SubprogramSpecification,
    pub documentation: Option<String>,
}

/// LRM 4.3 Subprogram bodies
#[derive(PartialEq, Debug, Clone)]
pub struct SubprogramBody {
    pub specification: SubprogramSpecification,
    pub declarations: Vec<Declaration>,
    pub statements: Vec<LabeledSequentialStatement>,
    pub documentation: Option<String>,
}

#[derive(PartialEq, Debug, Clone)]
pub enum SubprogramDefault {
    Name(Name),
    Box,
}

/// LRM 6.5.5 Interface package declaration
#[derive(PartialEq, Debug, Clone)]
pub enum InterfacePackageGenericMapAspect {
    Map(MapAspect),
    Box,
    Default,
}

/// LRM 6.5.5 Interface package declaration
#[derive(PartialEq, Debug, Clone)]
pub struct InterfacePackageDeclaration {
    pub ident: Identifier,
    pub package_name: Name,
    pub generic_map: InterfacePackageGenericMapAspect,
}

/// LRM 6.5 Interface declarations
#[derive(PartialEq, Debug, Clone)]
pub enum InterfaceDeclaration {
    Object(ObjectDeclaration),
    /// LRM 6.5.3 Interface type declarations
    Type(Identifier),
    /// LRM 6.5.4 Interface subprogram declarations
    Subprogram(SubprogramSpecification, Option<SubprogramDefault>),
    /// LRM 6.5.5 Interface package declaration
    Package(InterfacePackageDeclaration),
}

/// LRM 6.6 Alias declarations
#[derive(PartialEq, Debug, Clone)]
pub struct AliasDeclaration {
    pub designator: Identifier,
    pub subtype_indication: Option<SubtypeIndication>,
    pub name: Name,
}

/// LRM 6.7 Attribute declarations
#[derive(PartialEq, Debug, Clone)]
pub struct AttributeDeclaration {
    pub ident: Identifier,
    pub type_mark: TypeMark,
}

/// LRM 7.2 Attribute specification
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum EntityName {
    Name(Identifier),
    All,
    Others,
}

/// LRM 7.2 Attribute specification
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum EntityClass {
    Entity,
    Architecture,
    Configuration,
    Procedure,
    Function,
    Package,
    Type,
    Subtype,
    Constant,
    Signal,
    Variable,
    Component,
    Label,
    Literal,
    Units,
    File,
}

/// LRM 7.2 Attribute specification
#[derive(PartialEq, Debug, Clone)]
pub struct AttributeSpecification {
    pub ident: Identifier,
    pub entity_name: EntityName,
    pub entity_class: EntityClass,
    pub expr: Expression,
}

/// LRM 7.2 Attribute specification
#[derive(PartialEq, Debug, Clone)]
pub enum Attribute {
    Specification(AttributeSpecification),
    Declaration(AttributeDeclaration),
}

/// LRM 6.8 Component declarations
#[derive(PartialEq, Debug, Clone)]
pub struct ComponentDeclaration {
    pub ident: Identifier,
    pub generic_list: Vec<InterfaceDeclaration>,
    pub port_list: Vec<InterfaceDeclaration>,
    pub documentation: Option<String>,
}

/// LRM 4.9 Package instantiation declaration
#[derive(PartialEq, Debug, Clone)]
pub struct PackageInstantiation {
    pub ident: Identifier,
    pub package_name: Name,
    pub generic_map: Option<MapAspect>,
}

#[derive(PartialEq, Debug, Clone)]
pub enum Declaration {
    Object(ObjectDeclaration),
    Type(TypeDeclaration),
    Component(ComponentDeclaration),
    Attribute(Attribute),
    Alias(AliasDeclaration),
    SubprogramDeclaration(SubprogramDeclaration),
    SubprogramBody(SubprogramBody),
    Use(UseClause),
    Package(PackageInstantiation),
    Configuration(ConfigurationSpecification),
}

/// LRM 10.2 Wait statement
#[derive(PartialEq, Debug, Clone, Default)]
pub struct WaitStatement {
    pub sensitivity_clause: Vec<Name>,
    pub condition_clause: Option<Expression>,
    pub timeout_clause: Option<Expression>,
}

/// LRM 10.3 Assertion statement
#[derive(PartialEq, Debug, Clone)]
pub struct AssertStatement {
    pub condition: Expression,
    pub report: Option<Expression>,
    pub severity: Option<Expression>,
}

/// LRM 10.4 Report statement
#[derive(PartialEq, Debug, Clone)]
pub struct ReportStatement {
    pub severity: Option<Expression>,
    pub report: Expression,
}

/// LRM 10.5 Signal assignment statement
#[derive(PartialEq, Debug, Clone)]
pub enum Target {
    Name(Name),
    Aggregate(Vec<ElementAssociation>),
}

/// LRM 10.5 Signal assignment statement
#[derive(PartialEq, Debug, Clone)]
pub struct WaveformElement {
    pub value: Expression,
    pub after: Option<Expression>,
}

/// LRM 10.5 Signal assignment statement
#[derive(PartialEq, Debug, Clone)]
pub enum Waveform {
    Elements(Vec<WaveformElement>),
    Unaffected,
}

/// LRM 10.5 Signal assignment statement
#[derive(PartialEq, Debug, Clone)]
pub enum DelayMechanism {
    Transport,
    Inertial { reject: Option<Expression> },
}

/// LRM 10.5 Signal assignment statement
#[derive(PartialEq, Debug, Clone)]
pub struct SignalAssignment {
    pub target: Target,
    pub delay_mechanism: Option<DelayMechanism>,
    pub rhs: AssignmentRightHand<Waveform>,
}

/// LRM 10.6 Variable assignment statement
#[derive(PartialEq, Debug, Clone)]
pub struct VariableAssignment {
    pub target: Target,
    pub rhs: AssignmentRightHand<Expression>,
}

/// LRM 10.5 Signal assignment statement
/// LRM 10.6 Variable assignment statement
#[derive(PartialEq, Debug, Clone)]
pub enum AssignmentRightHand<T> {
    Simple(T),
    Conditional(Conditionals<T>),
    Selected(Selection<T>),
}

#[derive(PartialEq, Debug, Clone)]
pub struct Conditional<T> {
    pub condition: Expression,
    pub item: T,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Conditionals<T> {
    pub conditionals: Vec<Conditional<T>>,
    pub else_item: Option<T>,
}

/// LRM 10.8 If statement
#[derive(PartialEq, Debug, Clone)]
pub struct IfStatement {
    pub conds: Conditionals<Vec<LabeledSequentialStatement>>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Alternative<T> {
    pub choices: Vec<Choice>,
    pub item: T,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Selection<T> {
    pub expression: Expression,
    pub alternatives: Vec<Alternative<T>>,
}

/// LRM 10.9 Case statement
#[derive(PartialEq, Debug, Clone)]
pub struct CaseStatement {
    pub is_matching: bool,
    pub expression: Expression,
    pub alternatives: Vec<Alternative<Vec<LabeledSequentialStatement>>>,
}

/// LRM 10.10 Loop statement
#[derive(PartialEq, Debug, Clone)]
pub enum IterationScheme {
    While(Expression),
    For(Identifier, DiscreteRange),
}

/// LRM 10.10 Loop statement. Without iteration scheme the loop is endless.
#[derive(PartialEq, Debug, Clone)]
pub struct LoopStatement {
    pub iteration_scheme: Option<IterationScheme>,
    pub statements: Vec<LabeledSequentialStatement>,
}

/// LRM 10.11 Next statement
#[derive(PartialEq, Debug, Clone, Default)]
pub struct NextStatement {
    pub loop_label: Option<Identifier>,
    pub condition: Option<Expression>,
}

/// LRM 10.12 Exit statement
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ExitStatement {
    pub loop_label: Option<Identifier>,
    pub condition: Option<Expression>,
}

/// LRM 10.13 Return statement
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ReturnStatement {
    pub expression: Option<Expression>,
}

/// LRM 10. Sequential statements
#[derive(PartialEq, Debug, Clone)]
pub enum SequentialStatement {
    Wait(WaitStatement),
    Assert(AssertStatement),
    Report(ReportStatement),
    VariableAssignment(VariableAssignment),
    SignalAssignment(SignalAssignment),
    ProcedureCall(CallOrIndexed),
    If(IfStatement),
    Case(CaseStatement),
    Loop(LoopStatement),
    Next(NextStatement),
    Exit(ExitStatement),
    Return(ReturnStatement),
    Null,
}

/// LRM 10. Sequential statements
#[derive(PartialEq, Debug, Clone)]
pub struct LabeledSequentialStatement {
    pub label: Option<Identifier>,
    pub statement: SequentialStatement,
}

/// LRM 11.2 Block statement
#[derive(PartialEq, Debug, Clone, Default)]
pub struct BlockStatement {
    pub guard_condition: Option<Expression>,
    pub header: BlockHeader,
    pub decl: Vec<Declaration>,
    pub statements: Vec<LabeledConcurrentStatement>,
}

/// LRM 11.2 Block statement
#[derive(PartialEq, Debug, Clone, Default)]
pub struct BlockHeader {
    pub generic_clause: Option<Vec<InterfaceDeclaration>>,
    pub generic_map: Option<MapAspect>,
    pub port_clause: Option<Vec<InterfaceDeclaration>>,
    pub port_map: Option<MapAspect>,
}

#[derive(PartialEq, Debug, Clone)]
pub enum SensitivityList {
    Names(Vec<Name>),
    All,
}

/// LRM 11.3 Process statement
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ProcessStatement {
    pub postponed: bool,
    pub sensitivity_list: Option<SensitivityList>,
    pub decl: Vec<Declaration>,
    pub statements: Vec<LabeledSequentialStatement>,
    pub documentation: Option<String>,
}

/// LRM 11.4 Concurrent procedure call statements
#[derive(PartialEq, Debug, Clone)]
pub struct ConcurrentProcedureCall {
    pub postponed: bool,
    pub call: CallOrIndexed,
}

/// LRM 11.5 Concurrent assertion statements
#[derive(PartialEq, Debug, Clone)]
pub struct ConcurrentAssertStatement {
    pub postponed: bool,
    pub statement: AssertStatement,
}

/// 11.6 Concurrent signal assignment statements
#[derive(PartialEq, Debug, Clone)]
pub struct ConcurrentSignalAssignment {
    pub postponed: bool,
    pub guarded: bool,
    pub target: Target,
    pub delay_mechanism: Option<DelayMechanism>,
    pub rhs: AssignmentRightHand<Waveform>,
}

/// 11.7 Component instantiation statements
#[derive(PartialEq, Debug, Clone)]
pub enum InstantiatedUnit {
    Component(Name),
    Entity(Name, Option<Identifier>),
    Configuration(Name),
}

/// 11.7 Component instantiation statements
#[derive(PartialEq, Debug, Clone)]
pub struct InstantiationStatement {
    pub unit: InstantiatedUnit,
    pub generic_map: Option<MapAspect>,
    pub port_map: Option<MapAspect>,
}

/// 11.8 Generate statements
#[derive(PartialEq, Debug, Clone, Default)]
pub struct GenerateBody {
    pub alternative_label: Option<Identifier>,
    pub decl: Option<Vec<Declaration>>,
    pub statements: Vec<LabeledConcurrentStatement>,
}

/// 11.8 Generate statements
#[derive(PartialEq, Debug, Clone)]
pub struct ForGenerateStatement {
    pub index_name: Identifier,
    pub discrete_range: DiscreteRange,
    pub body: GenerateBody,
}

/// 11.8 Generate statements
#[derive(PartialEq, Debug, Clone)]
pub struct IfGenerateStatement {
    pub conds: Conditionals<GenerateBody>,
}

/// 11.8 Generate statements
#[derive(PartialEq, Debug, Clone)]
pub struct CaseGenerateStatement {
    pub sels: Selection<GenerateBody>,
}

/// LRM 11. Concurrent statements
#[derive(PartialEq, Debug, Clone)]
pub enum ConcurrentStatement {
    ProcedureCall(ConcurrentProcedureCall),
    Block(BlockStatement),
    Process(ProcessStatement),
    Assert(ConcurrentAssertStatement),
    Assignment(ConcurrentSignalAssignment),
    Instance(InstantiationStatement),
    ForGenerate(ForGenerateStatement),
    IfGenerate(IfGenerateStatement),
    CaseGenerate(CaseGenerateStatement),
}

/// LRM 11. Concurrent statements
#[derive(PartialEq, Debug, Clone)]
pub struct LabeledConcurrentStatement {
    pub label: Option<Identifier>,
    pub statement: ConcurrentStatement,
}

/// What a [`Reference`] resolved to
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum RefTarget {
    Library(LibraryId),
    Unit(UnitId),
}

/// A resolved-or-unresolved link from a name to a library or design unit.
/// Filled in by the link pass, cleared when the design is modified.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Default)]
pub struct Reference(Option<RefTarget>);

impl Reference {
    pub fn undefined() -> Reference {
        Reference(None)
    }

    pub fn get(&self) -> Option<RefTarget> {
        self.0
    }

    pub fn is_defined(&self) -> bool {
        self.0.is_some()
    }

    pub fn set(&mut self, target: RefTarget) {
        self.0 = Some(target);
    }

    pub fn set_opt(&mut self, target: Option<RefTarget>) {
        self.0 = target;
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn library(&self) -> Option<LibraryId> {
        match self.0 {
            Some(RefTarget::Library(id)) => Some(id),
            _ => None,
        }
    }

    pub fn unit(&self) -> Option<UnitId> {
        match self.0 {
            Some(RefTarget::Unit(id)) => Some(id),
            _ => None,
        }
    }
}

/// An item which has a reference to a library or design unit
#[derive(PartialEq, Debug, Clone)]
pub struct WithRef<T> {
    pub item: T,
    pub reference: Reference,
}

impl<T> WithRef<T> {
    pub fn new(item: T) -> WithRef<T> {
        WithRef {
            item,
            reference: Reference::undefined(),
        }
    }
}

impl<T> From<T> for WithRef<T> {
    fn from(value: T) -> Self {
        WithRef::new(value)
    }
}

/// LRM 13.2 Design libraries
#[derive(PartialEq, Debug, Clone)]
pub struct LibraryClause {
    pub name_list: Vec<WithRef<Identifier>>,
}

/// LRM 12.4. Use clauses
#[derive(PartialEq, Debug, Clone)]
pub struct UseClause {
    pub name_list: Vec<WithRef<Name>>,
}

/// LRM 13.4 Context clauses
#[derive(PartialEq, Debug, Clone)]
pub struct ContextReference {
    pub name_list: Vec<WithRef<Name>>,
}

/// LRM 13.4 Context clauses
#[derive(PartialEq, Debug, Clone)]
pub enum ContextItem {
    Use(UseClause),
    Library(LibraryClause),
    Context(ContextReference),
}

pub type ContextClause = Vec<ContextItem>;

/// LRM 13.4 Context clauses
#[derive(PartialEq, Debug, Clone)]
pub struct ContextDeclaration {
    pub ident: Identifier,
    pub items: ContextClause,
    pub documentation: Option<String>,
}

/// LRM 7.3 Configuration specification
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum InstantiationList {
    Labels(Vec<Identifier>),
    Others,
    All,
}

/// LRM 7.3.2 Binding indication
#[derive(PartialEq, Debug, Clone)]
pub enum EntityAspect {
    Entity(Name, Option<Identifier>),
    Configuration(Name),
    Open,
}

/// LRM 7.3.2 Binding indication
#[derive(PartialEq, Debug, Clone)]
pub struct BindingIndication {
    pub entity_aspect: Option<EntityAspect>,
    pub generic_map: Option<MapAspect>,
    pub port_map: Option<MapAspect>,
}

/// LRM 7.3 Configuration specification
#[derive(PartialEq, Debug, Clone)]
pub struct ComponentSpecification {
    pub instantiation_list: InstantiationList,
    pub component_name: Name,
}

/// LRM 7.3 Configuration specification
#[derive(PartialEq, Debug, Clone)]
pub struct ConfigurationSpecification {
    pub spec: ComponentSpecification,
    pub bind_ind: BindingIndication,
}

/// LRM 3.4 Configuration declarations
#[derive(PartialEq, Debug, Clone)]
pub struct ComponentConfiguration {
    pub spec: ComponentSpecification,
    pub bind_ind: Option<BindingIndication>,
    pub block_config: Option<BlockConfiguration>,
}

/// LRM 3.4 Configuration declarations
#[derive(PartialEq, Debug, Clone)]
pub enum ConfigurationItem {
    Block(BlockConfiguration),
    Component(ComponentConfiguration),
}

/// LRM 3.4 Configuration declarations
#[derive(PartialEq, Debug, Clone)]
pub struct BlockConfiguration {
    pub block_spec: Name,
    pub use_clauses: Vec<UseClause>,
    pub items: Vec<ConfigurationItem>,
}

/// LRM 3.4 Configuration declarations
#[derive(PartialEq, Debug, Clone)]
pub struct ConfigurationDeclaration {
    pub context_clause: ContextClause,
    pub ident: Identifier,
    pub entity_name: WithRef<Name>,
    pub decl: Vec<UseClause>,
    pub block_config: Option<BlockConfiguration>,
    pub documentation: Option<String>,
}

/// LRM 3.2 Entity declarations
#[derive(PartialEq, Debug, Clone)]
pub struct EntityDeclaration {
    pub context_clause: ContextClause,
    pub ident: Identifier,
    pub generic_clause: Option<Vec<InterfaceDeclaration>>,
    pub port_clause: Option<Vec<InterfaceDeclaration>>,
    pub decl: Vec<Declaration>,
    pub statements: Vec<LabeledConcurrentStatement>,
    pub documentation: Option<String>,
}

/// LRM 3.3 Architecture bodies
#[derive(PartialEq, Debug, Clone)]
pub struct ArchitectureBody {
    pub context_clause: ContextClause,
    pub ident: Identifier,
    pub entity_name: WithRef<Identifier>,
    pub decl: Vec<Declaration>,
    pub statements: Vec<LabeledConcurrentStatement>,
    pub documentation: Option<String>,
}

/// LRM 4.7 Package declarations
#[derive(PartialEq, Debug, Clone)]
pub struct PackageDeclaration {
    pub context_clause: ContextClause,
    pub ident: Identifier,
    pub generic_clause: Option<Vec<InterfaceDeclaration>>,
    pub decl: Vec<Declaration>,
    pub documentation: Option<String>,
}

/// LRM 4.8 Package bodies. The identifier names the package it implements.
#[derive(PartialEq, Debug, Clone)]
pub struct PackageBody {
    pub context_clause: ContextClause,
    pub ident: WithRef<Identifier>,
    pub decl: Vec<Declaration>,
    pub documentation: Option<String>,
}

/// LRM 13.1 Design units
#[derive(PartialEq, Debug, Clone)]
pub enum AnyPrimaryUnit {
    /// LRM 3.2 Entity declaration
    Entity(EntityDeclaration),

    /// LRM 3.4 Configuration declarations
    Configuration(ConfigurationDeclaration),

    /// LRM 4.7 Package declarations
    Package(PackageDeclaration),

    /// LRM 13.4 Context clauses
    Context(ContextDeclaration),
}

/// LRM 13.1 Design units
#[derive(PartialEq, Debug, Clone)]
pub enum AnySecondaryUnit {
    /// LRM 3.3 Architecture bodies
    Architecture(ArchitectureBody),

    /// LRM 4.8 Package bodies
    PackageBody(PackageBody),
}

/// LRM 13.1 Design units
#[derive(PartialEq, Debug, Clone)]
pub enum AnyDesignUnit {
    Primary(AnyPrimaryUnit),
    Secondary(AnySecondaryUnit),
}
