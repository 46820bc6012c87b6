// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2018, Olof Kraigher olof.kraigher@gmail.com

//! Implementation of Display

use super::*;
use std::fmt::{Display, Formatter, Result};

fn write_separated<T: Display>(f: &mut Formatter<'_>, items: &[T], sep: &str) -> Result {
    let mut first = true;
    for item in items {
        if first {
            write!(f, "{item}")?;
        } else {
            write!(f, "{sep}{item}")?;
        }
        first = false;
    }
    Ok(())
}

/// Write `(a, b, c)` or nothing at all for an empty list
fn write_parenthesized<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> Result {
    if items.is_empty() {
        return Ok(());
    }
    write!(f, "(")?;
    write_separated(f, items, ", ")?;
    write!(f, ")")
}

impl Display for BaseSpecifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            BaseSpecifier::B => write!(f, "b"),
            BaseSpecifier::O => write!(f, "o"),
            BaseSpecifier::X => write!(f, "x"),
            BaseSpecifier::UB => write!(f, "ub"),
            BaseSpecifier::UO => write!(f, "uo"),
            BaseSpecifier::UX => write!(f, "ux"),
            BaseSpecifier::SB => write!(f, "sb"),
            BaseSpecifier::SO => write!(f, "so"),
            BaseSpecifier::SX => write!(f, "sx"),
            BaseSpecifier::D => write!(f, "d"),
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Operator::And => write!(f, "and"),
            Operator::Or => write!(f, "or"),
            Operator::Nand => write!(f, "nand"),
            Operator::Nor => write!(f, "nor"),
            Operator::Xor => write!(f, "xor"),
            Operator::Xnor => write!(f, "xnor"),
            Operator::EQ => write!(f, "="),
            Operator::NE => write!(f, "/="),
            Operator::LT => write!(f, "<"),
            Operator::LTE => write!(f, "<="),
            Operator::GT => write!(f, ">"),
            Operator::GTE => write!(f, ">="),
            Operator::QueEQ => write!(f, "?="),
            Operator::QueNE => write!(f, "?/="),
            Operator::QueLT => write!(f, "?<"),
            Operator::QueLTE => write!(f, "?<="),
            Operator::QueGT => write!(f, "?>"),
            Operator::QueGTE => write!(f, "?>="),
            Operator::SLL => write!(f, "sll"),
            Operator::SRL => write!(f, "srl"),
            Operator::SLA => write!(f, "sla"),
            Operator::SRA => write!(f, "sra"),
            Operator::ROL => write!(f, "rol"),
            Operator::ROR => write!(f, "ror"),
            Operator::Plus => write!(f, "+"),
            Operator::Minus => write!(f, "-"),
            Operator::Concat => write!(f, "&"),
            Operator::Times => write!(f, "*"),
            Operator::Div => write!(f, "/"),
            Operator::Mod => write!(f, "mod"),
            Operator::Rem => write!(f, "rem"),
            Operator::Pow => write!(f, "**"),
            Operator::Abs => write!(f, "abs"),
            Operator::Not => write!(f, "not"),
            Operator::QueQue => write!(f, "??"),
        }
    }
}

impl Display for TypeAttribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            TypeAttribute::Subtype => write!(f, "subtype"),
            TypeAttribute::Element => write!(f, "element"),
        }
    }
}

impl Display for AttributeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}'{}", self.name, self.attr)?;
        if let Some(ref expr) = self.expr {
            write!(f, "({expr})")
        } else {
            Ok(())
        }
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Name::Simple(ident) => write!(f, "{ident}"),
            Name::Selected(ref prefix, ref suffix) => write!(f, "{prefix}.{suffix}"),
            Name::SelectedAll(ref prefix) => write!(f, "{prefix}.all"),
            Name::Slice(ref prefix, ref drange) => write!(f, "{prefix}({drange})"),
            Name::Attribute(ref attr) => write!(f, "{attr}"),
            Name::CallOrIndexed(ref fcall) => write!(f, "{fcall}"),
        }
    }
}

impl Display for CallOrIndexed {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.name)?;
        write_parenthesized(f, &self.parameters)
    }
}

impl Display for Choice {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Choice::Expression(ref expr) => write!(f, "{expr}"),
            Choice::DiscreteRange(ref drange) => write!(f, "{drange}"),
            Choice::Others => write!(f, "others"),
        }
    }
}

impl Display for ElementAssociation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ElementAssociation::Positional(ref expr) => write!(f, "{expr}"),
            ElementAssociation::Named(ref choices, ref expr) => {
                write_separated(f, choices, " | ")?;
                write!(f, " => {expr}")
            }
        }
    }
}

impl Display for ActualPart {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ActualPart::Expression(ref expr) => write!(f, "{expr}"),
            ActualPart::Open => write!(f, "open"),
        }
    }
}

impl Display for AssociationElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if let Some(ref formal) = self.formal {
            write!(f, "{formal} => ")?;
        }
        write!(f, "{}", self.actual)
    }
}

impl Display for AbstractLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            AbstractLiteral::Integer(val) => write!(f, "{val}"),
            AbstractLiteral::Real(val) => write!(f, "{val:?}"),
        }
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if let Some(length) = self.length {
            write!(f, "{length}")?;
        }
        write!(f, "{}\"{}\"", self.base, self.value)
    }
}

impl Display for PhysicalLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Literal::Integer(val) => write!(f, "{val}"),
            // Debug formatting keeps the decimal point of whole numbers
            Literal::Real(val) => write!(f, "{val:?}"),
            Literal::Physical(ref val) => write!(f, "{val}"),
            Literal::Enumeration(ref ident) => write!(f, "{ident}"),
            Literal::Character(chr) => write!(f, "'{chr}'"),
            Literal::String(ref val) => write!(f, "\"{}\"", val.replace('"', "\"\"")),
            Literal::BitString(ref val) => write!(f, "{val}"),
            Literal::Null => write!(f, "null"),
        }
    }
}

impl Display for Allocator {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Allocator::Qualified(ref qexpr) => write!(f, "{qexpr}"),
            Allocator::Subtype(ref subtype) => write!(f, "{subtype}"),
        }
    }
}

impl Display for QualifiedExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.expr {
            Expression::Aggregate(..) => write!(f, "{}'{}", self.type_mark, self.expr),
            _ => write!(f, "{}'({})", self.type_mark, self.expr),
        }
    }
}

impl Display for ConditionalExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "{} when {} else {}",
            self.when_true, self.condition, self.when_false
        )
    }
}

fn unary_precedence(op: Operator) -> OperatorClass {
    match op {
        Operator::Plus | Operator::Minus => OperatorClass::Sign,
        Operator::QueQue => OperatorClass::Condition,
        _ => OperatorClass::Miscellaneous,
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Expression::Binary(op, ref lhs, ref rhs) => {
                // Add parentheses as necessary to satisfy order of precedence.
                let precedence = op.class();
                match lhs.as_ref() {
                    Expression::Binary(op, ..) if precedence > op.class() => {
                        write!(f, "({lhs})")?
                    }
                    Expression::Unary(op, ..) if precedence > unary_precedence(*op) => {
                        write!(f, "({lhs})")?
                    }
                    Expression::Ternary(..) => write!(f, "({lhs})")?,
                    _ => write!(f, "{lhs}")?,
                }
                write!(f, " {op} ")?;
                match rhs.as_ref() {
                    Expression::Binary(op, ..) if precedence >= op.class() => {
                        write!(f, "({rhs})")
                    }
                    Expression::Ternary(..) => write!(f, "({rhs})"),
                    _ => write!(f, "{rhs}"),
                }
            }
            Expression::Unary(op, ref expr) => {
                let precedence = unary_precedence(*op);
                if matches!(op, Operator::Minus | Operator::Plus) {
                    write!(f, "{op}")?;
                } else {
                    write!(f, "{op} ")?;
                }
                match expr.as_ref() {
                    // Binary operators having precedence over unary ones is
                    // confusing, so always add parentheses.
                    Expression::Binary(..) | Expression::Ternary(..) => write!(f, "({expr})"),
                    Expression::Unary(op, ..) if precedence == unary_precedence(*op) => {
                        write!(f, "({expr})")
                    }
                    _ => write!(f, "{expr}"),
                }
            }
            Expression::Ternary(ref cond) => write!(f, "{cond}"),
            Expression::Aggregate(ref assocs) => {
                write!(f, "(")?;
                write_separated(f, assocs, ", ")?;
                write!(f, ")")
            }
            Expression::Qualified(ref qexpr) => write!(f, "{qexpr}"),
            Expression::Name(ref name) => write!(f, "{name}"),
            Expression::Literal(ref literal) => write!(f, "{literal}"),
            Expression::New(ref alloc) => write!(f, "new {alloc}"),
            Expression::Parenthesized(ref expr) => write!(f, "({expr})"),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Direction::Ascending => write!(f, "to"),
            Direction::Descending => write!(f, "downto"),
        }
    }
}

impl Display for DiscreteRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            DiscreteRange::Discrete(ref name, ref range) => {
                write!(f, "{name}")?;
                match range {
                    Some(ref range) => write!(f, " range {range}"),
                    None => Ok(()),
                }
            }
            DiscreteRange::Range(ref range) => write!(f, "{range}"),
        }
    }
}

impl Display for RangeConstraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "{} {} {}",
            self.left_expr, self.direction, self.right_expr,
        )
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Range::Range(ref constraint) => write!(f, "{constraint}"),
            Range::Attribute(ref attr) => write!(f, "{attr}"),
        }
    }
}

impl Display for ElementConstraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}{}", self.ident, self.constraint)
    }
}

impl Display for SubtypeConstraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            SubtypeConstraint::Range(ref range) => write!(f, " range {range}"),
            SubtypeConstraint::Array(ref dranges, ref constraint) => {
                write!(f, "(")?;
                if dranges.is_empty() {
                    write!(f, "open")?;
                } else {
                    write_separated(f, dranges, ", ")?;
                }
                match constraint {
                    Some(ref constraint) => write!(f, "){constraint}"),
                    None => write!(f, ")"),
                }
            }
            SubtypeConstraint::Record(constraints) => {
                write!(f, "(")?;
                write_separated(f, constraints, ", ")?;
                write!(f, ")")
            }
        }
    }
}

impl Display for ResolutionIndication {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ResolutionIndication::FunctionName(ref name) => write!(f, "{name}"),
            ResolutionIndication::ArrayElement(ref name) => write!(f, "({name})"),
            ResolutionIndication::Unresolved => Ok(()),
        }
    }
}

impl Display for SubtypeIndication {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.resolution {
            ResolutionIndication::Unresolved => (),
            _ => write!(f, "{} ", self.resolution)?,
        }
        write!(f, "{}", self.type_mark)?;
        match self.constraint {
            Some(ref constraint) => write!(f, "{constraint}"),
            None => Ok(()),
        }
    }
}

impl Display for TypeMark {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.name)?;
        if let Some(attr) = self.attr {
            write!(f, "'{attr}")?;
        }
        Ok(())
    }
}

impl Display for ArrayIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ArrayIndex::IndexSubtypeDefintion(ref type_mark) => {
                write!(f, "{type_mark} range <>")
            }
            ArrayIndex::Discrete(ref range) => write!(f, "{range}"),
        }
    }
}

impl Display for ElementDeclaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} : {}", self.ident, self.subtype)
    }
}

impl Display for EnumerationLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            EnumerationLiteral::Identifier(ref ident) => write!(f, "{ident}"),
            EnumerationLiteral::Character(chr) => write!(f, "'{chr}'"),
        }
    }
}

impl<T: Display> Display for WithRef<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", &self.item)
    }
}

impl Display for ObjectClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ObjectClass::Constant => write!(f, "constant"),
            ObjectClass::Variable => write!(f, "variable"),
            ObjectClass::Signal => write!(f, "signal"),
            ObjectClass::File => write!(f, "file"),
        }
    }
}

impl Display for InterfaceRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            InterfaceRole::None => write!(f, "object"),
            InterfaceRole::Generic => write!(f, "generic"),
            InterfaceRole::Port => write!(f, "port"),
            InterfaceRole::Parameter => write!(f, "parameter"),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Mode::In => write!(f, "in"),
            Mode::Out => write!(f, "out"),
            Mode::InOut => write!(f, "inout"),
            Mode::Buffer => write!(f, "buffer"),
            Mode::Linkage => write!(f, "linkage"),
        }
    }
}

impl Display for ObjectDeclaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if self.shared {
            write!(f, "shared ")?;
        }
        write!(f, "{} ", self.class)?;
        write_separated(f, &self.idents, ", ")?;
        write!(f, " : ")?;
        if let Some(mode) = self.mode {
            write!(f, "{mode} ")?;
        }
        write!(f, "{}", self.subtype_indication)?;
        if let Some(ref file_open) = self.file_open {
            if let Some(ref open_kind) = file_open.open_kind {
                write!(f, " open {open_kind}")?;
            }
            write!(f, " is {}", file_open.file_name)?;
        }
        if let Some(ref expr) = self.expression {
            write!(f, " := {expr}")?;
        }
        Ok(())
    }
}

impl Display for InstantiatedUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            InstantiatedUnit::Component(ref name) => write!(f, "component {name}"),
            InstantiatedUnit::Entity(ref name, Some(ref arch)) => {
                write!(f, "entity {name}({arch})")
            }
            InstantiatedUnit::Entity(ref name, None) => write!(f, "entity {name}"),
            InstantiatedUnit::Configuration(ref name) => write!(f, "configuration {name}"),
        }
    }
}

impl Display for InstantiationStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.unit)?;
        if let Some(ref generic_map) = self.generic_map {
            write!(f, " generic map ")?;
            write!(f, "(")?;
            write_separated(f, generic_map, ", ")?;
            write!(f, ")")?;
        }
        if let Some(ref port_map) = self.port_map {
            write!(f, " port map ")?;
            write!(f, "(")?;
            write_separated(f, port_map, ", ")?;
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl Display for ComponentDeclaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "component {}", self.ident)
    }
}

impl Display for AnyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn name(text: &str) -> Expression {
        Expression::name(Name::from_dotted(text).unwrap())
    }

    #[test]
    fn selected_names() {
        assert_eq!(
            Name::from_dotted("ieee.numeric_std.all").unwrap().to_string(),
            "ieee.numeric_std.all"
        );
        assert_eq!(Name::from_dotted("Foo.Bar").unwrap().to_string(), "Foo.Bar");
    }

    #[test]
    fn literals() {
        assert_eq!(Literal::Real(1.0).to_string(), "1.0");
        assert_eq!(Literal::Character('a').to_string(), "'a'");
        assert_eq!(
            Literal::String("say \"hi\"".to_owned()).to_string(),
            "\"say \"\"hi\"\"\""
        );
        assert_eq!(
            Literal::BitString(BitString {
                length: Some(8),
                base: BaseSpecifier::UX,
                value: "ff".to_owned()
            })
            .to_string(),
            "8ux\"ff\""
        );
    }

    #[test]
    fn binary_precedence() {
        // (a + b) * c
        let expr = Expression::binary(
            Operator::Times,
            Expression::binary(Operator::Plus, name("a"), name("b")),
            name("c"),
        );
        assert_eq!(expr.to_string(), "(a + b) * c");

        // a + b * c
        let expr = Expression::binary(
            Operator::Plus,
            name("a"),
            Expression::binary(Operator::Times, name("b"), name("c")),
        );
        assert_eq!(expr.to_string(), "a + b * c");

        // a - (b - c)
        let expr = Expression::binary(
            Operator::Minus,
            name("a"),
            Expression::binary(Operator::Minus, name("b"), name("c")),
        );
        assert_eq!(expr.to_string(), "a - (b - c)");

        // a - b - c
        let expr = Expression::binary(
            Operator::Minus,
            Expression::binary(Operator::Minus, name("a"), name("b")),
            name("c"),
        );
        assert_eq!(expr.to_string(), "a - b - c");
    }

    #[test]
    fn unary_operators() {
        let expr = Expression::unary(Operator::Minus, name("a"));
        assert_eq!(expr.to_string(), "-a");
        let expr = Expression::unary(
            Operator::Not,
            Expression::binary(Operator::And, name("a"), name("b")),
        );
        assert_eq!(expr.to_string(), "not (a and b)");
    }

    #[test]
    fn subtype_indication_with_constraint() {
        let subtype = SubtypeIndication::type_mark("std_logic_vector")
            .unwrap()
            .with_constraint(SubtypeConstraint::Array(
                vec![DiscreteRange::Range(Range::new(
                    Expression::integer(7),
                    Direction::Descending,
                    Expression::integer(0),
                ))],
                None,
            ));
        assert_eq!(subtype.to_string(), "std_logic_vector(7 downto 0)");

        let open = SubtypeIndication::type_mark("std_logic_vector")
            .unwrap()
            .with_constraint(SubtypeConstraint::Array(vec![], None));
        assert_eq!(open.to_string(), "std_logic_vector(open)");
    }

    #[test]
    fn object_declarations() {
        let port = ObjectDeclaration::port(
            "clk",
            Mode::In,
            SubtypeIndication::type_mark("std_logic").unwrap(),
        )
        .unwrap();
        assert_eq!(port.to_string(), "signal clk : in std_logic");

        let constant = ObjectDeclaration::constant(
            "width",
            SubtypeIndication::type_mark("natural").unwrap(),
        )
        .unwrap()
        .with_default(Expression::integer(8))
        .unwrap();
        assert_eq!(constant.to_string(), "constant width : natural := 8");
    }

    #[test]
    fn instantiated_units() {
        assert_eq!(
            InstantiatedUnit::entity("work.fifo", Some("rtl"))
                .unwrap()
                .to_string(),
            "entity work.fifo(rtl)"
        );
        assert_eq!(
            InstantiatedUnit::component("fifo").unwrap().to_string(),
            "component fifo"
        );
    }
}
