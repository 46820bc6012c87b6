// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2018, Olof Kraigher olof.kraigher@gmail.com

//! Constructors, builders and capability queries of the language model

use itertools::Itertools;

use super::*;

pub trait HasIdent {
    fn ident(&self) -> &Identifier;

    fn name(&self) -> &str {
        self.ident().name()
    }
}

impl HasIdent for Identifier {
    fn ident(&self) -> &Identifier {
        self
    }
}

impl<T: HasIdent> HasIdent for WithRef<T> {
    fn ident(&self) -> &Identifier {
        self.item.ident()
    }
}

impl HasIdent for EntityDeclaration {
    fn ident(&self) -> &Identifier {
        &self.ident
    }
}

impl HasIdent for PackageDeclaration {
    fn ident(&self) -> &Identifier {
        &self.ident
    }
}

impl HasIdent for PackageBody {
    fn ident(&self) -> &Identifier {
        &self.ident.item
    }
}

impl HasIdent for ArchitectureBody {
    fn ident(&self) -> &Identifier {
        &self.ident
    }
}

impl HasIdent for ContextDeclaration {
    fn ident(&self) -> &Identifier {
        &self.ident
    }
}

impl HasIdent for ConfigurationDeclaration {
    fn ident(&self) -> &Identifier {
        &self.ident
    }
}

impl HasIdent for ComponentDeclaration {
    fn ident(&self) -> &Identifier {
        &self.ident
    }
}

impl HasIdent for TypeDeclaration {
    fn ident(&self) -> &Identifier {
        &self.ident
    }
}

impl HasIdent for PackageInstantiation {
    fn ident(&self) -> &Identifier {
        &self.ident
    }
}

/// Statements carry an optional label
pub trait HasLabel {
    fn label(&self) -> Option<&Identifier>;
}

impl HasLabel for LabeledConcurrentStatement {
    fn label(&self) -> Option<&Identifier> {
        self.label.as_ref()
    }
}

impl HasLabel for LabeledSequentialStatement {
    fn label(&self) -> Option<&Identifier> {
        self.label.as_ref()
    }
}

/// Documentation comments attached to a declaration
pub trait HasDocumentation {
    fn documentation(&self) -> Option<&str>;
}

macro_rules! impl_has_documentation {
    ($($typ:ty),*) => {
        $(
            impl HasDocumentation for $typ {
                fn documentation(&self) -> Option<&str> {
                    self.documentation.as_deref()
                }
            }
        )*
    };
}

impl_has_documentation!(
    EntityDeclaration,
    ArchitectureBody,
    PackageDeclaration,
    PackageBody,
    ContextDeclaration,
    ConfigurationDeclaration,
    ComponentDeclaration,
    TypeDeclaration,
    ObjectDeclaration,
    SubprogramDeclaration,
    SubprogramBody,
    ProcessStatement
);

fn ident_list(names: &[&str]) -> DiagnosticResult<Vec<Identifier>> {
    names.iter().map(Identifier::new).collect()
}

fn name_list(names: &[&str]) -> DiagnosticResult<Vec<WithRef<Name>>> {
    names
        .iter()
        .map(|name| Name::from_dotted(name).map(WithRef::new))
        .collect()
}

/// Split a dotted name into segments, keeping extended identifiers intact
fn split_dotted(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_extended = false;

    for (i, chr) in text.char_indices() {
        match chr {
            '\\' => in_extended = !in_extended,
            '.' if !in_extended => {
                segments.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&text[start..]);
    segments
}

impl Name {
    /// Build a selected name from its textual form, such as `ieee.std_logic_1164.all`
    pub fn from_dotted(text: &str) -> DiagnosticResult<Name> {
        let segments = split_dotted(text);
        let (first, rest) = match segments.split_first() {
            Some(split) => split,
            None => return Err(invalid_name(text)),
        };

        let mut name = Name::Simple(Identifier::new(first)?);
        for (i, segment) in rest.iter().enumerate() {
            let is_last = i + 1 == rest.len();
            if is_last && segment.eq_ignore_ascii_case("all") {
                name = Name::SelectedAll(Box::new(name));
            } else {
                name = Name::Selected(Box::new(name), Identifier::new(segment)?);
            }
        }
        Ok(name)
    }

    /// The identifiers of a simple or selected name from left to right, and
    /// whether it ends with `.all`. Other forms of names return `None`.
    pub fn segments(&self) -> Option<(Vec<&Identifier>, bool)> {
        match self {
            Name::Simple(ident) => Some((vec![ident], false)),
            Name::Selected(prefix, suffix) => {
                let (mut segments, all) = prefix.segments()?;
                if all {
                    return None;
                }
                segments.push(suffix);
                Some((segments, false))
            }
            Name::SelectedAll(prefix) => {
                let (segments, all) = prefix.segments()?;
                if all {
                    return None;
                }
                Some((segments, true))
            }
            _ => None,
        }
    }

    /// The rightmost identifier of a simple or selected name
    pub fn suffix(&self) -> Option<&Identifier> {
        match self {
            Name::Simple(ident) => Some(ident),
            Name::Selected(_, suffix) => Some(suffix),
            _ => None,
        }
    }

    pub fn prefix(&self) -> Option<&Name> {
        match self {
            Name::Selected(prefix, _) | Name::SelectedAll(prefix) | Name::Slice(prefix, _) => {
                Some(prefix)
            }
            Name::Attribute(attr) => Some(&attr.name),
            Name::CallOrIndexed(call) => Some(&call.name),
            Name::Simple(_) => None,
        }
    }

    pub fn is_selected_name(&self) -> bool {
        matches!(self, Name::Selected(..) | Name::SelectedAll(..))
    }
}

fn invalid_name(text: &str) -> Diagnostic {
    Diagnostic::error(
        Location::detached(text),
        format!("Invalid name '{text}'"),
        ErrorCode::InvalidIdentifier,
    )
}

impl From<Identifier> for Name {
    fn from(ident: Identifier) -> Self {
        Name::Simple(ident)
    }
}

impl LibraryClause {
    pub fn new(names: &[&str]) -> DiagnosticResult<LibraryClause> {
        Ok(LibraryClause {
            name_list: ident_list(names)?.into_iter().map(WithRef::new).collect(),
        })
    }
}

impl UseClause {
    pub fn new(names: &[&str]) -> DiagnosticResult<UseClause> {
        Ok(UseClause {
            name_list: name_list(names)?,
        })
    }
}

impl ContextReference {
    pub fn new(names: &[&str]) -> DiagnosticResult<ContextReference> {
        Ok(ContextReference {
            name_list: name_list(names)?,
        })
    }
}

impl ContextItem {
    pub fn library(names: &[&str]) -> DiagnosticResult<ContextItem> {
        LibraryClause::new(names).map(ContextItem::Library)
    }

    pub fn use_clause(names: &[&str]) -> DiagnosticResult<ContextItem> {
        UseClause::new(names).map(ContextItem::Use)
    }

    pub fn context(names: &[&str]) -> DiagnosticResult<ContextItem> {
        ContextReference::new(names).map(ContextItem::Context)
    }
}

impl EntityDeclaration {
    pub fn new(name: impl AsRef<str>) -> DiagnosticResult<EntityDeclaration> {
        Ok(EntityDeclaration {
            context_clause: Vec::new(),
            ident: Identifier::new(name)?,
            generic_clause: None,
            port_clause: None,
            decl: Vec::new(),
            statements: Vec::new(),
            documentation: None,
        })
    }

    pub fn with_context(mut self, items: ContextClause) -> Self {
        self.context_clause.extend(items);
        self
    }

    pub fn with_generics(mut self, generics: Vec<InterfaceDeclaration>) -> Self {
        self.generic_clause = Some(generics);
        self
    }

    pub fn with_ports(mut self, ports: Vec<InterfaceDeclaration>) -> Self {
        self.port_clause = Some(ports);
        self
    }

    pub fn with_declaration(mut self, decl: Declaration) -> Self {
        self.decl.push(decl);
        self
    }

    pub fn with_statement(mut self, statement: LabeledConcurrentStatement) -> Self {
        self.statements.push(statement);
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

impl ArchitectureBody {
    pub fn new(
        name: impl AsRef<str>,
        entity_name: impl AsRef<str>,
    ) -> DiagnosticResult<ArchitectureBody> {
        Ok(ArchitectureBody {
            context_clause: Vec::new(),
            ident: Identifier::new(name)?,
            entity_name: WithRef::new(Identifier::new(entity_name)?),
            decl: Vec::new(),
            statements: Vec::new(),
            documentation: None,
        })
    }

    pub fn with_context(mut self, items: ContextClause) -> Self {
        self.context_clause.extend(items);
        self
    }

    pub fn with_declaration(mut self, decl: Declaration) -> Self {
        self.decl.push(decl);
        self
    }

    pub fn with_statement(mut self, statement: LabeledConcurrentStatement) -> Self {
        self.statements.push(statement);
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

impl PackageDeclaration {
    pub fn new(name: impl AsRef<str>) -> DiagnosticResult<PackageDeclaration> {
        Ok(PackageDeclaration {
            context_clause: Vec::new(),
            ident: Identifier::new(name)?,
            generic_clause: None,
            decl: Vec::new(),
            documentation: None,
        })
    }

    pub fn with_context(mut self, items: ContextClause) -> Self {
        self.context_clause.extend(items);
        self
    }

    pub fn with_generics(mut self, generics: Vec<InterfaceDeclaration>) -> Self {
        self.generic_clause = Some(generics);
        self
    }

    pub fn with_declaration(mut self, decl: Declaration) -> Self {
        self.decl.push(decl);
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Deferred constants require a package body
    pub fn has_deferred_constant(&self) -> bool {
        self.decl.iter().any(|decl| match decl {
            Declaration::Object(object) => object.is_deferred_constant(),
            _ => false,
        })
    }
}

impl PackageBody {
    pub fn new(package_name: impl AsRef<str>) -> DiagnosticResult<PackageBody> {
        Ok(PackageBody {
            context_clause: Vec::new(),
            ident: WithRef::new(Identifier::new(package_name)?),
            decl: Vec::new(),
            documentation: None,
        })
    }

    pub fn with_context(mut self, items: ContextClause) -> Self {
        self.context_clause.extend(items);
        self
    }

    pub fn with_declaration(mut self, decl: Declaration) -> Self {
        self.decl.push(decl);
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

impl ContextDeclaration {
    pub fn new(name: impl AsRef<str>) -> DiagnosticResult<ContextDeclaration> {
        Ok(ContextDeclaration {
            ident: Identifier::new(name)?,
            items: Vec::new(),
            documentation: None,
        })
    }

    pub fn with_items(mut self, items: ContextClause) -> Self {
        self.items.extend(items);
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

impl ConfigurationDeclaration {
    /// `configuration name of entity_name is`, where the entity name may be
    /// prefixed by its library
    pub fn new(
        name: impl AsRef<str>,
        entity_name: &str,
    ) -> DiagnosticResult<ConfigurationDeclaration> {
        Ok(ConfigurationDeclaration {
            context_clause: Vec::new(),
            ident: Identifier::new(name)?,
            entity_name: WithRef::new(Name::from_dotted(entity_name)?),
            decl: Vec::new(),
            block_config: None,
            documentation: None,
        })
    }

    pub fn with_context(mut self, items: ContextClause) -> Self {
        self.context_clause.extend(items);
        self
    }

    pub fn with_use(mut self, use_clause: UseClause) -> Self {
        self.decl.push(use_clause);
        self
    }

    /// The top level `for architecture ... end for` of the configuration
    pub fn with_block_config(mut self, block_config: BlockConfiguration) -> Self {
        self.block_config = Some(block_config);
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// The architecture selected by the top level block configuration
    pub fn architecture_name(&self) -> Option<&Identifier> {
        self.block_config
            .as_ref()
            .and_then(|block| block.block_spec.suffix())
    }
}

impl BlockConfiguration {
    pub fn new(block_spec: &str) -> DiagnosticResult<BlockConfiguration> {
        Ok(BlockConfiguration {
            block_spec: Name::from_dotted(block_spec)?,
            use_clauses: Vec::new(),
            items: Vec::new(),
        })
    }

    pub fn with_item(mut self, item: ConfigurationItem) -> Self {
        self.items.push(item);
        self
    }
}

impl ComponentDeclaration {
    pub fn new(name: impl AsRef<str>) -> DiagnosticResult<ComponentDeclaration> {
        Ok(ComponentDeclaration {
            ident: Identifier::new(name)?,
            generic_list: Vec::new(),
            port_list: Vec::new(),
            documentation: None,
        })
    }

    pub fn with_generics(mut self, generics: Vec<InterfaceDeclaration>) -> Self {
        self.generic_list = generics;
        self
    }

    pub fn with_ports(mut self, ports: Vec<InterfaceDeclaration>) -> Self {
        self.port_list = ports;
        self
    }
}

impl InstantiatedUnit {
    /// `entity lib.name(arch)`
    pub fn entity(name: &str, architecture: Option<&str>) -> DiagnosticResult<InstantiatedUnit> {
        Ok(InstantiatedUnit::Entity(
            Name::from_dotted(name)?,
            architecture.map(Identifier::new).transpose()?,
        ))
    }

    /// `component name` or just `name`
    pub fn component(name: &str) -> DiagnosticResult<InstantiatedUnit> {
        Ok(InstantiatedUnit::Component(Name::from_dotted(name)?))
    }

    /// `configuration lib.name`
    pub fn configuration(name: &str) -> DiagnosticResult<InstantiatedUnit> {
        Ok(InstantiatedUnit::Configuration(Name::from_dotted(name)?))
    }

    pub fn name(&self) -> &Name {
        match self {
            InstantiatedUnit::Component(name)
            | InstantiatedUnit::Entity(name, _)
            | InstantiatedUnit::Configuration(name) => name,
        }
    }
}

impl InstantiationStatement {
    pub fn new(unit: InstantiatedUnit) -> InstantiationStatement {
        InstantiationStatement {
            unit,
            generic_map: None,
            port_map: None,
        }
    }

    pub fn with_generic_map(mut self, map: MapAspect) -> Self {
        self.generic_map = Some(map);
        self
    }

    pub fn with_port_map(mut self, map: MapAspect) -> Self {
        self.port_map = Some(map);
        self
    }
}

impl LabeledConcurrentStatement {
    pub fn new(
        label: Option<&str>,
        statement: ConcurrentStatement,
    ) -> DiagnosticResult<LabeledConcurrentStatement> {
        Ok(LabeledConcurrentStatement {
            label: label.map(Identifier::new).transpose()?,
            statement,
        })
    }

    /// Instantiation statements always have a label
    pub fn instance(
        label: &str,
        unit: InstantiatedUnit,
    ) -> DiagnosticResult<LabeledConcurrentStatement> {
        Self::new(
            Some(label),
            ConcurrentStatement::Instance(InstantiationStatement::new(unit)),
        )
    }

    pub fn process(
        label: Option<&str>,
        process: ProcessStatement,
    ) -> DiagnosticResult<LabeledConcurrentStatement> {
        Self::new(label, ConcurrentStatement::Process(process))
    }

    /// Block statements always have a label
    pub fn block(label: &str, block: BlockStatement) -> DiagnosticResult<LabeledConcurrentStatement> {
        Self::new(Some(label), ConcurrentStatement::Block(block))
    }
}

impl LabeledSequentialStatement {
    pub fn new(
        label: Option<&str>,
        statement: SequentialStatement,
    ) -> DiagnosticResult<LabeledSequentialStatement> {
        Ok(LabeledSequentialStatement {
            label: label.map(Identifier::new).transpose()?,
            statement,
        })
    }
}

impl ConcurrentStatement {
    /// Statements which may only appear with a label
    pub fn requires_label(&self) -> bool {
        matches!(
            self,
            ConcurrentStatement::Block(..)
                | ConcurrentStatement::Instance(..)
                | ConcurrentStatement::ForGenerate(..)
                | ConcurrentStatement::IfGenerate(..)
                | ConcurrentStatement::CaseGenerate(..)
        )
    }
}

impl TypeMark {
    pub fn new(name: &str) -> DiagnosticResult<TypeMark> {
        Ok(TypeMark {
            name: Name::from_dotted(name)?,
            attr: None,
        })
    }
}

impl SubtypeIndication {
    /// An unconstrained subtype indication naming only a type mark
    pub fn type_mark(name: &str) -> DiagnosticResult<SubtypeIndication> {
        Ok(SubtypeIndication {
            resolution: ResolutionIndication::Unresolved,
            type_mark: TypeMark::new(name)?,
            constraint: None,
        })
    }

    pub fn with_constraint(mut self, constraint: SubtypeConstraint) -> Self {
        self.constraint = Some(constraint);
        self
    }
}

impl Expression {
    pub fn integer(value: u64) -> Expression {
        Expression::Literal(Literal::Integer(value))
    }

    pub fn name(name: impl Into<Name>) -> Expression {
        Expression::Name(Box::new(name.into()))
    }

    pub fn binary(op: Operator, left: Expression, right: Expression) -> Expression {
        Expression::Binary(op, Box::new(left), Box::new(right))
    }

    pub fn unary(op: Operator, expr: Expression) -> Expression {
        Expression::Unary(op, Box::new(expr))
    }
}

impl Range {
    pub fn new(left: Expression, direction: Direction, right: Expression) -> Range {
        Range::Range(RangeConstraint {
            direction,
            left_expr: Box::new(left),
            right_expr: Box::new(right),
        })
    }
}

impl Operator {
    pub fn is_unary(&self) -> bool {
        matches!(
            self,
            Operator::Abs
                | Operator::Not
                | Operator::Minus
                | Operator::Plus
                | Operator::QueQue
                // VHDL-2008 reduction operators
                | Operator::And
                | Operator::Or
                | Operator::Nand
                | Operator::Nor
                | Operator::Xor
                | Operator::Xnor
        )
    }

    pub fn is_binary(&self) -> bool {
        !matches!(self, Operator::Abs | Operator::Not | Operator::QueQue)
    }

    pub fn class(&self) -> OperatorClass {
        match self {
            Operator::QueQue => OperatorClass::Condition,
            Operator::And
            | Operator::Or
            | Operator::Nand
            | Operator::Nor
            | Operator::Xor
            | Operator::Xnor => OperatorClass::Logical,
            Operator::EQ
            | Operator::NE
            | Operator::LT
            | Operator::LTE
            | Operator::GT
            | Operator::GTE => OperatorClass::Relational,
            Operator::QueEQ
            | Operator::QueNE
            | Operator::QueLT
            | Operator::QueLTE
            | Operator::QueGT
            | Operator::QueGTE => OperatorClass::Matching,
            Operator::SLL
            | Operator::SRL
            | Operator::SLA
            | Operator::SRA
            | Operator::ROL
            | Operator::ROR => OperatorClass::Shift,
            Operator::Plus | Operator::Minus | Operator::Concat => OperatorClass::Adding,
            Operator::Times | Operator::Div | Operator::Mod | Operator::Rem => {
                OperatorClass::Multiplying
            }
            Operator::Pow | Operator::Abs | Operator::Not => OperatorClass::Miscellaneous,
        }
    }
}

impl TypeDefinition {
    /// Subtypes answer `false` to all type class queries since their class
    /// depends on the resolved type mark
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TypeDefinition::Enumeration(..)
                | TypeDefinition::Integer(..)
                | TypeDefinition::Real(..)
                | TypeDefinition::Physical(..)
        )
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, TypeDefinition::Array(..) | TypeDefinition::Record(..))
    }

    pub fn is_discrete(&self) -> bool {
        matches!(
            self,
            TypeDefinition::Enumeration(..) | TypeDefinition::Integer(..)
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TypeDefinition::Integer(..) | TypeDefinition::Real(..) | TypeDefinition::Physical(..)
        )
    }
}

impl TypeDeclaration {
    pub fn new(name: impl AsRef<str>, def: TypeDefinition) -> DiagnosticResult<TypeDeclaration> {
        Ok(TypeDeclaration {
            ident: Identifier::new(name)?,
            def,
            documentation: None,
        })
    }
}

fn invalid_interface_item(idents: &[Identifier], message: String) -> Diagnostic {
    let name = idents.iter().map(|ident| ident.name()).join(", ");
    Diagnostic::error(
        Location::detached(name),
        message,
        ErrorCode::InvalidInterfaceItem,
    )
}

impl ObjectDeclaration {
    /// Create an object declaration, checking that the object class may
    /// appear in the given interface list
    pub fn new(
        class: ObjectClass,
        role: InterfaceRole,
        idents: &[&str],
        subtype_indication: SubtypeIndication,
    ) -> DiagnosticResult<ObjectDeclaration> {
        let idents = ident_list(idents)?;
        if idents.is_empty() {
            return Err(Diagnostic::error(
                Location::detached(""),
                "Object declaration without identifiers",
                ErrorCode::InvalidIdentifier,
            ));
        }

        let allowed = match role {
            InterfaceRole::None | InterfaceRole::Parameter => true,
            InterfaceRole::Generic => class == ObjectClass::Constant,
            InterfaceRole::Port => class == ObjectClass::Signal,
        };
        if !allowed {
            return Err(invalid_interface_item(
                &idents,
                format!("{class} may not be declared as a {role}"),
            ));
        }

        let mut object = ObjectDeclaration {
            class,
            role,
            idents,
            subtype_indication,
            mode: None,
            expression: None,
            shared: false,
            file_open: None,
            documentation: None,
        };
        if object.has_mode() {
            object.mode = Some(Mode::default());
        }
        Ok(object)
    }

    pub fn constant(name: &str, subtype: SubtypeIndication) -> DiagnosticResult<ObjectDeclaration> {
        Self::new(ObjectClass::Constant, InterfaceRole::None, &[name], subtype)
    }

    pub fn signal(name: &str, subtype: SubtypeIndication) -> DiagnosticResult<ObjectDeclaration> {
        Self::new(ObjectClass::Signal, InterfaceRole::None, &[name], subtype)
    }

    pub fn variable(name: &str, subtype: SubtypeIndication) -> DiagnosticResult<ObjectDeclaration> {
        Self::new(ObjectClass::Variable, InterfaceRole::None, &[name], subtype)
    }

    pub fn generic(name: &str, subtype: SubtypeIndication) -> DiagnosticResult<ObjectDeclaration> {
        Self::new(ObjectClass::Constant, InterfaceRole::Generic, &[name], subtype)
    }

    pub fn port(
        name: &str,
        mode: Mode,
        subtype: SubtypeIndication,
    ) -> DiagnosticResult<ObjectDeclaration> {
        Self::new(ObjectClass::Signal, InterfaceRole::Port, &[name], subtype)?.with_mode(mode)
    }

    pub fn is_interface_item(&self) -> bool {
        self.role != InterfaceRole::None
    }

    /// Interface objects other than files carry a mode
    pub fn has_mode(&self) -> bool {
        self.is_interface_item() && self.class != ObjectClass::File
    }

    pub fn allows_default(&self) -> bool {
        if self.class == ObjectClass::File {
            return false;
        }
        match self.mode {
            Some(Mode::Linkage) => false,
            Some(mode) if self.role == InterfaceRole::Parameter => {
                // Only constant parameters and variables of mode in may have defaults
                self.class == ObjectClass::Constant || mode == Mode::In
            }
            _ => true,
        }
    }

    pub fn has_default(&self) -> bool {
        self.expression.is_some()
    }

    /// A package constant whose value is given in the package body
    pub fn is_deferred_constant(&self) -> bool {
        self.class == ObjectClass::Constant
            && self.role == InterfaceRole::None
            && self.expression.is_none()
    }

    pub fn with_mode(mut self, mode: Mode) -> DiagnosticResult<ObjectDeclaration> {
        if !self.has_mode() {
            return Err(invalid_interface_item(
                &self.idents,
                format!("{} has no mode", self.describe()),
            ));
        }
        self.mode = Some(mode);
        if self.has_default() && !self.allows_default() {
            return Err(invalid_interface_item(
                &self.idents,
                format!("A {} of mode {mode} may not have a default value", self.class),
            ));
        }
        Ok(self)
    }

    pub fn with_default(mut self, expr: Expression) -> DiagnosticResult<ObjectDeclaration> {
        if !self.allows_default() {
            return Err(invalid_interface_item(
                &self.idents,
                format!("{} may not have a default value", self.describe()),
            ));
        }
        self.expression = Some(expr);
        Ok(self)
    }

    /// Mark a variable as shared
    pub fn shared(mut self) -> DiagnosticResult<ObjectDeclaration> {
        if self.class != ObjectClass::Variable || self.is_interface_item() {
            return Err(invalid_interface_item(
                &self.idents,
                format!("{} may not be shared", self.describe()),
            ));
        }
        self.shared = true;
        Ok(self)
    }

    pub fn with_file_open(
        mut self,
        file_open: FileOpenInformation,
    ) -> DiagnosticResult<ObjectDeclaration> {
        if self.class != ObjectClass::File || self.is_interface_item() {
            return Err(invalid_interface_item(
                &self.idents,
                format!("{} may not have file open information", self.describe()),
            ));
        }
        self.file_open = Some(file_open);
        Ok(self)
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn describe(&self) -> String {
        if self.is_interface_item() {
            format!("{} {}", self.role, self.class)
        } else {
            self.class.to_string()
        }
    }
}

impl From<ObjectDeclaration> for InterfaceDeclaration {
    fn from(object: ObjectDeclaration) -> Self {
        InterfaceDeclaration::Object(object)
    }
}

impl From<ObjectDeclaration> for Declaration {
    fn from(object: ObjectDeclaration) -> Self {
        Declaration::Object(object)
    }
}

impl From<UseClause> for Declaration {
    fn from(use_clause: UseClause) -> Self {
        Declaration::Use(use_clause)
    }
}

impl From<ComponentDeclaration> for Declaration {
    fn from(component: ComponentDeclaration) -> Self {
        Declaration::Component(component)
    }
}

impl From<TypeDeclaration> for Declaration {
    fn from(typ: TypeDeclaration) -> Self {
        Declaration::Type(typ)
    }
}
