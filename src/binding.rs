use std::fmt;

use rowan::TextRange;

use crate::scope::ScopeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u32);

impl BindingId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u32);

impl GroupId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Variable,
    Function,
    Class,
    Enum,
    Interface,
    TypeAlias,
    Destructured,
    Import,
    Namespace,
    /// function, catch and constructor parameters
    Parameter,
    /// name of a function or class expression, visible in its own body
    ExpressionName,
    TypeParameter,
}

impl BindingKind {
    /// Kinds that shadow outer names but are never reported
    pub fn is_reportable(self) -> bool {
        !matches!(
            self,
            BindingKind::Parameter | BindingKind::ExpressionName | BindingKind::TypeParameter
        )
    }

    pub fn is_import(self) -> bool {
        self == BindingKind::Import
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BindingKind::Variable => "variable",
            BindingKind::Function => "function",
            BindingKind::Class => "class",
            BindingKind::Enum => "enum",
            BindingKind::Interface => "interface",
            BindingKind::TypeAlias => "type alias",
            BindingKind::Destructured => "destructured binding",
            BindingKind::Import => "import",
            BindingKind::Namespace => "namespace",
            BindingKind::Parameter => "parameter",
            BindingKind::ExpressionName => "expression name",
            BindingKind::TypeParameter => "type parameter",
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

/// What could be deleted if the binding turns out to be unused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalUnit {
    /// No safe deletion exists
    None,
    /// A complete statement or declaration
    Statement(TextRange),
    /// The `index`th declarator of a multi-declarator statement, see
    /// [`GroupShape::Declarators`]
    Declarator { index: usize },
}

/// One named binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub id: BindingId,
    pub name: String,
    pub kind: BindingKind,
    pub scope: ScopeId,
    /// The identifier at the point of declaration
    pub range: TextRange,
    pub removal: RemovalUnit,
    pub group: GroupId,
    pub exported: bool,
}

/// One item of a comma-separated declarator list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaratorItem {
    pub range: TextRange,
    /// `None` for destructuring declarators, which are never removed
    pub binding: Option<BindingId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupShape {
    Single,
    /// `let a = 1, b = 2;`
    Declarators {
        statement: TextRange,
        items: Vec<DeclaratorItem>,
    },
    /// Names bound by one destructuring pattern
    Pattern,
    /// Specifiers of one import statement
    Import,
    /// Overload signatures merged with their implementation. The group has
    /// a single member; `signatures` are the names of the bodiless ones.
    Overloads { signatures: Vec<TextRange> },
}

/// Bindings that are evaluated together because they share a construct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingGroup {
    pub id: GroupId,
    pub shape: GroupShape,
    pub members: Vec<BindingId>,
}
