//! The declaration node model.
//!
//! A closed set of kinds: downstream classification matches exhaustively, so
//! growing the language subset is a deliberate act, never a silent fallthrough.

use std::slice;
use std::sync::Arc;

/// Kind tag for [`Decl`], used by filter queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Var,
    Init,
    Func,
    Struct,
    Extension,
    IfConfig,
}

/// A member declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Var(VarDecl),
    Init(InitDecl),
    Func(FuncDecl),
    Struct(StructDecl),
    Extension(ExtensionDecl),
    IfConfig(IfConfigDecl),
}

impl Decl {
    #[must_use]
    pub fn kind(&self) -> DeclKind {
        match self {
            Decl::Var(_) => DeclKind::Var,
            Decl::Init(_) => DeclKind::Init,
            Decl::Func(_) => DeclKind::Func,
            Decl::Struct(_) => DeclKind::Struct,
            Decl::Extension(_) => DeclKind::Extension,
            Decl::IfConfig(_) => DeclKind::IfConfig,
        }
    }

    /// The declared name, where the kind has one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Decl::Var(v) => Some(&v.name),
            Decl::Func(f) => Some(&f.name),
            Decl::Struct(s) => Some(&s.name),
            Decl::Extension(e) => Some(&e.extended),
            Decl::Init(_) | Decl::IfConfig(_) => None,
        }
    }
}

/// `var` vs `let` introducer on a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKeyword {
    Var,
    Let,
}

impl BindingKeyword {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            BindingKeyword::Var => "var",
            BindingKeyword::Let => "let",
        }
    }
}

/// A property binding.
///
/// `accessor` is the raw text of an explicit accessor block; its presence is
/// what makes the binding computed rather than stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub attributes: Vec<String>,
    pub modifiers: Vec<String>,
    pub keyword: BindingKeyword,
    pub name: String,
    pub ty: Option<String>,
    pub initializer: Option<String>,
    pub accessor: Option<String>,
}

impl VarDecl {
    /// A plain stored `var name: ty` binding.
    #[must_use]
    pub fn stored(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            attributes: Vec::new(),
            modifiers: Vec::new(),
            keyword: BindingKeyword::Var,
            name: name.into(),
            ty: Some(ty.into()),
            initializer: None,
            accessor: None,
        }
    }

    #[must_use]
    pub fn is_computed(&self) -> bool {
        self.accessor.is_some()
    }
}

/// One parameter of an initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Explicit argument label (`_` parses to a literal "_" label).
    pub label: Option<String>,
    pub name: String,
    pub ty: String,
    pub default: Option<String>,
}

/// An explicit initializer declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitDecl {
    pub modifiers: Vec<String>,
    pub failable: bool,
    pub parameters: Vec<Parameter>,
    pub body: String,
}

/// A function member. The signature (parameter clause, generics, return
/// clause) is kept as raw text; the engine never needs to look inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub attributes: Vec<String>,
    pub modifiers: Vec<String>,
    pub name: String,
    pub signature: String,
    pub body: String,
}

/// A struct declaration with its member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub attributes: Vec<String>,
    pub modifiers: Vec<String>,
    pub name: String,
    pub members: DeclList,
}

/// An extension body. `extended` keeps the full raw clause, conformances
/// included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDecl {
    pub extended: String,
    pub members: DeclList,
}

/// Clause introducer inside a conditional-compilation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfConfigKeyword {
    If,
    ElseIf,
    Else,
}

impl IfConfigKeyword {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            IfConfigKeyword::If => "#if",
            IfConfigKeyword::ElseIf => "#elseif",
            IfConfigKeyword::Else => "#else",
        }
    }
}

/// One `#if`/`#elseif`/`#else` clause and the members it guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfConfigClause {
    pub keyword: IfConfigKeyword,
    /// `None` exactly for `#else`.
    pub condition: Option<String>,
    pub members: DeclList,
}

/// A `#if ... #endif` block wrapping conditionally-present members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfConfigDecl {
    pub clauses: Vec<IfConfigClause>,
}

/// An ordered, immutable sequence of declarations.
///
/// The emitted order is the only contract with callers. Cloning shares the
/// backing storage; every "mutation" builds a fresh list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclList {
    decls: Arc<Vec<Decl>>,
}

impl DeclList {
    #[must_use]
    pub fn new() -> Self {
        Self {
            decls: Arc::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn from_vec(decls: Vec<Decl>) -> Self {
        Self {
            decls: Arc::new(decls),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Decl> {
        self.decls.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Decl> {
        self.decls.iter()
    }

    /// A new list with `decl` appended; `self` is untouched.
    #[must_use]
    pub fn with_appended(&self, decl: Decl) -> Self {
        let mut decls = (*self.decls).clone();
        decls.push(decl);
        Self::from_vec(decls)
    }

    /// Whether two lists share the same backing storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.decls, &other.decls)
    }
}

impl Default for DeclList {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Decl> for DeclList {
    fn from_iter<T: IntoIterator<Item = Decl>>(iter: T) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DeclList {
    type Item = &'a Decl;
    type IntoIter = slice::Iter<'a, Decl>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Root of a parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    decls: DeclList,
}

impl SourceFile {
    #[must_use]
    pub fn new(decls: DeclList) -> Self {
        Self { decls }
    }

    #[must_use]
    pub fn decls(&self) -> &DeclList {
        &self.decls
    }
}
