//! Declaration-tree representation for the evolution engine.
//!
//! This crate owns the concrete parse tree the engine operates on: a closed,
//! kind-tagged set of member-declaration nodes, plus the three capabilities
//! callers need around them:
//!
//! - **`parse`**: text → tree for the Swift-flavored declaration subset
//! - **`print`**: tree → text (`Display` on every node, round-trip stable)
//! - **`visit`**: deterministic pre-order traversal and kind filtering
//!
//! Every node is logically immutable. "Mutation" always means building a new
//! node; sibling lists share their backing storage (`Arc`) so copying an
//! unmodified subtree is a pointer bump, never a deep clone.

mod decl;
mod parse;
mod print;
mod visit;

pub use decl::{
    BindingKeyword, Decl, DeclKind, DeclList, ExtensionDecl, FuncDecl, IfConfigClause,
    IfConfigDecl, IfConfigKeyword, InitDecl, Parameter, SourceFile, StructDecl, VarDecl,
};
pub use parse::{ParseError, parse_source};
pub use visit::{Node, Preorder};
