//! Deterministic pre-order traversal.
//!
//! The walk is an explicit stack, not a callback object: it yields a lazy,
//! restartable sequence in document order, visits every reachable node
//! exactly once, and never touches the tree.

use crate::decl::{Decl, DeclKind, DeclList, SourceFile};

/// A borrowed reference to any node the traversal can reach.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    File(&'a SourceFile),
    List(&'a DeclList),
    Decl(&'a Decl),
}

impl<'a> Node<'a> {
    #[must_use]
    pub fn as_decl(self) -> Option<&'a Decl> {
        match self {
            Node::Decl(decl) => Some(decl),
            Node::File(_) | Node::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_list(self) -> Option<&'a DeclList> {
        match self {
            Node::List(list) => Some(list),
            Node::File(_) | Node::Decl(_) => None,
        }
    }

    fn push_children(self, stack: &mut Vec<Node<'a>>) {
        match self {
            Node::File(file) => stack.push(Node::List(file.decls())),
            Node::List(list) => {
                for decl in list.iter().rev() {
                    stack.push(Node::Decl(decl));
                }
            }
            Node::Decl(decl) => match decl {
                Decl::Struct(s) => stack.push(Node::List(&s.members)),
                Decl::Extension(ext) => stack.push(Node::List(&ext.members)),
                Decl::IfConfig(block) => {
                    for clause in block.clauses.iter().rev() {
                        stack.push(Node::List(&clause.members));
                    }
                }
                Decl::Var(_) | Decl::Init(_) | Decl::Func(_) => {}
            },
        }
    }
}

/// Lazy pre-order iterator over a subtree, root included.
pub struct Preorder<'a> {
    stack: Vec<Node<'a>>,
}

impl<'a> Preorder<'a> {
    fn from_root(root: Node<'a>) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        node.push_children(&mut self.stack);
        Some(node)
    }
}

impl SourceFile {
    /// Walk the whole file in document order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder::from_root(Node::File(self))
    }

    /// All declarations of one kind, in document order.
    pub fn decls_of_kind(&self, kind: DeclKind) -> impl Iterator<Item = &Decl> {
        self.preorder()
            .filter_map(Node::as_decl)
            .filter(move |decl| decl.kind() == kind)
    }
}

impl Decl {
    /// Walk this declaration's subtree in document order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder::from_root(Node::Decl(self))
    }
}
