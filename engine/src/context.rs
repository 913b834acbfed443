//! Declaration contexts: the chain of declarations lexically enclosing a
//! target, outermost first.
//!
//! A context is built fresh per query from borrowed ancestors and answers
//! nesting-sensitive questions without a semantic pass. It never outlives the
//! tree it borrows from and never mutates it.

use evolve_syntax::{ExtensionDecl, IfConfigDecl, SourceFile, StructDecl};

/// One enclosing declaration in a [`DeclContext`] chain.
#[derive(Debug, Clone, Copy)]
pub enum ContextLink<'a> {
    File(&'a SourceFile),
    Struct(&'a StructDecl),
    Extension(&'a ExtensionDecl),
    IfConfig(&'a IfConfigDecl),
}

/// The ancestors of a target declaration, outermost (file) first.
#[derive(Debug, Clone, Default)]
pub struct DeclContext<'a> {
    chain: Vec<ContextLink<'a>>,
}

impl<'a> DeclContext<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self { chain: Vec::new() }
    }

    #[must_use]
    pub fn from_chain(chain: Vec<ContextLink<'a>>) -> Self {
        Self { chain }
    }

    /// Extend the chain one level inward.
    #[must_use]
    pub fn entering(mut self, link: ContextLink<'a>) -> Self {
        self.chain.push(link);
        self
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    /// The immediate parent of the target declaration.
    #[must_use]
    pub fn innermost(&self) -> Option<ContextLink<'a>> {
        self.chain.last().copied()
    }

    /// The nearest enclosing nominal type.
    #[must_use]
    pub fn innermost_type(&self) -> Option<&'a StructDecl> {
        self.chain.iter().rev().find_map(|link| match link {
            ContextLink::Struct(decl) => Some(*decl),
            _ => None,
        })
    }

    /// Whether the target list is the primary body of a nominal type.
    ///
    /// Memberwise-init synthesis only applies there: extension bodies and
    /// file scope never synthesize.
    #[must_use]
    pub fn is_type_body(&self) -> bool {
        matches!(self.innermost(), Some(ContextLink::Struct(_)))
    }

    /// Whether any enclosing declaration is a conditional-compilation block.
    #[must_use]
    pub fn in_conditional_block(&self) -> bool {
        self.chain
            .iter()
            .any(|link| matches!(link, ContextLink::IfConfig(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evolve_syntax::{Decl, parse_source};

    #[test]
    fn type_body_context_queries() {
        let file = parse_source("struct A {\n    var x: Int\n}\n").unwrap();
        let Some(Decl::Struct(a)) = file.decls().get(0) else {
            panic!("expected a struct");
        };
        let context = DeclContext::new()
            .entering(ContextLink::File(&file))
            .entering(ContextLink::Struct(a));

        assert_eq!(context.depth(), 2);
        assert!(context.is_type_body());
        assert!(!context.in_conditional_block());
        assert_eq!(context.innermost_type().map(|s| s.name.as_str()), Some("A"));
    }

    #[test]
    fn extension_body_is_not_a_type_body() {
        let file = parse_source("extension A {\n    var x: Int { 1 }\n}\n").unwrap();
        let Some(Decl::Extension(ext)) = file.decls().get(0) else {
            panic!("expected an extension");
        };
        let context = DeclContext::new()
            .entering(ContextLink::File(&file))
            .entering(ContextLink::Extension(ext));

        assert!(!context.is_type_body());
        assert!(context.innermost_type().is_none());
    }

    #[test]
    fn empty_context_answers_conservatively() {
        let context = DeclContext::default();
        assert_eq!(context.depth(), 0);
        assert!(context.innermost().is_none());
        assert!(!context.is_type_body());
    }
}
