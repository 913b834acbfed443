//! Structural declaration classification.
//!
//! Pure functions over single declarations and member lists. They reproduce
//! compiler-internal rules (what counts as stored, when memberwise-init
//! synthesis is suppressed) using only syntactic facts, so they never fail;
//! failing is the evolutions' job one layer up.

use evolve_syntax::{Decl, DeclList, IfConfigDecl};

/// Whether a declaration introduces instance storage requiring
/// initialization.
///
/// Structural rule: a binding with no accessor block and no `static`/`class`
/// modifier. A binding with an explicit accessor, however trivial, is never
/// stored.
#[must_use]
pub fn is_stored(decl: &Decl) -> bool {
    match decl {
        Decl::Var(var) => {
            var.accessor.is_none()
                && !var
                    .modifiers
                    .iter()
                    .any(|modifier| modifier == "static" || modifier == "class")
        }
        Decl::Init(_)
        | Decl::Func(_)
        | Decl::Struct(_)
        | Decl::Extension(_)
        | Decl::IfConfig(_) => false,
    }
}

/// Whether moving a declaration relative to its siblings can be proven not
/// to change program behavior.
///
/// Any attribute pins the declaration: attributes are the structural signal
/// for order-dependent relationships this engine cannot see through.
/// Conditional-compilation blocks are always pinned; their position encodes
/// which siblings they guard against in each configuration.
#[must_use]
pub fn is_reorder_safe(decl: &Decl) -> bool {
    match decl {
        Decl::Var(var) => var.attributes.is_empty(),
        Decl::Func(func) => func.attributes.is_empty(),
        Decl::Struct(s) => s.attributes.is_empty(),
        Decl::Init(_) | Decl::Extension(_) => true,
        Decl::IfConfig(_) => false,
    }
}

/// Whether the list declares an explicit initializer as a direct member.
#[must_use]
pub fn has_explicit_init(list: &DeclList) -> bool {
    list.iter().any(|decl| matches!(decl, Decl::Init(_)))
}

/// Whether memberwise-initializer synthesis is suppressed for this list.
///
/// Returns the name of the first stored property nested inside a
/// conditional-compilation clause — the synthesized initializer's parameter
/// list would vary by build configuration, so it cannot be well-defined. If
/// the list declares an explicit initializer the question is moot (there is
/// nothing to synthesize) and the answer is `None` regardless.
///
/// Nested `#if` blocks are traversed: a doubly-conditional stored property
/// is just as much of a hazard as a directly-conditional one.
#[must_use]
pub fn blocks_memberwise_synthesis(list: &DeclList) -> Option<&str> {
    if has_explicit_init(list) {
        return None;
    }
    list.iter().find_map(|decl| match decl {
        Decl::IfConfig(block) => conditionally_stored_name(block),
        _ => None,
    })
}

fn conditionally_stored_name(block: &IfConfigDecl) -> Option<&str> {
    for clause in &block.clauses {
        for decl in &clause.members {
            if is_stored(decl) {
                return decl.name();
            }
            if let Decl::IfConfig(nested) = decl {
                if let Some(name) = conditionally_stored_name(nested) {
                    return Some(name);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use evolve_syntax::parse_source;

    fn members_of(source: &str) -> DeclList {
        let file = parse_source(source).unwrap();
        let Some(Decl::Struct(decl)) = file.decls().get(0) else {
            panic!("fixture must start with a struct");
        };
        decl.members.clone()
    }

    #[test]
    fn plain_binding_is_stored() {
        let members = members_of("struct S {\n    var a: Int\n    let b = 1\n}\n");
        assert!(members.iter().all(is_stored));
    }

    #[test]
    fn accessor_or_static_makes_binding_unstored() {
        let members =
            members_of("struct S {\n    var a: Int { fatalError() }\n    static var b = 1\n}\n");
        assert!(members.iter().all(|decl| !is_stored(decl)));
    }

    #[test]
    fn non_binding_members_are_never_stored() {
        let members = members_of(
            "struct S {\n    init() {}\n    func f() {}\n    struct T {\n    var u: Int\n}\n}\n",
        );
        assert!(members.iter().all(|decl| !is_stored(decl)));
    }

    #[test]
    fn attributes_pin_reordering() {
        let members = members_of("struct S {\n    var a: Int\n    @objc var b: Int\n}\n");
        let safety: Vec<bool> = members.iter().map(is_reorder_safe).collect();
        assert_eq!(safety, [true, false]);
    }

    #[test]
    fn ifconfig_blocks_are_pinned() {
        let members =
            members_of("struct S {\n    #if os(iOS)\n    var a: Int\n    #endif\n    var b: Int\n}\n");
        let safety: Vec<bool> = members.iter().map(is_reorder_safe).collect();
        assert_eq!(safety, [false, true]);
    }

    #[test]
    fn conditional_stored_property_blocks_synthesis() {
        let members = members_of(
            "struct A {\n    #if os(iOS)\n    var a1: Int\n    #endif\n    var a2: Int { fatalError() }\n}\n",
        );
        assert_eq!(blocks_memberwise_synthesis(&members), Some("a1"));
    }

    #[test]
    fn conditional_computed_property_does_not_block_synthesis() {
        let members = members_of(
            "struct B {\n    var b1: Int\n    #if os(iOS)\n    var b2: Int { fatalError() }\n    #endif\n}\n",
        );
        assert_eq!(blocks_memberwise_synthesis(&members), None);
    }

    #[test]
    fn explicit_init_lifts_the_block() {
        let members = members_of(
            "struct C {\n    #if os(iOS)\n    var c1: Int\n    #endif\n    init() { }\n}\n",
        );
        assert!(has_explicit_init(&members));
        assert_eq!(blocks_memberwise_synthesis(&members), None);
    }

    #[test]
    fn doubly_nested_conditional_storage_still_blocks() {
        let members = members_of(
            "struct D {\n    #if os(iOS)\n    #if DEBUG\n    var d1: Int\n    #endif\n    #endif\n}\n",
        );
        assert_eq!(blocks_memberwise_synthesis(&members), Some("d1"));
    }

    #[test]
    fn else_clause_storage_blocks_too() {
        let members = members_of(
            "struct E {\n    #if os(iOS)\n    var e1: Int { 1 }\n    #else\n    var e2: Int\n    #endif\n}\n",
        );
        assert_eq!(blocks_memberwise_synthesis(&members), Some("e2"));
    }
}
