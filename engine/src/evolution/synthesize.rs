//! Synthesize Memberwise Initializer: decide eligibility from structure
//! alone, then generate `init(p0: T0, ...)` with one parameter per stored
//! property in declaration order.

use std::fmt::Write as _;

use rand::Rng;
use tracing::debug;

use evolve_syntax::{Decl, DeclList, InitDecl, Parameter, VarDecl};

use crate::classify;
use crate::context::DeclContext;
use crate::error::EvolutionError;

/// The Synthesize Memberwise Initializer evolution.
///
/// Planning is a pure eligibility check plus parameter-list construction;
/// the random source is reserved for choosing among equally valid synthesis
/// strategies and is currently never drawn, so callers may pass a generator
/// that fails the test on use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizeMemberwiseInit {
    init: InitDecl,
}

impl SynthesizeMemberwiseInit {
    /// The initializer this plan will append.
    #[must_use]
    pub fn planned_init(&self) -> &InitDecl {
        &self.init
    }

    /// Build the initializer, one parameter per stored property in
    /// declaration order, defaults mirrored from property initializers.
    /// Returns `None` when a parameter type is not structurally
    /// determinable (an untyped binding).
    fn build_init(stored: &[&VarDecl]) -> Option<InitDecl> {
        let mut parameters = Vec::with_capacity(stored.len());
        let mut body = String::new();
        for var in stored {
            let ty = var.ty.as_ref()?;
            parameters.push(Parameter {
                label: None,
                name: var.name.clone(),
                ty: ty.clone(),
                default: var.initializer.clone(),
            });
            if !body.is_empty() {
                body.push('\n');
            }
            let _ = write!(body, "self.{0} = {0}", var.name);
        }
        Some(InitDecl {
            modifiers: Vec::new(),
            failable: false,
            parameters,
            body,
        })
    }
}

impl super::Evolution for SynthesizeMemberwiseInit {
    fn name(&self) -> &'static str {
        "synthesize-memberwise-init"
    }

    fn try_plan<R: Rng>(
        list: &DeclList,
        context: &DeclContext<'_>,
        _rng: &mut R,
    ) -> Result<Option<Self>, EvolutionError> {
        if let Some(name) = classify::blocks_memberwise_synthesis(list) {
            return Err(EvolutionError::IneligibleForSynthesis {
                name: name.to_owned(),
            });
        }
        if !context.is_type_body() {
            return Ok(None);
        }
        if classify::has_explicit_init(list) {
            debug!("explicit initializer present; nothing to synthesize");
            return Ok(None);
        }

        let stored: Vec<&VarDecl> = list
            .iter()
            .filter_map(|decl| match decl {
                Decl::Var(var) if classify::is_stored(decl) => Some(var),
                _ => None,
            })
            .collect();
        if stored.is_empty() {
            return Ok(None);
        }

        match Self::build_init(&stored) {
            Some(init) => {
                debug!(parameters = init.parameters.len(), "planned memberwise initializer");
                Ok(Some(Self { init }))
            }
            None => {
                debug!("stored property without a type annotation; skipping synthesis");
                Ok(None)
            }
        }
    }

    fn evolve(&self, list: &DeclList) -> DeclList {
        list.with_appended(Decl::Init(self.init.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextLink;
    use crate::evolution::Evolution;
    use evolve_syntax::parse_source;

    struct UnusedRng;

    impl rand::RngCore for UnusedRng {
        fn next_u32(&mut self) -> u32 {
            panic!("random source consulted unexpectedly");
        }

        fn next_u64(&mut self) -> u64 {
            panic!("random source consulted unexpectedly");
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            panic!("random source consulted unexpectedly");
        }
    }

    fn plan(
        source: &str,
    ) -> Result<Option<SynthesizeMemberwiseInit>, EvolutionError> {
        let file = parse_source(source).unwrap();
        let Some(Decl::Struct(decl)) = file.decls().get(0) else {
            panic!("fixture must start with a struct");
        };
        let context = DeclContext::new()
            .entering(ContextLink::File(&file))
            .entering(ContextLink::Struct(decl));
        SynthesizeMemberwiseInit::try_plan(&decl.members, &context, &mut UnusedRng)
    }

    #[test]
    fn synthesizes_parameters_in_declaration_order() {
        let planned = plan("struct S {\n    var a: Int\n    var b: String = \"x\"\n}\n")
            .unwrap()
            .expect("synthesis applies");
        let init = planned.planned_init();
        assert!(!init.failable);
        assert_eq!(init.parameters.len(), 2);
        assert_eq!(init.parameters[0].name, "a");
        assert_eq!(init.parameters[1].name, "b");
        assert_eq!(init.parameters[1].default.as_deref(), Some("\"x\""));
        assert_eq!(init.body, "self.a = a\nself.b = b");
    }

    #[test]
    fn evolve_appends_without_touching_input() {
        let file = parse_source("struct S {\n    var a: Int\n}\n").unwrap();
        let Some(Decl::Struct(decl)) = file.decls().get(0) else {
            panic!()
        };
        let context = DeclContext::new()
            .entering(ContextLink::File(&file))
            .entering(ContextLink::Struct(decl));
        let planned =
            SynthesizeMemberwiseInit::try_plan(&decl.members, &context, &mut UnusedRng)
                .unwrap()
                .unwrap();

        let evolved = planned.evolve(&decl.members);
        assert_eq!(decl.members.len(), 1);
        assert_eq!(evolved.len(), 2);
        assert!(matches!(evolved.get(1), Some(Decl::Init(_))));
    }

    #[test]
    fn computed_only_list_is_a_skip() {
        let result = plan("struct S {\n    var a: Int { 1 }\n}\n").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn untyped_stored_binding_is_a_skip() {
        let result = plan("struct S {\n    var a = compute()\n}\n").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn extension_body_is_a_skip() {
        let file = parse_source("extension S {\n    var a: Int { 1 }\n}\n").unwrap();
        let Some(Decl::Extension(ext)) = file.decls().get(0) else {
            panic!()
        };
        let context = DeclContext::new()
            .entering(ContextLink::File(&file))
            .entering(ContextLink::Extension(ext));
        let result =
            SynthesizeMemberwiseInit::try_plan(&ext.members, &context, &mut UnusedRng).unwrap();
        assert!(result.is_none());
    }
}
