//! The evolution abstraction and its two concrete transformations.
//!
//! An evolution is planned, then applied. Planning may consult the injected
//! random source and may fail with a typed [`EvolutionError`]; it may also
//! decide the evolution simply does not apply (`Ok(None)`), which is success.
//! Applying a planned evolution is deterministic, side-effect free, and
//! always returns a fresh list.

use rand::Rng;

use evolve_syntax::DeclList;

use crate::context::DeclContext;
use crate::error::EvolutionError;

mod shuffle;
mod synthesize;

pub use shuffle::{ShuffleMapping, ShuffleMembers};
pub use synthesize::SynthesizeMemberwiseInit;

/// One kind of behavior-preserving mutation of a member list.
pub trait Evolution: Sized {
    /// Stable name for logs and plan records.
    fn name(&self) -> &'static str;

    /// Decide whether and how this evolution applies to `list`.
    ///
    /// `Ok(None)` means the evolution does not apply here, which is success.
    /// The random source is drawn from only when a choice among equally
    /// valid plans has to be made; eligibility checking never draws.
    fn try_plan<R: Rng>(
        list: &DeclList,
        context: &DeclContext<'_>,
        rng: &mut R,
    ) -> Result<Option<Self>, EvolutionError>;

    /// Apply the plan, returning a new list. The input is untouched.
    fn evolve(&self, list: &DeclList) -> DeclList;
}
