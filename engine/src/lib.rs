//! The declaration-evolution engine.
//!
//! Generates structurally mutated but semantically equivalent variants of a
//! type's member list, for stress-testing binary/ABI-stability guarantees.
//! Two evolutions are implemented:
//!
//! - **Shuffle Members**: permute reorder-safe members while pinning
//!   order-sensitive ones in place.
//! - **Synthesize Memberwise Initializer**: decide, from structure alone,
//!   whether an implicit memberwise init may legally be generated, and
//!   generate it.
//!
//! Decisions are made through three layers: [`classify`] (pure structural
//! facts about single declarations and lists), [`DeclContext`] (lexical
//! nesting questions), and the [`Evolution`] implementations themselves.
//! Randomness is an injected capability (`rand::Rng`), consulted only while
//! planning an evolution; applying a planned evolution is deterministic.
//!
//! The engine never mutates its input tree: every evolution returns a fresh
//! list and every failure is immediate and final for that invocation.

pub mod classify;
mod context;
mod error;
pub mod evolution;

pub use context::{ContextLink, DeclContext};
pub use error::{EvolutionError, MappingError};
pub use evolution::{Evolution, ShuffleMapping, ShuffleMembers, SynthesizeMemberwiseInit};
