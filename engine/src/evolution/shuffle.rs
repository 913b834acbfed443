//! Shuffle Members: permute reorder-safe members, pin everything else.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use evolve_syntax::{Decl, DeclList};

use crate::classify;
use crate::context::DeclContext;
use crate::error::{EvolutionError, MappingError};

/// A permutation over the reorder-safe subsequence of a member list.
///
/// Indices range over that subsequence only, not over the full list;
/// `mapping[old] = new`. The empty mapping is legal and means "no shuffling
/// requested" — applying it is a true no-op. Non-empty mappings are
/// bijections by construction: [`ShuffleMapping::from_permutation`] rejects
/// anything else, so an invalid mapping is unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct ShuffleMapping(Vec<usize>);

impl ShuffleMapping {
    /// The empty mapping: shuffle nothing.
    #[must_use]
    pub fn identity() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Validate `mapping` as a bijection over `0..mapping.len()`.
    pub fn from_permutation(mapping: Vec<usize>) -> Result<Self, MappingError> {
        let len = mapping.len();
        let mut seen = vec![false; len];
        for &index in &mapping {
            if index >= len {
                return Err(MappingError::OutOfRange { index, len });
            }
            if seen[index] {
                return Err(MappingError::Duplicate { index });
            }
            seen[index] = true;
        }
        Ok(Self(mapping))
    }

    /// Draw a uniform random permutation of `count` positions.
    ///
    /// Fewer than two positions carry zero entropy, so the generator is not
    /// consulted at all and the identity mapping is returned.
    pub fn random<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        if count < 2 {
            return Self::identity();
        }
        let mut mapping: Vec<usize> = (0..count).collect();
        // Fisher-Yates.
        for i in (1..count).rev() {
            let j = rng.random_range(0..=i);
            mapping.swap(i, j);
        }
        Self(mapping)
    }

    /// `inverse[new] = old`.
    fn inverted(&self) -> Vec<usize> {
        let mut inverse = vec![0; self.0.len()];
        for (old, &new) in self.0.iter().enumerate() {
            inverse[new] = old;
        }
        inverse
    }
}

impl TryFrom<Vec<usize>> for ShuffleMapping {
    type Error = MappingError;

    fn try_from(mapping: Vec<usize>) -> Result<Self, Self::Error> {
        Self::from_permutation(mapping)
    }
}

impl From<ShuffleMapping> for Vec<usize> {
    fn from(mapping: ShuffleMapping) -> Self {
        mapping.0
    }
}

/// The Shuffle Members evolution.
///
/// Deterministic for a fixed mapping: the random source is consulted only by
/// [`Evolution::try_plan`], which builds the mapping. Pinned members keep
/// their absolute list positions; movable members permute only among the
/// slots movable members already occupy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffleMembers {
    mapping: ShuffleMapping,
}

impl ShuffleMembers {
    #[must_use]
    pub fn new(mapping: ShuffleMapping) -> Self {
        Self { mapping }
    }

    #[must_use]
    pub fn mapping(&self) -> &ShuffleMapping {
        &self.mapping
    }
}

impl super::Evolution for ShuffleMembers {
    fn name(&self) -> &'static str {
        "shuffle-members"
    }

    fn try_plan<R: Rng>(
        list: &DeclList,
        _context: &DeclContext<'_>,
        rng: &mut R,
    ) -> Result<Option<Self>, EvolutionError> {
        if list.is_empty() {
            return Ok(None);
        }
        let movable = list.iter().filter(|decl| classify::is_reorder_safe(decl)).count();
        let mapping = ShuffleMapping::random(movable, rng);
        debug!(movable, mapping = ?mapping.as_slice(), "planned member shuffle");
        Ok(Some(Self::new(mapping)))
    }

    /// # Panics
    ///
    /// A non-empty mapping whose length differs from the list's reorder-safe
    /// member count is a caller contract violation and panics.
    fn evolve(&self, list: &DeclList) -> DeclList {
        if self.mapping.is_identity() {
            return list.clone();
        }

        // Partition, preserving each side's original relative order. The
        // merge below walks original slots, so pinned members keep their
        // absolute positions and the movable subsequence's tie-break is
        // exactly the mapping, nothing else.
        let movable: Vec<&Decl> = list
            .iter()
            .filter(|decl| classify::is_reorder_safe(decl))
            .collect();
        assert_eq!(
            self.mapping.len(),
            movable.len(),
            "shuffle mapping must be a permutation of the reorder-safe members"
        );

        let inverse = self.mapping.inverted();
        let mut emitted = 0;
        let mut out = Vec::with_capacity(list.len());
        for decl in list {
            if classify::is_reorder_safe(decl) {
                out.push(movable[inverse[emitted]].clone());
                emitted += 1;
            } else {
                out.push(decl.clone());
            }
        }
        DeclList::from_vec(out)
    }
}
