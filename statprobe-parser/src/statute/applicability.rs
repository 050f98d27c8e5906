//! Applicability oracle
//!
//! Decides from tree ancestry alone whether provision A's rule covers every
//! instance of entity type B. Consider "(i) foo means (I) any bar or (II) any boo":
//! (i) applies to every boo; whether (i) applies to a foo is not well posed, since a
//! foo was a foo before (i) said anything; and (I) says nothing about a boo.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::error::TreeResult;
use super::tree::{NodeId, StatuteTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Applicability {
    Applies,
    DoesNotApply,
    /// Ambiguous; the pair must not be used as a probe.
    Indeterminate,
}

impl Applicability {
    pub fn is_testable(self) -> bool {
        self != Applicability::Indeterminate
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Applicability::Applies => Some(true),
            Applicability::DoesNotApply => Some(false),
            Applicability::Indeterminate => None,
        }
    }
}

impl fmt::Display for Applicability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Applicability::Applies => "applies",
            Applicability::DoesNotApply => "does not apply",
            Applicability::Indeterminate => "indeterminate",
        })
    }
}

/// Whether `provision` applies to every instance of `entity`. Both nodes must come
/// from `tree`.
pub fn applicability(
    tree: &StatuteTree,
    provision: NodeId,
    entity: NodeId,
) -> TreeResult<Applicability> {
    tree.check(provision)?;
    tree.check(entity)?;

    if provision == entity {
        return Ok(if tree.has_children(entity)? {
            Applicability::Indeterminate
        } else {
            Applicability::Applies
        });
    }
    if tree.is_strict_ancestor(provision, entity)? {
        return Ok(Applicability::Applies);
    }
    if tree.is_strict_ancestor(entity, provision)? {
        return Ok(Applicability::Indeterminate);
    }
    Ok(Applicability::DoesNotApply)
}

/// Candidates at the greatest distance from `a`, or from `a` and `b` summed.
/// Ties keep their input order.
pub fn select_furthest(
    tree: &StatuteTree,
    candidates: &[NodeId],
    a: NodeId,
    b: Option<NodeId>,
) -> TreeResult<Vec<NodeId>> {
    let mut scored = Vec::with_capacity(candidates.len());
    for &candidate in candidates {
        let mut dist = tree.distance(candidate, a)?;
        if let Some(b) = b {
            dist += tree.distance(candidate, b)?;
        }
        scored.push((candidate, dist));
    }
    let Some(max) = scored.iter().map(|(_, d)| *d).max() else {
        return Ok(Vec::new());
    };
    Ok(scored
        .into_iter()
        .filter(|(_, d)| *d == max)
        .map(|(c, _)| c)
        .collect())
}

/// One of the furthest candidates, picked with `rng`.
pub fn choose_furthest<R: Rng + ?Sized>(
    tree: &StatuteTree,
    candidates: &[NodeId],
    a: NodeId,
    b: Option<NodeId>,
    rng: &mut R,
) -> TreeResult<Option<NodeId>> {
    let furthest = select_furthest(tree, candidates, a, b)?;
    Ok(furthest.choose(rng).copied())
}
