//! Star joins: intersection of per-pattern binding sets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::dictionary::{Dictionary, TermId};
use crate::error::{Error, Result};
use crate::index::PermutationIndex;
use crate::pattern::{TriplePattern, resolve};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStrategy {
    /// Intersect a running set with each pattern in turn.
    Accumulate,
    /// Two-pointer merge of the last pattern with the join of the rest.
    #[default]
    SortMerge,
}

/// The variable shared by every pattern of a star query.
pub fn shared_variable(patterns: &[TriplePattern]) -> Result<&str> {
    let (first, rest) = patterns.split_first().ok_or(Error::EmptyQuery)?;
    let (expected, _) = first.variable()?;
    for pattern in rest {
        let (found, _) = pattern.variable()?;
        if found != expected {
            return Err(Error::MixedVariables {
                expected: expected.to_owned(),
                found: found.to_owned(),
            });
        }
    }
    Ok(expected)
}

/// Evaluates a star query and returns the sorted bindings of its variable.
pub fn join(
    patterns: &[TriplePattern],
    dictionary: &Dictionary,
    index: &PermutationIndex,
    strategy: JoinStrategy,
) -> Result<Vec<TermId>> {
    shared_variable(patterns)?;
    match strategy {
        JoinStrategy::Accumulate => accumulate(patterns, dictionary, index),
        JoinStrategy::SortMerge => sort_merge(patterns, dictionary, index),
    }
}

fn accumulate(patterns: &[TriplePattern], dictionary: &Dictionary, index: &PermutationIndex) -> Result<Vec<TermId>> {
    let (first, rest) = patterns.split_first().ok_or(Error::EmptyQuery)?;
    let mut running: BTreeSet<TermId> = resolve(first, dictionary, index)?.bindings.into_iter().collect();
    for pattern in rest {
        if running.is_empty() {
            break;
        }
        let next = resolve(pattern, dictionary, index)?.bindings;
        running.retain(|id| next.binary_search(id).is_ok());
    }
    Ok(running.into_iter().collect())
}

fn sort_merge(patterns: &[TriplePattern], dictionary: &Dictionary, index: &PermutationIndex) -> Result<Vec<TermId>> {
    let (last, prefix) = patterns.split_last().ok_or(Error::EmptyQuery)?;
    let bindings = resolve(last, dictionary, index)?.bindings;
    if bindings.is_empty() || prefix.is_empty() {
        return Ok(bindings);
    }
    let rest = sort_merge(prefix, dictionary, index)?;
    Ok(intersect_sorted(&bindings, &rest))
}

/// Intersection of two ascending slices.
pub fn intersect_sorted(left: &[TermId], right: &[TermId]) -> Vec<TermId> {
    let mut out = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            std::cmp::Ordering::Equal => {
                out.push(left[i]);
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }
    out
}
