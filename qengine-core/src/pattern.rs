//! Triple patterns and their resolution against the index.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::dictionary::{Dictionary, TermId};
use crate::error::{Error, Result};
use crate::index::{Permutation, PermutationIndex, Position};

/// One slot of a pattern as written in a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternTerm {
    Bound(String),
    Variable(String),
}

impl PatternTerm {
    pub fn bound(term: impl Into<String>) -> Self {
        Self::Bound(term.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    fn encode(&self, dictionary: &Dictionary) -> Slot {
        match self {
            PatternTerm::Bound(term) => dictionary.lookup(term).map_or(Slot::Absent, Slot::Bound),
            PatternTerm::Variable(_) => Slot::Unbound,
        }
    }
}

impl fmt::Display for PatternTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternTerm::Bound(term) => write!(f, "<{term}>"),
            PatternTerm::Variable(name) => write!(f, "?{name}"),
        }
    }
}

/// Encoded state of a pattern slot.
///
/// `Absent` is a bound term the dictionary has never seen. It matches nothing
/// and must never be confused with `Unbound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Bound(TermId),
    Unbound,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriplePattern {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

impl TriplePattern {
    pub fn new(subject: PatternTerm, predicate: PatternTerm, object: PatternTerm) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    pub fn term(&self, position: Position) -> &PatternTerm {
        match position {
            Position::Subject => &self.subject,
            Position::Predicate => &self.predicate,
            Position::Object => &self.object,
        }
    }

    /// The single variable of this pattern and where it sits.
    pub fn variable(&self) -> Result<(&str, Position)> {
        let mut found = None;
        for position in [Position::Subject, Position::Predicate, Position::Object] {
            if let PatternTerm::Variable(name) = self.term(position) {
                if found.is_some() {
                    return Err(Error::unsupported_pattern(self, "more than one variable"));
                }
                found = Some((name.as_str(), position));
            }
        }
        found.ok_or_else(|| Error::unsupported_pattern(self, "no variable"))
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.subject, self.predicate, self.object)
    }
}

/// Candidate bindings for a pattern's variable, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub variable: String,
    pub bindings: Vec<TermId>,
}

/// Resolves `pattern` to the sorted set of ids its variable can take.
pub fn resolve(pattern: &TriplePattern, dictionary: &Dictionary, index: &PermutationIndex) -> Result<Resolved> {
    let (variable, unbound) = pattern.variable()?;
    let permutation = Permutation::for_unbound(unbound);
    let [first, second, _] = permutation.positions();

    let keys = (
        pattern.term(first).encode(dictionary),
        pattern.term(second).encode(dictionary),
    );
    let bindings = match keys {
        (Slot::Bound(first), Slot::Bound(second)) => {
            let leaf = index.probe(permutation, first, second);
            trace!(%pattern, %permutation, first, second, matches = leaf.len(), "probe");
            leaf.iter().copied().collect()
        }
        (Slot::Unbound, _) | (_, Slot::Unbound) => {
            return Err(Error::unsupported_pattern(pattern, "more than one variable"));
        }
        _ => {
            trace!(%pattern, "bound term not in dictionary");
            Vec::new()
        }
    };

    Ok(Resolved {
        variable: variable.to_owned(),
        bindings,
    })
}
