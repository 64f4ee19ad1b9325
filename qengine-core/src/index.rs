//! Six-way permutation index over encoded triples.
//!
//! Every triple is stored once per ordering of (subject, predicate, object).
//! Each ordering is a two-level map whose leaves are sorted sets of the third
//! field, so any pattern with two bound fields is answered by two map lookups.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dictionary::TermId;
use crate::triple::Triple;

static EMPTY: BTreeSet<TermId> = BTreeSet::new();

/// A slot position inside a triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Subject,
    Predicate,
    Object,
}

impl Position {
    fn offset(self) -> usize {
        match self {
            Position::Subject => 0,
            Position::Predicate => 1,
            Position::Object => 2,
        }
    }
}

/// One of the six key orderings of a triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permutation {
    Spo,
    Sop,
    Pso,
    Pos,
    Osp,
    Ops,
}

impl Permutation {
    pub const ALL: [Permutation; 6] = [
        Permutation::Spo,
        Permutation::Sop,
        Permutation::Pso,
        Permutation::Pos,
        Permutation::Osp,
        Permutation::Ops,
    ];

    /// Key path of this ordering: first key, second key, leaf.
    pub fn positions(self) -> [Position; 3] {
        use Position::*;
        match self {
            Permutation::Spo => [Subject, Predicate, Object],
            Permutation::Sop => [Subject, Object, Predicate],
            Permutation::Pso => [Predicate, Subject, Object],
            Permutation::Pos => [Predicate, Object, Subject],
            Permutation::Osp => [Object, Subject, Predicate],
            Permutation::Ops => [Object, Predicate, Subject],
        }
    }

    /// Ordering whose two keys are the bound fields of a pattern whose only
    /// unbound field is `unbound`.
    pub fn for_unbound(unbound: Position) -> Permutation {
        match unbound {
            Position::Object => Permutation::Spo,
            Position::Predicate => Permutation::Sop,
            Position::Subject => Permutation::Pos,
        }
    }

    fn slot(self) -> usize {
        match self {
            Permutation::Spo => 0,
            Permutation::Sop => 1,
            Permutation::Pso => 2,
            Permutation::Pos => 3,
            Permutation::Osp => 4,
            Permutation::Ops => 5,
        }
    }

    /// Reorders canonical fields into this ordering's key path.
    fn arrange(self, fields: [TermId; 3]) -> [TermId; 3] {
        self.positions().map(|position| fields[position.offset()])
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Permutation::Spo => "SPO",
            Permutation::Sop => "SOP",
            Permutation::Pso => "PSO",
            Permutation::Pos => "POS",
            Permutation::Osp => "OSP",
            Permutation::Ops => "OPS",
        };
        f.write_str(name)
    }
}

type Store = BTreeMap<TermId, BTreeMap<TermId, BTreeSet<TermId>>>;

#[derive(Default, Debug)]
pub struct PermutationIndex {
    stores: [Store; 6],
    len: usize,
}

impl PermutationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `triple` under every ordering. Returns `false` if it was
    /// already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        let fields = triple.fields();
        let mut inserted = false;
        for permutation in Permutation::ALL {
            let [first, second, leaf] = permutation.arrange(fields);
            inserted = self.stores[permutation.slot()]
                .entry(first)
                .or_default()
                .entry(second)
                .or_default()
                .insert(leaf);
        }
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Values of the third field under `(first, second)` in `permutation`.
    /// Absent keys yield the empty set.
    pub fn probe(&self, permutation: Permutation, first: TermId, second: TermId) -> &BTreeSet<TermId> {
        self.stores[permutation.slot()]
            .get(&first)
            .and_then(|level| level.get(&second))
            .unwrap_or(&EMPTY)
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        let [first, second, leaf] = Permutation::Spo.arrange(triple.fields());
        self.probe(Permutation::Spo, first, second).contains(&leaf)
    }

    /// Number of distinct triples.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Triple> + '_ {
        self.stores[Permutation::Spo.slot()]
            .iter()
            .flat_map(|(&s, level)| {
                level
                    .iter()
                    .flat_map(move |(&p, objects)| objects.iter().map(move |&o| Triple::new(s, p, o)))
            })
    }
}
