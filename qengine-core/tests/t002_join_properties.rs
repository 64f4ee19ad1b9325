use std::collections::BTreeSet;

use proptest::prelude::*;
use qengine_core::{
    Database, Dictionary, Fact, JoinStrategy, Options, PatternTerm, Permutation, PermutationIndex,
    Position, StarQuery, Triple, TriplePattern,
};

fn term(n: u8) -> String {
    format!("t{n}")
}

fn facts() -> impl Strategy<Value = Vec<(u8, u8, u8)>> {
    prop::collection::vec((0u8..12, 0u8..4, 0u8..12), 0..60)
}

fn load(facts: &[(u8, u8, u8)]) -> Database {
    let mut db = Database::new(Options::new());
    for (s, p, o) in facts {
        db.add_fact(Fact::new(&term(*s), &term(*p), &term(*o)));
    }
    db
}

fn star(bounds: &[(u8, u8)]) -> StarQuery {
    let patterns = bounds
        .iter()
        .map(|(p, o)| {
            TriplePattern::new(
                PatternTerm::variable("v"),
                PatternTerm::bound(term(*p)),
                PatternTerm::bound(term(*o)),
            )
        })
        .collect();
    StarQuery::new(patterns, &[]).expect("star query")
}

proptest! {
    #[test]
    fn dictionary_ids_are_dense(words in prop::collection::vec("[a-e]{1,3}", 0..40)) {
        let mut dict = Dictionary::new();
        let ids: Vec<_> = words.iter().map(|w| dict.encode(w)).collect();
        let distinct: BTreeSet<_> = words.iter().collect();
        prop_assert_eq!(dict.len(), distinct.len());
        let assigned: BTreeSet<_> = ids.iter().copied().collect();
        prop_assert_eq!(assigned, (0..distinct.len() as u64).collect::<BTreeSet<_>>());
        for (word, id) in words.iter().zip(&ids) {
            prop_assert_eq!(dict.encode(word), *id);
        }
    }

    #[test]
    fn every_triple_is_found_by_its_ordering(triples in prop::collection::vec((0u64..20, 0u64..20, 0u64..20), 1..50)) {
        let mut index = PermutationIndex::new();
        for (s, p, o) in &triples {
            index.insert(Triple::new(*s, *p, *o));
        }
        let before: Vec<_> = index.iter().collect();
        for (s, p, o) in &triples {
            index.insert(Triple::new(*s, *p, *o));
        }
        prop_assert_eq!(index.iter().collect::<Vec<_>>(), before);

        for (s, p, o) in triples {
            let fields = [s, p, o];
            let at = |position: Position| match position {
                Position::Subject => fields[0],
                Position::Predicate => fields[1],
                Position::Object => fields[2],
            };
            for permutation in Permutation::ALL {
                let [first, second, leaf] = permutation.positions();
                prop_assert!(index.probe(permutation, at(first), at(second)).contains(&at(leaf)));
            }
        }
    }

    #[test]
    fn join_is_order_independent(data in facts(), bounds in prop::collection::vec((0u8..4, 0u8..12), 1..5)) {
        let db = load(&data);
        let forward = db.execute(&star(&bounds)).unwrap().bindings;
        let mut reversed = bounds.clone();
        reversed.reverse();
        let backward = db.execute(&star(&reversed)).unwrap().bindings;
        prop_assert_eq!(&forward, &backward);

        let accumulated = db.execute_with(&star(&bounds), JoinStrategy::Accumulate).unwrap().bindings;
        prop_assert_eq!(&forward, &accumulated);
        prop_assert!(forward.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn join_matches_naive_scan(data in facts(), bounds in prop::collection::vec((0u8..4, 0u8..12), 1..4)) {
        let db = load(&data);
        let expected: BTreeSet<String> = (0u8..12)
            .map(term)
            .filter(|s| {
                bounds.iter().all(|(p, o)| {
                    data.iter().any(|(ds, dp, dobj)| term(*ds) == *s && dp == p && dobj == o)
                })
            })
            .collect();
        let result = db.execute(&star(&bounds)).unwrap();
        let got: BTreeSet<String> = result.terms(db.dictionary()).into_iter().map(str::to_owned).collect();
        prop_assert_eq!(got, expected);
    }
}
