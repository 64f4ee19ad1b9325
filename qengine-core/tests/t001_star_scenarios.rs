use qengine_core::{
    Database, Error, Fact, JoinStrategy, Options, PatternTerm, StarQuery, TermId, TriplePattern,
};

const STRATEGIES: [JoinStrategy; 2] = [JoinStrategy::Accumulate, JoinStrategy::SortMerge];

fn load(facts: &[(&str, &str, &str)]) -> Database {
    let mut db = Database::new(Options::new());
    for (s, p, o) in facts {
        db.add_fact(Fact::new(s, p, o));
    }
    db
}

fn star(patterns: &[(&str, &str)]) -> qengine_core::Result<StarQuery> {
    let patterns = patterns
        .iter()
        .map(|(p, o)| {
            TriplePattern::new(
                PatternTerm::variable("v"),
                PatternTerm::bound(*p),
                PatternTerm::bound(*o),
            )
        })
        .collect();
    StarQuery::new(patterns, &["v".to_string()])
}

fn ids(db: &Database, terms: &[&str]) -> Vec<TermId> {
    let mut out: Vec<_> = terms
        .iter()
        .map(|t| db.dictionary().lookup(t).expect("term was loaded"))
        .collect();
    out.sort_unstable();
    out
}

fn sample() -> Database {
    load(&[("a", "p", "b"), ("a", "p", "c"), ("x", "p", "b")])
}

#[test]
fn single_pattern_returns_all_subjects() -> qengine_core::Result<()> {
    let db = sample();
    let query = star(&[("p", "b")])?;
    for strategy in STRATEGIES {
        let result = db.execute_with(&query, strategy)?;
        assert_eq!(result.variable, "v");
        assert_eq!(result.bindings, ids(&db, &["a", "x"]));
    }
    Ok(())
}

#[test]
fn star_keeps_only_subjects_matching_every_pattern() -> qengine_core::Result<()> {
    let db = sample();
    let query = star(&[("p", "b"), ("p", "c")])?;
    for strategy in STRATEGIES {
        assert_eq!(db.execute_with(&query, strategy)?.bindings, ids(&db, &["a"]));
    }
    Ok(())
}

#[test]
fn unknown_object_yields_nothing() -> qengine_core::Result<()> {
    let db = sample();
    let query = star(&[("p", "nonexistent-object")])?;
    for strategy in STRATEGIES {
        assert!(db.execute_with(&query, strategy)?.is_empty());
    }
    Ok(())
}

#[test]
fn unknown_term_is_never_a_wildcard() -> qengine_core::Result<()> {
    let db = sample();
    // An unknown predicate must not degrade into "any predicate".
    let pattern = TriplePattern::new(
        PatternTerm::variable("v"),
        PatternTerm::bound("unknown"),
        PatternTerm::bound("b"),
    );
    assert!(db.resolve(&pattern)?.bindings.is_empty());

    let pattern = TriplePattern::new(
        PatternTerm::bound("nobody"),
        PatternTerm::bound("p"),
        PatternTerm::variable("v"),
    );
    assert!(db.resolve(&pattern)?.bindings.is_empty());
    Ok(())
}

#[test]
fn empty_database_answers_empty() -> qengine_core::Result<()> {
    let db = load(&[]);
    let query = star(&[("p", "b"), ("p", "c")])?;
    for strategy in STRATEGIES {
        assert!(db.execute_with(&query, strategy)?.is_empty());
    }
    Ok(())
}

#[test]
fn first_encoded_term_is_queryable() -> qengine_core::Result<()> {
    let db = sample();
    assert_eq!(db.dictionary().lookup("a"), Some(0));
    let pattern = TriplePattern::new(
        PatternTerm::bound("a"),
        PatternTerm::variable("v"),
        PatternTerm::bound("c"),
    );
    assert_eq!(db.resolve(&pattern)?.bindings, ids(&db, &["p"]));
    Ok(())
}

#[test]
fn malformed_queries_are_rejected() {
    let no_variable = TriplePattern::new(
        PatternTerm::bound("a"),
        PatternTerm::bound("p"),
        PatternTerm::bound("b"),
    );
    assert!(matches!(
        StarQuery::new(vec![no_variable], &[]),
        Err(Error::UnsupportedPattern { .. })
    ));
    assert_eq!(StarQuery::new(Vec::new(), &[]), Err(Error::EmptyQuery));
}
