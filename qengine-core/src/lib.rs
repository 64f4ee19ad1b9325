//! qengine core: dictionary-encoded triples, a six-way permutation index and
//! star-query evaluation.
//!
//! The database is filled once through [`Database::add_fact`] and then
//! queried through shared references, so the index cannot change while a
//! query is running.

mod dictionary;
mod error;
mod index;
mod join;
mod pattern;
mod query;
mod triple;

use tracing::debug;

pub use dictionary::{Dictionary, TermId};
pub use error::{Error, Result};
pub use index::{Permutation, PermutationIndex, Position};
pub use join::{JoinStrategy, intersect_sorted, join, shared_variable};
pub use pattern::{PatternTerm, Resolved, Slot, TriplePattern, resolve};
pub use query::{QueryResult, StarQuery};
pub use triple::{Fact, Triple};

/// Evaluation settings.
#[derive(Debug, Clone, Default)]
pub struct Options {
    join_strategy: JoinStrategy,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_join_strategy(mut self, strategy: JoinStrategy) -> Self {
        self.join_strategy = strategy;
        self
    }

    pub fn join_strategy(&self) -> JoinStrategy {
        self.join_strategy
    }
}

#[derive(Debug, Default)]
pub struct Database {
    options: Options,
    dictionary: Dictionary,
    index: PermutationIndex,
}

impl Database {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            dictionary: Dictionary::new(),
            index: PermutationIndex::new(),
        }
    }

    /// Encodes and indexes one fact.
    pub fn add_fact(&mut self, fact: Fact<'_>) -> Triple {
        let subject = self.dictionary.encode(fact.subject);
        let predicate = self.dictionary.encode(fact.predicate);
        let object = self.dictionary.encode(fact.object);
        let triple = Triple::new(subject, predicate, object);
        self.index.insert(triple);
        triple
    }

    /// Resolves a single pattern on its own.
    pub fn resolve(&self, pattern: &TriplePattern) -> Result<Resolved> {
        resolve(pattern, &self.dictionary, &self.index)
    }

    pub fn execute(&self, query: &StarQuery) -> Result<QueryResult> {
        self.execute_with(query, self.options.join_strategy)
    }

    pub fn execute_with(&self, query: &StarQuery, strategy: JoinStrategy) -> Result<QueryResult> {
        let bindings = join(query.patterns(), &self.dictionary, &self.index, strategy)?;
        debug!(
            variable = query.variable(),
            patterns = query.patterns().len(),
            ?strategy,
            results = bindings.len(),
            "query evaluated"
        );
        Ok(QueryResult {
            variable: query.variable().to_owned(),
            bindings,
        })
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn index(&self) -> &PermutationIndex {
        &self.index
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_query() -> Result<()> {
        let mut db = Database::new(Options::new());
        let triple = db.add_fact(Fact::new("alice", "knows", "bob"));
        assert!(db.index().contains(&triple));
        assert_eq!(db.dictionary().decode(triple.subject_id), Some("alice"));

        let query = StarQuery::new(
            vec![TriplePattern::new(
                PatternTerm::variable("who"),
                PatternTerm::bound("knows"),
                PatternTerm::bound("bob"),
            )],
            &["who".to_string()],
        )?;
        let result = db.execute(&query)?;
        assert_eq!(result.terms(db.dictionary()), vec!["alice"]);
        Ok(())
    }

    #[test]
    fn duplicate_facts_index_once() {
        let mut db = Database::default();
        let first = db.add_fact(Fact::new("a", "p", "b"));
        let second = db.add_fact(Fact::new("a", "p", "b"));
        assert_eq!(first, second);
        assert_eq!(db.index().len(), 1);
        assert_eq!(db.dictionary().len(), 3);
    }
}
