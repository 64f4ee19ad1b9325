//! Bidirectional term dictionary.
//!
//! Terms are stored in insertion order, so a term's position in the set is
//! its id. This keeps ids dense and lets decoding be a plain index lookup.

use indexmap::IndexSet;

pub type TermId = u64;

#[derive(Debug, Default, Clone)]
pub struct Dictionary {
    terms: IndexSet<String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `term`, allocating the next one if it is unseen.
    pub fn encode(&mut self, term: &str) -> TermId {
        if let Some(id) = self.terms.get_index_of(term) {
            return id as TermId;
        }
        let (id, _) = self.terms.insert_full(term.to_owned());
        id as TermId
    }

    pub fn lookup(&self, term: &str) -> Option<TermId> {
        self.terms.get_index_of(term).map(|id| id as TermId)
    }

    pub fn decode(&self, id: TermId) -> Option<&str> {
        let index = usize::try_from(id).ok()?;
        self.terms.get_index(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
