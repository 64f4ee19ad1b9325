//! Borrowed string facts and their encoded form.

use serde::{Deserialize, Serialize};

use crate::dictionary::TermId;

/// A triple of string terms as delivered by a data reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fact<'a> {
    pub subject: &'a str,
    pub predicate: &'a str,
    pub object: &'a str,
}

impl<'a> Fact<'a> {
    pub fn new(subject: &'a str, predicate: &'a str, object: &'a str) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

/// A dictionary-encoded triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject_id: TermId,
    pub predicate_id: TermId,
    pub object_id: TermId,
}

impl Triple {
    pub fn new(subject_id: TermId, predicate_id: TermId, object_id: TermId) -> Self {
        Self {
            subject_id,
            predicate_id,
            object_id,
        }
    }

    /// Fields in canonical subject, predicate, object order.
    pub(crate) fn fields(&self) -> [TermId; 3] {
        [self.subject_id, self.predicate_id, self.object_id]
    }
}
