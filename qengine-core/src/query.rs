//! Validated star queries and their answers.

use serde::{Deserialize, Serialize};

use crate::dictionary::{Dictionary, TermId};
use crate::error::{Error, Result};
use crate::join::shared_variable;
use crate::pattern::TriplePattern;

/// A non-empty list of patterns sharing one variable.
///
/// Construction checks the star shape, so evaluation only fails on
/// structural problems that cannot exist here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarQuery {
    variable: String,
    patterns: Vec<TriplePattern>,
}

impl StarQuery {
    /// `projection` lists the selected variable names; an empty projection
    /// selects the star variable.
    pub fn new(patterns: Vec<TriplePattern>, projection: &[String]) -> Result<Self> {
        let variable = shared_variable(&patterns)?.to_owned();
        if projection.iter().any(|name| *name != variable) {
            return Err(Error::ProjectionMismatch {
                variable,
                projected: projection.to_vec(),
            });
        }
        Ok(Self { variable, patterns })
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn patterns(&self) -> &[TriplePattern] {
        &self.patterns
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub variable: String,
    pub bindings: Vec<TermId>,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings rendered back to their terms.
    pub fn terms<'d>(&self, dictionary: &'d Dictionary) -> Vec<&'d str> {
        self.bindings
            .iter()
            .filter_map(|&id| dictionary.decode(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternTerm;

    fn on(variable: &str) -> TriplePattern {
        TriplePattern::new(
            PatternTerm::variable(variable),
            PatternTerm::bound("p"),
            PatternTerm::bound("o"),
        )
    }

    #[test]
    fn projection_must_name_the_star_variable() {
        assert!(StarQuery::new(vec![on("v0")], &["v0".to_string()]).is_ok());
        assert!(StarQuery::new(vec![on("v0")], &[]).is_ok());
        assert!(matches!(
            StarQuery::new(vec![on("v0")], &["v1".to_string()]),
            Err(Error::ProjectionMismatch { .. })
        ));
    }

    #[test]
    fn rejects_non_star_lists() {
        assert_eq!(StarQuery::new(Vec::new(), &[]), Err(Error::EmptyQuery));
        assert!(matches!(
            StarQuery::new(vec![on("v0"), on("v1")], &[]),
            Err(Error::MixedVariables { .. })
        ));
    }
}
