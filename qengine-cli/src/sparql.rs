//! Reader for star-shaped SELECT queries.
//!
//! Only the subset needed by star workloads is understood: `PREFIX`/`BASE`
//! declarations, a `SELECT` projection and one basic graph pattern. Queries
//! are split on lines whose trimmed form ends with `}`.

use std::collections::HashMap;
use std::io::BufRead;

use qengine_core::{PatternTerm, TriplePattern};

use crate::error::ParseError;
use crate::terms::{Lexer, iri_ref, literal, name, number, variable};

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Line on which the query starts.
    pub line: usize,
    /// Selected variables; empty for `SELECT *`.
    pub projection: Vec<String>,
    pub patterns: Vec<TriplePattern>,
}

pub struct QueryReader<R> {
    input: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> QueryReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for QueryReader<R> {
    type Item = Result<ParsedQuery, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut text = String::new();
        let mut start = None;
        loop {
            self.buf.clear();
            match self.input.read_line(&mut self.buf) {
                Ok(0) => break,
                Ok(_) => self.line += 1,
                Err(err) => return Some(Err(err.into())),
            }
            if start.is_none() {
                if self.buf.trim().is_empty() {
                    continue;
                }
                start = Some(self.line);
            }
            text.push_str(&self.buf);
            if self.buf.trim_end().ends_with('}') {
                break;
            }
        }
        let start = start?;
        Some(parse_query(&text, start))
    }
}

/// Parses one query whose first line is `line`.
pub fn parse_query(text: &str, line: usize) -> Result<ParsedQuery, ParseError> {
    let mut parser = Parser {
        lexer: Lexer::new(text),
        prefixes: HashMap::new(),
        base: None,
    };
    parser
        .query(line)
        .map_err(|message| ParseError::syntax(line + parser.lexer.line_offset(), message))
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    prefixes: HashMap<String, String>,
    base: Option<String>,
}

impl Parser<'_> {
    fn query(&mut self, line: usize) -> Result<ParsedQuery, String> {
        self.prologue()?;

        self.lexer.skip_ws();
        if !self.lexer.eat_keyword("SELECT") {
            return Err("expected SELECT".into());
        }
        self.lexer.skip_ws();
        self.lexer.eat_keyword("DISTINCT");
        let projection = self.projection()?;

        self.lexer.skip_ws();
        self.lexer.eat_keyword("WHERE");
        self.lexer.skip_ws();
        self.lexer.expect('{')?;
        let patterns = self.triples()?;
        self.lexer.expect('}')?;
        self.lexer.skip_ws();
        if !self.lexer.is_eof() {
            return Err(format!("unexpected content after query: '{}'", self.lexer.rest().trim()));
        }

        Ok(ParsedQuery {
            line,
            projection,
            patterns,
        })
    }

    fn prologue(&mut self) -> Result<(), String> {
        loop {
            self.lexer.skip_ws();
            if self.lexer.eat_keyword("PREFIX") {
                self.lexer.skip_ws();
                let prefix = self.lexer.lex("prefix", name)?.to_owned();
                self.lexer.expect(':')?;
                self.lexer.skip_ws();
                let iri = self.iri()?;
                self.prefixes.insert(prefix, iri);
            } else if self.lexer.eat_keyword("BASE") {
                self.lexer.skip_ws();
                self.base = Some(self.lexer.lex("IRI", iri_ref)?);
            } else {
                return Ok(());
            }
        }
    }

    fn projection(&mut self) -> Result<Vec<String>, String> {
        if self.lexer.eat('*') {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        while let Some('?' | '$') = self.lexer.peek() {
            names.push(self.variable()?);
            self.lexer.skip_ws();
        }
        if names.is_empty() {
            return Err("SELECT needs '*' or at least one variable".into());
        }
        Ok(names)
    }

    fn triples(&mut self) -> Result<Vec<TriplePattern>, String> {
        let mut patterns = Vec::new();
        loop {
            self.lexer.skip_ws();
            if self.lexer.peek() == Some('}') {
                return Ok(patterns);
            }
            let subject = self.term(false)?;
            loop {
                self.lexer.skip_ws();
                let predicate = self.term(true)?;
                loop {
                    self.lexer.skip_ws();
                    let object = self.term(false)?;
                    patterns.push(TriplePattern::new(subject.clone(), predicate.clone(), object));
                    self.lexer.skip_ws();
                    if !self.lexer.eat(',') {
                        break;
                    }
                }
                if !self.lexer.eat(';') {
                    break;
                }
                self.lexer.skip_ws();
                // A dangling ';' may close the subject's list.
                if matches!(self.lexer.peek(), Some('.' | '}')) {
                    break;
                }
            }
            self.lexer.skip_ws();
            if !self.lexer.eat('.') && self.lexer.peek() != Some('}') {
                return Err("expected '.' or '}' after triple pattern".into());
            }
        }
    }

    fn term(&mut self, predicate: bool) -> Result<PatternTerm, String> {
        if predicate && self.lexer.eat_keyword("a") {
            return Ok(PatternTerm::bound(RDF_TYPE));
        }
        for keyword in ["true", "false"] {
            if self.lexer.eat_keyword(keyword) {
                return Ok(PatternTerm::bound(keyword));
            }
        }
        match self.lexer.peek() {
            Some('?' | '$') => Ok(PatternTerm::Variable(self.variable()?)),
            Some('<') => Ok(PatternTerm::Bound(self.iri()?)),
            Some('"' | '\'') => Ok(PatternTerm::Bound(self.lexer.lex("literal", literal)?)),
            // `_:x` in a query is an anonymous variable.
            Some('_') if self.lexer.rest().starts_with("_:") => {
                Err("blank nodes are not supported in queries; use a variable".into())
            }
            Some(c) if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => {
                self.lexer.lex("number", number).map(PatternTerm::bound)
            }
            Some(_) => self.prefixed_name().map(PatternTerm::Bound),
            None => Err("unexpected end of query".into()),
        }
    }

    fn variable(&mut self) -> Result<String, String> {
        self.lexer.lex("variable", variable).map(str::to_owned)
    }

    /// An IRI reference resolved against `BASE` when relative.
    fn iri(&mut self) -> Result<String, String> {
        let iri = self.lexer.lex("IRI", iri_ref)?;
        match &self.base {
            Some(base) if !iri.contains(':') => Ok(format!("{base}{iri}")),
            _ => Ok(iri),
        }
    }

    fn prefixed_name(&mut self) -> Result<String, String> {
        let prefix = self.lexer.lex("prefixed name", name)?;
        if !self.lexer.eat(':') {
            return Err(format!("unexpected token '{prefix}'"));
        }
        let local = self.lexer.lex("local name", name)?;
        let namespace = self
            .prefixes
            .get(prefix)
            .ok_or_else(|| format!("undeclared prefix '{prefix}:'"))?;
        Ok(format!("{namespace}{local}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> PatternTerm {
        PatternTerm::variable(name)
    }

    fn iri(value: &str) -> PatternTerm {
        PatternTerm::bound(value)
    }

    #[test]
    fn parses_a_star_query() {
        let text = "SELECT ?v0 WHERE {\n\
                    ?v0 <http://ex.org/p> <http://ex.org/b> .\n\
                    ?v0 <http://ex.org/q> \"lit\" .\n\
                    }";
        let query = parse_query(text, 1).unwrap();
        assert_eq!(query.projection, vec!["v0".to_string()]);
        assert_eq!(
            query.patterns,
            vec![
                TriplePattern::new(var("v0"), iri("http://ex.org/p"), iri("http://ex.org/b")),
                TriplePattern::new(var("v0"), iri("http://ex.org/q"), iri("lit")),
            ]
        );
    }

    #[test]
    fn expands_prefixes_and_shorthand() {
        let text = "PREFIX ex: <http://ex.org/>\n\
                    select * where { ?s a ex:Person ; ex:age 42 , ex:unknown. }";
        let query = parse_query(text, 1).unwrap();
        assert!(query.projection.is_empty());
        assert_eq!(
            query.patterns,
            vec![
                TriplePattern::new(var("s"), iri(RDF_TYPE), iri("http://ex.org/Person")),
                TriplePattern::new(var("s"), iri("http://ex.org/age"), iri("42")),
                TriplePattern::new(var("s"), iri("http://ex.org/age"), iri("http://ex.org/unknown")),
            ]
        );
    }

    #[test]
    fn reader_splits_on_closing_brace() {
        let input = "SELECT ?v WHERE {\n?v <p> <o> .\n}\n\n\
                     SELECT ?v WHERE { ?v <p> <q> }\n";
        let queries: Vec<_> = QueryReader::new(input.as_bytes()).map(Result::unwrap).collect();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].line, 1);
        assert_eq!(queries[1].line, 5);
        assert_eq!(queries[1].patterns[0].object, iri("q"));
    }

    #[test]
    fn errors_carry_the_offending_line() {
        let input = "SELECT ?v WHERE {\n?v <p> <o> .\n?v <p> ex:o .\n}\n";
        let err = QueryReader::new(input.as_bytes()).next().unwrap().unwrap_err();
        match err {
            ParseError::Syntax { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("undeclared prefix"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn blank_nodes_are_rejected_in_queries() {
        let err = parse_query("SELECT ?v WHERE { ?v <p> _:b0 . }", 1).unwrap_err();
        match err {
            ParseError::Syntax { message, .. } => assert!(message.contains("blank nodes")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_select_is_rejected() {
        assert!(parse_query("ASK { ?s ?p ?o }", 1).is_err());
    }
}
