//! Line-oriented N-Triples reader.

use std::io::BufRead;

use crate::error::ParseError;
use crate::terms::{Lexer, blank_node, iri_ref, literal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

/// Yields one statement per non-empty, non-comment line.
pub struct NTriplesReader<R> {
    input: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> NTriplesReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for NTriplesReader<R> {
    type Item = Result<Statement, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.input.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line += 1,
                Err(err) => return Some(Err(err.into())),
            }
            let text = self.buf.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            return Some(parse_line(text).map_err(|message| ParseError::syntax(self.line, message)));
        }
    }
}

pub fn parse_line(text: &str) -> Result<Statement, String> {
    let mut lexer = Lexer::new(text);

    lexer.skip_ws();
    let subject = match lexer.peek() {
        Some('<') => lexer.lex("IRI", iri_ref)?,
        Some('_') => lexer.lex("blank node", blank_node)?,
        _ => return Err("subject must be an IRI or blank node".into()),
    };

    lexer.skip_ws();
    if lexer.peek() != Some('<') {
        return Err("predicate must be an IRI".into());
    }
    let predicate = lexer.lex("IRI", iri_ref)?;

    lexer.skip_ws();
    let object = match lexer.peek() {
        Some('<') => lexer.lex("IRI", iri_ref)?,
        Some('_') => lexer.lex("blank node", blank_node)?,
        Some('"') => lexer.lex("literal", literal)?,
        _ => return Err("object must be an IRI, blank node or literal".into()),
    };

    lexer.skip_ws();
    lexer.expect('.')?;
    lexer.skip_ws();
    if !lexer.is_eof() {
        return Err(format!("trailing content '{}'", lexer.rest()));
    }

    Ok(Statement {
        subject,
        predicate,
        object,
    })
}
