//! Lexing of RDF terms shared by the N-Triples and query readers, built on
//! winnow.
//!
//! Terms are reduced to their string form: an IRI without its brackets, a
//! literal's unescaped lexical form, a blank node's label. Both readers use
//! the same rules so that a query term matches the data term it names.

use winnow::ascii::{Caseless, digit1};
use winnow::combinator::{alt, delimited, not, opt, preceded, repeat, terminated};
use winnow::error::{ContextError, ErrMode};
use winnow::stream::{AsChar, Location, Stream};
use winnow::token::{any, one_of, take_till, take_while};
use winnow::{LocatingSlice, ModalResult, Parser};

/// Input type for the term parsers; tracks the byte offset for line numbers.
pub(crate) type Input<'a> = LocatingSlice<&'a str>;

/// Drives the term parsers over one statement or query.
pub(crate) struct Lexer<'a> {
    src: &'a str,
    input: Input<'a>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            src,
            input: LocatingSlice::new(src),
        }
    }

    pub(crate) fn rest(&self) -> &'a str {
        *self.input
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.rest().is_empty()
    }

    /// Number of newlines consumed so far.
    pub(crate) fn line_offset(&self) -> usize {
        self.src[..self.input.current_token_start()].matches('\n').count()
    }

    pub(crate) fn skip_ws(&mut self) {
        skip_ws_and_comments(&mut self.input);
    }

    pub(crate) fn eat(&mut self, expected: char) -> bool {
        let eaten: ModalResult<Option<char>> = opt(expected).parse_next(&mut self.input);
        matches!(eaten, Ok(Some(_)))
    }

    pub(crate) fn expect(&mut self, expected: char) -> Result<(), String> {
        if self.eat(expected) {
            return Ok(());
        }
        Err(match self.peek() {
            Some(found) => format!("expected '{expected}', found '{found}'"),
            None => format!("expected '{expected}', found end of input"),
        })
    }

    /// Keyword match, ASCII case-insensitive, on a word boundary.
    pub(crate) fn eat_keyword(&mut self, word: &'static str) -> bool {
        let eaten: ModalResult<Option<()>> = opt(keyword(word)).parse_next(&mut self.input);
        matches!(eaten, Ok(Some(())))
    }

    /// Runs `parser` at the current position. On failure the input is left
    /// untouched and the error names `what` was expected.
    pub(crate) fn lex<T>(
        &mut self,
        what: &str,
        mut parser: impl Parser<Input<'a>, T, ErrMode<ContextError>>,
    ) -> Result<T, String> {
        let start = self.input.checkpoint();
        parser.parse_next(&mut self.input).map_err(|_| {
            self.input.reset(&start);
            format!("invalid {what} at '{}'", snippet(self.rest()))
        })
    }
}

fn snippet(rest: &str) -> &str {
    let line = rest.lines().next().unwrap_or("");
    match line.char_indices().nth(24) {
        Some((end, _)) => &line[..end],
        None => line,
    }
}

fn skip_ws_and_comments(input: &mut Input<'_>) {
    loop {
        let _: ModalResult<&str> = take_while(0.., char::is_whitespace).parse_next(input);
        if input.starts_with('#') {
            let _: ModalResult<&str> = take_till(0.., |c: char| c == '\n').parse_next(input);
        } else {
            break;
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-')
}

fn is_iri_char(c: char) -> bool {
    !matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | '\x00'..='\x20')
}

fn keyword<'a>(word: &'static str) -> impl Parser<Input<'a>, (), ErrMode<ContextError>> {
    terminated(Caseless(word), not(one_of(|c: char| is_name_char(c) || c == ':'))).void()
}

/// A run of name characters. Inner dots are allowed; a trailing dot is left
/// for the statement terminator. May be empty.
pub(crate) fn name<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    (
        take_while(0.., is_name_char),
        repeat::<_, _, (), _, _>(0.., ('.', take_while(1.., is_name_char))),
    )
        .take()
        .parse_next(input)
}

/// `?name` or `$name`; yields the name without its sigil.
pub(crate) fn variable<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    preceded(one_of(['?', '$']), take_while(1.., |c: char| c.is_alphanumeric() || c == '_')).parse_next(input)
}

/// `<iri>`
pub(crate) fn iri_ref(input: &mut Input<'_>) -> ModalResult<String> {
    delimited('<', iri_content, '>').parse_next(input)
}

fn iri_content(input: &mut Input<'_>) -> ModalResult<String> {
    let mut out = String::new();
    loop {
        let chunk: &str = take_while(0.., is_iri_char).parse_next(input)?;
        out.push_str(chunk);
        if !input.starts_with('\\') {
            return Ok(out);
        }
        let escaped = preceded('\\', alt((preceded('u', hex_char(4)), preceded('U', hex_char(8))))).parse_next(input)?;
        out.push(escaped);
    }
}

fn hex_char<'a>(digits: usize) -> impl Parser<Input<'a>, char, ErrMode<ContextError>> {
    take_while(digits, AsChar::is_hex_digit)
        .verify_map(|hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32))
}

/// `_:label`; yields the label.
pub(crate) fn blank_node(input: &mut Input<'_>) -> ModalResult<String> {
    preceded("_:", name.verify(|label: &str| !label.is_empty()))
        .map(|label: &str| label.to_owned())
        .parse_next(input)
}

/// A quoted literal with an optional language tag or datatype, both of
/// which are dropped.
pub(crate) fn literal(input: &mut Input<'_>) -> ModalResult<String> {
    let value = alt((
        delimited('"', string_body('"'), '"'),
        delimited('\'', string_body('\''), '\''),
    ))
    .parse_next(input)?;
    opt(alt((
        preceded('@', take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-')).void(),
        preceded("^^", alt((iri_ref.void(), (name, ':', name).void()))),
    )))
    .parse_next(input)?;
    Ok(value)
}

fn string_body<'a>(quote: char) -> impl Parser<Input<'a>, String, ErrMode<ContextError>> {
    move |input: &mut Input<'a>| -> ModalResult<String> {
        let mut out = String::new();
        loop {
            let chunk: &str =
                take_while(0.., |c: char| c != quote && c != '\\' && c != '\n' && c != '\r').parse_next(input)?;
            out.push_str(chunk);
            if !input.starts_with('\\') {
                return Ok(out);
            }
            out.push(preceded('\\', string_escape).parse_next(input)?);
        }
    }
}

fn string_escape(input: &mut Input<'_>) -> ModalResult<char> {
    alt((
        preceded('u', hex_char(4)),
        preceded('U', hex_char(8)),
        any.verify_map(|c: char| match c {
            't' => Some('\t'),
            'b' => Some('\u{8}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            'f' => Some('\u{c}'),
            '"' | '\'' | '\\' => Some(c),
            _ => None,
        }),
    ))
    .parse_next(input)
}

/// A bare numeric literal, kept as written.
pub(crate) fn number<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    (
        opt(one_of(['+', '-'])),
        alt(((digit1, opt(('.', digit1))).void(), ('.', digit1).void())),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .parse_next(input)
}
