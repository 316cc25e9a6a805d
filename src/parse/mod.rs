//! The grammar state machine.
//!
//! Tokens from the lexer drive a six-state machine that accumulates the
//! current pair's path segments and value, then hands each completed pair to
//! the resolution engine (or, in Repeat mode, to the repeat buffer). Any
//! token not allowed in the current state aborts the parse with a syntax
//! error carrying the token and its byte offset.

mod decode;
mod lexer;
mod path;
mod repeat;
mod resolve;

use crate::config::{ArrayFormat, ParseOptions};
use crate::error::{Error, Result};
use crate::value::QsObject;

use decode::decode;
use lexer::{Lexer, Token};
use path::PathSegment;
use repeat::RepeatBuffer;
use resolve::{ParsedMap, ParsedValue};

#[derive(Clone, Copy, Debug)]
enum State {
    /// Start state, re-entered after every completed pair.
    Init,
    /// A key or index segment was just pushed.
    AfterSegment,
    AfterLeftBracket,
    AfterRightBracket,
    AfterEquals,
    /// The pair's value is stashed; only a separator or end of input may follow.
    AfterValue,
}

struct Parser<'qs> {
    lexer: Lexer<'qs>,
    options: ParseOptions,
    path: Vec<PathSegment<'qs>>,
    pending: Option<ParsedValue<'qs>>,
    repeats: RepeatBuffer<'qs>,
    root: ParsedMap<'qs>,
}

impl<'qs> Parser<'qs> {
    fn new(input: &'qs [u8], options: ParseOptions) -> Self {
        Parser {
            lexer: Lexer::new(input),
            options,
            path: Vec::new(),
            pending: None,
            repeats: RepeatBuffer::default(),
            root: ParsedMap::new(),
        }
    }

    /// Runs the parse to completion, consuming the parser. Per-call state
    /// cannot leak between parses because every parse gets a fresh instance.
    fn run(mut self) -> Result<QsObject<'qs>> {
        let mut state = State::Init;
        loop {
            let position = self.lexer.position();
            let token = self.lexer.next_token();
            state = match state {
                State::Init => match token {
                    Token::Separator => State::Init,
                    Token::Eof => break,
                    Token::Value(text) => {
                        self.path.push(PathSegment::classify(text, position)?);
                        State::AfterSegment
                    }
                    token => return Err(Error::syntax(token, position)),
                },
                State::AfterSegment => match token {
                    Token::LeftBracket => State::AfterLeftBracket,
                    Token::RightBracket => State::AfterRightBracket,
                    Token::Equals => State::AfterEquals,
                    token => return Err(Error::syntax(token, position)),
                },
                State::AfterLeftBracket => match token {
                    Token::Value(text) => {
                        self.path.push(PathSegment::classify(text, position)?);
                        State::AfterSegment
                    }
                    Token::RightBracket => {
                        self.path.push(PathSegment::Append);
                        State::AfterRightBracket
                    }
                    token => return Err(Error::syntax(token, position)),
                },
                State::AfterRightBracket => match token {
                    Token::LeftBracket => State::AfterLeftBracket,
                    Token::Equals => State::AfterEquals,
                    token => return Err(Error::syntax(token, position)),
                },
                State::AfterEquals => match token {
                    Token::Value(text) => {
                        self.pending = Some(self.pair_value(text, position)?);
                        State::AfterValue
                    }
                    // an empty value (`a=`) is a null scalar, not an error
                    Token::Separator => {
                        self.complete_pair(position)?;
                        State::Init
                    }
                    Token::Eof => {
                        self.complete_pair(position)?;
                        break;
                    }
                    token => return Err(Error::syntax(token, position)),
                },
                State::AfterValue => match token {
                    Token::Separator => {
                        self.complete_pair(position)?;
                        State::Init
                    }
                    Token::Eof => {
                        self.complete_pair(position)?;
                        break;
                    }
                    token => return Err(Error::syntax(token, position)),
                },
            };
        }
        self.finish()
    }

    /// Decodes a raw value token. In Comma mode a value containing `,` is
    /// split on the raw bytes (an encoded `%2C` stays literal) into an
    /// ordered list of scalars; a solitary piece stays a scalar so a single
    /// value does not force array shape.
    fn pair_value(&self, raw: &'qs [u8], position: usize) -> Result<ParsedValue<'qs>> {
        if self.options.array_format == ArrayFormat::Comma && raw.contains(&b',') {
            let items = raw
                .split(|&b| b == b',')
                .map(|piece| Ok(ParsedValue::String(decode(piece, position)?)))
                .collect::<Result<Vec<_>>>()?;
            return Ok(ParsedValue::Sequence(items));
        }
        Ok(ParsedValue::String(decode(raw, position)?))
    }

    fn complete_pair(&mut self, position: usize) -> Result<()> {
        let value = self.pending.take().unwrap_or(ParsedValue::Null);
        let path = std::mem::take(&mut self.path);
        if self.options.array_format == ArrayFormat::Repeat {
            self.repeats.record(path, value, position);
            Ok(())
        } else {
            resolve::graft(
                &mut self.root,
                &path,
                value,
                self.options.max_depth,
                position,
            )
        }
    }

    fn finish(mut self) -> Result<QsObject<'qs>> {
        for (path, value, position) in std::mem::take(&mut self.repeats).drain() {
            resolve::graft(
                &mut self.root,
                &path,
                value,
                self.options.max_depth,
                position,
            )?;
        }
        resolve::finish(self.root)
    }
}

/// Parses a querystring with the given options. Empty or whitespace-only
/// input yields an empty tree.
pub(crate) fn parse_bytes_with<'qs>(
    input: &'qs [u8],
    options: ParseOptions,
) -> Result<QsObject<'qs>> {
    if input.iter().all(u8::is_ascii_whitespace) {
        return Ok(QsObject::new());
    }
    Parser::new(input, options).run()
}
