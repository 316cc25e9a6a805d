use std::fmt;

/// One lexical unit of the querystring grammar.
///
/// `Value` text is raw: percent-decoding is applied by the caller, uniformly,
/// before the text enters the tree.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Token<'qs> {
    Value(&'qs [u8]),
    LeftBracket,
    RightBracket,
    Equals,
    Separator,
    Eof,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Value(text) => write!(f, "value `{}`", String::from_utf8_lossy(text)),
            Token::LeftBracket => write!(f, "`[`"),
            Token::RightBracket => write!(f, "`]`"),
            Token::Equals => write!(f, "`=`"),
            Token::Separator => write!(f, "pair separator"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

/// Byte-cursor tokenizer. Purely lexical: it recognizes the five structural
/// characters and hands back everything between them as an uninterpreted
/// text run. It never fails and never looks ahead.
pub(crate) struct Lexer<'qs> {
    input: &'qs [u8],
    index: usize,
}

impl<'qs> Lexer<'qs> {
    pub(crate) fn new(input: &'qs [u8]) -> Self {
        Lexer { input, index: 0 }
    }

    /// Byte offset of the next unconsumed character, for error reporting.
    pub(crate) fn position(&self) -> usize {
        self.index
    }

    pub(crate) fn next_token(&mut self) -> Token<'qs> {
        let Some(&byte) = self.input.get(self.index) else {
            return Token::Eof;
        };
        self.index += 1;
        match byte {
            b'[' => Token::LeftBracket,
            b']' => Token::RightBracket,
            b'=' => Token::Equals,
            b'&' | b';' => Token::Separator,
            _ => {
                let start = self.index - 1;
                while self
                    .input
                    .get(self.index)
                    .is_some_and(|b| !matches!(b, b'[' | b']' | b'=' | b'&' | b';'))
                {
                    self.index += 1;
                }
                Token::Value(&self.input[start..self.index])
            }
        }
    }
}
