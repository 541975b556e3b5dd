use super::error::EvalError;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Plus,
    Minus,
    Mult,
    Div,
    Pow,
}

impl Op {
    pub fn symbol(self) -> char {
        match self {
            Op::Plus => '+',
            Op::Minus => '-',
            Op::Mult => '*',
            Op::Div => '/',
            Op::Pow => '^',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(String),
    Op(Op),
    LParen,
    RParen,
    Comma,
}

/// A token together with the character offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

/// Lazy tokenizer over an expression.
///
/// Tokens are produced one at a time as the parser asks for them. To scan the
/// same text again, build a new `Tokenizer`; there is no way to resume from
/// the middle.
pub struct Tokenizer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    // byte offset -> char offset bookkeeping for diagnostics
    char_pos: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            chars: input.char_indices().peekable(),
            char_pos: 0,
            failed: false,
        }
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if next.is_some() {
            self.char_pos += 1;
        }
        next
    }

    fn bump_if(&mut self, pred: impl Fn(char) -> bool) -> Option<(usize, char)> {
        match self.chars.peek() {
            Some(&(_, c)) if pred(c) => self.bump(),
            _ => None,
        }
    }

    fn number(&mut self, start: usize, first: char) -> Result<Token, EvalError> {
        let position = self.char_pos - 1;
        let mut has_dot = first == '.';
        let mut end = start + first.len_utf8();

        while let Some((i, c)) = self.bump_if(|c| c.is_ascii_digit() || c == '.') {
            if c == '.' {
                if has_dot {
                    return Err(EvalError::syntax("second decimal point in number", self.char_pos - 1));
                }
                has_dot = true;
            }
            end = i + c.len_utf8();
        }

        for _ in 0..self.exponent_len() {
            if let Some((i, c)) = self.bump() {
                end = i + c.len_utf8();
            }
        }

        let text = &self.input[start..end];
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| EvalError::syntax(format!("invalid number '{}'", text), position))
    }

    /// Length in chars of an `e[+-]digits` suffix at the cursor, or 0 when
    /// the next chars do not form one (`2e` stays a number followed by `e`).
    fn exponent_len(&self) -> usize {
        let mut ahead = self.chars.clone();
        if !matches!(ahead.next(), Some((_, 'e' | 'E'))) {
            return 0;
        }
        let mut len = 1;
        if matches!(ahead.peek(), Some(&(_, '+' | '-'))) {
            ahead.next();
            len += 1;
        }
        match ahead.take_while(|&(_, c)| c.is_ascii_digit()).count() {
            0 => 0,
            digits => len + digits,
        }
    }

    fn ident(&mut self, start: usize, first: char) -> Token {
        let mut end = start + first.len_utf8();
        while let Some((i, c)) = self.bump_if(|c| c.is_ascii_alphanumeric() || c == '_') {
            end = i + c.len_utf8();
        }
        Token::Ident(self.input[start..end].to_string())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Spanned, EvalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while self.bump_if(char::is_whitespace).is_some() {}

        let (start, c) = self.bump()?;
        let position = self.char_pos - 1;

        let token = match c {
            '0'..='9' | '.' => self.number(start, c),
            c if c.is_ascii_alphabetic() || c == '_' => Ok(self.ident(start, c)),
            '+' => Ok(Token::Op(Op::Plus)),
            '-' => Ok(Token::Op(Op::Minus)),
            '*' => Ok(Token::Op(Op::Mult)),
            '/' => Ok(Token::Op(Op::Div)),
            '^' => Ok(Token::Op(Op::Pow)),
            '(' => Ok(Token::LParen),
            ')' => Ok(Token::RParen),
            ',' => Ok(Token::Comma),
            _ => Err(EvalError::Lexical { ch: c, position }),
        };

        match token {
            Ok(token) => {
                log::trace!("token {:?} at {}", token, position);
                Some(Ok(Spanned { token, position }))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Convenience for callers that want the whole token list at once.
pub fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    Tokenizer::new(input)
        .map(|spanned| spanned.map(|s| s.token))
        .collect()
}
