use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),

    LBrace, // {
    RBrace, // }
    Comma,  // ,
    Colon,  // :
    Dot,    // .
    Arrow,  // ->

    Eof,
}

/// A token with the line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("line {line}: unexpected character {ch:?}")]
    UnexpectedChar { ch: char, line: usize },
    #[error("line {0}: unterminated string")]
    UnterminatedString(usize),
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn read_ident(&mut self, first: char) -> String {
        let mut s = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    fn read_string(&mut self) -> Result<String, LexError> {
        let start = self.line;
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(s),
                Some('\\') => match self.bump() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some(c) => s.push(c),
                    None => return Err(LexError::UnterminatedString(start)),
                },
                Some(c) => s.push(c),
                None => return Err(LexError::UnterminatedString(start)),
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Spanned, LexError> {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let c = match self.bump() {
            Some(c) => c,
            None => {
                return Ok(Spanned {
                    token: Token::Eof,
                    line,
                });
            }
        };

        let token = match c {
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '.' => Token::Dot,
            '-' if self.chars.peek() == Some(&'>') => {
                self.bump();
                Token::Arrow
            }
            '"' => Token::Str(self.read_string()?),
            c if c.is_alphanumeric() || c == '_' => Token::Ident(self.read_ident(c)),
            ch => return Err(LexError::UnexpectedChar { ch, line }),
        };

        Ok(Spanned { token, line })
    }

    pub fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let done = tok.token == Token::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        Ok(tokens)
    }
}
