use crate::ast::*;
use crate::graph::AssociationKind;
use crate::lexer::{LexError, Lexer, Spanned, Token};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("line {line}: unexpected token {found:?}, expected {expected}")]
    Unexpected {
        found: Token,
        expected: &'static str,
        line: usize,
    },
    #[error("line {line}: unknown association kind {kind:?}")]
    UnknownKind { kind: String, line: usize },
}

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self { tokens, pos: 0 })
    }

    fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .map(|t| &t.token)
            .unwrap_or(&Token::Eof)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or(self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        self.pos += 1;
        tok
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::Unexpected {
            found: self.peek().clone(),
            expected,
            line: self.line(),
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Token::Ident(s) => {
                let s = s.clone();
                self.pos += 1;
                Ok(s)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), ParseError> {
        if *self.peek() == expected {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn check_ident(&self, name: &str) -> bool {
        matches!(self.peek(), Token::Ident(s) if s == name)
    }

    pub fn parse(&mut self) -> Result<Schema, ParseError> {
        let mut schema = Schema::default();

        while *self.peek() != Token::Eof {
            if self.check_ident("entity") {
                self.advance();
                schema.entities.push(self.parse_entity()?);
            } else if self.check_ident("rel") {
                self.advance();
                schema.associations.extend(self.parse_rel_block()?);
            } else if self.check_ident("view") {
                self.advance();
                schema.views.push(self.parse_view()?);
            } else {
                return Err(self.unexpected("entity, rel, or view"));
            }
        }

        Ok(schema)
    }

    fn parse_entity(&mut self) -> Result<Entity, ParseError> {
        let line = self.line();
        let name = self.expect_ident()?;
        let mut columns = Vec::new();

        // A bare `entity Name` has no column block.
        if *self.peek() == Token::LBrace {
            self.advance();
            while *self.peek() != Token::RBrace {
                columns.push(self.parse_column()?);
            }
            self.expect(Token::RBrace, "}")?;
        }

        Ok(Entity {
            name,
            columns,
            line,
        })
    }

    fn parse_column(&mut self) -> Result<Column, ParseError> {
        let name = self.expect_ident()?;
        let typ = self.expect_ident()?;
        let mut pk = false;
        let mut fk = None;

        loop {
            if self.check_ident("pk") {
                self.advance();
                pk = true;
            } else if self.check_ident("fk") {
                self.advance();
                self.expect(Token::Arrow, "->")?;
                let target = self.expect_ident()?;
                // The referenced column plays no part in ranking.
                self.expect(Token::Dot, ".")?;
                self.expect_ident()?;
                fk = Some(target);
            } else {
                break;
            }
        }

        Ok(Column { name, typ, pk, fk })
    }

    fn parse_rel_block(&mut self) -> Result<Vec<Association>, ParseError> {
        self.expect(Token::LBrace, "{")?;
        let mut rels = Vec::new();

        while *self.peek() != Token::RBrace {
            rels.push(self.parse_association()?);
        }

        self.expect(Token::RBrace, "}")?;
        Ok(rels)
    }

    fn parse_association(&mut self) -> Result<Association, ParseError> {
        let line = self.line();
        let source = self.expect_ident()?;
        self.expect(Token::Arrow, "->")?;
        let target = self.expect_ident()?;

        let mut kind = AssociationKind::default();
        let mut label = None;

        if *self.peek() == Token::Colon {
            self.advance();
            let kind_line = self.line();
            match self.advance() {
                Token::Ident(s) => {
                    kind = AssociationKind::from_str(&s).ok_or(ParseError::UnknownKind {
                        kind: s,
                        line: kind_line,
                    })?;
                }
                Token::Str(s) => label = Some(s),
                _ => {
                    self.pos -= 1;
                    return Err(self.unexpected("association kind or string label"));
                }
            }
        }

        Ok(Association {
            source,
            target,
            kind,
            label,
            line,
        })
    }

    fn parse_ident_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut list = vec![self.expect_ident()?];
        while *self.peek() == Token::Comma {
            self.advance();
            list.push(self.expect_ident()?);
        }
        Ok(list)
    }

    fn parse_view(&mut self) -> Result<View, ParseError> {
        let name = self.expect_ident()?;
        self.expect(Token::LBrace, "{")?;

        let mut includes = Vec::new();

        while *self.peek() != Token::RBrace {
            if self.check_ident("include") {
                self.advance();
                includes.extend(self.parse_ident_list()?);
            } else {
                return Err(self.unexpected("include"));
            }
        }

        self.expect(Token::RBrace, "}")?;

        Ok(View { name, includes })
    }
}
