//! Recursive-descent parser over the token vector.
//!
//! Statements are semicolon-terminated (the final one of a unit may rely on
//! the end of input or the closing brace instead). The REPL driver feeds one
//! line per unit, which is how end-of-line doubles as a terminator there.
use std::{error::Error, fmt::Display, rc::Rc};

use num_bigint::BigInt;

use crate::ast::{
    Assignment, Call, Comment, FunctionNode, Ident, Integer, MemberAccess, Mention, Node,
    RecordField, RecordLiteral, Statement, Str,
};
use crate::lexer::{Position, Range, Token, TokenType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub position: Position,
}

impl ParseError {
    fn new(message: impl Into<String>, position: Position) -> ParseError {
        ParseError {
            message: message.into(),
            position,
        }
    }

    fn unexpected(token: &Token, expected: &str) -> ParseError {
        let found = match token.ty {
            TokenType::Eof => "end of input".to_owned(),
            _ => format!("'{}'", token.text),
        };
        ParseError::new(
            format!("expected {expected}, found {found}"),
            token.position(),
        )
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.message, self.position)
    }
}

impl Error for ParseError {}

pub struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens;
        if tokens.is_empty() {
            tokens.push(Token::new(TokenType::Eof, "", Range::default()));
        }
        Self { tokens, cursor: 0 }
    }

    fn peek(&self) -> &Token {
        self.token_at(self.cursor)
    }

    fn peek_second(&self) -> &Token {
        self.token_at(self.cursor + 1)
    }

    fn token_at(&self, index: usize) -> &Token {
        // The lexer terminates every unit with Eof; reading past it keeps
        // yielding that Eof.
        self.tokens
            .get(index)
            .unwrap_or_else(|| &self.tokens[self.tokens.len() - 1])
    }

    fn at(&self, ty: TokenType) -> bool {
        self.peek().ty == ty
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }
        token
    }

    fn expect(&mut self, ty: TokenType, expected: &str) -> Result<Token, ParseError> {
        if self.at(ty) {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected(self.peek(), expected))
        }
    }

    /// Parse every statement of the current unit.
    pub fn parse_toplevel(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = vec![];
        while !self.at(TokenType::Eof) {
            self.parse_statement_into(&mut statements, TokenType::Eof)?;
        }
        Ok(statements)
    }

    /// Parse one statement (plus the comment nodes it brings along) into
    /// `statements`. Leading comments become their own nodes and are hosted
    /// by the statement; a same-line comment after the expression or its
    /// semicolon is hosted the same way.
    fn parse_statement_into(
        &mut self,
        statements: &mut Vec<Statement>,
        until: TokenType,
    ) -> Result<(), ParseError> {
        let mut hosted = vec![];
        while self.at(TokenType::Comment) {
            let token = self.advance();
            let comment = Rc::new(Comment::new(token.text, token.source_range));
            statements.push(Statement {
                node: Rc::new(Node::Comment(comment.clone())),
                comments: vec![],
                source_range: token.source_range,
            });
            hosted.push(comment);
        }

        if self.at(until) || self.at(TokenType::Eof) {
            // Nothing follows; the comments stay unhosted and will attach to
            // the next binding at run time.
            return Ok(());
        }
        if self.at(TokenType::Semicolon) {
            self.advance();
            return Ok(());
        }

        let node = self.parse_expression()?;
        let source_range = node.source_range();
        for comment in &hosted {
            comment.hosted.set(true);
        }

        let mut trailing = vec![];
        let take_trailing_comment = |parser: &mut Parser, trailing: &mut Vec<Rc<Comment>>| {
            if parser.at(TokenType::Comment)
                && parser.peek().source_range.start.line == source_range.end.line
            {
                let token = parser.advance();
                let comment = Rc::new(Comment::new(token.text, token.source_range));
                comment.hosted.set(true);
                trailing.push(comment);
            }
        };

        take_trailing_comment(self, &mut trailing);
        if self.at(TokenType::Semicolon) {
            self.advance();
            take_trailing_comment(self, &mut trailing);
        } else if !(self.at(until) || self.at(TokenType::Eof)) {
            return Err(ParseError::unexpected(self.peek(), "';'"));
        }

        hosted.extend(trailing.iter().cloned());
        statements.push(Statement {
            node: Rc::new(node),
            comments: hosted,
            source_range,
        });
        for comment in trailing {
            let source_range = comment.source_range;
            statements.push(Statement {
                node: Rc::new(Node::Comment(comment)),
                comments: vec![],
                source_range,
            });
        }
        Ok(())
    }

    fn parse_expression(&mut self) -> Result<Node, ParseError> {
        if self.at(TokenType::Identifier) && self.peek_second().ty == TokenType::Equals {
            let name = self.advance();
            self.advance();
            let value = self.parse_expression()?;
            let source_range = Range::between(name.source_range, value.source_range());
            return Ok(Node::Assignment(Assignment {
                name: name.text,
                value: Rc::new(value),
                source_range,
            }));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Node, ParseError> {
        let mut node = self.parse_primary()?;
        loop {
            match self.peek().ty {
                TokenType::Dot => {
                    self.advance();
                    let field = self.peek().clone();
                    if !matches!(field.ty, TokenType::Identifier | TokenType::Integer) {
                        return Err(ParseError::unexpected(&field, "a field name"));
                    }
                    self.advance();
                    let source_range = Range::between(node.source_range(), field.source_range);
                    node = Node::MemberAccess(MemberAccess {
                        subject: Rc::new(node),
                        field: field.text,
                        source_range,
                    });
                }
                TokenType::OpenParen => {
                    self.advance();
                    let mut args = vec![];
                    if !self.at(TokenType::CloseParen) {
                        loop {
                            args.push(Rc::new(self.parse_expression()?));
                            if self.at(TokenType::Comma) {
                                self.advance();
                            } else {
                                break;
                            }
                        }
                    }
                    let close = self.expect(TokenType::CloseParen, "')' to close the call")?;
                    let source_range = Range::between(node.source_range(), close.source_range);
                    node = Node::Call(Call {
                        callee: Rc::new(node),
                        args,
                        source_range,
                    });
                }
                _ => break,
            }
        }
        Ok(node)
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let token = self.peek().clone();
        match token.ty {
            TokenType::Integer => {
                self.advance();
                let value = token
                    .text
                    .parse::<BigInt>()
                    .map_err(|_| ParseError::new("invalid integer literal", token.position()))?;
                Ok(Node::Integer(Integer {
                    value,
                    source_range: token.source_range,
                }))
            }
            TokenType::String => {
                self.advance();
                Ok(Node::Str(Str {
                    value: token.text,
                    source_range: token.source_range,
                }))
            }
            TokenType::Identifier => {
                self.advance();
                Ok(Node::Ident(Ident {
                    name: token.text,
                    source_range: token.source_range,
                }))
            }
            TokenType::MentionOpen => self.parse_mention(true),
            TokenType::IndirectMentionOpen => self.parse_mention(false),
            TokenType::OpenParen => self.parse_record(),
            TokenType::OpenBrace => self.parse_function(),
            _ => Err(ParseError::unexpected(&token, "an expression")),
        }
    }

    fn parse_mention(&mut self, direct: bool) -> Result<Node, ParseError> {
        let open = self.advance();
        let name = self.expect(TokenType::Identifier, "a name to mention")?;
        let mut words = vec![];
        while self.at(TokenType::Identifier) {
            words.push(self.advance().text);
        }
        let close = self.expect(TokenType::MentionClose, "']' to close the mention")?;
        Ok(Node::Mention(Mention {
            name: name.text,
            words,
            direct,
            source_range: Range::between(open.source_range, close.source_range),
        }))
    }

    fn parse_record(&mut self) -> Result<Node, ParseError> {
        let open = self.advance();
        let mut fields = vec![];
        if !self.at(TokenType::CloseParen) {
            loop {
                let name = if self.at(TokenType::Identifier)
                    && self.peek_second().ty == TokenType::Colon
                {
                    let name = self.advance().text;
                    self.advance();
                    Some(name)
                } else {
                    None
                };
                let value = self.parse_expression()?;
                fields.push(RecordField {
                    name,
                    value: Rc::new(value),
                });
                if self.at(TokenType::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        let close = self.expect(TokenType::CloseParen, "')' to close the record")?;
        Ok(Node::Record(RecordLiteral {
            fields,
            source_range: Range::between(open.source_range, close.source_range),
        }))
    }

    fn parse_function(&mut self) -> Result<Node, ParseError> {
        let open = self.advance();
        let mut params = vec![];
        if self.at(TokenType::Identifier) {
            params.push(self.advance().text);
            while self.at(TokenType::Comma) {
                self.advance();
                params.push(self.expect(TokenType::Identifier, "a parameter name")?.text);
            }
        }
        self.expect(TokenType::Pipe, "'|' after the parameter list")?;

        let mut body = vec![];
        while !self.at(TokenType::CloseBrace) {
            if self.at(TokenType::Eof) {
                return Err(ParseError::new(
                    "hit end of input while parsing function body",
                    self.peek().position(),
                ));
            }
            self.parse_statement_into(&mut body, TokenType::CloseBrace)?;
        }
        let close = self.advance();

        Ok(Node::Function(Rc::new(FunctionNode {
            params,
            body,
            source_range: Range::between(open.source_range, close.source_range),
        })))
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::Lexer;

    use super::*;

    fn parse(source: &str) -> Vec<Statement> {
        let tokens = Lexer::new(source).lex().expect("lexing failed");
        Parser::new(tokens).parse_toplevel().expect("parsing failed")
    }

    fn parse_error(source: &str) -> ParseError {
        let tokens = Lexer::new(source).lex().expect("lexing failed");
        Parser::new(tokens)
            .parse_toplevel()
            .expect_err("parsing should have failed")
    }

    #[test]
    fn test_parse_assignment() {
        let statements = parse("x = 42;");

        assert_eq!(statements.len(), 1);
        let Node::Assignment(assignment) = &*statements[0].node else {
            panic!("expected an assignment");
        };
        assert_eq!(assignment.name, "x");
        assert!(matches!(&*assignment.value, Node::Integer(_)));
    }

    #[test]
    fn test_parse_call_with_args() {
        let statements = parse("add(1, x)");

        let Node::Call(call) = &*statements[0].node else {
            panic!("expected a call");
        };
        assert!(matches!(&*call.callee, Node::Ident(ident) if ident.name == "add"));
        assert_eq!(call.args.len(), 2);
    }

    #[test]
    fn test_parse_mention_with_words() {
        let statements = parse("[x loudly fast]");

        let Node::Mention(mention) = &*statements[0].node else {
            panic!("expected a mention");
        };
        assert_eq!(mention.name, "x");
        assert_eq!(mention.words, vec!["loudly".to_owned(), "fast".to_owned()]);
        assert!(mention.direct);
    }

    #[test]
    fn test_parse_indirect_mention() {
        let statements = parse("#[x]");

        let Node::Mention(mention) = &*statements[0].node else {
            panic!("expected a mention");
        };
        assert!(!mention.direct);
    }

    #[test]
    fn test_parse_function_literal() {
        let statements = parse("{a, b | add(a, b)}");

        let Node::Function(function) = &*statements[0].node else {
            panic!("expected a function");
        };
        assert_eq!(function.params, vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(function.body.len(), 1);
    }

    #[test]
    fn test_parse_function_without_params() {
        let statements = parse("{ | 42 }");

        let Node::Function(function) = &*statements[0].node else {
            panic!("expected a function");
        };
        assert!(function.params.is_empty());
    }

    #[test]
    fn test_parse_record_literals() {
        let statements = parse("(length: 0, x, y: 2)");

        let Node::Record(record) = &*statements[0].node else {
            panic!("expected a record");
        };
        assert_eq!(record.fields.len(), 3);
        assert_eq!(record.fields[0].name.as_deref(), Some("length"));
        assert_eq!(record.fields[1].name, None);
    }

    #[test]
    fn test_parse_empty_record() {
        let statements = parse("()");

        let Node::Record(record) = &*statements[0].node else {
            panic!("expected a record");
        };
        assert!(record.fields.is_empty());
    }

    #[test]
    fn test_parse_member_access_chain() {
        let statements = parse("r.x.1");

        let Node::MemberAccess(outer) = &*statements[0].node else {
            panic!("expected a member access");
        };
        assert_eq!(outer.field, "1");
        let Node::MemberAccess(inner) = &*outer.subject else {
            panic!("expected a nested member access");
        };
        assert_eq!(inner.field, "x");
    }

    #[test]
    fn test_leading_comment_is_hosted_and_retained() {
        let statements = parse("# greets\nx = 1;");

        assert_eq!(statements.len(), 2);
        let Node::Comment(comment) = &*statements[0].node else {
            panic!("expected a comment node");
        };
        assert_eq!(comment.text, "greets");
        assert!(comment.hosted.get());
        assert_eq!(statements[1].comments.len(), 1);
        assert_eq!(statements[1].comments[0].id, comment.id);
    }

    #[test]
    fn test_trailing_comment_attaches_to_previous_statement() {
        let statements = parse("x = 1; # one\ny = 2;");

        // host, its trailing comment node, then the second assignment
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].comments.len(), 1);
        assert_eq!(statements[0].comments[0].text, "one");
        assert!(matches!(&*statements[1].node, Node::Comment(_)));
        assert!(statements[2].comments.is_empty());
    }

    #[test]
    fn test_lone_comment_stays_unhosted() {
        let statements = parse("# drifting\n");

        assert_eq!(statements.len(), 1);
        let Node::Comment(comment) = &*statements[0].node else {
            panic!("expected a comment node");
        };
        assert!(!comment.hosted.get());
    }

    #[test]
    fn test_missing_mention_close_is_an_error() {
        let error = parse_error("[x");

        assert!(error.message.contains("']'"));
    }

    #[test]
    fn test_missing_semicolon_is_an_error() {
        let error = parse_error("x = 1\ny = 2");

        assert!(error.message.contains("';'"));
    }

    #[test]
    fn test_unterminated_function_body() {
        let error = parse_error("{a | add(a, 1)");

        assert!(error.message.contains("function body"));
    }

    #[test]
    fn test_comments_inside_function_bodies_are_kept() {
        let statements = parse("{x | # doubles\nmul(x, 2)}");

        let Node::Function(function) = &*statements[0].node else {
            panic!("expected a function");
        };
        assert_eq!(function.body_comments().count(), 1);
    }
}
