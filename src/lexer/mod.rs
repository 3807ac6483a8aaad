mod token;

pub use token::*;

use once_cell::sync::Lazy;
use std::{collections::HashMap, error::Error, fmt::Display, iter::Peekable, mem, str::Chars};
use unescape::unescape;

static PUNCTUATION: Lazy<HashMap<char, TokenType>> = Lazy::new(|| {
    let mut m = HashMap::new();

    m.insert('{', TokenType::OpenBrace);
    m.insert('}', TokenType::CloseBrace);
    m.insert('(', TokenType::OpenParen);
    m.insert(')', TokenType::CloseParen);
    m.insert('[', TokenType::MentionOpen);
    m.insert(']', TokenType::MentionClose);
    m.insert(',', TokenType::Comma);
    m.insert(':', TokenType::Colon);
    m.insert(';', TokenType::Semicolon);
    m.insert('|', TokenType::Pipe);
    m.insert('=', TokenType::Equals);
    m.insert('.', TokenType::Dot);

    m
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.message, self.position)
    }
}

impl Error for LexError {}

pub type LexResult<T> = Result<T, LexError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Free,
    InIdentifier,
    CouldBeInComment,
    InComment,
    InString,
    InInteger,
    CouldBeInIndirectCommentMention,
}

/// State machine turning a character stream into tokens.
///
/// `#` is the comment sigil; a `#` immediately followed by `[` instead opens
/// an indirect mention, which is what the `CouldBeInComment` /
/// `CouldBeInIndirectCommentMention` states are for.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
    tokens: Vec<Token>,
    state: State,
    buffer: String,
    position: Position,
    start: Position,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.chars().peekable(),
            tokens: vec![],
            state: State::Free,
            buffer: String::new(),
            position: Position::default(),
            start: Position::default(),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let next = self.input.next()?;

        if next == '\n' {
            self.position.line += 1;
            self.position.column = 0;
        } else {
            self.position.column += 1;
        }

        Some(next)
    }

    fn emit(&mut self, ty: TokenType, text: impl Into<String>) {
        let source_range = Range {
            start: self.start,
            end: self.position,
        };
        self.tokens.push(Token::new(ty, text, source_range));
        self.state = State::Free;
    }

    pub fn lex(mut self) -> LexResult<Vec<Token>> {
        loop {
            match self.state {
                State::Free => {
                    let Some(&next) = self.input.peek() else {
                        break;
                    };
                    self.start = self.position;

                    match next {
                        c if c.is_whitespace() => {
                            self.advance();
                        }
                        'a'..='z' | 'A'..='Z' | '_' => {
                            self.buffer.clear();
                            self.state = State::InIdentifier;
                        }
                        '0'..='9' => {
                            self.buffer.clear();
                            self.state = State::InInteger;
                        }
                        '"' => {
                            self.advance();
                            self.buffer.clear();
                            self.state = State::InString;
                        }
                        '#' => {
                            self.advance();
                            self.state = State::CouldBeInComment;
                        }
                        c => {
                            self.advance();
                            match PUNCTUATION.get(&c) {
                                Some(&ty) => self.emit(ty, c),
                                None => self.emit(TokenType::Unknown, c),
                            }
                        }
                    }
                }
                State::InIdentifier => match self.input.peek() {
                    Some(&c) if c.is_alphanumeric() || c == '_' => {
                        self.advance();
                        self.buffer.push(c);
                    }
                    _ => {
                        let text = mem::take(&mut self.buffer);
                        self.emit(TokenType::Identifier, text);
                    }
                },
                State::InInteger => match self.input.peek() {
                    Some(&c) if c.is_ascii_digit() => {
                        self.advance();
                        self.buffer.push(c);
                    }
                    _ => {
                        let text = mem::take(&mut self.buffer);
                        self.emit(TokenType::Integer, text);
                    }
                },
                State::CouldBeInComment => match self.input.peek() {
                    Some('[') => {
                        self.state = State::CouldBeInIndirectCommentMention;
                    }
                    _ => {
                        self.buffer.clear();
                        self.state = State::InComment;
                    }
                },
                State::CouldBeInIndirectCommentMention => {
                    self.advance();
                    self.emit(TokenType::IndirectMentionOpen, "#[");
                }
                State::InComment => match self.input.peek() {
                    Some(&c) if c != '\n' => {
                        self.advance();
                        self.buffer.push(c);
                    }
                    _ => {
                        let text = self.buffer.trim().to_owned();
                        self.emit(TokenType::Comment, text);
                    }
                },
                State::InString => {
                    let Some(next) = self.advance() else {
                        return Err(LexError {
                            message: "unterminated string literal".to_owned(),
                            position: self.start,
                        });
                    };

                    match next {
                        '"' => {
                            let Some(text) = unescape(&self.buffer) else {
                                return Err(LexError {
                                    message: "invalid escape sequence in string literal"
                                        .to_owned(),
                                    position: self.start,
                                });
                            };
                            self.emit(TokenType::String, text);
                        }
                        '\n' => {
                            return Err(LexError {
                                message: "unterminated string literal".to_owned(),
                                position: self.start,
                            });
                        }
                        '\\' => {
                            let Some(escaped) = self.advance() else {
                                return Err(LexError {
                                    message: "unterminated string literal".to_owned(),
                                    position: self.start,
                                });
                            };
                            self.buffer.push('\\');
                            self.buffer.push(escaped);
                        }
                        c => self.buffer.push(c),
                    }
                }
            }
        }

        let end = Range {
            start: self.position,
            end: self.position,
        };
        self.tokens.push(Token::new(TokenType::Eof, "", end));

        Ok(self.tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types_of(input: &str) -> Vec<TokenType> {
        Lexer::new(input)
            .lex()
            .expect("lexing failed")
            .into_iter()
            .map(|token| token.ty)
            .collect()
    }

    #[test]
    fn test_lex_identifier() {
        let tokens = Lexer::new("letter").lex().expect("lexing failed");

        assert_eq!(
            tokens[0],
            Token::new(
                TokenType::Identifier,
                "letter",
                Range {
                    start: Position { line: 0, column: 0 },
                    end: Position { line: 0, column: 6 },
                }
            )
        );
        assert_eq!(tokens[1].ty, TokenType::Eof);
    }

    #[test]
    fn test_lex_integer() {
        let tokens = Lexer::new("1337").lex().expect("lexing failed");

        assert_eq!(tokens[0].ty, TokenType::Integer);
        assert_eq!(tokens[0].text, "1337");
    }

    #[test]
    fn test_lex_punctuation() {
        assert_eq!(
            types_of("{}()|,;:=."),
            vec![
                TokenType::OpenBrace,
                TokenType::CloseBrace,
                TokenType::OpenParen,
                TokenType::CloseParen,
                TokenType::Pipe,
                TokenType::Comma,
                TokenType::Semicolon,
                TokenType::Colon,
                TokenType::Equals,
                TokenType::Dot,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_mention() {
        assert_eq!(
            types_of("[x loudly]"),
            vec![
                TokenType::MentionOpen,
                TokenType::Identifier,
                TokenType::Identifier,
                TokenType::MentionClose,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_indirect_mention_opener() {
        let tokens = Lexer::new("#[x]").lex().expect("lexing failed");

        assert_eq!(tokens[0].ty, TokenType::IndirectMentionOpen);
        assert_eq!(tokens[0].text, "#[");
        assert_eq!(tokens[1].ty, TokenType::Identifier);
        assert_eq!(tokens[2].ty, TokenType::MentionClose);
    }

    #[test]
    fn test_lex_comment_strips_sigil() {
        let tokens = Lexer::new("# greets loudly\nx").lex().expect("lexing failed");

        assert_eq!(tokens[0].ty, TokenType::Comment);
        assert_eq!(tokens[0].text, "greets loudly");
        assert_eq!(tokens[1].ty, TokenType::Identifier);
        assert_eq!(tokens[1].source_range.start, Position { line: 1, column: 0 });
    }

    #[test]
    fn test_lex_string_with_escapes() {
        let tokens = Lexer::new(r#""a\nb\"c""#).lex().expect("lexing failed");

        assert_eq!(tokens[0].ty, TokenType::String);
        assert_eq!(tokens[0].text, "a\nb\"c");
    }

    #[test]
    fn test_lex_unterminated_string() {
        let result = Lexer::new("\"oops").lex();

        assert_eq!(
            result,
            Err(LexError {
                message: "unterminated string literal".to_owned(),
                position: Position { line: 0, column: 0 },
            })
        );
    }

    #[test]
    fn test_lex_eof_only() {
        assert_eq!(types_of("   \n "), vec![TokenType::Eof]);
    }

    #[test]
    fn test_lex_unknown_character() {
        let tokens = Lexer::new("?").lex().expect("lexing failed");

        assert_eq!(tokens[0].ty, TokenType::Unknown);
        assert_eq!(tokens[0].text, "?");
    }
}
