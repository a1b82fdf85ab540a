use crate::{ast::Token, error::ParseError};

/// Characters allowed in an unquoted child name. Anything non-ASCII is
/// allowed.
pub fn is_token_char(c: char) -> bool {
    if !c.is_ascii() {
        return true;
    }
    c.is_ascii_alphanumeric() || matches!(c, '_' | '#' | '%' | '?' | '^' | ':' | ';' | '{' | '}')
}

/// Character scanner shared by the path and script parsers.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Rewind to a position previously returned by [`Lexer::position`].
    pub fn reset(&mut self, position: usize) {
        self.position = position.min(self.input.len());
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    pub fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    pub fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    pub fn advance(&mut self) {
        self.position += 1;
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Build an error at the current position.
    pub fn error(&self, message: impl Into<String>) -> ParseError {
        self.error_at(self.position, message)
    }

    pub fn error_at(&self, position: usize, message: impl Into<String>) -> ParseError {
        let start = position.min(self.input.len());
        let end = (start + 12).min(self.input.len());
        ParseError {
            message: message.into(),
            position,
            near: self.input[start..end].iter().collect(),
        }
    }

    /// Read an unquoted child name.
    pub fn read_name(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if is_token_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Read a script word: letters, digits, and underscores.
    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Read a quoted string. The current character must be the opening quote.
    pub fn read_string(&mut self, quote: char) -> Result<String, ParseError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\'') => result.push('\''),
                        Some('\\') => result.push('\\'),
                        Some('/') => result.push('/'),
                        Some('u') => {
                            result.push(self.read_unicode_escape()?);
                            continue;
                        }
                        Some(ch) => {
                            return Err(self.error(format!("invalid escape sequence '\\{ch}'")));
                        }
                        None => return Err(self.error_at(start, "string not terminated")),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(self.error_at(start, "string not terminated"))
    }

    /// Read the four hex digits of a `\u` escape. The current character is
    /// the `u`.
    fn read_unicode_escape(&mut self) -> Result<char, ParseError> {
        let start = self.position;
        self.advance();
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .current_char()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error_at(start, "invalid unicode escape"))?;
            code = code * 16 + digit;
            self.advance();
        }
        char::from_u32(code).ok_or_else(|| self.error_at(start, "invalid unicode escape"))
    }

    /// Read an integer with an optional leading `-`. Leading zeros are
    /// accepted.
    pub fn read_integer(&mut self) -> Result<i64, ParseError> {
        let start = self.position;
        let mut number = String::new();
        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        let trailing = self
            .current_char()
            .is_some_and(|c| c == '.' || c.is_alphanumeric() || c == '_');
        if trailing {
            return Err(self.error_at(start, "invalid number"));
        }
        number
            .parse::<i64>()
            .map_err(|_| self.error_at(start, "invalid number"))
    }

    /// Read an integer or float literal, with an optional leading `-`.
    pub fn read_number(&mut self) -> Result<Token, ParseError> {
        let start = self.position;
        let mut number = String::new();
        let mut is_float = false;

        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.' && !is_float && self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                number.push(ch);
                self.advance();
            } else if (ch == 'e' || ch == 'E') && !number.contains(['e', 'E']) {
                is_float = true;
                number.push(ch);
                self.advance();
                if let Some(sign @ ('+' | '-')) = self.current_char() {
                    number.push(sign);
                    self.advance();
                }
            } else {
                break;
            }
        }

        if is_float {
            match number.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Token::Float(n)),
                _ => Err(self.error_at(start, "invalid number")),
            }
        } else {
            number
                .parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| self.error_at(start, "invalid number"))
        }
    }

    /// Read a `/.../` regular expression literal. `\/` stands for a slash;
    /// every other escape is kept for the regex engine.
    pub fn read_pattern(&mut self) -> Result<String, ParseError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // Consume opening slash

        while let Some(ch) = self.current_char() {
            match ch {
                '/' => {
                    self.advance();
                    return Ok(result);
                }
                '\\' if self.peek_char(1) == Some('/') => {
                    result.push('/');
                    self.advance();
                    self.advance();
                }
                '\\' => {
                    result.push('\\');
                    self.advance();
                    if let Some(next) = self.current_char() {
                        result.push(next);
                        self.advance();
                    }
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(self.error_at(start, "regular expression not terminated"))
    }

    /// Next script token. Operands that are paths, strings, or patterns are
    /// read by the parser before this is called.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();

        let token = match self.current_char() {
            None => return Ok(Token::Eof),
            Some(ch) if ch.is_ascii_digit() => return self.read_number(),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                return Ok(Token::Word(self.read_identifier()));
            }
            Some('+') => Token::Plus,
            Some('-') => Token::Minus,
            Some('*') => Token::Star,
            Some('/') => Token::Slash,
            Some('=') => match self.peek_char(1) {
                Some('=') => {
                    self.advance();
                    Token::EqEq
                }
                Some('~') => {
                    self.advance();
                    Token::Tilde
                }
                _ => {
                    return Err(self.error("unexpected '=' (did you mean '==' or '=~'?)"));
                }
            },
            Some('~') if self.peek_char(1) == Some('=') => {
                self.advance();
                Token::Tilde
            }
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    Token::NotEq
                } else {
                    Token::Bang
                }
            }
            Some('<') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    Token::LtEq
                } else {
                    Token::Lt
                }
            }
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    Token::GtEq
                } else {
                    Token::Gt
                }
            }
            Some('&') if self.peek_char(1) == Some('&') => {
                self.advance();
                Token::AndAnd
            }
            Some('|') if self.peek_char(1) == Some('|') => {
                self.advance();
                Token::OrOr
            }
            Some(ch) => return Err(self.error(format!("unexpected character '{ch}'"))),
        };
        self.advance();
        Ok(token)
    }
}

#[test]
fn test_operators() {
    let mut lexer = Lexer::new("== != <= >= < > && || =~ ~= !");
    assert_eq!(lexer.next_token().unwrap(), Token::EqEq);
    assert_eq!(lexer.next_token().unwrap(), Token::NotEq);
    assert_eq!(lexer.next_token().unwrap(), Token::LtEq);
    assert_eq!(lexer.next_token().unwrap(), Token::GtEq);
    assert_eq!(lexer.next_token().unwrap(), Token::Lt);
    assert_eq!(lexer.next_token().unwrap(), Token::Gt);
    assert_eq!(lexer.next_token().unwrap(), Token::AndAnd);
    assert_eq!(lexer.next_token().unwrap(), Token::OrOr);
    assert_eq!(lexer.next_token().unwrap(), Token::Tilde);
    assert_eq!(lexer.next_token().unwrap(), Token::Tilde);
    assert_eq!(lexer.next_token().unwrap(), Token::Bang);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_words_and_numbers() {
    let mut lexer = Lexer::new("in has 42 2.5 1e3 Nothing");
    assert_eq!(lexer.next_token().unwrap(), Token::Word("in".into()));
    assert_eq!(lexer.next_token().unwrap(), Token::Word("has".into()));
    assert_eq!(lexer.next_token().unwrap(), Token::Integer(42));
    assert_eq!(lexer.next_token().unwrap(), Token::Float(2.5));
    assert_eq!(lexer.next_token().unwrap(), Token::Float(1000.0));
    assert_eq!(lexer.next_token().unwrap(), Token::Word("Nothing".into()));
}

#[test]
fn test_integer_leading_zeros_and_sign() {
    let mut lexer = Lexer::new("-007]");
    assert_eq!(lexer.read_integer().unwrap(), -7);
    assert_eq!(lexer.current_char(), Some(']'));
}

#[test]
fn test_invalid_integer() {
    let mut lexer = Lexer::new("1.5]");
    let err = lexer.read_integer().unwrap_err();
    assert_eq!(err.message, "invalid number");
    assert_eq!(err.position, 0);
}

#[test]
fn test_out_of_range_float() {
    let mut lexer = Lexer::new("1e999");
    let err = lexer.read_number().unwrap_err();
    assert_eq!(err.message, "invalid number");
    assert_eq!(err.position, 0);
}

#[test]
fn test_string_escapes() {
    let mut lexer = Lexer::new(r"'a\'bA'");
    assert_eq!(lexer.read_string('\'').unwrap(), "a'bA");
    assert!(lexer.at_end());
}

#[test]
fn test_unterminated_string() {
    let mut lexer = Lexer::new("'abc");
    assert_eq!(lexer.read_string('\'').unwrap_err().message, "string not terminated");
}

#[test]
fn test_pattern_literal() {
    let mut lexer = Lexer::new(r"/a\/b\d+/");
    assert_eq!(lexer.read_pattern().unwrap(), r"a/b\d+");
}

#[test]
fn test_token_chars() {
    assert!(is_token_char('a'));
    assert!(is_token_char('_'));
    assert!(is_token_char('9'));
    assert!(is_token_char('é'));
    assert!(!is_token_char('-'));
    assert!(!is_token_char('.'));
    assert!(!is_token_char('['));
    assert!(!is_token_char(' '));
    assert!(!is_token_char('|'));
    assert!(!is_token_char('$'));
}
