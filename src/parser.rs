use log::debug;

use crate::{
    ast::{Expr, Fragment, Script, Selector},
    error::ParseError,
    lexer::{Lexer, is_token_char},
};

mod script;

/// Recursive descent parser for path expressions. Filter scripts are read
/// by the same parser (see `parser/script.rs`) so a script can contain
/// nested paths and a path can contain scripts.
pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Parser { lexer }
    }

    /// Parse a complete path. Trailing input is an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.read_expr()?;
        if let Some(c) = self.lexer.current_char() {
            if expr.is_empty() {
                return Err(self
                    .lexer
                    .error(format!("an expression fragment can not start with a '{c}'")));
            }
            return Err(self.lexer.error("parse error"));
        }
        Ok(expr)
    }

    /// Parse a complete filter script. Trailing input is an error.
    pub fn parse_script(&mut self) -> Result<Script, ParseError> {
        let script = self.read_script()?;
        self.lexer.skip_whitespace();
        if !self.lexer.at_end() {
            return Err(self.lexer.error("parse error"));
        }
        Ok(script)
    }

    /// Read fragments until a character that can not continue a path.
    /// Inside a script that is where the path operand ends.
    fn read_expr(&mut self) -> Result<Expr, ParseError> {
        let mut fragments = Vec::new();

        match self.lexer.current_char() {
            Some('$') => {
                self.lexer.advance();
                fragments.push(Fragment::Root);
            }
            Some('@') => {
                self.lexer.advance();
                fragments.push(Fragment::Current);
            }
            Some('*') => {
                self.lexer.advance();
                fragments.push(Fragment::Wildcard);
            }
            Some(c) if is_token_char(c) => {
                fragments.push(Fragment::Child(self.lexer.read_name()));
            }
            _ => {}
        }

        while self.next_fragment(&mut fragments)? {}

        Ok(Expr::new(fragments))
    }

    /// Read the next fragment into `fragments`. Returns false when the
    /// current character does not start a fragment.
    fn next_fragment(&mut self, fragments: &mut Vec<Fragment>) -> Result<bool, ParseError> {
        match self.lexer.current_char() {
            Some('.') if self.lexer.peek_char(1) == Some('.') => {
                self.lexer.advance();
                self.lexer.advance();
                fragments.push(Fragment::Descent);
                self.after_descent(fragments)?;
                Ok(true)
            }
            Some('.') => {
                self.lexer.advance();
                fragments.push(self.after_dot()?);
                Ok(true)
            }
            Some('[') => {
                let start = self.lexer.position();
                self.lexer.advance();
                fragments.push(self.after_bracket(start)?);
                Ok(true)
            }
            Some('*') => {
                self.lexer.advance();
                fragments.push(Fragment::Wildcard);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// A descent may be followed directly by a name or a wildcard, which
    /// would otherwise need a leading dot.
    fn after_descent(&mut self, fragments: &mut Vec<Fragment>) -> Result<(), ParseError> {
        match self.lexer.current_char() {
            Some('*') => {
                self.lexer.advance();
                fragments.push(Fragment::Wildcard);
            }
            Some(c) if is_token_char(c) => {
                fragments.push(Fragment::Child(self.lexer.read_name()));
            }
            _ => {}
        }
        Ok(())
    }

    fn after_dot(&mut self) -> Result<Fragment, ParseError> {
        match self.lexer.current_char() {
            Some('*') => {
                self.lexer.advance();
                Ok(Fragment::Wildcard)
            }
            Some(c) if is_token_char(c) => Ok(Fragment::Child(self.lexer.read_name())),
            Some(c) => Err(self
                .lexer
                .error(format!("an expression fragment can not start with a '{c}'"))),
            None => Err(self.lexer.error("empty expression fragment")),
        }
    }

    /// Parse the contents of a bracket. `start` is the position of `[`.
    fn after_bracket(&mut self, start: usize) -> Result<Fragment, ParseError> {
        self.lexer.skip_whitespace();
        let fragment = match self.lexer.current_char() {
            None => return Err(self.lexer.error_at(start, "not terminated")),
            Some(']') => return Err(self.lexer.error_at(start, "empty expression fragment")),
            Some(quote @ ('\'' | '"')) => {
                let key = self.lexer.read_string(quote)?;
                self.lexer.skip_whitespace();
                if self.lexer.current_char() == Some(',') {
                    self.read_union(Selector::Key(key))?
                } else {
                    Fragment::Child(key)
                }
            }
            Some('*') => {
                self.lexer.advance();
                Fragment::Wildcard
            }
            Some('?') => {
                self.lexer.advance();
                let script = self.read_script()?;
                Fragment::Filter(script)
            }
            Some(':') => self.read_slice(None)?,
            Some(c) if c == '-' || c.is_ascii_digit() => {
                let n = self.lexer.read_integer()?;
                self.lexer.skip_whitespace();
                match self.lexer.current_char() {
                    Some(':') => self.read_slice(Some(n))?,
                    Some(',') => self.read_union(Selector::Index(n))?,
                    _ => Fragment::Nth(n),
                }
            }
            Some(c) => {
                return Err(self
                    .lexer
                    .error(format!("an expression fragment can not start with a '{c}'")));
            }
        };
        self.close_bracket(start)?;
        Ok(fragment)
    }

    fn close_bracket(&mut self, start: usize) -> Result<(), ParseError> {
        self.lexer.skip_whitespace();
        match self.lexer.current_char() {
            Some(']') => {
                self.lexer.advance();
                Ok(())
            }
            None => Err(self.lexer.error_at(start, "not terminated")),
            Some(_) => Err(self.lexer.error("expected ']'")),
        }
    }

    /// Read the rest of a slice. The current character is the first `:`.
    fn read_slice(&mut self, start: Option<i64>) -> Result<Fragment, ParseError> {
        self.lexer.advance();
        let end = self.read_slice_part()?;
        let mut step = None;
        if self.lexer.current_char() == Some(':') {
            self.lexer.advance();
            step = self.read_slice_part()?;
        }
        match self.lexer.current_char() {
            Some(']') | None => Ok(Fragment::Slice { start, end, step }),
            Some(_) => Err(self.lexer.error("invalid slice")),
        }
    }

    fn read_slice_part(&mut self) -> Result<Option<i64>, ParseError> {
        self.lexer.skip_whitespace();
        let part = match self.lexer.current_char() {
            Some(c) if c == '-' || c.is_ascii_digit() => Some(self.lexer.read_integer()?),
            _ => None,
        };
        self.lexer.skip_whitespace();
        Ok(part)
    }

    /// Read the rest of a union. The current character is the first `,`.
    fn read_union(&mut self, first: Selector) -> Result<Fragment, ParseError> {
        let mut selectors = vec![first];
        while self.lexer.current_char() == Some(',') {
            self.lexer.advance();
            self.lexer.skip_whitespace();
            let selector = match self.lexer.current_char() {
                Some(quote @ ('\'' | '"')) => Selector::Key(self.lexer.read_string(quote)?),
                Some(c) if c == '-' || c.is_ascii_digit() => {
                    Selector::Index(self.lexer.read_integer()?)
                }
                _ => return Err(self.lexer.error("invalid union entry")),
            };
            selectors.push(selector);
            self.lexer.skip_whitespace();
        }
        Ok(Fragment::Union(selectors))
    }
}

/// Compile path text into an [`Expr`].
///
/// An empty string yields an empty expression, which matches nothing.
///
/// # Examples
///
/// ```
/// use jpath::{parse, ast::Fragment};
///
/// let expr = parse("$..price").unwrap();
/// assert_eq!(
///     expr.fragments(),
///     &[Fragment::Root, Fragment::Descent, Fragment::Child("price".into())]
/// );
/// assert!(parse("$.a[").is_err());
/// ```
pub fn parse(text: &str) -> Result<Expr, ParseError> {
    let expr = Parser::new(Lexer::new(text)).parse()?;
    debug!("compiled path '{text}' into {} fragments", expr.len());
    Ok(expr)
}

/// Like [`parse`], but panics on malformed input. Meant for paths that are
/// fixed in the source code.
pub fn must_parse(text: &str) -> Expr {
    match parse(text) {
        Ok(expr) => expr,
        Err(err) => panic!("invalid path '{text}': {err}"),
    }
}

/// Compile filter script text, with or without surrounding parentheses.
pub fn parse_script(text: &str) -> Result<Script, ParseError> {
    let script = Parser::new(Lexer::new(text)).parse_script()?;
    debug!("compiled script '{text}' into {} entries", script.template().len());
    Ok(script)
}

/// Like [`parse_script`], but panics on malformed input.
pub fn must_parse_script(text: &str) -> Script {
    match parse_script(text) {
        Ok(script) => script,
        Err(err) => panic!("invalid script '{text}': {err}"),
    }
}
