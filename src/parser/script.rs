//! Precedence climbing over script tokens.
//!
//! Operand positions are read character by character because an operand
//! may be a nested path, a quoted string, or a `/.../` pattern. Operator
//! positions go through [`Lexer::next_token`](crate::lexer::Lexer::next_token).

use super::Parser;
use crate::{
    ast::{
        Op, Operand, Pattern, Script, Token,
        script::Equation,
    },
    error::ParseError,
    value::Value,
};

impl Parser {
    pub(super) fn read_script(&mut self) -> Result<Script, ParseError> {
        let equation = self.read_equation(Op::LOOSEST)?;
        Ok(Script::from_equation(equation))
    }

    /// Read an operand followed by any binary operators that bind no looser
    /// than `max`.
    fn read_equation(&mut self, max: u8) -> Result<Equation, ParseError> {
        let mut left = self.read_operand()?;

        loop {
            let start = self.lexer.position();
            let Some(op) = self.read_binary_op()? else {
                self.lexer.reset(start);
                break;
            };
            if op.precedence() > max {
                self.lexer.reset(start);
                break;
            }
            let right = self.read_equation(op.precedence() - 1)?;
            let right = if op == Op::Regex {
                self.literal_pattern(right, false, start)?
            } else {
                right
            };
            left = Equation::Binary(op, Box::new(left), Box::new(right));
        }

        Ok(left)
    }

    /// Next infix operator, or None when the script (or the current group)
    /// ends here.
    fn read_binary_op(&mut self) -> Result<Option<Op>, ParseError> {
        self.lexer.skip_whitespace();
        let starts_op = self
            .lexer
            .current_char()
            .is_some_and(|c| "=!~<>&|+-*/".contains(c) || c.is_alphabetic());
        if !starts_op {
            return Ok(None);
        }

        let op = match self.lexer.next_token()? {
            Token::EqEq => Op::Eq,
            Token::NotEq => Op::Neq,
            Token::Lt => Op::Lt,
            Token::Gt => Op::Gt,
            Token::LtEq => Op::Lte,
            Token::GtEq => Op::Gte,
            Token::Tilde => Op::Regex,
            Token::AndAnd => Op::And,
            Token::OrOr => Op::Or,
            Token::Plus => Op::Add,
            Token::Minus => Op::Sub,
            Token::Star => Op::Mult,
            Token::Slash => Op::Divide,
            Token::Word(word) => match Op::word(&word) {
                Some(op) => op,
                None => return Ok(None),
            },
            _ => return Ok(None),
        };
        Ok(Some(op))
    }

    fn read_operand(&mut self) -> Result<Equation, ParseError> {
        self.lexer.skip_whitespace();
        let start = self.lexer.position();

        let operand = match self.lexer.current_char() {
            None => return Err(self.lexer.error("missing operand")),
            Some('@' | '$') => Operand::Path(self.read_expr()?),
            Some(quote @ ('\'' | '"')) => {
                Operand::Literal(Value::String(self.lexer.read_string(quote)?))
            }
            Some('/') => {
                let source = self.lexer.read_pattern()?;
                let pattern = Pattern::new(&source, false, true)
                    .map_err(|_| self.lexer.error_at(start, "invalid regular expression"))?;
                Operand::Pattern(pattern)
            }
            Some('(') => {
                self.lexer.advance();
                let group = self.read_equation(Op::LOOSEST)?;
                self.expect_char(')')?;
                return Ok(group);
            }
            Some('!') if self.lexer.peek_char(1) != Some('=') => {
                self.lexer.advance();
                let arg = self.read_operand()?;
                return Ok(Equation::Unary(Op::Not, Box::new(arg)));
            }
            Some(c)
                if c.is_ascii_digit()
                    || (c == '-' && self.lexer.peek_char(1).is_some_and(|n| n.is_ascii_digit())) =>
            {
                match self.lexer.read_number()? {
                    Token::Integer(n) => Operand::Literal(Value::Integer(n)),
                    Token::Float(n) => Operand::Literal(Value::Float(n)),
                    _ => return Err(self.lexer.error_at(start, "invalid number")),
                }
            }
            Some(c) if c.is_alphabetic() => {
                let Token::Word(word) = self.lexer.next_token()? else {
                    return Err(self.lexer.error_at(start, "unknown identifier"));
                };
                match word.as_str() {
                    "true" => Operand::Literal(Value::Boolean(true)),
                    "false" => Operand::Literal(Value::Boolean(false)),
                    "null" => Operand::Literal(Value::Null),
                    "Nothing" => Operand::Nothing,
                    name => match Op::function(name) {
                        Some(op) => return self.read_call(op, start),
                        None => return Err(self.lexer.error_at(start, "unknown identifier")),
                    },
                }
            }
            Some(c) => return Err(self.lexer.error(format!("unexpected character '{c}'"))),
        };

        Ok(Equation::Operand(operand))
    }

    /// Read the argument list of a function. The name has been consumed.
    fn read_call(&mut self, op: Op, start: usize) -> Result<Equation, ParseError> {
        self.expect_char('(')?;
        let first = self.read_equation(Op::LOOSEST)?;
        if op.arity() == 1 {
            self.expect_char(')')?;
            return Ok(Equation::Unary(op, Box::new(first)));
        }

        self.expect_char(',')?;
        let second = self.read_equation(Op::LOOSEST)?;
        self.expect_char(')')?;
        let second = self.literal_pattern(second, op == Op::Match, start)?;
        Ok(Equation::Binary(op, Box::new(first), Box::new(second)))
    }

    /// Compile a literal regular expression operand ahead of evaluation.
    /// Operands that are paths are compiled per candidate instead.
    fn literal_pattern(
        &self,
        equation: Equation,
        anchored: bool,
        start: usize,
    ) -> Result<Equation, ParseError> {
        let pattern = match equation {
            Equation::Operand(Operand::Pattern(pattern)) => pattern.anchored(anchored),
            Equation::Operand(Operand::Literal(Value::String(source))) => {
                Pattern::new(&source, anchored, false)
            }
            other => return Ok(other),
        };
        pattern
            .map(|p| Equation::Operand(Operand::Pattern(p)))
            .map_err(|_| self.lexer.error_at(start, "invalid regular expression"))
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.lexer.skip_whitespace();
        if self.lexer.current_char() == Some(expected) {
            self.lexer.advance();
            Ok(())
        } else {
            Err(self.lexer.error(format!("expected '{expected}'")))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{Entry, Op, Operand},
        parser::parse_script,
    };

    fn ops(text: &str) -> Vec<Op> {
        parse_script(text)
            .unwrap()
            .template()
            .iter()
            .filter_map(|entry| match entry {
                Entry::Op(op) => Some(*op),
                Entry::Operand(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_precedence_layout() {
        assert_eq!(ops("1 + 2 * 3 == 7"), vec![Op::Eq, Op::Add, Op::Mult]);
        assert_eq!(ops("@.a || @.b && @.c"), vec![Op::Or, Op::And]);
        assert_eq!(ops("(1 + 2) * 3"), vec![Op::Mult, Op::Add]);
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(parse_script("10 - 4 - 3").unwrap().to_string(), "(10 - 4) - 3");
    }

    #[test]
    fn test_match_literal_is_anchored() {
        let script = parse_script("match(@.name, 'a.c')").unwrap();
        let Some(Entry::Operand(Operand::Pattern(pattern))) = script.template().last() else {
            panic!("expected a compiled pattern");
        };
        assert!(pattern.regex().is_match("abc"));
        assert!(!pattern.regex().is_match("xabcx"));
    }
}
