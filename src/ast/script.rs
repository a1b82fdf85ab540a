use std::fmt::{self, Write};

use regex::Regex;

use crate::{
    ast::{Expr, Op, fragment::write_quoted},
    value::Value,
};

/// A compiled filter predicate.
///
/// The expression tree is flattened into a prefix template: each operator
/// entry is followed by the entries of its operands. Evaluation walks the
/// template back to front with a value stack, so the tree is never
/// revisited per candidate.
///
/// # Examples
///
/// ```
/// use jpath::{parse_script, Value};
/// use std::collections::HashMap;
///
/// let script = parse_script("@.price < 10").unwrap();
/// let mut book = HashMap::new();
/// book.insert("price".to_string(), Value::Integer(8));
/// assert!(script.matches(&Value::Object(book)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    template: Vec<Entry>,
}

/// One slot of a script template.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Op(Op),
    Operand(Operand),
}

/// A script operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Literal scalar (`1`, `2.5`, `'text'`, `true`, `null`)
    Literal(Value),

    /// The "no such value" sentinel, distinct from `null`
    Nothing,

    /// Nested path resolved against the candidate (`@`) or the root (`$`)
    Path(Expr),

    /// Regular expression compiled at parse time
    Pattern(Pattern),
}

/// A regular expression operand together with its source text.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
    slashed: bool,
}

impl Pattern {
    /// Compile `source`. Anchored patterns must match the whole string.
    /// `slashed` records whether the pattern was written as `/.../` or as a
    /// quoted string, so it renders back the same way.
    pub fn new(source: &str, anchored: bool, slashed: bool) -> Result<Self, regex::Error> {
        let regex = compile(source, anchored)?;
        Ok(Pattern {
            source: source.to_string(),
            regex,
            slashed,
        })
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Same source compiled with different anchoring.
    pub(crate) fn anchored(&self, anchored: bool) -> Result<Self, regex::Error> {
        Pattern::new(&self.source, anchored, self.slashed)
    }
}

pub(crate) fn compile(source: &str, anchored: bool) -> Result<Regex, regex::Error> {
    if anchored {
        Regex::new(&format!("^(?:{source})$"))
    } else {
        Regex::new(source)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.slashed == other.slashed
            && self.regex.as_str() == other.regex.as_str()
    }
}

/// Expression tree produced by the parser before flattening.
#[derive(Debug, Clone)]
pub(crate) enum Equation {
    Operand(Operand),
    Unary(Op, Box<Equation>),
    Binary(Op, Box<Equation>, Box<Equation>),
}

impl Equation {
    fn flatten_into(self, template: &mut Vec<Entry>) {
        match self {
            Equation::Operand(operand) => template.push(Entry::Operand(operand)),
            Equation::Unary(op, arg) => {
                template.push(Entry::Op(op));
                arg.flatten_into(template);
            }
            Equation::Binary(op, left, right) => {
                template.push(Entry::Op(op));
                left.flatten_into(template);
                right.flatten_into(template);
            }
        }
    }
}

impl Script {
    pub(crate) fn from_equation(equation: Equation) -> Self {
        let mut template = Vec::new();
        equation.flatten_into(&mut template);
        Script { template }
    }

    pub fn template(&self) -> &[Entry] {
        &self.template
    }

    /// Render the entry at `*pos` and every entry belonging to it.
    fn render(&self, f: &mut fmt::Formatter<'_>, pos: &mut usize, nested: bool) -> fmt::Result {
        let Some(entry) = self.template.get(*pos) else {
            return Ok(());
        };
        *pos += 1;
        match entry {
            Entry::Operand(operand) => write!(f, "{operand}"),
            Entry::Op(op) if op.is_function() => {
                write!(f, "{op}(")?;
                self.render(f, pos, false)?;
                if op.arity() == 2 {
                    f.write_str(", ")?;
                    self.render(f, pos, false)?;
                }
                f.write_char(')')
            }
            Entry::Op(Op::Not) => {
                f.write_char('!')?;
                self.render(f, pos, true)
            }
            Entry::Op(op) => {
                if nested {
                    f.write_char('(')?;
                }
                self.render(f, pos, true)?;
                write!(f, " {op} ")?;
                self.render(f, pos, true)?;
                if nested {
                    f.write_char(')')?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pos = 0;
        self.render(f, &mut pos, false)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Nothing => f.write_str("Nothing"),
            Operand::Path(expr) => write!(f, "{expr}"),
            Operand::Pattern(pattern) => write!(f, "{pattern}"),
            Operand::Literal(value) => match value {
                Value::Null => f.write_str("null"),
                Value::Boolean(b) => write!(f, "{b}"),
                Value::Integer(n) => write!(f, "{n}"),
                Value::Float(n) => write!(f, "{n:?}"),
                Value::String(s) => write_quoted(f, s),
                Value::Time(t) => write_quoted(f, &t.to_rfc3339()),
                Value::Array(_) | Value::Object(_) => f.write_str("Nothing"),
            },
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.slashed {
            f.write_char('/')?;
            f.write_str(&self.source.replace('/', "\\/"))?;
            f.write_char('/')
        } else {
            write_quoted(f, &self.source)
        }
    }
}
