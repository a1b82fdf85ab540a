use std::fmt;

/// Script operators and functions.
///
/// Lower precedence numbers bind tighter. Binary operators of equal
/// precedence associate to the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    // Comparison
    /// Equal (`==`)
    Eq,
    /// Not equal (`!=`)
    Neq,
    /// Less than (`<`)
    Lt,
    /// Greater than (`>`)
    Gt,
    /// Less than or equal (`<=`)
    Lte,
    /// Greater than or equal (`>=`)
    Gte,
    /// Membership (`in`)
    In,
    /// Emptiness test (`empty`), compared against a boolean
    Empty,
    /// Existence test (`has`), compared against a boolean
    Has,
    /// Existence test (`exists`), same as `has`
    Exists,
    /// Regular expression search (`=~`)
    Regex,

    // Arithmetic
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mult,
    /// Division (`/`)
    Divide,

    // Logical
    /// Logical AND (`&&`)
    And,
    /// Logical OR (`||`)
    Or,
    /// Logical NOT (`!`)
    Not,

    // Functions
    /// All matches of a path as a list (`get(...)`)
    Get,
    /// Size of a string, array, or object (`length(...)`)
    Length,
    /// Number of matches of a path (`count(...)`)
    Count,
    /// Whole-string regular expression match (`match(s, re)`)
    Match,
    /// Regular expression search anywhere in a string (`search(s, re)`)
    Search,
}

impl Op {
    /// Loosest precedence of any operator.
    pub const LOOSEST: u8 = 5;

    pub fn name(self) -> &'static str {
        match self {
            Op::Eq => "==",
            Op::Neq => "!=",
            Op::Lt => "<",
            Op::Gt => ">",
            Op::Lte => "<=",
            Op::Gte => ">=",
            Op::In => "in",
            Op::Empty => "empty",
            Op::Has => "has",
            Op::Exists => "exists",
            Op::Regex => "=~",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mult => "*",
            Op::Divide => "/",
            Op::And => "&&",
            Op::Or => "||",
            Op::Not => "!",
            Op::Get => "get",
            Op::Length => "length",
            Op::Count => "count",
            Op::Match => "match",
            Op::Search => "search",
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            Op::Not | Op::Get | Op::Length | Op::Count | Op::Match | Op::Search => 0,
            Op::Mult | Op::Divide => 1,
            Op::Add | Op::Sub => 2,
            Op::Eq
            | Op::Neq
            | Op::Lt
            | Op::Gt
            | Op::Lte
            | Op::Gte
            | Op::In
            | Op::Empty
            | Op::Has
            | Op::Exists
            | Op::Regex => 3,
            Op::And => 4,
            Op::Or => 5,
        }
    }

    /// Number of operands consumed.
    pub fn arity(self) -> usize {
        match self {
            Op::Not | Op::Get | Op::Length | Op::Count => 1,
            _ => 2,
        }
    }

    /// Functions are written `name(args)` rather than infix.
    pub fn is_function(self) -> bool {
        matches!(
            self,
            Op::Get | Op::Length | Op::Count | Op::Match | Op::Search
        )
    }

    /// Functions whose path operand is resolved to every match rather than
    /// the first one.
    pub fn gathers(self) -> bool {
        matches!(self, Op::Get | Op::Count)
    }

    /// Look up a function by name.
    pub fn function(name: &str) -> Option<Op> {
        match name {
            "get" => Some(Op::Get),
            "length" => Some(Op::Length),
            "count" => Some(Op::Count),
            "match" => Some(Op::Match),
            "search" => Some(Op::Search),
            _ => None,
        }
    }

    /// Look up a word operator used infix.
    pub fn word(name: &str) -> Option<Op> {
        match name {
            "in" => Some(Op::In),
            "empty" => Some(Op::Empty),
            "has" => Some(Op::Has),
            "exists" => Some(Op::Exists),
            _ => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
