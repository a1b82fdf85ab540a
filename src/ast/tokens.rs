/// Lexical tokens of the filter script sub-language.
///
/// Paths, string literals, regular expression literals, parentheses, and
/// commas are read directly from characters by the parser and never appear
/// as tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Integer
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 007
    /// ```
    Integer(i64),

    /// Floating-point number
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// 1e10
    /// ```
    Float(f64),

    /// Bare word: keywords (`true`, `Nothing`), word operators (`in`,
    /// `has`), and function names (`length`, `match`)
    Word(String),

    // Comparison
    /// Equality operator
    EqEq,

    /// Inequality operator
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    /// Regular expression match, written `=~` or `~=`
    Tilde,

    // Logical
    /// Logical AND
    AndAnd,

    /// Logical OR
    OrOr,

    /// Logical NOT
    Bang,

    // Arithmetic
    /// Addition or string concatenation
    Plus,

    /// Subtraction
    Minus,

    /// Multiplication
    Star,

    /// Division
    Slash,

    /// End of input
    Eof,
}
