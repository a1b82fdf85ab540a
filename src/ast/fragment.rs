use std::fmt::{self, Write};

use crate::{ast::Script, lexer::is_token_char};

/// One step of a path expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Document root (`$`), valid only as the first fragment
    Root,

    /// Current node (`@`), valid only as the first fragment
    Current,

    /// Object member by key
    ///
    /// # Examples
    /// ```text
    /// .name
    /// ['first name']
    /// ```
    Child(String),

    /// Array element by index, negative counts from the end
    ///
    /// # Examples
    /// ```text
    /// [0]
    /// [-1]
    /// ```
    Nth(i64),

    /// Every member of an object or element of an array (`*`)
    Wildcard,

    /// The current node and every descendant (`..`)
    Descent,

    /// Range of array elements
    ///
    /// # Examples
    /// ```text
    /// [1:3]
    /// [::-1]
    /// [-2:]
    /// ```
    Slice {
        start: Option<i64>,
        end: Option<i64>,
        step: Option<i64>,
    },

    /// Ordered list of keys and indexes (`[0,'a',-1]`)
    Union(Vec<Selector>),

    /// Children for which a script evaluates true (`[?(@.x > 1)]`)
    Filter(Script),
}

/// One entry of a union fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Applies to objects only
    Key(String),
    /// Applies to arrays only
    Index(i64),
}

impl Fragment {
    /// Variant name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Fragment::Root => "Root",
            Fragment::Current => "Current",
            Fragment::Child(_) => "Child",
            Fragment::Nth(_) => "Nth",
            Fragment::Wildcard => "Wildcard",
            Fragment::Descent => "Descent",
            Fragment::Slice { .. } => "Slice",
            Fragment::Union(_) => "Union",
            Fragment::Filter(_) => "Filter",
        }
    }

    /// Fragments that name a location a value can be written to.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self,
            Fragment::Child(_) | Fragment::Nth(_) | Fragment::Wildcard | Fragment::Union(_)
        )
    }

    /// Render this fragment. `leading` is true for the first fragment and
    /// for the fragment right after a descent, where no dot is written.
    pub(crate) fn render(&self, f: &mut fmt::Formatter<'_>, leading: bool) -> fmt::Result {
        match self {
            Fragment::Root => f.write_char('$'),
            Fragment::Current => f.write_char('@'),
            Fragment::Child(name) if is_bare_name(name) => {
                if !leading {
                    f.write_char('.')?;
                }
                f.write_str(name)
            }
            Fragment::Child(name) => {
                f.write_char('[')?;
                write_quoted(f, name)?;
                f.write_char(']')
            }
            Fragment::Nth(i) => write!(f, "[{i}]"),
            Fragment::Wildcard if leading => f.write_char('*'),
            Fragment::Wildcard => f.write_str(".*"),
            Fragment::Descent => f.write_str(".."),
            Fragment::Slice { start, end, step } => {
                f.write_char('[')?;
                if let Some(start) = start {
                    write!(f, "{start}")?;
                }
                f.write_char(':')?;
                if let Some(end) = end {
                    write!(f, "{end}")?;
                }
                if let Some(step) = step {
                    write!(f, ":{step}")?;
                }
                f.write_char(']')
            }
            Fragment::Union(selectors) => {
                f.write_char('[')?;
                for (i, selector) in selectors.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    match selector {
                        Selector::Key(key) => write_quoted(f, key)?,
                        Selector::Index(n) => write!(f, "{n}")?,
                    }
                }
                f.write_char(']')
            }
            Fragment::Filter(script) => write!(f, "[?({script})]"),
        }
    }
}

/// A name can be written without brackets when every character is in the
/// token class.
pub(crate) fn is_bare_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_token_char)
}

/// Write a single-quoted string, escaping quotes and backslashes.
pub(crate) fn write_quoted(f: &mut impl Write, s: &str) -> fmt::Result {
    f.write_char('\'')?;
    for c in s.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('\'')
}
