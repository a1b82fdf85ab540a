use std::{fmt, str::FromStr};

use crate::{
    ast::{Fragment, Script, Selector},
    error::ParseError,
};

/// A compiled path expression: an ordered, immutable list of fragments.
///
/// An `Expr` is built once, either by parsing text or with the builder
/// methods, and can then be evaluated against any number of trees. It is
/// `Send + Sync` and safe to share between threads.
///
/// # Examples
///
/// ```
/// use jpath::{parse, Expr};
///
/// let parsed = parse("$.store.book[0]").unwrap();
/// let built = Expr::root().child("store").child("book").nth(0);
/// assert_eq!(parsed, built);
/// assert_eq!(built.to_string(), "$.store.book[0]");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expr(Vec<Fragment>);

impl Expr {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Expr(fragments)
    }

    /// An expression starting at the document root (`$`).
    pub fn root() -> Self {
        Expr(vec![Fragment::Root])
    }

    /// An expression starting at the current node (`@`).
    pub fn current() -> Self {
        Expr(vec![Fragment::Current])
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn child(mut self, name: impl Into<String>) -> Self {
        self.0.push(Fragment::Child(name.into()));
        self
    }

    pub fn nth(mut self, index: i64) -> Self {
        self.0.push(Fragment::Nth(index));
        self
    }

    pub fn wildcard(mut self) -> Self {
        self.0.push(Fragment::Wildcard);
        self
    }

    pub fn descent(mut self) -> Self {
        self.0.push(Fragment::Descent);
        self
    }

    pub fn slice(mut self, start: Option<i64>, end: Option<i64>, step: Option<i64>) -> Self {
        self.0.push(Fragment::Slice { start, end, step });
        self
    }

    /// Append a union. A single selector is stored as the equivalent
    /// `Child` or `Nth` fragment, which is how its text parses back.
    ///
    /// # Panics
    ///
    /// Panics if `selectors` is empty; `[]` is not a valid fragment.
    pub fn union(mut self, mut selectors: Vec<Selector>) -> Self {
        assert!(!selectors.is_empty(), "a union needs at least one selector");
        let fragment = match selectors.pop() {
            Some(Selector::Key(key)) if selectors.is_empty() => Fragment::Child(key),
            Some(Selector::Index(i)) if selectors.is_empty() => Fragment::Nth(i),
            last => {
                selectors.extend(last);
                Fragment::Union(selectors)
            }
        };
        self.0.push(fragment);
        self
    }

    pub fn filter(mut self, script: Script) -> Self {
        self.0.push(Fragment::Filter(script));
        self
    }

    /// The fragments up to and including `last`, used to report where a
    /// mutation failed.
    pub(crate) fn prefix(&self, last: usize) -> Expr {
        let end = (last + 1).min(self.0.len());
        Expr(self.0[..end].to_vec())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut leading = true;
        for fragment in &self.0 {
            fragment.render(f, leading)?;
            leading = matches!(fragment, Fragment::Descent);
        }
        Ok(())
    }
}

impl FromStr for Expr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse(s)
    }
}

impl From<Vec<Fragment>> for Expr {
    fn from(fragments: Vec<Fragment>) -> Self {
        Expr(fragments)
    }
}
