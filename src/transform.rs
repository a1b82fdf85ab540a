//! In-place mutation: set, delete, and modify the values an expression
//! selects.
//!
//! A mutable tree can not be held by reference while it is being changed,
//! so the walk keeps a stack of resolved locations and looks each one up
//! again when it is popped. A location that disappeared in the meantime
//! (deleted or overwritten by an earlier branch) is skipped.

use std::{
    collections::{HashMap, HashSet},
    slice,
};

use log::{debug, trace};

use crate::{
    ast::{Expr, Fragment, Selector},
    error::{Operation, PathError},
    query::slice_indices,
    value::{Value, resolve_index},
};

/// One step from a node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member
    Field(String),
    /// Array element
    Index(usize),
}

enum Action<'f> {
    Set(Value),
    Delete,
    Modify(&'f mut dyn FnMut(&Value) -> Option<Value>),
}

impl Action<'_> {
    fn operation(&self) -> Operation {
        match self {
            Action::Set(_) => Operation::Set,
            Action::Delete => Operation::Delete,
            Action::Modify(_) => Operation::Modify,
        }
    }
}

/// A resolved location and the index of the fragment to apply there.
type Task = (Vec<PathSegment>, usize);

struct Mutation<'e, 'f> {
    expr: &'e Expr,
    action: Action<'f>,
    /// Fragments before the first descent report structural errors and
    /// may create missing containers. Fragments after it skip quietly.
    strict_until: usize,
    max: usize,
    count: usize,
    /// Locations written by this call. A descent never walks into them, so
    /// a written value is not matched again.
    written: HashSet<Vec<PathSegment>>,
}

impl<'e, 'f> Mutation<'e, 'f> {
    fn new(expr: &'e Expr, action: Action<'f>, max: usize) -> Self {
        let strict_until = expr
            .fragments()
            .iter()
            .position(|fragment| matches!(fragment, Fragment::Descent))
            .unwrap_or(expr.len());
        Mutation {
            expr,
            action,
            strict_until,
            max,
            count: 0,
            written: HashSet::new(),
        }
    }

    fn run(mut self, data: &mut Value) -> Result<usize, PathError> {
        let op = self.action.operation();
        let expr = self.expr;
        let fragments = expr.fragments();

        let Some(target) = fragments.last() else {
            return Err(PathError::EmptyExpression { op });
        };

        if let Action::Modify(modify) = &mut self.action
            && fragments
                .iter()
                .all(|fragment| matches!(fragment, Fragment::Root | Fragment::Current))
        {
            return Ok(match modify(data) {
                Some(value) => {
                    *data = value;
                    1
                }
                None => 0,
            });
        }

        if !target.is_assignable() {
            return Err(PathError::InvalidTarget {
                op,
                fragment: target.kind(),
            });
        }

        let last = fragments.len() - 1;
        let mut stack: Vec<Task> = vec![(Vec::new(), 0)];

        while let Some((at, fi)) = stack.pop() {
            if self.count >= self.max {
                break;
            }
            if self.was_written(&at) {
                continue;
            }
            match &fragments[fi] {
                Fragment::Root => stack.push((Vec::new(), fi + 1)),
                Fragment::Current => stack.push((at, fi + 1)),
                Fragment::Descent => {
                    // Children are taken before anything below is changed.
                    for segment in descendable(data, &at).into_iter().rev() {
                        stack.push((extend(&at, segment), fi));
                    }
                    stack.push((at, fi + 1));
                }
                fragment if fi == last => self.apply(data, &at, fragment, fi)?,
                fragment => self.follow(data, at, fragment, fi, &mut stack)?,
            }
        }

        trace!("{op} '{expr}' changed {} locations", self.count);
        Ok(self.count)
    }

    fn strict(&self, fi: usize) -> bool {
        fi < self.strict_until
    }

    /// True when `at` is, or lies inside, a location this call wrote.
    fn was_written(&self, at: &[PathSegment]) -> bool {
        !self.written.is_empty() && (1..=at.len()).any(|n| self.written.contains(&at[..n]))
    }

    /// Only expressions with a descent can reach a written location again.
    fn record(&mut self, at: &[PathSegment], segment: &PathSegment) {
        if self.strict_until < self.expr.len() {
            self.written.insert(extend(at, segment.clone()));
        }
    }

    /// The expression up to and including fragment `fi`, for error messages.
    fn path_to(&self, fi: usize) -> String {
        self.expr.prefix(fi).to_string()
    }

    /// Locations under `node` picked by `fragment`. Named keys are included
    /// whether or not they exist yet.
    fn select(
        &self,
        fragment: &Fragment,
        node: &Value,
        root: &Value,
        fi: usize,
    ) -> Result<Vec<PathSegment>, PathError> {
        let segments = match (fragment, node) {
            (Fragment::Child(key), Value::Object(_)) => vec![PathSegment::Field(key.clone())],
            (Fragment::Nth(i), Value::Array(arr)) => {
                self.index(*i, arr.len(), fi)?.into_iter().collect()
            }
            (Fragment::Wildcard, _) => node.child_segments(),
            (Fragment::Slice { start, end, step }, Value::Array(arr)) => {
                slice_indices(*start, *end, *step, arr.len())
                    .into_iter()
                    .map(PathSegment::Index)
                    .collect()
            }
            (Fragment::Union(selectors), _) => {
                let mut segments = Vec::new();
                for selector in selectors {
                    match (selector, node) {
                        (Selector::Key(key), Value::Object(_)) => {
                            segments.push(PathSegment::Field(key.clone()));
                        }
                        (Selector::Index(i), Value::Array(arr)) => {
                            segments.extend(self.index(*i, arr.len(), fi)?);
                        }
                        _ => {}
                    }
                }
                segments
            }
            (Fragment::Filter(script), _) => node
                .child_segments()
                .into_iter()
                .zip(node.children())
                .filter(|(_, child)| script.matches_in(child, root))
                .map(|(segment, _)| segment)
                .collect(),
            _ => Vec::new(),
        };
        Ok(segments)
    }

    fn index(&self, i: i64, len: usize, fi: usize) -> Result<Option<PathSegment>, PathError> {
        match resolve_index(i, len) {
            Some(idx) => Ok(Some(PathSegment::Index(idx))),
            None if self.strict(fi) && !matches!(self.action, Action::Modify(_)) => {
                Err(PathError::OutOfBounds {
                    path: self.path_to(fi),
                })
            }
            None => Ok(None),
        }
    }

    /// Move from the node at `at` to the children picked by an
    /// intermediate fragment, creating one missing container when setting.
    fn follow(
        &mut self,
        data: &mut Value,
        at: Vec<PathSegment>,
        fragment: &Fragment,
        fi: usize,
        stack: &mut Vec<Task>,
    ) -> Result<(), PathError> {
        let names = matches!(
            fragment,
            Fragment::Child(_) | Fragment::Nth(_) | Fragment::Union(_)
        );
        let mut next = Vec::new();
        let mut created = Vec::new();

        {
            let root = &*data;
            let Some(node) = root.locate(&at) else {
                return Ok(());
            };
            for segment in self.select(fragment, node, root, fi)? {
                match node.locate(slice::from_ref(&segment)) {
                    Some(child) if child.is_container() => next.push(segment),
                    Some(child) if !matches!(child, Value::Null) => {
                        if names && self.strict(fi) {
                            return Err(PathError::CannotFollow {
                                kind: child.type_name(),
                                path: self.path_to(fi),
                            });
                        }
                    }
                    _ => {
                        if names && self.strict(fi) && matches!(self.action, Action::Set(_)) {
                            created.push((segment.clone(), self.deduce(fi)?));
                            next.push(segment);
                        }
                    }
                }
            }
        }

        if !created.is_empty()
            && let Some(node) = data.locate_mut(&at)
        {
            for (segment, container) in created {
                debug!(
                    "creating {} at '{}'",
                    container.type_name(),
                    self.path_to(fi)
                );
                place(node, segment, container);
            }
        }

        for segment in next.into_iter().rev() {
            stack.push((extend(&at, segment), fi + 1));
        }
        Ok(())
    }

    /// The container to create for a missing slot at fragment `fi`, judged
    /// by the fragment that follows it.
    fn deduce(&self, fi: usize) -> Result<Value, PathError> {
        let fragments = self.expr.fragments();
        if fi + 2 < fragments.len() {
            return Err(PathError::TooDeep {
                path: self.path_to(fi + 1),
            });
        }
        match fragments.get(fi + 1) {
            Some(Fragment::Child(_)) => Ok(Value::Object(HashMap::new())),
            Some(Fragment::Nth(i)) if *i >= 0 => usize::try_from(*i)
                .ok()
                .and_then(|i| i.checked_add(1))
                .map(|len| Value::Array(vec![Value::Null; len]))
                .ok_or_else(|| PathError::CannotDeduce {
                    path: self.path_to(fi),
                }),
            _ => Err(PathError::CannotDeduce {
                path: self.path_to(fi),
            }),
        }
    }

    /// Apply the action to the locations picked by the last fragment.
    fn apply(
        &mut self,
        data: &mut Value,
        at: &[PathSegment],
        fragment: &Fragment,
        fi: usize,
    ) -> Result<(), PathError> {
        let segments = {
            let root = &*data;
            let Some(node) = root.locate(at) else {
                return Ok(());
            };
            self.select(fragment, node, root, fi)?
        };
        let Some(node) = data.locate_mut(at) else {
            return Ok(());
        };

        for segment in segments {
            if self.count >= self.max {
                break;
            }
            let changed = match &mut self.action {
                Action::Set(value) => {
                    place(node, segment.clone(), value.clone());
                    true
                }
                Action::Delete => remove(node, segment.clone()),
                Action::Modify(modify) => {
                    match node.locate_mut(slice::from_ref(&segment)) {
                        Some(slot) => match modify(slot) {
                            Some(value) => {
                                *slot = value;
                                true
                            }
                            None => false,
                        },
                        None => false,
                    }
                }
            };
            if changed {
                self.count += 1;
                if !matches!(self.action, Action::Delete) {
                    self.record(at, &segment);
                }
            }
        }
        Ok(())
    }
}

/// Segments of the container children of the node at `at`.
fn descendable(data: &Value, at: &[PathSegment]) -> Vec<PathSegment> {
    let Some(node) = data.locate(at) else {
        return Vec::new();
    };
    node.child_segments()
        .into_iter()
        .zip(node.children())
        .filter(|(_, child)| child.is_container())
        .map(|(segment, _)| segment)
        .collect()
}

fn extend(at: &[PathSegment], segment: PathSegment) -> Vec<PathSegment> {
    let mut location = Vec::with_capacity(at.len() + 1);
    location.extend_from_slice(at);
    location.push(segment);
    location
}

/// Store `value` in `node` at `segment`. Array slots must already exist.
fn place(node: &mut Value, segment: PathSegment, value: Value) {
    match (node, segment) {
        (Value::Object(map), PathSegment::Field(key)) => {
            map.insert(key, value);
        }
        (Value::Array(arr), PathSegment::Index(i)) => {
            if let Some(slot) = arr.get_mut(i) {
                *slot = value;
            }
        }
        _ => {}
    }
}

/// Remove a member from an object, or null an array slot so later indexes
/// keep their positions.
fn remove(node: &mut Value, segment: PathSegment) -> bool {
    match (node, segment) {
        (Value::Object(map), PathSegment::Field(key)) => map.remove(&key).is_some(),
        (Value::Array(arr), PathSegment::Index(i)) => match arr.get_mut(i) {
            Some(slot) => {
                *slot = Value::Null;
                true
            }
            None => false,
        },
        _ => false,
    }
}

impl Expr {
    /// Assign `value` to every location this expression selects.
    ///
    /// A single missing container along the way is created: an object when
    /// the next fragment names a key, an array of nulls when it names an
    /// index. Errors leave earlier assignments in place.
    ///
    /// # Examples
    ///
    /// ```
    /// use jpath::{parse, Value};
    /// use std::collections::HashMap;
    ///
    /// let mut data = Value::Object(HashMap::new());
    /// parse("a.b").unwrap().set(&mut data, 3).unwrap();
    /// assert_eq!(parse("a.b").unwrap().first(&data), Some(&Value::Integer(3)));
    /// ```
    pub fn set(&self, data: &mut Value, value: impl Into<Value>) -> Result<(), PathError> {
        Mutation::new(self, Action::Set(value.into()), usize::MAX).run(data)?;
        Ok(())
    }

    /// Like [`Expr::set`], but stops after the first assignment.
    pub fn set_one(&self, data: &mut Value, value: impl Into<Value>) -> Result<(), PathError> {
        Mutation::new(self, Action::Set(value.into()), 1).run(data)?;
        Ok(())
    }

    /// Remove every selected object member and null every selected array
    /// element. Arrays never shrink.
    pub fn del(&self, data: &mut Value) -> Result<(), PathError> {
        Mutation::new(self, Action::Delete, usize::MAX).run(data)?;
        Ok(())
    }

    /// Like [`Expr::del`], but stops after the first removal.
    pub fn del_one(&self, data: &mut Value) -> Result<(), PathError> {
        Mutation::new(self, Action::Delete, 1).run(data)?;
        Ok(())
    }

    /// Replace each selected value with `f(value)` when `f` returns `Some`.
    ///
    /// The tree is edited in place, so the updated document is `data`
    /// itself once this returns; the result is the number of values
    /// replaced. Returning `None` from `f` leaves a value as it is.
    ///
    /// An expression consisting only of `$` or `@` hands the whole tree to
    /// `f`. Nothing is created; missing locations are skipped.
    pub fn modify<F>(&self, data: &mut Value, mut f: F) -> Result<usize, PathError>
    where
        F: FnMut(&Value) -> Option<Value>,
    {
        Mutation::new(self, Action::Modify(&mut f), usize::MAX).run(data)
    }

    /// Like [`Expr::modify`], but stops after the first replacement.
    pub fn modify_one<F>(&self, data: &mut Value, mut f: F) -> Result<usize, PathError>
    where
        F: FnMut(&Value) -> Option<Value>,
    {
        Mutation::new(self, Action::Modify(&mut f), 1).run(data)
    }

    /// Like [`Expr::set`], but panics on error.
    pub fn must_set(&self, data: &mut Value, value: impl Into<Value>) {
        if let Err(err) = self.set(data, value) {
            panic!("{err}");
        }
    }

    /// Like [`Expr::set_one`], but panics on error.
    pub fn must_set_one(&self, data: &mut Value, value: impl Into<Value>) {
        if let Err(err) = self.set_one(data, value) {
            panic!("{err}");
        }
    }

    /// Like [`Expr::del`], but panics on error.
    pub fn must_del(&self, data: &mut Value) {
        if let Err(err) = self.del(data) {
            panic!("{err}");
        }
    }

    /// Like [`Expr::del_one`], but panics on error.
    pub fn must_del_one(&self, data: &mut Value) {
        if let Err(err) = self.del_one(data) {
            panic!("{err}");
        }
    }

    /// Like [`Expr::modify`], but panics on error.
    pub fn must_modify<F>(&self, data: &mut Value, f: F) -> usize
    where
        F: FnMut(&Value) -> Option<Value>,
    {
        match self.modify(data, f) {
            Ok(count) => count,
            Err(err) => panic!("{err}"),
        }
    }
}
