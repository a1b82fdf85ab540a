//! Read-only evaluation: [`Expr::get`], [`Expr::first`], and [`Expr::has`].
//!
//! The walk uses an explicit stack instead of recursion, so deep trees and
//! wide fan-out from wildcards and descents never grow the call stack.

use log::trace;

use crate::{
    ast::{Expr, Fragment, Selector},
    value::{Value, resolve_index},
};

enum Frame<'a> {
    /// Apply the fragment at this index to the node
    Visit(&'a Value, usize),
    /// Re-apply the descent at this index to every child of the node
    Expand(&'a Value, usize),
}

impl Expr {
    /// Every value matched by this expression, in traversal order.
    ///
    /// Never fails: a path that leads nowhere produces an empty result.
    /// Object members are visited in map order.
    ///
    /// # Examples
    ///
    /// ```
    /// use jpath::{parse, Value};
    ///
    /// let data = Value::Array(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
    /// let expr = parse("[1:]").unwrap();
    /// assert_eq!(expr.get(&data), vec![&Value::Integer(2), &Value::Integer(3)]);
    /// ```
    pub fn get<'a>(&self, data: &'a Value) -> Vec<&'a Value> {
        collect(self, data, data, usize::MAX)
    }

    /// The first value matched, without walking the rest of the tree.
    pub fn first<'a>(&self, data: &'a Value) -> Option<&'a Value> {
        collect(self, data, data, 1).into_iter().next()
    }

    /// True when at least one value matches.
    pub fn has(&self, data: &Value) -> bool {
        self.first(data).is_some()
    }
}

/// Walk `expr` from `data`, stopping after `max` results. `Root` fragments
/// jump to `root`, which differs from `data` inside filter scripts.
pub(crate) fn collect<'a>(expr: &Expr, data: &'a Value, root: &'a Value, max: usize) -> Vec<&'a Value> {
    let fragments = expr.fragments();
    let mut results = Vec::new();
    if fragments.is_empty() || max == 0 {
        return results;
    }

    let last = fragments.len() - 1;
    let mut stack = vec![Frame::Visit(data, 0)];

    'walk: while let Some(frame) = stack.pop() {
        let (node, fi) = match frame {
            Frame::Visit(node, fi) => (node, fi),
            Frame::Expand(node, fi) => {
                // Below a trailing descent every descendant is a result;
                // otherwise only containers can match what follows.
                let trailing = fi == last;
                for child in node.children().into_iter().rev() {
                    if trailing || child.is_container() {
                        stack.push(Frame::Visit(child, fi));
                    }
                }
                continue;
            }
        };

        let selected = match &fragments[fi] {
            Fragment::Root => vec![root],
            Fragment::Current => vec![node],
            Fragment::Descent => {
                stack.push(Frame::Expand(node, fi));
                vec![node]
            }
            fragment => select(fragment, node, root),
        };

        if fi == last {
            for value in selected {
                results.push(value);
                if results.len() >= max {
                    break 'walk;
                }
            }
        } else {
            for value in selected.into_iter().rev() {
                stack.push(Frame::Visit(value, fi + 1));
            }
        }
    }

    trace!("'{expr}' matched {} values", results.len());
    results
}

/// Children of `node` picked by a single fragment.
fn select<'a>(fragment: &Fragment, node: &'a Value, root: &'a Value) -> Vec<&'a Value> {
    match (fragment, node) {
        (Fragment::Child(key), Value::Object(map)) => map.get(key).into_iter().collect(),
        (Fragment::Nth(i), Value::Array(arr)) => resolve_index(*i, arr.len())
            .map(|idx| &arr[idx])
            .into_iter()
            .collect(),
        (Fragment::Wildcard, _) => node.children(),
        (Fragment::Slice { start, end, step }, Value::Array(arr)) => {
            slice_indices(*start, *end, *step, arr.len())
                .into_iter()
                .map(|idx| &arr[idx])
                .collect()
        }
        (Fragment::Union(selectors), _) => selectors
            .iter()
            .filter_map(|selector| match (selector, node) {
                (Selector::Key(key), Value::Object(map)) => map.get(key),
                (Selector::Index(i), Value::Array(arr)) => {
                    resolve_index(*i, arr.len()).map(|idx| &arr[idx])
                }
                _ => None,
            })
            .collect(),
        (Fragment::Filter(script), _) => node
            .children()
            .into_iter()
            .filter(|child| script.matches_in(child, root))
            .collect(),
        _ => Vec::new(),
    }
}

/// Indexes visited by a slice over an array of `len` elements.
///
/// Negative bounds count from the end. A positive step walks up from
/// `start` (default 0) to before `end` (default `len`); a negative step
/// walks down from `start` (default `len - 1`) to after `end` (default
/// before the first element). A zero step visits nothing.
pub(crate) fn slice_indices(
    start: Option<i64>,
    end: Option<i64>,
    step: Option<i64>,
    len: usize,
) -> Vec<usize> {
    let step = step.unwrap_or(1);
    let Ok(len) = i64::try_from(len) else {
        return Vec::new();
    };
    if step == 0 || len == 0 {
        return Vec::new();
    }

    let normalize = |i: i64| if i < 0 { i.saturating_add(len) } else { i };
    let mut indices = Vec::new();

    if step > 0 {
        let mut i = start.map_or(0, normalize).clamp(0, len);
        let end = end.map_or(len, normalize).clamp(0, len);
        while i < end {
            indices.extend(usize::try_from(i).ok());
            i = i.saturating_add(step);
        }
    } else {
        let mut i = start.map_or(len - 1, normalize).clamp(-1, len - 1);
        let end = end.map_or(-1, |e| normalize(e).clamp(-1, len - 1));
        while i > end {
            indices.extend(usize::try_from(i).ok());
            i = i.saturating_add(step);
        }
    }

    indices
}
