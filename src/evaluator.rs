use std::{borrow::Cow, cmp::Ordering};

use chrono::{DateTime, Utc};
use log::warn;
use regex::Regex;
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};

use crate::{
    ast::{Entry, Fragment, Op, Operand, Script, script::compile},
    query,
    value::Value,
};

/// Intermediate result of script evaluation.
///
/// Scalars read from the tree are normalized into their own variants so
/// operators compare by value without inspecting the tree again.
#[derive(Debug, Clone)]
enum Term<'a> {
    /// No such value. Distinct from `Null`.
    Nothing,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Cow<'a, str>),
    Time(DateTime<Utc>),
    Pattern(&'a Regex),
    /// Array or object found in the tree
    Node(&'a Value),
    /// Every match of a gathered path
    List(Vec<&'a Value>),
}

impl<'a> Term<'a> {
    fn from_value(value: &'a Value) -> Self {
        match value {
            Value::Null => Term::Null,
            Value::Boolean(b) => Term::Bool(*b),
            Value::Integer(n) => Term::Int(*n),
            Value::Float(n) => Term::Float(*n),
            Value::String(s) => Term::Str(Cow::Borrowed(s.as_str())),
            Value::Time(t) => Term::Time(*t),
            Value::Array(_) | Value::Object(_) => Term::Node(value),
        }
    }

    fn into_value(self) -> Option<Value> {
        match self {
            Term::Nothing => None,
            Term::Null => Some(Value::Null),
            Term::Bool(b) => Some(Value::Boolean(b)),
            Term::Int(n) => Some(Value::Integer(n)),
            Term::Float(n) => Some(Value::Float(n)),
            Term::Str(s) => Some(Value::String(s.into_owned())),
            Term::Time(t) => Some(Value::Time(t)),
            Term::Pattern(re) => Some(Value::String(re.as_str().to_string())),
            Term::Node(value) => Some(value.clone()),
            Term::List(values) => Some(Value::Array(values.into_iter().cloned().collect())),
        }
    }

    fn is_true(&self) -> bool {
        matches!(self, Term::Bool(true))
    }

    fn size(&self) -> Option<usize> {
        match self {
            Term::Str(s) => Some(s.chars().count()),
            Term::Node(value) => value.size(),
            Term::List(values) => Some(values.len()),
            _ => None,
        }
    }

    fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Term::Time(t) => Some(*t),
            Term::Str(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            _ => None,
        }
    }
}

impl Script {
    /// True when the script evaluates to `true` for `candidate`. Paths
    /// starting with `$` are resolved against the candidate as well.
    pub fn matches(&self, candidate: &Value) -> bool {
        self.matches_in(candidate, candidate)
    }

    pub(crate) fn matches_in(&self, candidate: &Value, root: &Value) -> bool {
        self.evaluate(candidate, root).is_true()
    }

    /// Evaluate the script and return its result, or None when the result
    /// is Nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use jpath::{parse_script, Value};
    ///
    /// let script = parse_script("3 * 4 + 1").unwrap();
    /// assert_eq!(script.eval(&Value::Null, &Value::Null), Some(Value::Integer(13)));
    /// ```
    pub fn eval(&self, candidate: &Value, root: &Value) -> Option<Value> {
        self.evaluate(candidate, root).into_value()
    }

    /// The items for which the script evaluates to `true`, in order.
    pub fn select<'a>(&self, items: &'a [Value], root: &Value) -> Vec<&'a Value> {
        items
            .iter()
            .filter(|item| self.matches_in(item, root))
            .collect()
    }

    /// Run the template back to front. Operands are pushed; each operator
    /// pops its operands (left operand on top) and pushes its result.
    fn evaluate<'a>(&'a self, candidate: &'a Value, root: &'a Value) -> Term<'a> {
        let template = self.template();
        let mut stack: Vec<Term<'a>> = Vec::with_capacity(template.len());

        for (i, entry) in template.iter().enumerate().rev() {
            match entry {
                Entry::Operand(operand) => {
                    let gather = i > 0 && matches!(&template[i - 1], Entry::Op(op) if op.gathers());
                    stack.push(resolve(operand, candidate, root, gather));
                }
                Entry::Op(op) => {
                    let left = stack.pop().unwrap_or(Term::Nothing);
                    let result = if op.arity() == 1 {
                        apply_unary(*op, left)
                    } else {
                        let right = stack.pop().unwrap_or(Term::Nothing);
                        apply_binary(*op, left, right)
                    };
                    stack.push(result);
                }
            }
        }

        stack.pop().unwrap_or(Term::Nothing)
    }
}

fn resolve<'a>(operand: &'a Operand, candidate: &'a Value, root: &'a Value, gather: bool) -> Term<'a> {
    match operand {
        Operand::Literal(value) => Term::from_value(value),
        Operand::Nothing => Term::Nothing,
        Operand::Pattern(pattern) => Term::Pattern(pattern.regex()),
        Operand::Path(expr) if gather => Term::List(query::collect(expr, candidate, root, usize::MAX)),
        Operand::Path(expr) => {
            // @.name on an object needs no walk
            if let [Fragment::Current, Fragment::Child(key)] = expr.fragments()
                && let Value::Object(map) = candidate
            {
                return map.get(key).map_or(Term::Nothing, Term::from_value);
            }
            query::collect(expr, candidate, root, 1)
                .into_iter()
                .next()
                .map_or(Term::Nothing, Term::from_value)
        }
    }
}

fn apply_unary<'a>(op: Op, arg: Term<'a>) -> Term<'a> {
    match op {
        Op::Not => match arg {
            Term::Bool(b) => Term::Bool(!b),
            Term::Nothing => Term::Bool(true),
            _ => Term::Bool(false),
        },
        Op::Get => arg,
        Op::Length => arg
            .size()
            .and_then(|n| i64::try_from(n).ok())
            .map_or(Term::Nothing, Term::Int),
        Op::Count => {
            let n = match &arg {
                Term::Nothing => 0,
                Term::List(values) => values.len(),
                Term::Node(Value::Array(arr)) => arr.len(),
                _ => 1,
            };
            i64::try_from(n).map_or(Term::Nothing, Term::Int)
        }
        _ => Term::Nothing,
    }
}

fn apply_binary<'a>(op: Op, left: Term<'a>, right: Term<'a>) -> Term<'a> {
    match op {
        Op::Eq => Term::Bool(equal(&left, &right)),
        Op::Neq => Term::Bool(!equal(&left, &right)),
        Op::Lt => Term::Bool(order(&left, &right) == Some(Ordering::Less)),
        Op::Gt => Term::Bool(order(&left, &right) == Some(Ordering::Greater)),
        Op::Lte => Term::Bool(matches!(
            order(&left, &right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        Op::Gte => Term::Bool(matches!(
            order(&left, &right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        Op::And => Term::Bool(left.is_true() && right.is_true()),
        Op::Or => Term::Bool(left.is_true() || right.is_true()),
        Op::In => Term::Bool(contains(&right, &left)),
        Op::Empty => match (left.size(), right) {
            (Some(n), Term::Bool(want)) => Term::Bool((n == 0) == want),
            _ => Term::Bool(false),
        },
        Op::Has | Op::Exists => match right {
            Term::Bool(want) => Term::Bool(!matches!(left, Term::Nothing) == want),
            _ => Term::Bool(false),
        },
        Op::Regex | Op::Search => Term::Bool(regex_match(&left, &right, false)),
        Op::Match => Term::Bool(regex_match(&left, &right, true)),
        Op::Add | Op::Sub | Op::Mult | Op::Divide => arithmetic(op, left, right),
        Op::Not | Op::Get | Op::Length | Op::Count => Term::Nothing,
    }
}

fn equal(left: &Term, right: &Term) -> bool {
    match (left, right) {
        (Term::Nothing, Term::Nothing) | (Term::Null, Term::Null) => true,
        (Term::Bool(a), Term::Bool(b)) => a == b,
        (Term::Str(a), Term::Str(b)) => a == b,
        (Term::Int(_) | Term::Float(_), Term::Int(_) | Term::Float(_)) => {
            compare_numbers(left, right) == Some(Ordering::Equal)
        }
        (Term::Time(_), _) | (_, Term::Time(_)) => match (left.as_time(), right.as_time()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        (Term::Node(a), Term::Node(b)) => a == b,
        (Term::List(a), Term::List(b)) => a == b,
        (Term::List(list), Term::Node(Value::Array(arr)))
        | (Term::Node(Value::Array(arr)), Term::List(list)) => {
            list.len() == arr.len() && list.iter().zip(arr).all(|(a, b)| *a == b)
        }
        _ => false,
    }
}

fn order(left: &Term, right: &Term) -> Option<Ordering> {
    match (left, right) {
        (Term::Int(_) | Term::Float(_), Term::Int(_) | Term::Float(_)) => {
            compare_numbers(left, right)
        }
        (Term::Str(a), Term::Str(b)) => Some(a.cmp(b)),
        (Term::Time(_), _) | (_, Term::Time(_)) => Some(left.as_time()?.cmp(&right.as_time()?)),
        _ => None,
    }
}

fn compare_numbers(left: &Term, right: &Term) -> Option<Ordering> {
    match (left, right) {
        (Term::Int(a), Term::Int(b)) => Some(a.cmp(b)),
        (Term::Float(a), Term::Float(b)) => a.partial_cmp(b),
        (Term::Int(a), Term::Float(b)) => (*a as f64).partial_cmp(b),
        (Term::Float(a), Term::Int(b)) => a.partial_cmp(&(*b as f64)),
        _ => None,
    }
}

fn contains(haystack: &Term, needle: &Term) -> bool {
    let items: Vec<&Value> = match haystack {
        Term::List(values) => values.clone(),
        Term::Node(Value::Array(arr)) => arr.iter().collect(),
        _ => return false,
    };
    items
        .into_iter()
        .any(|item| equal(&Term::from_value(item), needle))
}

fn regex_match(subject: &Term, pattern: &Term, anchored: bool) -> bool {
    let Term::Str(subject) = subject else {
        return false;
    };
    match pattern {
        Term::Pattern(re) => re.is_match(subject),
        Term::Str(source) => match compile(source, anchored) {
            Ok(re) => re.is_match(subject),
            Err(err) => {
                warn!("invalid regular expression '{source}' in filter: {err}");
                false
            }
        },
        _ => false,
    }
}

fn arithmetic<'a>(op: Op, left: Term<'a>, right: Term<'a>) -> Term<'a> {
    match (left, right) {
        (Term::Int(a), Term::Int(b)) => {
            let result = match op {
                Op::Add => a.checked_add(b),
                Op::Sub => a.checked_sub(b),
                Op::Mult => a.checked_mul(b),
                Op::Divide => match a.checked_rem(b) {
                    Some(0) => a.checked_div(b),
                    Some(_) => return float_arithmetic(op, a as f64, b as f64),
                    None => None,
                },
                _ => None,
            };
            result.map_or(Term::Nothing, Term::Int)
        }
        (Term::Float(a), Term::Float(b)) => float_arithmetic(op, a, b),
        (Term::Int(a), Term::Float(b)) => {
            mixed_arithmetic(op, Decimal::from_i64(a), Decimal::from_f64(b), a as f64, b)
        }
        (Term::Float(a), Term::Int(b)) => {
            mixed_arithmetic(op, Decimal::from_f64(a), Decimal::from_i64(b), a, b as f64)
        }
        (Term::Str(a), Term::Str(b)) if op == Op::Add => {
            Term::Str(Cow::Owned(format!("{a}{b}")))
        }
        _ => Term::Nothing,
    }
}

/// Integer and float operands are combined as decimals so results such as
/// `2 * 1.5` come out as the integer 3.
fn mixed_arithmetic<'a>(
    op: Op,
    ad: Option<Decimal>,
    bd: Option<Decimal>,
    a: f64,
    b: f64,
) -> Term<'a> {
    if let (Some(ad), Some(bd)) = (ad, bd) {
        let rd = match op {
            Op::Add => ad.checked_add(bd),
            Op::Sub => ad.checked_sub(bd),
            Op::Mult => ad.checked_mul(bd),
            Op::Divide => ad.checked_div(bd),
            _ => None,
        };
        if let Some(rd) = rd {
            if rd.is_integer()
                && let Some(r) = rd.to_i64()
            {
                return Term::Int(r);
            } else if let Some(r) = rd.to_f64() {
                return Term::Float(r);
            }
        }
    }
    float_arithmetic(op, a, b)
}

fn float_arithmetic<'a>(op: Op, a: f64, b: f64) -> Term<'a> {
    let result = match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mult => a * b,
        Op::Divide => a / b,
        _ => return Term::Nothing,
    };
    if result.is_finite() {
        Term::Float(result)
    } else {
        Term::Nothing
    }
}
