use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::transform::PathSegment;

/// A node in the generic tree that path expressions operate on.
///
/// This type represents all JSON types with a distinction between integers
/// and floats, plus a time value for documents built in code.
///
/// # Examples
///
/// ```
/// use jpath::Value;
/// use std::collections::HashMap;
///
/// // Scalar values
/// let null = Value::Null;
/// let boolean = Value::Boolean(true);
/// let integer = Value::Integer(42);
/// let float = Value::Float(3.14);
/// let string = Value::String("hello".to_string());
///
/// // Collections
/// let array = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
///
/// let mut obj = HashMap::new();
/// obj.insert("key".to_string(), Value::String("value".to_string()));
/// let object = Value::Object(obj);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Floating-point number
    Float(f64),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// A point in time, serialized as an RFC 3339 string
    Time(DateTime<Utc>),

    /// Array of values (homogeneous or heterogeneous)
    Array(Vec<Value>),

    /// Object with string keys and value values
    Object(HashMap<String, Value>),
}

impl Value {
    /// Human-readable type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Time(_) => "time",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// True for arrays and objects, the only nodes a path can descend into.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Number of elements, members, or characters for sized values.
    pub fn size(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(arr) => Some(arr.len()),
            Value::Object(obj) => Some(obj.len()),
            _ => None,
        }
    }

    /// Immediate children in iteration order: array elements by index, object
    /// values in map order. Scalars have none.
    pub fn children(&self) -> Vec<&Value> {
        match self {
            Value::Array(arr) => arr.iter().collect(),
            Value::Object(obj) => obj.values().collect(),
            _ => Vec::new(),
        }
    }

    /// Segments addressing each immediate child, matching [`Value::children`].
    pub(crate) fn child_segments(&self) -> Vec<PathSegment> {
        match self {
            Value::Array(arr) => (0..arr.len()).map(PathSegment::Index).collect(),
            Value::Object(obj) => obj.keys().cloned().map(PathSegment::Field).collect(),
            _ => Vec::new(),
        }
    }

    /// Follow a resolved location from this node.
    pub(crate) fn locate(&self, at: &[PathSegment]) -> Option<&Value> {
        let mut current = self;
        for segment in at {
            current = match (current, segment) {
                (Value::Object(map), PathSegment::Field(key)) => map.get(key)?,
                (Value::Array(arr), PathSegment::Index(i)) => arr.get(*i)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Mutable counterpart of [`Value::locate`].
    pub(crate) fn locate_mut(&mut self, at: &[PathSegment]) -> Option<&mut Value> {
        let mut current = self;
        for segment in at {
            current = match (current, segment) {
                (Value::Object(map), PathSegment::Field(key)) => map.get_mut(key)?,
                (Value::Array(arr), PathSegment::Index(i)) => arr.get_mut(*i)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

/// Resolve a possibly negative index against a length.
pub(crate) fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let resolved = if index < 0 {
        let back = usize::try_from(index.unsigned_abs()).ok()?;
        len.checked_sub(back)?
    } else {
        usize::try_from(index).ok()?
    };
    (resolved < len).then_some(resolved)
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(obj: HashMap<String, Value>) -> Self {
        Value::Object(obj)
    }
}
