//! Conversion between [`Value`] trees, `serde_json` values, and any type
//! that implements serde's traits.
//!
//! Typed structures are decomposed into a [`Value`] tree through serde, so
//! field names follow the type's serde attributes (`rename`,
//! `rename_all`, ...). Writing back recomposes the structure the same way.

use serde::{Serialize, de::DeserializeOwned};

use crate::{ast::Expr, error::ConvertError, value::Value};

/// Convert a `serde_json::Value` into a [`Value`].
pub fn from_json(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(from_json).collect()),
        serde_json::Value::Object(obj) => {
            Value::Object(obj.into_iter().map(|(k, v)| (k, from_json(v))).collect())
        }
    }
}

/// Convert a [`Value`] into a `serde_json::Value`. Times become RFC 3339
/// strings; non-finite floats become null.
pub fn to_json(v: &Value) -> serde_json::Value {
    match v {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Time(t) => serde_json::Value::String(t.to_rfc3339()),
        Value::Array(arr) => serde_json::Value::Array(arr.iter().map(to_json).collect()),
        Value::Object(obj) => serde_json::Value::Object(
            obj.iter().map(|(k, v)| (k.clone(), to_json(v))).collect(),
        ),
    }
}

/// Parse JSON text into a [`Value`].
pub fn parse_json(text: &str) -> Result<Value, ConvertError> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    Ok(from_json(json))
}

/// Decompose any serializable value into a [`Value`] tree.
pub fn to_value<T: Serialize + ?Sized>(data: &T) -> Result<Value, ConvertError> {
    Ok(from_json(serde_json::to_value(data)?))
}

/// Rebuild a typed value from a [`Value`] tree.
pub fn from_value<T: DeserializeOwned>(value: &Value) -> Result<T, ConvertError> {
    Ok(serde_json::from_value(to_json(value))?)
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        from_json(v)
    }
}

impl Expr {
    /// Evaluate against a typed structure. Matches are returned as owned
    /// values since they are read from a decomposed copy.
    ///
    /// # Examples
    ///
    /// ```
    /// use jpath::{parse, Value};
    /// use std::collections::HashMap;
    ///
    /// let mut prices = HashMap::new();
    /// prices.insert("apple".to_string(), 3);
    /// let found = parse("$.apple").unwrap().get_from(&prices).unwrap();
    /// assert_eq!(found, vec![Value::Integer(3)]);
    /// ```
    pub fn get_from<T: Serialize + ?Sized>(&self, data: &T) -> Result<Vec<Value>, ConvertError> {
        let tree = to_value(data)?;
        Ok(self.get(&tree).into_iter().cloned().collect())
    }

    /// Set through a typed structure. The structure is decomposed, updated,
    /// and rebuilt; `data` is only replaced when every step succeeds.
    pub fn set_on<T>(&self, data: &mut T, value: impl Into<Value>) -> Result<(), ConvertError>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut tree = to_value(data)?;
        self.set(&mut tree, value)?;
        *data = from_value(&tree)?;
        Ok(())
    }

    /// Delete through a typed structure. Fields that can not be absent make
    /// the rebuild fail, leaving `data` unchanged.
    pub fn del_on<T>(&self, data: &mut T) -> Result<(), ConvertError>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut tree = to_value(data)?;
        self.del(&mut tree)?;
        *data = from_value(&tree)?;
        Ok(())
    }
}
