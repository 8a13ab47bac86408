//! Provides [`Value`], the scalar value type shared by filter leaf literals, mutation JSON
//! payloads, and claim values carried in an [`crate::schema::AuthContext`].

use crate::Error;
use std::collections::HashMap;
use std::convert::{TryFrom, TryInto};

/// A scalar or composite value, used wherever a filter leaf literal or a mutation JSON field
/// needs a representation independent of `serde_json::Value`.
///
/// # Examples
///
/// ```rust
/// use graphscribe::value::Value;
///
/// let v = Value::Bool(true);
/// ```
#[derive(Clone, Debug)]
pub enum Value {
    Array(Vec<Value>),
    Bool(bool),
    Float64(f64),
    Int64(i64),
    Map(HashMap<String, Value>),
    Null,
    String(String),
    UInt64(u64),
}

impl From<HashMap<String, Value>> for Value {
    fn from(map: HashMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(oa)) => a == oa,
            (Value::Bool(b), Value::Bool(ob)) => b == ob,
            (Value::Float64(f), Value::Float64(of)) => f == of,
            (Value::Int64(i), Value::Int64(oi)) => i == oi,
            (Value::Map(m), Value::Map(om)) => m == om,
            (Value::Null, Value::Null) => true,
            (Value::String(s), Value::String(os)) => s == os,
            (Value::UInt64(i), Value::UInt64(oi)) => i == oi,
            (_, _) => false,
        }
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Value, Error> {
        match value {
            serde_json::Value::Array(a) => Ok(Value::Array(
                a.into_iter()
                    .map(|val| val.try_into())
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int64(i))
                } else if let Some(i) = n.as_u64() {
                    Ok(Value::UInt64(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float64(f))
                } else {
                    Err(Error::TypeConversionFailed {
                        src: "serde_json::Value::Number".to_string(),
                        dst: "Value".to_string(),
                    })
                }
            }
            serde_json::Value::String(s) => Ok(Value::String(s)),
            serde_json::Value::Object(m) => Ok(Value::Map(
                m.into_iter()
                    .map(|(k, v)| {
                        let val = v.try_into()?;
                        Ok((k, val))
                    })
                    .collect::<Result<HashMap<String, Value>, Error>>()?,
            )),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<bool, Self::Error> {
        if let Value::Bool(b) = value {
            Ok(b)
        } else {
            Err(Error::TypeConversionFailed {
                src: format!("{:#?}", value),
                dst: "bool".to_string(),
            })
        }
    }
}

impl TryFrom<Value> for Vec<bool> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Vec<bool>, Self::Error> {
        if let Value::Array(a) = value {
            a.into_iter()
                .map(|v| v.try_into())
                .collect::<Result<Vec<_>, Error>>()
        } else {
            Err(Error::TypeConversionFailed {
                src: format!("{:#?}", value),
                dst: "Vec<bool>".to_string(),
            })
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<f64, Self::Error> {
        if let Value::Int64(i) = value {
            Ok(i as f64)
        } else if let Value::UInt64(i) = value {
            Ok(i as f64)
        } else if let Value::Float64(f) = value {
            Ok(f)
        } else {
            Err(Error::TypeConversionFailed {
                src: format!("{:#?}", value),
                dst: "f64".to_string(),
            })
        }
    }
}

impl TryFrom<Value> for Vec<f64> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Vec<f64>, Self::Error> {
        if let Value::Array(a) = value {
            a.into_iter()
                .map(|v| v.try_into())
                .collect::<Result<Vec<_>, Error>>()
        } else {
            Err(Error::TypeConversionFailed {
                src: format!("{:#?}", value),
                dst: "Vec<f64>".to_string(),
            })
        }
    }
}

impl TryFrom<Value> for i32 {
    type Error = Error;

    fn try_from(value: Value) -> Result<i32, Self::Error> {
        match value {
            Value::Int64(i) => {
                if i >= (i32::min_value() as i64) && i <= (i32::max_value() as i64) {
                    Ok(i as i32)
                } else {
                    Err(Error::TypeConversionFailed {
                        src: format!("{:#?}", value),
                        dst: "i32".to_string(),
                    })
                }
            }
            Value::UInt64(i) => {
                if i <= (i32::max_value() as u64) {
                    Ok(i as i32)
                } else {
                    Err(Error::TypeConversionFailed {
                        src: format!("{:#?}", value),
                        dst: "i32".to_string(),
                    })
                }
            }
            _ => Err(Error::TypeConversionFailed {
                src: format!("{:#?}", value),
                dst: "i32".to_string(),
            }),
        }
    }
}

impl TryFrom<Value> for Vec<i32> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Vec<i32>, Self::Error> {
        if let Value::Array(a) = value {
            a.into_iter()
                .map(|v| v.try_into())
                .collect::<Result<Vec<_>, Error>>()
        } else {
            Err(Error::TypeConversionFailed {
                src: format!("{:#?}", value),
                dst: "Vec<i32>".to_string(),
            })
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<String, Self::Error> {
        if let Value::String(s) = value {
            Ok(s)
        } else {
            Err(Error::TypeConversionFailed {
                src: format!("{:#?}", value),
                dst: "String".to_string(),
            })
        }
    }
}

impl TryFrom<Value> for Vec<String> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Vec<String>, Self::Error> {
        if let Value::Array(a) = value {
            match a.get(0) {
                Some(Value::Null) => Ok(Vec::new()),
                _ => a
                    .into_iter()
                    .map(|v| v.try_into())
                    .collect::<Result<Vec<_>, Error>>(),
            }
        } else {
            Err(Error::TypeConversionFailed {
                src: format!("{:#?}", value),
                dst: "Vec<String>".to_string(),
            })
        }
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = Error;

    fn try_from(value: Value) -> Result<serde_json::Value, Error> {
        match value {
            Value::Array(a) => Ok(serde_json::Value::Array(
                a.into_iter()
                    .map(|v| v.try_into())
                    .collect::<Result<Vec<_>, Error>>()?,
            )),
            Value::Bool(b) => Ok(serde_json::Value::Bool(b)),
            Value::Float64(f) => Ok(serde_json::Value::Number(
                serde_json::Number::from_f64(f).ok_or_else(|| Error::TypeConversionFailed {
                    src: "Value::Float64".to_string(),
                    dst: "serde_json::Number".to_string(),
                })?,
            )),
            Value::Int64(i) => Ok(serde_json::Value::Number(i.into())),
            Value::Map(hm) => Ok(serde_json::Value::Object(
                hm.into_iter()
                    .map(|(k, v)| {
                        let val = v.try_into()?;
                        Ok((k, val))
                    })
                    .collect::<Result<serde_json::Map<String, serde_json::Value>, Error>>()?,
            )),
            Value::Null => Ok(serde_json::Value::Null),
            Value::String(s) => Ok(serde_json::Value::String(s)),
            Value::UInt64(i) => Ok(serde_json::Value::Number(i.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Value;
    use std::convert::TryInto;

    /// Passes if the Value implements the Send trait
    #[test]
    fn test_value_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Value>();
    }

    /// Passes if Value implements the Sync trait
    #[test]
    fn test_value_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<Value>();
    }

    /// Passes if a serde_json value round trips through Value and back unchanged
    #[test]
    fn json_round_trip() {
        let j = serde_json::json!({"name": "Jane", "age": 42, "tags": ["a", "b"], "active": true});
        let v: Value = j.clone().try_into().unwrap();
        let back: serde_json::Value = v.try_into().unwrap();
        assert_eq!(j, back);
    }

    /// Passes if an array of null converts to an empty Vec<String>, matching the convention a
    /// caller relies on when a list field is absent rather than populated.
    #[test]
    fn null_array_to_empty_string_vec() {
        let v = Value::Array(vec![Value::Null]);
        let s: Vec<String> = v.try_into().unwrap();
        assert!(s.is_empty());
    }

    /// Passes if an i32 that overflows i32::MAX fails conversion rather than silently wrapping
    #[test]
    fn oversized_int_conversion_fails() {
        let v = Value::Int64(i64::from(i32::max_value()) + 1);
        let result: Result<i32, _> = v.try_into();
        assert!(result.is_err());
    }
}
