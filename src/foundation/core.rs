use crate::foundation::error::{FrameletError, FrameletResult};

/// Stable identity of a worklet across compile, transport, and frame drive.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct WorkletId(pub String);

impl WorkletId {
    /// Build an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for WorkletId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of a worklet value, as declared for parameters and return values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    /// 64-bit float.
    Number,
    /// Boolean.
    Boolean,
    /// UTF-8 string.
    #[serde(rename = "string")]
    Str,
    /// Ordered list of values.
    List,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Str => "string",
            Self::List => "list",
        };
        f.write_str(s)
    }
}

/// A declared worklet parameter: name plus expected kind.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParamSpec {
    /// Parameter name referenced by `variable` nodes.
    pub name: String,
    /// Expected value kind supplied at evaluation time.
    pub kind: ValueKind,
}

impl ParamSpec {
    /// Build a parameter spec.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A runtime worklet value.
///
/// Serialized untagged, so frame-binding maps and envelope config read as
/// plain JSON (`2.0`, `"hello"`, `["a", "b"]`).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// 64-bit float.
    Number(f64),
    /// UTF-8 string.
    Str(String),
    /// Ordered list of values.
    List(Vec<Value>),
}

impl Value {
    /// Kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Boolean,
            Self::Number(_) => ValueKind::Number,
            Self::Str(_) => ValueKind::Str,
            Self::List(_) => ValueKind::List,
        }
    }

    /// Extract a number or fail with a type-mismatch evaluation error.
    pub fn as_number(&self) -> FrameletResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            other => Err(type_mismatch(ValueKind::Number, other)),
        }
    }

    /// Extract a boolean or fail with a type-mismatch evaluation error.
    pub fn as_bool(&self) -> FrameletResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(type_mismatch(ValueKind::Boolean, other)),
        }
    }

    /// Extract a string slice or fail with a type-mismatch evaluation error.
    pub fn as_str(&self) -> FrameletResult<&str> {
        match self {
            Self::Str(s) => Ok(s),
            other => Err(type_mismatch(ValueKind::Str, other)),
        }
    }

    /// Extract a list slice or fail with a type-mismatch evaluation error.
    pub fn as_list(&self) -> FrameletResult<&[Value]> {
        match self {
            Self::List(items) => Ok(items),
            other => Err(type_mismatch(ValueKind::List, other)),
        }
    }

    /// Structural equality with numeric equality on numbers.
    ///
    /// Values of differing kinds compare unequal rather than erroring.
    pub fn value_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.value_eq(y))
            }
            _ => false,
        }
    }
}

fn type_mismatch(expected: ValueKind, got: &Value) -> FrameletError {
    FrameletError::evaluation(format!("type mismatch: expected {expected}, got {}", got.kind()))
}
