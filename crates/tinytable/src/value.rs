use crate::error::{TableError, TableResult};
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single cell value.
///
/// Integers and floats compare (and hash) numerically, so `Int(1) == Float(1.0)`. Text and
/// booleans only ever equal values of the same kind. `Null` is the missing-value marker.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Int,
    Float,
    Text,
    Bool,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// Returns the integer an integral, in-range float is equal to.
fn float_as_int(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

fn cmp_int_float(a: i64, b: f64) -> Option<Ordering> {
    match float_as_int(b) {
        Some(b) => Some(a.cmp(&b)),
        None => (a as f64).partial_cmp(&b),
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::Bool(_) => ValueKind::Bool,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Orders two values of the same kind. Numbers compare across `Int`/`Float`.
    ///
    /// Returns `None` for nulls, NaN and any pair of different kinds.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => cmp_int_float(*a, *b),
            (Value::Float(a), Value::Int(b)) => cmp_int_float(*b, *a).map(Ordering::reverse),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Converts the value to another kind. Nulls stay null.
    pub fn cast(&self, kind: ValueKind) -> TableResult<Value> {
        let fail = || {
            TableError::invalid(format!(
                "cannot cast {} value {self} to {kind}",
                self.kind()
            ))
        };
        if self.is_null() {
            return Ok(Value::Null);
        }
        let out = match kind {
            ValueKind::Null => Value::Null,
            ValueKind::Text => match self {
                Value::Text(s) => Value::Text(s.clone()),
                other => Value::Text(other.to_string()),
            },
            ValueKind::Int => match self {
                Value::Int(v) => Value::Int(*v),
                Value::Float(v) if v.is_finite() => Value::Int(v.trunc() as i64),
                Value::Bool(b) => Value::Int(i64::from(*b)),
                Value::Text(s) => Value::Int(s.trim().parse::<i64>().map_err(|_| fail())?),
                _ => return Err(fail()),
            },
            ValueKind::Float => match self {
                Value::Int(v) => Value::Float(*v as f64),
                Value::Float(v) => Value::Float(*v),
                Value::Bool(b) => Value::Float(if *b { 1.0 } else { 0.0 }),
                Value::Text(s) => Value::Float(s.trim().parse::<f64>().map_err(|_| fail())?),
                Value::Null => Value::Null,
            },
            ValueKind::Bool => match self {
                Value::Bool(b) => Value::Bool(*b),
                Value::Int(v) => Value::Bool(*v != 0),
                Value::Float(v) => Value::Bool(*v != 0.0),
                Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    _ => return Err(fail()),
                },
                Value::Null => Value::Null,
            },
        };
        Ok(out)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => OrderedFloat(*a) == OrderedFloat(*b),
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                float_as_int(*b) == Some(*a)
            }
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Int(v) => {
                1u8.hash(state);
                v.hash(state);
            }
            Value::Float(v) => match float_as_int(*v) {
                Some(i) => {
                    1u8.hash(state);
                    i.hash(state);
                }
                None => {
                    2u8.hash(state);
                    OrderedFloat(*v).hash(state);
                }
            },
            Value::Text(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            Value::Bool(b) => {
                4u8.hash(state);
                b.hash(state);
            }
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Text(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        match i64::try_from(value) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::Float(value as f64),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// An application-assigned row identifier: an ordered tuple of values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Label(Vec<Value>);

impl Label {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        if self.0.len() == 1 {
            f.write_str(",")?;
        }
        f.write_str(")")
    }
}

impl From<Vec<Value>> for Label {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl From<Value> for Label {
    fn from(value: Value) -> Self {
        Self(vec![value])
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self(vec![value.into()])
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Self(vec![value.into()])
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Self(vec![value.into()])
    }
}

impl From<i32> for Label {
    fn from(value: i32) -> Self {
        Self(vec![value.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Label {
    fn from((a, b): (A, B)) -> Self {
        Self(vec![a.into(), b.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> From<(A, B, C)> for Label {
    fn from((a, b, c): (A, B, C)) -> Self {
        Self(vec![a.into(), b.into(), c.into()])
    }
}

/// An insertion-ordered mapping from column name to a single value.
///
/// Used for row snapshots, partial row edits, per-column fill values and aggregation results.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueMap {
    entries: Vec<(String, Value)>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts or replaces `name`. Replacing keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl std::ops::Index<&str> for ValueMap {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        match self.get(name) {
            Some(v) => v,
            None => panic!("no entry named {name:?}"),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Elementwise arithmetic supported by [`crate::Column::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    /// True division; always produces a float.
    Div,
    /// Division rounded toward negative infinity.
    FloorDiv,
    /// Remainder with the sign of the divisor.
    Rem,
    Pow,
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::FloorDiv => "//",
            ArithOp::Rem => "%",
            ArithOp::Pow => "**",
        };
        f.write_str(symbol)
    }
}

fn floor_div_i64(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

fn floor_rem_i64(a: i64, b: i64) -> Option<i64> {
    let r = a.checked_rem(b)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        Some(r + b)
    } else {
        Some(r)
    }
}

fn apply_int(op: ArithOp, a: i64, b: i64) -> Option<Value> {
    let out = match op {
        ArithOp::Add => Value::Int(a.checked_add(b)?),
        ArithOp::Sub => Value::Int(a.checked_sub(b)?),
        ArithOp::Mul => Value::Int(a.checked_mul(b)?),
        ArithOp::Div => {
            if b == 0 {
                return None;
            }
            Value::Float(a as f64 / b as f64)
        }
        ArithOp::FloorDiv => Value::Int(floor_div_i64(a, b)?),
        ArithOp::Rem => Value::Int(floor_rem_i64(a, b)?),
        ArithOp::Pow => match u32::try_from(b) {
            Ok(exp) => Value::Int(a.checked_pow(exp)?),
            Err(_) if b < 0 => {
                if a == 0 {
                    return None;
                }
                Value::Float((a as f64).powf(b as f64))
            }
            Err(_) => return None,
        },
    };
    Some(out)
}

fn apply_float(op: ArithOp, a: f64, b: f64) -> Option<Value> {
    let zero_divisor = b == 0.0;
    let out = match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div if zero_divisor => return None,
        ArithOp::Div => a / b,
        ArithOp::FloorDiv if zero_divisor => return None,
        ArithOp::FloorDiv => (a / b).floor(),
        ArithOp::Rem if zero_divisor => return None,
        ArithOp::Rem => a - b * (a / b).floor(),
        ArithOp::Pow => a.powf(b),
    };
    Some(Value::Float(out))
}

/// Applies `lhs op rhs`. Nulls propagate; anything non-numeric is an error.
pub(crate) fn arithmetic(op: ArithOp, lhs: &Value, rhs: &Value) -> TableResult<Value> {
    let result = match (lhs, rhs) {
        (Value::Null, _) | (_, Value::Null) => return Ok(Value::Null),
        (Value::Int(a), Value::Int(b)) => apply_int(op, *a, *b),
        (a, b) if a.is_numeric() && b.is_numeric() => {
            // Both are numbers and at least one is a float.
            apply_float(op, a.as_f64().unwrap_or_default(), b.as_f64().unwrap_or_default())
        }
        (a, b) => {
            return Err(TableError::invalid(format!(
                "unsupported operand kinds for {op}: {} and {}",
                a.kind(),
                b.kind()
            )))
        }
    };
    result.ok_or_else(|| {
        TableError::invalid(format!(
            "{lhs} {op} {rhs} is undefined (division by zero or overflow)"
        ))
    })
}
