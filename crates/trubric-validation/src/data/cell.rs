//! Scalar cell values and their inferred column types.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One scalar in a [`Table`](super::Table).
///
/// `Int` and `Float` compare equal when numerically equal, so a model
/// predicting `1.0` matches a label of `1`. `Null` and `NaN` are missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Column type inferred from the non-null cells it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Bool,
    Int,
    Float,
    Str,
    /// Mixed kinds.
    Object,
    /// Only nulls.
    Empty,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Numeric view; booleans count as 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(b) => Some(f64::from(u8::from(*b))),
            Self::Null | Self::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Type of this single cell, `None` for `Null`.
    pub fn dtype(&self) -> Option<DType> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(DType::Bool),
            Self::Int(_) => Some(DType::Int),
            Self::Float(_) => Some(DType::Float),
            Self::Str(_) => Some(DType::Str),
        }
    }

    /// Grouping key for category splits, prefixed with the cell kind so
    /// `"1"`, `1` and `true` stay apart. Integral floats join the equal
    /// integer. Missing values have none.
    pub fn group_key(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Float(f) if f.is_nan() => None,
            Self::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => {
                Some(format!("num:{}", *f as i64))
            }
            Self::Float(f) => Some(format!("num:{f}")),
            Self::Int(i) => Some(format!("num:{i}")),
            Self::Bool(b) => Some(format!("bool:{b}")),
            Self::Str(s) => Some(format!("str:{s}")),
        }
    }

    /// Total order used to break ties between class labels:
    /// missing < bool < numbers < strings.
    pub fn label_cmp(&self, other: &Self) -> Ordering {
        fn rank(c: &Cell) -> u8 {
            match c {
                _ if c.is_missing() => 0,
                Cell::Bool(_) => 1,
                Cell::Int(_) | Cell::Float(_) => 2,
                _ => 3,
            }
        }
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            _ => match (self.numeric(), other.numeric()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => rank(self).cmp(&rank(other)),
            },
        }
    }

    fn numeric(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    /// JSON value of this cell. `NaN` becomes `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::from(*b),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::Str(s) => Value::from(s.as_str()),
        }
    }

    /// Cell from a JSON scalar. Arrays and objects are not cells.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            }),
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_)) => {
                self.numeric() == other.numeric() && self.numeric().is_some()
            }
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Cell {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Cell {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

/// Infer a column type the way a dataframe would: integers mixed with
/// floats widen to float, nulls are ignored, anything else mixed is object.
pub fn infer_dtype<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> DType {
    let mut inferred: Option<DType> = None;
    for cell in cells {
        let Some(kind) = cell.dtype() else { continue };
        inferred = Some(match (inferred, kind) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(DType::Int), DType::Float) | (Some(DType::Float), DType::Int) => DType::Float,
            _ => return DType::Object,
        });
    }
    inferred.unwrap_or(DType::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_cells_compare_across_kinds() {
        assert_eq!(Cell::Int(1), Cell::Float(1.0));
        assert_ne!(Cell::Int(1), Cell::Str("1".into()));
        assert_ne!(Cell::Float(f64::NAN), Cell::Float(f64::NAN));
        assert_ne!(Cell::Bool(true), Cell::Int(1));
    }

    #[test]
    fn missing_values_have_no_group() {
        assert!(Cell::Null.group_key().is_none());
        assert!(Cell::Float(f64::NAN).group_key().is_none());
        assert_eq!(Cell::Float(3.0).group_key(), Cell::Int(3).group_key());
    }

    #[test]
    fn group_keys_keep_kinds_apart() {
        let keys = [
            Cell::Int(1).group_key(),
            Cell::Str("1".into()).group_key(),
            Cell::Bool(true).group_key(),
        ];
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[0], keys[2]);
        assert_ne!(keys[1], keys[2]);
        assert_eq!(Cell::Float(1.5).group_key().as_deref(), Some("num:1.5"));
    }

    #[test]
    fn dtype_inference_widens_ints() {
        let cells = [Cell::Int(1), Cell::Null, Cell::Float(2.5)];
        assert_eq!(infer_dtype(&cells), DType::Float);
        assert_eq!(infer_dtype(&[Cell::Int(1), Cell::from("a")]), DType::Object);
        assert_eq!(infer_dtype(&[Cell::Null]), DType::Empty);
    }

    #[test]
    fn untagged_json_round_trip() {
        let cells: Vec<Cell> = serde_json::from_str(r#"[null, true, 3, 2.5, "C"]"#).unwrap();
        assert_eq!(
            cells,
            vec![
                Cell::Null,
                Cell::Bool(true),
                Cell::Int(3),
                Cell::Float(2.5),
                Cell::from("C")
            ]
        );
        assert_eq!(Cell::Float(f64::NAN).to_json(), Value::Null);
    }
}
