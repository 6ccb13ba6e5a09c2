use chrono::{NaiveDate, NaiveDateTime};
use kelvin_base::{type_mismatch, Result};
use ordered_float::OrderedFloat;
use std::fmt;
use std::str::FromStr;

// The four scalar types a column can declare. Every Val other than Null
// belongs to exactly one of them.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ColType {
    Int,
    Flo,
    Str,
    Time,
}

impl ColType {
    pub fn name(&self) -> &'static str {
        match self {
            ColType::Int => "int",
            ColType::Flo => "float",
            ColType::Str => "string",
            ColType::Time => "timestamp",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColType::Int | ColType::Flo)
    }
}

impl fmt::Display for ColType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" | "long" => Ok(ColType::Int),
            "float" | "double" | "flo" => Ok(ColType::Flo),
            "string" | "str" => Ok(ColType::Str),
            "timestamp" | "time" => Ok(ColType::Time),
            other => Err(format!("unknown column type `{other}`")),
        }
    }
}

// A single cell. Null orders before every other value, which gives
// nulls-first ascending and nulls-last descending sorts for free.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Val {
    Null,
    Int(i64),
    Flo(OrderedFloat<f64>),
    Str(String),
    Time(NaiveDateTime),
}

impl Val {
    pub fn flo(f: f64) -> Val {
        Val::Flo(OrderedFloat(f))
    }

    pub fn str(s: impl Into<String>) -> Val {
        Val::Str(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Val::Null)
    }

    pub fn ty(&self) -> Option<ColType> {
        match self {
            Val::Null => None,
            Val::Int(_) => Some(ColType::Int),
            Val::Flo(_) => Some(ColType::Flo),
            Val::Str(_) => Some(ColType::Str),
            Val::Time(_) => Some(ColType::Time),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Val::Int(i) => Some(*i as f64),
            Val::Flo(f) => Some(f.0),
            _ => None,
        }
    }

    /// Converts this value to `ty`, or explains why it can't. `column` is
    /// only used to label the error.
    pub fn coerce(self, ty: ColType, column: &str) -> Result<Val> {
        let fail = |v: &Val| {
            type_mismatch(
                "coerce",
                column,
                format!("cannot convert {v} ({}) to {ty}", v.type_name()),
            )
        };
        match (self, ty) {
            (Val::Null, _) => Ok(Val::Null),
            (v @ Val::Int(_), ColType::Int)
            | (v @ Val::Flo(_), ColType::Flo)
            | (v @ Val::Str(_), ColType::Str)
            | (v @ Val::Time(_), ColType::Time) => Ok(v),
            (Val::Int(i), ColType::Flo) => Ok(Val::flo(i as f64)),
            (Val::Flo(f), ColType::Int) => {
                if f.0.fract() == 0.0 && f.0.abs() < i64::MAX as f64 {
                    Ok(Val::Int(f.0 as i64))
                } else {
                    Err(fail(&Val::Flo(f)))
                }
            }
            (Val::Str(s), ColType::Int) => match s.trim().parse::<i64>() {
                Ok(i) => Ok(Val::Int(i)),
                Err(_) => Err(fail(&Val::Str(s))),
            },
            (Val::Str(s), ColType::Flo) => match s.trim().parse::<f64>() {
                Ok(f) => Ok(Val::flo(f)),
                Err(_) => Err(fail(&Val::Str(s))),
            },
            (Val::Str(s), ColType::Time) => match parse_timestamp(&s) {
                Some(t) => Ok(Val::Time(t)),
                None => Err(fail(&Val::Str(s))),
            },
            (v, ColType::Str) => Ok(Val::Str(v.to_string())),
            (v, _) => Err(fail(&v)),
        }
    }

    fn type_name(&self) -> &'static str {
        self.ty().map_or("null", |t| t.name())
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Null => Ok(()),
            Val::Int(i) => write!(f, "{i}"),
            Val::Flo(x) => f.write_str(&fmt_flo(x.0)),
            Val::Str(s) => f.write_str(s),
            Val::Time(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

impl From<i64> for Val {
    fn from(i: i64) -> Val {
        Val::Int(i)
    }
}
impl From<f64> for Val {
    fn from(f: f64) -> Val {
        Val::flo(f)
    }
}
impl From<&str> for Val {
    fn from(s: &str) -> Val {
        Val::str(s)
    }
}
impl From<String> for Val {
    fn from(s: String) -> Val {
        Val::Str(s)
    }
}
impl From<NaiveDateTime> for Val {
    fn from(t: NaiveDateTime) -> Val {
        Val::Time(t)
    }
}
impl<T: Into<Val>> From<Option<T>> for Val {
    fn from(o: Option<T>) -> Val {
        o.map_or(Val::Null, Into::into)
    }
}

/// Renders a float the way the sink and previews show it: integral values
/// keep one decimal place, everything else uses the shortest string that
/// parses back to the same value.
pub fn fmt_flo(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
