use crate::round::round_half_up;
use kelvin_base::{err, type_mismatch, EngineError, Error, Result};
use kelvin_lang::{ColType, Val};

/// Reduction applied to one column within a partition.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AggFn {
    /// Number of non-null values.
    Count,
    /// Sum of non-null values; null if there are none.
    Sum,
    /// Mean of non-null values; an error if there are none.
    Avg,
    Min,
    Max,
}

impl AggFn {
    pub fn name(&self) -> &'static str {
        match self {
            AggFn::Count => "count",
            AggFn::Sum => "sum",
            AggFn::Avg => "avg",
            AggFn::Min => "min",
            AggFn::Max => "max",
        }
    }
}

/// One aggregate output column: `output = round(func(source), scale)`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct AggSpec {
    pub output: String,
    pub source: String,
    pub func: AggFn,
    /// Decimal places kept in float results; `None` keeps full precision.
    pub scale: Option<u32>,
}

impl AggSpec {
    pub fn new(output: impl Into<String>, source: impl Into<String>, func: AggFn) -> AggSpec {
        AggSpec {
            output: output.into(),
            source: source.into(),
            func,
            scale: None,
        }
    }

    pub fn avg(output: impl Into<String>, source: impl Into<String>) -> AggSpec {
        AggSpec::new(output, source, AggFn::Avg)
    }

    pub fn sum(output: impl Into<String>, source: impl Into<String>) -> AggSpec {
        AggSpec::new(output, source, AggFn::Sum)
    }

    pub fn count(output: impl Into<String>, source: impl Into<String>) -> AggSpec {
        AggSpec::new(output, source, AggFn::Count)
    }

    pub fn rounded(mut self, scale: u32) -> AggSpec {
        self.scale = Some(scale);
        self
    }

    /// The type of the output column given the type of the source column.
    pub fn output_type(&self, source: ColType) -> Result<ColType> {
        match (self.func, source) {
            (AggFn::Count, _) => Ok(ColType::Int),
            (AggFn::Avg, t) if t.is_numeric() => Ok(ColType::Flo),
            (AggFn::Sum, t) if t.is_numeric() => Ok(t),
            (AggFn::Min | AggFn::Max, t) => Ok(t),
            (f, t) => Err(type_mismatch(
                "aggregate",
                self.source.as_str(),
                format!("{} is not defined over {t} values", f.name()),
            )),
        }
    }
}

// Running state for one (partition, spec) pair. Every field is a
// commutative monoid, so two accumulators built over disjoint row sets can
// be merged into the one that would have been built over their union.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Acc {
    count: u64,
    int_sum: i128,
    flo_sum: f64,
    min: Option<Val>,
    max: Option<Val>,
}

impl Acc {
    pub fn push(&mut self, v: &Val) {
        match v {
            Val::Null => return,
            Val::Int(i) => {
                self.int_sum += *i as i128;
                self.flo_sum += *i as f64;
            }
            Val::Flo(f) => self.flo_sum += f.0,
            Val::Str(_) | Val::Time(_) => (),
        }
        self.count += 1;
        if self.min.as_ref().map_or(true, |m| v < m) {
            self.min = Some(v.clone());
        }
        if self.max.as_ref().map_or(true, |m| v > m) {
            self.max = Some(v.clone());
        }
    }

    pub fn merge(&mut self, other: &Acc) {
        self.count += other.count;
        self.int_sum += other.int_sum;
        self.flo_sum += other.flo_sum;
        for v in other.min.iter() {
            if self.min.as_ref().map_or(true, |m| v < m) {
                self.min = Some(v.clone());
            }
        }
        for v in other.max.iter() {
            if self.max.as_ref().map_or(true, |m| v > m) {
                self.max = Some(v.clone());
            }
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Produces the final value for `spec`, whose source column has type
    /// `source`. `op` names the calling operator in errors.
    pub fn finish(&self, op: &'static str, spec: &AggSpec, source: ColType) -> Result<Val> {
        let val = match spec.func {
            AggFn::Count => Val::Int(self.count as i64),
            AggFn::Sum if self.count == 0 => Val::Null,
            AggFn::Sum => match source {
                ColType::Int => Val::Int(i64::try_from(self.int_sum).map_err(|_| {
                    err(format!("{op}: sum of `{}` overflows a 64-bit integer", spec.source))
                })?),
                _ => Val::flo(self.flo_sum),
            },
            AggFn::Avg if self.count == 0 => {
                return Err(Error::new(EngineError::EmptyAggregation {
                    op,
                    column: spec.source.clone(),
                }))
            }
            AggFn::Avg => Val::flo(self.flo_sum / self.count as f64),
            AggFn::Min => self.min.clone().unwrap_or(Val::Null),
            AggFn::Max => self.max.clone().unwrap_or(Val::Null),
        };
        Ok(match (val, spec.scale) {
            (Val::Flo(f), Some(scale)) => Val::flo(round_half_up(f.0, scale)),
            (other, _) => other,
        })
    }
}
