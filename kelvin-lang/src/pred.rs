// Row predicates. A predicate is evaluated column-at-a-time into a pair of
// bitmaps: `known` (the predicate has a definite value for the row) and
// `truth` (that definite value is true). A comparison against a null cell is
// unknown, and unknown survives NOT, so `p` and `NOT p` never both keep a
// row whose inputs are null. `truth` is always a subset of `known`.

use crate::{
    col::Col,
    tab::Tab,
    val::{ColType, Val},
};
use kelvin_base::{type_mismatch, Bitmap, Result};
use std::cmp::Ordering;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn holds(&self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Le => ord != Ordering::Greater,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Pred {
    Cmp { col: String, op: CmpOp, val: Val },
    And(Box<Pred>, Box<Pred>),
    Or(Box<Pred>, Box<Pred>),
    Not(Box<Pred>),
}

impl Pred {
    pub fn cmp(col: impl Into<String>, op: CmpOp, val: impl Into<Val>) -> Pred {
        Pred::Cmp {
            col: col.into(),
            op,
            val: val.into(),
        }
    }

    /// `lo <= col AND col <= hi`
    pub fn between(col: &str, lo: impl Into<Val>, hi: impl Into<Val>) -> Pred {
        Pred::cmp(col, CmpOp::Ge, lo).and(Pred::cmp(col, CmpOp::Le, hi))
    }

    pub fn and(self, other: Pred) -> Pred {
        Pred::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Pred) -> Pred {
        Pred::Or(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Pred {
        Pred::Not(Box::new(self))
    }

    /// Rows for which the predicate is definitely true.
    pub fn select(&self, tab: &Tab) -> Result<Bitmap> {
        Ok(self.eval(tab)?.truth)
    }

    fn eval(&self, tab: &Tab) -> Result<Truth> {
        match self {
            Pred::Cmp { col, op, val } => {
                let col = tab.col_for("filter", col)?;
                eval_cmp(col, *op, val)
            }
            Pred::And(a, b) => {
                let (a, b) = (a.eval(tab)?, b.eval(tab)?);
                // Definitely false on either side decides the row.
                let mut known = a.known.clone();
                known.intersect(&b.known);
                known.union(&a.falsity());
                known.union(&b.falsity());
                let mut truth = a.truth;
                truth.intersect(&b.truth);
                Ok(Truth { known, truth })
            }
            Pred::Or(a, b) => {
                let (a, b) = (a.eval(tab)?, b.eval(tab)?);
                // Definitely true on either side decides the row.
                let mut known = a.known.clone();
                known.intersect(&b.known);
                known.union(&a.truth);
                known.union(&b.truth);
                let mut truth = a.truth;
                truth.union(&b.truth);
                Ok(Truth { known, truth })
            }
            Pred::Not(a) => {
                let a = a.eval(tab)?;
                let truth = a.falsity();
                Ok(Truth {
                    known: a.known,
                    truth,
                })
            }
        }
    }
}

impl fmt::Display for Pred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pred::Cmp { col, op, val } => write!(f, "{col} {} {val}", op.symbol()),
            Pred::And(a, b) => write!(f, "({a} AND {b})"),
            Pred::Or(a, b) => write!(f, "({a} OR {b})"),
            Pred::Not(a) => write!(f, "NOT {a}"),
        }
    }
}

struct Truth {
    known: Bitmap,
    truth: Bitmap,
}

impl Truth {
    fn falsity(&self) -> Bitmap {
        let mut f = self.known.clone();
        f.subtract(&self.truth);
        f
    }
}

fn eval_cmp(col: &Col, op: CmpOp, val: &Val) -> Result<Truth> {
    let n = col.len();
    if val.is_null() {
        // Comparing with null is never known.
        return Ok(Truth {
            known: Bitmap::new(n),
            truth: Bitmap::new(n),
        });
    }
    let (ty, lit_ty) = (col.ty(), val.ty());
    let numeric = ty.is_numeric() && lit_ty.is_some_and(|t| t.is_numeric());
    let compatible = numeric || lit_ty == Some(ty) || (ty == ColType::Time && lit_ty == Some(ColType::Str));
    if !compatible {
        return Err(type_mismatch(
            "filter",
            col.name(),
            format!("cannot compare {ty} column with literal {val}"),
        ));
    }
    // Numeric comparisons happen in f64 so an int column can be compared
    // with a fractional bound.
    let lit = if numeric {
        Val::flo(val.as_f64().unwrap_or_default())
    } else {
        val.clone().coerce(ty, col.name())?
    };
    let mut known = Bitmap::new(n);
    let mut truth = Bitmap::new(n);
    for (i, v) in col.iter().enumerate() {
        if v.is_null() {
            continue;
        }
        let v = match (numeric, v.as_f64()) {
            (true, Some(f)) => Val::flo(f),
            _ => v,
        };
        known.set(i, true);
        if op.holds(v.cmp(&lit)) {
            truth.set(i, true);
        }
    }
    Ok(Truth { known, truth })
}
