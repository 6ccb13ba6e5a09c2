use crate::val::{ColType, Val};
use chrono::NaiveDateTime;
use kelvin_base::Result;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;

// When doing columnar evaluation each column holds one of these: a
// homogeneous vector of nullable cells. The variant is the column's
// declared type, so there is nothing to check per cell once built.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Vals {
    Ints(Vec<Option<i64>>),
    Flos(Vec<Option<OrderedFloat<f64>>>),
    Strs(Vec<Option<String>>),
    Times(Vec<Option<NaiveDateTime>>),
}

impl Vals {
    pub fn empty(ty: ColType) -> Vals {
        Vals::with_capacity(ty, 0)
    }

    pub fn with_capacity(ty: ColType, n: usize) -> Vals {
        match ty {
            ColType::Int => Vals::Ints(Vec::with_capacity(n)),
            ColType::Flo => Vals::Flos(Vec::with_capacity(n)),
            ColType::Str => Vals::Strs(Vec::with_capacity(n)),
            ColType::Time => Vals::Times(Vec::with_capacity(n)),
        }
    }

    pub fn ty(&self) -> ColType {
        match self {
            Vals::Ints(_) => ColType::Int,
            Vals::Flos(_) => ColType::Flo,
            Vals::Strs(_) => ColType::Str,
            Vals::Times(_) => ColType::Time,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Vals::Ints(v) => v.len(),
            Vals::Flos(v) => v.len(),
            Vals::Strs(v) => v.len(),
            Vals::Times(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Appends an already-coerced value. Callers go through Col::push,
    // which coerces first, so a mismatch here is a bug.
    fn push_coerced(&mut self, v: Val) {
        match (self, v) {
            (Vals::Ints(vs), Val::Int(i)) => vs.push(Some(i)),
            (Vals::Flos(vs), Val::Flo(f)) => vs.push(Some(f)),
            (Vals::Strs(vs), Val::Str(s)) => vs.push(Some(s)),
            (Vals::Times(vs), Val::Time(t)) => vs.push(Some(t)),
            (vs, Val::Null) => vs.push_null(),
            (vs, v) => unreachable!("coerced {:?} does not fit {:?}", v, vs.ty()),
        }
    }

    fn push_null(&mut self) {
        match self {
            Vals::Ints(v) => v.push(None),
            Vals::Flos(v) => v.push(None),
            Vals::Strs(v) => v.push(None),
            Vals::Times(v) => v.push(None),
        }
    }

    fn get(&self, i: usize) -> Val {
        match self {
            Vals::Ints(v) => v[i].map_or(Val::Null, Val::Int),
            Vals::Flos(v) => v[i].map_or(Val::Null, Val::Flo),
            Vals::Strs(v) => v[i].clone().map_or(Val::Null, Val::Str),
            Vals::Times(v) => v[i].map_or(Val::Null, Val::Time),
        }
    }

    fn is_null(&self, i: usize) -> bool {
        match self {
            Vals::Ints(v) => v[i].is_none(),
            Vals::Flos(v) => v[i].is_none(),
            Vals::Strs(v) => v[i].is_none(),
            Vals::Times(v) => v[i].is_none(),
        }
    }

    fn cmp_rows(&self, i: usize, j: usize) -> Ordering {
        match self {
            Vals::Ints(v) => v[i].cmp(&v[j]),
            Vals::Flos(v) => v[i].cmp(&v[j]),
            Vals::Strs(v) => v[i].cmp(&v[j]),
            Vals::Times(v) => v[i].cmp(&v[j]),
        }
    }

    fn take(&self, idx: &[usize]) -> Vals {
        fn gather<T: Clone>(v: &[Option<T>], idx: &[usize]) -> Vec<Option<T>> {
            idx.iter().map(|&i| v[i].clone()).collect()
        }
        match self {
            Vals::Ints(v) => Vals::Ints(gather(v, idx)),
            Vals::Flos(v) => Vals::Flos(gather(v, idx)),
            Vals::Strs(v) => Vals::Strs(gather(v, idx)),
            Vals::Times(v) => Vals::Times(gather(v, idx)),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Col {
    name: String,
    vals: Vals,
}

impl Col {
    /// Builds a column of type `ty`, coercing every value to it.
    pub fn new(name: impl Into<String>, ty: ColType, vals: impl IntoIterator<Item = Val>) -> Result<Col> {
        let mut col = Col::empty(name, ty);
        for v in vals {
            col.push(v)?;
        }
        Ok(col)
    }

    pub fn empty(name: impl Into<String>, ty: ColType) -> Col {
        Col {
            name: name.into(),
            vals: Vals::empty(ty),
        }
    }

    pub fn push(&mut self, v: Val) -> Result<()> {
        let v = v.coerce(self.ty(), &self.name)?;
        self.vals.push_coerced(v);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> ColType {
        self.vals.ty()
    }

    pub fn vals(&self) -> &Vals {
        &self.vals
    }

    pub fn len(&self) -> usize {
        self.vals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }

    pub fn get(&self, i: usize) -> Val {
        self.vals.get(i)
    }

    pub fn is_null(&self, i: usize) -> bool {
        self.vals.is_null(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = Val> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }

    /// Total order between two rows of this column; null first.
    pub fn cmp_rows(&self, i: usize, j: usize) -> Ordering {
        self.vals.cmp_rows(i, j)
    }

    pub fn take(&self, idx: &[usize]) -> Col {
        Col {
            name: self.name.clone(),
            vals: self.vals.take(idx),
        }
    }
}
