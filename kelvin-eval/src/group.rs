// Grouped aggregation.
//
// Rows are hash-partitioned on the tuple of group-key values. Partitions are
// numbered in the order they are first seen, and every partition carries one
// accumulator per aggregate spec. Because accumulators merge, a table can be
// partitioned in pieces (say, one piece per thread) and the pieces combined
// with `Partials::merge` before finishing; the result is the same as
// partitioning the whole table at once.

use crate::agg::{Acc, AggSpec};
use kelvin_base::{err, FastMap, Result};
use kelvin_lang::{Col, ColType, SortOrder, Tab, Val};
use std::cmp::Ordering;
use tracing::debug;

const OP: &str = "group_aggregate";

/// Output ordering for grouped results. Ties are broken by the group key.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct OrderBy {
    pub col: String,
    pub order: SortOrder,
}

impl OrderBy {
    pub fn asc(col: impl Into<String>) -> OrderBy {
        OrderBy {
            col: col.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(col: impl Into<String>) -> OrderBy {
        OrderBy {
            col: col.into(),
            order: SortOrder::Desc,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Partials {
    key_cols: Vec<(String, ColType)>,
    specs: Vec<(AggSpec, ColType)>,
    index: FastMap<Vec<Val>, usize>,
    keys: Vec<Vec<Val>>,
    accs: Vec<Vec<Acc>>,
}

impl Partials {
    /// Partitions `tab` by `keys` and accumulates `specs` per partition.
    pub fn build(tab: &Tab, keys: &[&str], specs: &[AggSpec]) -> Result<Partials> {
        let key_refs = keys
            .iter()
            .map(|k| tab.col_for(OP, k))
            .collect::<Result<Vec<&Col>>>()?;
        let mut src_refs = Vec::with_capacity(specs.len());
        let mut typed_specs = Vec::with_capacity(specs.len());
        for spec in specs {
            let src = tab.col_for(OP, &spec.source)?;
            // Reject e.g. avg over strings before touching any rows.
            spec.output_type(src.ty())?;
            src_refs.push(src);
            typed_specs.push((spec.clone(), src.ty()));
        }

        let mut parts = Partials {
            key_cols: key_refs
                .iter()
                .map(|c| (c.name().to_string(), c.ty()))
                .collect(),
            specs: typed_specs,
            index: FastMap::default(),
            keys: Vec::new(),
            accs: Vec::new(),
        };
        for row in 0..tab.rows() {
            let key: Vec<Val> = key_refs.iter().map(|c| c.get(row)).collect();
            let p = parts.partition_for(key);
            for (acc, src) in parts.accs[p].iter_mut().zip(src_refs.iter()) {
                acc.push(&src.get(row));
            }
        }
        Ok(parts)
    }

    fn partition_for(&mut self, key: Vec<Val>) -> usize {
        if let Some(&p) = self.index.get(&key) {
            return p;
        }
        let p = self.keys.len();
        self.index.insert(key.clone(), p);
        self.keys.push(key);
        self.accs.push(vec![Acc::default(); self.specs.len()]);
        p
    }

    pub fn partitions(&self) -> usize {
        self.keys.len()
    }

    /// Folds `other` into `self`. Both must have been built with the same
    /// keys and specs. Partitions new to `self` are appended in the order
    /// `other` discovered them.
    pub fn merge(mut self, other: Partials) -> Result<Partials> {
        if self.key_cols != other.key_cols || self.specs != other.specs {
            return Err(err("cannot merge partials built with different keys or specs"));
        }
        for (key, accs) in other.keys.into_iter().zip(other.accs) {
            let p = self.partition_for(key);
            for (mine, theirs) in self.accs[p].iter_mut().zip(accs.iter()) {
                mine.merge(theirs);
            }
        }
        Ok(self)
    }

    /// Materializes one row per partition: key columns, then one column per
    /// spec, in partition discovery order.
    pub fn finish(self) -> Result<Tab> {
        let mut cols = Vec::with_capacity(self.key_cols.len() + self.specs.len());
        for (i, (name, ty)) in self.key_cols.iter().enumerate() {
            cols.push(Col::new(name.as_str(), *ty, self.keys.iter().map(|k| k[i].clone()))?);
        }
        for (j, (spec, src_ty)) in self.specs.iter().enumerate() {
            let mut col = Col::empty(spec.output.as_str(), spec.output_type(*src_ty)?);
            for accs in self.accs.iter() {
                col.push(accs[j].finish(OP, spec, *src_ty)?)?;
            }
            cols.push(col);
        }
        Tab::new(cols)
    }
}

/// One row per distinct `keys` tuple in `tab`, with the key columns followed
/// by one column per spec. Without `order_by`, rows come out in the order
/// their key was first seen.
pub fn group_aggregate(
    tab: &Tab,
    keys: &[&str],
    specs: &[AggSpec],
    order_by: Option<&OrderBy>,
) -> Result<Tab> {
    let parts = Partials::build(tab, keys, specs)?;
    debug!(
        keys = ?keys,
        rows = tab.rows(),
        partitions = parts.partitions(),
        "group_aggregate"
    );
    let out = parts.finish()?;
    match order_by {
        None => Ok(out),
        Some(ob) => sort_with_key_ties(&out, ob, keys.len()),
    }
}

fn sort_with_key_ties(out: &Tab, ob: &OrderBy, nkeys: usize) -> Result<Tab> {
    let by = out.col_for(OP, &ob.col)?;
    let key_cols = &out.cols()[..nkeys];
    let mut idx: Vec<usize> = (0..out.rows()).collect();
    idx.sort_by(|&a, &b| {
        ob.order.apply(by.cmp_rows(a, b)).then_with(|| {
            key_cols
                .iter()
                .map(|c| c.cmp_rows(a, b))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        })
    });
    Ok(out.take(&idx))
}
