// Pivot: a sparse (row key, column key) -> value relation materialized as a
// dense wide table. The column set is every distinct non-null column-key
// value in the whole input, so a row key that never saw some column key
// still gets that column, holding null. Null is the only filler: a missing
// combination never reads as zero.

use crate::agg::{Acc, AggFn, AggSpec};
use kelvin_base::{err, FastMap, FastSet, Result};
use kelvin_lang::{Col, Tab, Val};
use tracing::debug;

const OP: &str = "pivot";

pub fn pivot(tab: &Tab, row_key: &str, col_key: &str, spec: &AggSpec) -> Result<Tab> {
    let rk = tab.col_for(OP, row_key)?;
    let ck = tab.col_for(OP, col_key)?;
    let src = tab.col_for(OP, &spec.source)?;
    let out_ty = spec.output_type(src.ty())?;

    let mut row_vals: Vec<Val> = distinct(rk.iter());
    row_vals.sort();
    let mut col_vals: Vec<Val> = distinct(ck.iter().filter(|v| !v.is_null()));
    col_vals.sort();
    if let Some(clash) = col_vals.iter().find(|v| v.to_string() == row_key) {
        return Err(err(format!(
            "{OP}: value `{clash}` of column `{col_key}` would become a header \
             clashing with row key column `{row_key}`"
        )));
    }
    let row_pos: FastMap<&Val, usize> = row_vals.iter().enumerate().map(|(i, v)| (v, i)).collect();
    let col_pos: FastMap<&Val, usize> = col_vals.iter().enumerate().map(|(i, v)| (v, i)).collect();

    let width = col_vals.len();
    let mut cells: Vec<Option<Acc>> = vec![None; row_vals.len() * width];
    for row in 0..tab.rows() {
        let c = ck.get(row);
        if c.is_null() {
            continue;
        }
        let r = rk.get(row);
        let (Some(&ri), Some(&ci)) = (row_pos.get(&r), col_pos.get(&c)) else {
            continue;
        };
        cells[ri * width + ci]
            .get_or_insert_with(Acc::default)
            .push(&src.get(row));
    }
    debug!(
        row_key,
        col_key,
        rows = row_vals.len(),
        cols = width,
        filled = cells.iter().filter(|c| c.is_some()).count(),
        "pivot"
    );

    let mut cols = Vec::with_capacity(width + 1);
    cols.push(Col::new(row_key, rk.ty(), row_vals.iter().cloned())?);
    for (ci, header) in col_vals.iter().enumerate() {
        let mut col = Col::empty(header.to_string(), out_ty);
        for ri in 0..row_vals.len() {
            let v = match &cells[ri * width + ci] {
                None => Val::Null,
                // Only nulls landed here; there is nothing to average.
                Some(acc) if acc.count() == 0 && spec.func != AggFn::Count => Val::Null,
                Some(acc) => acc.finish(OP, spec, src.ty())?,
            };
            col.push(v)?;
        }
        cols.push(col);
    }
    Tab::new(cols)
}

fn distinct(vals: impl Iterator<Item = Val>) -> Vec<Val> {
    let mut seen = FastSet::default();
    let mut out = Vec::new();
    for v in vals {
        if seen.insert(v.clone()) {
            out.push(v);
        }
    }
    out
}
