use kelvin_base::{err, Result};
use kelvin_lang::{Col, ColType, SortOrder, Tab, Val};
use std::cmp::Ordering;
use tracing::debug;

pub const RANK_COL: &str = "rank";

/// Sorts `tab` by `order_col` and appends a dense rank column named
/// `rank_col`: equal values share a rank, and each new distinct value gets
/// the previous rank plus one. Equal values keep their input order.
pub fn dense_rank(tab: &Tab, order_col: &str, order: SortOrder, rank_col: &str) -> Result<Tab> {
    if tab.col(rank_col).is_some() {
        return Err(err(format!("dense_rank: column `{rank_col}` already exists")));
    }
    let idx = tab.sorted_indices(order_col, order)?;
    let sorted = tab.take(&idx);
    let by = sorted.col_for("dense_rank", order_col)?;
    let mut ranks = Vec::with_capacity(sorted.rows());
    let mut rank = 0i64;
    for row in 0..sorted.rows() {
        if row == 0 || by.cmp_rows(row - 1, row) != Ordering::Equal {
            rank += 1;
        }
        ranks.push(Val::Int(rank));
    }
    debug!(order_col, rows = sorted.rows(), distinct = rank, "dense_rank");
    let mut cols = sorted.into_cols();
    cols.push(Col::new(rank_col, ColType::Int, ranks)?);
    Tab::new(cols)
}

/// The first `n` rows, or all of them if there are fewer.
pub fn limit(tab: &Tab, n: usize) -> Tab {
    tab.head(n)
}
