// Eval is responsible for the operators that need more than a single pass
// over a single column: grouped aggregation, dense ranking and pivoting.
//
// Each operator is a pure function from borrowed tables to a new table. None
// of them keep state between calls, and none of them suspend or block: they
// run to completion over fully materialized input.

mod agg;
mod group;
mod pivot;
mod rank;
mod round;

#[cfg(test)]
mod test;

pub use agg::{Acc, AggFn, AggSpec};
pub use group::{group_aggregate, OrderBy, Partials};
pub use pivot::pivot;
pub use rank::{dense_rank, limit, RANK_COL};
pub use round::round_half_up;
