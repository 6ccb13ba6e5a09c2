// Lang holds the value model of the engine: scalar types and values, typed
// columns, tables of columns, and the row predicates tables are filtered by.
//
// Everything here is an immutable value once constructed. Operators that
// need more than a single table's worth of state (grouping, ranking,
// pivoting) live in kelvin-eval and only ever read these types.

mod col;
mod pred;
mod tab;
mod val;

#[cfg(test)]
mod test;

pub use col::{Col, Vals};
pub use pred::{CmpOp, Pred};
pub use tab::{Row, SortOrder, Tab};
pub use val::{fmt_flo, parse_timestamp, ColType, Val};
