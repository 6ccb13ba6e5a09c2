use crate::{
    col::Col,
    pred::Pred,
    val::{ColType, Val},
};
use kelvin_base::{column_not_found, err, FastSet, Result};
use std::cmp::Ordering;
use tracing::debug;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn apply(&self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

// A table is an ordered list of uniquely-named columns of equal length.
// Tables are never mutated once built: every operation below returns a new
// one, so a Tab can be shared freely between readers.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Default)]
pub struct Tab {
    cols: Vec<Col>,
    rows: usize,
}

impl Tab {
    pub fn new(cols: Vec<Col>) -> Result<Tab> {
        let rows = cols.first().map_or(0, |c| c.len());
        for (i, c) in cols.iter().enumerate() {
            if c.len() != rows {
                return Err(err(format!(
                    "column `{}` has {} rows, expected {}",
                    c.name(),
                    c.len(),
                    rows
                )));
            }
            if cols[..i].iter().any(|prev| prev.name() == c.name()) {
                return Err(err(format!("duplicate column `{}`", c.name())));
            }
        }
        Ok(Tab { cols, rows })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> &[Col] {
        &self.cols
    }

    pub fn into_cols(self) -> Vec<Col> {
        self.cols
    }

    pub fn col_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.cols.iter().map(|c| c.name())
    }

    pub fn col_index(&self, name: &str) -> Option<usize> {
        self.cols.iter().position(|c| c.name() == name)
    }

    pub fn col(&self, name: &str) -> Option<&Col> {
        self.cols.iter().find(|c| c.name() == name)
    }

    /// Like `col`, but an absent column is a ColumnNotFound error
    /// attributed to `op`.
    pub fn col_for(&self, op: &'static str, name: &str) -> Result<&Col> {
        self.col(name).ok_or_else(|| column_not_found(op, name))
    }

    pub fn row(&self, i: usize) -> Row<'_> {
        Row { tab: self, idx: i }
    }

    pub fn take(&self, idx: &[usize]) -> Tab {
        Tab {
            cols: self.cols.iter().map(|c| c.take(idx)).collect(),
            rows: idx.len(),
        }
    }

    pub fn head(&self, n: usize) -> Tab {
        let idx: Vec<usize> = (0..n.min(self.rows)).collect();
        self.take(&idx)
    }

    pub fn filter(&self, pred: &Pred) -> Result<Tab> {
        let keep = pred.select(self)?;
        debug_assert_eq!(keep.len(), self.rows);
        debug!(pred = %pred, rows_in = self.rows, rows_out = keep.count(), "filter");
        let idx: Vec<usize> = keep.ones().collect();
        Ok(self.take(&idx))
    }

    pub fn project(&self, names: &[&str]) -> Result<Tab> {
        let cols = names
            .iter()
            .map(|n| self.col_for("project", n).cloned())
            .collect::<Result<Vec<Col>>>()?;
        Tab::new(cols)
    }

    /// Distinct non-null values of a column, in first-seen order.
    pub fn distinct_vals(&self, name: &str) -> Result<Vec<Val>> {
        let col = self.col_for("distinct", name)?;
        let mut seen = FastSet::default();
        let mut out = Vec::new();
        for v in col.iter() {
            if !v.is_null() && seen.insert(v.clone()) {
                out.push(v);
            }
        }
        Ok(out)
    }

    /// Computes a column of type `ty` row by row. A column already named
    /// `name` is replaced in place; otherwise the new column is appended.
    pub fn derive_col<F>(&self, name: &str, ty: ColType, f: F) -> Result<Tab>
    where
        F: Fn(&Row<'_>) -> Result<Val>,
    {
        let mut col = Col::empty(name, ty);
        for i in 0..self.rows {
            col.push(f(&self.row(i))?)?;
        }
        let mut cols = self.cols.clone();
        match self.col_index(name) {
            Some(i) => cols[i] = col,
            None => cols.push(col),
        }
        Tab::new(cols)
    }

    /// Row indices in stable order of the named column.
    pub fn sorted_indices(&self, name: &str, order: SortOrder) -> Result<Vec<usize>> {
        let col = self.col_for("sort", name)?;
        let mut idx: Vec<usize> = (0..self.rows).collect();
        idx.sort_by(|&a, &b| order.apply(col.cmp_rows(a, b)));
        Ok(idx)
    }

    pub fn sort_by(&self, name: &str, order: SortOrder) -> Result<Tab> {
        let idx = self.sorted_indices(name, order)?;
        Ok(self.take(&idx))
    }

    /// Renders up to `limit` rows as a text grid, one line per row.
    pub fn render(&self, limit: usize) -> String {
        const MAX_CELL: usize = 20;
        let shown = limit.min(self.rows);
        let cell = |v: Val| -> String {
            let s = if v.is_null() { "NULL".to_string() } else { v.to_string() };
            if s.chars().count() > MAX_CELL {
                let mut t: String = s.chars().take(MAX_CELL - 3).collect();
                t.push_str("...");
                t
            } else {
                s
            }
        };
        let header: Vec<String> = self.col_names().map(str::to_string).collect();
        let body: Vec<Vec<String>> = (0..shown)
            .map(|r| self.cols.iter().map(|c| cell(c.get(r))).collect())
            .collect();
        let widths: Vec<usize> = header
            .iter()
            .enumerate()
            .map(|(i, h)| {
                body.iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let rule: String = widths.iter().fold(String::from("+"), |mut s, w| {
            s.push_str(&"-".repeat(*w));
            s.push('+');
            s
        });
        let line = |cells: &[String]| -> String {
            let mut s = String::from("|");
            for (c, w) in cells.iter().zip(widths.iter()) {
                s.push_str(&format!("{c:>w$}|", w = *w));
            }
            s
        };
        let mut out = vec![rule.clone(), line(&header), rule.clone()];
        out.extend(body.iter().map(|row| line(row)));
        out.push(rule);
        if shown < self.rows {
            out.push(format!(
                "only showing top {} row{}",
                shown,
                if shown == 1 { "" } else { "s" }
            ));
        }
        out.join("\n")
    }
}

/// A borrowed view of one row, used by derivations.
#[derive(Clone, Copy, Debug)]
pub struct Row<'a> {
    tab: &'a Tab,
    idx: usize,
}

impl Row<'_> {
    pub fn index(&self) -> usize {
        self.idx
    }

    pub fn get(&self, name: &str) -> Result<Val> {
        Ok(self.tab.col_for("row", name)?.get(self.idx))
    }

    pub fn vals(&self) -> Vec<Val> {
        self.tab.cols.iter().map(|c| c.get(self.idx)).collect()
    }
}
