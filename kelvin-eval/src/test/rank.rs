use super::column;
use crate::{dense_rank, limit, RANK_COL};
use kelvin_base::Result;
use kelvin_lang::{Col, ColType, SortOrder, Tab, Val};
use test_log::test;

fn sensor_avgs(vals: &[(i64, f64)]) -> Result<Tab> {
    Tab::new(vec![
        Col::new("sensor_id", ColType::Int, vals.iter().map(|v| Val::Int(v.0)))?,
        Col::new("avg_temp", ColType::Flo, vals.iter().map(|v| Val::flo(v.1)))?,
    ])
}

#[test]
fn test_ties_share_rank_without_gaps() -> Result<()> {
    let tab = sensor_avgs(&[(1, 25.0), (2, 30.0), (3, 30.0), (4, 20.0), (5, 25.0)])?;
    let ranked = dense_rank(&tab, "avg_temp", SortOrder::Desc, "rank_temp")?;
    assert_eq!(column(&ranked, "sensor_id"), [2i64, 3, 1, 5, 4].map(Val::Int).to_vec());
    assert_eq!(column(&ranked, "rank_temp"), [1i64, 1, 2, 2, 3].map(Val::Int).to_vec());
    Ok(())
}

#[test]
fn test_ascending_rank_and_default_name() -> Result<()> {
    let tab = sensor_avgs(&[(1, 3.0), (2, 1.0), (3, 2.0)])?;
    let ranked = dense_rank(&tab, "avg_temp", SortOrder::Asc, RANK_COL)?;
    assert_eq!(column(&ranked, "rank"), [1i64, 2, 3].map(Val::Int).to_vec());
    assert_eq!(column(&ranked, "sensor_id"), [2i64, 3, 1].map(Val::Int).to_vec());
    Ok(())
}

#[test]
fn test_limit() -> Result<()> {
    let tab = sensor_avgs(&[(1, 5.0), (2, 4.0), (3, 3.0), (4, 2.0), (5, 1.0), (6, 0.5), (7, 9.0)])?;
    let ranked = dense_rank(&tab, "avg_temp", SortOrder::Desc, "rank_temp")?;
    let top = limit(&ranked, 5);
    assert_eq!(top.rows(), 5);
    assert_eq!(column(&top, "rank_temp"), [1i64, 2, 3, 4, 5].map(Val::Int).to_vec());

    let few = limit(&dense_rank(&sensor_avgs(&[(1, 1.0), (2, 2.0)])?, "avg_temp", SortOrder::Desc, "r")?, 5);
    assert_eq!(few.rows(), 2);
    assert_eq!(limit(&ranked, 0).rows(), 0);
    Ok(())
}

#[test]
fn test_nulls_rank_last_when_descending() -> Result<()> {
    let tab = Tab::new(vec![
        Col::new("sensor_id", ColType::Int, [1i64, 2, 3].map(Val::Int))?,
        Col::new("avg_temp", ColType::Flo, [Val::Null, Val::flo(1.0), Val::Null])?,
    ])?;
    let ranked = dense_rank(&tab, "avg_temp", SortOrder::Desc, "r")?;
    assert_eq!(column(&ranked, "sensor_id"), [2i64, 1, 3].map(Val::Int).to_vec());
    assert_eq!(column(&ranked, "r"), [1i64, 2, 2].map(Val::Int).to_vec());
    Ok(())
}

#[test]
fn test_rank_errors() -> Result<()> {
    let tab = sensor_avgs(&[(1, 1.0)])?;
    assert!(dense_rank(&tab, "missing", SortOrder::Desc, "r").is_err());
    assert!(dense_rank(&tab, "avg_temp", SortOrder::Desc, "sensor_id").is_err());
    let empty = dense_rank(&sensor_avgs(&[])?, "avg_temp", SortOrder::Desc, "r")?;
    assert_eq!(empty.rows(), 0);
    Ok(())
}
