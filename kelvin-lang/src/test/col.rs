use crate::{fmt_flo, parse_timestamp, Col, ColType, Val};
use chrono::Timelike;
use kelvin_base::{ErrorKind, Result};
use std::cmp::Ordering;
use test_log::test;

#[test]
fn test_coerce_widens_and_parses() -> Result<()> {
    let col = Col::new("t", ColType::Flo, [Val::Int(3), Val::str(" 4.5 "), Val::Null])?;
    assert_eq!(col.get(0), Val::flo(3.0));
    assert_eq!(col.get(1), Val::flo(4.5));
    assert!(col.is_null(2));
    assert_eq!(col.len(), 3);

    let col = Col::new("id", ColType::Int, [Val::flo(7.0), Val::str("12")])?;
    assert_eq!(col.iter().collect::<Vec<_>>(), vec![Val::Int(7), Val::Int(12)]);
    Ok(())
}

#[test]
fn test_coerce_rejects_garbage() {
    let e = Col::new("temperature", ColType::Flo, [Val::str("warm")]).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::TypeMismatch);
    assert!(e.message().contains("temperature"));

    let e = Col::new("sensor_id", ColType::Int, [Val::flo(1.5)]).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::TypeMismatch);

    let e = Col::new("ts", ColType::Time, [Val::Int(5)]).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn test_row_order_puts_nulls_first() -> Result<()> {
    let col = Col::new("s", ColType::Str, [Val::str("b"), Val::Null, Val::str("a")])?;
    assert_eq!(col.cmp_rows(0, 2), Ordering::Greater);
    assert_eq!(col.cmp_rows(1, 2), Ordering::Less);
    assert_eq!(col.cmp_rows(1, 1), Ordering::Equal);
    let taken = col.take(&[2, 0]);
    assert_eq!(taken.iter().collect::<Vec<_>>(), vec![Val::str("a"), Val::str("b")]);
    Ok(())
}

#[test]
fn test_timestamp_formats() {
    for s in [
        "2024-03-24 14:39:16",
        "2024-03-24T14:39:16",
        "2024-03-24 14:39:16.250",
        "2024-03-24 14:39",
    ] {
        let t = parse_timestamp(s).unwrap_or_else(|| panic!("failed to parse {s}"));
        assert_eq!(t.hour(), 14);
    }
    assert_eq!(parse_timestamp("2024-03-24").map(|t| t.hour()), Some(0));
    assert_eq!(parse_timestamp("yesterday"), None);
    assert_eq!(parse_timestamp("2024-13-01 00:00:00"), None);
}

#[test]
fn test_display() {
    assert_eq!(fmt_flo(20.0), "20.0");
    assert_eq!(fmt_flo(19.5), "19.5");
    assert_eq!(fmt_flo(-0.125), "-0.125");
    assert_eq!(Val::Null.to_string(), "");
    let t = parse_timestamp("2024-03-24 14:39:16").map(Val::Time);
    assert_eq!(t.map(|v| v.to_string()).as_deref(), Some("2024-03-24 14:39:16"));
}
