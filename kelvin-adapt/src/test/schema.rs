use crate::{Field, Schema};
use kelvin_base::Result;
use kelvin_lang::ColType;
use test_log::test;

#[test]
fn test_parse_text_form() -> Result<()> {
    let s: Schema = "sensor_id:int!, timestamp:string!, temperature:float, humidity:double, \
                     location:string, sensor_type:str"
        .parse()?;
    assert_eq!(s, Schema::sensor_readings());
    assert_eq!(
        s.to_string(),
        "sensor_id:int!, timestamp:string!, temperature:float, humidity:float, \
         location:string, sensor_type:string"
    );
    Ok(())
}

#[test]
fn test_parse_rejects_bad_fields() {
    assert!("a:int, a:float".parse::<Schema>().is_err());
    assert!("a".parse::<Schema>().is_err());
    assert!("a:decimal".parse::<Schema>().is_err());
    assert!(":int".parse::<Schema>().is_err());
    assert!("".parse::<Schema>().is_err());
}

#[test]
fn test_empty_cols_are_typed() -> Result<()> {
    let s = Schema::new(vec![
        Field::new("id", ColType::Int).not_null(),
        Field::new("at", ColType::Time),
    ])?;
    let cols = s.empty_cols();
    assert_eq!(cols.len(), 2);
    assert!(cols.iter().all(|c| c.is_empty()));
    assert_eq!(cols[1].name(), "at");
    assert_eq!(cols[1].ty(), ColType::Time);
    Ok(())
}
