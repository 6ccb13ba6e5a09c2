use kelvin::{output_path, run_pipeline};
use kelvin_adapt::{read_csv, readings_tab, write_readings, RejectPolicy, Schema, SensorReading};
use kelvin_admin::Config;
use kelvin_base::{ErrorKind, Result};
use std::fs::{self, File};
use tempfile::TempDir;
use test_log::test;

fn scenario() -> Vec<SensorReading> {
    vec![
        SensorReading::new(1, "2024-03-24 10:00:00", 20.0, 50.0, "A", "TypeA"),
        SensorReading::new(1, "2024-03-24 11:00:00", 22.0, 50.0, "A", "TypeA"),
        SensorReading::new(2, "2024-03-24 10:00:00", 19.0, 50.0, "B", "TypeB"),
    ]
}

fn setup(readings: &[SensorReading]) -> Result<(TempDir, Config)> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("sensor_data.csv");
    write_readings(File::create(&input)?, readings)?;
    let config = Config {
        input,
        output_dir: dir.path().join("out"),
        ..Config::default()
    };
    Ok((dir, config))
}

fn output(config: &Config, n: usize) -> Result<String> {
    Ok(fs::read_to_string(output_path(&config.output_dir, n))?)
}

fn exists(config: &Config, n: usize) -> bool {
    output_path(&config.output_dir, n).exists()
}

#[test]
fn test_full_run() -> Result<()> {
    let (_dir, config) = setup(&scenario())?;
    let mut stdout = Vec::new();
    let report = match run_pipeline(&config, &mut stdout) {
        Ok(r) => r,
        Err(f) => panic!("{f}"),
    };
    assert_eq!(report.ingest.rows, 3);
    assert_eq!(report.ingest.rejected, 0);
    assert_eq!((report.in_range, report.out_of_range), (3, 0));
    assert_eq!(report.outputs.len(), 5);

    let printed = String::from_utf8_lossy(&stdout);
    assert!(printed.contains("Total Records: 3"), "{printed}");
    assert!(printed.contains("In-Range Count: 3"), "{printed}");
    assert!(printed.contains("Out-of-Range Count: 0"), "{printed}");

    let (task1, _) = read_csv(
        &output_path(&config.output_dir, 1),
        &Schema::sensor_readings(),
        RejectPolicy::FailFast,
    )?;
    assert_eq!(task1, readings_tab(&scenario())?);
    assert_eq!(
        output(&config, 2)?,
        "location,avg_temperature,avg_humidity\nA,21.0,50.0\nB,19.0,50.0\n"
    );
    assert_eq!(output(&config, 3)?, "hour_of_day,avg_temp\n10,19.5\n11,22.0\n");
    assert_eq!(
        output(&config, 4)?,
        "sensor_id,avg_temp,rank_temp\n1,21.0,1\n2,19.0,2\n"
    );
    assert_eq!(output(&config, 5)?, "location,10,11\nA,20.0,22.0\nB,19.0,\n");
    Ok(())
}

#[test]
fn test_rerun_overwrites_outputs() -> Result<()> {
    let (_dir, config) = setup(&scenario())?;
    let config = Config { top_n: 1, ..config };
    for _ in 0..2 {
        if let Err(f) = run_pipeline(&config, &mut Vec::new()) {
            panic!("{f}");
        }
    }
    assert_eq!(output(&config, 4)?, "sensor_id,avg_temp,rank_temp\n1,21.0,1\n");
    Ok(())
}

#[test]
fn test_fail_fast_stops_before_any_output() -> Result<()> {
    let (_dir, config) = setup(&scenario())?;
    let mut text = fs::read_to_string(&config.input)?;
    text.push_str("3,2024-03-24 12:00:00,hot,50.0,C,TypeC\n");
    fs::write(&config.input, text)?;
    let config = Config {
        reject_policy: RejectPolicy::FailFast,
        ..config
    };

    let failure = match run_pipeline(&config, &mut Vec::new()) {
        Ok(_) => panic!("bad row accepted"),
        Err(f) => f,
    };
    assert_eq!(failure.stage, "explore");
    assert_eq!(failure.error.kind(), ErrorKind::SchemaViolation);
    assert!(failure.error.message().starts_with("row 4, column `temperature`"));
    assert!(!exists(&config, 1));
    Ok(())
}

#[test]
fn test_skip_counts_rejected_rows() -> Result<()> {
    let (_dir, config) = setup(&scenario())?;
    let mut text = fs::read_to_string(&config.input)?;
    text.push_str(",2024-03-24 12:00:00,20.0,50.0,C,TypeC\n");
    fs::write(&config.input, text)?;

    let mut stdout = Vec::new();
    let report = match run_pipeline(&config, &mut stdout) {
        Ok(r) => r,
        Err(f) => panic!("{f}"),
    };
    assert_eq!((report.ingest.rows, report.ingest.rejected), (3, 1));
    assert!(String::from_utf8_lossy(&stdout).contains("Rejected Records: 1"));
    // The rejected row reaches no aggregate.
    assert!(!output(&config, 2)?.contains('C'));
    Ok(())
}

#[test]
fn test_later_failure_keeps_earlier_outputs() -> Result<()> {
    let mut readings = scenario();
    readings.push(SensorReading::new(3, "half past ten", 21.0, 50.0, "C", "TypeC"));
    let (_dir, config) = setup(&readings)?;

    let failure = match run_pipeline(&config, &mut Vec::new()) {
        Ok(_) => panic!("unparseable timestamp accepted"),
        Err(f) => f,
    };
    assert_eq!(failure.stage, "hourly_trend");
    assert_eq!(failure.error.kind(), ErrorKind::TypeMismatch);
    assert!(failure
        .to_string()
        .starts_with("stage hourly_trend failed: TypeMismatchError: "));
    assert!(exists(&config, 1));
    assert!(exists(&config, 2));
    assert!(!exists(&config, 3));
    Ok(())
}

#[test]
fn test_missing_input_and_bad_config() -> Result<()> {
    let (dir, config) = setup(&scenario())?;
    let missing = Config {
        input: dir.path().join("nope.csv"),
        ..config.clone()
    };
    let failure = match run_pipeline(&missing, &mut Vec::new()) {
        Ok(_) => panic!("missing input accepted"),
        Err(f) => f,
    };
    assert_eq!((failure.stage, failure.error.kind()), ("explore", ErrorKind::Io));

    let inverted = Config {
        temp_lo: 40.0,
        ..config
    };
    let failure = match run_pipeline(&inverted, &mut Vec::new()) {
        Ok(_) => panic!("inverted range accepted"),
        Err(f) => f,
    };
    assert_eq!(failure.stage, "config");
    Ok(())
}
