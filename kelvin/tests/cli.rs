use kelvin_adapt::{write_readings, SensorReading};
use kelvin_base::Result;
use std::fs::File;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;
use test_log::test;

fn input(dir: &TempDir, timestamp_3: &str) -> Result<std::path::PathBuf> {
    let path = dir.path().join("sensor_data.csv");
    write_readings(
        File::create(&path)?,
        &[
            SensorReading::new(1, "2024-03-24 10:00:00", 20.0, 50.0, "A", "TypeA"),
            SensorReading::new(1, "2024-03-24 11:00:00", 22.0, 50.0, "A", "TypeA"),
            SensorReading::new(2, timestamp_3, 19.0, 50.0, "B", "TypeB"),
        ],
    )?;
    Ok(path)
}

fn kelvin(args: &[&str], input: Option<&Path>, output_dir: &Path) -> Result<Output> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kelvin"));
    cmd.args(args)
        .env_remove("KELVIN_INPUT")
        .env("KELVIN_OUTPUT_DIR", output_dir)
        .env("RUST_LOG", "warn");
    if let Some(input) = input {
        cmd.env("KELVIN_INPUT", input);
    }
    Ok(cmd.output()?)
}

#[test]
fn test_success_exits_zero() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = input(&dir, "2024-03-24 10:00:00")?;
    let out_dir = dir.path().join("out");
    let out = kelvin(&["--top-n", "1"], Some(&input), &out_dir)?;
    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Total Records: 3"), "{stdout}");
    for n in 1..=5 {
        assert!(out_dir.join(format!("task{n}_output.csv")).exists());
    }
    Ok(())
}

#[test]
fn test_stage_failure_exits_one() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = input(&dir, "not a time")?;
    let out_dir = dir.path().join("out");
    let out = kelvin(&[], Some(&input), &out_dir)?;
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("stage hourly_trend failed: TypeMismatchError: "),
        "{stderr}"
    );
    assert!(out_dir.join("task2_output.csv").exists());
    assert!(!out_dir.join("task3_output.csv").exists());

    let missing = dir.path().join("absent.csv");
    let out = kelvin(&["--input", &missing.to_string_lossy()], None, &out_dir)?;
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("stage explore failed: IoError: "), "{stderr}");
    Ok(())
}

#[test]
fn test_bad_config_exits_two() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = input(&dir, "2024-03-24 10:00:00")?;
    let out_dir = dir.path().join("out");

    let out = kelvin(&["--temp-lo", "40"], Some(&input), &out_dir)?;
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("bad configuration"));

    let config = dir.path().join("kelvin.json");
    std::fs::write(&config, r#"{"top_n": 0}"#)?;
    let out = kelvin(&["--config", &config.to_string_lossy()], Some(&input), &out_dir)?;
    assert_eq!(out.status.code(), Some(2));
    assert!(!out_dir.join("task1_output.csv").exists());
    Ok(())
}
