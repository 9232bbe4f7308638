use anyhow::Result;
use placement_predictor::{predict_csv, LinearModel, Predictor, ScoreBounds, TomlConfig};
use std::fs::File;
use std::sync::Arc;
use tempfile::TempDir;

/// 從檔案讀入、寫出到檔案的完整批次流程
#[test]
fn test_batch_scoring_between_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input_path = temp_dir.path().join("scores.csv");
    let output_path = temp_dir.path().join("predictions.csv");

    std::fs::write(
        &input_path,
        "cgpa,iq\n9.1,140\n7.0,110\n6.5,100\n6.4,150\n8.0,119\n11,120\n",
    )?;

    let config = TomlConfig::from_toml_str("")?;
    let predictor = Predictor::from_config(&config.model, config.score_bounds());

    let summary = predict_csv(
        File::open(&input_path)?,
        File::create(&output_path)?,
        &predictor,
    )?;

    assert_eq!(summary.total, 6);
    assert_eq!(summary.placed, 4);
    assert_eq!(summary.not_placed, 1);
    assert_eq!(summary.rejected, 1);

    let output = std::fs::read_to_string(&output_path)?;
    assert!(output.contains("6.4,150,false,Will not be placed,"));
    assert!(output.contains("8.0,119,true,Will be placed,"));
    assert!(output.contains("11,120,,,cgpa must be between 0 and 10"));

    Ok(())
}

#[test]
fn test_batch_with_model_backend() -> Result<()> {
    let model = LinearModel::from_json_str(
        r#"{"coefficients": [0.0, 1.0], "intercept": -100.0, "threshold": 0.5}"#,
    )?;
    let predictor = Predictor::with_classifier(Arc::new(model), ScoreBounds::default());

    let mut output = Vec::new();
    let summary = predict_csv("cgpa,iq\n2.0,150\n9.5,80\n".as_bytes(), &mut output, &predictor)?;

    assert_eq!(summary.placed, 1);
    assert_eq!(summary.not_placed, 1);

    let text = String::from_utf8(output)?;
    assert!(text.contains("2.0,150,true,Will be placed,"));
    assert!(text.contains("9.5,80,false,Will not be placed,"));

    Ok(())
}

/// 未指定 --output 時 stdout 只有 CSV，日誌走 stderr
#[cfg(feature = "cli")]
#[test]
fn test_batch_binary_keeps_stdout_clean() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input_path = temp_dir.path().join("scores.csv");
    std::fs::write(&input_path, "cgpa,iq\n8.5,130\n6.0,90\n")?;

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_placement-batch"))
        .arg("--input")
        .arg(&input_path)
        .arg("--verbose")
        .env_remove("RUST_LOG")
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "cgpa,iq,placed,prediction,error",
            "8.5,130,true,Will be placed,",
            "6.0,90,false,Will not be placed,",
        ]
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Scored 2 rows"));

    Ok(())
}
