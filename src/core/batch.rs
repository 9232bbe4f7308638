use crate::core::predictor::Predictor;
use crate::domain::model::ScoreInput;
use crate::utils::error::{ErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScoreRow {
    cgpa: Option<String>,
    iq: Option<String>,
}

#[derive(Debug, Serialize)]
struct PredictionRow<'a> {
    cgpa: &'a str,
    iq: &'a str,
    placed: Option<bool>,
    prediction: &'a str,
    error: &'a str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub placed: usize,
    pub not_placed: usize,
    pub rejected: usize,
}

/// 逐列評分 CSV（欄位 `cgpa,iq`）。單列輸入錯誤只記錄在輸出中，不中斷批次；
/// 模型不可用則整批失敗。
pub fn predict_csv<R: Read, W: Write>(
    reader: R,
    writer: W,
    predictor: &Predictor,
) -> Result<BatchSummary> {
    // 欄位數不符的列照樣讀入，缺的欄位視為空值
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut summary = BatchSummary::default();

    for row in csv_reader.deserialize::<ScoreRow>() {
        summary.total += 1;
        let row = match row {
            Ok(row) => row,
            Err(e) if !e.is_io_error() => {
                tracing::warn!("⚠️ Row {} unreadable: {}", summary.total, e);
                summary.rejected += 1;
                csv_writer.serialize(PredictionRow {
                    cgpa: "",
                    iq: "",
                    placed: None,
                    prediction: "",
                    error: "row could not be read",
                })?;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let cgpa = row.cgpa.as_deref().unwrap_or("");
        let iq = row.iq.as_deref().unwrap_or("");

        let outcome = ScoreInput::parse_fields(Some(cgpa), Some(iq), predictor.bounds())
            .and_then(|input| predictor.decide_input(&input));

        match outcome {
            Ok(decision) => {
                if decision.placed {
                    summary.placed += 1;
                } else {
                    summary.not_placed += 1;
                }
                csv_writer.serialize(PredictionRow {
                    cgpa,
                    iq,
                    placed: Some(decision.placed),
                    prediction: decision.label(),
                    error: "",
                })?;
            }
            Err(e) if e.kind() == ErrorKind::InvalidInput => {
                tracing::warn!("⚠️ Row {} rejected: {}", summary.total, e);
                summary.rejected += 1;
                let message = e.user_friendly_message();
                csv_writer.serialize(PredictionRow {
                    cgpa,
                    iq,
                    placed: None,
                    prediction: "",
                    error: &message,
                })?;
            }
            Err(e) => return Err(e),
        }
    }

    csv_writer.flush()?;
    Ok(summary)
}
