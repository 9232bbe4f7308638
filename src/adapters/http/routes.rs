use crate::adapters::http::page::{render_page, PageMessage};
use crate::adapters::http::request::HttpRequest;
use crate::adapters::http::response::HttpResponse;
use crate::core::predictor::Predictor;
use crate::domain::model::{ScoreInput, ACADEMIC_FIELD, APTITUDE_FIELD};
use crate::utils::error::{PredictorError, Result};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: &'static str,
    pub placed: bool,
    pub cgpa: f64,
    pub iq: f64,
}

pub fn dispatch(predictor: &Predictor, request: &HttpRequest) -> HttpResponse {
    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/") => form_page(predictor, None, 200),
        ("POST", "/") => submit_form(predictor, request),
        ("POST", "/predict") | ("POST", "/api/predict") => predict_json(predictor, request),
        ("GET", "/health") => HttpResponse::json(
            200,
            &json!({ "status": "ok", "backend": predictor.backend_name() }),
        ),
        (_, "/") => method_not_allowed("GET, POST"),
        (_, "/predict") | (_, "/api/predict") => method_not_allowed("POST"),
        (_, "/health") => method_not_allowed("GET"),
        _ => HttpResponse::json_error(404, "Not found"),
    }
}

/// 回應 HTTP 層本身的錯誤（例如請求格式錯誤、內容過大）
pub fn error_response(err: &PredictorError) -> HttpResponse {
    HttpResponse::json_error(err.status_code(), err.user_friendly_message())
}

/// 請求標頭已讀取、但本文被拒絕（例如超過上限）時的回應；
/// 表單頁面維持 HTML，其餘路徑回傳 JSON
pub fn rejection_response(
    predictor: &Predictor,
    request: &HttpRequest,
    err: &PredictorError,
) -> HttpResponse {
    if request.path == "/" {
        form_page(
            predictor,
            Some(PageMessage::Error(err.user_friendly_message())),
            err.status_code(),
        )
    } else {
        error_response(err)
    }
}

fn method_not_allowed(allow: &'static str) -> HttpResponse {
    HttpResponse::json_error(405, "Method not allowed").with_header("Allow", allow)
}

fn form_page(predictor: &Predictor, message: Option<PageMessage>, status: u16) -> HttpResponse {
    HttpResponse::html(status, render_page(message.as_ref(), predictor.bounds()))
}

fn submit_form(predictor: &Predictor, request: &HttpRequest) -> HttpResponse {
    let fields = request.form_fields();
    let outcome = ScoreInput::parse_fields(
        fields.get(ACADEMIC_FIELD).map(String::as_str),
        fields.get(APTITUDE_FIELD).map(String::as_str),
        predictor.bounds(),
    )
    .and_then(|input| predictor.decide_input(&input));

    match outcome {
        Ok(decision) => form_page(predictor, Some(PageMessage::Prediction(decision)), 200),
        Err(e) => {
            log_failure(&e);
            form_page(
                predictor,
                Some(PageMessage::Error(e.user_friendly_message())),
                e.status_code(),
            )
        }
    }
}

fn predict_json(predictor: &Predictor, request: &HttpRequest) -> HttpResponse {
    match evaluate_json(predictor, &request.body) {
        Ok(response) => HttpResponse::json(200, &response),
        Err(e) => {
            log_failure(&e);
            error_response(&e)
        }
    }
}

fn evaluate_json(predictor: &Predictor, body: &[u8]) -> Result<PredictionResponse> {
    let body: Value = serde_json::from_slice(body).map_err(|e| {
        PredictorError::invalid_input("body", format!("invalid JSON body: {}", e))
    })?;
    let input = ScoreInput::from_json(&body, predictor.bounds())?;
    let decision = predictor.decide_input(&input)?;

    Ok(PredictionResponse {
        prediction: decision.label(),
        placed: decision.placed,
        cgpa: input.academic_score,
        iq: input.aptitude_score,
    })
}

fn log_failure(err: &PredictorError) {
    if err.status_code() >= 500 {
        tracing::error!("❌ Prediction failed: {}", err);
    } else {
        tracing::debug!("Rejected prediction request: {}", err);
    }
}
