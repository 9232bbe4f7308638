use crate::domain::model::{Decision, ScoreBounds};

/// 表單頁面下方顯示的結果
#[derive(Debug, Clone, PartialEq)]
pub enum PageMessage {
    Prediction(Decision),
    Error(String),
}

impl PageMessage {
    fn css_class(&self) -> &'static str {
        match self {
            Self::Prediction(decision) if decision.placed => "success",
            _ => "error",
        }
    }

    pub fn text(&self) -> String {
        match self {
            Self::Prediction(decision) if decision.placed => format!("✅ {}", decision.label()),
            Self::Prediction(decision) => format!("❌ {}", decision.label()),
            Self::Error(message) => format!("Error: {}", message),
        }
    }
}

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; max-width: 600px; margin: 50px auto; padding: 20px; }
        .container { background: #f5f5f5; padding: 30px; border-radius: 10px; }
        h1 { color: #333; text-align: center; }
        .form-group { margin: 15px 0; }
        label { display: block; margin-bottom: 5px; font-weight: bold; }
        input { width: 100%; padding: 10px; border: 1px solid #ddd; border-radius: 5px; }
        button { background: #007bff; color: white; padding: 12px 30px; border: none; border-radius: 5px; cursor: pointer; width: 100%; }
        button:hover { background: #0056b3; }
        .prediction { margin-top: 20px; padding: 15px; border-radius: 5px; text-align: center; font-weight: bold; }
        .success { background: #d4edda; color: #155724; border: 1px solid #c3e6cb; }
        .error { background: #f8d7da; color: #721c24; border: 1px solid #f5c6cb; }
"#;

pub fn render_page(message: Option<&PageMessage>, bounds: &ScoreBounds) -> String {
    let result = message
        .map(|m| {
            format!(
                r#"<div class="prediction {}">{}</div>"#,
                m.css_class(),
                escape_html(&m.text())
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Placement Prediction</title>
    <style>{style}</style>
</head>
<body>
    <div class="container">
        <h1>🎯 Placement Prediction</h1>
        <form method="POST" action="/">
            <div class="form-group">
                <label for="cgpa">CGPA ({cgpa_min}-{cgpa_max}):</label>
                <input type="number" id="cgpa" name="cgpa" step="0.1" min="{cgpa_min}" max="{cgpa_max}" required>
            </div>
            <div class="form-group">
                <label for="iq">IQ Score:</label>
                <input type="number" id="iq" name="iq" min="{iq_min}" max="{iq_max}" required>
            </div>
            <button type="submit">🔮 Predict Placement</button>
        </form>
        {result}
    </div>
</body>
</html>
"#,
        style = STYLE,
        cgpa_min = bounds.academic_min,
        cgpa_max = bounds.academic_max,
        iq_min = bounds.aptitude_min,
        iq_max = bounds.aptitude_max,
        result = result,
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
