//! HTML rendering for the dashboard tabs

use std::fmt::Write as _;

use crate::batch::ScoredBatch;
use crate::input_adapter::{MAX_CHILDREN, MAX_HOUR};
use crate::types::feature_vector::feature_name;
use crate::types::{ContractType, Label, PredictionResult, FEATURE_COUNT};

use super::content::{chatbot_reply, DATASET_URL, FAQ, HOME_ACTIONS, PROJECT_INFO};

/// Dashboard tabs in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Eda,
    Predict,
    Chatbot,
    Faq,
    About,
}

impl Tab {
    const ALL: [Tab; 6] = [
        Tab::Home,
        Tab::Eda,
        Tab::Predict,
        Tab::Chatbot,
        Tab::Faq,
        Tab::About,
    ];

    fn href(self) -> &'static str {
        match self {
            Tab::Home => "/",
            Tab::Eda => "/eda",
            Tab::Predict => "/predict",
            Tab::Chatbot => "/chatbot",
            Tab::Faq => "/faq",
            Tab::About => "/about",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Tab::Home => "🏠 Home",
            Tab::Eda => "📊 EDA and Visualizations",
            Tab::Predict => "🔍 Fraud Prediction Model",
            Tab::Chatbot => "🤖 Credit Fraud Chatbot",
            Tab::Faq => "❓ Fraud FAQs",
            Tab::About => "ℹ️ Project Information",
        }
    }
}

/// Prediction tab input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    #[default]
    Guided,
    Manual,
    Batch,
}

const STYLE: &str = "body{margin:0;font-family:sans-serif;color:#fff;\
background:linear-gradient(rgba(0,0,0,.75),rgba(0,0,0,.85)),#1b1f2a;min-height:100vh}\
nav{display:flex;gap:.5rem;padding:.75rem 1rem;background:rgba(255,255,255,.06)}\
nav a{color:#ccd;text-decoration:none;padding:.4rem .8rem;border-radius:.4rem}\
nav a.active{background:#2f6fed;color:#fff}main{padding:1.5rem 2rem}\
label{display:block;margin:.5rem 0 .2rem}input,select{padding:.3rem}\
.error{background:#7a1f1f;padding:.8rem;border-radius:.4rem}\
.success{background:#1f6a3a;padding:.8rem;border-radius:.4rem}\
.info{background:#1f4a7a;padding:.8rem;border-radius:.4rem}\
.grid{display:grid;grid-template-columns:repeat(6,1fr);gap:.4rem}\
table{border-collapse:collapse;font-size:.8rem}td,th{border:1px solid #445;padding:.2rem .4rem}\
.scroll{overflow-x:auto}";

/// Escape text for HTML element and attribute content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap tab content in the page chrome
pub fn layout(active: Tab, body: &str) -> String {
    let mut nav = String::new();
    for tab in Tab::ALL {
        let class = if tab == active { " class=\"active\"" } else { "" };
        let _ = write!(nav, "<a href=\"{}\"{}>{}</a>", tab.href(), class, tab.title());
    }

    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>Credit Card Fraud Detection</title><style>{STYLE}</style></head>\
         <body><nav>{nav}</nav><main>{body}</main></body></html>"
    )
}

pub fn home_page() -> String {
    let mut body = String::from(
        "<h1>🏠 Welcome to the Credit Card Fraud Detection App</h1>\
         <p>This project uses machine learning to predict whether a credit card application \
         or transaction is likely fraudulent. The model was trained using 106 anonymized \
         features from a Kaggle dataset.</p><p>💡 <strong>What you can do here:</strong></p><ul>",
    );
    for action in HOME_ACTIONS {
        let _ = write!(body, "<li>{}</li>", escape(action));
    }
    body.push_str("</ul>");
    layout(Tab::Home, &body)
}

pub fn eda_page(notebook_url: &str, has_image: bool) -> String {
    let mut body = format!(
        "<h1>📊 EDA and Visualizations</h1><p>Below is a snapshot of our exploratory data \
         analysis. For a full interactive experience, visit the \
         <a href=\"{}\">Colab Notebook</a>.</p>",
        escape(notebook_url)
    );
    if has_image {
        body.push_str(
            "<figure><img src=\"/eda/image\" alt=\"EDA Overview\" style=\"width:100%\">\
             <figcaption>EDA Overview</figcaption></figure>",
        );
    } else {
        body.push_str("<p class=\"info\">No EDA screenshot is configured.</p>");
    }
    layout(Tab::Eda, &body)
}

/// Prediction tab with the form for `mode` and an optional outcome block
pub fn predict_page(mode: FormMode, form: &str, outcome: Option<&str>) -> String {
    let mut body = String::from("<h1>🔍 Credit Card Fraud Prediction</h1><p>Choose input method: ");
    for (m, label, query) in [
        (FormMode::Guided, "🧠 Smart Input", "guided"),
        (FormMode::Manual, "📂 Manual Entry", "manual"),
        (FormMode::Batch, "📁 Upload CSV", "batch"),
    ] {
        if m == mode {
            let _ = write!(body, "<strong>{}</strong> ", label);
        } else {
            let _ = write!(body, "<a href=\"/predict?mode={}\">{}</a> ", query, label);
        }
    }
    body.push_str("</p>");
    body.push_str(form);
    if let Some(outcome) = outcome {
        body.push_str(outcome);
    }
    layout(Tab::Predict, &body)
}

fn yes_no(name: &str, question: &str) -> String {
    format!(
        "<label>{question}</label>\
         <input type=\"radio\" name=\"{name}\" value=\"Yes\" checked> Yes \
         <input type=\"radio\" name=\"{name}\" value=\"No\"> No"
    )
}

fn number(name: &str, label: &str, max: Option<f64>) -> String {
    let max = max.map(|m| format!(" max=\"{}\"", m)).unwrap_or_default();
    format!(
        "<label>{label}</label><input type=\"number\" name=\"{name}\" value=\"0\" \
         min=\"0\"{max} step=\"any\" required>"
    )
}

pub fn guided_form() -> String {
    let mut form = String::from(
        "<h2>🧠 Answer a few simple questions</h2>\
         <p class=\"info\">Smart input fills 13 of the model's 106 features and leaves the \
         rest at zero, so its score is an approximation for demonstration.</p>\
         <form method=\"post\" action=\"/predict/guided\">",
    );
    form.push_str(&number("amount", "Transaction Amount", None));
    form.push_str(&number("hour", "Hour of Transaction", Some(MAX_HOUR)));
    form.push_str(&yes_no("region_match", "Transaction in your usual region?"));
    form.push_str(&yes_no("frequent_today", "High usage today?"));
    form.push_str(&yes_no("known_merchant", "Merchant well known?"));
    let _ = write!(
        form,
        "<label>Contract Type</label><select name=\"contract\">\
         <option>{}</option><option>{}</option></select>",
        ContractType::CASH_LOANS,
        ContractType::REVOLVING_LOANS
    );
    form.push_str(
        "<label>Gender</label>\
         <input type=\"radio\" name=\"gender\" value=\"Male\" checked> Male \
         <input type=\"radio\" name=\"gender\" value=\"Female\"> Female",
    );
    form.push_str(&yes_no("own_car", "Do you own a car?"));
    form.push_str(&yes_no("own_realty", "Do you own real estate?"));
    form.push_str(&number("children", "Number of children", Some(MAX_CHILDREN)));
    form.push_str(&number("income", "Annual Income", None));
    form.push_str(&number("credit_amt", "Credit Amount", None));
    form.push_str(&number("annuity", "Annuity Amount", None));
    form.push_str("<p><button type=\"submit\">🔍 Predict</button></p></form>");
    form
}

/// Manual entry form; `values` re-fills previously entered slots
pub fn manual_form(values: &[String]) -> String {
    let mut form = String::from(
        "<h2>📂 Enter all 106 Features</h2>\
         <form method=\"post\" action=\"/predict/manual\"><div class=\"grid\">",
    );
    for slot in 0..FEATURE_COUNT {
        let value = values.get(slot).map(|v| escape(v)).unwrap_or_else(|| "0.0".to_string());
        let name = feature_name(slot);
        let _ = write!(
            form,
            "<div><label>Feature {name}</label><input type=\"number\" name=\"f{}\" \
             value=\"{value}\" step=\"0.01\"></div>",
            slot + 1
        );
    }
    form.push_str("</div><p><button type=\"submit\">🔍 Predict</button></p></form>");
    form
}

pub fn batch_form() -> String {
    String::from(
        "<h2>📁 Upload CSV File with F1 to F106</h2>\
         <form method=\"post\" action=\"/predict/batch\" enctype=\"multipart/form-data\">\
         <input type=\"file\" name=\"file\" accept=\".csv,text/csv\" required>\
         <p><button type=\"submit\">🔍 Predict</button></p></form>",
    )
}

pub fn result_block(result: &PredictionResult) -> String {
    let class = match result.label {
        Label::Fraudulent => "error",
        Label::Legitimate => "success",
    };
    let icon = match result.label {
        Label::Fraudulent => "🚨",
        Label::Legitimate => "✅",
    };
    format!(
        "<h2>🧾 Prediction Result</h2><p class=\"{class}\">{icon} {}</p>",
        escape(&result.verdict())
    )
}

pub fn error_block(message: &str) -> String {
    format!("<p class=\"error\">{}</p>", escape(message))
}

pub fn scored_table(scored: &ScoredBatch) -> String {
    let mut out = format!(
        "<h2>🧾 Batch Results</h2><p>{} rows scored, {} flagged as fraud.</p>\
         <div class=\"scroll\"><table><thead><tr>",
        scored.len(),
        scored.fraud_count()
    );
    for header in &scored.headers {
        let _ = write!(out, "<th>{}</th>", escape(header));
    }
    out.push_str("</tr></thead><tbody>");
    for row in &scored.rows {
        out.push_str("<tr>");
        for cell in &row.cells {
            let _ = write!(out, "<td>{}</td>", escape(cell));
        }
        let _ = write!(
            out,
            "<td>{}</td><td>{:.4}</td></tr>",
            row.prediction, row.fraud_probability
        );
    }
    out.push_str("</tbody></table></div>");
    out
}

pub fn chatbot_page(question: Option<&str>) -> String {
    let question = question.unwrap_or_default();
    let mut body = format!(
        "<h1>🤖 Credit Card Fraud Assistant</h1>\
         <form method=\"get\" action=\"/chatbot\">\
         <label>Ask anything about credit card fraud:</label>\
         <input type=\"text\" name=\"q\" value=\"{}\" size=\"60\"> \
         <button type=\"submit\">Ask</button></form>",
        escape(question)
    );
    if let Some(reply) = chatbot_reply(question) {
        let _ = write!(body, "<p class=\"info\">{}</p>", escape(reply));
    }
    layout(Tab::Chatbot, &body)
}

pub fn faq_page() -> String {
    let mut body = String::from("<h1>❓ Common Questions About Fraud</h1>");
    for (question, answer) in FAQ {
        let _ = write!(
            body,
            "<p><strong>{}</strong></p><p>{}</p>",
            escape(question),
            escape(answer)
        );
    }
    layout(Tab::Faq, &body)
}

pub fn about_page() -> String {
    let mut body = String::from("<h1>🏠 Credit Card Fraud Detection System</h1>");
    for (heading, text, bullets) in PROJECT_INFO {
        let _ = write!(body, "<h2>{}</h2>", escape(heading));
        if !text.is_empty() {
            let _ = write!(body, "<p>{}</p>", escape(text));
        }
        if !bullets.is_empty() {
            body.push_str("<ul>");
            for bullet in bullets {
                let _ = write!(body, "<li>{}</li>", escape(bullet));
            }
            body.push_str("</ul>");
        }
    }
    let _ = write!(
        body,
        "<p>Dataset: <a href=\"{0}\">{0}</a></p>",
        escape(DATASET_URL)
    );
    layout(Tab::About, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<a href=\"x\">&'"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_manual_form_has_every_slot() {
        let form = manual_form(&[]);
        assert!(form.contains("name=\"f1\""));
        assert!(form.contains("name=\"f106\""));
        assert!(!form.contains("name=\"f107\""));
        assert!(form.contains("value=\"0.0\""));
    }

    #[test]
    fn test_layout_marks_active_tab() {
        let page = faq_page();
        assert!(page.contains("<a href=\"/faq\" class=\"active\">"));
        assert!(page.contains("What is credit card fraud?"));
    }

    #[test]
    fn test_chatbot_page_escapes_question() {
        let page = chatbot_page(Some("<script>fraud</script>"));
        assert!(!page.contains("<script>"));
        assert!(page.contains("unauthorized use"));
    }
}
