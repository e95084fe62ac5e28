//! HTML pages rendered with maud.
use maud::{html, Markup, PreEscaped, DOCTYPE};

use thyrisk_classifiers::encoding::{EncodingTable, FieldEncoding};
use thyrisk_classifiers::pipeline::Assessment;
use thyrisk_classifiers::schema::{Variant, FEATURE_NAMES};

const STYLE: &str = "
body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }
.field { display: flex; justify-content: space-between; margin: 0.4rem 0; }
.result { font-size: 1.25rem; padding: 1rem; border-radius: 5px; }
.no-recurrence { background-color: #e6f4ea; }
.recurrence { background-color: #fce8e6; }
.error { background-color: #fff4e5; }
";

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                main { (body) }
            }
        }
    }
}

fn field_id(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// The input form: one control per feature, in training order.
pub fn form_page(table: &EncodingTable, variant: Variant) -> Markup {
    layout(
        "Thyroid Cancer Recurrence",
        html! {
            h1 { "Thyroid Cancer Recurrence Prediction" }
            form method="post" action="/predict" data-variant=(variant.as_str()) {
                @for name in FEATURE_NAMES {
                    div class="field" {
                        label for=(field_id(name)) { (name) }
                        @match table.field(name) {
                            FieldEncoding::Categorical(_) => {
                                select id=(field_id(name)) name=(name) {
                                    option value="" { "-- select --" }
                                    @for label in table.labels(name) {
                                        option value=(label) { (label) }
                                    }
                                }
                            }
                            FieldEncoding::Numeric => {
                                input type="number" step="any" id=(field_id(name)) name=(name);
                            }
                        }
                    }
                }
                button type="submit" { "Predict" }
            }
        },
    )
}

pub fn result_page(assessment: &Assessment) -> Markup {
    let class = if assessment.prediction.is_recurrence() {
        "result recurrence"
    } else {
        "result no-recurrence"
    };
    layout(
        "Prediction Result",
        html! {
            h1 { "Prediction Result" }
            p class=(class) { (assessment.message()) }
            @if !assessment.defaults.is_empty() {
                details {
                    summary { (assessment.defaults.len()) " field(s) defaulted to 0" }
                    ul {
                        @for default in &assessment.defaults {
                            li { (default.field) ": " (default.outcome.as_str()) }
                        }
                    }
                }
            }
            a href="/" { "Back to form" }
        },
    )
}

pub fn error_page(message: &str) -> Markup {
    layout(
        "Prediction Failed",
        html! {
            h1 { "Prediction Failed" }
            p class="result error" { (message) }
            a href="/" { "Back to form" }
        },
    )
}
