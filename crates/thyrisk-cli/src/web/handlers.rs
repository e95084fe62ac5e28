//! HTTP request handlers

use axum::extract::State;
use maud::Markup;

use super::error::AppError;
use super::form::SubmittedForm;
use super::pages;
use super::AppState;

/// `GET /`: the empty input form.
pub async fn home(State(state): State<AppState>) -> Markup {
    log::info!("GET / (variant={})", state.pipeline.variant());
    pages::form_page(state.pipeline.table(), state.pipeline.variant())
}

/// `POST /predict`: encode the submitted form, run the model, render the result.
pub async fn predict(
    State(state): State<AppState>,
    SubmittedForm(form): SubmittedForm,
) -> Result<Markup, AppError> {
    log::info!("POST /predict with {} field(s)", form.len());

    let assessment = state.pipeline.assess(&form)?;
    log::info!(
        "Prediction: {} (label {})",
        assessment.prediction.as_str(),
        assessment.label
    );
    Ok(pages::result_page(&assessment))
}

pub async fn health() -> &'static str {
    "ok"
}
