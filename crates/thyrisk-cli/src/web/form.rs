//! Lenient form extraction for `POST /predict`.
//!
//! Browsers and scripts submit the form either url-encoded or as
//! multipart. Anything else, including a request with no body or no content
//! type, reads as an empty form so every field falls back to its default.
use std::convert::Infallible;

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header;

use thyrisk_classifiers::assembler::FormInput;

const URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";

/// Submitted fields; a repeated name keeps its first value.
#[derive(Debug, Clone, Default)]
pub struct SubmittedForm(pub FormInput);

impl<S> FromRequest<S> for SubmittedForm
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let media_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(media_type)
            .unwrap_or_default();

        let form = match media_type.as_str() {
            URLENCODED => read_urlencoded(req, state).await,
            MULTIPART => read_multipart(req, state).await,
            "" => FormInput::new(),
            other => {
                log::warn!("Ignoring {} body; treating the form as empty", other);
                FormInput::new()
            }
        };
        Ok(SubmittedForm(form))
    }
}

/// `Multipart/Form-Data; boundary=x` -> `multipart/form-data`
fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

async fn read_urlencoded<S: Send + Sync>(req: Request, state: &S) -> FormInput {
    match Bytes::from_request(req, state).await {
        Ok(body) => form_urlencoded::parse(&body).collect(),
        Err(e) => {
            log::warn!("Failed to read form body: {}", e);
            FormInput::new()
        }
    }
}

async fn read_multipart<S: Send + Sync>(req: Request, state: &S) -> FormInput {
    let mut multipart = match Multipart::from_request(req, state).await {
        Ok(multipart) => multipart,
        Err(e) => {
            log::warn!("Failed to read multipart form: {}", e);
            return FormInput::new();
        }
    };

    let mut fields: Vec<(String, String)> = Vec::new();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                // Uploaded files are not form fields.
                if field.file_name().is_some() {
                    continue;
                }
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                match field.text().await {
                    Ok(value) => fields.push((name, value)),
                    Err(e) => {
                        log::warn!("Dropping unreadable multipart field {}: {}", name, e);
                        break;
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                log::warn!("Stopped reading multipart form: {}", e);
                break;
            }
        }
    }
    fields.into_iter().collect()
}
