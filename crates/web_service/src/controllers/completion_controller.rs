use actix_web::{post, web, HttpResponse};
use completion_client::CompletionError;

use crate::capability::Capability;
use crate::dto::CompletionRequestBody;
use crate::error::AppError;
use crate::server::AppState;

fn map_completion_error(err: CompletionError, capability: Capability) -> AppError {
    match err {
        CompletionError::InvalidRequest(_) => AppError::InvalidInput,
        CompletionError::RateLimited(message) => AppError::RateLimited(message),
        CompletionError::EmptyResponse => {
            AppError::UpstreamFailure(capability.fallback_message().to_string())
        }
        CompletionError::Upstream { message } => AppError::UpstreamFailure(
            message.unwrap_or_else(|| capability.fallback_message().to_string()),
        ),
    }
}

async fn relay(
    app_state: &AppState,
    capability: Capability,
    body: CompletionRequestBody,
) -> Result<HttpResponse, AppError> {
    let text = body.validated()?;
    let messages = capability.messages(&text);

    let content = app_state
        .completion_client
        .complete(&messages, capability.params())
        .await
        .map_err(|err| {
            log::error!("{capability:?} completion failed: {err}");
            map_completion_error(err, capability)
        })?;

    // The content string is the whole body, no envelope object.
    Ok(HttpResponse::Ok().json(content))
}

#[post("/summary")]
pub async fn summary(
    app_state: web::Data<AppState>,
    body: web::Json<CompletionRequestBody>,
) -> Result<HttpResponse, AppError> {
    relay(&app_state, Capability::Summary, body.into_inner()).await
}

#[post("/paragraph")]
pub async fn paragraph(
    app_state: web::Data<AppState>,
    body: web::Json<CompletionRequestBody>,
) -> Result<HttpResponse, AppError> {
    relay(&app_state, Capability::Paragraph, body.into_inner()).await
}

#[post("/chatbot")]
pub async fn chatbot(
    app_state: web::Data<AppState>,
    body: web::Json<CompletionRequestBody>,
) -> Result<HttpResponse, AppError> {
    relay(&app_state, Capability::Chatbot, body.into_inner()).await
}

#[post("/js-converter")]
pub async fn js_converter(
    app_state: web::Data<AppState>,
    body: web::Json<CompletionRequestBody>,
) -> Result<HttpResponse, AppError> {
    relay(&app_state, Capability::JsConvert, body.into_inner()).await
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(summary)
        .service(paragraph)
        .service(chatbot)
        .service(js_converter);
}
