use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use completion_client::{CompletionClient, CompletionClientTrait, Config};
use log::{error, info};

use crate::config::ServiceConfig;
use crate::controllers::{completion_controller, system_controller};
use crate::middleware::AuthMiddleware;

pub struct AppState {
    pub completion_client: Arc<dyn CompletionClientTrait>,
}

const DEFAULT_WORKER_COUNT: usize = 10;

/// Route table: `/api/v1/health` is always open; the completion endpoints
/// sit behind the bearer gate (open when no token is configured).
pub fn app_config(service_config: ServiceConfig) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        // Missing or non-string `text` fails typed deserialization; keep the
        // error body in the same {"message": ...} shape as everything else.
        cfg.app_data(
            web::JsonConfig::default()
                .error_handler(|_err, _req| crate::error::AppError::InvalidInput.into()),
        )
        .service(
            web::scope("/api/v1")
                .configure(system_controller::config)
                .service(
                    web::scope("/openai")
                        .wrap(AuthMiddleware::new(service_config.auth_token))
                        .configure(completion_controller::config),
                ),
        );
    }
}

pub async fn run(port: u16) -> Result<(), String> {
    info!("Starting web service...");

    let config = Config::new();
    let completion_client: Arc<dyn CompletionClientTrait> = Arc::new(
        CompletionClient::new(config)
            .map_err(|e| format!("Failed to build completion client: {e}"))?,
    );
    let service_config = ServiceConfig::from_env();
    if service_config.auth_token.is_some() {
        info!("Bearer auth gate enabled on completion endpoints");
    }

    let app_state = web::Data::new(AppState { completion_client });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Cors::permissive())
            .configure(app_config(service_config.clone()))
    })
    .workers(DEFAULT_WORKER_COUNT)
    .bind(format!("127.0.0.1:{port}"))
    .map_err(|e| format!("Failed to bind server: {e}"))?
    .run();

    info!("Starting web service on http://127.0.0.1:{port}");

    if let Err(e) = server.await {
        error!("Web server error: {}", e);
        return Err(format!("Web server error: {e}"));
    }

    Ok(())
}
