pub mod error;
pub mod handlers;

use actix_web::{middleware, web, App, HttpServer};

use crate::analysis::RoastPipeline;

pub use error::ApiError;

/// Shared across request handlers.
pub struct AppState {
    pub pipeline: RoastPipeline,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::root))
        .route("/health", web::get().to(handlers::health))
        .route("/analyze", web::post().to(handlers::analyze_activity))
        .route("/generate-roasts", web::post().to(handlers::generate_roasts))
        .route(
            "/analyze-roast-potential",
            web::post().to(handlers::analyze_roast_potential),
        )
        // Static suffix before the bare parameterized path
        .route("/roast/{username}/latest", web::get().to(handlers::latest_roast))
        .route("/roast/{username}", web::get().to(handlers::roast_user));
}

pub async fn run(state: AppState, host: &str, port: u16) -> std::io::Result<()> {
    let state = web::Data::new(state);
    tracing::info!("Starting gitshame server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind((host, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests;
