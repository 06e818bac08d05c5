mod config;
mod services;
mod state;
mod supabase;

use crate::state::{RelayState, SharedStore};
use crate::supabase::SupabaseStore;
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{error, info};
use mime_guess::from_path;
use std::io;
use std::sync::Arc;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

/// Serves the embedded browser client, falling back to `index.html` so the
/// page can be reloaded with its query string (e.g. `/?admin=1`).
async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match config::load() {
        Ok(config) => config,
        Err(err) => {
            error!("refusing to start: {err}");
            return Err(io::Error::new(io::ErrorKind::InvalidInput, err.to_string()));
        }
    };

    let store: SharedStore = Arc::new(SupabaseStore::new(&config.store));
    let relay_state = RelayState::new(store);

    info!(
        "Relay running at {} (table {})",
        config.bind_url(),
        config.store.table
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .app_data(web::Data::new(relay_state.clone()))
            .service(services::businesses::configure_routes())
            .route("/health", web::get().to(services::health::process))
            .default_service(web::route().to(serve_embedded))
    })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
