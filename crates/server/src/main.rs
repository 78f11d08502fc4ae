mod error;
mod guard;
mod routes;

use anyhow::Context;
use db::DBService;
use services::services::{
    auth::AuthService, config::Config, content::ContentService, events::EventBus,
    storage::StorageService,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

/// Shared handles for every route. Cheap to clone; the pool and session map
/// are internally reference-counted.
#[derive(Clone)]
pub struct AppState {
    db: DBService,
    auth: AuthService,
    content: ContentService,
    bus: EventBus,
}

impl AppState {
    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn content(&self) -> &ContentService {
        &self.content
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    utils::log::init();

    let config = Config::from_env();
    let db = DBService::new(&config.database_url)
        .await
        .context("opening database")?;
    let bus = EventBus::default();
    let storage = StorageService::new(&config.asset_root, &config.public_base_url);
    let auth = AuthService::new(db.pool.clone(), &config.admin_email);
    let content = ContentService::new(db.pool.clone(), bus.clone(), storage);

    let state = AppState { db, auth, content, bus };

    let app = axum::Router::new()
        .nest("/api", routes::router(&state))
        .nest_service("/assets", ServeDir::new(&config.asset_root))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
