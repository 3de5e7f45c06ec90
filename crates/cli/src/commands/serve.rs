use anyhow::{Context, Result};
use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
};
use site_kit_core::config::{Config, SiteConfig};
use site_kit_core::intake;
use site_kit_core::{ContactRequest, ContactResponse, ResponseMode};
use site_kit_navigation::{Navigation, current_year, navigation};
use site_kit_notifier::{DiscordNotifier, Notifier, forward_detached};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::load_config;

#[derive(Clone)]
pub struct AppState {
    mode: ResponseMode,
    notifier: Arc<dyn Notifier>,
    forward_timeout: Duration,
    site: SiteConfig,
}

impl AppState {
    pub fn new(config: &Config, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            mode: config.contact.mode.clone(),
            notifier,
            forward_timeout: config.contact.forward_timeout,
            site: config.site.clone(),
        }
    }
}

/// Start the site server.
///
/// This command:
/// - Loads site.toml (defaults when missing) plus Discord secrets from the environment
/// - Mounts the contact endpoint on `contact.path`
/// - Serves navigation data at `/api/navigation`
/// - Serves the built site from `site_dir`, if given
pub async fn run(config_path: PathBuf, port: u16, site_dir: Option<PathBuf>) -> Result<()> {
    println!("🌐 Starting site server...");

    let config = load_config(&config_path)?;

    if let Some(dir) = &site_dir
        && !dir.is_dir()
    {
        anyhow::bail!("Site directory does not exist: {}", dir.display());
    }

    if config.discord.channel_id.is_none() {
        tracing::warn!("DISCORD_CHANNEL_ID is not set; submissions will not be forwarded");
    }

    let client = DiscordNotifier::default_client().context("Failed to build HTTP client")?;
    let notifier: Arc<dyn Notifier> = Arc::new(DiscordNotifier::new(client, &config.discord));

    let contact_path = config.contact.path.clone();
    let state = AppState::new(&config, notifier);
    let app = router(state, &contact_path, site_dir.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("   ✓ Contact endpoint: {}", contact_path);
    if let Some(dir) = &site_dir {
        println!("   ✓ Serving site from: {}", dir.display());
    }
    println!("\n🚀 Listening on: http://localhost:{}", port);
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Build the application router
pub fn router(state: AppState, contact_path: &str, site_dir: Option<&Path>) -> Router {
    let app = Router::new()
        .route(contact_path, any(contact_handler))
        .route("/api/navigation", get(navigation_handler));

    let app = match site_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Contact form endpoint. Any method is routed here so the intake decides on 405.
async fn contact_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = ContactRequest {
        method: method.as_str().to_string(),
        headers: headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect(),
        body: body.to_vec(),
    };

    let (response, submission) = intake::handle(&request, &state.mode).into_parts();

    // Delivery runs after the response is sent and never changes it
    if let Some(submission) = submission {
        forward_detached(state.notifier.clone(), submission, state.forward_timeout);
    }

    into_http(response)
}

async fn navigation_handler(State(state): State<AppState>) -> Json<Navigation> {
    Json(navigation(&state.site, current_year()))
}

fn into_http(response: ContactResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut builder = axum::http::Response::builder().status(status);
    for (name, value) in &response.headers {
        builder = builder.header(name, value);
    }

    builder.body(Body::from(response.body)).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to build contact response");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}
