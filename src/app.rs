/*
 * Responsibility
 * - Config -> dependencies -> Router
 * - the demo resource graph (users / posts / announcements), its seed data and guards
 * - middleware order (http outermost, auth around v1)
 * - start axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{AuthSettings, Config};
use crate::middleware;
use crate::policy::{OwnershipGuard, OwnershipRule};
use crate::repos::{MemoryStorer, Storer};
use crate::resource::{Item, Payload, Resource, ResourceConf, ResourceIndex};
use crate::services::auth::{TokenSigner, build_auth_service};
use crate::state::AppState;

pub const DEMO_USERS: [&str; 2] = ["jack", "john"];

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // RUST_LOG=info,rest_jwt_auth=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {} ({:?})",
        config.app_env,
        config.addr,
        config.auth
    );

    let state = build_state(&config.auth).await?;
    if !config.app_env.is_production() {
        log_demo_tokens(&config.auth);
    }

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Backing stores of the demo graph. In-memory unless replaced (tests swap
/// in failing ones).
pub struct Storers {
    pub users: Arc<dyn Storer>,
    pub posts: Arc<dyn Storer>,
    pub announcements: Arc<dyn Storer>,
}

impl Default for Storers {
    fn default() -> Self {
        Self {
            users: Arc::new(MemoryStorer::new()),
            posts: Arc::new(MemoryStorer::new()),
            announcements: Arc::new(MemoryStorer::new()),
        }
    }
}

pub async fn build_state(settings: &AuthSettings) -> Result<AppState> {
    build_state_with(settings, Storers::default()).await
}

/// Wire the resource graph and the auth layer.
///
/// Seed data goes straight to the storers before any guard exists; guards
/// are attached last, once the auth service (which reads `users`) is built.
pub async fn build_state_with(settings: &AuthSettings, storers: Storers) -> Result<AppState> {
    seed(&storers).await?;

    let mut index = ResourceIndex::new();
    let users = index.bind(Resource::new(
        "users",
        storers.users,
        ResourceConf::read_write(),
    ))?;
    let posts = index.bind(Resource::new(
        "posts",
        storers.posts,
        ResourceConf::read_write(),
    ))?;
    index.bind_sub("users", posts.clone(), "user")?;
    // public: no guard
    index.bind(Resource::new(
        "announcements",
        storers.announcements,
        ResourceConf::read_only(),
    ))?;

    // users -> guard -> auth -> users is a reference cycle; the graph lives
    // as long as the process, so it is never freed.
    let auth = build_auth_service(settings, users.clone());

    let rules = [
        (&users, OwnershipRule::new("users", "id")),
        (&posts, OwnershipRule::new("posts", "user")),
    ];
    for (resource, rule) in rules {
        tracing::debug!(resource = %rule.resource, owner_field = %rule.owner_field, "ownership guard attached");
        resource.use_hook(Arc::new(OwnershipGuard::new(rule, auth.clone())));
    }

    Ok(AppState::new(auth, Arc::new(index)))
}

async fn seed(storers: &Storers) -> Result<()> {
    let users = DEMO_USERS
        .iter()
        .map(|id| Item::new(*id, payload(json!({ "name": id }))))
        .collect::<Vec<_>>();
    storers.users.insert(&users).await?;

    storers
        .announcements
        .insert(&[Item::new(
            "welcome",
            payload(json!({ "title": "Welcome", "body": "Announcements are public." })),
        )])
        .await?;

    tracing::info!(users = users.len(), "seed data loaded");
    Ok(())
}

fn payload(value: serde_json::Value) -> Payload {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Payload::new(),
    }
}

fn log_demo_tokens(settings: &AuthSettings) {
    let signer = TokenSigner::from_settings(settings);
    for user in DEMO_USERS {
        match signer.token_for(&settings.subject_claim, user) {
            Ok(token) => tracing::info!(user, "demo token: {token}"),
            Err(err) => tracing::warn!(user, error = %err, "could not sign demo token"),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let v1 = api::v1::routes();
    let v1 = middleware::auth::access::apply(v1, state.clone());

    let router = Router::new().nest("/api/v1", v1).with_state(state);
    middleware::http::apply(router)
}
