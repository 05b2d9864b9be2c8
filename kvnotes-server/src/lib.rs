pub mod error;
pub mod routes;

// Re-export the core types handlers and binaries need.
pub use kvnotes_core::{
    load_settings, settings_file_path, FileBackend, KvBackend, MemoryBackend, NotesError,
    NotesStore, Result, SessionCodec, Settings,
};

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub use error::ApiError;

/// Shared by every request handler.
pub struct AppState<B> {
    pub store: Arc<NotesStore<B>>,
    pub sessions: Arc<SessionCodec>,
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<B: KvBackend> AppState<B> {
    pub fn new(store: NotesStore<B>, sessions: SessionCodec) -> Self {
        Self {
            store: Arc::new(store),
            sessions: Arc::new(sessions),
        }
    }
}

/// Builds the HTTP routes over `state`.
pub fn router<B: KvBackend + 'static>(state: AppState<B>) -> Router {
    use routes::*;

    Router::new()
        .route("/", get(home::<B>))
        .route(
            "/categories",
            get(list_categories::<B>).post(create_category::<B>),
        )
        .route(
            "/categories/{category_id}",
            get(show_category::<B>).post(create_note::<B>),
        )
        .route("/categories/{category_id}/edit", post(edit_category::<B>))
        .route(
            "/categories/{category_id}/destroy",
            post(destroy_category::<B>),
        )
        .route(
            "/categories/{category_id}/notes/{note_id}",
            get(show_note::<B>).post(create_sibling_note::<B>),
        )
        .route(
            "/categories/{category_id}/notes/{note_id}/edit",
            post(edit_note::<B>),
        )
        .route(
            "/categories/{category_id}/notes/{note_id}/destroy",
            post(destroy_note::<B>),
        )
        .with_state(state)
}

/// Opens the file-backed store described by `settings` and serves it until Ctrl-C.
///
/// # Errors
///
/// Returns [`NotesError::InvalidSession`] if the cookie settings are unusable,
/// or [`NotesError::Io`] if the listener cannot be bound.
pub async fn serve(settings: Settings) -> Result<()> {
    let sessions = SessionCodec::new(
        settings.cookie_name.clone(),
        settings.session_secret_or_random(),
    )?;
    let store = NotesStore::new(FileBackend::new(&settings.data_directory));
    let app = router(AppState::new(store, sessions));

    let listener = tokio::net::TcpListener::bind(&settings.bind_address).await?;
    log::info!(
        "kvnotes listening on {} (data in {})",
        settings.bind_address,
        settings.data_directory.display()
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("kvnotes stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("failed to listen for Ctrl-C: {e}");
    }
}
