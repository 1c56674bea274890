pub mod handlers;
pub mod types;


use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::editor::{EditorHandle, InvoiceEditor};
use crate::print::{FilePrintSink, PrintSink};
use crate::render::RenderOptions;

pub use handlers::health_check;
pub use types::*;

/// Application state shared by all route handlers.
///
/// The invoice itself is not in here: it lives in the editor task and is
/// only reached through `editor`.
#[derive(Clone)]
pub struct AppState {
    /// Serialized access to the editing session
    pub editor: EditorHandle,

    /// Presentation settings for previews and printouts
    pub render_options: Arc<RenderOptions>,

    /// Where printed documents go
    pub sink: Arc<dyn PrintSink>,

    /// Logo upload size limit (None = unlimited)
    pub logo_max_bytes: Option<usize>,
}

impl AppState {
    /// Starts a fresh editor session and wires it to a file print sink.
    ///
    /// # Returns
    ///
    /// The state plus the editor task's join handle.
    pub fn from_config(config: &AppConfig) -> (Self, JoinHandle<InvoiceEditor>) {
        let sink: Arc<dyn PrintSink> = Arc::new(FilePrintSink::new(&config.print_output_dir));
        Self::with_sink(config, InvoiceEditor::new(), sink)
    }

    /// Like [`AppState::from_config`] with an explicit editor and sink.
    pub fn with_sink(
        config: &AppConfig,
        editor: InvoiceEditor,
        sink: Arc<dyn PrintSink>,
    ) -> (Self, JoinHandle<InvoiceEditor>) {
        let (editor, task) =
            EditorHandle::spawn(editor, config.editor_queue_depth, config.logo_max_bytes);
        let state = Self {
            editor,
            render_options: Arc::new(RenderOptions::from(config)),
            sink,
            logo_max_bytes: config.logo_max_bytes,
        };
        (state, task)
    }
}

/// Creates the application router.
///
/// # Arguments
///
/// * `state` - The application state holding the editor handle
///
/// # Returns
///
/// Returns a configured Axum Router.
pub fn create_router(state: AppState) -> Router {
    let logo_limit = match state.logo_max_bytes {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/invoice", get(handlers::get_invoice_handler))
        .route("/invoice/reset", post(handlers::reset_handler))
        .route("/invoice/issuer", put(handlers::issuer_handler))
        .route("/invoice/billed-to", put(handlers::billed_to_handler))
        .route("/invoice/details", put(handlers::details_handler))
        .route("/invoice/items", post(handlers::add_item_handler))
        .route(
            "/invoice/items/:index",
            patch(handlers::update_item_handler).delete(handlers::remove_item_handler),
        )
        .route("/invoice/total", get(handlers::total_handler))
        .route(
            "/invoice/logo",
            post(handlers::upload_logo_handler)
                .delete(handlers::clear_logo_handler)
                .layer(logo_limit),
        )
        .route("/invoice/preview", get(handlers::preview_handler))
        .route("/invoice/print", post(handlers::print_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
