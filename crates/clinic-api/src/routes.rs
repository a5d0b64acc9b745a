//! Router assembly.
//!
//! All routes require bearer token authentication. Middleware uses
//! `Extension<AppContext>` (injected as the outermost layer); handlers use
//! `State<AppContext>` provided via `with_state`.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::auth;
use crate::handlers;
use crate::state::AppContext;

/// Build the clinic API router.
pub fn router(ctx: AppContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    Router::new()
        .route("/patients", post(handlers::patients::create).get(handlers::patients::list))
        .route(
            "/patients/:id",
            get(handlers::patients::get)
                .put(handlers::patients::update)
                .delete(handlers::patients::delete),
        )
        .route("/queues", post(handlers::queues::enqueue).get(handlers::queues::list_active))
        .route("/queues/:id/start", patch(handlers::queues::start))
        .route("/queues/:id/complete", patch(handlers::queues::complete))
        .route("/queues/:id", delete(handlers::queues::remove))
        .route("/visits", get(handlers::visits::list))
        .route(
            "/visits/:id",
            get(handlers::visits::get)
                .put(handlers::visits::update)
                .delete(handlers::visits::delete),
        )
        .route(
            "/prescriptions",
            post(handlers::prescriptions::create).get(handlers::prescriptions::list),
        )
        .route(
            "/prescriptions/:id",
            get(handlers::prescriptions::get)
                .put(handlers::prescriptions::update)
                .delete(handlers::prescriptions::delete),
        )
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(auth::require_auth))
        // Extension must be outermost so the auth middleware sees AppContext
        .layer(axum::Extension(ctx))
}
