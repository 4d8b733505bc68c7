//! Middleware Module
//!
//! HTTP middleware run before handlers.
//!
//! - **`auth`** - bearer-token authentication for protected routes
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use schoolhub::backend::auth::handlers::get_me;
//! use schoolhub::backend::middleware::auth_middleware;
//! use schoolhub::backend::server::AppState;
//!
//! # fn example(state: AppState) {
//! let protected: Router<AppState> = Router::new()
//!     .route("/api/me", get(get_me))
//!     .route_layer(middleware::from_fn_with_state(state, auth_middleware));
//! # }
//! ```

pub mod auth;

pub use auth::{auth_middleware, bearer_token, AuthUser, AuthenticatedUser};
