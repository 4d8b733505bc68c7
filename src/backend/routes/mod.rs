//! Route Configuration Module
//!
//! - **`router`** - Main router creation, layers and fallback
//! - **`api_routes`** - REST endpoints under `/api`
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - API endpoint routes
//! ```

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
