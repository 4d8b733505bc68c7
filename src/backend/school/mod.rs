//! School Records
//!
//! CRUD over the school collections plus the dashboards that join them.
//!
//! # Module Structure
//!
//! ```text
//! school/
//! ├── mod.rs          - Module exports and documentation
//! ├── resources.rs    - One descriptor per collection (shape, label, order)
//! ├── handlers.rs     - Generic list/get/create/update/delete handlers
//! └── dashboards.rs   - Dashboards, grade listings, per-teacher listings
//! ```

pub mod dashboards;
pub mod handlers;
pub mod resources;

pub use resources::{Classrooms, Documents, Exams, Grades, Resource, Students, Subjects, Teachers};
