/**
 * API Route Configuration
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /api/login` - credentials → JWT
 * - `GET /api/me` - current user (requires `Authorization: Bearer`)
 *
 * ## Messaging
 * - `GET /api/messages/threads/{userId}`
 * - `POST /api/messages/thread`
 * - `POST /api/messages/thread/{threadId}/messages`
 * - `PATCH /api/messages/thread/{threadId}/read`
 * - `GET /api/messages/conversation/{userId1}/{userId2}`
 * - `POST /api/messages`
 * - `GET /api/messages/recent/{userId}`
 *
 * ## Presence
 * - `GET /api/presence/{userId}`
 *
 * ## School records
 * - list/create at `/api/<resource>`, get/update/delete at `/api/<resource>/{id}`
 *   for students, teachers, classrooms, subjects, documents and exams
 * - dashboards, grade listings and per-teacher listings
 */

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::backend::auth::{get_me, login};
use crate::backend::liveness::get_presence;
use crate::backend::messaging::handlers as messages;
use crate::backend::middleware::auth_middleware;
use crate::backend::school::dashboards;
use crate::backend::school::handlers::{create, delete, get_one, list, update};
use crate::backend::school::{
    Classrooms, Documents, Exams, Grades, Resource, Students, Subjects, Teachers,
};
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// `state` is needed up front for the authentication layer of `/api/me`.
pub fn configure_api_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    let router = configure_auth_routes(router, state);
    let router = configure_message_routes(router);
    let router = configure_school_routes(router);
    router.route("/api/presence/{user_id}", get(get_presence))
}

fn configure_auth_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    let protected: Router<AppState> = Router::new()
        .route("/api/me", get(get_me))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    router.route("/api/login", post(login)).merge(protected)
}

fn configure_message_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/messages", post(messages::send_message))
        .route("/api/messages/threads/{user_id}", get(messages::list_threads))
        .route("/api/messages/thread", post(messages::open_thread))
        .route(
            "/api/messages/thread/{thread_id}/messages",
            post(messages::send_in_thread),
        )
        .route("/api/messages/thread/{thread_id}/read", patch(messages::mark_read))
        .route(
            "/api/messages/conversation/{user_id1}/{user_id2}",
            get(messages::get_conversation),
        )
        .route("/api/messages/recent/{user_id}", get(messages::recent_messages))
}

/// list/create and get/update/delete for one resource
fn resource_routes<R: Resource>(router: Router<AppState>, base: &str) -> Router<AppState> {
    router
        .route(base, get(list::<R>).post(create::<R>))
        .route(
            &format!("{}/{{id}}", base),
            get(get_one::<R>).put(update::<R>).delete(delete::<R>),
        )
}

fn configure_school_routes(router: Router<AppState>) -> Router<AppState> {
    let router = resource_routes::<Students>(router, "/api/students");
    let router = resource_routes::<Teachers>(router, "/api/teachers");
    let router = resource_routes::<Classrooms>(router, "/api/classrooms");
    let router = resource_routes::<Subjects>(router, "/api/subjects");
    let router = resource_routes::<Documents>(router, "/api/documents");
    let router = resource_routes::<Exams>(router, "/api/exams");

    router
        .route("/api/students/dashboard/{id}", get(dashboards::student_dashboard))
        .route("/api/students/{id}/grades", get(dashboards::student_grades))
        .route("/api/teachers/dashboard/{id}", get(dashboards::teacher_dashboard))
        .route("/api/teachers/grades", post(create::<Grades>))
        .route(
            "/api/teachers/classroom/{classroom_id}/grades",
            get(dashboards::classroom_grades),
        )
        .route(
            "/api/documents/teacher/{teacher_id}",
            get(dashboards::documents_by_teacher),
        )
        .route("/api/exams/teacher/{teacher_id}", get(dashboards::exams_by_teacher))
        .route("/api/exams/samples", get(dashboards::exam_samples))
}
