/*
 * Responsibility
 * - The whole URL structure in one place
 * - The gate wraps everything nested under the protected prefix; public
 *   pages and the webhook stay outside it
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::access;
use crate::state::AppState;

use crate::api::handlers::{admin, health, lecturer, pages, student, webhooks};

pub fn routes(state: AppState) -> Router<AppState> {
    let dashboard = access::apply(dashboard_routes(), state);

    Router::new()
        .route("/", get(pages::home))
        .route("/health", get(health::health))
        .route("/login", get(pages::login))
        .route("/unauthorized", get(pages::unauthorized))
        .route("/api/webhooks/identity", post(webhooks::identity_event))
        .nest("/dashboard", dashboard)
}

fn dashboard_routes() -> Router<AppState> {
    let admin_area = admin_routes();

    Router::new()
        // The gate canonicalizes the bare root before this handler can run;
        // it exists so an unmatched root is never a 404.
        .route("/", get(pages::dashboard_root))
        .route("/student", get(student::home))
        .route("/student/assignments", get(student::list_assignments))
        .route(
            "/student/submissions",
            get(student::list_submissions).post(student::submit),
        )
        .route("/lecturer", get(lecturer::home))
        .route(
            "/lecturer/assignments",
            get(lecturer::list_assignments).post(lecturer::create_assignment),
        )
        .route(
            "/lecturer/assignments/{assignment_id}",
            get(lecturer::get_assignment)
                .put(lecturer::update_assignment)
                .delete(lecturer::delete_assignment),
        )
        .route("/lecturer/submissions", get(lecturer::list_submissions))
        .route(
            "/lecturer/submissions/{submission_id}/grade",
            post(lecturer::grade_submission),
        )
        // Superadmins get the same management surface; the gate keeps the
        // two areas separate by path.
        .nest("/admin", admin_area.clone())
        .nest("/superadmin", admin_area)
        .fallback(pages::not_found)
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::home))
        .route(
            "/faculties",
            get(admin::list_faculties).post(admin::create_faculty),
        )
        .route(
            "/faculties/{faculty_id}",
            put(admin::rename_faculty).delete(admin::delete_faculty),
        )
        .route(
            "/departments",
            get(admin::list_departments).post(admin::create_department),
        )
        .route(
            "/departments/{department_id}",
            put(admin::update_department).delete(admin::delete_department),
        )
        .route("/users", get(admin::list_users))
        .route(
            "/users/{user_doc_id}",
            get(admin::get_user).patch(admin::update_user),
        )
}
