pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::drives::handlers as drives;
use crate::imports::handlers as imports;
use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::students::handlers as students;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Invites and self-service
        .route("/api/v1/invites/accept", post(students::handle_accept_invite))
        .route(
            "/api/v1/me/profile",
            get(students::handle_get_own_profile).patch(students::handle_update_own_profile),
        )
        .route(
            "/api/v1/me/notifications",
            get(students::handle_list_own_notifications),
        )
        // Companies
        .route(
            "/api/v1/companies",
            get(drives::handle_list_companies).post(drives::handle_create_company),
        )
        .route("/api/v1/companies/:id", get(drives::handle_get_company))
        // Drives
        .route(
            "/api/v1/drives",
            get(drives::handle_list_drives).post(drives::handle_create_drive),
        )
        .route(
            "/api/v1/drives/:id",
            get(drives::handle_get_drive).patch(drives::handle_update_drive),
        )
        // Applications
        .route(
            "/api/v1/drives/:id/applications",
            get(applications::handle_list_applicants).post(applications::handle_apply),
        )
        .route(
            "/api/v1/drives/:id/applications/bulk-update",
            post(applications::handle_bulk_status_update),
        )
        .route(
            "/api/v1/applications",
            get(applications::handle_list_own_applications),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handle_update_status),
        )
        // Roster
        .route(
            "/api/v1/students/bulk-invite",
            post(imports::handle_bulk_invite),
        )
        .route("/api/v1/students", get(students::handle_list_students))
        .route("/api/v1/students/:id", get(students::handle_get_student))
        // Resume analysis
        .route(
            "/api/v1/resumes/analyze",
            post(resumes::handle_analyze_resume),
        )
        .with_state(state)
}
