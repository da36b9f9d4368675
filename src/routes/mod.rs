pub mod auth;
pub mod equipment;
pub mod health;
pub mod sets;
pub mod user;
pub mod validation;
pub mod workouts;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

pub use auth::{login, logout, register};
pub use equipment::{create_equipment, delete_equipment, list_equipment, update_equipment};
pub use health::health_check;
pub use sets::{create_set, delete_set, list_sets, update_set};
pub use user::{get_preferences, get_user, update_preferences, update_user};
pub use workouts::{
    delete_workout, in_progress_workout, list_workouts, start_workout, update_workout,
};

use crate::AppState;

/// Build the application router with all endpoints
pub fn router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health_check))
        // Authentication
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        // Equipment
        .route(
            "/api/equipment",
            get(list_equipment).post(create_equipment),
        )
        .route(
            "/api/equipment/:id",
            put(update_equipment).delete(delete_equipment),
        )
        // Workouts
        .route("/api/workouts", get(list_workouts))
        .route("/api/workout", post(start_workout))
        .route("/api/workout/inprogress", get(in_progress_workout))
        .route("/api/workout/:id", put(update_workout).delete(delete_workout))
        .route("/api/workout/:id/sets", get(list_sets))
        // Sets
        .route("/api/set", post(create_set))
        .route("/api/set/:id", put(update_set).delete(delete_set))
        // User
        .route("/api/user", get(get_user).put(update_user))
        .route(
            "/api/user/preferences",
            get(get_preferences).put(update_preferences),
        )
        .layer(upload_limit)
        .with_state(state)
}
