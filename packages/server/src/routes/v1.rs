use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/assignments", assignment_routes())
        .nest("/courses", course_routes())
        .nest("/users", user_routes())
}

fn assignment_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::assignment::create_assignment))
        .routes(routes!(handlers::assignment::submit_assignment))
        .routes(routes!(handlers::assignment::complete_assignment))
        .routes(routes!(handlers::assignment::get_assignment))
}

fn course_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::course::list_course_assignments))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::user::get_user_progress))
}
