use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/problems", problem_routes())
        .nest("/submissions", submission_routes())
}

fn problem_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::submission::create_submission,
        handlers::submission::list_problem_submissions
    ))
}

fn submission_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::submission::get_submission,
            handlers::submission::resubmit_solution,
            handlers::submission::delete_submission
        ))
        .routes(routes!(handlers::submission::add_comment))
}
