use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::state::AppState;

pub mod auth;
pub mod department;
pub mod event;
pub mod milestone;
pub mod task;
pub mod user;

pub fn api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes(state.clone()))
        // `nest` does not match the bare trailing-slash form against the
        // nested "/" route, so register it explicitly.
        .route("/events/", post(event::create_event))
        .nest("/events", event_routes(state.clone()))
        .nest("/user", user_routes(state.clone()))
        .with_state(state)
}

fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::sign_up))
        .route("/signin", post(auth::sign_in))
        .with_state(state)
}

fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/me/events/{event_id}/role",
            get(user::get_my_role_in_event),
        )
        .with_state(state)
}

fn event_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // ! events
        .route("/public", get(event::list_public_events))
        .route("/", post(event::create_event))
        .route("/join", post(event::join_event_by_code))
        .route("/detail/{event_id}", get(event::get_event_detail))
        .route("/me/list", get(event::list_my_events))
        .route(
            "/{event_id}",
            get(event::get_public_event_detail)
                .patch(event::update_event)
                .delete(event::delete_event),
        )
        .route("/{event_id}/summary", get(event::get_event_summary))
        .route(
            "/{event_id}/images",
            patch(event::replace_event_images)
                .post(event::add_event_images)
                .delete(event::remove_event_images),
        )
        // ! milestones
        .route(
            "/{event_id}/milestones",
            post(milestone::create_milestone).get(milestone::list_milestones),
        )
        .route(
            "/{event_id}/milestones/{milestone_id}",
            get(milestone::get_milestone_detail)
                .patch(milestone::update_milestone)
                .delete(milestone::delete_milestone),
        )
        // ! departments
        .route(
            "/{event_id}/departments",
            get(department::list_departments).post(department::create_department),
        )
        .route(
            "/{event_id}/departments/{department_id}",
            get(department::get_department_detail)
                .patch(department::edit_department)
                .delete(department::delete_department),
        )
        .route(
            "/{event_id}/departments/{department_id}/assign-hod",
            patch(department::assign_hod),
        )
        .route(
            "/{event_id}/departments/{department_id}/members",
            post(department::add_member_to_department),
        )
        .route(
            "/{event_id}/departments/{department_id}/members/{user_id}",
            delete(department::remove_member_from_department),
        )
        // ! tasks
        .route(
            "/{event_id}/tasks",
            get(task::list_tasks).post(task::create_task),
        )
        .route("/{event_id}/tasks/progress", get(task::task_progress_chart))
        .route(
            "/{event_id}/tasks/{task_id}",
            get(task::get_task_detail)
                .patch(task::edit_task)
                .delete(task::delete_task),
        )
        .route(
            "/{event_id}/tasks/{task_id}/progress",
            patch(task::update_task_progress),
        )
        .route("/{event_id}/tasks/{task_id}/assign", patch(task::assign_task))
        .route(
            "/{event_id}/tasks/{task_id}/unassign",
            patch(task::unassign_task),
        )
        .with_state(state)
}
