use crate::errors::AppError;
use crate::export::CSV_CONTENT_TYPE;
use crate::models::{Counter, StateResponse, UpdateRequest};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    Form, Json,
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
};
use tokio::task::block_in_place;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let counter = state.counter.lock().await;
    Html(render_index(&counter.snapshot()))
}

pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let counter = state.counter.lock().await;
    Json(counter.snapshot())
}

pub async fn update(
    State(state): State<AppState>,
    Json(payload): Json<UpdateRequest>,
) -> Result<Json<StateResponse>, AppError> {
    apply_update(&state, &payload).await.map(Json)
}

pub async fn update_form(
    State(state): State<AppState>,
    Form(payload): Form<UpdateRequest>,
) -> Result<Redirect, AppError> {
    apply_update(&state, &payload).await?;
    Ok(Redirect::to("/"))
}

pub async fn reset_today(State(state): State<AppState>) -> Json<StateResponse> {
    let mut counter = state.counter.lock().await;
    block_in_place(|| counter.reset_today());
    Json(counter.snapshot())
}

pub async fn reset_week(State(state): State<AppState>) -> Json<StateResponse> {
    let mut counter = state.counter.lock().await;
    block_in_place(|| counter.reset_week());
    Json(counter.snapshot())
}

pub async fn toggle_week_start(State(state): State<AppState>) -> Json<StateResponse> {
    let mut counter = state.counter.lock().await;
    block_in_place(|| counter.toggle_week_start());
    Json(counter.snapshot())
}

pub async fn export_week(State(state): State<AppState>) -> Response {
    let (filename, csv) = state.counter.lock().await.week_csv();
    csv_download(&filename, csv)
}

pub async fn export_all(State(state): State<AppState>) -> Response {
    let (filename, csv) = state.counter.lock().await.all_csv();
    csv_download(&filename, csv)
}

async fn apply_update(state: &AppState, payload: &UpdateRequest) -> Result<StateResponse, AppError> {
    let field: Counter = payload.field.parse().map_err(AppError::bad_request)?;
    if payload.delta == 0 {
        return Err(AppError::bad_request("delta must not be zero"));
    }

    let mut counter = state.counter.lock().await;
    block_in_place(|| counter.update_today(field, payload.delta));
    Ok(counter.snapshot())
}

fn csv_download(filename: &str, csv: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    )
        .into_response()
}
