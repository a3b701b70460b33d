// GET /api/questions: the catalog the server scores against.
//
// Returned in the same nested shape an external catalog file uses, so a
// front end can render the questionnaire straight from it.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::web::AppState;

pub async fn list_questions(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.as_ref().clone())
}
