// POST /api/profile: score a set of quiz answers.
//
// Body: { "answers": { "<qid>": "<label>" | ["<label>", ...] }, "top_k": 3 }
// Returns the full profile vector and its top-K reduction. Unknown ids and
// labels are ignored, so the only client errors are malformed JSON bodies.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::quiz::answers::Answers;
use crate::scoring::profile::{build_profile, ProfileVector};
use crate::scoring::topk::{clamp_k, RankedVector};
use crate::web::{api_error, AppState};

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub answers: Answers,
    /// Negative values yield an empty `top`; absent uses the server default.
    pub top_k: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: ProfileVector,
    pub top: RankedVector,
}

pub async fn score_answers(
    State(state): State<AppState>,
    body: Result<Json<ProfileRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected profile request");
            return api_error(rejection.status(), &rejection.body_text());
        }
    };

    let k = request.top_k.map(clamp_k).unwrap_or(state.default_top_k);
    let profile = build_profile(&request.answers, &state.catalog);
    let top = profile.top_k(k);

    debug!(answers = request.answers.len(), signals = profile.len(), k, "Scored answers");

    Json(ProfileResponse { profile, top }).into_response()
}
