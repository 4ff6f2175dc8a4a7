use axum::{extract::Extension, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::server::app::AppState;
use crate::types::AgentAnswer;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Answer one chat message.
///
/// Agent failures never surface as HTTP errors: the answer itself carries the
/// apology. Only an unusable request is rejected.
pub async fn chat_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<AgentAnswer>, (StatusCode, Json<ErrorBody>)> {
    let question = body.message.trim();
    if question.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "message must not be empty".to_string(),
            }),
        ));
    }

    let answer = state.agent.answer(question).await;

    if let Some(error) = &answer.error {
        tracing::error!(error = %error, "Chat request answered with apology");
    }

    Ok(Json(answer))
}
