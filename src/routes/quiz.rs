use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::error;
use validator::Validate;

use crate::{
    dto::quiz_dto::{CreateQuizBody, DataEnvelope, ErrorEnvelope, QuizSummary},
    error::{Error, Result},
    AppState,
};

// One stable error code per endpoint.
const CREATE_QUIZ_CODE: &str = "QUI-CR02";
const GET_ALL_CODE: &str = "QUI-GA01";
const GET_BY_ID_CODE: &str = "QUI-GI01";
const DELETE_CODE: &str = "QUI-DE01";

fn error_envelope(
    status: StatusCode,
    error_code: &'static str,
    error_message: impl Into<String>,
) -> Response {
    let body = ErrorEnvelope {
        status: status.as_u16(),
        error_code,
        error_message: error_message.into(),
    };
    (status, Json(body)).into_response()
}

fn conflict_envelope(title: &str) -> Response {
    error_envelope(
        StatusCode::NOT_IMPLEMENTED,
        CREATE_QUIZ_CODE,
        format!("A quiz with title '{}' already exists.", title),
    )
}

#[utoipa::path(
    post,
    path = "/quizzes",
    request_body = CreateQuizBody,
    responses(
        (status = 201, description = "Quiz created with its questionnaire"),
        (status = 400, description = "Invalid payload"),
        (status = 501, description = "A quiz with this title already exists")
    )
)]
#[axum::debug_handler]
pub async fn create_quiz(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuizBody>,
) -> Result<Response> {
    payload.validate()?;

    // Fast-path check so the common duplicate gets a clean conflict without
    // an insert attempt; the schema unique constraint remains the source of
    // truth for the race window.
    match state.quiz_store.find_by_title(&payload.quiz_title).await {
        Ok(Some(_)) => return Ok(conflict_envelope(&payload.quiz_title)),
        Ok(None) => {}
        Err(err) => {
            error!(error = ?err, "CREATE_QUIZ");
            return Ok(error_envelope(
                StatusCode::INTERNAL_SERVER_ERROR,
                CREATE_QUIZ_CODE,
                "Unexpected error to create a new quiz.",
            ));
        }
    }

    let title = payload.quiz_title.clone();
    match state.quiz_store.create(payload).await {
        Ok(quiz) => Ok((StatusCode::CREATED, Json(DataEnvelope { data: quiz })).into_response()),
        Err(Error::Conflict(_)) => Ok(conflict_envelope(&title)),
        Err(err) => {
            error!(error = ?err, "CREATE_QUIZ");
            Ok(error_envelope(
                StatusCode::INTERNAL_SERVER_ERROR,
                CREATE_QUIZ_CODE,
                "Unexpected error to create a new quiz.",
            ))
        }
    }
}

#[utoipa::path(
    get,
    path = "/quizzes",
    responses(
        (status = 200, description = "All quizzes with their question counts")
    )
)]
#[axum::debug_handler]
pub async fn list_quizzes(State(state): State<AppState>) -> Result<Response> {
    match state.quiz_store.get_all().await {
        Ok(quizzes) => {
            let payload: Vec<QuizSummary> = quizzes.into_iter().map(QuizSummary::from).collect();
            Ok(Json(DataEnvelope { data: payload }).into_response())
        }
        Err(err) => {
            error!(error = ?err, "GET_QUIZZES");
            Ok(error_envelope(
                StatusCode::INTERNAL_SERVER_ERROR,
                GET_ALL_CODE,
                "Unexpected error to get all quizzes.",
            ))
        }
    }
}

#[utoipa::path(
    get,
    path = "/quizzes/{id}",
    params(
        ("id" = i32, Path, description = "Quiz ID")
    ),
    responses(
        (status = 200, description = "The quiz with nested questions and answers, or null")
    )
)]
#[axum::debug_handler]
pub async fn get_quiz_by_id(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Response> {
    match state.quiz_store.get_by_id(id).await {
        Ok(quiz) => Ok(Json(DataEnvelope { data: quiz }).into_response()),
        Err(err) => {
            error!(error = ?err, "GET_QUIZ_BY_ID");
            Ok(error_envelope(
                StatusCode::INTERNAL_SERVER_ERROR,
                GET_BY_ID_CODE,
                "Unexpected error to get a specific quiz.",
            ))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/quizzes/{id}",
    params(
        ("id" = i32, Path, description = "Quiz ID")
    ),
    responses(
        (status = 200, description = "The deleted quiz"),
        (status = 404, description = "No quiz with this ID")
    )
)]
#[axum::debug_handler]
pub async fn delete_quiz(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Response> {
    match state.quiz_store.delete(id).await {
        Ok(quiz) => Ok(Json(DataEnvelope { data: quiz }).into_response()),
        Err(Error::NotFound(msg)) => Ok(error_envelope(StatusCode::NOT_FOUND, DELETE_CODE, msg)),
        Err(err) => {
            error!(error = ?err, "DELETE_QUIZ");
            Ok(error_envelope(
                StatusCode::INTERNAL_SERVER_ERROR,
                DELETE_CODE,
                "Unexpected error to delete a specific quiz.",
            ))
        }
    }
}
