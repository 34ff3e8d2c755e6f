use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::answer::Answer;

/// The three question kinds. Stored as the Postgres enum `answer_type`;
/// serialized as the uppercase wire tags the API speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "answer_type", rename_all = "UPPERCASE")]
pub enum AnswerType {
    Boolean,
    Input,
    Checkbox,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i32,
    pub question: String,
    pub answer_type: AnswerType,
    pub quiz_id: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionWithAnswers {
    #[serde(flatten)]
    pub question: Question,
    pub answers: Vec<Answer>,
}
