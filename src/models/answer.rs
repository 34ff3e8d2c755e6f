use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::question::AnswerType;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: i32,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub answer_type: AnswerType,
    pub answer: String,
    pub is_correct: bool,
    pub question_id: i32,
}
