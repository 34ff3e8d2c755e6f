use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::question::AnswerType;
use crate::models::quiz::QuizWithQuestions;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizBody {
    #[validate(length(
        min = 3,
        max = 255,
        message = "Title must be between 3 and 255 characters long"
    ))]
    pub quiz_title: String,
    #[validate(nested)]
    pub questionnaire: Vec<QuestionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_question_shape"))]
pub struct QuestionEntry {
    #[validate(length(
        min = 3,
        max = 255,
        message = "Question must be between 3 and 255 characters long"
    ))]
    pub question: String,
    pub answer_type: AnswerType,
    #[validate(nested)]
    pub answers: Vec<AnswerEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    #[serde(rename = "type")]
    pub answer_type: AnswerType,
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Answer content must be between 1 and 1000 characters long"
    ))]
    pub answer: String,
    pub is_correct: bool,
}

fn shape_error(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("question_shape");
    err.message = Some(message.into());
    err
}

/// Kind-consistent shape rules: each question kind implies its own answer
/// count and structure, checked before anything reaches the store.
fn validate_question_shape(entry: &QuestionEntry) -> Result<(), ValidationError> {
    if entry
        .answers
        .iter()
        .any(|a| a.answer_type != entry.answer_type)
    {
        return Err(shape_error(
            "Answer type must match the question's answer type.",
        ));
    }

    match entry.answer_type {
        AnswerType::Boolean => {
            if entry.answers.len() != 2 {
                return Err(shape_error(
                    "Boolean questions must have exactly two answers.",
                ));
            }
            let has_true = entry.answers.iter().any(|a| a.answer == "true");
            let has_false = entry.answers.iter().any(|a| a.answer == "false");
            if !has_true || !has_false {
                return Err(shape_error(
                    "Boolean answers must be the literals 'true' and 'false'.",
                ));
            }
            if entry.answers.iter().filter(|a| a.is_correct).count() != 1 {
                return Err(shape_error(
                    "Boolean questions must have exactly one correct answer.",
                ));
            }
        }
        AnswerType::Input => {
            if entry.answers.len() != 1 {
                return Err(shape_error(
                    "Input questions must have exactly one answer.",
                ));
            }
            if !entry.answers[0].is_correct {
                return Err(shape_error(
                    "Input questions must mark their single answer as correct.",
                ));
            }
        }
        AnswerType::Checkbox => {
            // Checkbox questions with no correct answer are accepted as-is.
            if entry.answers.is_empty() {
                return Err(shape_error(
                    "Checkbox questions must have at least one answer.",
                ));
            }
        }
    }

    Ok(())
}

/// List-endpoint projection: no answer bodies, only the question count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: i32,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub questionnaire_length: usize,
}

impl From<QuizWithQuestions> for QuizSummary {
    fn from(value: QuizWithQuestions) -> Self {
        Self {
            id: value.quiz.id,
            title: value.quiz.title,
            created_at: value.quiz.created_at,
            updated_at: value.quiz.updated_at,
            questionnaire_length: value.questionnaire.len(),
        }
    }
}

/// Success half of the response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Failure half of the response envelope. The two shapes are total and
/// mutually exclusive; no operation returns a partially-filled envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status: u16,
    pub error_code: &'static str,
    pub error_message: String,
}
