use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use quiz_backend::dto::quiz_dto::CreateQuizBody;
use quiz_backend::error::{Error, Result};
use quiz_backend::models::answer::Answer;
use quiz_backend::models::question::{Question, QuestionWithAnswers};
use quiz_backend::models::quiz::{Quiz, QuizDetail, QuizWithQuestions};
use quiz_backend::services::quiz_service::QuizStore;

/// In-memory stand-in for the Postgres store so the API suite can exercise
/// the handlers without a database. Mirrors the store contract: duplicate
/// titles conflict, deletes cascade, reads come back in id order.
#[derive(Default)]
pub struct InMemoryQuizStore {
    inner: Mutex<StoreState>,
}

#[derive(Default)]
struct StoreState {
    quizzes: Vec<Quiz>,
    questions: Vec<Question>,
    answers: Vec<Answer>,
    next_quiz_id: i32,
    next_question_id: i32,
    next_answer_id: i32,
}

#[async_trait]
impl QuizStore for InMemoryQuizStore {
    async fn find_by_title(&self, title: &str) -> Result<Option<Quiz>> {
        let state = self.inner.lock().unwrap();
        Ok(state.quizzes.iter().find(|q| q.title == title).cloned())
    }

    async fn create(&self, payload: CreateQuizBody) -> Result<QuizWithQuestions> {
        let mut state = self.inner.lock().unwrap();

        if state.quizzes.iter().any(|q| q.title == payload.quiz_title) {
            return Err(Error::Conflict(format!(
                "duplicate key value violates unique constraint: {}",
                payload.quiz_title
            )));
        }

        state.next_quiz_id += 1;
        let now = Utc::now();
        let quiz = Quiz {
            id: state.next_quiz_id,
            title: payload.quiz_title.clone(),
            created_at: now,
            updated_at: now,
        };
        state.quizzes.push(quiz.clone());

        let mut questionnaire = Vec::new();
        for entry in &payload.questionnaire {
            state.next_question_id += 1;
            let question = Question {
                id: state.next_question_id,
                question: entry.question.clone(),
                answer_type: entry.answer_type,
                quiz_id: quiz.id,
            };
            state.questions.push(question.clone());
            questionnaire.push(question);

            let question_id = state.next_question_id;
            for answer in &entry.answers {
                state.next_answer_id += 1;
                let id = state.next_answer_id;
                state.answers.push(Answer {
                    id,
                    answer_type: answer.answer_type,
                    answer: answer.answer.clone(),
                    is_correct: answer.is_correct,
                    question_id,
                });
            }
        }

        Ok(QuizWithQuestions {
            quiz,
            questionnaire,
        })
    }

    async fn get_all(&self) -> Result<Vec<QuizWithQuestions>> {
        let state = self.inner.lock().unwrap();
        Ok(state
            .quizzes
            .iter()
            .map(|quiz| QuizWithQuestions {
                quiz: quiz.clone(),
                questionnaire: state
                    .questions
                    .iter()
                    .filter(|q| q.quiz_id == quiz.id)
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<QuizDetail>> {
        let state = self.inner.lock().unwrap();
        let Some(quiz) = state.quizzes.iter().find(|q| q.id == id).cloned() else {
            return Ok(None);
        };

        let questionnaire = state
            .questions
            .iter()
            .filter(|q| q.quiz_id == id)
            .map(|question| QuestionWithAnswers {
                question: question.clone(),
                answers: state
                    .answers
                    .iter()
                    .filter(|a| a.question_id == question.id)
                    .cloned()
                    .collect(),
            })
            .collect();

        Ok(Some(QuizDetail {
            quiz,
            questionnaire,
        }))
    }

    async fn delete(&self, id: i32) -> Result<Quiz> {
        let mut state = self.inner.lock().unwrap();
        let position = state
            .quizzes
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| Error::NotFound(format!("Quiz with id {} not found", id)))?;

        let quiz = state.quizzes.remove(position);
        let question_ids: Vec<i32> = state
            .questions
            .iter()
            .filter(|q| q.quiz_id == id)
            .map(|q| q.id)
            .collect();
        state.questions.retain(|q| q.quiz_id != id);
        state.answers.retain(|a| !question_ids.contains(&a.question_id));

        Ok(quiz)
    }
}
