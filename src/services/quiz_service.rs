use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::warn;

use crate::dto::quiz_dto::CreateQuizBody;
use crate::error::{Error, Result};
use crate::models::answer::Answer;
use crate::models::question::{Question, QuestionWithAnswers};
use crate::models::quiz::{Quiz, QuizDetail, QuizWithQuestions};

/// The sole reader/writer of the quiz aggregate. Object-safe so the API
/// tests can substitute an in-memory implementation.
#[async_trait]
pub trait QuizStore: Send + Sync {
    async fn find_by_title(&self, title: &str) -> Result<Option<Quiz>>;
    async fn create(&self, payload: CreateQuizBody) -> Result<QuizWithQuestions>;
    async fn get_all(&self) -> Result<Vec<QuizWithQuestions>>;
    async fn get_by_id(&self, id: i32) -> Result<Option<QuizDetail>>;
    async fn delete(&self, id: i32) -> Result<Quiz>;
}

#[derive(Clone)]
pub struct QuizService {
    pool: PgPool,
}

impl QuizService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizStore for QuizService {
    async fn find_by_title(&self, title: &str) -> Result<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"SELECT id, title, created_at, updated_at FROM quizzes WHERE title = $1"#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    /// Creates the whole aggregate in one transaction. Questions are inserted
    /// in input order, each followed by a single batched insert of its
    /// answers; any failure rolls the entire quiz back. The title unique
    /// constraint fires here on a racing duplicate and surfaces as
    /// `Error::Conflict`.
    async fn create(&self, payload: CreateQuizBody) -> Result<QuizWithQuestions> {
        let mut tx = self.pool.begin().await?;

        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (title)
            VALUES ($1)
            RETURNING id, title, created_at, updated_at
            "#,
        )
        .bind(&payload.quiz_title)
        .fetch_one(&mut *tx)
        .await?;

        if payload.questionnaire.is_empty() {
            warn!(
                quiz_id = quiz.id,
                "Payload contains no questions. Creating quiz without questions."
            );
        }

        for entry in &payload.questionnaire {
            let question = sqlx::query_as::<_, Question>(
                r#"
                INSERT INTO questions (question, answer_type, quiz_id)
                VALUES ($1, $2, $3)
                RETURNING id, question, answer_type, quiz_id
                "#,
            )
            .bind(&entry.question)
            .bind(entry.answer_type)
            .bind(quiz.id)
            .fetch_one(&mut *tx)
            .await?;

            if entry.answers.is_empty() {
                continue;
            }

            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO question_answers (type, answer, is_correct, question_id) ",
            );
            builder.push_values(&entry.answers, |mut b, answer| {
                b.push_bind(answer.answer_type)
                    .push_bind(&answer.answer)
                    .push_bind(answer.is_correct)
                    .push_bind(question.id);
            });
            builder.build().execute(&mut *tx).await?;
        }

        // Re-read before commit so the returned aggregate matches what a
        // reader will observe once the transaction lands.
        let questionnaire = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question, answer_type, quiz_id
            FROM questions
            WHERE quiz_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(quiz.id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(QuizWithQuestions {
            quiz,
            questionnaire,
        })
    }

    async fn get_all(&self) -> Result<Vec<QuizWithQuestions>> {
        let quizzes = sqlx::query_as::<_, Quiz>(
            r#"SELECT id, title, created_at, updated_at FROM quizzes ORDER BY id ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i32> = quizzes.iter().map(|quiz| quiz.id).collect();
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question, answer_type, quiz_id
            FROM questions
            WHERE quiz_id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i32, Vec<Question>> = HashMap::new();
        for question in questions {
            grouped.entry(question.quiz_id).or_default().push(question);
        }

        Ok(quizzes
            .into_iter()
            .map(|quiz| {
                let questionnaire = grouped.remove(&quiz.id).unwrap_or_default();
                QuizWithQuestions {
                    quiz,
                    questionnaire,
                }
            })
            .collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<QuizDetail>> {
        let Some(quiz) = sqlx::query_as::<_, Quiz>(
            r#"SELECT id, title, created_at, updated_at FROM quizzes WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, question, answer_type, quiz_id
            FROM questions
            WHERE quiz_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT a.id, a.type, a.answer, a.is_correct, a.question_id
            FROM question_answers a
            JOIN questions q ON q.id = a.question_id
            WHERE q.quiz_id = $1
            ORDER BY a.id ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i32, Vec<Answer>> = HashMap::new();
        for answer in answers {
            grouped.entry(answer.question_id).or_default().push(answer);
        }

        let questionnaire = questions
            .into_iter()
            .map(|question| {
                let answers = grouped.remove(&question.id).unwrap_or_default();
                QuestionWithAnswers { question, answers }
            })
            .collect();

        Ok(Some(QuizDetail {
            quiz,
            questionnaire,
        }))
    }

    /// Removes the quiz row; questions and answers go with it via the
    /// schema's ON DELETE CASCADE.
    async fn delete(&self, id: i32) -> Result<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            DELETE FROM quizzes
            WHERE id = $1
            RETURNING id, title, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Quiz with id {} not found", id)))?;

        Ok(quiz)
    }
}
