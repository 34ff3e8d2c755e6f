pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use crate::services::quiz_service::{QuizService, QuizStore};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub quiz_store: Arc<dyn QuizStore>,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            quiz_store: Arc::new(QuizService::new(pool)),
        }
    }

    /// Builds state around any store implementation, used by the API tests
    /// to run the handlers against an in-memory store.
    pub fn with_store(quiz_store: Arc<dyn QuizStore>) -> Self {
        Self { quiz_store }
    }
}
