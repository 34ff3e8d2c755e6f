pub mod quiz_service;
