//! Persistence for assessments, the question bank, sessions and responses.

pub mod repository;
pub mod seed;
pub mod sqlite;
