//! Database models and DTOs for all domain entities.

pub mod announcement;
pub mod chat;
pub mod document;
pub mod role;
pub mod user;
