//! Business logic services.

pub mod access;
pub mod announcement;
pub mod announcement_analytics;
pub mod auth;
pub mod chat;
pub mod document;
pub mod document_analytics;
pub mod reporting;
pub mod role;
pub mod user;
