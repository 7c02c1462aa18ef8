//! Avto Quiz · driving-test practice backend.
//!
//! Categories of multiple-choice questions, shuffled 10-question quizzes with
//! per-question feedback and an 80 % pass mark, a canned-response assistant
//! and a static profile, served over HTTP and WebSocket. All data lives in
//! process memory.

pub mod assistant;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod logic;
pub mod profile;
pub mod protocol;
pub mod routes;
pub mod seeds;
pub mod session;
pub mod state;
pub mod store;
pub mod summary;
pub mod telemetry;
