//! Trial generation and answer evaluation for a word-building tile game.
//!
//! A [`pool::Pool`] of units feeds a [`generator::trial::TrialGenerator`]; the
//! [`session::state_machine::TrialStateMachine`] hosts one learner session on top of it,
//! driving the adaptive selector, the reverse-mode controller and the stats sink.

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod generator;
pub mod pool;
pub mod session;
pub mod store;
