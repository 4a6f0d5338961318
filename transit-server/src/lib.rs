//! Real-time transit journey estimator.
//!
//! Answers: "if I take this route from this stop now, when will I arrive,
//! and how much should I trust that?"

pub mod config;
pub mod domain;
pub mod estimate;
pub mod mbta;
pub mod reference;
pub mod storage;
pub mod web;
