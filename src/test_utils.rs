//! Test utilities for Nova Scribe
//!
//! Shared fixtures for unit tests: ready-made sessions and a controllable
//! clock for deterministic session ids.

use crate::controller::Clock;
use crate::session::{ChatSession, ChatTurn, SessionId};
use chrono::{DateTime, Local, TimeZone};
use std::sync::atomic::{AtomicI64, Ordering};

/// A session whose transcript is a single user turn equal to its title
pub fn session(id: SessionId, title: &str) -> ChatSession {
    ChatSession {
        id,
        title: title.to_string(),
        date: "1/1/2026".to_string(),
        messages: vec![ChatTurn::user(title)],
    }
}

/// Clock that returns a fixed millisecond timestamp, optionally advancing
/// by one millisecond per reading
pub struct StepClock {
    millis: AtomicI64,
    step: i64,
}

impl StepClock {
    /// Clock advancing one millisecond after every reading
    pub fn starting_at(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
            step: 1,
        }
    }

    /// Clock that always reads the same instant
    pub fn frozen_at(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
            step: 0,
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Local> {
        let millis = self.millis.fetch_add(self.step, Ordering::SeqCst);
        Local
            .timestamp_millis_opt(millis)
            .single()
            .expect("test timestamp out of range")
    }
}
