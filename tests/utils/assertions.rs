//! Test assertion helpers - fluent API for verifying test expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::http::StatusCode;
use serde_json::Value;

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Asserts an error reply with the given status and a non-empty message
pub fn assert_error(response: &(StatusCode, Value), expected: StatusCode) {
    let (status, body) = response;
    assert_eq!(*status, expected, "unexpected status, body: {}", body);
    let message = body["error"].as_str();
    assert!(
        message.is_some_and(|m| !m.is_empty()),
        "error body should carry a message, got {}",
        body
    );
}

/// Fluent checks over a room snapshot
pub struct ResponseAssertion<'a> {
    room: &'a Value,
}

impl<'a> ResponseAssertion<'a> {
    pub fn room(room: &'a Value) -> Self {
        Self { room }
    }

    pub fn has_status(self, expected: &str) -> Self {
        assert_eq!(self.room["status"], expected, "room: {}", self.room);
        self
    }

    pub fn has_winner(self, expected: &str) -> Self {
        assert_eq!(self.room["winner"], expected, "room: {}", self.room);
        self
    }

    pub fn has_turn(self, expected: &str) -> Self {
        assert_eq!(self.room["current_turn"], expected, "room: {}", self.room);
        self
    }

    pub fn has_winning_line(self, expected: &[u64]) -> Self {
        let line: Vec<u64> = self.room["winning_line"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_u64().unwrap())
            .collect();
        assert_eq!(line, expected, "room: {}", self.room);
        self
    }

    pub fn has_cell(self, index: usize, expected: &str) -> Self {
        assert_eq!(self.room["board"][index], expected, "room: {}", self.room);
        self
    }

    pub fn has_scores(self, seat: &str, wins: u64, losses: u64, draws: u64) -> Self {
        let scores = &self.room[seat]["scores"];
        assert_eq!(scores["wins"], wins, "{} scores: {}", seat, scores);
        assert_eq!(scores["losses"], losses, "{} scores: {}", seat, scores);
        assert_eq!(scores["draws"], draws, "{} scores: {}", seat, scores);
        self
    }
}
