#![allow(dead_code)] // Not every test file uses every helper

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use super::setup::{TestApp, TestPlayer};

// ============================================================================
// Action Helpers
// ============================================================================

impl TestApp {
    /// Sends one request through the router and decodes the JSON reply
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, token, Some(body)).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send("GET", uri, token, None).await
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    /// Registers `username` and returns the new player with their token
    pub async fn register(&self, username: &str) -> TestPlayer {
        let (status, body) = self
            .post("/api/register", None, json!({ "username": username }))
            .await;
        assert_eq!(status, StatusCode::OK, "register {} failed: {}", username, body);

        TestPlayer {
            id: body["user"]["id"].as_str().unwrap().to_string(),
            username: body["user"]["username"].as_str().unwrap().to_string(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn create_game(&self, player: &TestPlayer, board_size: i64) -> Value {
        let (status, body) = self
            .post(
                "/api/game/create",
                Some(&player.token),
                json!({ "board_size": board_size }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {}", body);
        body
    }

    pub async fn join_game(&self, player: &TestPlayer, code: &str) -> (StatusCode, Value) {
        self.post("/api/game/join", Some(&player.token), json!({ "code": code }))
            .await
    }

    pub async fn make_move(
        &self,
        player: &TestPlayer,
        room_id: &str,
        index: i64,
    ) -> (StatusCode, Value) {
        self.post(
            "/api/game/move",
            Some(&player.token),
            json!({ "room_id": room_id, "index": index }),
        )
        .await
    }

    pub async fn leave_game(&self, player: &TestPlayer, room_id: &str) -> (StatusCode, Value) {
        self.post(
            "/api/game/leave",
            Some(&player.token),
            json!({ "room_id": room_id }),
        )
        .await
    }

    pub async fn emote(&self, player: &TestPlayer, room_id: &str, kind: &str) -> (StatusCode, Value) {
        self.post(
            "/api/game/emote",
            Some(&player.token),
            json!({ "room_id": room_id, "emote_type": kind }),
        )
        .await
    }

    pub async fn game_state(&self, room_id: &str) -> (StatusCode, Value) {
        self.get(&format!("/api/game/state?room_id={}", room_id), None)
            .await
    }

    /// Creates a room as `host` and seats `guest`, returning the room id
    pub async fn start_game(&self, host: &TestPlayer, guest: &TestPlayer, board_size: i64) -> String {
        let room = self.create_game(host, board_size).await;
        let code = room["code"].as_str().unwrap();
        let (status, body) = self.join_game(guest, code).await;
        assert_eq!(status, StatusCode::OK, "join failed: {}", body);
        assert_eq!(body["status"], "playing");
        room["id"].as_str().unwrap().to_string()
    }

    /// Plays `moves` in order, alternating X and O, returning the final room
    pub async fn play_moves(
        &self,
        x: &TestPlayer,
        o: &TestPlayer,
        room_id: &str,
        moves: &[i64],
    ) -> Value {
        let mut last = Value::Null;
        for (n, index) in moves.iter().enumerate() {
            let player = if n % 2 == 0 { x } else { o };
            let (status, body) = self.make_move(player, room_id, *index).await;
            assert_eq!(status, StatusCode::OK, "move {} failed: {}", index, body);
            last = body;
        }
        last
    }

    /// Current account record for `player`
    pub async fn current_user(&self, player: &TestPlayer) -> Value {
        let (status, body) = self.get("/api/user", Some(&player.token)).await;
        assert_eq!(status, StatusCode::OK);
        body
    }
}
