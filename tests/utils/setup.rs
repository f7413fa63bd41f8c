#![allow(dead_code)] // Not every test file uses every builder option

use axum::Router;
use std::sync::Arc;
use std::time::Duration;

use tictactoe::{build_router, AppState, InMemoryUserStore, RoomConfig, UserStore};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// A fully wired server plus handles on its state
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub user_store: Arc<InMemoryUserStore>,
}

/// A registered user and the token they were issued
#[derive(Debug, Clone)]
pub struct TestPlayer {
    pub id: String,
    pub username: String,
    pub token: String,
}

pub struct TestAppBuilder {
    user_store: Arc<InMemoryUserStore>,
    room_config: RoomConfig,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            user_store: Arc::new(InMemoryUserStore::new()),
            room_config: RoomConfig::default(),
        }
    }

    pub fn with_user_store(mut self, store: InMemoryUserStore) -> Self {
        self.user_store = Arc::new(store);
        self
    }

    pub fn with_emote_display(mut self, emote_display: Duration) -> Self {
        self.room_config = RoomConfig { emote_display };
        self
    }

    pub async fn build(self) -> TestApp {
        let store: Arc<dyn UserStore> = self.user_store.clone();
        let state = AppState::build(store, self.room_config).await.unwrap();

        TestApp {
            router: build_router(state.clone()),
            state,
            user_store: self.user_store,
        }
    }
}
