use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

use super::code::generate_code;
use super::models::GameRoom;
use crate::shared::AppError;

/// Attempts before code allocation gives up
const MAX_CODE_ATTEMPTS: usize = 64;

/// Live rooms keyed by id, plus the join-code index onto them.
///
/// Both maps change together so a code never outlives its room.
#[derive(Debug, Default)]
pub struct RoomTable {
    rooms: HashMap<String, GameRoom>,
    codes: HashMap<String, String>,
}

impl RoomTable {
    pub fn insert(&mut self, room: GameRoom) {
        debug!(room_id = %room.id, code = %room.code, "Storing room");
        self.codes.insert(room.code.clone(), room.id.clone());
        self.rooms.insert(room.id.clone(), room);
    }

    pub fn get(&self, room_id: &str) -> Option<&GameRoom> {
        self.rooms.get(room_id)
    }

    pub fn get_mut(&mut self, room_id: &str) -> Option<&mut GameRoom> {
        self.rooms.get_mut(room_id)
    }

    pub fn room_id_for_code(&self, code: &str) -> Option<&str> {
        self.codes.get(code).map(String::as_str)
    }

    /// Removes a room and releases its join code
    pub fn remove(&mut self, room_id: &str) -> Option<GameRoom> {
        let room = self.rooms.remove(room_id)?;
        self.codes.remove(&room.code);
        debug!(room_id = %room_id, code = %room.code, "Room removed");
        Some(room)
    }

    /// Draws codes from `generate` until one is free
    pub fn allocate_code_with<F>(&self, mut generate: F) -> Result<String, AppError>
    where
        F: FnMut() -> String,
    {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate();
            if !self.codes.contains_key(&code) {
                return Ok(code);
            }
            debug!(code = %code, "Join code collision, retrying");
        }

        warn!(attempts = MAX_CODE_ATTEMPTS, "Could not allocate a free join code");
        Err(AppError::Internal("Failed to allocate room code".to_string()))
    }

    pub fn allocate_code(&self) -> Result<String, AppError> {
        self.allocate_code_with(generate_code)
    }

    /// Drops every room untouched since `cutoff` and returns their ids
    pub fn remove_idle(&mut self, cutoff: DateTime<Utc>) -> Vec<String> {
        let idle: Vec<String> = self
            .rooms
            .values()
            .filter(|room| room.is_idle_since(cutoff))
            .map(|room| room.id.clone())
            .collect();

        for room_id in &idle {
            self.remove(room_id);
        }
        idle
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// Shared handle to the room table.
///
/// One lock guards every room. Operations that also touch users take this
/// lock first and the user lock second.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    table: RwLock<RoomTable>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, RoomTable> {
        self.table.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, RoomTable> {
        self.table.write().await
    }
}
