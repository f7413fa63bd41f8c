use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Shortest accepted display name, in characters
pub const MIN_USERNAME_LEN: usize = 2;
/// Longest accepted display name, in characters
pub const MAX_USERNAME_LEN: usize = 20;

/// Cumulative results for a single player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

/// A registered player and their running totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub scores: Scores,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a fresh user with zeroed scores and a random id
    pub fn new(username: String) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            username,
            scores: Scores::default(),
            created_at: Utc::now(),
        }
    }

    /// Adds one to the counter matching `result`
    pub fn record(&mut self, result: MatchResult) {
        match result {
            MatchResult::Win => self.scores.wins += 1,
            MatchResult::Loss => self.scores.losses += 1,
            MatchResult::Draw => self.scores.draws += 1,
        }
    }
}

/// Outcome of one game from a single player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

/// The full persisted user registry, keyed by user id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDatabase {
    #[serde(default)]
    pub users: HashMap<String, User>,
}

impl UserDatabase {
    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|user| user.username == username)
    }
}

/// Checks the display name length rule, counting characters rather than bytes
pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[test]
    fn test_new_user_has_zero_scores() {
        let user = User::new("alice".to_string());
        assert_eq!(user.username, "alice");
        assert_eq!(user.scores, Scores::default());
        assert_eq!(user.id.len(), 32);
    }

    #[test]
    fn test_record_increments_single_counter() {
        let mut user = User::new("bob".to_string());
        user.record(MatchResult::Win);
        user.record(MatchResult::Win);
        user.record(MatchResult::Draw);
        assert_eq!(
            user.scores,
            Scores {
                wins: 2,
                losses: 0,
                draws: 1
            }
        );
    }

    #[rstest]
    #[case("win", Some(MatchResult::Win))]
    #[case("loss", Some(MatchResult::Loss))]
    #[case("draw", Some(MatchResult::Draw))]
    #[case("Win", None)]
    #[case("tie", None)]
    #[case("", None)]
    fn test_parse_match_result(#[case] raw: &str, #[case] expected: Option<MatchResult>) {
        assert_eq!(MatchResult::from_str(raw).ok(), expected);
    }

    #[rstest]
    #[case("a", false)]
    #[case("ab", true)]
    #[case("twenty-characters-xx", true)]
    #[case("twenty-one-characters", false)]
    #[case("", false)]
    #[case("éé", true)]
    fn test_username_length(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(is_valid_username(name), valid);
    }

    #[test]
    fn test_database_serialization_shape() {
        let mut db = UserDatabase::default();
        let user = User::new("carol".to_string());
        db.users.insert(user.id.clone(), user.clone());

        let value = serde_json::to_value(&db).unwrap();
        let stored = &value["users"][&user.id];
        assert_eq!(stored["username"], "carol");
        assert_eq!(stored["scores"]["wins"], 0);

        let parsed: UserDatabase = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.find_by_username("carol"), Some(&user));
    }

    #[test]
    fn test_missing_users_key_is_empty() {
        let parsed: UserDatabase = serde_json::from_str("{}").unwrap();
        assert!(parsed.users.is_empty());
    }
}
