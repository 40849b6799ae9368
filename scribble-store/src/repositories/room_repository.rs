use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

use crate::{StateStore, StoreError};
use scribble_types::{GameState, Roster};

/// Typed access to the two records kept per room.
#[derive(Clone)]
pub struct RoomRepository {
    store: Arc<dyn StateStore>,
}

impl RoomRepository {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    pub fn roster_key(room_id: &str) -> String {
        format!("room:{}", room_id)
    }

    pub fn game_key(room_id: &str) -> String {
        format!("game:{}", room_id)
    }

    pub async fn get_roster(&self, room_id: &str) -> Result<Option<Roster>, StoreError> {
        self.get_record(&Self::roster_key(room_id)).await
    }

    pub async fn set_roster(&self, room_id: &str, roster: &Roster) -> Result<(), StoreError> {
        self.set_record(&Self::roster_key(room_id), roster).await
    }

    pub async fn get_game(&self, room_id: &str) -> Result<Option<GameState>, StoreError> {
        self.get_record(&Self::game_key(room_id)).await
    }

    pub async fn set_game(&self, room_id: &str, game: &GameState) -> Result<(), StoreError> {
        self.set_record(&Self::game_key(room_id), game).await
    }

    /// Remove both records of a room. The game goes first so a failure never
    /// leaves a game behind without its roster.
    pub async fn delete_room(&self, room_id: &str) -> Result<(), StoreError> {
        self.store.delete(&Self::game_key(room_id)).await?;
        self.store.delete(&Self::roster_key(room_id)).await?;
        Ok(())
    }

    async fn get_record<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set_record<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use scribble_types::{GameStatus, TurnPhase};
    use uuid::Uuid;

    fn setup_repository() -> (RoomRepository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (RoomRepository::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_roster_round_trip_keeps_order() {
        let (repo, store) = setup_repository();
        let mut roster = Roster::new();
        let tokens: Vec<_> = (0..4).map(|_| Uuid::new_v4()).collect();
        for (i, token) in tokens.iter().enumerate() {
            roster.upsert(*token, &format!("P{}", i));
        }

        repo.set_roster("ABCDE", &roster).await.unwrap();
        let loaded = repo.get_roster("ABCDE").await.unwrap().unwrap();
        assert_eq!(loaded.tokens(), tokens);

        // Stored under the documented key
        assert!(store.get("room:ABCDE").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_room_removes_both_records() {
        let (repo, store) = setup_repository();
        let game = GameState {
            status: GameStatus::Playing,
            phase: TurnPhase::Choosing,
            turn_order: vec![Uuid::new_v4()],
            current_turn_index: Some(0),
            current_round: 1,
            total_rounds: 3,
            current_word: String::new(),
            players_who_guessed: Vec::new(),
            timer: 15,
        };

        repo.set_roster("ABCDE", &Roster::new()).await.unwrap();
        repo.set_game("ABCDE", &game).await.unwrap();
        assert_eq!(repo.get_game("ABCDE").await.unwrap(), Some(game));

        repo.delete_room("ABCDE").await.unwrap();
        assert!(repo.get_roster("ABCDE").await.unwrap().is_none());
        assert!(repo.get_game("ABCDE").await.unwrap().is_none());
        assert_eq!(store.len().await, 0);
    }

    /// Rejects deletes of roster records.
    #[derive(Default)]
    struct StickyRosterStore {
        inner: MemoryStore,
    }

    #[async_trait::async_trait]
    impl StateStore for StickyRosterStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
            self.inner.set(key, value).await
        }

        async fn delete(&self, key: &str) -> Result<(), StoreError> {
            if key.starts_with("room:") {
                let err = serde_json::from_str::<u8>("busy").unwrap_err();
                return Err(StoreError::Codec(err));
            }
            self.inner.delete(key).await
        }
    }

    #[tokio::test]
    async fn test_failed_delete_never_orphans_game() {
        let repo = RoomRepository::new(Arc::new(StickyRosterStore::default()));
        let game = GameState {
            status: GameStatus::Playing,
            phase: TurnPhase::Choosing,
            turn_order: vec![Uuid::new_v4()],
            current_turn_index: Some(0),
            current_round: 1,
            total_rounds: 3,
            current_word: String::new(),
            players_who_guessed: Vec::new(),
            timer: 15,
        };
        repo.set_roster("ABCDE", &Roster::new()).await.unwrap();
        repo.set_game("ABCDE", &game).await.unwrap();

        assert!(repo.delete_room("ABCDE").await.is_err());
        assert!(repo.get_game("ABCDE").await.unwrap().is_none());
        assert!(repo.get_roster("ABCDE").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_corrupt_record_is_codec_error() {
        let (repo, store) = setup_repository();
        store
            .set("game:ABCDE", "not json".to_string())
            .await
            .unwrap();

        let result = repo.get_game("ABCDE").await;
        assert!(matches!(result, Err(StoreError::Codec(_))));
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        let (repo, _) = setup_repository();
        let mut roster = Roster::new();
        roster.upsert(Uuid::new_v4(), "Alice");

        repo.set_roster("AAAAA", &roster).await.unwrap();
        assert!(repo.get_roster("BBBBB").await.unwrap().is_none());
    }
}
