use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Contract, ContractSummary, Conversation, Flat, Message, NewContract, NewConversation, NewFlat,
    NewMessage, NewSearch, Profile, ProfileInput, Search,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Keyed fetch/upsert access to the FlatSwaps tables.
///
/// Upserts take a `New*` record; a record without an id is inserted with a
/// generated one, a record with an id replaces the stored row.
#[async_trait]
pub trait SwapRepository: Send + Sync {
    // Profiles
    async fn get_profile(&self, user_id: &str) -> Result<Profile, RepositoryError>;
    async fn upsert_profile(&self, profile: ProfileInput) -> Result<Profile, RepositoryError>;

    // Flats, newest first
    async fn list_flats(&self, owner_id: &str) -> Result<Vec<Flat>, RepositoryError>;
    async fn get_flat(&self, id: &str) -> Result<Flat, RepositoryError>;
    async fn upsert_flat(&self, flat: NewFlat) -> Result<Flat, RepositoryError>;
    async fn delete_flat(&self, id: &str) -> Result<(), RepositoryError>;

    // Searches, newest first
    async fn list_searches(&self, user_id: &str) -> Result<Vec<Search>, RepositoryError>;
    async fn upsert_search(&self, search: NewSearch) -> Result<Search, RepositoryError>;
    async fn delete_search(&self, id: &str) -> Result<(), RepositoryError>;

    // Contracts, newest first
    async fn list_contracts(&self, user_id: &str) -> Result<Vec<Contract>, RepositoryError>;
    async fn get_contract(&self, id: &str) -> Result<Contract, RepositoryError>;
    async fn upsert_contract(&self, contract: NewContract) -> Result<Contract, RepositoryError>;
    async fn list_contract_summaries(
        &self,
        user_id: &str,
    ) -> Result<Vec<ContractSummary>, RepositoryError>;

    // Messaging
    async fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>, RepositoryError>;
    async fn create_conversation(
        &self,
        conversation: NewConversation,
    ) -> Result<Conversation, RepositoryError>;
    /// Messages of a conversation, oldest first.
    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>, RepositoryError>;
    async fn send_message(&self, message: NewMessage) -> Result<Message, RepositoryError>;
    /// Marks every message in the conversation not sent by `reader_id` as
    /// read. Returns the number of messages changed.
    async fn mark_conversation_read(
        &self,
        conversation_id: &str,
        reader_id: &str,
    ) -> Result<u64, RepositoryError>;
}
