//! Process-local repository backend.
//!
//! Rows live in ordered maps behind a `tokio` lock and vanish with the
//! process. Used by the `memory` backend and by tests that do not need SQL.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::factory::{DbConfig, RepositoryFactory};
use super::repository::{RepositoryError, SwapRepository};
use crate::models::{
    Contract, ContractSummary, Conversation, Flat, Message, NewContract, NewConversation, NewFlat,
    NewMessage, NewSearch, Profile, ProfileInput, Search,
};

#[derive(Default)]
struct Tables {
    profiles: BTreeMap<String, Profile>,
    flats: BTreeMap<String, Flat>,
    searches: BTreeMap<String, Search>,
    contracts: BTreeMap<String, Contract>,
    conversations: BTreeMap<String, Conversation>,
    messages: Vec<Message>,
}

#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn new_id(id: Option<String>) -> String {
    id.filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Newest first, by creation time.
fn newest_first<T>(
    mut rows: Vec<T>,
    created: impl Fn(&T) -> chrono::DateTime<Utc>,
) -> Vec<T> {
    rows.sort_by_key(|row| std::cmp::Reverse(created(row)));
    rows
}

#[async_trait]
impl SwapRepository for MemoryRepository {
    async fn get_profile(&self, user_id: &str) -> Result<Profile, RepositoryError> {
        let tables = self.tables.read().await;
        tables.profiles.get(user_id).cloned().ok_or(RepositoryError::NotFound)
    }

    async fn upsert_profile(&self, input: ProfileInput) -> Result<Profile, RepositoryError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let created_at = tables
            .profiles
            .get(&input.user_id)
            .map_or(now, |existing| existing.created_at);
        let profile = Profile {
            user_id: input.user_id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            location: input.location,
            phone: input.phone,
            bio: input.bio,
            languages: input.languages,
            contact_method: input.contact_method,
            onboarding_completed: input.onboarding_completed,
            created_at,
            updated_at: now,
        };
        tables.profiles.insert(profile.user_id.clone(), profile.clone());
        Ok(profile)
    }

    async fn list_flats(&self, owner_id: &str) -> Result<Vec<Flat>, RepositoryError> {
        let tables = self.tables.read().await;
        let rows = tables
            .flats
            .values()
            .filter(|f| f.owner_id == owner_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |f: &Flat| f.created_at))
    }

    async fn get_flat(&self, id: &str) -> Result<Flat, RepositoryError> {
        let tables = self.tables.read().await;
        tables.flats.get(id).cloned().ok_or(RepositoryError::NotFound)
    }

    async fn upsert_flat(&self, flat: NewFlat) -> Result<Flat, RepositoryError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let id = new_id(flat.id);
        let created_at = tables.flats.get(&id).map_or(now, |existing| existing.created_at);
        let row = Flat {
            id: id.clone(),
            owner_id: flat.owner_id,
            title: flat.title,
            description: flat.description,
            address: flat.address,
            city: flat.city,
            country: flat.country,
            postal_code: flat.postal_code,
            rent_amount: flat.rent_amount,
            deposit_amount: flat.deposit_amount,
            available_from: flat.available_from,
            available_until: flat.available_until,
            room_count: flat.room_count,
            bathroom_count: flat.bathroom_count,
            max_guests: flat.max_guests,
            size_sqm: flat.size_sqm,
            furnished: flat.furnished,
            pets_allowed: flat.pets_allowed,
            smoking_allowed: flat.smoking_allowed,
            amenities: flat.amenities,
            images: flat.images,
            created_at,
            updated_at: now,
        };
        tables.flats.insert(id, row.clone());
        Ok(row)
    }

    async fn delete_flat(&self, id: &str) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.flats.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    async fn list_searches(&self, user_id: &str) -> Result<Vec<Search>, RepositoryError> {
        let tables = self.tables.read().await;
        let rows = tables
            .searches
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |s: &Search| s.created_at))
    }

    async fn upsert_search(&self, search: NewSearch) -> Result<Search, RepositoryError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let id = new_id(search.id);
        let created_at = tables.searches.get(&id).map_or(now, |existing| existing.created_at);
        let row = Search {
            id: id.clone(),
            user_id: search.user_id,
            title: search.title,
            city: search.city,
            country: search.country,
            start_date: search.start_date,
            end_date: search.end_date,
            max_rent: search.max_rent,
            min_rooms: search.min_rooms,
            max_rooms: search.max_rooms,
            guests: search.guests,
            property_types: search.property_types,
            amenities: search.amenities,
            swap_duration: search.swap_duration,
            furnished: search.furnished,
            pets_allowed: search.pets_allowed,
            smoking_allowed: search.smoking_allowed,
            created_at,
            updated_at: now,
        };
        tables.searches.insert(id, row.clone());
        Ok(row)
    }

    async fn delete_search(&self, id: &str) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.searches.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    async fn list_contracts(&self, user_id: &str) -> Result<Vec<Contract>, RepositoryError> {
        let tables = self.tables.read().await;
        let rows = tables
            .contracts
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |c: &Contract| c.created_at))
    }

    async fn get_contract(&self, id: &str) -> Result<Contract, RepositoryError> {
        let tables = self.tables.read().await;
        tables.contracts.get(id).cloned().ok_or(RepositoryError::NotFound)
    }

    async fn upsert_contract(&self, contract: NewContract) -> Result<Contract, RepositoryError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let id = new_id(contract.id);
        let created_at = tables.contracts.get(&id).map_or(now, |existing| existing.created_at);
        let row = Contract {
            id: id.clone(),
            user_id: contract.user_id,
            flat_id: contract.flat_id,
            conversation_id: contract.conversation_id,
            landlord_name: contract.landlord_name,
            tenant_name: contract.tenant_name,
            start_date: contract.start_date,
            end_date: contract.end_date,
            monthly_rent: contract.monthly_rent,
            deposit_amount: contract.deposit_amount,
            platform_fee_percentage: contract.platform_fee_percentage,
            status: contract.status,
            contract_file: contract.contract_file,
            created_at,
            updated_at: now,
        };
        tables.contracts.insert(id, row.clone());
        Ok(row)
    }

    async fn list_contract_summaries(
        &self,
        user_id: &str,
    ) -> Result<Vec<ContractSummary>, RepositoryError> {
        let contracts = self.list_contracts(user_id).await?;
        let tables = self.tables.read().await;
        Ok(contracts
            .iter()
            .map(|c| {
                let flat_title = c
                    .flat_id
                    .as_deref()
                    .and_then(|id| tables.flats.get(id))
                    .map(|f| f.title.as_str());
                ContractSummary::from_contract(c, flat_title)
            })
            .collect())
    }

    async fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>, RepositoryError> {
        let tables = self.tables.read().await;
        let rows = tables
            .conversations
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |c: &Conversation| c.created_at))
    }

    async fn create_conversation(
        &self,
        conversation: NewConversation,
    ) -> Result<Conversation, RepositoryError> {
        let mut tables = self.tables.write().await;
        let row = Conversation {
            id: new_id(None),
            user_id: conversation.user_id,
            participant_id: conversation.participant_id,
            participant_name: conversation.participant_name,
            participant_location: conversation.participant_location,
            created_at: Utc::now(),
        };
        tables.conversations.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Message> = tables
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.created_at);
        Ok(rows)
    }

    async fn send_message(&self, message: NewMessage) -> Result<Message, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.conversations.contains_key(&message.conversation_id) {
            return Err(RepositoryError::NotFound);
        }
        let row = Message {
            id: new_id(None),
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            text: message.text,
            is_read: false,
            created_at: Utc::now(),
        };
        tables.messages.push(row.clone());
        Ok(row)
    }

    async fn mark_conversation_read(
        &self,
        conversation_id: &str,
        reader_id: &str,
    ) -> Result<u64, RepositoryError> {
        let mut tables = self.tables.write().await;
        let mut changed = 0;
        for message in tables
            .messages
            .iter_mut()
            .filter(|m| m.conversation_id == conversation_id && m.sender_id != reader_id && !m.is_read)
        {
            message.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }
}

/// Factory for the `memory` backend. The connection string is ignored.
pub struct MemoryFactory;

#[async_trait]
impl RepositoryFactory for MemoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &DbConfig,
    ) -> Result<Box<dyn SwapRepository>, RepositoryError> {
        Ok(Box::new(MemoryRepository::new()))
    }
}
