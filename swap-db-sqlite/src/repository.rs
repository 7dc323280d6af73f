use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use swap_core::{
    Contract, ContractStatus, ContractSummary, Conversation, Flat, Message, NewContract,
    NewConversation, NewFlat, NewMessage, NewSearch, Profile, ProfileInput, RepositoryError, Search,
    SwapRepository,
};
use uuid::Uuid;

use crate::codec::{
    decode_list, encode_date, encode_decimal, encode_list, encode_timestamp, parse_datetime,
    parse_optional_date, parse_optional_decimal, to_count,
};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens `database_url`, which is `:memory:`, a bare file path or a
    /// `sqlite:` URL. Files are created when missing.
    pub async fn new(database_url: &str) -> Result<Self> {
        let in_memory = matches!(database_url, ":memory:" | "sqlite::memory:");
        let options = if in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else if database_url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(database_url)
                .with_context(|| format!("Invalid database URL: {}", database_url))?
        } else {
            SqliteConnectOptions::new().filename(database_url)
        };
        let options = options.create_if_missing(true).foreign_keys(true);

        // Every in-memory connection is its own database.
        let max_connections = if in_memory { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        tracing::debug!(database_url, max_connections, "sqlite pool opened");
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Load and execute all SQL seed files from the specified directory.
    /// Files are executed in alphabetical order by filename.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;
            tracing::debug!(file = %path.display(), "seed file applied");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn row_id(id: Option<String>) -> String {
    id.filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

#[derive(FromRow)]
struct ProfileRow {
    user_id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    location: Option<String>,
    phone: Option<String>,
    bio: Option<String>,
    languages: Option<String>,
    contact_method: Option<String>,
    onboarding_completed: bool,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = RepositoryError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(Profile {
            languages: decode_list(&row.languages)?,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            location: row.location,
            phone: row.phone,
            bio: row.bio,
            contact_method: row.contact_method,
            onboarding_completed: row.onboarding_completed,
        })
    }
}

#[derive(FromRow)]
struct FlatRow {
    id: String,
    owner_id: String,
    title: String,
    description: Option<String>,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    postal_code: Option<String>,
    rent_amount: Option<String>,
    deposit_amount: Option<String>,
    available_from: Option<String>,
    available_until: Option<String>,
    room_count: Option<i64>,
    bathroom_count: Option<i64>,
    max_guests: Option<i64>,
    size_sqm: Option<String>,
    furnished: bool,
    pets_allowed: bool,
    smoking_allowed: bool,
    amenities: Option<String>,
    images: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<FlatRow> for Flat {
    type Error = RepositoryError;

    fn try_from(row: FlatRow) -> Result<Self, Self::Error> {
        Ok(Flat {
            rent_amount: parse_optional_decimal(&row.rent_amount)?,
            deposit_amount: parse_optional_decimal(&row.deposit_amount)?,
            available_from: parse_optional_date(&row.available_from)?,
            available_until: parse_optional_date(&row.available_until)?,
            room_count: to_count("room_count", row.room_count)?,
            bathroom_count: to_count("bathroom_count", row.bathroom_count)?,
            max_guests: to_count("max_guests", row.max_guests)?,
            size_sqm: parse_optional_decimal(&row.size_sqm)?,
            amenities: decode_list(&row.amenities)?,
            images: decode_list(&row.images)?,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            description: row.description,
            address: row.address,
            city: row.city,
            country: row.country,
            postal_code: row.postal_code,
            furnished: row.furnished,
            pets_allowed: row.pets_allowed,
            smoking_allowed: row.smoking_allowed,
        })
    }
}

#[derive(FromRow)]
struct SearchRow {
    id: String,
    user_id: String,
    title: String,
    city: Option<String>,
    country: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    max_rent: Option<String>,
    min_rooms: Option<i64>,
    max_rooms: Option<i64>,
    guests: Option<i64>,
    property_types: Option<String>,
    amenities: Option<String>,
    swap_duration: Option<String>,
    furnished: bool,
    pets_allowed: bool,
    smoking_allowed: bool,
    created_at: String,
    updated_at: String,
}

impl TryFrom<SearchRow> for Search {
    type Error = RepositoryError;

    fn try_from(row: SearchRow) -> Result<Self, Self::Error> {
        Ok(Search {
            start_date: parse_optional_date(&row.start_date)?,
            end_date: parse_optional_date(&row.end_date)?,
            max_rent: parse_optional_decimal(&row.max_rent)?,
            min_rooms: to_count("min_rooms", row.min_rooms)?,
            max_rooms: to_count("max_rooms", row.max_rooms)?,
            guests: to_count("guests", row.guests)?,
            property_types: decode_list(&row.property_types)?,
            amenities: decode_list(&row.amenities)?,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            city: row.city,
            country: row.country,
            swap_duration: row.swap_duration,
            furnished: row.furnished,
            pets_allowed: row.pets_allowed,
            smoking_allowed: row.smoking_allowed,
        })
    }
}

#[derive(FromRow)]
struct ContractRow {
    id: String,
    user_id: String,
    flat_id: Option<String>,
    conversation_id: Option<String>,
    landlord_name: Option<String>,
    tenant_name: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    monthly_rent: Option<String>,
    deposit_amount: Option<String>,
    platform_fee_percentage: Option<String>,
    status: String,
    contract_file: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ContractRow> for Contract {
    type Error = RepositoryError;

    fn try_from(row: ContractRow) -> Result<Self, Self::Error> {
        let status = ContractStatus::parse(&row.status)
            .ok_or_else(|| RepositoryError::Database(format!("Invalid contract status: {}", row.status)))?;
        Ok(Contract {
            status,
            start_date: parse_optional_date(&row.start_date)?,
            end_date: parse_optional_date(&row.end_date)?,
            monthly_rent: parse_optional_decimal(&row.monthly_rent)?,
            deposit_amount: parse_optional_decimal(&row.deposit_amount)?,
            platform_fee_percentage: parse_optional_decimal(&row.platform_fee_percentage)?,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            id: row.id,
            user_id: row.user_id,
            flat_id: row.flat_id,
            conversation_id: row.conversation_id,
            landlord_name: row.landlord_name,
            tenant_name: row.tenant_name,
            contract_file: row.contract_file,
        })
    }
}

#[derive(FromRow)]
struct ContractSummaryRow {
    #[sqlx(flatten)]
    contract: ContractRow,
    flat_title: Option<String>,
}

#[derive(FromRow)]
struct ConversationRow {
    id: String,
    user_id: String,
    participant_id: Option<String>,
    participant_name: String,
    participant_location: Option<String>,
    created_at: String,
}

impl TryFrom<ConversationRow> for Conversation {
    type Error = RepositoryError;

    fn try_from(row: ConversationRow) -> Result<Self, Self::Error> {
        Ok(Conversation {
            created_at: parse_datetime(&row.created_at)?,
            id: row.id,
            user_id: row.user_id,
            participant_id: row.participant_id,
            participant_name: row.participant_name,
            participant_location: row.participant_location,
        })
    }
}

#[derive(FromRow)]
struct MessageRow {
    id: String,
    conversation_id: String,
    sender_id: String,
    text: String,
    is_read: bool,
    created_at: String,
}

impl TryFrom<MessageRow> for Message {
    type Error = RepositoryError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Message {
            created_at: parse_datetime(&row.created_at)?,
            id: row.id,
            conversation_id: row.conversation_id,
            sender_id: row.sender_id,
            text: row.text,
            is_read: row.is_read,
        })
    }
}

const FLAT_COLUMNS: &str = "id, owner_id, title, description, address, city, country, postal_code,
    rent_amount, deposit_amount, available_from, available_until, room_count, bathroom_count,
    max_guests, size_sqm, furnished, pets_allowed, smoking_allowed, amenities, images,
    created_at, updated_at";

const SEARCH_COLUMNS: &str = "id, user_id, title, city, country, start_date, end_date, max_rent,
    min_rooms, max_rooms, guests, property_types, amenities, swap_duration, furnished,
    pets_allowed, smoking_allowed, created_at, updated_at";

const CONTRACT_COLUMNS: &str = "id, user_id, flat_id, conversation_id, landlord_name, tenant_name,
    start_date, end_date, monthly_rent, deposit_amount, platform_fee_percentage, status,
    contract_file, created_at, updated_at";

impl SqliteRepository {
    async fn get_search(
        &self,
        id: &str,
    ) -> Result<Search, RepositoryError> {
        let row: SearchRow = sqlx::query_as(&format!("SELECT {SEARCH_COLUMNS} FROM searches WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn get_conversation(
        &self,
        id: &str,
    ) -> Result<Conversation, RepositoryError> {
        let row: ConversationRow = sqlx::query_as(
            "SELECT id, user_id, participant_id, participant_name, participant_location, created_at
             FROM conversations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }
}

#[async_trait]
impl SwapRepository for SqliteRepository {
    async fn get_profile(&self, user_id: &str) -> Result<Profile, RepositoryError> {
        let row: ProfileRow = sqlx::query_as(
            "SELECT user_id, first_name, last_name, email, location, phone, bio, languages,
                    contact_method, onboarding_completed, created_at, updated_at
             FROM profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn upsert_profile(&self, profile: ProfileInput) -> Result<Profile, RepositoryError> {
        let now = encode_timestamp(Utc::now());

        sqlx::query(
            "INSERT INTO profiles (
                user_id, first_name, last_name, email, location, phone, bio, languages,
                contact_method, onboarding_completed, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                first_name = excluded.first_name, last_name = excluded.last_name,
                email = excluded.email, location = excluded.location, phone = excluded.phone,
                bio = excluded.bio, languages = excluded.languages,
                contact_method = excluded.contact_method,
                onboarding_completed = excluded.onboarding_completed,
                updated_at = excluded.updated_at",
        )
        .bind(&profile.user_id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.email)
        .bind(&profile.location)
        .bind(&profile.phone)
        .bind(&profile.bio)
        .bind(encode_list(&profile.languages)?)
        .bind(&profile.contact_method)
        .bind(profile.onboarding_completed)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_profile(&profile.user_id).await
    }

    async fn list_flats(&self, owner_id: &str) -> Result<Vec<Flat>, RepositoryError> {
        let rows: Vec<FlatRow> = sqlx::query_as(&format!(
            "SELECT {FLAT_COLUMNS} FROM flats WHERE owner_id = ? ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn get_flat(&self, id: &str) -> Result<Flat, RepositoryError> {
        let row: FlatRow = sqlx::query_as(&format!("SELECT {FLAT_COLUMNS} FROM flats WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn upsert_flat(&self, flat: NewFlat) -> Result<Flat, RepositoryError> {
        let id = row_id(flat.id);
        let now = encode_timestamp(Utc::now());

        sqlx::query(&format!(
            "INSERT INTO flats ({FLAT_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                owner_id = excluded.owner_id, title = excluded.title,
                description = excluded.description, address = excluded.address,
                city = excluded.city, country = excluded.country,
                postal_code = excluded.postal_code, rent_amount = excluded.rent_amount,
                deposit_amount = excluded.deposit_amount,
                available_from = excluded.available_from,
                available_until = excluded.available_until, room_count = excluded.room_count,
                bathroom_count = excluded.bathroom_count, max_guests = excluded.max_guests,
                size_sqm = excluded.size_sqm, furnished = excluded.furnished,
                pets_allowed = excluded.pets_allowed, smoking_allowed = excluded.smoking_allowed,
                amenities = excluded.amenities, images = excluded.images,
                updated_at = excluded.updated_at"
        ))
        .bind(&id)
        .bind(&flat.owner_id)
        .bind(&flat.title)
        .bind(&flat.description)
        .bind(&flat.address)
        .bind(&flat.city)
        .bind(&flat.country)
        .bind(&flat.postal_code)
        .bind(encode_decimal(flat.rent_amount))
        .bind(encode_decimal(flat.deposit_amount))
        .bind(encode_date(flat.available_from))
        .bind(encode_date(flat.available_until))
        .bind(flat.room_count.map(i64::from))
        .bind(flat.bathroom_count.map(i64::from))
        .bind(flat.max_guests.map(i64::from))
        .bind(encode_decimal(flat.size_sqm))
        .bind(flat.furnished)
        .bind(flat.pets_allowed)
        .bind(flat.smoking_allowed)
        .bind(encode_list(&flat.amenities)?)
        .bind(encode_list(&flat.images)?)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_flat(&id).await
    }

    async fn delete_flat(&self, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM flats WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_searches(&self, user_id: &str) -> Result<Vec<Search>, RepositoryError> {
        let rows: Vec<SearchRow> = sqlx::query_as(&format!(
            "SELECT {SEARCH_COLUMNS} FROM searches WHERE user_id = ? ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn upsert_search(&self, search: NewSearch) -> Result<Search, RepositoryError> {
        let id = row_id(search.id);
        let now = encode_timestamp(Utc::now());

        sqlx::query(&format!(
            "INSERT INTO searches ({SEARCH_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id, title = excluded.title, city = excluded.city,
                country = excluded.country, start_date = excluded.start_date,
                end_date = excluded.end_date, max_rent = excluded.max_rent,
                min_rooms = excluded.min_rooms, max_rooms = excluded.max_rooms,
                guests = excluded.guests, property_types = excluded.property_types,
                amenities = excluded.amenities, swap_duration = excluded.swap_duration,
                furnished = excluded.furnished, pets_allowed = excluded.pets_allowed,
                smoking_allowed = excluded.smoking_allowed, updated_at = excluded.updated_at"
        ))
        .bind(&id)
        .bind(&search.user_id)
        .bind(&search.title)
        .bind(&search.city)
        .bind(&search.country)
        .bind(encode_date(search.start_date))
        .bind(encode_date(search.end_date))
        .bind(encode_decimal(search.max_rent))
        .bind(search.min_rooms.map(i64::from))
        .bind(search.max_rooms.map(i64::from))
        .bind(search.guests.map(i64::from))
        .bind(encode_list(&search.property_types)?)
        .bind(encode_list(&search.amenities)?)
        .bind(&search.swap_duration)
        .bind(search.furnished)
        .bind(search.pets_allowed)
        .bind(search.smoking_allowed)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_search(&id).await
    }

    async fn delete_search(&self, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM searches WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_contracts(&self, user_id: &str) -> Result<Vec<Contract>, RepositoryError> {
        let rows: Vec<ContractRow> = sqlx::query_as(&format!(
            "SELECT {CONTRACT_COLUMNS} FROM contracts WHERE user_id = ? ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn get_contract(&self, id: &str) -> Result<Contract, RepositoryError> {
        let row: ContractRow =
            sqlx::query_as(&format!("SELECT {CONTRACT_COLUMNS} FROM contracts WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?
                .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn upsert_contract(&self, contract: NewContract) -> Result<Contract, RepositoryError> {
        let id = row_id(contract.id);
        let now = encode_timestamp(Utc::now());

        sqlx::query(&format!(
            "INSERT INTO contracts ({CONTRACT_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id, flat_id = excluded.flat_id,
                conversation_id = excluded.conversation_id,
                landlord_name = excluded.landlord_name, tenant_name = excluded.tenant_name,
                start_date = excluded.start_date, end_date = excluded.end_date,
                monthly_rent = excluded.monthly_rent, deposit_amount = excluded.deposit_amount,
                platform_fee_percentage = excluded.platform_fee_percentage,
                status = excluded.status, contract_file = excluded.contract_file,
                updated_at = excluded.updated_at"
        ))
        .bind(&id)
        .bind(&contract.user_id)
        .bind(&contract.flat_id)
        .bind(&contract.conversation_id)
        .bind(&contract.landlord_name)
        .bind(&contract.tenant_name)
        .bind(encode_date(contract.start_date))
        .bind(encode_date(contract.end_date))
        .bind(encode_decimal(contract.monthly_rent))
        .bind(encode_decimal(contract.deposit_amount))
        .bind(encode_decimal(contract.platform_fee_percentage))
        .bind(contract.status.as_str())
        .bind(&contract.contract_file)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_contract(&id).await
    }

    async fn list_contract_summaries(
        &self,
        user_id: &str,
    ) -> Result<Vec<ContractSummary>, RepositoryError> {
        let rows: Vec<ContractSummaryRow> = sqlx::query_as(
            "SELECT c.id, c.user_id, c.flat_id, c.conversation_id, c.landlord_name,
                    c.tenant_name, c.start_date, c.end_date, c.monthly_rent, c.deposit_amount,
                    c.platform_fee_percentage, c.status, c.contract_file, c.created_at,
                    c.updated_at, f.title AS flat_title
             FROM contracts c LEFT JOIN flats f ON f.id = c.flat_id
             WHERE c.user_id = ? ORDER BY c.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter()
            .map(|row| {
                let contract = Contract::try_from(row.contract)?;
                Ok(ContractSummary::from_contract(&contract, row.flat_title.as_deref()))
            })
            .collect()
    }

    async fn list_conversations(&self, user_id: &str) -> Result<Vec<Conversation>, RepositoryError> {
        let rows: Vec<ConversationRow> = sqlx::query_as(
            "SELECT id, user_id, participant_id, participant_name, participant_location, created_at
             FROM conversations WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn create_conversation(
        &self,
        conversation: NewConversation,
    ) -> Result<Conversation, RepositoryError> {
        let id = row_id(None);

        sqlx::query(
            "INSERT INTO conversations (
                id, user_id, participant_id, participant_name, participant_location, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&conversation.user_id)
        .bind(&conversation.participant_id)
        .bind(&conversation.participant_name)
        .bind(&conversation.participant_location)
        .bind(encode_timestamp(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_conversation(&id).await
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>, RepositoryError> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT id, conversation_id, sender_id, text, is_read, created_at
             FROM messages WHERE conversation_id = ? ORDER BY created_at, rowid",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn send_message(&self, message: NewMessage) -> Result<Message, RepositoryError> {
        self.get_conversation(&message.conversation_id).await?;

        let row: MessageRow = sqlx::query_as(
            "INSERT INTO messages (id, conversation_id, sender_id, text, is_read, created_at)
             VALUES (?, ?, ?, ?, 0, ?)
             RETURNING id, conversation_id, sender_id, text, is_read, created_at",
        )
        .bind(row_id(None))
        .bind(&message.conversation_id)
        .bind(&message.sender_id)
        .bind(&message.text)
        .bind(encode_timestamp(Utc::now()))
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        row.try_into()
    }

    async fn mark_conversation_read(
        &self,
        conversation_id: &str,
        reader_id: &str,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = 1
             WHERE conversation_id = ? AND sender_id <> ? AND is_read = 0",
        )
        .bind(conversation_id)
        .bind(reader_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    async fn setup_test_db() -> SqliteRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let repo = SqliteRepository::new_with_pool(pool).await;
        repo.run_migrations().await.expect("Failed to run migrations");
        repo
    }

    fn berlin_flat() -> NewFlat {
        NewFlat {
            owner_id: "u1".to_string(),
            title: "Sunny Altbau near Mauerpark".to_string(),
            city: Some("Berlin".to_string()),
            country: Some("Germany".to_string()),
            rent_amount: Some(dec!(1200.50)),
            available_from: chrono::NaiveDate::from_ymd_opt(2025, 6, 1),
            room_count: Some(3),
            furnished: true,
            amenities: vec!["wifi".to_string(), "balcony".to_string()],
            ..NewFlat::default()
        }
    }

    #[tokio::test]
    async fn test_profile_upsert_keeps_created_at() {
        let repo = setup_test_db().await;

        let created = repo
            .upsert_profile(ProfileInput {
                user_id: "u1".to_string(),
                first_name: Some("Alex".to_string()),
                languages: vec!["English".to_string(), "Spanish".to_string()],
                ..ProfileInput::default()
            })
            .await
            .expect("Should create profile");

        let mut input = ProfileInput::from(created.clone());
        input.onboarding_completed = true;
        let updated = repo.upsert_profile(input).await.expect("Should update profile");

        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.onboarding_completed);
        assert_eq!(updated.languages, vec!["English", "Spanish"]);
    }

    #[tokio::test]
    async fn test_get_profile_not_found() {
        let repo = setup_test_db().await;

        assert_eq!(repo.get_profile("nobody").await, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_flat_round_trip() {
        let repo = setup_test_db().await;

        let created = repo.upsert_flat(berlin_flat()).await.expect("Should create flat");
        let fetched = repo.get_flat(&created.id).await.expect("Should fetch flat");

        assert_eq!(fetched.rent_amount, Some(dec!(1200.50)));
        assert_eq!(fetched.room_count, Some(3));
        assert_eq!(fetched.amenities, vec!["wifi", "balcony"]);
        assert_eq!(fetched.location(), "Berlin, Germany");
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_flat_update_and_delete() {
        let repo = setup_test_db().await;
        let created = repo.upsert_flat(berlin_flat()).await.expect("Should create flat");

        let mut update = berlin_flat();
        update.id = Some(created.id.clone());
        update.rent_amount = None;
        let updated = repo.upsert_flat(update).await.expect("Should update flat");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.rent_amount, None);
        assert_eq!(repo.list_flats("u1").await.unwrap().len(), 1);

        repo.delete_flat(&created.id).await.expect("Should delete flat");
        assert_eq!(repo.get_flat(&created.id).await, Err(RepositoryError::NotFound));
        assert_eq!(repo.delete_flat(&created.id).await, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_searches_filtered_by_user() {
        let repo = setup_test_db().await;
        let search = NewSearch {
            user_id: "u1".to_string(),
            title: "Summer in Lisbon".to_string(),
            max_rent: Some(dec!(900)),
            property_types: vec!["apartment".to_string()],
            ..NewSearch::default()
        };
        repo.upsert_search(search.clone()).await.expect("Should create search");
        repo.upsert_search(NewSearch {
            user_id: "u2".to_string(),
            ..search
        })
        .await
        .expect("Should create search");

        let mine = repo.list_searches("u1").await.expect("Should list searches");

        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].max_rent, Some(dec!(900)));
        assert_eq!(mine[0].property_types, vec!["apartment"]);
    }

    #[tokio::test]
    async fn test_contract_summaries_join_flat_title() {
        let repo = setup_test_db().await;
        let flat = repo.upsert_flat(berlin_flat()).await.unwrap();

        let contract = repo
            .upsert_contract(NewContract {
                user_id: "u1".to_string(),
                flat_id: Some(flat.id),
                tenant_name: Some("Carlos Gomez".to_string()),
                platform_fee_percentage: Some(dec!(4.5)),
                status: ContractStatus::Active,
                ..NewContract::default()
            })
            .await
            .expect("Should create contract");
        repo.upsert_contract(NewContract {
            user_id: "u1".to_string(),
            ..NewContract::default()
        })
        .await
        .unwrap();

        let summaries = repo.list_contract_summaries("u1").await.expect("Should list summaries");

        assert_eq!(summaries.len(), 2);
        let linked = summaries.iter().find(|s| s.id == contract.id).unwrap();
        assert_eq!(linked.title, "Sunny Altbau near Mauerpark");
        assert_eq!(linked.other_party, "Carlos Gomez");
        assert_eq!(linked.status, ContractStatus::Active);
        assert!(summaries.iter().any(|s| s.title == "Contract" && s.other_party == "Unknown"));
        assert_eq!(contract.platform_fee_percentage, Some(dec!(4.5)));
    }

    #[tokio::test]
    async fn test_messages_and_read_marks() {
        let repo = setup_test_db().await;
        let conversation = repo
            .create_conversation(NewConversation {
                user_id: "u1".to_string(),
                participant_id: Some("u2".to_string()),
                participant_name: "Carlos Gomez".to_string(),
                participant_location: Some("Barcelona, Spain".to_string()),
            })
            .await
            .expect("Should create conversation");

        for (sender, text) in [("u2", "Hola!"), ("u2", "Still interested?"), ("u1", "Yes!")] {
            repo.send_message(NewMessage {
                conversation_id: conversation.id.clone(),
                sender_id: sender.to_string(),
                text: text.to_string(),
            })
            .await
            .expect("Should send message");
        }

        let messages = repo.list_messages(&conversation.id).await.unwrap();
        assert_eq!(
            messages.iter().map(|m| m.text.as_str()).collect::<Vec<_>>(),
            vec!["Hola!", "Still interested?", "Yes!"]
        );

        assert_eq!(repo.mark_conversation_read(&conversation.id, "u1").await, Ok(2));
        assert_eq!(repo.mark_conversation_read(&conversation.id, "u1").await, Ok(0));
    }

    #[tokio::test]
    async fn test_send_to_missing_conversation() {
        let repo = setup_test_db().await;

        let result = repo
            .send_message(NewMessage {
                conversation_id: "missing".to_string(),
                sender_id: "u1".to_string(),
                text: "Hello?".to_string(),
            })
            .await;

        assert_eq!(result, Err(RepositoryError::NotFound));
    }
}
