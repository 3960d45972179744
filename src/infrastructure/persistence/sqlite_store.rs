//! SQLite entity store
//!
//! One table per collection. Uniqueness of action intents and asset names is
//! enforced by the schema and surfaces as `RepoError::Conflict`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::application::ports::outbound::{
    ActionRepositoryPort, AssetRepositoryPort, CharacterRepositoryPort, RepoError,
    RepositoryProvider,
};
use crate::domain::entities::{
    Action, ActionKind, ActionPhase, ActionStatus, Asset, AssetKind, AssetStatus, Character,
};
use crate::domain::value_objects::{ActionId, AssetId, AssetSlots, CharacterId};

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS characters (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        username TEXT,
        effort INTEGER NOT NULL,
        tags TEXT NOT NULL DEFAULT '[]'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS assets (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL,
        kind TEXT NOT NULL,
        hidden INTEGER NOT NULL DEFAULT 0,
        lent INTEGER NOT NULL DEFAULT 0,
        multi_use INTEGER NOT NULL DEFAULT 0,
        used INTEGER NOT NULL DEFAULT 0,
        current_holder TEXT,
        uses INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS actions (
        id TEXT PRIMARY KEY,
        kind TEXT NOT NULL,
        creator TEXT NOT NULL,
        intent TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL,
        effort INTEGER NOT NULL,
        asset1 TEXT,
        asset2 TEXT,
        asset3 TEXT,
        phase TEXT,
        progress INTEGER NOT NULL DEFAULT 0,
        die_result INTEGER NOT NULL DEFAULT 0,
        result TEXT,
        players TEXT NOT NULL DEFAULT '[]',
        image TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
];

/// SQLite-backed store; cloning shares the pool
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wrap a pool, creating tables if needed
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        Ok(Self { pool })
    }
}

impl RepositoryProvider for SqliteStore {
    type CharacterRepo = SqliteCharacterRepository;
    type AssetRepo = SqliteAssetRepository;
    type ActionRepo = SqliteActionRepository;

    fn characters(&self) -> Self::CharacterRepo {
        SqliteCharacterRepository {
            pool: self.pool.clone(),
        }
    }

    fn assets(&self) -> Self::AssetRepo {
        SqliteAssetRepository {
            pool: self.pool.clone(),
        }
    }

    fn actions(&self) -> Self::ActionRepo {
        SqliteActionRepository {
            pool: self.pool.clone(),
        }
    }
}

fn db_error(e: sqlx::Error) -> RepoError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepoError::Conflict(db.message().to_string())
        }
        _ => RepoError::Database(e.to_string()),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, RepoError> {
    serde_json::to_string(value).map_err(|e| RepoError::Serialization(e.to_string()))
}

fn from_json<T: serde::de::DeserializeOwned>(value: &str) -> Result<T, RepoError> {
    serde_json::from_str(value).map_err(|e| RepoError::Serialization(e.to_string()))
}

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepoError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name).map_err(|e| RepoError::Serialization(e.to_string()))
}

fn parse_id<T>(value: &str, parse: fn(&str) -> Result<T, uuid::Error>) -> Result<T, RepoError> {
    parse(value).map_err(|e| RepoError::Serialization(format!("bad id '{}': {}", value, e)))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepoError::Serialization(e.to_string()))
}

// =============================================================================
// Characters
// =============================================================================

pub struct SqliteCharacterRepository {
    pool: SqlitePool,
}

fn row_to_character(row: &SqliteRow) -> Result<Character, RepoError> {
    let id: String = column(row, "id")?;
    let tags: String = column(row, "tags")?;
    Ok(Character {
        id: parse_id(&id, CharacterId::parse)?,
        name: column(row, "name")?,
        username: column(row, "username")?,
        effort: column(row, "effort")?,
        tags: from_json(&tags)?,
    })
}

#[async_trait]
impl CharacterRepositoryPort for SqliteCharacterRepository {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        let row = sqlx::query("SELECT * FROM characters WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.as_ref().map(row_to_character).transpose()
    }

    async fn list(&self) -> Result<Vec<Character>, RepoError> {
        let rows = sqlx::query("SELECT * FROM characters ORDER BY name, id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        rows.iter().map(row_to_character).collect()
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO characters (id, name, username, effort, tags)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                username = excluded.username,
                effort = excluded.effort,
                tags = excluded.tags
            "#,
        )
        .bind(character.id.to_string())
        .bind(&character.name)
        .bind(&character.username)
        .bind(character.effort)
        .bind(to_json(&character.tags)?)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }
}

// =============================================================================
// Assets
// =============================================================================

pub struct SqliteAssetRepository {
    pool: SqlitePool,
}

fn row_to_asset(row: &SqliteRow) -> Result<Asset, RepoError> {
    let id: String = column(row, "id")?;
    let kind: String = column(row, "kind")?;
    Ok(Asset {
        id: parse_id(&id, AssetId::parse)?,
        name: column(row, "name")?,
        description: column(row, "description")?,
        kind: from_json::<AssetKind>(&kind)?,
        status: AssetStatus {
            hidden: column(row, "hidden")?,
            lent: column(row, "lent")?,
            multi_use: column(row, "multi_use")?,
            used: column(row, "used")?,
        },
        current_holder: column(row, "current_holder")?,
        uses: column(row, "uses")?,
    })
}

#[async_trait]
impl AssetRepositoryPort for SqliteAssetRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Asset>, RepoError> {
        let row = sqlx::query("SELECT * FROM assets WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.as_ref().map(row_to_asset).transpose()
    }

    async fn list(&self) -> Result<Vec<Asset>, RepoError> {
        let rows = sqlx::query("SELECT * FROM assets ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        rows.iter().map(row_to_asset).collect()
    }

    async fn save(&self, asset: &Asset) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO assets
                (id, name, description, kind, hidden, lent, multi_use, used, current_holder, uses)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                kind = excluded.kind,
                hidden = excluded.hidden,
                lent = excluded.lent,
                multi_use = excluded.multi_use,
                used = excluded.used,
                current_holder = excluded.current_holder,
                uses = excluded.uses
            "#,
        )
        .bind(asset.id.to_string())
        .bind(&asset.name)
        .bind(&asset.description)
        .bind(to_json(&asset.kind)?)
        .bind(asset.status.hidden)
        .bind(asset.status.lent)
        .bind(asset.status.multi_use)
        .bind(asset.status.used)
        .bind(&asset.current_holder)
        .bind(asset.uses)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }
}

// =============================================================================
// Actions
// =============================================================================

pub struct SqliteActionRepository {
    pool: SqlitePool,
}

fn row_to_action(row: &SqliteRow) -> Result<Action, RepoError> {
    let id: String = column(row, "id")?;
    let kind: String = column(row, "kind")?;
    let creator: String = column(row, "creator")?;
    let phase: Option<String> = column(row, "phase")?;
    let players: Vec<String> = from_json(&column::<String>(row, "players")?)?;
    let created_at: String = column(row, "created_at")?;
    let updated_at: String = column(row, "updated_at")?;

    Ok(Action {
        id: parse_id(&id, ActionId::parse)?,
        kind: kind.parse::<ActionKind>().map_err(RepoError::Serialization)?,
        creator: parse_id(&creator, CharacterId::parse)?,
        intent: column(row, "intent")?,
        description: column(row, "description")?,
        effort: column(row, "effort")?,
        assets: AssetSlots::new([
            column(row, "asset1")?,
            column(row, "asset2")?,
            column(row, "asset3")?,
        ]),
        status: ActionStatus {
            phase: phase
                .map(|p| p.parse::<ActionPhase>())
                .transpose()
                .map_err(RepoError::Serialization)?,
            progress: column(row, "progress")?,
        },
        die_result: column(row, "die_result")?,
        result: column(row, "result")?,
        players: players
            .iter()
            .map(|p| parse_id(p, CharacterId::parse))
            .collect::<Result<_, _>>()?,
        image: column(row, "image")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

#[async_trait]
impl ActionRepositoryPort for SqliteActionRepository {
    async fn get(&self, id: ActionId) -> Result<Option<Action>, RepoError> {
        let row = sqlx::query("SELECT * FROM actions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.as_ref().map(row_to_action).transpose()
    }

    async fn list(&self) -> Result<Vec<Action>, RepoError> {
        let rows = sqlx::query("SELECT * FROM actions ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        rows.iter().map(row_to_action).collect()
    }

    async fn find_by_intent(&self, intent: &str) -> Result<Option<Action>, RepoError> {
        let row = sqlx::query("SELECT * FROM actions WHERE intent = ?")
            .bind(intent)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.as_ref().map(row_to_action).transpose()
    }

    async fn list_by_creator(&self, creator: CharacterId) -> Result<Vec<Action>, RepoError> {
        let rows = sqlx::query("SELECT * FROM actions WHERE creator = ? ORDER BY created_at, id")
            .bind(creator.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        rows.iter().map(row_to_action).collect()
    }

    async fn list_referencing_asset(&self, name: &str) -> Result<Vec<Action>, RepoError> {
        let rows = sqlx::query(
            "SELECT * FROM actions WHERE asset1 = ?1 OR asset2 = ?1 OR asset3 = ?1 ORDER BY created_at, id",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows.iter().map(row_to_action).collect()
    }

    async fn save(&self, action: &Action) -> Result<(), RepoError> {
        let players: Vec<String> = action.players.iter().map(|p| p.to_string()).collect();
        sqlx::query(
            r#"
            INSERT INTO actions
                (id, kind, creator, intent, description, effort, asset1, asset2, asset3,
                 phase, progress, die_result, result, players, image, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                kind = excluded.kind,
                creator = excluded.creator,
                intent = excluded.intent,
                description = excluded.description,
                effort = excluded.effort,
                asset1 = excluded.asset1,
                asset2 = excluded.asset2,
                asset3 = excluded.asset3,
                phase = excluded.phase,
                progress = excluded.progress,
                die_result = excluded.die_result,
                result = excluded.result,
                players = excluded.players,
                image = excluded.image,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(action.id.to_string())
        .bind(action.kind.as_str())
        .bind(action.creator.to_string())
        .bind(&action.intent)
        .bind(&action.description)
        .bind(action.effort)
        .bind(action.assets.slot(0))
        .bind(action.assets.slot(1))
        .bind(action.assets.slot(2))
        .bind(action.status.phase.map(|p| p.as_str()))
        .bind(action.status.progress)
        .bind(action.die_result)
        .bind(&action.result)
        .bind(to_json(&players)?)
        .bind(&action.image)
        .bind(action.created_at.to_rfc3339())
        .bind(action.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn delete(&self, id: ActionId) -> Result<Option<Action>, RepoError> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };
        sqlx::query("DELETE FROM actions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(Some(existing))
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM actions")
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn store() -> SqliteStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        SqliteStore::new(pool).await.unwrap()
    }

    #[tokio::test]
    async fn test_character_upsert() {
        let store = store().await;
        let mut character = Character::new("Vex", 3).with_tag("Control");
        store.characters().save(&character).await.unwrap();

        character.effort = 1;
        store.characters().save(&character).await.unwrap();

        let loaded = store.characters().get(character.id).await.unwrap().unwrap();
        assert_eq!(loaded, character);
        assert_eq!(store.characters().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_asset_kind_and_flags_survive_storage() {
        let store = store().await;
        let friend = CharacterId::new();
        let mut bond = Asset::new("Old friend", "From the war", AssetKind::Bond { with: friend, level: 2 })
            .multi_use();
        bond.claim();
        store.assets().save(&bond).await.unwrap();

        let loaded = store.assets().find_by_name("Old friend").await.unwrap().unwrap();
        assert_eq!(loaded, bond);

        let clash = Asset::new("Old friend", "Imposter", AssetKind::Trait);
        let err = store.assets().save(&clash).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_action_round_trip_and_queries() {
        let store = store().await;
        let creator = CharacterId::new();
        let mut action = Action::new(creator, "Climb the tower", "At night", 2)
            .with_assets(AssetSlots::new([Some("Rope".into()), None, Some("Lamp".into())]));
        action.players.push(CharacterId::new());
        action.resolve("Made it", 5, Some(ActionPhase::Published));
        store.actions().save(&action).await.unwrap();

        let loaded = store.actions().get(action.id).await.unwrap().unwrap();
        assert_eq!(loaded.assets, action.assets);
        assert_eq!(loaded.status, action.status);
        assert_eq!(loaded.players, action.players);
        assert_eq!(loaded.result.as_deref(), Some("Made it"));

        assert_eq!(store.actions().list_by_creator(creator).await.unwrap().len(), 1);
        assert_eq!(store.actions().list_referencing_asset("Lamp").await.unwrap().len(), 1);
        assert!(store.actions().list_referencing_asset("Horse").await.unwrap().is_empty());
        assert!(store.actions().find_by_intent("Climb the tower").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_intent_is_conflict() {
        let store = store().await;
        let creator = CharacterId::new();
        store
            .actions()
            .save(&Action::new(creator, "Hide", "In the barrel", 1))
            .await
            .unwrap();
        let err = store
            .actions()
            .save(&Action::new(creator, "Hide", "Under the bed", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_returns_removed_action() {
        let store = store().await;
        let action = Action::new(CharacterId::new(), "Run", "Fast", 1);
        store.actions().save(&action).await.unwrap();

        let removed = store.actions().delete(action.id).await.unwrap();
        assert_eq!(removed.map(|a| a.id), Some(action.id));
        assert!(store.actions().delete(action.id).await.unwrap().is_none());
        assert_eq!(store.actions().delete_all().await.unwrap(), 0);
    }
}
