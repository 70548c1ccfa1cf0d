//! `SQLite` implementation of [`SwitchroomRepository`].

use std::collections::HashMap;
use std::str::FromStr;

use chrono::SecondsFormat;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use switchroom_app::ports::SwitchroomRepository;
use switchroom_domain::error::SwitchroomError;
use switchroom_domain::id::{PhotoId, SwitchroomId};
use switchroom_domain::photo::Photo;
use switchroom_domain::switchroom::{AreaType, Switchroom};
use switchroom_domain::time::Timestamp;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper<T>(T);

fn decode_err<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

fn parse_timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.to_utc())
        .map_err(decode_err)
}

fn format_timestamp(value: Timestamp) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Switchroom> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let description: String = row.try_get("description")?;
        let area_type: String = row.try_get("area_type")?;
        let coordinates: String = row.try_get("coordinates")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Self(Switchroom {
            id: SwitchroomId::from_str(&id).map_err(decode_err)?,
            name,
            description,
            area_type: AreaType::from_str(&area_type).map_err(decode_err)?,
            coordinates: serde_json::from_str(&coordinates).map_err(decode_err)?,
            photos: Vec::new(),
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper<Photo> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let switchroom_id: String = row.try_get("switchroom_id")?;
        let image: String = row.try_get("image")?;
        let uploaded_at: String = row.try_get("uploaded_at")?;

        Ok(Self(Photo {
            id: PhotoId::from_str(&id).map_err(decode_err)?,
            switchroom_id: SwitchroomId::from_str(&switchroom_id).map_err(decode_err)?,
            image,
            uploaded_at: parse_timestamp(&uploaded_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO switchrooms (id, name, description, area_type, coordinates, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM switchrooms WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM switchrooms ORDER BY created_at, rowid";
const UPDATE: &str = r"
    UPDATE switchrooms
    SET name = ?, description = ?, area_type = ?, coordinates = ?, updated_at = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM switchrooms WHERE id = ?";

const INSERT_PHOTO: &str =
    "INSERT INTO photos (id, switchroom_id, image, uploaded_at) VALUES (?, ?, ?, ?)";
const SELECT_PHOTOS_BY_OWNER: &str =
    "SELECT * FROM photos WHERE switchroom_id = ? ORDER BY uploaded_at, rowid";
const SELECT_ALL_PHOTOS: &str = "SELECT * FROM photos ORDER BY uploaded_at, rowid";

/// `SQLite`-backed switchroom repository.
pub struct SqliteSwitchroomRepository {
    pool: SqlitePool,
}

impl SqliteSwitchroomRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn photos_of(&self, id: SwitchroomId) -> Result<Vec<Photo>, StorageError> {
        let rows: Vec<Wrapper<Photo>> = sqlx::query_as(SELECT_PHOTOS_BY_OWNER)
            .bind(id.to_string())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

impl SwitchroomRepository for SqliteSwitchroomRepository {
    async fn create(&self, switchroom: Switchroom) -> Result<Switchroom, SwitchroomError> {
        let coordinates =
            serde_json::to_string(&switchroom.coordinates).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(switchroom.id.to_string())
            .bind(&switchroom.name)
            .bind(&switchroom.description)
            .bind(switchroom.area_type.as_str())
            .bind(&coordinates)
            .bind(format_timestamp(switchroom.created_at))
            .bind(format_timestamp(switchroom.updated_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Switchroom {
            photos: Vec::new(),
            ..switchroom
        })
    }

    async fn get_by_id(&self, id: SwitchroomId) -> Result<Option<Switchroom>, SwitchroomError> {
        let row: Option<Wrapper<Switchroom>> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let Some(Wrapper(mut switchroom)) = row else {
            return Ok(None);
        };
        switchroom.photos = self.photos_of(id).await?;
        Ok(Some(switchroom))
    }

    async fn get_all(&self) -> Result<Vec<Switchroom>, SwitchroomError> {
        let rows: Vec<Wrapper<Switchroom>> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let photos: Vec<Wrapper<Photo>> = sqlx::query_as(SELECT_ALL_PHOTOS)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let mut by_owner: HashMap<SwitchroomId, Vec<Photo>> = HashMap::new();
        for Wrapper(photo) in photos {
            by_owner.entry(photo.switchroom_id).or_default().push(photo);
        }

        Ok(rows
            .into_iter()
            .map(|Wrapper(mut switchroom)| {
                switchroom.photos = by_owner.remove(&switchroom.id).unwrap_or_default();
                switchroom
            })
            .collect())
    }

    async fn update(&self, switchroom: Switchroom) -> Result<Option<Switchroom>, SwitchroomError> {
        let coordinates =
            serde_json::to_string(&switchroom.coordinates).map_err(StorageError::from)?;

        let result = sqlx::query(UPDATE)
            .bind(&switchroom.name)
            .bind(&switchroom.description)
            .bind(switchroom.area_type.as_str())
            .bind(&coordinates)
            .bind(format_timestamp(switchroom.updated_at))
            .bind(switchroom.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let photos = self.photos_of(switchroom.id).await?;
        Ok(Some(Switchroom {
            photos,
            ..switchroom
        }))
    }

    async fn delete(&self, id: SwitchroomId) -> Result<bool, SwitchroomError> {
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_photo(&self, photo: Photo) -> Result<Photo, SwitchroomError> {
        sqlx::query(INSERT_PHOTO)
            .bind(photo.id.to_string())
            .bind(photo.switchroom_id.to_string())
            .bind(&photo.image)
            .bind(format_timestamp(photo.uploaded_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(photo)
    }
}
