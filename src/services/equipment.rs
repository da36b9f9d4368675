use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::constants::ERR_EQUIPMENT_IN_USE;
use crate::db::begin_write;
use crate::error::{AppError, Result};
use crate::models::Equipment;

const EQUIPMENT_COLUMNS: &str =
    "id, type, name, description, image_base64, is_active, created_at";

/// Fields accepted by create and update
#[derive(Debug, Clone)]
pub struct EquipmentInput {
    pub equipment_type: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    /// Raw uploaded image; `None` keeps the stored image on update
    pub image: Option<Vec<u8>>,
}

/// CRUD over the equipment catalog
pub struct EquipmentService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EquipmentService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List equipment with the active flag set
    pub async fn list_active(&self) -> Result<Vec<Equipment>> {
        let equipment = sqlx::query_as(&format!(
            "SELECT {EQUIPMENT_COLUMNS} FROM gym_equipment WHERE is_active = 1 ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(equipment)
    }

    /// Look up a single piece of equipment, active or not
    pub async fn find_by_id(&self, id: i64) -> Result<Equipment> {
        sqlx::query_as(&format!(
            "SELECT {EQUIPMENT_COLUMNS} FROM gym_equipment WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(AppError::NotFound("Equipment"))
    }

    pub async fn create(&self, input: EquipmentInput) -> Result<Equipment> {
        let image_base64 = input.image.as_deref().map(|bytes| STANDARD.encode(bytes));

        let equipment: Equipment = sqlx::query_as(&format!(
            r#"
            INSERT INTO gym_equipment (type, name, description, image_base64, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {EQUIPMENT_COLUMNS}
            "#
        ))
        .bind(&input.equipment_type)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&image_base64)
        .bind(input.is_active)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        tracing::info!("Equipment {} created: {}", equipment.id, equipment.name);

        Ok(equipment)
    }

    /// Replace the editable fields; the image only changes when a new one is supplied
    pub async fn update(&self, id: i64, input: EquipmentInput) -> Result<Equipment> {
        let image_base64 = input.image.as_deref().map(|bytes| STANDARD.encode(bytes));

        let equipment: Equipment = sqlx::query_as(&format!(
            r#"
            UPDATE gym_equipment
            SET
                type = ?,
                name = ?,
                description = ?,
                is_active = ?,
                image_base64 = COALESCE(?, image_base64)
            WHERE id = ?
            RETURNING {EQUIPMENT_COLUMNS}
            "#
        ))
        .bind(&input.equipment_type)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.is_active)
        .bind(&image_base64)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(AppError::NotFound("Equipment"))?;

        tracing::info!("Equipment {} updated", id);

        Ok(equipment)
    }

    /// Hard-delete equipment that no workout references
    ///
    /// Referenced equipment is refused with `Conflict`; deactivate it instead.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = begin_write(self.pool).await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM gym_equipment WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound("Equipment"));
        }

        let references: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM workouts WHERE equipment_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if references > 0 {
            tracing::warn!(
                "Refusing to delete equipment {}: referenced by {} workouts",
                id,
                references
            );
            return Err(AppError::Conflict(ERR_EQUIPMENT_IN_USE.to_string()));
        }

        sqlx::query("DELETE FROM gym_equipment WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    AppError::Conflict(ERR_EQUIPMENT_IN_USE.to_string())
                }
                other => AppError::from(other),
            })?;

        tx.commit().await?;

        tracing::info!("Equipment {} deleted", id);

        Ok(())
    }
}
