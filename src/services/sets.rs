use sqlx::SqlitePool;

use crate::constants::{ERR_WORKOUT_ID_REQUIRED, ERR_WORKOUT_NOT_IN_PROGRESS};
use crate::db::begin_write;
use crate::error::{AppError, Result};
use crate::models::{WorkoutSet, WorkoutStatus};
use crate::services::workouts::find_owned_workout;

const SET_COLUMNS: &str = "id, workout_id, set_num, reps_dist, weight_time, resistance";

/// Fields of a set; absent fields default to 0 on append and are left alone on update
#[derive(Debug, Clone, Default)]
pub struct SetChanges {
    pub reps_dist: Option<f64>,
    pub weight_time: Option<i64>,
    pub resistance: Option<i64>,
}

/// Ordered set entries within a workout
pub struct SetService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SetService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Sets of an owned workout in set number order
    pub async fn list(&self, workout_id: i64, user_id: i64) -> Result<Vec<WorkoutSet>> {
        let mut conn = self.pool.acquire().await?;

        find_owned_workout(&mut conn, workout_id, user_id).await?;

        let sets = sqlx::query_as(&format!(
            "SELECT {SET_COLUMNS} FROM sets WHERE workout_id = ? ORDER BY set_num ASC"
        ))
        .bind(workout_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(sets)
    }

    /// Append a set to an owned, in-progress workout
    ///
    /// The set number comes from the workout's counter, so numbers are never
    /// handed out twice even after the latest set is deleted.
    pub async fn append(
        &self,
        workout_id: Option<i64>,
        user_id: i64,
        fields: SetChanges,
    ) -> Result<WorkoutSet> {
        let workout_id =
            workout_id.ok_or_else(|| AppError::InvalidInput(ERR_WORKOUT_ID_REQUIRED.to_string()))?;

        let mut tx = begin_write(self.pool).await?;

        let workout = find_owned_workout(&mut tx, workout_id, user_id).await?;
        if workout.status != WorkoutStatus::InProgress {
            return Err(AppError::InvalidState(
                ERR_WORKOUT_NOT_IN_PROGRESS.to_string(),
            ));
        }

        let set_num: i64 = sqlx::query_scalar(
            r#"
            UPDATE workouts
            SET last_set_num = last_set_num + 1
            WHERE id = ? AND status = ?
            RETURNING last_set_num
            "#,
        )
        .bind(workout_id)
        .bind(WorkoutStatus::InProgress)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::InvalidState(ERR_WORKOUT_NOT_IN_PROGRESS.to_string()))?;

        let set: WorkoutSet = sqlx::query_as(&format!(
            r#"
            INSERT INTO sets (workout_id, set_num, reps_dist, weight_time, resistance)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {SET_COLUMNS}
            "#
        ))
        .bind(workout_id)
        .bind(set_num)
        .bind(fields.reps_dist.unwrap_or(0.0))
        .bind(fields.weight_time.unwrap_or(0))
        .bind(fields.resistance.unwrap_or(0))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Set {} appended to workout {}", set_num, workout_id);

        Ok(set)
    }

    /// Overwrite only the supplied fields of an owned set
    pub async fn update(&self, set_id: i64, user_id: i64, changes: SetChanges) -> Result<WorkoutSet> {
        let mut tx = begin_write(self.pool).await?;

        let set = self.find_owned_set(&mut tx, set_id, user_id).await?;

        let updated: WorkoutSet = sqlx::query_as(&format!(
            r#"
            UPDATE sets
            SET
                reps_dist = COALESCE(?, reps_dist),
                weight_time = COALESCE(?, weight_time),
                resistance = COALESCE(?, resistance)
            WHERE id = ?
            RETURNING {SET_COLUMNS}
            "#
        ))
        .bind(changes.reps_dist)
        .bind(changes.weight_time)
        .bind(changes.resistance)
        .bind(set.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Delete an owned set; remaining sets keep their numbers
    pub async fn delete(&self, set_id: i64, user_id: i64) -> Result<()> {
        let mut tx = begin_write(self.pool).await?;

        self.find_owned_set(&mut tx, set_id, user_id).await?;

        sqlx::query("DELETE FROM sets WHERE id = ?")
            .bind(set_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn find_owned_set(
        &self,
        conn: &mut sqlx::SqliteConnection,
        set_id: i64,
        user_id: i64,
    ) -> Result<WorkoutSet> {
        let set: WorkoutSet = sqlx::query_as(&format!(
            "SELECT {SET_COLUMNS} FROM sets WHERE id = ?"
        ))
        .bind(set_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(AppError::NotFound("Set"))?;

        find_owned_workout(conn, set.workout_id, user_id).await?;

        Ok(set)
    }
}
