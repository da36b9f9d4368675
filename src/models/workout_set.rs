use serde::Serialize;

/// One performed set within a workout
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WorkoutSet {
    pub id: i64,
    pub workout_id: i64,
    /// 1-based sequence marker; gaps remain after deletions
    pub set_num: i64,
    pub reps_dist: f64,
    pub weight_time: i64,
    pub resistance: i64,
}
