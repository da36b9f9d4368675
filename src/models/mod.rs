pub mod equipment;
pub mod preferences;
pub mod user;
pub mod workout;
pub mod workout_set;

pub use equipment::Equipment;
pub use preferences::{Preferences, Theme, Units};
pub use user::{User, UserProfile};
pub use workout::{Workout, WorkoutResponse, WorkoutStatus};
pub use workout_set::WorkoutSet;
