//! Business logic over the relational store
//!
//! Each service borrows the pool for the duration of one request and opens a
//! transaction for multi-statement operations.

pub mod auth;
pub mod equipment;
pub mod sets;
pub mod users;
pub mod workouts;

pub use auth::{AuthService, NewUser};
pub use equipment::{EquipmentInput, EquipmentService};
pub use sets::{SetChanges, SetService};
pub use users::{PreferenceChanges, ProfileChanges, UserService};
pub use workouts::WorkoutService;
