/// Name of the cookie carrying the session token
pub const SESSION_COOKIE_NAME: &str = "gym_session";

/// Number of random bytes in a session token (hex encoded on the wire)
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Upper bound accepted for `SESSION_TTL_DAYS` (about a century)
pub const MAX_SESSION_TTL_DAYS: i64 = 36_500;

/// Defaults for a freshly created preferences row
pub const DEFAULT_UNITS: &str = "metric";
pub const DEFAULT_REST_TIME_SECS: i64 = 60;
pub const DEFAULT_THEME: &str = "light";

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_EMAIL_EXISTS: &str = "Email already exists";

pub const ERR_WORKOUT_IN_PROGRESS: &str = "You already have an in-progress workout";

pub const ERR_EQUIPMENT_ID_REQUIRED: &str = "Equipment ID is required";

pub const ERR_WORKOUT_ID_REQUIRED: &str = "Workout ID is required";

pub const ERR_WORKOUT_NOT_IN_PROGRESS: &str = "Cannot add sets to this workout";

pub const ERR_EQUIPMENT_IN_USE: &str =
    "Equipment is referenced by existing workouts; deactivate it instead";

pub const ERR_CURRENT_PASSWORD: &str = "Current password is incorrect";
