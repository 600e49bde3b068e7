/// Reserved user ID of the seeded admin account.
pub const ADMIN_USER_ID: i64 = 1;

/// Reserved caller ID for device-class clients (microcontrollers polling
/// for one command at a time).
pub const DEVICE_CLASS_USER_ID: i64 = 3;

/// Greeting the admin account sends on first contact.
pub const ADMIN_GREETING: &str = "Hallo ich bin der Admin Benutzer";

/// Placeholder text returned to device-class callers with no pending
/// messages.
pub const NO_DATA_TEXT: &str = "NO DATA";

/// Text reported for a device slot that was created by the read itself.
pub const MISSING_DEVICE_TEXT: &str = "--";
