/// Database primary keys for rows owned by the service (SQLite INTEGER).
pub type DbId = i64;

/// Patients are keyed by an opaque string identifier (e.g. `PT20250101093000`).
pub type PatientId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
