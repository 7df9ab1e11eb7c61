//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&SqlitePool` as the first argument.

pub mod medication_repo;
pub mod patient_repo;
pub mod vital_reading_repo;

pub use medication_repo::MedicationRepo;
pub use patient_repo::PatientRepo;
pub use vital_reading_repo::VitalReadingRepo;
