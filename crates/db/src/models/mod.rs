//! Row models and insert DTOs, one module per table group.

pub mod medication;
pub mod patient;
pub mod vital;
