pub mod advice;
pub mod agents;
pub mod intake;
pub mod medications;
pub mod patients;
pub mod vitals;
