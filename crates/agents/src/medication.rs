//! Medication manager: tracking, reminders, adherence, and refills.
//!
//! Reminders are driven by a background task started in
//! [`Agent::initialize`]. Each tick fires every reminder whose scheduled
//! time fell between the previous tick and now.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Timelike, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use guardian_core::agent_names::AGENT_MEDICATION_MANAGER;
use guardian_core::error::CoreError;
use guardian_core::generation::{GenerationRequest, TextGenerator};
use guardian_core::medication::{
    compute_adherence, due_reminders, refill_due, validate_adherence_window, AdherenceReport,
    NewMedication, ReminderTime,
};
use guardian_core::prompts;
use guardian_core::types::{DbId, PatientId, Timestamp};
use guardian_db::models::medication::{Medication, MedicationDose};
use guardian_db::repositories::{MedicationRepo, PatientRepo};
use guardian_db::DbPool;

use crate::config::MedicationSettings;
use crate::error::{classify_write_error, AgentError};
use crate::lifecycle::{Agent, Lifecycle};

const DEFAULT_NAME: &str = "Medication Manager";
const DEFAULT_TEMPERATURE: f32 = 0.3;

/// How long shutdown waits for the scheduler task to exit.
const SCHEDULER_STOP_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MedicationAdherence {
    pub medication_id: DbId,
    pub medication: String,
    #[serde(flatten)]
    pub report: AdherenceReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdherenceSummary {
    pub patient_id: PatientId,
    pub window_days: u32,
    #[serde(flatten)]
    pub overall: AdherenceReport,
    pub medications: Vec<MedicationAdherence>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefillNotice {
    pub medication_id: DbId,
    pub medication: String,
    pub refill_date: Timestamp,
    pub days_remaining: i64,
}

/// A generated reminder for one scheduled dose.
#[derive(Debug, Clone, Serialize)]
pub struct Reminder {
    pub medication_id: DbId,
    pub patient_id: PatientId,
    pub due_at: Timestamp,
    pub message: String,
}

// ---------------------------------------------------------------------------
// MedicationManager
// ---------------------------------------------------------------------------

struct SchedulerTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// State the scheduler task needs, cloned out of the manager.
#[derive(Clone)]
struct ReminderContext {
    pool: DbPool,
    generator: Arc<dyn TextGenerator>,
    temperature: f32,
}

pub struct MedicationManager {
    lifecycle: Lifecycle,
    reminder_interval: Duration,
    context: ReminderContext,
    scheduler: Mutex<Option<SchedulerTask>>,
}

impl MedicationManager {
    pub fn new(
        settings: &MedicationSettings,
        pool: DbPool,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            lifecycle: Lifecycle::new(
                AGENT_MEDICATION_MANAGER,
                settings.agent.display_name(DEFAULT_NAME),
                settings.agent.enabled,
            ),
            reminder_interval: Duration::from_secs(settings.reminder_interval_secs.max(1)),
            context: ReminderContext {
                pool,
                generator,
                temperature: settings.agent.temperature_or(DEFAULT_TEMPERATURE),
            },
            scheduler: Mutex::new(None),
        }
    }

    /// Start tracking a medication for a registered patient.
    pub async fn add_medication(
        &self,
        patient_id: &str,
        medication: &NewMedication,
    ) -> Result<Medication, AgentError> {
        self.lifecycle.ensure_ready()?;
        medication.validate()?;
        self.require_patient(patient_id).await?;

        let created = MedicationRepo::create(&self.context.pool, patient_id, medication, Utc::now())
            .await
            .map_err(|e| {
                classify_write_error(
                    e,
                    || format!("medication {} is already tracked", medication.name.trim()),
                    || CoreError::not_found("Patient", patient_id),
                )
            })?;

        tracing::info!(
            patient_id,
            medication_id = created.id,
            medication = %created.name,
            reminders = created.times.0.len(),
            "Medication added with reminders",
        );
        Ok(created)
    }

    pub async fn list_medications(&self, patient_id: &str) -> Result<Vec<Medication>, AgentError> {
        self.lifecycle.ensure_ready()?;
        self.require_patient(patient_id).await?;
        Ok(MedicationRepo::list_for_patient(&self.context.pool, patient_id).await?)
    }

    /// Generate the reminder text for one scheduled dose.
    pub async fn send_reminder(
        &self,
        medication: &Medication,
        due_at: Timestamp,
    ) -> Result<Reminder, AgentError> {
        self.lifecycle.ensure_ready()?;
        self.context.send_reminder(medication, due_at).await
    }

    /// Record a dose taken now, or at `taken_at` when given.
    pub async fn record_dose(
        &self,
        patient_id: &str,
        medication_id: DbId,
        taken_at: Option<Timestamp>,
    ) -> Result<MedicationDose, AgentError> {
        self.lifecycle.ensure_ready()?;
        let medication = self.require_medication(patient_id, medication_id).await?;

        let taken_at = taken_at.unwrap_or_else(Utc::now);
        if taken_at > Utc::now() {
            return Err(CoreError::Validation("taken_at must not be in the future".to_string()).into());
        }

        let dose = MedicationRepo::record_dose(&self.context.pool, medication.id, taken_at).await?;
        tracing::info!(patient_id, medication_id, "Dose recorded");
        Ok(dose)
    }

    /// Adherence per medication and overall across the last `window_days`.
    pub async fn check_adherence(
        &self,
        patient_id: &str,
        window_days: u32,
    ) -> Result<AdherenceSummary, AgentError> {
        self.lifecycle.ensure_ready()?;
        validate_adherence_window(window_days)?;
        self.require_patient(patient_id).await?;
        tracing::info!(patient_id, window_days, "Checking medication adherence");

        let now = Utc::now();
        let since = now - chrono::Duration::days(i64::from(window_days));
        let medications = MedicationRepo::list_for_patient(&self.context.pool, patient_id).await?;

        let mut per_medication = Vec::with_capacity(medications.len());
        for med in medications.iter().filter(|m| m.is_active) {
            let doses = MedicationRepo::list_doses(&self.context.pool, med.id, since).await?;
            let taken_at: Vec<Timestamp> = doses.iter().map(|d| d.taken_at).collect();
            let report = compute_adherence(&med.times.0, med.started_at, &taken_at, now, window_days);
            per_medication.push(MedicationAdherence {
                medication_id: med.id,
                medication: med.name.clone(),
                report,
            });
        }

        let reports: Vec<AdherenceReport> = per_medication.iter().map(|m| m.report).collect();
        Ok(AdherenceSummary {
            patient_id: patient_id.to_string(),
            window_days,
            overall: AdherenceReport::combine(&reports),
            medications: per_medication,
        })
    }

    /// Active medications whose refill is due within the warning window.
    pub async fn check_refills(&self, patient_id: &str) -> Result<Vec<RefillNotice>, AgentError> {
        self.lifecycle.ensure_ready()?;
        self.require_patient(patient_id).await?;
        tracing::info!(patient_id, "Checking refills");

        let now = Utc::now();
        let medications = MedicationRepo::list_for_patient(&self.context.pool, patient_id).await?;
        Ok(medications
            .into_iter()
            .filter(|m| m.is_active)
            .filter_map(|m| {
                let refill_date = m.refill_date?;
                let days_remaining = refill_due(refill_date, now)?;
                Some(RefillNotice {
                    medication_id: m.id,
                    medication: m.name,
                    refill_date,
                    days_remaining,
                })
            })
            .collect())
    }

    async fn require_patient(&self, patient_id: &str) -> Result<(), AgentError> {
        if PatientRepo::exists(&self.context.pool, patient_id).await? {
            Ok(())
        } else {
            Err(CoreError::not_found("Patient", patient_id).into())
        }
    }

    async fn require_medication(
        &self,
        patient_id: &str,
        medication_id: DbId,
    ) -> Result<Medication, AgentError> {
        MedicationRepo::find_by_id(&self.context.pool, medication_id)
            .await?
            .filter(|m| m.patient_id == patient_id)
            .ok_or_else(|| CoreError::not_found("Medication", medication_id).into())
    }

    fn scheduler_running(&self) -> bool {
        self.scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }
}

#[async_trait]
impl Agent for MedicationManager {
    fn key(&self) -> &'static str {
        self.lifecycle.key()
    }

    fn name(&self) -> &str {
        self.lifecycle.name()
    }

    fn enabled(&self) -> bool {
        self.lifecycle.enabled()
    }

    /// Start the reminder scheduler. Calling it again while running is a no-op.
    async fn initialize(&self) -> Result<(), AgentError> {
        {
            let mut slot = self.scheduler.lock().unwrap_or_else(PoisonError::into_inner);
            let running = slot.as_ref().is_some_and(|task| !task.handle.is_finished());
            if !running {
                let cancel = CancellationToken::new();
                let handle = tokio::spawn(run_reminder_scheduler(
                    self.context.clone(),
                    self.reminder_interval,
                    cancel.clone(),
                ));
                *slot = Some(SchedulerTask { cancel, handle });
            }
        }
        self.lifecycle.mark_initialized();
        Ok(())
    }

    async fn shutdown(&self) {
        let task = self
            .scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.cancel.cancel();
            if tokio::time::timeout(SCHEDULER_STOP_TIMEOUT, task.handle)
                .await
                .is_err()
            {
                tracing::warn!("Reminder scheduler did not stop in time");
            }
        }
        self.lifecycle.mark_shut_down();
    }

    fn is_healthy(&self) -> bool {
        self.lifecycle.is_initialized() && self.scheduler_running()
    }
}

// ---------------------------------------------------------------------------
// Reminder scheduler
// ---------------------------------------------------------------------------

impl ReminderContext {
    async fn send_reminder(
        &self,
        medication: &Medication,
        due_at: Timestamp,
    ) -> Result<Reminder, AgentError> {
        let time = ReminderTime::new(due_at.hour(), due_at.minute())
            .ok_or_else(|| CoreError::Internal(format!("invalid reminder instant {due_at}")))?;

        let prompt = prompts::medication_reminder(
            &medication.name,
            &medication.dosage,
            &medication.instructions,
            time,
        );
        let message = self
            .generator
            .generate(&GenerationRequest::new(prompt, self.temperature))
            .await?;

        // Delivery channels (SMS, email, push) are outside this service.
        tracing::info!(
            patient_id = %medication.patient_id,
            medication_id = medication.id,
            due_at = %due_at,
            "Reminder sent",
        );
        Ok(Reminder {
            medication_id: medication.id,
            patient_id: medication.patient_id.clone(),
            due_at,
            message,
        })
    }

    /// Send every reminder due in `(since, until]`. Failures are logged and
    /// do not stop the remaining reminders.
    async fn fire_due(&self, since: Timestamp, until: Timestamp) -> Vec<Reminder> {
        let medications = match MedicationRepo::list_active(&self.pool).await {
            Ok(m) => m,
            Err(e) => {
                tracing::error!(error = %e, "Reminder scheduler: failed to load medications");
                return Vec::new();
            }
        };

        let mut sent = Vec::new();
        for med in &medications {
            for due_at in due_reminders(&med.times.0, since.max(med.started_at), until) {
                match self.send_reminder(med, due_at).await {
                    Ok(reminder) => sent.push(reminder),
                    Err(e) => tracing::error!(
                        error = %e,
                        medication_id = med.id,
                        "Reminder scheduler: failed to send reminder",
                    ),
                }
            }
        }
        sent
    }
}

/// Tick every `interval` until cancelled.
async fn run_reminder_scheduler(
    context: ReminderContext,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = interval.as_secs(), "Reminder scheduler started");

    let mut ticker = tokio::time::interval(interval);
    let mut last_tick = Utc::now();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reminder scheduler stopping");
                break;
            }
            _ = ticker.tick() => {
                let now = Utc::now();
                let sent = context.fire_due(last_tick, now).await;
                if !sent.is_empty() {
                    tracing::info!(count = sent.len(), "Reminder scheduler: reminders sent");
                }
                last_tick = now;
            }
        }
    }
}
