//! Owns the four agents for the lifetime of the service.

use std::sync::Arc;

use guardian_core::generation::TextGenerator;
use guardian_db::DbPool;

use crate::advisor::HealthAdvisor;
use crate::config::AgentsConfig;
use crate::error::AgentError;
use crate::intake::IntakeAgent;
use crate::lifecycle::{Agent, AgentStatus};
use crate::medication::MedicationManager;
use crate::vitals::VitalSignsMonitor;

/// Created once at startup and shared via `Arc` with request handlers.
pub struct AgentRegistry {
    intake: IntakeAgent,
    medication_manager: MedicationManager,
    vital_signs_monitor: VitalSignsMonitor,
    health_advisor: HealthAdvisor,
}

impl AgentRegistry {
    /// Build every agent from configuration. Nothing is started yet.
    pub fn build(
        config: &AgentsConfig,
        pool: DbPool,
        generator: Arc<dyn TextGenerator>,
    ) -> Result<Self, AgentError> {
        let a = &config.agents;
        Ok(Self {
            intake: IntakeAgent::new(&a.intake, Arc::clone(&generator)),
            medication_manager: MedicationManager::new(
                &a.medication_manager,
                pool,
                Arc::clone(&generator),
            ),
            vital_signs_monitor: VitalSignsMonitor::new(
                &a.vital_signs_monitor,
                Arc::clone(&generator),
            )?,
            health_advisor: HealthAdvisor::new(&a.health_advisor, generator),
        })
    }

    pub fn intake(&self) -> &IntakeAgent {
        &self.intake
    }

    pub fn medication_manager(&self) -> &MedicationManager {
        &self.medication_manager
    }

    pub fn vital_signs_monitor(&self) -> &VitalSignsMonitor {
        &self.vital_signs_monitor
    }

    pub fn health_advisor(&self) -> &HealthAdvisor {
        &self.health_advisor
    }

    /// All agents in registration order.
    pub fn all(&self) -> [&dyn Agent; 4] {
        [
            &self.intake,
            &self.medication_manager,
            &self.vital_signs_monitor,
            &self.health_advisor,
        ]
    }

    /// Initialize every enabled agent. Disabled agents stay unavailable.
    pub async fn initialize_enabled(&self) -> Result<(), AgentError> {
        for agent in self.all() {
            if agent.enabled() {
                tracing::info!(agent = agent.key(), "Initializing agent");
                agent.initialize().await?;
            } else {
                tracing::info!(agent = agent.key(), "Agent disabled, skipping");
            }
        }
        Ok(())
    }

    /// Shut down every agent, enabled or not.
    pub async fn shutdown_all(&self) {
        for agent in self.all() {
            agent.shutdown().await;
        }
    }

    /// Registry keys of the enabled agents.
    pub fn enabled_keys(&self) -> Vec<&'static str> {
        self.all()
            .into_iter()
            .filter(|a| a.enabled())
            .map(|a| a.key())
            .collect()
    }

    pub fn statuses(&self) -> Vec<AgentStatus> {
        self.all().into_iter().map(|a| a.status()).collect()
    }
}
