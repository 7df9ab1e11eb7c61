#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use guardian_agents::{AgentRegistry, AgentsConfig};
use guardian_core::generation::{GenerationError, GenerationRequest, TextGenerator};
use guardian_db::DbPool;

/// Records every request and answers with a fixed reply.
pub struct ScriptedGenerator {
    reply: Result<String, GenerationError>,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn ok(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: GenerationError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn last_request(&self) -> GenerationRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no generation request was made")
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone()
    }
}

pub async fn memory_pool() -> DbPool {
    let pool = guardian_db::create_pool("sqlite::memory:").await.unwrap();
    guardian_db::run_migrations(&pool).await.unwrap();
    pool
}

/// A registry with default config, every agent initialized.
pub async fn started_registry(generator: Arc<ScriptedGenerator>) -> (AgentRegistry, DbPool) {
    started_registry_with(&AgentsConfig::default(), generator).await
}

pub async fn started_registry_with(
    config: &AgentsConfig,
    generator: Arc<ScriptedGenerator>,
) -> (AgentRegistry, DbPool) {
    let pool = memory_pool().await;
    let registry = AgentRegistry::build(config, pool.clone(), generator).unwrap();
    registry.initialize_enabled().await.unwrap();
    (registry, pool)
}
