//! Shared application state.

use std::sync::Arc;

use owl_shoes_store::{AirtableStore, RecordStore, StoreError, SupabaseStore};

use crate::config::{StoreBackend, WebhooksConfig};
use crate::voice::VoiceClient;

/// State shared across all webhook handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<WebhooksConfig>,
    store: Arc<dyn RecordStore>,
    voice: Option<Arc<VoiceClient>>,
}

impl AppState {
    /// Build state from configuration, constructing the configured backend.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend client cannot be constructed
    /// from the given credentials.
    pub fn from_config(config: WebhooksConfig) -> Result<Self, StoreError> {
        let store: Arc<dyn RecordStore> = match &config.store {
            StoreBackend::Airtable { api_key, base_id } => {
                Arc::new(AirtableStore::new(api_key, base_id)?)
            }
            StoreBackend::Supabase {
                project_url,
                service_key,
            } => Arc::new(SupabaseStore::new(project_url, service_key)?),
        };

        let voice = config.voice.as_ref().map(|vc| Arc::new(VoiceClient::new(vc)));

        Ok(Self {
            config: Arc::new(config),
            store,
            voice,
        })
    }

    /// Assemble state from pre-built parts. Used by tests to inject the
    /// in-memory store.
    #[must_use]
    pub fn with_parts(
        config: WebhooksConfig,
        store: Arc<dyn RecordStore>,
        voice: Option<Arc<VoiceClient>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            voice,
        }
    }

    /// The configured record store.
    #[must_use]
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Server configuration.
    #[must_use]
    pub fn config(&self) -> &WebhooksConfig {
        &self.config
    }

    /// Voice client, when transfer credentials are configured.
    #[must_use]
    pub fn voice(&self) -> Option<&VoiceClient> {
        self.voice.as_deref()
    }
}
