//! Sequential provisioning pipeline.
//!
//! Every step feeds the next (the assistant id from step 2 is what steps 3
//! and 4 attach to), so the pipeline is strictly ordered and aborts on the
//! first failure. Reruns are safe: resources are looked up by name before
//! they are created, and already-attached conflicts are tolerated.

use tracing::instrument;

use crate::client::ManagementClient;
use crate::config::DeployConfig;
use crate::descriptors;
use crate::envfile;
use crate::error::DeployError;

/// What a pipeline run created or confirmed.
#[derive(Debug)]
pub struct DeploySummary {
    /// Assistant resource id.
    pub assistant_id: String,
    /// Number of tools ensured and attached.
    pub tool_count: usize,
    /// Number of knowledge sources ensured and attached.
    pub knowledge_count: usize,
    /// Call-analytics service SID, when that step ran.
    pub intelligence_service_sid: Option<String>,
}

/// Runs the provisioning steps against the management API.
pub struct Provisioner<'a> {
    client: &'a ManagementClient,
    config: &'a DeployConfig,
}

impl<'a> Provisioner<'a> {
    #[must_use]
    pub const fn new(client: &'a ManagementClient, config: &'a DeployConfig) -> Self {
        Self { client, config }
    }

    /// Run the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first step's error; later steps do not run.
    #[instrument(skip(self))]
    pub async fn run(&self, skip_voice_intelligence: bool) -> Result<DeploySummary, DeployError> {
        tracing::info!("Step 1: Checking webhook deployment");
        self.client
            .check_webhooks(&self.config.webhook_base_url)
            .await?;

        tracing::info!("Step 2: Ensuring assistant");
        let assistant_id = self.ensure_assistant().await?;

        tracing::info!("Step 3: Ensuring and attaching tools");
        let tool_count = self.ensure_tools(&assistant_id).await?;

        tracing::info!("Step 4: Ensuring and attaching knowledge");
        let knowledge_count = self.ensure_knowledge(&assistant_id).await?;

        let intelligence_service_sid = if skip_voice_intelligence {
            tracing::info!("Step 5: Skipping call analytics (flag)");
            None
        } else {
            tracing::info!("Step 5: Ensuring call analytics");
            Some(self.ensure_call_analytics().await?)
        };

        tracing::info!("Step 6: Persisting resource ids");
        self.persist(&assistant_id, intelligence_service_sid.as_deref())?;

        Ok(DeploySummary {
            assistant_id,
            tool_count,
            knowledge_count,
            intelligence_service_sid,
        })
    }

    /// Find the assistant by name, creating it with the personality prompt
    /// if it does not exist yet.
    async fn ensure_assistant(&self) -> Result<String, DeployError> {
        let existing = self
            .client
            .list_assistants()
            .await?
            .into_iter()
            .find(|a| a.name == self.config.assistant_name);

        if let Some(assistant) = existing {
            tracing::info!(assistant_id = %assistant.id, "assistant already exists");
            return Ok(assistant.id);
        }

        let prompt = self.config.personality_prompt()?;
        let assistant = self
            .client
            .create_assistant(&self.config.assistant_name, &prompt)
            .await?;
        tracing::info!(assistant_id = %assistant.id, "assistant created");
        Ok(assistant.id)
    }

    /// Ensure every tool descriptor exists and is attached to the assistant.
    async fn ensure_tools(&self, assistant_id: &str) -> Result<usize, DeployError> {
        let existing = self.client.list_tools().await?;
        let tools = descriptors::tools();

        for descriptor in &tools {
            let tool_id = match existing.iter().find(|t| t.name == descriptor.name) {
                Some(tool) => {
                    tracing::info!(tool = descriptor.name, tool_id = %tool.id, "tool already exists");
                    tool.id.clone()
                }
                None => {
                    let tool = self
                        .client
                        .create_tool(descriptor, &self.config.webhook_base_url)
                        .await?;
                    tracing::info!(tool = descriptor.name, tool_id = %tool.id, "tool created");
                    tool.id
                }
            };

            tolerate_conflict(
                self.client.attach_tool(assistant_id, &tool_id).await,
                descriptor.name,
            )?;
        }

        Ok(tools.len())
    }

    /// Ensure every knowledge descriptor exists and is attached.
    async fn ensure_knowledge(&self, assistant_id: &str) -> Result<usize, DeployError> {
        let existing = self.client.list_knowledge().await?;
        let sources = descriptors::knowledge();

        for descriptor in &sources {
            let knowledge_id = match existing.iter().find(|k| k.name == descriptor.name) {
                Some(knowledge) => {
                    tracing::info!(
                        knowledge = descriptor.name,
                        knowledge_id = %knowledge.id,
                        "knowledge already exists"
                    );
                    knowledge.id.clone()
                }
                None => {
                    let knowledge = self.client.create_knowledge(descriptor).await?;
                    tracing::info!(
                        knowledge = descriptor.name,
                        knowledge_id = %knowledge.id,
                        "knowledge created"
                    );
                    knowledge.id
                }
            };

            tolerate_conflict(
                self.client.attach_knowledge(assistant_id, &knowledge_id).await,
                descriptor.name,
            )?;
        }

        Ok(sources.len())
    }

    /// Ensure the call-analytics service and its scoring operator.
    ///
    /// An existing service (found by unique name) is taken as fully
    /// provisioned from an earlier run; the operator is only created
    /// alongside a fresh service.
    async fn ensure_call_analytics(&self) -> Result<String, DeployError> {
        let unique_name = &self.config.intelligence_unique_name;

        if let Some(service) = self.client.find_intelligence_service(unique_name).await? {
            tracing::info!(service_sid = %service.sid, "call analytics already provisioned");
            return Ok(service.sid);
        }

        let service = self.client.create_intelligence_service(unique_name).await?;
        tracing::info!(service_sid = %service.sid, "call analytics service created");

        let operator = self.client.create_call_scoring_operator().await?;
        tracing::info!(operator_sid = %operator.sid, "call scoring operator created");

        tolerate_conflict(
            self.client.attach_operator(&service.sid, &operator.sid).await,
            "CallScoring",
        )?;

        Ok(service.sid)
    }

    /// Write the ids this run settled on back into the env file.
    fn persist(&self, assistant_id: &str, service_sid: Option<&str>) -> Result<(), DeployError> {
        let mut updates = vec![("ASSISTANT_ID", assistant_id.to_owned())];
        if let Some(sid) = service_sid {
            updates.push(("INTELLIGENCE_SERVICE_SID", sid.to_owned()));
        }
        envfile::upsert_env_vars(&self.config.env_file, &updates)
    }
}

/// Treat an already-attached conflict as success.
fn tolerate_conflict(result: Result<(), DeployError>, what: &str) -> Result<(), DeployError> {
    match result {
        Err(DeployError::Api {
            status: 409,
            message,
        }) => {
            tracing::debug!(what, %message, "already attached");
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_are_tolerated() {
        let result = tolerate_conflict(
            Err(DeployError::Api {
                status: 409,
                message: "already attached".to_owned(),
            }),
            "Customer Lookup",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn other_api_errors_still_fail() {
        let result = tolerate_conflict(
            Err(DeployError::Api {
                status: 401,
                message: "bad credentials".to_owned(),
            }),
            "Customer Lookup",
        );
        assert!(matches!(result, Err(DeployError::Api { status: 401, .. })));
    }
}
