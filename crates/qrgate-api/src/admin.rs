// Administrative operations: field agent management and QR batch generation.
// The backend only serves these to SUPER_ADMIN sessions.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::GraphqlClient;
use crate::error::Error;
use crate::queries;
use crate::types::{AgentResponse, CreateAgentInput, GenerateQrBatchInput, IdPayload, QrBatchResponse};

#[derive(Deserialize)]
struct AgentsData {
    #[serde(default)]
    agents: Option<Vec<AgentResponse>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAgentData {
    create_agent_user: Option<IdPayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeactivateAgentData {
    deactivate_agent: Option<IdPayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBatchData {
    generate_qr_code_batch: Option<QrBatchResponse>,
}

impl GraphqlClient {
    /// List field agents.
    pub async fn agents(&self) -> Result<Vec<AgentResponse>, Error> {
        debug!("listing agents");
        let data: AgentsData = self
            .execute::<_, serde_json::Value>("Agents", queries::AGENTS, None)
            .await?;
        Ok(data.agents.unwrap_or_default())
    }

    /// Create an agent account. Returns the new agent's id, or `None` when
    /// the backend answered with a `null` payload.
    pub async fn create_agent_user(&self, input: &CreateAgentInput) -> Result<Option<String>, Error> {
        debug!(phone = %input.phone_number, "creating agent");
        let data: CreateAgentData = self
            .execute(
                "CreateAgentUser",
                queries::CREATE_AGENT_USER,
                Some(&json!({ "input": input })),
            )
            .await?;
        Ok(data.create_agent_user.map(|p| p.id))
    }

    /// Deactivate an agent account.
    pub async fn deactivate_agent(&self, agent_id: &str) -> Result<Option<String>, Error> {
        debug!(agent_id, "deactivating agent");
        let data: DeactivateAgentData = self
            .execute(
                "DeactivateAgent",
                queries::DEACTIVATE_AGENT,
                Some(&json!({ "agentId": agent_id })),
            )
            .await?;
        Ok(data.deactivate_agent.map(|p| p.id))
    }

    /// Mint a new batch of codes, each with a rendered PNG data URL.
    pub async fn generate_qr_code_batch(
        &self,
        input: &GenerateQrBatchInput,
    ) -> Result<Option<QrBatchResponse>, Error> {
        debug!(count = input.count, source = %input.source, "generating QR batch");
        let data: GenerateBatchData = self
            .execute(
                "GenerateQrCodeBatch",
                queries::GENERATE_QR_CODE_BATCH,
                Some(&json!({ "input": input })),
            )
            .await?;
        Ok(data.generate_qr_code_batch)
    }
}
