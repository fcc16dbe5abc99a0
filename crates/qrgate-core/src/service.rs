// ── Service facade ──
//
// `QrService` wires one GraphQL client, the decode strategy chosen at
// startup, the lookup/assign resolver and the verification workflow
// together. The CLI builds exactly one per invocation.

use std::path::Path;
use std::sync::Arc;

use qrgate_api::auth::AdminRole;
use qrgate_api::types::{CreateAgentInput, GenerateQrBatchInput};
use qrgate_api::{GraphqlClient, TransportConfig};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::admin::{Agent, BATCH_SOURCE, QrBatch, normalize_agent_phone};
use crate::config::ServiceConfig;
use crate::decode::{self, DecodeStrategy, PlatformDetector, select_strategy};
use crate::error::CoreError;
use crate::model::{Category, QrCandidate, QrLookupResult, UnassignedCode};
use crate::normalize::{normalize, normalize_indian_phone, parse_otp};
use crate::resolver::QrResolver;
use crate::scan::{CameraProvider, Scanner};
use crate::verification::BusinessVerifier;

pub struct QrService {
    config: ServiceConfig,
    client: GraphqlClient,
    decoder: Arc<dyn DecodeStrategy>,
    resolver: QrResolver,
    verifier: BusinessVerifier,
}

impl QrService {
    /// Build the HTTP client from `config` and pick a decoder.
    pub fn new(config: ServiceConfig) -> Result<Self, CoreError> {
        let mut transport = TransportConfig {
            timeout: config.timeout,
            ..TransportConfig::default()
        };
        if let Some(token) = config.auth_token.clone() {
            transport = transport.with_auth_token(token);
        }
        let client = GraphqlClient::new(config.endpoint.clone(), &transport)?;
        Ok(Self::with_client(config, client))
    }

    /// Use a pre-built client (tests, custom transports).
    pub fn with_client(config: ServiceConfig, client: GraphqlClient) -> Self {
        Self {
            resolver: QrResolver::new(client.clone()),
            verifier: BusinessVerifier::new(client.clone()),
            decoder: select_strategy(None),
            config,
            client,
        }
    }

    /// Pick the decoder again with a platform barcode detector available.
    #[must_use]
    pub fn with_platform_detector(mut self, detector: Arc<dyn PlatformDetector>) -> Self {
        self.decoder = select_strategy(Some(detector));
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn client(&self) -> &GraphqlClient {
        &self.client
    }

    pub fn decoder(&self) -> &Arc<dyn DecodeStrategy> {
        &self.decoder
    }

    pub fn resolver(&self) -> &QrResolver {
        &self.resolver
    }

    pub fn verifier(&self) -> &BusinessVerifier {
        &self.verifier
    }

    // ── QR resolution ────────────────────────────────────────────────

    /// Normalize typed or pasted input and validate it.
    pub async fn lookup_input(&self, raw: &str) -> Result<Option<QrLookupResult>, CoreError> {
        self.resolver.lookup(&normalize(raw)).await
    }

    /// Decode a still image and normalize its payload.
    ///
    /// `Ok(None)` means the image holds no readable code.
    pub fn decode_file(&self, path: &Path) -> Result<Option<QrCandidate>, CoreError> {
        let payload = decode::decode_image(path, self.decoder.as_ref())?;
        Ok(payload.map(|p| normalize(&p)).filter(|c| !c.is_empty()))
    }

    /// Same as [`decode_file`](Self::decode_file) for an in-memory upload.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Option<QrCandidate>, CoreError> {
        let bitmap = decode::load_bitmap_from_bytes(bytes)?;
        let payload = self.decoder.decode(&bitmap)?;
        Ok(payload.map(|p| normalize(&p)).filter(|c| !c.is_empty()))
    }

    /// A scanner over `camera` using this service's decoder and interval.
    pub fn scanner(&self, camera: Arc<dyn CameraProvider>) -> Scanner {
        Scanner::new(camera, Arc::clone(&self.decoder)).with_interval(self.config.scan_interval)
    }

    /// Fallback list of codes available for assignment.
    pub async fn unassigned_codes(&self, limit: Option<u32>) -> Result<Vec<UnassignedCode>, CoreError> {
        let limit = limit.unwrap_or(self.config.unassigned_limit);
        if limit == 0 {
            return Err(CoreError::validation("Limit must be at least 1"));
        }
        let codes = self.client.unassigned_qr_codes(limit).await?;
        debug!(count = codes.len(), limit, "unassigned codes fetched");
        Ok(codes.into_iter().map(UnassignedCode::from).collect())
    }

    pub async fn categories(&self) -> Result<Vec<Category>, CoreError> {
        let categories = self.client.categories().await?;
        Ok(categories.into_iter().map(Category::from).collect())
    }

    // ── Agent login ──────────────────────────────────────────────────

    /// Text a login OTP. Returns the normalized phone number to verify with.
    pub async fn send_login_otp(&self, phone: &str, role: AdminRole) -> Result<String, CoreError> {
        let phone = normalize_indian_phone(phone);
        if phone.is_empty() {
            return Err(CoreError::validation("Please enter a phone number"));
        }
        let response = self.client.send_login_otp(&phone, role).await?;
        if !response.success {
            return Err(CoreError::rejected(response.error_message, "Failed to send OTP"));
        }
        info!(%role, "login OTP sent");
        Ok(phone)
    }

    /// Exchange a login OTP for a session token.
    pub async fn verify_login_otp(
        &self,
        phone: &str,
        otp: &str,
        role: AdminRole,
    ) -> Result<SecretString, CoreError> {
        let otp = parse_otp(otp)?;
        let response = self.client.verify_login_otp(phone, &otp, role).await?;
        match response.token.filter(|t| !t.is_empty()) {
            Some(token) if response.verified => {
                info!(%role, "agent logged in");
                Ok(SecretString::from(token))
            }
            _ => Err(CoreError::rejected(
                response.error_message,
                "OTP verification failed",
            )),
        }
    }

    // ── Administration ───────────────────────────────────────────────

    pub async fn agents(&self) -> Result<Vec<Agent>, CoreError> {
        let agents = self.client.agents().await?;
        Ok(agents.into_iter().map(Agent::from).collect())
    }

    /// Create a field agent account. Returns the new agent's id.
    ///
    /// The phone is reduced to ten digits with a `+91` prefix; a blank
    /// email is sent as `null`.
    pub async fn create_agent(
        &self,
        name: &str,
        phone: &str,
        email: Option<&str>,
    ) -> Result<String, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("Agent name is required"));
        }
        let phone_number = normalize_agent_phone(phone);
        if phone_number.is_empty() {
            return Err(CoreError::validation("Please enter a phone number"));
        }
        let input = CreateAgentInput {
            phone_number,
            name: name.to_owned(),
            email: email.map(str::trim).filter(|e| !e.is_empty()).map(str::to_owned),
        };
        let id = self
            .client
            .create_agent_user(&input)
            .await?
            .ok_or_else(|| CoreError::rejected(None, "Failed to create agent"))?;
        info!(agent_id = %id, "agent created");
        Ok(id)
    }

    pub async fn deactivate_agent(&self, agent_id: &str) -> Result<(), CoreError> {
        let agent_id = agent_id.trim();
        if agent_id.is_empty() {
            return Err(CoreError::validation("Agent id is required"));
        }
        self.client
            .deactivate_agent(agent_id)
            .await?
            .ok_or_else(|| CoreError::rejected(None, "Failed to deactivate agent"))?;
        info!(agent_id, "agent deactivated");
        Ok(())
    }

    /// Mint `count` new codes and decode their PNG images.
    pub async fn generate_batch(&self, count: u32) -> Result<QrBatch, CoreError> {
        if count == 0 {
            return Err(CoreError::validation("Count must be at least 1"));
        }
        let input = GenerateQrBatchInput {
            count,
            source: BATCH_SOURCE.to_owned(),
        };
        let raw = self
            .client
            .generate_qr_code_batch(&input)
            .await?
            .ok_or_else(|| CoreError::rejected(None, "Failed to generate batch"))?;
        let batch = QrBatch::try_from(raw)?;
        info!(label = %batch.label(), codes = batch.codes.len(), "QR batch generated");
        Ok(batch)
    }
}

