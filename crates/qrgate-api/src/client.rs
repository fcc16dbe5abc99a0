// GraphQL HTTP client
//
// Wraps `reqwest::Client` with the `{ query, variables, operationName }`
// request body and `{ data, errors }` envelope unwrapping. Operation-specific
// methods live in sibling modules (qr, business, auth) as inherent impls so
// this module stays focused on transport mechanics.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Request body sent for every operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphqlRequest<'a, V: Serialize> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<&'a V>,
    operation_name: &'a str,
}

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphqlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    message: Option<String>,
}

/// Raw HTTP client for the QR-assignment GraphQL endpoint.
///
/// All methods return the unwrapped `data` payload; the envelope is stripped
/// and the first `errors` entry is turned into [`Error::GraphQl`].
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl GraphqlClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `endpoint` is the full GraphQL URL (e.g. `https://api.example.com/graphql`).
    pub fn new(endpoint: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, endpoint })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn from_reqwest(endpoint: &str, http: reqwest::Client) -> Result<Self, Error> {
        let endpoint = Url::parse(endpoint)?;
        Ok(Self { http, endpoint })
    }

    /// The GraphQL endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST an operation and unwrap the response envelope.
    pub(crate) async fn execute<T, V>(
        &self,
        operation_name: &str,
        query: &str,
        variables: Option<&V>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        V: Serialize,
    {
        debug!(operation = operation_name, "POST {}", self.endpoint);

        let body = GraphqlRequest {
            query,
            variables,
            operation_name,
        };

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
            });
        }

        let text = resp.text().await.map_err(Error::Transport)?;
        parse_envelope(&text)
    }
}

/// Parse the `{ data, errors }` envelope. Errors win over data.
fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    let envelope: GraphqlResponse<T> =
        serde_json::from_str(body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.to_owned(),
        })?;

    if let Some(first) = envelope.errors.and_then(|errs| errs.into_iter().next()) {
        return Err(Error::GraphQl {
            message: first
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "GraphQL error".into()),
        });
    }

    envelope.data.ok_or(Error::MissingData)
}
