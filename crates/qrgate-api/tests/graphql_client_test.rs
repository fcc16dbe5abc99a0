// Integration tests for `GraphqlClient` using wiremock.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

use qrgate_api::auth::AdminRole;
use qrgate_api::types::{
    AssignQrCodeInput, CreateAgentInput, GenerateQrBatchInput, SubmitBusinessDetailsInput,
};
use qrgate_api::{Error, GraphqlClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GraphqlClient) {
    let server = MockServer::start().await;
    let endpoint = format!("{}/graphql", server.uri());
    let client = GraphqlClient::from_reqwest(&endpoint, reqwest::Client::new()).unwrap();
    (server, client)
}

fn graphql_op(name: &str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "operationName": name })))
}

// ── QR codes ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_lookup_assigned_code() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": "QrCodeLookup",
            "variables": { "code": "ABC123" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "qrCodeLookup": {
                    "code": "ABC123",
                    "status": "ASSIGNED",
                    "assignedBusinessName": "Joe's Cafe"
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.qr_code_lookup("ABC123").await.unwrap().unwrap();
    assert_eq!(result.code, "ABC123");
    assert_eq!(result.status, "ASSIGNED");
    assert_eq!(result.assigned_business_name.as_deref(), Some("Joe's Cafe"));
}

#[tokio::test]
async fn test_lookup_unknown_code_is_none() {
    let (server, client) = setup().await;

    graphql_op("QrCodeLookup")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "qrCodeLookup": null }
        })))
        .mount(&server)
        .await;

    assert!(client.qr_code_lookup("NOPE").await.unwrap().is_none());
}

#[tokio::test]
async fn test_assign_sends_input_object() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": "AssignQrCodeToBusiness",
            "variables": { "input": { "code": "ABC123", "business_id": "biz-9" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "assignQrCodeToBusiness": { "id": "qr-1", "code": "ABC123", "status": "ASSIGNED" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = AssignQrCodeInput {
        code: "ABC123".into(),
        business_id: "biz-9".into(),
    };
    let resp = client.assign_qr_code(&input).await.unwrap();
    assert_eq!(resp.id, "qr-1");
    assert_eq!(resp.status, "ASSIGNED");
}

#[tokio::test]
async fn test_unassigned_codes_with_limit() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": "UnassignedQrCodes",
            "variables": { "limit": 100 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "unassignedQrCodes": [
                    { "id": "1", "code": "AAA" },
                    { "id": "2", "code": "BBB" }
                ]
            }
        })))
        .mount(&server)
        .await;

    let codes = client.unassigned_qr_codes(100).await.unwrap();
    assert_eq!(codes.len(), 2);
    assert_eq!(codes[1].code, "BBB");
}

#[tokio::test]
async fn test_unassigned_codes_null_is_empty() {
    let (server, client) = setup().await;

    graphql_op("UnassignedQrCodes")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "unassignedQrCodes": null }
        })))
        .mount(&server)
        .await;

    assert!(client.unassigned_qr_codes(10).await.unwrap().is_empty());
}

// ── Business verification ───────────────────────────────────────────

#[tokio::test]
async fn test_categories_sent_without_variables() {
    let (server, client) = setup().await;

    graphql_op("Categories")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "categories": [{ "id": 3, "name": "Restaurant" }] }
        })))
        .mount(&server)
        .await;

    let cats = client.categories().await.unwrap();
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].id, 3);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("variables").is_none());
}

#[tokio::test]
async fn test_verify_gstin_payload() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": "VerifyGstin",
            "variables": { "input": { "gstin": "29ABCDE1234F1Z5" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "verifyGstin": {
                    "success": true,
                    "business_id": "biz-1",
                    "gstin": "29ABCDE1234F1Z5",
                    "businessName": "Joe Foods Pvt Ltd",
                    "tradeName": "Joe's Cafe",
                    "displayName": null,
                    "category": 3,
                    "phoneNumber": "+919876543210",
                    "email": "owner@example.com",
                    "address": null,
                    "city": "Bengaluru",
                    "state": "KA",
                    "pincode": "560001",
                    "errorMessage": null,
                    "alreadyExists": false
                }
            }
        })))
        .mount(&server)
        .await;

    let resp = client.verify_gstin("29ABCDE1234F1Z5").await.unwrap();
    assert!(resp.success);
    assert_eq!(resp.business_id.as_deref(), Some("biz-1"));
    assert_eq!(resp.business_name.as_deref(), Some("Joe Foods Pvt Ltd"));
    assert_eq!(resp.category, Some(3));
    assert_eq!(resp.already_exists, Some(false));
}

#[tokio::test]
async fn test_submit_details_uses_snake_case_business_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": "SubmitBusinessDetails",
            "variables": { "input": {
                "business_id": "biz-1",
                "displayName": "Joe's Cafe",
                "category": 3,
                "phoneNumber": "+919876543210",
                "businessEmail": "owner@example.com"
            } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "submitBusinessDetails": { "success": true, "message": null } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = SubmitBusinessDetailsInput {
        business_id: "biz-1".into(),
        display_name: "Joe's Cafe".into(),
        category: 3,
        phone_number: "+919876543210".into(),
        business_email: "owner@example.com".into(),
    };
    assert!(client.submit_business_details(&input).await.unwrap().success);
}

#[tokio::test]
async fn test_verify_otp_top_level_variables() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": "VerifyOtp",
            "variables": { "business_id": "biz-1", "phoneNumber": "+919876543210", "otp": "1234" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "verifyOtp": { "success": false, "message": "Invalid OTP" } }
        })))
        .mount(&server)
        .await;

    let resp = client.verify_otp("biz-1", "+919876543210", "1234").await.unwrap();
    assert!(!resp.success);
    assert_eq!(resp.message.as_deref(), Some("Invalid OTP"));
}

// ── Login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_round_trip_with_role() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": "SendLoginOtp",
            "variables": { "input": { "phoneNumber": "+919876543210", "role": "AGENT" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "sendLoginOtp": { "success": true, "errorMessage": null } }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": "VerifyLoginOtp",
            "variables": { "input": { "otp": "4321", "role": "AGENT" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "verifyLoginOtp": { "verified": true, "token": "tok-abc", "errorMessage": null } }
        })))
        .mount(&server)
        .await;

    let sent = client
        .send_login_otp("+919876543210", AdminRole::Agent)
        .await
        .unwrap();
    assert!(sent.success);

    let verified = client
        .verify_login_otp("+919876543210", "4321", AdminRole::Agent)
        .await
        .unwrap();
    assert!(verified.verified);
    assert_eq!(verified.token.as_deref(), Some("tok-abc"));
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "unassignedQrCodes": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = TransportConfig {
        timeout: Duration::from_secs(5),
        auth_token: None,
    }
    .with_auth_token(SecretString::from("tok-abc".to_string()));
    let endpoint = format!("{}/graphql", server.uri()).parse().unwrap();
    let client = GraphqlClient::new(endpoint, &transport).unwrap();

    assert!(client.unassigned_qr_codes(5).await.unwrap().is_empty());
}

// ── Administration ──────────────────────────────────────────────────

#[tokio::test]
async fn test_agents_list() {
    let (server, client) = setup().await;

    graphql_op("Agents")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "agents": [
                    { "id": "ag-1", "name": "Asha", "phoneNumber": "+919876543210", "email": null },
                    { "id": "ag-2", "name": null, "phoneNumber": null, "email": "r@rme.app" }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let agents = client.agents().await.unwrap();
    assert_eq!(agents.len(), 2);
    assert_eq!(agents[0].phone_number.as_deref(), Some("+919876543210"));
    assert_eq!(agents[1].name, None);
}

#[tokio::test]
async fn test_create_agent_sends_null_email() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": "CreateAgentUser",
            "variables": {
                "input": { "phoneNumber": "+919876543210", "name": "Asha", "email": null }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "createAgentUser": { "id": "ag-9" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = CreateAgentInput {
        phone_number: "+919876543210".into(),
        name: "Asha".into(),
        email: None,
    };
    let id = client.create_agent_user(&input).await.unwrap();
    assert_eq!(id.as_deref(), Some("ag-9"));
}

#[tokio::test]
async fn test_deactivate_agent_top_level_variable() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": "DeactivateAgent",
            "variables": { "agentId": "ag-1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "deactivateAgent": null }
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.deactivate_agent("ag-1").await.unwrap(), None);
}

#[tokio::test]
async fn test_generate_batch_payload() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": "GenerateQrCodeBatch",
            "variables": { "input": { "count": 2, "source": "ADM" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "generateQrCodeBatch": {
                    "batchMonth": "2026-10",
                    "batchNumber": 7,
                    "items": [
                        {
                            "dataUrl": "data:image/png;base64,AAAA",
                            "qrCode": {
                                "id": "q-1",
                                "code": "ADM0001",
                                "batchMonth": "2026-10",
                                "batchNumber": 7,
                                "batchSequence": 1
                            }
                        }
                    ]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = GenerateQrBatchInput {
        count: 2,
        source: "ADM".into(),
    };
    let batch = client.generate_qr_code_batch(&input).await.unwrap().unwrap();
    assert_eq!(batch.batch_month, "2026-10");
    assert_eq!(batch.batch_number, 7);
    assert_eq!(batch.items[0].qr_code.code, "ADM0001");
    assert_eq!(batch.items[0].qr_code.batch_sequence, Some(1));
}

// ── Error handling ──────────────────────────────────────────────────

#[tokio::test]
async fn test_graphql_errors_surface_first_message() {
    let (server, client) = setup().await;

    graphql_op("QrCodeLookup")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "QR code not found" }, { "message": "second" }]
        })))
        .mount(&server)
        .await;

    let err = client.qr_code_lookup("X").await.unwrap_err();
    assert!(matches!(err, Error::GraphQl { .. }));
    assert_eq!(err.to_string(), "QR code not found");
}

#[tokio::test]
async fn test_http_error_status() {
    let (server, client) = setup().await;

    graphql_op("AssignQrCodeToBusiness")
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let input = AssignQrCodeInput {
        code: "A".into(),
        business_id: "b".into(),
    };
    let err = client.assign_qr_code(&input).await.unwrap_err();
    assert_eq!(err.to_string(), "GraphQL request failed (502)");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_unauthorized_status() {
    let (server, client) = setup().await;

    graphql_op("UnassignedQrCodes")
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.unassigned_qr_codes(1).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_missing_data() {
    let (server, client) = setup().await;

    graphql_op("Categories")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = client.categories().await.unwrap_err();
    assert!(matches!(err, Error::MissingData));
}
