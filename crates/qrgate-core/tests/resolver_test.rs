// Integration tests for lookup, assignment gating and verification against a
// wiremock backend.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

use qrgate_core::{
    BusinessDetails, CoreError, QrService, QrStatus, ServiceConfig, VerifiedBusiness, normalize,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, QrService) {
    let server = MockServer::start().await;
    let endpoint = Url::parse(&format!("{}/graphql", server.uri())).unwrap();
    let service = QrService::new(ServiceConfig::new(endpoint)).unwrap();
    (server, service)
}

fn graphql_op(name: &str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "operationName": name })))
}

fn lookup_for(code: &str) -> MockBuilder {
    graphql_op("QrCodeLookup").and(body_partial_json(json!({ "variables": { "code": code } })))
}

fn lookup_body(code: &str, status: &str, name: Option<&str>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": {
            "qrCodeLookup": {
                "code": code,
                "status": status,
                "assignedBusinessName": name
            }
        }
    }))
}

// ── Lookup ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_lookup_normalizes_landing_url() {
    let (server, service) = setup().await;

    lookup_for("ABC123")
        .respond_with(lookup_body("ABC123", "UNASSIGNED", None))
        .expect(1)
        .mount(&server)
        .await;

    let result = service
        .lookup_input("  https://rme.app/qr/code/ABC123  ")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.status, QrStatus::Unassigned);
    assert!(result.gate_message().is_none());

    let selection = service.resolver().selection();
    assert_eq!(selection.assignable().map(|c| c.as_str()), Some("ABC123"));
}

#[tokio::test]
async fn test_empty_input_never_hits_network() {
    let (server, service) = setup().await;

    graphql_op("QrCodeLookup")
        .respond_with(lookup_body("X", "UNASSIGNED", None))
        .expect(0)
        .mount(&server)
        .await;

    let err = service.lookup_input("   ").await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
    assert_eq!(err.to_string(), "Please enter a QR code");
}

#[tokio::test]
async fn test_assigned_code_gate_message() {
    let (server, service) = setup().await;

    lookup_for("CAFE1")
        .respond_with(lookup_body("CAFE1", "ASSIGNED", Some("Joe's Cafe")))
        .mount(&server)
        .await;
    lookup_for("OLD1")
        .respond_with(lookup_body("OLD1", "RETIRED", None))
        .mount(&server)
        .await;

    let assigned = service.lookup_input("CAFE1").await.unwrap().unwrap();
    assert_eq!(
        assigned.gate_message().as_deref(),
        Some("QR code already assigned to Joe's Cafe.")
    );

    let retired = service.lookup_input("OLD1").await.unwrap().unwrap();
    assert_eq!(
        retired.gate_message().as_deref(),
        Some("QR code is already assigned or retired.")
    );

    let err = service.resolver().assignable_code().unwrap_err();
    assert_eq!(err.to_string(), "QR code is already assigned or retired.");
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let (server, service) = setup().await;

    graphql_op("QrCodeLookup")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "qrCodeLookup": null }
        })))
        .mount(&server)
        .await;

    let err = service.lookup_input("GHOST").await.unwrap_err();
    assert!(matches!(err, CoreError::QrNotFound { ref code } if code == "GHOST"));
}

#[tokio::test]
async fn test_remote_error_message_is_verbatim() {
    let (server, service) = setup().await;

    graphql_op("QrCodeLookup")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Agent session expired" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = service.lookup_input("ABC").await.unwrap_err();
    assert_eq!(err.to_string(), "Agent session expired");
}

// ── Stale-response guard ────────────────────────────────────────────

#[tokio::test]
async fn test_slow_stale_lookup_does_not_overwrite_newer_selection() {
    let (server, service) = setup().await;

    lookup_for("AAA")
        .respond_with(lookup_body("AAA", "ASSIGNED", Some("Slow Shop")).set_delay(Duration::from_millis(400)))
        .expect(1)
        .mount(&server)
        .await;
    lookup_for("BBB")
        .respond_with(lookup_body("BBB", "UNASSIGNED", None))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = service.resolver();
    let a = normalize("AAA");
    let b = normalize("BBB");

    let (first, second) = tokio::join!(resolver.lookup(&a), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        resolver.lookup(&b).await
    });

    // B resolved first and was applied; A arrived late and was discarded.
    assert_eq!(second.unwrap().unwrap().status, QrStatus::Unassigned);
    assert!(first.unwrap().is_none());

    let selection = resolver.selection();
    assert_eq!(selection.candidate.as_ref().map(|c| c.as_str()), Some("BBB"));
    assert_eq!(selection.lookup.unwrap().status, QrStatus::Unassigned);
    assert_eq!(resolver.assignable_code().unwrap().as_str(), "BBB");
}

#[tokio::test]
async fn test_slow_response_loses_to_newer_lookup_of_same_code() {
    let (server, service) = setup().await;

    // First AAA request is slow and stale; the repeat answers fresh.
    lookup_for("AAA")
        .respond_with(lookup_body("AAA", "RETIRED", None).set_delay(Duration::from_millis(500)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    lookup_for("AAA")
        .respond_with(lookup_body("AAA", "UNASSIGNED", None))
        .expect(1)
        .mount(&server)
        .await;
    lookup_for("BBB")
        .respond_with(lookup_body("BBB", "UNASSIGNED", None))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = service.resolver();
    let a = normalize("AAA");
    let b = normalize("BBB");

    let (first, second, third) = tokio::join!(
        resolver.lookup(&a),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            resolver.lookup(&b).await
        },
        async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            resolver.lookup(&a).await
        }
    );

    assert!(first.unwrap().is_none());
    second.unwrap();
    assert_eq!(third.unwrap().unwrap().status, QrStatus::Unassigned);

    let selection = resolver.selection();
    assert_eq!(selection.candidate.as_ref().map(|c| c.as_str()), Some("AAA"));
    assert_eq!(selection.lookup.unwrap().status, QrStatus::Unassigned);
    assert_eq!(resolver.assignable_code().unwrap().as_str(), "AAA");
}

#[tokio::test]
async fn test_clear_discards_in_flight_lookup() {
    let (server, service) = setup().await;

    lookup_for("CCC")
        .respond_with(lookup_body("CCC", "UNASSIGNED", None).set_delay(Duration::from_millis(200)))
        .mount(&server)
        .await;

    let resolver = service.resolver();
    let c = normalize("CCC");
    let (result, ()) = tokio::join!(resolver.lookup(&c), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        resolver.clear();
    });

    assert!(result.unwrap().is_none());
    assert_eq!(resolver.selection(), qrgate_core::Selection::default());
    let err = resolver.assignable_code().unwrap_err();
    assert_eq!(err.to_string(), "Please select a QR code to assign");
}

// ── Assignment ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_assign_requires_lookup() {
    let (_server, service) = setup().await;
    let business = VerifiedBusiness::previously_verified("biz-1");

    let err = service.resolver().assign(&business).await.unwrap_err();
    assert_eq!(err.to_string(), "Please select a QR code to assign");
}

#[tokio::test]
async fn test_assign_after_unassigned_lookup() {
    let (server, service) = setup().await;

    lookup_for("FREE1")
        .respond_with(lookup_body("FREE1", "UNASSIGNED", None))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": "AssignQrCodeToBusiness",
            "variables": { "input": { "code": "FREE1", "business_id": "biz-1" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "assignQrCodeToBusiness": { "id": "qr-9", "code": "FREE1", "status": "ASSIGNED" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    service.lookup_input("FREE1").await.unwrap();
    let business = VerifiedBusiness::previously_verified("biz-1");
    let assignment = service.resolver().assign(&business).await.unwrap();
    assert_eq!(assignment.id, "qr-9");
    assert_eq!(assignment.status, QrStatus::Assigned);

    // The gate closes behind a successful assignment.
    let err = service.resolver().assign(&business).await.unwrap_err();
    assert!(matches!(err, CoreError::NotAssignable { .. }));
}

#[tokio::test]
async fn test_clear_after_assignment_resets_selection() {
    let (server, service) = setup().await;

    lookup_for("FREE2")
        .respond_with(lookup_body("FREE2", "UNASSIGNED", None))
        .mount(&server)
        .await;
    graphql_op("AssignQrCodeToBusiness")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "assignQrCodeToBusiness": { "id": "qr-10", "code": "FREE2", "status": "ASSIGNED" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = service.resolver();
    service.lookup_input("FREE2").await.unwrap();
    resolver
        .assign(&VerifiedBusiness::previously_verified("biz-1"))
        .await
        .unwrap();
    resolver.clear();

    assert_eq!(resolver.selection(), qrgate_core::Selection::default());
    let err = resolver.assignable_code().unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
}

#[tokio::test]
async fn test_assign_failure_is_not_retried() {
    let (server, service) = setup().await;

    lookup_for("FREE2")
        .respond_with(lookup_body("FREE2", "UNASSIGNED", None))
        .mount(&server)
        .await;
    graphql_op("AssignQrCodeToBusiness")
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    service.lookup_input("FREE2").await.unwrap();
    let err = service
        .resolver()
        .assign(&VerifiedBusiness::previously_verified("biz-2"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "GraphQL request failed (502)");
}

// ── Verification workflow ───────────────────────────────────────────

#[tokio::test]
async fn test_verification_flow_yields_verified_business() {
    let (server, service) = setup().await;

    graphql_op("VerifyGstin")
        .and(body_partial_json(json!({ "variables": { "input": { "gstin": "27AAPFU0939F1ZV" } } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "verifyGstin": {
                    "success": true,
                    "business_id": "biz-42",
                    "gstin": "27AAPFU0939F1ZV",
                    "businessName": "Joe's Cafe Pvt Ltd",
                    "displayName": null,
                    "category": 3,
                    "phoneNumber": "9876543210",
                    "alreadyExists": false
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    graphql_op("SubmitBusinessDetails")
        .and(body_partial_json(json!({
            "variables": { "input": { "business_id": "biz-42", "phoneNumber": "+919876543210" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "submitBusinessDetails": { "success": true, "message": null } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    graphql_op("VerifyOtp")
        .and(body_partial_json(json!({
            "variables": { "business_id": "biz-42", "phoneNumber": "+919876543210", "otp": "1234" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "verifyOtp": { "success": true, "message": "ok" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let verifier = service.verifier();
    let profile = verifier.verify_gstin(" 27aapfu0939f1zv ").await.unwrap();
    assert_eq!(profile.business_id, "biz-42");
    assert_eq!(profile.suggested_display_name(), Some("Joe's Cafe Pvt Ltd"));

    let details = BusinessDetails {
        display_name: "Joe's Cafe".into(),
        category: profile.category.unwrap(),
        phone_number: profile.phone_number.clone().unwrap(),
        business_email: "joe@example.com".into(),
    };
    let pending = verifier.submit_details(&profile, &details).await.unwrap();
    assert_eq!(pending.phone_number, "+919876543210");

    let verified = verifier.verify_owner_otp(&pending, "12-34").await.unwrap();
    assert_eq!(verified.business_id(), "biz-42");
}

#[tokio::test]
async fn test_gstin_rejection_uses_server_message() {
    let (server, service) = setup().await;

    graphql_op("VerifyGstin")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "verifyGstin": { "success": false, "errorMessage": "GSTIN is inactive" }
            }
        })))
        .mount(&server)
        .await;

    let err = service
        .verifier()
        .verify_gstin("27AAPFU0939F1ZV")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Rejected { .. }));
    assert_eq!(err.to_string(), "GSTIN is inactive");
}

#[tokio::test]
async fn test_malformed_gstin_is_local_validation() {
    let (server, service) = setup().await;

    graphql_op("VerifyGstin")
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let err = service.verifier().verify_gstin("123").await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
}

#[tokio::test]
async fn test_owner_otp_rejection_falls_back() {
    let (server, service) = setup().await;

    graphql_op("VerifyOtp")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "verifyOtp": { "success": false, "message": null } }
        })))
        .mount(&server)
        .await;

    let pending = qrgate_core::PendingBusiness {
        business_id: "biz-1".into(),
        phone_number: "+919876543210".into(),
    };
    let err = service
        .verifier()
        .verify_owner_otp(&pending, "9999")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "OTP verification failed");

    let err = service
        .verifier()
        .verify_owner_otp(&pending, "12")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Enter the 4-digit OTP");
}

// ── Listing / login ─────────────────────────────────────────────────

#[tokio::test]
async fn test_unassigned_codes_default_limit() {
    let (server, service) = setup().await;

    graphql_op("UnassignedQrCodes")
        .and(body_partial_json(json!({ "variables": { "limit": 100 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "unassignedQrCodes": [{ "id": "1", "code": "FREE1" }, { "id": "2", "code": "FREE2" }] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let codes = service.unassigned_codes(None).await.unwrap();
    assert_eq!(codes.len(), 2);
    assert_eq!(codes[1].code, "FREE2");
}

#[tokio::test]
async fn test_login_returns_token() {
    let (server, service) = setup().await;

    graphql_op("SendLoginOtp")
        .and(body_partial_json(json!({
            "variables": { "input": { "phoneNumber": "+919876543210", "role": "AGENT" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "sendLoginOtp": { "success": true, "errorMessage": null } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    graphql_op("VerifyLoginOtp")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "verifyLoginOtp": { "verified": true, "token": "tok-1", "errorMessage": null } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let phone = service
        .send_login_otp("98765 43210", qrgate_core::AdminRole::Agent)
        .await
        .unwrap();
    assert_eq!(phone, "+919876543210");

    let token = service
        .verify_login_otp(&phone, "4321", qrgate_core::AdminRole::Agent)
        .await
        .unwrap();
    assert_eq!(token.expose_secret(), "tok-1");
}
