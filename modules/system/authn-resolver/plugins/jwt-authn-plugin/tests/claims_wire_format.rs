#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Tokens minted by the login service use camelCase claim names.

use std::sync::Arc;

use authn_resolver_sdk::{AuthNResolverClient, AuthNResolverError};
use jwt_authn_plugin::{JwtAuthNPluginConfig, Service};
use serde_json::json;

#[tokio::test]
async fn login_service_payload_is_accepted() {
    let cfg: JwtAuthNPluginConfig =
        serde_json::from_value(json!({ "secret": "shared" })).unwrap();
    let client: Arc<dyn AuthNResolverClient> = Arc::new(Service::from_config(&cfg).unwrap());

    let payload = json!({
        "sub": "550e8400-e29b-41d4-a716-446655440001",
        "email": "owner@example.com",
        "organizationId": "550e8400-e29b-41d4-a716-446655440002",
        "role": "OWNER",
        "iat": 1_700_000_000,
        "exp": 4_100_000_000_i64,
    });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &payload,
        &jsonwebtoken::EncodingKey::from_secret(b"shared"),
    )
    .unwrap();

    let identity = client.authenticate(&token).await.unwrap().identity;
    assert_eq!(
        identity.organization_id().to_string(),
        "550e8400-e29b-41d4-a716-446655440002"
    );
    assert_eq!(identity.role(), "OWNER");
}

#[tokio::test]
async fn snake_case_organization_claim_is_rejected() {
    let cfg: JwtAuthNPluginConfig =
        serde_json::from_value(json!({ "secret": "shared" })).unwrap();
    let client = Service::from_config(&cfg).unwrap();

    let payload = json!({
        "sub": "550e8400-e29b-41d4-a716-446655440001",
        "organization_id": "550e8400-e29b-41d4-a716-446655440002",
        "role": "owner",
        "iat": 1_700_000_000,
        "exp": 4_100_000_000_i64,
    });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &payload,
        &jsonwebtoken::EncodingKey::from_secret(b"shared"),
    )
    .unwrap();

    assert!(matches!(
        AuthNResolverClient::authenticate(&client, &token).await,
        Err(AuthNResolverError::Unauthorized(_))
    ));
}
