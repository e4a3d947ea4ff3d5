//! Unit tests for session claims and token handling.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::Claims;
use crate::jwt::{JwtConfig, JwtError, JwtService};

fn test_service() -> JwtService {
    JwtService::new(JwtConfig {
        secret: "test-secret-key-for-testing".to_string(),
        access_token_expires_minutes: 15,
    })
}

fn roles(list: &[&str]) -> Vec<String> {
    list.iter().map(|r| (*r).to_string()).collect()
}

#[test]
fn test_claims_new_sets_correct_fields() {
    let user_id = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::hours(1);

    let claims = Claims::new(user_id, "Dana", &roles(&["MANAGER"]), expires_at);

    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.name, "Dana");
    assert_eq!(claims.roles, vec!["MANAGER".to_string()]);
    assert!(claims.iat <= Utc::now().timestamp());
    assert_eq!(claims.exp, expires_at.timestamp());
}

#[test]
fn test_claims_has_role_ignores_case() {
    let claims = Claims::new(
        Uuid::new_v4(),
        "Dana",
        &roles(&["employee", "Admin"]),
        Utc::now() + Duration::hours(1),
    );
    assert!(claims.has_role("ADMIN"));
    assert!(claims.has_role("EMPLOYEE"));
    assert!(!claims.has_role("MANAGER"));
}

#[test]
fn test_token_roundtrip_keeps_roles() {
    let service = test_service();
    let user_id = Uuid::new_v4();

    let token = service
        .generate_access_token(user_id, "Sam", &roles(&["EMPLOYEE", "ACCOUNTANT"]))
        .unwrap();
    let claims = service.validate_token(&token).unwrap();

    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.name, "Sam");
    assert_eq!(claims.roles, roles(&["EMPLOYEE", "ACCOUNTANT"]));
}

#[test]
fn test_invalid_token() {
    let service = test_service();
    assert!(matches!(
        service.validate_token("invalid.token.here"),
        Err(JwtError::DecodingError(_))
    ));
}

#[test]
fn test_token_from_other_secret_rejected() {
    let other = JwtService::new(JwtConfig {
        secret: "another-secret".to_string(),
        access_token_expires_minutes: 15,
    });
    let token = other
        .generate_access_token(Uuid::new_v4(), "Eve", &roles(&["ADMIN"]))
        .unwrap();

    assert!(test_service().validate_token(&token).is_err());
}

#[test]
fn test_expired_token() {
    let service = JwtService::new(JwtConfig {
        secret: "test-secret-key-for-testing".to_string(),
        access_token_expires_minutes: -10,
    });
    let token = service
        .generate_access_token(Uuid::new_v4(), "Old", &roles(&["EMPLOYEE"]))
        .unwrap();

    assert!(matches!(
        service.validate_token(&token),
        Err(JwtError::Expired)
    ));
}

#[test]
fn test_access_token_expires_in() {
    assert_eq!(test_service().access_token_expires_in(), 900);
}
