use super::*;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::env;

const TEST_SECRET: &str = "supersecretjwtsecretforunittesting123";

fn set_env_vars() {
    unsafe {
        env::set_var("SERVER_PORT", "8080");
        env::set_var("SERVER_BODY_LIMIT", "10");
        env::set_var("SERVER_TIMEOUT", "30");
        env::set_var("DATABASE_URL", "postgres://localhost:5432/db");
        env::set_var("JWT_SECRET", TEST_SECRET);
        env::set_var("BKASH_MERCHANT_NUMBER", "01700000000");
        env::set_var("BKASH_QR_URL", "https://cdn.example.com/bkash-qr.png");
    }
}

fn make_token(secret: &str, role: &str, exp: usize) -> String {
    let claims = Claims {
        sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        role: role.to_string(),
        email: Some("test@example.com".to_string()),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[test]
fn test_validate_jwt_success() {
    set_env_vars();

    let token = make_token(TEST_SECRET, "user", 9999999999);

    let claims = validate_jwt(&token).expect("Valid token should pass");
    assert_eq!(claims.sub, "123e4567-e89b-12d3-a456-426614174000");
    assert_eq!(claims.role, "user");
    assert_eq!(claims.email, Some("test@example.com".to_string()));
}

#[test]
fn test_validate_jwt_expired() {
    set_env_vars();

    let token = make_token(TEST_SECRET, "user", 1);

    let result = validate_jwt(&token);
    assert!(result.is_err());
}

#[test]
fn test_validate_jwt_invalid_signature() {
    set_env_vars();

    let token = make_token("wrongsecret", "user", 9999999999);

    let result = validate_jwt(&token);
    assert!(result.is_err());
}

#[test]
fn test_admin_role_constant_matches_claims() {
    set_env_vars();

    let token = make_token(TEST_SECRET, ADMIN_ROLE, 9999999999);

    let claims = validate_jwt(&token).expect("Valid token should pass");
    assert_eq!(claims.role, ADMIN_ROLE);
}
