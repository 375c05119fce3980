mod common;

use common::{create_user, setup_db};
use pawlotto_backend::error::AppError;
use pawlotto_backend::models::{LoginRequest, RegisterRequest};
use pawlotto_backend::services::AuthService;
use pawlotto_backend::utils::JwtService;

fn test_jwt() -> JwtService {
    JwtService::new("integration-test-secret", 3600, 86400)
}

#[tokio::test]
async fn test_register_login_refresh_roundtrip() {
    let pool = setup_db().await;
    let service = AuthService::new(pool.clone(), test_jwt());

    let registered = service
        .register(RegisterRequest {
            username: "yolanda".to_string(),
            password: "correct horse battery".to_string(),
        })
        .await
        .expect("registration should succeed");
    assert_eq!(registered.user.username, "yolanda");
    assert!(!registered.user.is_staff);

    let logged_in = service
        .login(LoginRequest {
            username: "yolanda".to_string(),
            password: "correct horse battery".to_string(),
        })
        .await
        .expect("login with the same credentials should succeed");
    assert_eq!(logged_in.user.id, registered.user.id);

    let refreshed = service
        .refresh(&logged_in.refresh_token)
        .await
        .expect("refresh token should mint a new pair");
    assert_eq!(refreshed.user.id, registered.user.id);

    // access token 不能当 refresh token 用
    let err = service
        .refresh(&logged_in.access_token)
        .await
        .expect_err("access token must not refresh");
    assert!(matches!(err, AppError::AuthError(_) | AppError::JwtError(_)));
}

#[tokio::test]
async fn test_register_rejects_taken_username_and_weak_password() {
    let pool = setup_db().await;
    let service = AuthService::new(pool.clone(), test_jwt());

    service
        .register(RegisterRequest {
            username: "zach".to_string(),
            password: "long enough password".to_string(),
        })
        .await
        .unwrap();

    let err = service
        .register(RegisterRequest {
            username: "zach".to_string(),
            password: "another fine password".to_string(),
        })
        .await
        .expect_err("duplicate username must fail");
    assert!(matches!(err, AppError::ValidationError(_)));

    let err = service
        .register(RegisterRequest {
            username: "abby".to_string(),
            password: "short".to_string(),
        })
        .await
        .expect_err("short password must fail");
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let pool = setup_db().await;
    let service = AuthService::new(pool.clone(), test_jwt());

    service
        .register(RegisterRequest {
            username: "benny".to_string(),
            password: "the real password".to_string(),
        })
        .await
        .unwrap();

    let err = service
        .login(LoginRequest {
            username: "benny".to_string(),
            password: "not the password".to_string(),
        })
        .await
        .expect_err("wrong password must fail");
    assert!(matches!(err, AppError::AuthError(_)));
}

#[tokio::test]
async fn test_ensure_staff_gate() {
    let pool = setup_db().await;
    let service = AuthService::new(pool.clone(), test_jwt());

    let staff_id = create_user(&pool, "admin", true).await;
    let member_id = create_user(&pool, "member", false).await;

    service.ensure_staff(staff_id).await.expect("staff passes");

    let err = service
        .ensure_staff(member_id)
        .await
        .expect_err("non-staff must be denied");
    assert!(matches!(err, AppError::PermissionDenied));

    let err = service
        .ensure_staff(9999)
        .await
        .expect_err("unknown user must be denied");
    assert!(matches!(err, AppError::PermissionDenied));
}
