use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::utils::{JwtService, hash_password, validate_password, verify_password};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    /// 注册新用户。用户名唯一；并发下靠唯一索引兜底。
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let username = request.username.trim().to_string();
        if username.is_empty() || username.len() > 150 {
            return Err(AppError::ValidationError(
                "Username must be between 1 and 150 characters".to_string(),
            ));
        }
        validate_password(&request.password)?;

        let existing = users::Entity::find()
            .filter(users::Column::Username.eq(username.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::ValidationError(
                "Username already taken".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;

        let insert_result = users::ActiveModel {
            username: Set(username),
            password_hash: Set(password_hash),
            is_staff: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await;

        let user = match insert_result {
            Ok(user) => user,
            // 预检查与插入之间的并发注册
            Err(e) if AppError::is_unique_violation(&e) => {
                return Err(AppError::ValidationError(
                    "Username already taken".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        self.build_auth_response(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(request.username.trim()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid username or password".to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::AuthError(
                "Invalid username or password".to_string(),
            ));
        }

        self.build_auth_response(user)
    }

    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

        self.build_auth_response(user)
    }

    pub async fn get_profile(&self, user_id: i64) -> AppResult<UserResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
        Ok(user.into())
    }

    /// 后台接口守卫: 仅 is_staff 用户放行
    pub async fn ensure_staff(&self, user_id: i64) -> AppResult<()> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or(AppError::PermissionDenied)?;

        if !user.is_staff {
            return Err(AppError::PermissionDenied);
        }
        Ok(())
    }

    fn build_auth_response(&self, user: users::Model) -> AppResult<AuthResponse> {
        let access_token = self.jwt_service.generate_access_token(user.id)?;
        let refresh_token = self.jwt_service.generate_refresh_token(user.id)?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
            user: user.into(),
        })
    }
}
