use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{EntryStatus, RoundStatus};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::me,
        handlers::round::list_active_rounds,
        handlers::round::list_results,
        handlers::entry::submit_entry,
        handlers::entry::my_entries,
        handlers::comment::list_comments,
        handlers::comment::post_comment,
        handlers::notification::list_notifications,
        handlers::notification::dismiss_notification,
        handlers::admin::create_round,
        handlers::admin::moderation_queue,
        handlers::admin::approve_entry,
        handlers::admin::reject_entry,
        handlers::admin::run_draw,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            AuthResponse,
            UserResponse,
            CreateRoundRequest,
            RoundResponse,
            RoundResultsResponse,
            RoundStatus,
            SubmitEntryRequest,
            EntryResponse,
            EntryStatus,
            ModerationDecision,
            DrawOutcome,
            WinnerResponse,
            NotificationResponse,
            CreateCommentRequest,
            CommentResponse,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "rounds", description = "Lottery rounds and results"),
        (name = "entries", description = "Pet photo entries"),
        (name = "comments", description = "Comments on winning entries"),
        (name = "notifications", description = "Draw notifications"),
        (name = "admin", description = "Staff moderation and draw API"),
    ),
    info(
        title = "PawLotto Backend API",
        version = "1.0.0",
        description = "Pet photo lottery REST API documentation",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
