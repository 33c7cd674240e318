use actix_web::{
    http::{
        header::{self, HeaderMap},
        StatusCode,
    },
    web, HttpRequest, HttpResponse, ResponseError,
};
use chrono::Utc;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use sqlx::PgPool;

use crate::controllers::admin_panel::AdminPanel;
use crate::domain::subscriber::Subscriber;
use crate::errors::error_chain_fmt;
use crate::routes::StatusBody;
use crate::store::StoreError;

/// Shared token expected from admin clients. `None` leaves the admin routes
/// open.
pub struct AdminToken(pub Option<Secret<String>>);

#[derive(Serialize)]
pub struct SubscriberList<'a> {
    pub count: usize,
    pub subscribers: &'a [Subscriber],
}

#[derive(thiserror::Error)]
pub enum AdminError {
    #[error("Missing or invalid admin credentials.")]
    Unauthorized,
    #[error("Failed to load the subscriber list.")]
    LoadFailed(#[source] StoreError),
}

impl std::fmt::Debug for AdminError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for AdminError {
    fn status_code(&self) -> StatusCode {
        match self {
            AdminError::Unauthorized => StatusCode::UNAUTHORIZED,
            AdminError::LoadFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AdminError::Unauthorized => self.to_string(),
            AdminError::LoadFailed(err) => format!("Error: {}", err),
        };
        let mut response = HttpResponse::build(self.status_code());

        if let AdminError::Unauthorized = self {
            response.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }

        response.json(StatusBody { message })
    }
}

#[tracing::instrument(
    name = "Listing the mailing list subscribers",
    skip(request, db_pool, admin_token)
)]
pub async fn list_subscribers(
    request: HttpRequest,
    db_pool: web::Data<PgPool>,
    admin_token: web::Data<AdminToken>,
) -> Result<HttpResponse, AdminError> {
    authorize(request.headers(), &admin_token)?;

    let mut panel = AdminPanel::new();
    panel
        .toggle_list(db_pool.get_ref())
        .await
        .map_err(AdminError::LoadFailed)?;

    Ok(HttpResponse::Ok().json(SubscriberList {
        count: panel.subscribers().len(),
        subscribers: panel.subscribers(),
    }))
}

#[tracing::instrument(
    name = "Exporting the mailing list as CSV",
    skip(request, db_pool, admin_token)
)]
pub async fn export_subscribers(
    request: HttpRequest,
    db_pool: web::Data<PgPool>,
    admin_token: web::Data<AdminToken>,
) -> Result<HttpResponse, AdminError> {
    authorize(request.headers(), &admin_token)?;

    let mut panel = AdminPanel::new();
    panel
        .load_all(db_pool.get_ref())
        .await
        .map_err(AdminError::LoadFailed)?;

    let export = panel.export_csv(Utc::now().date_naive());

    Ok(HttpResponse::Ok()
        .content_type(export.content_type())
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.filename),
        ))
        .body(export.body))
}

fn authorize(headers: &HeaderMap, admin_token: &AdminToken) -> Result<(), AdminError> {
    let expected = match &admin_token.0 {
        Some(token) => token,
        None => return Ok(()),
    };

    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match provided {
        Some(token) if tokens_match(token, expected.expose_secret()) => Ok(()),
        _ => {
            tracing::warn!("Rejected an admin request without valid credentials");
            Err(AdminError::Unauthorized)
        }
    }
}

// Compares every byte regardless of where the first mismatch is.
fn tokens_match(provided: &str, expected: &str) -> bool {
    provided.len() == expected.len()
        && provided
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}
