use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use sqlx::PgPool;

use crate::controllers::subscription_form::{SubmitError, SubscriptionForm, SUCCESS_MESSAGE};
use crate::domain::new_subscriber::SubscriptionFields;

/// Body of every answer to a form submission; `message` is the status banner.
#[derive(Serialize)]
pub struct StatusBody {
    pub message: String,
}

/// Answers bodies that cannot be deserialized into the form fields with the
/// same `{"message": ...}` shape as every other submission outcome.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!("Rejected a subscription body: {}", err);

    let response = HttpResponse::BadRequest().json(StatusBody {
        message: format!("Error: {}", err),
    });

    InternalError::from_response(err, response).into()
}

#[tracing::instrument(
    name = "Creating a new subscriber handler",
    skip(body, db_pool),
    fields(
        subscriber_email = %body.email,
        subscriber_first_name = %body.first_name,
        subscriber_last_name = %body.last_name
    )
)]
pub async fn handle_create_subscription(
    body: web::Json<SubscriptionFields>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, SubmitError> {
    let mut form = SubscriptionForm::new(body.into_inner());

    form.submit(db_pool.get_ref()).await?;

    let message = form
        .status()
        .map(|status| status.text.clone())
        .unwrap_or_else(|| String::from(SUCCESS_MESSAGE));

    Ok(HttpResponse::Created().json(StatusBody { message }))
}

impl ResponseError for SubmitError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubmitError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SubmitError::DuplicateEmail => StatusCode::CONFLICT,
            SubmitError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SubmitError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
            SubmitError::InFlight => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(StatusBody {
            message: self.user_message(),
        })
    }
}
