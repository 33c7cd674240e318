use serde::Serialize;

use crate::domain::new_subscriber::{NewSubscriber, SubscriptionFields};
use crate::domain::subscriber::Subscriber;
use crate::errors::error_chain_fmt;
use crate::store::{StoreError, SubscriberStore};

pub const SUCCESS_MESSAGE: &str =
    "Successfully subscribed! You will receive monthly CSRR faculty media reports.";
pub const DUPLICATE_EMAIL_MESSAGE: &str = "This email is already subscribed to our mailing list.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

/// The banner shown under the form once a submission has been answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn success() -> Self {
        StatusMessage {
            kind: StatusKind::Success,
            text: String::from(SUCCESS_MESSAGE),
        }
    }
}

impl From<&SubmitError> for StatusMessage {
    fn from(err: &SubmitError) -> Self {
        StatusMessage {
            kind: StatusKind::Error,
            text: err.user_message(),
        }
    }
}

#[derive(thiserror::Error)]
pub enum SubmitError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{}", DUPLICATE_EMAIL_MESSAGE)]
    DuplicateEmail,
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Transport(StoreError),
    #[error("A subscription request is already in progress.")]
    InFlight,
}

impl SubmitError {
    /// Text for the status banner. Only a duplicate email gets a dedicated
    /// message; everything else echoes the underlying description.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::DuplicateEmail => String::from(DUPLICATE_EMAIL_MESSAGE),
            SubmitError::InFlight => self.to_string(),
            _ => format!("Error: {}", self),
        }
    }
}

impl std::fmt::Debug for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<StoreError> for SubmitError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => SubmitError::DuplicateEmail,
            StoreError::Unreachable(_) => SubmitError::Transport(err),
            _ => SubmitError::Store(err),
        }
    }
}

/// State behind the signup form: the five editable fields, whether a request
/// is outstanding, and the last status banner.
#[derive(Debug, Default)]
pub struct SubscriptionForm {
    fields: SubscriptionFields,
    submitting: bool,
    status: Option<StatusMessage>,
}

impl SubscriptionForm {
    pub fn new(fields: SubscriptionFields) -> Self {
        SubscriptionForm {
            fields,
            ..Default::default()
        }
    }

    pub fn fields(&self) -> &SubscriptionFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut SubscriptionFields {
        &mut self.fields
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Sends the current fields to the store as one new subscriber.
    ///
    /// On success the fields are cleared. On failure they are kept so the
    /// subscriber can correct them and submit again; nothing is retried.
    /// If the returned future is dropped before the store answers, the form
    /// stays in the submitting state and rejects further submissions.
    #[tracing::instrument(
        name = "Submitting the subscription form",
        skip(self, store),
        fields(
            subscriber_email = %self.fields.email,
            subscriber_first_name = %self.fields.first_name,
            subscriber_last_name = %self.fields.last_name
        )
    )]
    pub async fn submit<S>(&mut self, store: &S) -> Result<Subscriber, SubmitError>
    where
        S: SubscriberStore,
    {
        if self.submitting {
            return Err(SubmitError::InFlight);
        }

        self.status = None;

        let new_subscriber = match NewSubscriber::try_from(&self.fields) {
            Ok(new_subscriber) => new_subscriber,
            Err(reason) => {
                tracing::warn!("Validation error: {}", reason);
                return Err(self.fail(SubmitError::InvalidInput(reason)));
            }
        };

        self.submitting = true;
        let inserted = store.insert(&new_subscriber).await;
        self.submitting = false;

        match inserted {
            Ok(subscriber) => {
                self.status = Some(StatusMessage::success());
                self.fields = SubscriptionFields::default();
                Ok(subscriber)
            }
            Err(err) => {
                tracing::error!("Failed to insert new subscriber: {:?}", err);
                Err(self.fail(SubmitError::from(err)))
            }
        }
    }

    fn fail(&mut self, err: SubmitError) -> SubmitError {
        self.status = Some(StatusMessage::from(&err));
        err
    }
}
