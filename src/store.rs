use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::{new_subscriber::NewSubscriber, subscriber::Subscriber};
use crate::errors::error_chain_fmt;

// SQLSTATE reported by Postgres when a unique constraint rejects a row
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberOrder {
    NewestFirst,
    OldestFirst,
}

impl SubscriberOrder {
    fn as_sql(&self) -> &'static str {
        match self {
            SubscriberOrder::NewestFirst => "created_at DESC",
            SubscriberOrder::OldestFirst => "created_at ASC",
        }
    }
}

/// The table holding the mailing list. Uniqueness of emails and creation
/// timestamps are its responsibility.
#[allow(async_fn_in_trait)]
pub trait SubscriberStore {
    async fn insert(&self, new_subscriber: &NewSubscriber) -> Result<Subscriber, StoreError>;

    async fn select_all(&self, order: SubscriberOrder) -> Result<Vec<Subscriber>, StoreError>;
}

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("duplicate key value violates unique constraint on email")]
    DuplicateEmail,
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Unreachable(sqlx::Error),
    #[error(transparent)]
    Unexpected(sqlx::Error),
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            return match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => StoreError::DuplicateEmail,
                _ => StoreError::Rejected(db_err.message().to_owned()),
            };
        }

        let is_unreachable = matches!(
            err,
            sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::WorkerCrashed
        );

        if is_unreachable {
            StoreError::Unreachable(err)
        } else {
            StoreError::Unexpected(err)
        }
    }
}

impl SubscriberStore for PgPool {
    #[tracing::instrument(
        name = "Insert a new subscriber into the mailing list",
        skip(self, new_subscriber),
        fields(subscriber_email = %new_subscriber.email.as_ref())
    )]
    async fn insert(&self, new_subscriber: &NewSubscriber) -> Result<Subscriber, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO mailing_list (id, email, first_name, last_name, organization, title)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, first_name, last_name, organization, title, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_subscriber.email.as_ref())
        .bind(new_subscriber.first_name.as_ref())
        .bind(new_subscriber.last_name.as_ref())
        .bind(new_subscriber.organization.as_ref().map(|detail| detail.as_ref()))
        .bind(new_subscriber.title.as_ref().map(|detail| detail.as_ref()))
        .try_map(|row: PgRow| subscriber_from_row(&row))
        .fetch_one(self)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            StoreError::from(err)
        })
    }

    #[tracing::instrument(name = "Select every subscriber of the mailing list", skip(self))]
    async fn select_all(&self, order: SubscriberOrder) -> Result<Vec<Subscriber>, StoreError> {
        let query = format!(
            r#"
            SELECT id, email, first_name, last_name, organization, title, created_at
            FROM mailing_list
            ORDER BY {}
            "#,
            order.as_sql()
        );

        sqlx::query(&query)
            .try_map(|row: PgRow| subscriber_from_row(&row))
            .fetch_all(self)
            .await
            .map_err(|err| {
                tracing::error!("Failed to execute query: {:?}", err);
                StoreError::from(err)
            })
    }
}

fn subscriber_from_row(row: &PgRow) -> Result<Subscriber, sqlx::Error> {
    Ok(Subscriber {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        organization: row.try_get("organization")?,
        title: row.try_get("title")?,
        created_at: row.try_get("created_at")?,
    })
}
