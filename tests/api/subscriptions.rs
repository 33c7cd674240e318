use sqlx::{postgres::PgRow, Row};

use crate::helpers::TestApp;

const SUCCESS_MESSAGE: &str =
    "Successfully subscribed! You will receive monthly CSRR faculty media reports.";
const DUPLICATE_EMAIL_MESSAGE: &str = "This email is already subscribed to our mailing list.";

#[tokio::test]
async fn subscribe_returns_201_with_the_confirmation_message() {
    let test_app = TestApp::spawn_app().await;
    let body = serde_json::json!({
        "first_name": "Ana",
        "last_name": "Diaz",
        "email": "ana@example.com"
    });

    let response = test_app.post_subscription(body).await;

    assert_eq!(201, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], SUCCESS_MESSAGE);
}

#[tokio::test]
async fn subscribe_persists_blank_optional_fields_as_null() {
    let test_app = TestApp::spawn_app().await;
    let body = serde_json::json!({
        "first_name": "Ana",
        "last_name": "Diaz",
        "email": "ana@example.com",
        "organization": "",
        "title": "   "
    });

    test_app.post_subscription(body).await;

    let (email, first_name, last_name, organization, title): (
        String,
        String,
        String,
        Option<String>,
        Option<String>,
    ) = sqlx::query("SELECT email, first_name, last_name, organization, title FROM mailing_list;")
        .map(|row: PgRow| {
            (
                row.get("email"),
                row.get("first_name"),
                row.get("last_name"),
                row.get("organization"),
                row.get("title"),
            )
        })
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Query to fetch the mailing list failed.");

    assert_eq!(email, "ana@example.com");
    assert_eq!(first_name, "Ana");
    assert_eq!(last_name, "Diaz");
    assert_eq!(organization, None);
    assert_eq!(title, None);
}

#[tokio::test]
async fn subscribe_persists_organization_and_title() {
    let test_app = TestApp::spawn_app().await;
    let body = serde_json::json!({
        "first_name": "Sahar",
        "last_name": "Aziz",
        "email": "sahar@example.com",
        "organization": "Rutgers Law School",
        "title": "Professor"
    });

    test_app.post_subscription(body).await;

    let row = sqlx::query("SELECT organization, title FROM mailing_list;")
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Query to fetch the mailing list failed.");

    assert_eq!(
        row.get::<Option<String>, _>("organization").as_deref(),
        Some("Rutgers Law School")
    );
    assert_eq!(
        row.get::<Option<String>, _>("title").as_deref(),
        Some("Professor")
    );
}

#[tokio::test]
async fn subscribe_returns_409_when_the_email_is_already_subscribed() {
    let test_app = TestApp::spawn_app().await;
    test_app.subscribe("ana@example.com", "Ana", "Diaz").await;

    let response = test_app
        .post_subscription(serde_json::json!({
            "first_name": "Anabel",
            "last_name": "Diaz",
            "email": "ana@example.com"
        }))
        .await;

    assert_eq!(409, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], DUPLICATE_EMAIL_MESSAGE);

    let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM mailing_list;")
        .map(|row: PgRow| row.get("count"))
        .fetch_one(&test_app.db_pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn subscribe_returns_400_when_body_require_field_is_missing() {
    let test_app = TestApp::spawn_app().await;

    // This is a common practice and it is called table-driven tests. In this case, it simulates different kind of possible request bodies
    // where API should return 400.
    let test_cases = vec![
        (serde_json::json!({}), "missing body parameters"),
        (
            serde_json::json!({"first_name": "Ana", "last_name": "Diaz"}),
            "missing email parameter",
        ),
        (
            serde_json::json!({"email": "ana@example.com", "last_name": "Diaz"}),
            "missing first name parameter",
        ),
        (
            serde_json::json!({"email": "ana@example.com", "first_name": "Ana"}),
            "missing last name parameter",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_subscription(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );

        let body: serde_json::Value = response.json().await.unwrap();
        assert!(
            body["message"].as_str().unwrap().starts_with("Error: "),
            "The API did not answer with a status message when payload was {}",
            error_message
        );
    }
}

#[tokio::test]
async fn subscribe_returns_400_when_body_is_present_but_not_valid() {
    let test_app = TestApp::spawn_app().await;

    let test_cases = vec![
        (
            serde_json::json!({"email": "", "first_name": "Ana", "last_name": "Diaz"}),
            "empty email",
        ),
        (
            serde_json::json!({"email": "ana.example.com", "first_name": "Ana", "last_name": "Diaz"}),
            "invalid email",
        ),
        (
            serde_json::json!({"email": "ana@example.com", "first_name": " ", "last_name": "Diaz"}),
            "blank first name",
        ),
        (
            serde_json::json!({"email": "ana@example.com", "first_name": "Ana", "last_name": "{Diaz}"}),
            "invalid last name",
        ),
        (
            serde_json::json!({"email": "ana@example.com", "first_name": "Ana\nMaria", "last_name": "Diaz"}),
            "line break in first name",
        ),
        (
            serde_json::json!({
                "email": "ana@example.com",
                "first_name": "Ana",
                "last_name": "Diaz",
                "organization": "Rutgers\nLaw"
            }),
            "line break in organization",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_subscription(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );

        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["message"].as_str().unwrap().starts_with("Error: "));
    }
}

#[tokio::test]
async fn subscribe_returns_500_when_the_store_fails() {
    let test_app = TestApp::spawn_app().await;
    // Sabotage the database
    sqlx::query("ALTER TABLE mailing_list DROP COLUMN title;")
        .execute(&test_app.db_pool)
        .await
        .unwrap();

    let response = test_app
        .post_subscription(serde_json::json!({
            "first_name": "Ana",
            "last_name": "Diaz",
            "email": "ana@example.com"
        }))
        .await;

    assert_eq!(500, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().starts_with("Error: "));
}
