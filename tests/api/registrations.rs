use crate::helpers::{spawn_app, spawn_app_with};
use meet_greet::configuration::TransportKind;
use std::time::Duration;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

fn ursula() -> serde_json::Value {
    serde_json::json!({
        "name": "Ursula Le Guin",
        "email": "ursula_le_guin@gmail.com",
        "location": "london",
        "event_type": "meetgreet",
    })
}

#[tokio::test]
async fn a_valid_registration_is_acknowledged_after_one_confirmation_email() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(path("/api/v1.0/email/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.post_registrations(&ursula()).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["notification"]["kind"], "success");
    assert_eq!(body["notification"]["title"], "Registration successful!");
    assert_eq!(
        body["delivery"]["email_service"]["support_notice"],
        "not_requested"
    );
    assert!(body["booking_reference"].as_str().unwrap().starts_with("SB-"));
    // The form is reset, so nothing is handed back.
    assert!(body.get("retained").is_none());
}

#[tokio::test]
async fn the_confirmation_is_addressed_to_the_registrant_with_display_labels() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.post_registrations(&ursula()).await;
    let body: serde_json::Value = response.json().await.unwrap();

    // Assert
    let sent = app.sent_template_params().await;
    assert_eq!(sent.len(), 1);
    let params = &sent[0];
    assert_eq!(params["to_email"], "ursula_le_guin@gmail.com");
    assert_eq!(params["to_name"], "Ursula Le Guin");
    assert_eq!(params["location"], "London");
    assert_eq!(params["event_type"], "Meet & Greet");
    assert_eq!(params["booking_ref"], body["booking_reference"]);

    let html = params["html_content"].as_str().unwrap();
    let links: Vec<_> = linkify::LinkFinder::new()
        .links(html)
        .filter(|l| *l.kind() == linkify::LinkKind::Url)
        .collect();
    assert!(links
        .iter()
        .any(|l| l.as_str() == "https://www.stevenbartlett.info"));
}

#[tokio::test]
async fn invalid_fields_return_a_400_with_field_errors_and_the_input() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;
    let test_cases = vec![
        ("name", "", "Name is required"),
        ("email", "not-an-email", "Valid email is required"),
        ("location", "", "Please select a location"),
        ("event_type", "", "Please select an event type"),
    ];

    for (field, value, message) in test_cases {
        let mut form = ursula();
        form[field] = value.into();

        // Act
        let response = app.post_registrations(&form).await;

        // Assert
        assert_eq!(
            response.status().as_u16(),
            400,
            "The API did not fail with 400 Bad Request when {field} was {value:?}."
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["notification"]["kind"], "error");
        assert_eq!(body["field_errors"][0]["field"], field);
        assert_eq!(body["field_errors"][0]["message"], message);
        assert_eq!(body["retained"]["email"], form["email"]);
        assert_eq!(body["retained"]["name"], form["name"]);
    }
}

#[tokio::test]
async fn a_failing_email_service_returns_a_500_and_keeps_the_input() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.post_registrations(&ursula()).await;

    // Assert
    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["notification"]["title"], "Something went wrong");
    assert_eq!(body["notification"]["message"], "Please try again later.");
    assert_eq!(body["retained"]["name"], "Ursula Le Guin");
    assert_eq!(body["retained"]["location"], "london");
}

#[tokio::test]
async fn a_slow_email_service_is_reported_as_a_failure() {
    // Arrange
    let app = spawn_app_with(|c| c.email_client.timeout_milliseconds = 200).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.post_registrations(&ursula()).await;

    // Assert
    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn a_repeated_submit_is_ignored_while_the_first_is_in_flight() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(1)))
        // The first submit and the one sent after it completed.
        .expect(2)
        .mount(&app.email_server)
        .await;
    let mut form = ursula();
    form["form_token"] = "registration-dialog-1".into();

    // Act
    let (first, second) = tokio::join!(app.post_registrations(&form), app.post_registrations(&form));

    // Assert
    let mut statuses = vec![first.status().as_u16(), second.status().as_u16()];
    statuses.sort();
    assert_eq!(statuses, vec![200, 409]);

    // Once the first submit completed, the form can be used again.
    let response = app.post_registrations(&form).await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn the_mailto_transport_hands_back_a_draft_without_calling_the_email_service() {
    // Arrange
    let app = spawn_app_with(|c| c.booking.transport = TransportKind::Mailto).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.post_registrations(&ursula()).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let link = body["delivery"]["mail_client"]["mailto_link"]
        .as_str()
        .unwrap();
    assert!(link.starts_with("mailto:bookings@stevenbartlett.info?subject="));
    assert!(link.contains(&*urlencoding::encode("Ursula Le Guin")));
}

#[tokio::test]
async fn whitespace_only_selections_are_field_errors() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;
    let mut form = ursula();
    form["location"] = " ".into();

    // Act
    let response = app.post_registrations(&form).await;

    // Assert
    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["field_errors"][0]["field"], "location");
    assert_eq!(body["field_errors"][0]["message"], "Please select a location");
}

#[tokio::test]
async fn different_registrants_posting_a_blank_form_token_are_both_dispatched() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(1)))
        .expect(2)
        .mount(&app.email_server)
        .await;
    let mut le_guin = ursula();
    le_guin["form_token"] = "".into();
    let mut octavia = le_guin.clone();
    octavia["name"] = "Octavia Butler".into();
    octavia["email"] = "octavia_butler@gmail.com".into();

    // Act
    let (first, second) =
        tokio::join!(app.post_registrations(&le_guin), app.post_registrations(&octavia));

    // Assert
    assert_eq!(first.status().as_u16(), 200);
    assert_eq!(second.status().as_u16(), 200);
}
