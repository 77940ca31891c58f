use crate::helpers::{spawn_app, today, DAYS_UNTIL_EVENT};
use chrono::Duration;

#[tokio::test]
async fn events_are_listed_in_configuration_order() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.get_events().await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let events: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["id"], 1);
    assert_eq!(events[0]["title"], "London VIP Meet & Greet");
    assert_eq!(events[0]["featured"], true);
    assert_eq!(events[1]["price"], "£399");

    let event_date = today() + Duration::days(DAYS_UNTIL_EVENT);
    assert_eq!(
        events[0]["date"],
        event_date.format("%B %-d, %Y").to_string()
    );
}
