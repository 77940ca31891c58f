use crate::helpers::upcoming_events;
use meet_greet::configuration::{get_configuration, get_configuration_for, Environment, Settings};
use meet_greet::startup::Application;
use wiremock::MockServer;

/// Local configuration pointed at a mock email service, on a random port.
async fn local_configuration() -> (Settings, MockServer) {
    let email_server = MockServer::start().await;
    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.application.port = 0;
    configuration.email_client.base_url = email_server.uri();
    configuration.events = upcoming_events();
    (configuration, email_server)
}

#[tokio::test]
async fn the_local_configuration_starts() {
    let (configuration, _email_server) = local_configuration().await;

    let outcome = Application::build(configuration).await;

    assert!(outcome.is_ok());
}

#[tokio::test]
async fn duplicate_event_ids_stop_the_application_from_starting() {
    let (mut configuration, _email_server) = local_configuration().await;
    configuration.events[1].id = configuration.events[0].id;

    let outcome = Application::build(configuration).await;

    assert!(outcome.is_err());
}

#[tokio::test]
async fn production_without_email_credentials_refuses_to_start() {
    let mut configuration = get_configuration_for(Environment::Production)
        .expect("Failed to read configuration.");
    configuration.application.port = 0;

    let error = match Application::build(configuration).await {
        Ok(_) => panic!("The application started without email credentials"),
        Err(e) => e,
    };

    assert!(
        error.to_string().contains("email_client."),
        "Unexpected startup failure: {error}"
    );
}

#[tokio::test]
async fn an_out_of_bounds_booking_window_refuses_to_start() {
    let (mut configuration, _email_server) = local_configuration().await;
    configuration.booking.window_margin_days = u32::MAX;

    let outcome = Application::build(configuration).await;

    assert!(outcome.is_err());
}
