use crate::configuration::{BookingSettings, Settings};
use crate::dispatch::Transport;
use crate::domain::EventCatalog;
use crate::routes;
use crate::submission_guard::SubmissionGuard;
use actix_web::{dev::Server, web, App, HttpServer};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Validates the configuration, then binds the listener. Nothing is served if the transport
    /// or the event list is misconfigured.
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        configuration.booking.check()?;
        let transport = Transport::from_settings(&configuration)?;
        let catalog = EventCatalog::new(configuration.events)?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)?;
        // Retrieve the port assigned to us by the OS
        let port = listener.local_addr()?.port();
        tracing::info!(
            %address,
            transport = ?configuration.booking.transport,
            events = catalog.offerings().len(),
            "Listening for form submissions"
        );
        let server = run(listener, transport, catalog, configuration.booking)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// A more expressive name that makes it clear that this function only returns when the
    /// application is stopped.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    transport: Transport,
    catalog: EventCatalog,
    booking: BookingSettings,
) -> Result<Server, std::io::Error> {
    let transport = web::Data::new(transport);
    let catalog = web::Data::new(catalog);
    let booking = web::Data::new(booking);
    // Shared by every worker: a repeated submit may land on any of them.
    let guard = web::Data::new(SubmissionGuard::default());
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(routes::health_check))
            .route("/events", web::get().to(routes::list_events))
            .route("/registrations", web::post().to(routes::register_interest))
            .route("/bookings", web::post().to(routes::book_event))
            .route(
                "/events/{event_id}/bookings",
                web::post().to(routes::book_listed_event),
            )
            .app_data(web::FormConfig::default().error_handler(routes::reject_unreadable_form))
            .app_data(transport.clone())
            .app_data(catalog.clone())
            .app_data(booking.clone())
            .app_data(guard.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
