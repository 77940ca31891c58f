use crate::domain::EventCatalog;
use actix_web::{web, HttpResponse};

/// The offered events, in the order they are configured.
pub async fn list_events(catalog: web::Data<EventCatalog>) -> HttpResponse {
    HttpResponse::Ok().json(catalog.offerings())
}
