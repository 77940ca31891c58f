mod events;
mod health_check;
mod registrations;
mod startup;
