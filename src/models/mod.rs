pub mod application_event;
