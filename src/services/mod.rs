pub mod broker_service;
pub mod handler_service;
pub mod telegram_service;
