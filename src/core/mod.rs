pub mod credentials;
pub mod error;
pub mod models;
pub mod notifications;
pub mod settings;
pub mod state;
pub mod validation;
