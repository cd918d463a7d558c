pub mod catalog;
pub mod chat;
pub mod client;
pub mod config;
pub mod configurator;
pub mod errors;
pub mod part;
pub mod pricing;
pub mod session;
pub mod stage;
pub mod ui;
pub mod wattage;
