pub mod admin;
pub mod aggregator;
pub mod catalog;
pub mod db_error;
pub mod library;
pub mod reconciler;
pub mod resolver;
pub mod schema;
pub mod startup;
pub mod store;
