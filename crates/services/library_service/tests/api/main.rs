mod catalog_client;
mod helpers;
mod pg_store;
