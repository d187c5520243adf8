pub mod validations;
