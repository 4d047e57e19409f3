pub mod error;
pub mod fields;
pub mod models;
pub mod repo;
pub mod resolver;
pub mod service;
