pub mod api;
pub mod auth;
pub mod config;
pub mod cors;
pub mod db;
pub mod docs;
pub mod error;
pub mod model;
pub mod models;
pub mod resource;
pub mod routes;
pub mod utils;
