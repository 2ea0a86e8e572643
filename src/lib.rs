pub mod config;
pub mod db;
pub mod lifecycle;
pub mod review;
pub mod routes;
pub mod types;
pub mod utils;
