pub mod config;
pub mod cookies;
pub mod csrf;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod payments;
pub mod ratelimit;
pub mod response;
pub mod routes;
pub mod sanitize;
pub mod services;
pub mod state;
