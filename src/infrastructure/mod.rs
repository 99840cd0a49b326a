pub mod auth;
pub mod config;
pub mod db;
pub mod gateway;
pub mod http;
pub mod identity;
pub mod repositories;
