pub mod capability;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod server;
