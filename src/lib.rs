//! Core library exports for the bestseller scraper service.
//!
//! With only the `data` feature the crate exposes the domain types, the
//! Diesel models and the repositories. The `server` feature adds the page
//! fetcher and extractor, forms, services and the Actix-web routes.

pub mod db;
pub mod domain;
pub mod error_conversions;
pub mod models;
pub mod repository;
pub mod schema;

#[cfg(feature = "server")]
pub mod crawl;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
