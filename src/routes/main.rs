use std::collections::BTreeMap;

use actix_web::{HttpResponse, Responder, get, web};

use crate::dto::api::{HealthResponse, IndexResponse};
use crate::repository::DieselRepository;

#[get("/")]
pub async fn index() -> impl Responder {
    let endpoints = BTreeMap::from([
        ("GET /api/health", "Service and database status"),
        ("GET /api/categories", "Get all categories from database"),
        ("GET /api/categories/due", "Categories due for a refresh"),
        ("GET /api/categories/{id}/products", "Get products for a category"),
        ("PUT /api/categories/{id}/products", "Replace products of a category"),
        ("POST /api/scrape/{id}", "Scrape a specific category"),
        ("POST /api/scrape/batch", "Scrape multiple categories needing update"),
        ("POST /api/setup/categories", "Setup initial categories"),
    ]);

    HttpResponse::Ok().json(IndexResponse {
        message: "Bestsellers Scraper API with Database".to_string(),
        endpoints,
    })
}

#[get("/health")]
pub async fn health(repo: web::Data<DieselRepository>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        success: true,
        message: "Bestseller scraper is running".to_string(),
        database_connected: repo.is_connected(),
    })
}
