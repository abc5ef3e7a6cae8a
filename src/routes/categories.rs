use actix_web::{HttpResponse, Responder, get, post, put, web};

use crate::crawl::HttpScraper;
use crate::dto::api::{CategoryProductsResponse, ErrorResponse, ListResponse, MessageResponse};
use crate::forms::categories::{SetupCategoriesForm, SetupCategoriesPayload};
use crate::forms::products::{ReplaceProductsForm, ReplaceProductsPayload};
use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::categories::{
    list_categories as list_categories_service,
    list_due_categories as list_due_categories_service,
    replace_category_products as replace_category_products_service,
    setup_categories as setup_categories_service,
    show_category_products as show_category_products_service,
};

const CATEGORY_NOT_FOUND: &str = "Category not found";

#[get("/categories")]
pub async fn list_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match list_categories_service(repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(ListResponse::from(categories)),
        Err(err) => service_error_response(err, CATEGORY_NOT_FOUND),
    }
}

#[get("/categories/due")]
pub async fn list_due_categories(
    repo: web::Data<DieselRepository>,
    scraper: web::Data<HttpScraper>,
) -> impl Responder {
    let window = scraper.settings().staleness_window;
    match list_due_categories_service(repo.get_ref(), window) {
        Ok(categories) => HttpResponse::Ok().json(ListResponse::from(categories)),
        Err(err) => service_error_response(err, CATEGORY_NOT_FOUND),
    }
}

#[get("/categories/{category_id}/products")]
pub async fn show_category_products(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match show_category_products_service(category_id.into_inner(), repo.get_ref()) {
        Ok((category, products)) => {
            HttpResponse::Ok().json(CategoryProductsResponse::new(category, products))
        }
        Err(err) => service_error_response(err, CATEGORY_NOT_FOUND),
    }
}

#[put("/categories/{category_id}/products")]
pub async fn replace_category_products(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ReplaceProductsForm>,
) -> impl Responder {
    let payload: ReplaceProductsPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string())),
    };

    match replace_category_products_service(category_id.into_inner(), payload, repo.get_ref()) {
        Ok(count) => HttpResponse::Ok()
            .json(MessageResponse::new(format!("Replaced {count} products")).with_count(count)),
        Err(err) => service_error_response(err, CATEGORY_NOT_FOUND),
    }
}

#[post("/setup/categories")]
pub async fn setup_categories(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SetupCategoriesForm>,
) -> impl Responder {
    let payload: SetupCategoriesPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string())),
    };

    match setup_categories_service(payload, repo.get_ref()) {
        Ok(count) => HttpResponse::Ok()
            .json(MessageResponse::new(format!("Inserted {count} categories")).with_count(count)),
        Err(err) => service_error_response(err, CATEGORY_NOT_FOUND),
    }
}
