use actix_web::{HttpResponse, Responder, post, web};
use validator::Validate;

use crate::crawl::HttpScraper;
use crate::dto::api::{BatchScrapeResponse, ErrorResponse, MessageResponse};
use crate::forms::scrape::BatchScrapeForm;
use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::ServiceError;
use crate::services::scrape::{
    scrape_batch as scrape_batch_service, scrape_category as scrape_category_service,
};

// Registered before `scrape_category` so `batch` is not read as an id.
#[post("/scrape/batch")]
pub async fn scrape_batch(
    repo: web::Data<DieselRepository>,
    scraper: web::Data<HttpScraper>,
    form: Option<web::Json<BatchScrapeForm>>,
) -> impl Responder {
    let form = form.map(web::Json::into_inner).unwrap_or_default();
    if let Err(e) = form.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(e.to_string()));
    }
    let limit = form.limit_or(scraper.settings().batch_limit);

    let outcome =
        web::block(move || scrape_batch_service(Some(limit), scraper.get_ref(), repo.get_ref()))
            .await;

    match outcome {
        Ok(Ok(results)) => HttpResponse::Ok().json(BatchScrapeResponse::from(results)),
        Ok(Err(err)) => service_error_response(err, "Category not found"),
        Err(e) => {
            log::error!("Batch scrape task failed: {e}");
            HttpResponse::InternalServerError().json(ErrorResponse::new("Internal server error"))
        }
    }
}

#[post("/scrape/{category_id:\\d+}")]
pub async fn scrape_category(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    scraper: web::Data<HttpScraper>,
) -> impl Responder {
    let category_id = category_id.into_inner();

    let outcome = web::block(move || {
        scrape_category_service(category_id, scraper.get_ref(), repo.get_ref())
    })
    .await;

    match outcome {
        Ok(Ok(true)) => HttpResponse::Ok().json(MessageResponse::new("Category scraped successfully")),
        Ok(Ok(false)) => {
            HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to scrape category"))
        }
        Ok(Err(ServiceError::NotFound)) => {
            HttpResponse::NotFound().json(ErrorResponse::new("Category not found"))
        }
        Ok(Err(err)) => service_error_response(err, "Category not found"),
        Err(e) => {
            log::error!("Scrape task failed for category {category_id}: {e}");
            HttpResponse::InternalServerError().json(ErrorResponse::new("Internal server error"))
        }
    }
}
