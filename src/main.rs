use std::env;
use std::io;

use actix_web::{App, HttpServer, middleware, web};
use config::{Config, Environment, File};
use dotenvy::dotenv;

use bestseller_scraper::crawl::HttpScraper;
use bestseller_scraper::db::{establish_connection_pool, run_migrations};
use bestseller_scraper::models::config::ServerConfig;
use bestseller_scraper::repository::DieselRepository;
use bestseller_scraper::routes::categories::{
    list_categories, list_due_categories, replace_category_products, setup_categories,
    show_category_products,
};
use bestseller_scraper::routes::json_config;
use bestseller_scraper::routes::main::{health, index};
use bestseller_scraper::routes::scrape::{scrape_batch, scrape_category};

fn load_config() -> Result<ServerConfig, config::ConfigError> {
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    Config::builder()
        .add_source(File::with_name("config/default"))
        .add_source(File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize()
}

// The blocking HTTP client must be built outside the async runtime, so the
// actix system is started by hand after setup.
fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = load_config().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        io::Error::other(e)
    })?;

    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        log::error!("Failed to establish database connection: {e}");
        io::Error::other(e)
    })?;
    run_migrations(&pool).map_err(|e| {
        log::error!("Failed to run database migrations: {e}");
        io::Error::other(e)
    })?;

    let scraper = HttpScraper::from_config(&server_config.scraper).map_err(|e| {
        log::error!("Failed to build scraper: {e}");
        io::Error::other(e)
    })?;

    let repo = web::Data::new(DieselRepository::new(pool));
    let scraper = web::Data::new(scraper);
    let bind_address = (server_config.address.clone(), server_config.port);

    log::info!(
        "Starting server on {}:{}",
        server_config.address,
        server_config.port
    );

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            App::new()
                .wrap(middleware::Logger::default())
                .app_data(json_config())
                .app_data(repo.clone())
                .app_data(scraper.clone())
                .service(index)
                .service(
                    web::scope("/api")
                        .service(health)
                        .service(list_categories)
                        .service(list_due_categories)
                        .service(show_category_products)
                        .service(replace_category_products)
                        .service(scrape_batch)
                        .service(scrape_category)
                        .service(setup_categories),
                )
        })
        .bind(bind_address)?
        .run()
        .await
    })
}
