// Route exports
pub mod cafes;
pub mod errors;

use actix_web::web;

pub use cafes::AppState;
pub use errors::{handle_json_payload_error, handle_path_error, handle_query_payload_error, JsonError};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .configure(cafes::configure),
    );
}
