use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::rank;
use crate::models::{
    CafeSearchParams, CreateCafeRequest, DeleteResponse, ErrorResponse, HealthResponse,
    ImportResponse, RankRequest,
};
use crate::services::{OverpassClient, PointStore};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PointStore>,
    pub overpass: Arc<OverpassClient>,
}

/// Configure all cafe-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/cafes", web::get().to(list_cafes))
        .route("/cafes", web::post().to(create_cafe))
        .route("/cafes/rank", web::post().to(rank_cafes))
        .route("/cafes/import", web::post().to(import_cafes))
        .route("/cafes/{id}", web::delete().to(delete_cafe));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// List stored cafes
///
/// GET /api/v1/cafes?search=&minRating=&lat=&lon=&radius=&sort=
///
/// Unparsable numeric parameters switch their filter off.
async fn list_cafes(
    state: web::Data<AppState>,
    params: web::Query<CafeSearchParams>,
) -> impl Responder {
    let query = params.into_inner().into_query();
    let points = state.store.all().await;

    let ranked = rank(&points, &query);

    tracing::info!(
        "Returning {} of {} stored cafes (search: {:?}, sort: {})",
        ranked.len(),
        points.len(),
        query.search_text,
        query.sort_key
    );

    HttpResponse::Ok().json(ranked)
}

/// Rank a caller-supplied collection
///
/// POST /api/v1/cafes/rank
///
/// Request body:
/// ```json
/// {
///   "points": [{"id": 1, "name": "Sunrise Cafe", "lat": 9.93, "lon": 78.12, "rating": 4.5}],
///   "query": {"searchText": "", "minRating": 4.0, "userPosition": {"lat": 9.92, "lon": 78.11},
///             "radiusKm": 5, "sortKey": "distance_asc"}
/// }
/// ```
async fn rank_cafes(req: web::Json<RankRequest>) -> impl Responder {
    let RankRequest { points, query } = req.into_inner();
    let ranked = rank(&points, &query);

    tracing::info!("Ranked {} of {} supplied cafes", ranked.len(), points.len());

    HttpResponse::Ok().json(ranked)
}

/// Store a new cafe
///
/// POST /api/v1/cafes
async fn create_cafe(
    state: web::Data<AppState>,
    req: web::Json<CreateCafeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create_cafe request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let request = req.into_inner();
    match state.store.insert(|id| request.into_point(id)).await {
        Ok(point) => {
            tracing::info!("Created cafe {} ({})", point.id, point.name);
            HttpResponse::Created().json(point)
        }
        Err(e) => {
            tracing::error!("Failed to store cafe: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to store cafe".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Delete a cafe by id
///
/// DELETE /api/v1/cafes/{id}
async fn delete_cafe(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();

    match state.store.delete(id).await {
        Ok(removed) => {
            tracing::info!("Delete cafe {}: removed={}", id, removed);
            HttpResponse::Ok().json(DeleteResponse { ok: true, removed })
        }
        Err(e) => {
            tracing::error!("Failed to delete cafe {}: {}", id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to delete cafe".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Pull cafes from Overpass into the store
///
/// POST /api/v1/cafes/import
async fn import_cafes(state: web::Data<AppState>) -> impl Responder {
    let points = match state.overpass.fetch_points().await {
        Ok(points) => points,
        Err(e) => {
            tracing::warn!("Overpass import failed: {}", e);
            return HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to fetch from Overpass".to_string(),
                message: e.to_string(),
                status_code: 502,
            });
        }
    };

    let fetched = points.len();
    match state.store.upsert_many(points).await {
        Ok(inserted) => {
            tracing::info!("Imported {} cafes ({} new)", fetched, inserted);
            HttpResponse::Ok().json(ImportResponse { fetched, inserted })
        }
        Err(e) => {
            tracing::error!("Failed to store imported cafes: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to store imported cafes".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
