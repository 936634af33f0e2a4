/// Read-only hospital directory API.
use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::models::{Coordinates, Network};
use crate::services::directory::{DirectoryQuery, SortKey, DEMO_LOCATION};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HospitalListQuery {
    pub network: Option<Network>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Substring match on name or address.
    pub q: Option<String>,
    pub min_beds: Option<u32>,
    /// Comma-separated facility tags; all must be present.
    pub facility: Option<String>,
    pub sort: Option<SortKey>,
}

fn parse_facilities(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[get("/api/hospitals")]
pub async fn list_hospitals(
    query: web::Query<HospitalListQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let origin = match (query.lat, query.lng) {
        (Some(latitude), Some(longitude)) => Coordinates {
            latitude,
            longitude,
        },
        _ => DEMO_LOCATION,
    };

    let directory_query = DirectoryQuery {
        network: query.network.unwrap_or(Network::Gov),
        origin,
        search: query.q.clone(),
        min_beds: query.min_beds.unwrap_or(0),
        facilities: query
            .facility
            .as_deref()
            .map(parse_facilities)
            .unwrap_or_default(),
        sort: query.sort.unwrap_or_default(),
    };

    let hospitals = state.directory.query(&directory_query);

    HttpResponse::Ok().json(json!({
        "count": hospitals.len(),
        "hospitals": hospitals,
    }))
}

#[get("/api/hospitals/{id}")]
pub async fn get_hospital(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match state.directory.get(&id) {
        Some(hospital) => Ok(HttpResponse::Ok().json(hospital)),
        None => Err(AppError::NotFound),
    }
}
