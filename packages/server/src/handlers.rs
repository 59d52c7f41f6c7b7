//! HTTP handler functions for the dashboard API.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use fire_risk_analytics::catalog::CatalogQuery;
use fire_risk_analytics::{AnalyticsError, views};
use fire_risk_database::Gateway;
use fire_risk_server_models::{
    ApiCacheCleared, ApiCatalogEntry, ApiError, ApiHealth, HumanCostQueryParams,
    VehicleQueryParams,
};
use serde::Serialize;

use crate::{AppState, SharedExecutor};

/// Runs `f` against the gateway on the blocking pool and renders the
/// result as JSON.
async fn run_analysis<T, F>(state: &AppState, what: &str, f: F) -> HttpResponse
where
    T: Serialize + Send + 'static,
    F: FnOnce(&Gateway<SharedExecutor>) -> Result<T, AnalyticsError> + Send + 'static,
{
    let gateway = Arc::clone(&state.gateway);

    match web::block(move || f(&gateway)).await {
        Ok(Ok(value)) => HttpResponse::Ok().json(value),
        Ok(Err(e)) if e.is_data_unavailable() => {
            log::warn!("Failed to {what}: {e}");
            HttpResponse::ServiceUnavailable().json(ApiError::new(e.to_string()))
        }
        Ok(Err(e)) => {
            log::error!("Failed to {what}: {e}");
            HttpResponse::InternalServerError().json(ApiError::new(format!("Failed to {what}")))
        }
        Err(e) => {
            log::error!("Blocking task failed to {what}: {e}");
            HttpResponse::InternalServerError().json(ApiError::new(format!("Failed to {what}")))
        }
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/vehicles`
///
/// Dwelling types by mean attending vehicles, highest first.
pub async fn vehicles(
    state: web::Data<AppState>,
    params: web::Query<VehicleQueryParams>,
) -> HttpResponse {
    let limit = params.limit;

    run_analysis(&state, "load vehicle response", move |gateway| {
        let rows = fire_risk_analytics::vehicles_by_dwelling(gateway)?;
        Ok(match limit {
            Some(n) => views::top_vehicle_response(&rows, n).to_vec(),
            None => rows,
        })
    })
    .await
}

/// `GET /api/locations`
///
/// House vs. purpose-built flats fire-start location comparison.
pub async fn locations(state: web::Data<AppState>) -> HttpResponse {
    run_analysis(
        &state,
        "compare fire-start locations",
        fire_risk_analytics::location_comparison,
    )
    .await
}

/// `GET /api/human-cost`
///
/// Human cost per ignition cause, optionally ranked by one metric.
pub async fn human_cost(
    state: web::Data<AppState>,
    params: web::Query<HumanCostQueryParams>,
) -> HttpResponse {
    let rank_by = params.rank_by;
    let limit = params.effective_limit();

    run_analysis(&state, "load human cost by cause", move |gateway| {
        let mut rows = fire_risk_analytics::human_cost_by_cause(gateway)?;
        if let Some(metric) = rank_by {
            rows = views::rank_human_cost(&rows, metric, limit.unwrap_or(rows.len()));
        } else if let Some(n) = limit {
            rows.truncate(n);
        }
        Ok(rows)
    })
    .await
}

/// `GET /api/queries`
///
/// Lists the query catalog.
pub async fn queries() -> HttpResponse {
    let entries: Vec<ApiCatalogEntry> = CatalogQuery::ALL
        .iter()
        .map(|query| ApiCatalogEntry {
            name: query.to_string(),
            description: query.description().to_string(),
            sql: query.sql().to_string(),
            columns: query
                .output_columns()
                .iter()
                .map(ToString::to_string)
                .collect(),
        })
        .collect();

    HttpResponse::Ok().json(entries)
}

/// `DELETE /api/cache`
pub async fn clear_cache(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiCacheCleared {
        cleared: state.gateway.clear(),
    })
}

/// `DELETE /api/cache/{name}`
///
/// Drops the cached result of one catalog query.
pub async fn invalidate_cache(
    state: web::Data<AppState>,
    name: web::Path<String>,
) -> HttpResponse {
    let Ok(query) = name.parse::<CatalogQuery>() else {
        return HttpResponse::NotFound().json(ApiError::new(format!("Unknown query '{name}'")));
    };

    let cleared = usize::from(state.gateway.invalidate(query.sql()));
    log::info!("Invalidated {query} ({cleared} cached)");

    HttpResponse::Ok().json(ApiCacheCleared { cleared })
}
