#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the fire risk dashboard server.
//!
//! Analysis rows are served as the analytics result types directly; this
//! crate holds the envelope, parameter and error types around them.

use fire_risk_analytics_models::HumanCostMetric;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters for the vehicles endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleQueryParams {
    /// Maximum number of dwelling types to return. All when absent.
    pub limit: Option<usize>,
}

/// Query parameters for the human cost endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanCostQueryParams {
    /// Metric to rank causes by. Catalog order when absent.
    pub rank_by: Option<HumanCostMetric>,
    /// Maximum number of causes to return. Defaults to the metric's
    /// dashboard limit when ranking, all rows otherwise.
    pub limit: Option<usize>,
}

impl HumanCostQueryParams {
    /// The effective row limit, if any.
    #[must_use]
    pub fn effective_limit(&self) -> Option<usize> {
        self.limit
            .or_else(|| self.rank_by.map(HumanCostMetric::default_limit))
    }
}

/// A query catalog entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCatalogEntry {
    /// Query name, usable with `DELETE /api/cache/{name}`.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// SQL text.
    pub sql: String,
    /// Output columns in result order.
    pub columns: Vec<String>,
}

/// Response for cache invalidation endpoints.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCacheCleared {
    /// Number of cached results dropped.
    pub cleared: usize,
}

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
