//! # Analytics Client Module
//!
//! ## Purpose
//! Typed wrappers around the search-analytics endpoints: daily search
//! trends over an optional date range, and the most frequent queries.
//! The range total is computed client-side from the returned points.

use crate::errors::Result;
use crate::http::ApiTransport;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Searches executed on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub count: u64,
}

/// Trend points plus the total searches across the requested range.
#[derive(Debug, Clone)]
pub struct TrendReport {
    pub points: Vec<TrendPoint>,
    pub total: u64,
}

/// One of the most frequent queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopQuery {
    pub query_text: String,
    pub count: u64,
}

/// Client for the `/analytics` endpoints.
pub struct AnalyticsClient {
    transport: Arc<ApiTransport>,
}

impl AnalyticsClient {
    pub fn new(transport: Arc<ApiTransport>) -> Self {
        Self { transport }
    }

    /// GET `/analytics/trends?from=&to=`. Both bounds are optional and
    /// omitted from the query string when absent.
    pub async fn trends(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<TrendReport> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(from) = from {
            query.push(("from", from.to_string()));
        }
        if let Some(to) = to {
            query.push(("to", to.to_string()));
        }

        let points: Vec<TrendPoint> = self.transport.get_json("/analytics/trends", &query).await?;
        let total = points.iter().map(|p| p.count).sum();

        Ok(TrendReport { points, total })
    }

    /// GET `/analytics/top-queries?limit=`.
    pub async fn top_queries(&self, limit: usize) -> Result<Vec<TopQuery>> {
        self.transport
            .get_json("/analytics/top-queries", &[("limit", limit.to_string())])
            .await
    }
}
