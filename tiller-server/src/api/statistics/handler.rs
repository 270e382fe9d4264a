//! Statistics API handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, AppResult, AppState};
use crate::db::reports::{self, CategorySale, HourBucket, Overview, TopClient, TrendPoint};

#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    /// Inclusive start date (YYYY-MM-DD); default: 30 days ago
    pub from: Option<NaiveDate>,
    /// Inclusive end date (YYYY-MM-DD); default: today
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub overview: Overview,
    pub revenue_trend: Vec<TrendPoint>,
    pub category_sales: Vec<CategorySale>,
    pub top_clients: Vec<TopClient>,
    pub hourly: Vec<HourBucket>,
}

/// Resolve the requested dates into a half-open UTC range [from, to).
fn resolve_range(query: &StatisticsQuery) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = Utc::now().date_naive();
    let from_date = query.from.unwrap_or(today - Duration::days(30));
    let to_date = query.to.unwrap_or(today);

    let midnight = NaiveTime::MIN;
    let from = from_date.and_time(midnight).and_utc();
    let to = (to_date + Duration::days(1)).and_time(midnight).and_utc();
    (from, to)
}

/// GET /api/statistics?from=&to= - dashboard aggregates for a date range
pub async fn get_statistics(
    State(state): State<AppState>,
    Query(query): Query<StatisticsQuery>,
) -> AppResult<Json<StatisticsResponse>> {
    let (from, to) = resolve_range(&query);
    if from >= to {
        return Err(AppError::validation("'from' must not be after 'to'"));
    }

    tracing::debug!(%from, %to, "Fetching statistics");

    let overview = reports::overview(&state.pool, from, to)
        .await
        .map_err(AppError::from)?;
    let revenue_trend = reports::revenue_trend(&state.pool, from, to)
        .await
        .map_err(AppError::from)?;
    let category_sales = reports::category_sales(&state.pool, from, to)
        .await
        .map_err(AppError::from)?;
    let top_clients = reports::top_clients(&state.pool, from, to)
        .await
        .map_err(AppError::from)?;
    let hourly = reports::hourly_histogram(&state.pool, from, to)
        .await
        .map_err(AppError::from)?;

    Ok(Json(StatisticsResponse {
        overview,
        revenue_trend,
        category_sales,
        top_clients,
        hourly,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_half_open_on_full_days() {
        let query = StatisticsQuery {
            from: Some(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()),
            to: Some(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()),
        };
        let (from, to) = resolve_range(&query);
        assert_eq!(from.to_rfc3339(), "2026-03-01T00:00:00+00:00");
        // 'to' is inclusive as a date, so the bound is the following midnight
        assert_eq!(to.to_rfc3339(), "2026-04-01T00:00:00+00:00");
    }

    #[test]
    fn test_defaults_cover_last_30_days() {
        let query = StatisticsQuery { from: None, to: None };
        let (from, to) = resolve_range(&query);
        assert!(to > from);
        assert_eq!((to - from).num_days(), 31);
    }
}
