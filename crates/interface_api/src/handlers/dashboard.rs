//! Dashboard handler

use axum::{
    extract::{Query, State},
    Json,
};

use domain_claims::{Dashboard, DashboardTab, DashboardView};

use crate::dto::claims::DashboardQuery;
use crate::{error::ApiError, AppState};

/// Claims dashboard for one tab, optionally filtered by search text
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, ApiError> {
    let tab = query
        .tab
        .as_deref()
        .and_then(|t| t.parse::<DashboardTab>().ok())
        .unwrap_or_default();

    let view = Dashboard::new(state.store.clone())
        .view(tab, &query.search)
        .await?;
    Ok(Json(view))
}
