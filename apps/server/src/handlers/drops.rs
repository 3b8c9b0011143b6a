use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use dropcatch_race::SweepReport;
use dropcatch_store::{DropListing, DropQuery, SortField, SortOrder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ListParams {
    sort: Option<String>,
    order: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DropList {
    drops: Vec<DropListing>,
}

/// Resolves everything that is due, then lists the most relevant drops.
pub(crate) async fn list_drops(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<DropList> {
    state.sweeper.sweep_once(state.clock.now()).await;

    let query = DropQuery {
        sort: SortField::parse_or_default(params.sort.as_deref()),
        order: SortOrder::parse_or_default(params.order.as_deref()),
        ..DropQuery::default()
    };
    Json(DropList { drops: state.store.recent_drops(query) })
}

pub(crate) async fn sweep_now(State(state): State<AppState>) -> Json<SweepReport> {
    Json(state.sweeper.sweep_once(state.clock.now()).await)
}
