use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use runway_core::output::without_thumbnails;
use runway_core::render::{render_page, PageOptions};
use runway_core::{filter, FilterCriteria, ImageRecord, Label};
use serde::Serialize;

use super::error::Result;
use super::state::AppState;

type QueryPairs = Query<Vec<(String, String)>>;

async fn scan(state: &Arc<AppState>) -> Result<Vec<ImageRecord>> {
    let state = Arc::clone(state);
    let records = tokio::task::spawn_blocking(move || state.scan()).await??;
    Ok(records)
}

/// `GET /`: the filter form and the matching looks.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(pairs): QueryPairs,
) -> Result<Html<String>> {
    let criteria = FilterCriteria::from_pairs(pairs);
    let catalog = scan(&state).await?;
    let matched = filter(&catalog, &criteria);
    tracing::debug!("{} of {} looks match {:?}", matched.len(), catalog.len(), criteria);

    let vocabulary = state.scanner.vocabulary();
    let html = render_page(
        PageOptions {
            catalog: &state.config.catalog,
            vocabulary,
        },
        &criteria,
        &matched,
    );
    Ok(Html(html))
}

/// `GET /api/images`: matching records as JSON, without thumbnails.
pub async fn images(
    State(state): State<Arc<AppState>>,
    Query(pairs): QueryPairs,
) -> Result<Json<Vec<ImageRecord>>> {
    let criteria = FilterCriteria::from_pairs(pairs);
    let catalog = scan(&state).await?;
    Ok(Json(without_thumbnails(filter(&catalog, &criteria))))
}

#[derive(Debug, Serialize)]
pub struct VocabularyResponse {
    pub labels: Vec<Label>,
    pub designers: Vec<String>,
    pub seasons: Vec<String>,
    pub years: Vec<String>,
    pub shows: Vec<String>,
}

/// `GET /api/vocabulary`: every value the filters accept.
pub async fn vocabulary(State(state): State<Arc<AppState>>) -> Json<VocabularyResponse> {
    let catalog = &state.config.catalog;
    Json(VocabularyResponse {
        labels: state.scanner.vocabulary().labels().to_vec(),
        designers: catalog.designers.clone(),
        seasons: catalog.seasons.clone(),
        years: catalog.years.clone(),
        shows: catalog.shows.clone(),
    })
}
