use axum::{Json, extract::State};
use scout_cache::{CacheStats, ResultCache};
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct CacheController {
    cache: Arc<ResultCache>,
}

impl CacheController {
    pub fn new(cache: Arc<ResultCache>) -> Self {
        Self { cache }
    }
}

#[derive(Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub cleared: usize,
}

pub async fn cache_stats(State(controller): State<CacheController>) -> Json<CacheStats> {
    Json(controller.cache.stats())
}

pub async fn clear_cache(State(controller): State<CacheController>) -> Json<ClearResponse> {
    let cleared = controller.cache.len();
    controller.cache.clear();
    Json(ClearResponse { success: true, cleared })
}
