use crate::omdb::{OmdbClient, RatingsApi};
use crate::tmdb::{TmdbApi, TmdbClient};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
    pub ratings: Arc<dyn RatingsApi>,
}

pub async fn run_server() -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::from_env()?);
    let ratings: Arc<dyn RatingsApi> = Arc::new(OmdbClient::from_env()?);
    let state = AppState { tmdb, ratings };

    let app = build_router(state).layer(tower_http::trace::TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/ratings/:imdb_id", get(ratings_by_imdb_id))
        .route("/api/tmdb/movie/:id", get(movie_details))
        .route("/api/tmdb/tv/:id", get(tv_details))
        .route("/api/tmdb/search/multi", get(search_multi))
        .route("/api/tmdb/search/movies", get(search_movies))
        .route("/api/tmdb/search/tv", get(search_tv))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Deserialize)]
struct SearchParams {
    query: Option<String>,
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn upstream_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

fn present(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.trim().is_empty())
}

async fn ratings_by_imdb_id(
    State(state): State<AppState>,
    Path(imdb_id): Path<String>,
) -> Response {
    if imdb_id.trim().is_empty() {
        return bad_request("IMDb ID is required");
    }
    match state.ratings.get_ratings(&imdb_id).await {
        // None serializes to null: absence is a valid, successful answer.
        Ok(ratings) => Json(ratings).into_response(),
        Err(e) => {
            error!("Error fetching ratings for '{}': {:#}", imdb_id, e);
            upstream_error("Failed to fetch ratings")
        }
    }
}

async fn movie_details(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if id.trim().is_empty() {
        return bad_request("Movie ID is required");
    }
    match state.tmdb.movie_details(&id).await {
        Ok(movie) => Json(movie).into_response(),
        Err(e) => {
            error!("Error fetching movie details for '{}': {:#}", id, e);
            upstream_error("Failed to fetch movie details")
        }
    }
}

async fn tv_details(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if id.trim().is_empty() {
        return bad_request("TV show ID is required");
    }
    match state.tmdb.tv_details(&id).await {
        Ok(show) => Json(show).into_response(),
        Err(e) => {
            error!("Error fetching TV show details for '{}': {:#}", id, e);
            upstream_error("Failed to fetch TV show details")
        }
    }
}

async fn search_multi(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let Some(query) = present(params.query) else {
        return bad_request("Query parameter is required");
    };
    match state.tmdb.search_multi(&query).await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            error!("Error searching for '{}': {:#}", query, e);
            upstream_error("Failed to fetch search results")
        }
    }
}

async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let Some(query) = present(params.query) else {
        return bad_request("Query parameter is required");
    };
    match state.tmdb.search_movies(&query).await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            error!("Error searching movies for '{}': {:#}", query, e);
            upstream_error("Failed to fetch movies")
        }
    }
}

async fn search_tv(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let Some(query) = present(params.query) else {
        return bad_request("Query parameter is required");
    };
    match state.tmdb.search_tv(&query).await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            error!("Error searching TV shows for '{}': {:#}", query, e);
            upstream_error("Failed to fetch TV shows")
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
