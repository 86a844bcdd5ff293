use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;

use crate::models::SearchResponse;

const TMDB_BASE: &str = "https://api.themoviedb.org/3";
const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
}

#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn search_multi(&self, query: &str) -> Result<SearchResponse>;
    async fn search_movies(&self, query: &str) -> Result<SearchResponse>;
    async fn search_tv(&self, query: &str) -> Result<SearchResponse>;
    async fn movie_details(&self, id: &str) -> Result<MovieDetail>;
    async fn tv_details(&self, id: &str) -> Result<ShowDetail>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    W200,
    #[default]
    W500,
    Original,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::W200 => "w200",
            ImageSize::W500 => "w500",
            ImageSize::Original => "original",
        }
    }
}

pub fn image_url(path: &str, size: ImageSize) -> Option<String> {
    if path.is_empty() {
        return None;
    }
    Some(format!("{IMAGE_BASE}/{}{path}", size.as_str()))
}

impl TmdbClient {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("TMDB_API_KEY").context("TMDB_API_KEY not set")?;
        Ok(Self {
            client: Client::new(),
            api_key,
        })
    }

    fn search_url(&self, kind: &str, query: &str) -> String {
        format!(
            "{TMDB_BASE}/search/{kind}?api_key={}&query={}&language=en-US&page=1&include_adult=false",
            self.api_key,
            urlencoding::encode(query)
        )
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .context("request failed")?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {}", url, text));
        }
        let parsed: T = serde_json::from_str(&text).context("JSON parse failed")?;
        Ok(parsed)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn search_multi(&self, query: &str) -> Result<SearchResponse> {
        if query.trim().is_empty() {
            anyhow::bail!("search query must not be empty");
        }
        self.get_json(&self.search_url("multi", query)).await
    }

    async fn search_movies(&self, query: &str) -> Result<SearchResponse> {
        if query.trim().is_empty() {
            anyhow::bail!("search query must not be empty");
        }
        self.get_json(&self.search_url("movie", query)).await
    }

    async fn search_tv(&self, query: &str) -> Result<SearchResponse> {
        if query.trim().is_empty() {
            anyhow::bail!("search query must not be empty");
        }
        self.get_json(&self.search_url("tv", query)).await
    }

    async fn movie_details(&self, id: &str) -> Result<MovieDetail> {
        if id.trim().is_empty() {
            anyhow::bail!("movie id must not be empty");
        }
        // One appended request yields detail + cast + reviews; avoids three round trips.
        let url = format!(
            "{TMDB_BASE}/movie/{id}?api_key={}&language=en-US&append_to_response=credits,reviews",
            self.api_key
        );
        self.get_json(&url).await
    }

    async fn tv_details(&self, id: &str) -> Result<ShowDetail> {
        if id.trim().is_empty() {
            anyhow::bail!("tv show id must not be empty");
        }
        // external_ids carries the IMDb id the ratings route joins on.
        let url = format!(
            "{TMDB_BASE}/tv/{id}?api_key={}&language=en-US&append_to_response=credits,reviews,external_ids",
            self.api_key
        );
        self.get_json(&url).await
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalIds {
    #[serde(default)]
    pub imdb_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reviews {
    #[serde(default)]
    pub results: Vec<Review>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub author_details: Option<AuthorDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorDetails {
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub avatar_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<f32>,
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub reviews: Option<Reviews>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowDetail {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub episode_run_time: Option<Vec<i32>>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
    #[serde(default)]
    pub number_of_seasons: Option<i32>,
    #[serde(default)]
    pub number_of_episodes: Option<i32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub networks: Option<Vec<Network>>,
    #[serde(default)]
    pub external_ids: Option<ExternalIds>,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub reviews: Option<Reviews>,
}

impl ShowDetail {
    pub fn imdb_id(&self) -> Option<&str> {
        self.external_ids.as_ref().and_then(|e| e.imdb_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_is_none_for_empty_path() {
        assert_eq!(image_url("", ImageSize::W500), None);
    }

    #[test]
    fn image_url_joins_base_size_and_path() {
        assert_eq!(
            image_url("/abc.jpg", ImageSize::W200).as_deref(),
            Some("https://image.tmdb.org/t/p/w200/abc.jpg")
        );
        assert_eq!(
            image_url("/abc.jpg", ImageSize::Original).as_deref(),
            Some("https://image.tmdb.org/t/p/original/abc.jpg")
        );
    }

    #[test]
    fn default_image_size_is_w500() {
        assert_eq!(ImageSize::default().as_str(), "w500");
    }

    #[test]
    fn show_detail_exposes_appended_imdb_id() {
        let show: ShowDetail = serde_json::from_str(
            r#"{
                "id": 1396,
                "name": "Breaking Bad",
                "overview": "A chemistry teacher.",
                "external_ids": { "imdb_id": "tt0903747" }
            }"#,
        )
        .unwrap();
        assert_eq!(show.imdb_id(), Some("tt0903747"));

        let bare: ShowDetail =
            serde_json::from_str(r#"{"id": 2, "name": "Unlinked", "overview": ""}"#).unwrap();
        assert_eq!(bare.imdb_id(), None);
    }
}
