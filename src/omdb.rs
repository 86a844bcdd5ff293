use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, warn};

const OMDB_BASE: &str = "https://www.omdbapi.com/";
const ROTTEN_TOMATOES_SOURCE: &str = "Rotten Tomatoes";

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: String,
}

#[async_trait]
pub trait RatingsApi: Send + Sync {
    async fn get_ratings(&self, imdb_id: &str) -> Result<Option<ExternalRatings>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalRatings {
    pub imdb_rating: Option<String>,
    pub imdb_votes: Option<String>,
    pub rotten_tomatoes_rating: Option<String>,
    pub metascore: Option<String>,
}

impl ExternalRatings {
    // OMDb reports a missing metascore as the literal string "N/A".
    pub fn display_metascore(&self) -> Option<&str> {
        self.metascore.as_deref().filter(|m| *m != "N/A")
    }
}

#[derive(Debug, Deserialize)]
struct OmdbPayload {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Ratings", default)]
    ratings: Vec<OmdbRating>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    imdb_votes: Option<String>,
    #[serde(rename = "Metascore")]
    metascore: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbRating {
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Value")]
    value: String,
}

fn ratings_from_payload(payload: OmdbPayload) -> ExternalRatings {
    let rotten_tomatoes_rating = payload
        .ratings
        .into_iter()
        .find(|r| r.source == ROTTEN_TOMATOES_SOURCE)
        .map(|r| r.value);
    ExternalRatings {
        imdb_rating: payload.imdb_rating,
        imdb_votes: payload.imdb_votes,
        rotten_tomatoes_rating,
        metascore: payload.metascore,
    }
}

impl OmdbClient {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OMDB_API_KEY").context("OMDB_API_KEY not set")?;
        Ok(Self::new(api_key))
    }

    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    async fn fetch(&self, imdb_id: &str) -> Result<OmdbPayload> {
        let url = format!(
            "{OMDB_BASE}?i={}&apikey={}",
            urlencoding::encode(imdb_id),
            self.api_key
        );
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .context("request failed")?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {}", url, text));
        }
        let parsed: OmdbPayload = serde_json::from_str(&text).context("JSON parse failed")?;
        Ok(parsed)
    }
}

#[async_trait]
impl RatingsApi for OmdbClient {
    // Ratings are supplementary: a missing id or a failed lookup is "no data",
    // never an error surfaced to the caller.
    async fn get_ratings(&self, imdb_id: &str) -> Result<Option<ExternalRatings>> {
        if imdb_id.trim().is_empty() {
            return Ok(None);
        }
        let payload = match self.fetch(imdb_id).await {
            Ok(p) => p,
            Err(e) => {
                warn!("OMDb lookup for '{}' failed: {:#}", imdb_id, e);
                return Ok(None);
            }
        };
        // OMDb signals "not found" as HTTP 200 with Response: "False".
        if payload.response.as_deref() == Some("False") {
            debug!("OMDb has no record for '{}'", imdb_id);
            return Ok(None);
        }
        Ok(Some(ratings_from_payload(payload)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_id_returns_no_result_without_error() {
        let client = OmdbClient::new("test-key".to_string());
        assert_eq!(client.get_ratings("").await.unwrap(), None);
        assert_eq!(client.get_ratings("   ").await.unwrap(), None);
    }

    #[test]
    fn rotten_tomatoes_entry_is_extracted_by_source_name() {
        let payload: OmdbPayload = serde_json::from_str(
            r#"{
                "Response": "True",
                "Ratings": [
                    { "Source": "Internet Movie Database", "Value": "8.7/10" },
                    { "Source": "Rotten Tomatoes", "Value": "91%" },
                    { "Source": "Metacritic", "Value": "73/100" }
                ],
                "imdbRating": "8.7",
                "imdbVotes": "2,094,517",
                "Metascore": "73"
            }"#,
        )
        .unwrap();
        let ratings = ratings_from_payload(payload);
        assert_eq!(ratings.rotten_tomatoes_rating.as_deref(), Some("91%"));
        assert_eq!(ratings.imdb_rating.as_deref(), Some("8.7"));
        assert_eq!(ratings.imdb_votes.as_deref(), Some("2,094,517"));
        assert_eq!(ratings.metascore.as_deref(), Some("73"));
    }

    #[test]
    fn missing_rotten_tomatoes_entry_leaves_field_absent() {
        let payload: OmdbPayload = serde_json::from_str(
            r#"{
                "Response": "True",
                "Ratings": [
                    { "Source": "Internet Movie Database", "Value": "8.7/10" }
                ],
                "imdbRating": "8.7",
                "imdbVotes": "2,094,517",
                "Metascore": "N/A"
            }"#,
        )
        .unwrap();
        let ratings = ratings_from_payload(payload);
        assert_eq!(ratings.rotten_tomatoes_rating, None);
        assert_eq!(ratings.display_metascore(), None);
    }

    #[test]
    fn ratings_serialize_with_camel_case_keys() {
        let ratings = ExternalRatings {
            imdb_rating: Some("8.7".to_string()),
            imdb_votes: Some("2,094,517".to_string()),
            rotten_tomatoes_rating: Some("91%".to_string()),
            metascore: Some("73".to_string()),
        };
        let value = serde_json::to_value(&ratings).unwrap();
        assert_eq!(value["imdbRating"], "8.7");
        assert_eq!(value["imdbVotes"], "2,094,517");
        assert_eq!(value["rottenTomatoesRating"], "91%");
        assert_eq!(value["metascore"], "73");
    }
}
