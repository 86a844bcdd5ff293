use serde::{Deserialize, Deserializer, Serialize};

use crate::tmdb::{image_url, ImageSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
    Person,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
            MediaType::Person => "person",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "movie" => Some(MediaType::Movie),
            "tv" => Some(MediaType::Tv),
            "person" => Some(MediaType::Person),
            _ => None,
        }
    }
}

// TMDB sometimes emits media types we do not model (e.g. "collection");
// those count as absent rather than failing the whole response.
fn lenient_media_type<'de, D>(de: D) -> Result<Option<MediaType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(de)?;
    Ok(raw.as_deref().and_then(MediaType::parse))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default, deserialize_with = "lenient_media_type")]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
}

impl SearchResult {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Unknown Title")
    }

    pub fn year(&self) -> Option<&str> {
        let date = self
            .release_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .or(self
                .first_air_date
                .as_deref()
                .filter(|d| !d.is_empty()))?;
        date.split('-').next()
    }

    pub fn portrait_url(&self) -> Option<String> {
        let path = self
            .poster_path
            .as_deref()
            .or(self.profile_path.as_deref())?;
        image_url(path, ImageSize::default())
    }

    pub fn detail_path(&self) -> String {
        let media = self.media_type.unwrap_or(MediaType::Movie);
        format!("/{}/{}", media.as_str(), self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub page: Option<i32>,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub total_pages: Option<i32>,
    #[serde(default)]
    pub total_results: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> SearchResult {
        SearchResult {
            id: 603,
            title: None,
            name: None,
            poster_path: None,
            profile_path: None,
            media_type: None,
            release_date: None,
            first_air_date: None,
            vote_average: None,
        }
    }

    #[test]
    fn display_title_prefers_title_then_name() {
        let mut item = result();
        assert_eq!(item.display_title(), "Unknown Title");
        item.name = Some("The Show".to_string());
        assert_eq!(item.display_title(), "The Show");
        item.title = Some("The Movie".to_string());
        assert_eq!(item.display_title(), "The Movie");
    }

    #[test]
    fn year_comes_from_either_date_field() {
        let mut item = result();
        assert_eq!(item.year(), None);
        item.first_air_date = Some("1999-03-28".to_string());
        assert_eq!(item.year(), Some("1999"));
        item.release_date = Some("2003-11-05".to_string());
        assert_eq!(item.year(), Some("2003"));
        item.release_date = Some(String::new());
        assert_eq!(item.year(), Some("1999"));
    }

    #[test]
    fn detail_path_defaults_to_movie() {
        let mut item = result();
        assert_eq!(item.detail_path(), "/movie/603");
        item.media_type = Some(MediaType::Tv);
        assert_eq!(item.detail_path(), "/tv/603");
    }

    #[test]
    fn portrait_prefers_poster_over_profile() {
        let mut item = result();
        assert_eq!(item.portrait_url(), None);
        item.profile_path = Some("/face.jpg".to_string());
        assert_eq!(
            item.portrait_url().as_deref(),
            Some("https://image.tmdb.org/t/p/w500/face.jpg")
        );
        item.poster_path = Some("/poster.jpg".to_string());
        assert_eq!(
            item.portrait_url().as_deref(),
            Some("https://image.tmdb.org/t/p/w500/poster.jpg")
        );
    }

    #[test]
    fn unknown_media_type_deserializes_as_absent() {
        let item: SearchResult =
            serde_json::from_str(r#"{"id": 1, "media_type": "collection"}"#).unwrap();
        assert_eq!(item.media_type, None);
        let item: SearchResult = serde_json::from_str(r#"{"id": 2, "media_type": "tv"}"#).unwrap();
        assert_eq!(item.media_type, Some(MediaType::Tv));
    }
}
