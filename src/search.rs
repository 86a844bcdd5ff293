use crate::models::{MediaType, SearchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Movies,
    Tv,
}

impl Category {
    // Auto-selection after a multi search walks this order.
    pub const ALL: [Category; 2] = [Category::Movies, Category::Tv];

    pub fn label(self) -> &'static str {
        match self {
            Category::Movies => "Movies",
            Category::Tv => "TV Shows",
        }
    }

    pub fn media_type(self) -> MediaType {
        match self {
            Category::Movies => MediaType::Movie,
            Category::Tv => MediaType::Tv,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub movies: usize,
    pub tv: usize,
}

impl CategoryCounts {
    pub fn tally(results: &[SearchResult]) -> Self {
        Self {
            movies: count_of(results, MediaType::Movie),
            tv: count_of(results, MediaType::Tv),
        }
    }

    pub fn get(self, category: Category) -> usize {
        match category {
            Category::Movies => self.movies,
            Category::Tv => self.tv,
        }
    }
}

fn count_of(results: &[SearchResult], media: MediaType) -> usize {
    results
        .iter()
        .filter(|r| r.media_type == Some(media))
        .count()
}

#[derive(Debug, Default)]
pub struct SearchView {
    query: String,
    results: Vec<SearchResult>,
    active_category: Option<Category>,
    counts: CategoryCounts,
}

impl SearchView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn active_category(&self) -> Option<Category> {
        self.active_category
    }

    pub fn counts(&self) -> CategoryCounts {
        self.counts
    }

    // Emptying the query drops every piece of derived state with it.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        if self.query.is_empty() {
            self.reset_derived();
        }
    }

    pub fn can_search(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn apply_multi_results(&mut self, results: Vec<SearchResult>) {
        self.counts = CategoryCounts::tally(&results);
        self.results = results;
        if self.active_category.is_none() {
            self.active_category = Category::ALL
                .into_iter()
                .find(|c| self.counts.get(*c) > 0);
        }
    }

    // Category endpoints do not always echo a media type; every result is
    // stamped with the selected category's type before display.
    pub fn apply_category_results(&mut self, category: Category, mut results: Vec<SearchResult>) {
        for result in &mut results {
            result.media_type = Some(category.media_type());
        }
        self.active_category = Some(category);
        self.results = results;
    }

    pub fn visible_results(&self) -> Vec<&SearchResult> {
        match self.active_category {
            Some(category) => self
                .results
                .iter()
                .filter(|r| r.media_type == Some(category.media_type()))
                .collect(),
            None => self.results.iter().collect(),
        }
    }

    pub fn has_visible_results(&self) -> bool {
        !self.visible_results().is_empty()
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.reset_derived();
    }

    fn reset_derived(&mut self) {
        self.results.clear();
        self.active_category = None;
        self.counts = CategoryCounts::default();
    }
}
