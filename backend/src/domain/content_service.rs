//! Parenting tips and articles.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::calendar::LocalCalendar;
use crate::domain::commands::content::{ArticleListQuery, ArticleListResult, Pagination};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::content::{Article, Tip};
use crate::storage::traits::ContentStorage;

pub const DEFAULT_TIP_LIMIT: u32 = 10;
pub const DEFAULT_ARTICLE_LIMIT: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 50;

/// Index of the tip shown on a given day of the year
pub fn tip_index(day_of_year: u32, tip_count: usize) -> usize {
    day_of_year as usize % tip_count
}

#[derive(Clone)]
pub struct ContentService {
    content: Arc<dyn ContentStorage>,
    calendar: LocalCalendar,
}

impl ContentService {
    pub fn new(content: Arc<dyn ContentStorage>, calendar: LocalCalendar) -> Self {
        Self { content, calendar }
    }

    /// One matching tip that rotates daily, or the built-in welcome tip when
    /// nothing covers `age_months`
    pub async fn tip_of_the_day(&self, age_months: u32) -> DomainResult<Tip> {
        let mut tips = self.content.list_tips_for_age(age_months, None).await?;
        if tips.is_empty() {
            info!("No tips for {} months, using default tip", age_months);
            return Ok(Tip::default_tip());
        }

        let index = tip_index(self.calendar.day_of_year(), tips.len());
        Ok(tips.swap_remove(index))
    }

    pub async fn tips_for_age(&self, age_months: u32, limit: Option<u32>) -> DomainResult<Vec<Tip>> {
        let limit = check_limit(limit, DEFAULT_TIP_LIMIT)?;
        Ok(self.content.list_tips_for_age(age_months, Some(limit)).await?)
    }

    pub async fn list_articles(&self, query: ArticleListQuery) -> DomainResult<ArticleListResult> {
        let page = query.page.unwrap_or(1);
        if page == 0 {
            return Err(DomainError::validation("page must be at least 1"));
        }
        let limit = check_limit(query.limit, DEFAULT_ARTICLE_LIMIT)?;
        let offset = (page - 1).saturating_mul(limit);

        let articles = self.content.list_articles(&query.filter, offset, limit).await?;
        let total = self.content.count_articles(&query.filter).await?;

        Ok(ArticleListResult {
            articles,
            pagination: Pagination {
                page,
                limit,
                total,
                total_pages: total.div_ceil(limit),
            },
        })
    }

    pub async fn article_by_slug(&self, slug: &str) -> DomainResult<Article> {
        match self.content.get_published_article(slug).await? {
            Some(article) => Ok(article),
            None => {
                warn!("Article '{}' not found", slug);
                Err(DomainError::not_found("Article not found"))
            }
        }
    }
}

fn check_limit(limit: Option<u32>, default: u32) -> DomainResult<u32> {
    match limit {
        None => Ok(default),
        Some(limit) if (1..=MAX_PAGE_SIZE).contains(&limit) => Ok(limit),
        Some(_) => Err(DomainError::validation(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_SIZE
        ))),
    }
}
