use shared::{
    Article as SharedArticle, ArticleListResponse, ArticleQuery, PaginationInfo, Tip as SharedTip,
};

use crate::domain::calendar::format_timestamp;
use crate::domain::commands::content::{ArticleListQuery, ArticleListResult};
use crate::domain::models::content::{Article, ArticleFilter, Tip};

/// Mapper between the content DTOs and the tip/article models
pub struct ContentMapper;

impl ContentMapper {
    pub fn to_tip_dto(domain: Tip) -> SharedTip {
        SharedTip {
            id: domain.id,
            title: domain.title,
            content: domain.content,
            category: domain.category,
            icon_name: domain.icon_name,
            age_months_min: domain.age_months_min,
            age_months_max: domain.age_months_max,
        }
    }

    pub fn to_article_dto(domain: Article) -> SharedArticle {
        SharedArticle {
            id: domain.id,
            title: domain.title,
            slug: domain.slug,
            excerpt: domain.excerpt,
            content: domain.content,
            image_url: domain.image_url,
            category: domain.category,
            tags: domain.tags,
            read_time_min: domain.read_time_min,
            age_months_min: domain.age_months_min,
            age_months_max: domain.age_months_max,
            published_at: domain.published_at.as_ref().map(format_timestamp),
        }
    }

    pub fn to_article_list_dto(result: ArticleListResult) -> ArticleListResponse {
        ArticleListResponse {
            articles: result.articles.into_iter().map(Self::to_article_dto).collect(),
            pagination: PaginationInfo {
                page: result.pagination.page,
                limit: result.pagination.limit,
                total: result.pagination.total,
                total_pages: result.pagination.total_pages,
            },
        }
    }

    pub fn to_article_query(query: ArticleQuery) -> ArticleListQuery {
        ArticleListQuery {
            filter: ArticleFilter {
                category: query.category.filter(|c| !c.trim().is_empty()),
                age_months: query.age_months,
            },
            page: query.page,
            limit: query.limit,
        }
    }
}
