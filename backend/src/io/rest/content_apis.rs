//! # REST API for Tips and Articles
//!
//! Tips are personalised by age and need a signed-in user; articles are
//! public.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::io::rest::auth::AuthUser;
use crate::io::rest::error::ApiResult;
use crate::io::rest::mappers::ContentMapper;
use crate::AppState;
use shared::{Article, ArticleListResponse, ArticleQuery, Tip, TipQuery};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipOfTheDayQuery {
    pub age_months: u32,
}

/// GET /content/tip-of-the-day?ageMonths=
pub async fn tip_of_the_day(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<TipOfTheDayQuery>,
) -> ApiResult<Json<Tip>> {
    info!("GET /content/tip-of-the-day ageMonths={}", query.age_months);

    let tip = state.content_service.tip_of_the_day(query.age_months).await?;
    Ok(Json(ContentMapper::to_tip_dto(tip)))
}

/// GET /content/tips?ageMonths=&limit=
pub async fn list_tips(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<TipQuery>,
) -> ApiResult<Json<Vec<Tip>>> {
    info!("GET /content/tips ageMonths={}", query.age_months);

    let tips = state
        .content_service
        .tips_for_age(query.age_months, query.limit)
        .await?;
    Ok(Json(tips.into_iter().map(ContentMapper::to_tip_dto).collect()))
}

/// GET /content/articles?category=&ageMonths=&page=&limit=
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticleQuery>,
) -> ApiResult<Json<ArticleListResponse>> {
    info!("GET /content/articles {:?}", query);

    let result = state
        .content_service
        .list_articles(ContentMapper::to_article_query(query))
        .await?;
    Ok(Json(ContentMapper::to_article_list_dto(result)))
}

/// GET /content/articles/:slug
pub async fn get_article(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Json<Article>> {
    info!("GET /content/articles/{}", slug);

    let article = state.content_service.article_by_slug(&slug).await?;
    Ok(Json(ContentMapper::to_article_dto(article)))
}
