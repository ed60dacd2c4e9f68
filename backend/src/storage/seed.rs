//! Default milestone, tip and article catalog.
//!
//! Each table is seeded only while it is empty, so edits made to a live
//! catalog are never overwritten on restart.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use shared::MilestoneCategory;
use tracing::info;

use crate::domain::models::content::{Article, Tip};
use crate::domain::models::milestone::MilestoneTemplate;
use crate::storage::traits::{ContentStorage, TemplateStorage};

use MilestoneCategory::*;

/// `(category, title, age_months_min, age_months_max)` in curriculum order
const DEFAULT_TEMPLATES: &[(MilestoneCategory, &str, u32, u32)] = &[
    (Physical, "Lifts head during tummy time", 0, 3),
    (Physical, "Opens and closes hands", 1, 3),
    (Social, "First social smile", 1, 3),
    (Cognitive, "Follows objects with eyes", 1, 3),
    (Language, "Coos and gurgles", 2, 4),
    (Physical, "Rolls from tummy to back", 3, 6),
    (Physical, "Holds head steady", 3, 5),
    (Physical, "Brings hands to mouth", 3, 5),
    (Social, "Laughs out loud", 3, 5),
    (Cognitive, "Reaches for toys", 3, 5),
    (Physical, "Sits without support", 5, 8),
    (Physical, "Rolls both ways", 5, 7),
    (Language, "Babbles consonants", 5, 8),
    (Social, "Responds to own name", 5, 8),
    (Cognitive, "Transfers objects between hands", 6, 9),
    (Physical, "Crawls on hands and knees", 7, 10),
    (Physical, "Pulls to standing", 8, 11),
    (Physical, "First steps", 9, 14),
    (Language, "Says \"mama\" or \"dada\"", 8, 12),
    (Cognitive, "Uses pincer grasp", 8, 11),
    (Social, "Waves bye-bye", 9, 12),
    (Emotional, "Shows stranger anxiety", 7, 12),
    (Physical, "Walks independently", 11, 15),
    (Language, "Says several words", 12, 18),
    (Cognitive, "Points to show interest", 12, 16),
    (SelfCare, "Drinks from cup", 12, 18),
    (Social, "Plays simple pretend games", 14, 18),
    (Physical, "Runs", 16, 22),
    (Physical, "Kicks a ball", 18, 24),
    (Language, "Uses two-word phrases", 18, 24),
    (Cognitive, "Follows simple instructions", 18, 24),
    (SelfCare, "Uses spoon", 15, 21),
    (Emotional, "Shows defiant behavior", 18, 24),
];

/// `(title, content, category, icon, age_months_min, age_months_max)`
const DEFAULT_TIPS: &[(&str, &str, &str, &str, u32, u32)] = &[
    (
        "Tummy time matters",
        "A few minutes of supervised tummy time several times a day builds the neck and shoulder strength needed for rolling and crawling.",
        "development",
        "activity",
        0,
        4,
    ),
    (
        "Talk through your day",
        "Narrating what you are doing exposes your baby to the rhythm of language long before the first word.",
        "language",
        "message-circle",
        0,
        12,
    ),
    (
        "Watch for sleepy cues",
        "Eye rubbing, yawning and staring into space are signs it is time to wind down. Starting the nap routine early makes settling easier.",
        "sleep",
        "moon",
        0,
        18,
    ),
    (
        "Offer a variety of textures",
        "Once solids are started, mashed, soft lumpy and finger foods all help your baby learn to chew and self-feed.",
        "feeding",
        "coffee",
        6,
        18,
    ),
    (
        "Make room to move",
        "A safe floor space with toys slightly out of reach encourages crawling, cruising and those first steps.",
        "development",
        "move",
        6,
        24,
    ),
    (
        "Name the feelings",
        "Putting words to big emotions (\"you are frustrated the tower fell\") helps toddlers learn to recognise and manage them.",
        "emotional",
        "heart",
        12,
        60,
    ),
    (
        "Read together every day",
        "Short daily reading sessions grow vocabulary and attention span. Let your child turn the pages and point at pictures.",
        "language",
        "book-open",
        6,
        60,
    ),
];

struct SeedArticle {
    title: &'static str,
    slug: &'static str,
    excerpt: &'static str,
    content: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
    read_time_min: u32,
    age_window: Option<(u32, u32)>,
    published_on: (i32, u32, u32),
}

const DEFAULT_ARTICLES: &[SeedArticle] = &[
    SeedArticle {
        title: "Building a Newborn Sleep Routine",
        slug: "newborn-sleep-routine",
        excerpt: "Simple steps that help newborns and parents get more rest.",
        content: "Newborns sleep in short stretches around the clock. A consistent wind-down routine, a dark room for night sleep and daylight exposure during the day help your baby's internal clock settle over the first months.",
        category: "sleep",
        tags: &["sleep", "newborn", "routine"],
        read_time_min: 5,
        age_window: Some((0, 3)),
        published_on: (2024, 1, 8),
    },
    SeedArticle {
        title: "Starting Solid Foods",
        slug: "starting-solid-foods",
        excerpt: "Signs of readiness and first foods to try.",
        content: "Most babies are ready for solids around six months, when they can sit with support and show interest in food. Start with single ingredients, offer iron-rich foods early and introduce one new food at a time.",
        category: "feeding",
        tags: &["feeding", "solids"],
        read_time_min: 6,
        age_window: Some((4, 9)),
        published_on: (2024, 1, 15),
    },
    SeedArticle {
        title: "Understanding Developmental Milestones",
        slug: "understanding-developmental-milestones",
        excerpt: "Milestones describe typical ranges, not deadlines.",
        content: "Every child develops at their own pace. Milestone age ranges describe when most children reach a skill, and a few weeks either way is normal. Talk to your pediatrician if you notice a loss of skills or have ongoing concerns.",
        category: "development",
        tags: &["milestones", "development"],
        read_time_min: 4,
        age_window: None,
        published_on: (2024, 1, 22),
    },
];

/// Build the default template catalog. Templates sharing an
/// `age_months_min` keep their listed order.
pub fn default_templates() -> Vec<MilestoneTemplate> {
    DEFAULT_TEMPLATES
        .iter()
        .enumerate()
        .map(|(index, &(category, title, min, max))| MilestoneTemplate {
            id: format!("tpl-{:03}", index + 1),
            category,
            title: title.to_string(),
            description: format!("Usually reached between {} and {} months.", min, max),
            age_months_min: min,
            age_months_max: max,
            icon_name: Some(category.as_str().to_lowercase()),
            order: index as i64,
            is_active: true,
        })
        .collect()
}

pub fn default_tips() -> Vec<Tip> {
    DEFAULT_TIPS
        .iter()
        .enumerate()
        .map(|(index, &(title, content, category, icon, min, max))| Tip {
            id: format!("tip-{:03}", index + 1),
            title: title.to_string(),
            content: content.to_string(),
            category: category.to_string(),
            icon_name: Some(icon.to_string()),
            age_months_min: min,
            age_months_max: max,
            is_active: true,
        })
        .collect()
}

pub fn default_articles() -> Vec<Article> {
    DEFAULT_ARTICLES
        .iter()
        .enumerate()
        .map(|(index, seed)| {
            let (year, month, day) = seed.published_on;
            Article {
                id: format!("article-{:03}", index + 1),
                title: seed.title.to_string(),
                slug: seed.slug.to_string(),
                excerpt: seed.excerpt.to_string(),
                content: seed.content.to_string(),
                image_url: None,
                category: seed.category.to_string(),
                tags: seed.tags.iter().map(|tag| tag.to_string()).collect(),
                read_time_min: seed.read_time_min,
                age_months_min: seed.age_window.map(|w| w.0),
                age_months_max: seed.age_window.map(|w| w.1),
                is_published: true,
                published_at: Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).single(),
            }
        })
        .collect()
}

/// Seed every empty catalog table
pub async fn seed_catalog(templates: &dyn TemplateStorage, content: &dyn ContentStorage) -> Result<()> {
    if templates.count_templates().await? == 0 {
        let catalog = default_templates();
        for template in &catalog {
            templates.store_template(template).await?;
        }
        info!("Seeded {} milestone templates", catalog.len());
    }

    if content.count_tips().await? == 0 {
        let tips = default_tips();
        for tip in &tips {
            content.store_tip(tip).await?;
        }
        info!("Seeded {} tips", tips.len());
    }

    if content.count_articles(&Default::default()).await? == 0 {
        let articles = default_articles();
        for article in &articles {
            content.store_article(article).await?;
        }
        info!("Seeded {} articles", articles.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::connection::DbConnection;
    use crate::storage::sqlite::repositories::{ContentRepository, MilestoneRepository};

    #[test]
    fn test_default_templates_are_consistent() {
        let templates = default_templates();
        assert_eq!(templates.len(), 33);
        assert!(templates.iter().all(|t| t.age_months_min <= t.age_months_max));

        let mut ids: Vec<&str> = templates.iter().map(|t| t.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids.len(), templates.len());
    }

    #[test]
    fn test_default_articles_have_publication_dates() {
        assert!(default_articles().iter().all(|a| a.published_at.is_some()));
    }

    #[tokio::test]
    async fn test_seed_catalog_runs_once() {
        let db = DbConnection::init_in_memory().await.unwrap();
        let templates = MilestoneRepository::new(db.clone());
        let content = ContentRepository::new(db);

        seed_catalog(&templates, &content).await.unwrap();
        seed_catalog(&templates, &content).await.unwrap();

        assert_eq!(templates.count_templates().await.unwrap(), 33);
        assert_eq!(content.count_tips().await.unwrap(), default_tips().len() as u32);
        assert_eq!(
            content.count_articles(&Default::default()).await.unwrap(),
            default_articles().len() as u32
        );
    }
}
