#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime, macros::datetime};
use uuid::Uuid;

use quire::application::blog::BlogService;
use quire::application::clock::Clock;
use quire::application::raffle::RaffleReportService;
use quire::application::repos::{
    PostQueryFilter, PostsRepo, RaffleReportRepo, RepoError, VisiblePostsQuery, at_most_one,
};
use quire::cache::{CacheConfig, QueryCache};
use quire::domain::entities::{CategoryRef, PostRecord, RaffleParticipationRecord};
use quire::domain::raffle::MediumIds;

pub const NOW: OffsetDateTime = datetime!(2024-03-15 12:00 UTC);

/// Clock that only moves when a test tells it to.
pub struct FixedClock {
    now: Mutex<OffsetDateTime>,
}

impl FixedClock {
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().expect("clock lock") += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().expect("clock lock")
    }
}

/// In-memory posts store applying the same filters as the Postgres adapter.
#[derive(Default)]
pub struct StaticBlogRepo {
    posts: Vec<PostRecord>,
    find_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl StaticBlogRepo {
    pub fn new(posts: Vec<PostRecord>) -> Self {
        Self {
            posts,
            ..Default::default()
        }
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn matches(post: &PostRecord, filter: &PostQueryFilter) -> bool {
        if filter.exclude_slug.as_deref() == Some(post.slug.as_str()) {
            return false;
        }
        if let Some(category) = filter.category.as_ref() {
            if post.category.as_ref().map(|c| &c.slug) != Some(category) {
                return false;
            }
        }
        if let Some(tag) = filter.tag.as_ref() {
            if !post.tags.contains(tag) {
                return false;
            }
        }
        if let Some(range) = filter.published_within.as_ref() {
            if !range.contains(post.published_at) {
                return false;
            }
        }
        if let Some(search) = filter.search.as_ref() {
            let needle = search.to_lowercase();
            let hit = [&post.title, &post.summary, &post.body]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl PostsRepo for StaticBlogRepo {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        let rows: Vec<PostRecord> = self
            .posts
            .iter()
            .filter(|post| post.slug == slug)
            .cloned()
            .collect();
        at_most_one(rows, "post", slug)
    }

    async fn list_visible(&self, query: &VisiblePostsQuery) -> Result<Vec<PostRecord>, RepoError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let mut rows: Vec<PostRecord> = self
            .posts
            .iter()
            .filter(|post| post.is_visible_at(query.now))
            .filter(|post| Self::matches(post, &query.filter))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let rows = rows.into_iter().skip(query.offset as usize);
        Ok(match query.limit {
            Some(limit) => rows.take(limit as usize).collect(),
            None => rows.collect(),
        })
    }

    async fn next_publication_after(
        &self,
        now: OffsetDateTime,
    ) -> Result<Option<OffsetDateTime>, RepoError> {
        Ok(self
            .posts
            .iter()
            .filter(|post| post.reviewed && post.published_at > now)
            .map(|post| post.published_at)
            .min())
    }
}

pub struct StaticRaffleRepo {
    records: Vec<(i64, RaffleParticipationRecord)>,
    calls: AtomicUsize,
}

impl StaticRaffleRepo {
    /// Records paired with the medium id they belong to.
    pub fn new(records: Vec<(i64, RaffleParticipationRecord)>) -> Self {
        Self {
            records,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RaffleReportRepo for StaticRaffleRepo {
    async fn participation(
        &self,
        media: &MediumIds,
    ) -> Result<Vec<RaffleParticipationRecord>, RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut rows: Vec<RaffleParticipationRecord> = self
            .records
            .iter()
            .filter(|(medium_id, _)| media.contains(*medium_id))
            .map(|(_, record)| record.clone())
            .collect();
        rows.sort_by_key(|record| record.user_id);
        Ok(rows)
    }
}

pub fn post(slug: &str, published_at: OffsetDateTime) -> PostRecord {
    PostRecord {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: format!("Title of {slug}"),
        summary: String::new(),
        body: String::new(),
        published_at,
        reviewed: true,
        category: None,
        tags: Vec::new(),
    }
}

pub fn with_category(mut post: PostRecord, slug: &str) -> PostRecord {
    post.category = Some(CategoryRef {
        slug: slug.to_string(),
        name: slug.to_uppercase(),
    });
    post
}

pub fn with_tags(mut post: PostRecord, tags: &[&str]) -> PostRecord {
    post.tags = tags.iter().map(|tag| tag.to_string()).collect();
    post
}

pub fn unreviewed(mut post: PostRecord) -> PostRecord {
    post.reviewed = false;
    post
}

/// Reviewed posts published one per day, the newest a day before `NOW`.
pub fn daily_posts(count: i64) -> Vec<PostRecord> {
    (1..=count)
        .map(|day| post(&format!("day-{day:02}"), NOW - Duration::days(day)))
        .collect()
}

pub struct BlogHarness {
    pub service: BlogService,
    pub repo: Arc<StaticBlogRepo>,
    pub clock: Arc<FixedClock>,
}

pub fn blog(posts: Vec<PostRecord>) -> BlogHarness {
    blog_with_config(posts, CacheConfig::default())
}

pub fn blog_with_config(posts: Vec<PostRecord>, config: CacheConfig) -> BlogHarness {
    let repo = Arc::new(StaticBlogRepo::new(posts));
    let clock = Arc::new(FixedClock::new(NOW));
    let cache = Arc::new(QueryCache::new(&config));
    let service = BlogService::new(repo.clone(), clock.clone(), cache, config.policies());
    BlogHarness {
        service,
        repo,
        clock,
    }
}

pub fn raffle(
    records: Vec<(i64, RaffleParticipationRecord)>,
) -> (RaffleReportService, Arc<StaticRaffleRepo>) {
    let repo = Arc::new(StaticRaffleRepo::new(records));
    (RaffleReportService::new(repo.clone()), repo)
}

pub fn slugs(posts: &[PostRecord]) -> Vec<&str> {
    posts.iter().map(|post| post.slug.as_str()).collect()
}
