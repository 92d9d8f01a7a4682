use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use verivox::entities::article::{Article, ArticleFilter, ArticleInsert, UpdateArticleRequest};
use verivox::entities::profile::{
    DirectoryFilter, PendingProfile, Profile, ProfileCard, ProfileInsert, UpdateProfileRequest,
};
use verivox::entities::user::{AccountInsert, User};
use verivox::errors::AppError;
use verivox::repositories::account::AccountRepository;
use verivox::repositories::article::ArticleRepository;
use verivox::repositories::profile::{ProfileRepository, TeardownRows};
use verivox::storage::{ObjectStorage, StorageError};

pub fn sample_profile(id: Uuid, approved: bool, is_admin: bool) -> Profile {
    Profile {
        id,
        full_name: "Ada Lovelace".to_string(),
        slug: "ada-lovelace".to_string(),
        graduation_year: 2020,
        title: "Engineer".to_string(),
        employer: "Analytical Engines".to_string(),
        location: "London".to_string(),
        about: "First programmer.".to_string(),
        photo_url: None,
        linkedin_url: None,
        website_url: None,
        resume_url: "https://cdn.example.com/resumes/ada.pdf".to_string(),
        approved,
        is_admin,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn sample_article(id: Uuid, author_id: Uuid) -> Article {
    Article {
        id,
        author_id,
        author_name: "Ada Lovelace".to_string(),
        title: "Notes on the Analytical Engine".to_string(),
        excerpt: "A short summary.".to_string(),
        content: "<p>Body text.</p>".to_string(),
        image_url: None,
        date: Utc::now().date_naive(),
        category: "history".to_string(),
        featured: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// In-memory stand-in for all three row stores plus the object store, so
/// multi-handler scenarios can run against shared state. Every handler holds
/// a clone; they all see the same rows.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    accounts: Mutex<HashMap<Uuid, User>>,
    profiles: Mutex<HashMap<Uuid, Profile>>,
    articles: Mutex<HashMap<Uuid, Article>>,
    related: Mutex<HashMap<Uuid, Vec<Uuid>>>,
    objects: Mutex<HashMap<String, Vec<String>>>,
}

impl FakeBackend {
    pub fn seed_account(&self, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.accounts.lock().unwrap().insert(
            id,
            User {
                id,
                email: email.to_string(),
                password_hash: "$argon2id$fake".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        );
        id
    }

    pub fn seed_admin(&self) -> Uuid {
        let id = self.seed_account("admin@example.com");
        let mut profile = sample_profile(id, true, true);
        profile.full_name = "Site Admin".to_string();
        profile.slug = format!("admin-{}", id);
        self.inner.profiles.lock().unwrap().insert(id, profile);
        id
    }

    pub fn stored_objects(&self, bucket: &str) -> Vec<String> {
        self.inner
            .objects
            .lock()
            .unwrap()
            .get(bucket)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl AccountRepository for FakeBackend {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_account(&self, account: &AccountInsert) -> Result<Uuid, AppError> {
        let mut accounts = self.inner.accounts.lock().unwrap();
        if accounts.values().any(|u| u.email == account.email) {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }
        let id = Uuid::new_v4();
        accounts.insert(
            id,
            User {
                id,
                email: account.email.clone(),
                password_hash: account.password_hash.clone(),
                created_at: account.created_at,
                updated_at: account.updated_at,
            },
        );
        Ok(id)
    }

    async fn get_account_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .inner
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn get_account_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        Ok(self.inner.accounts.lock().unwrap().get(id).cloned())
    }

    async fn delete_account(&self, id: &Uuid) -> Result<bool, AppError> {
        Ok(self.inner.accounts.lock().unwrap().remove(id).is_some())
    }
}

#[async_trait]
impl ProfileRepository for FakeBackend {
    async fn upsert_registration(&self, profile: &ProfileInsert) -> Result<(), AppError> {
        let mut profiles = self.inner.profiles.lock().unwrap();
        let now = Utc::now();

        match profiles.get_mut(&profile.id) {
            Some(existing) => {
                existing.full_name = profile.full_name.clone();
                existing.slug = profile.slug.clone();
                existing.graduation_year = profile.graduation_year;
                existing.title = profile.title.clone();
                existing.employer = profile.employer.clone();
                existing.location = profile.location.clone();
                existing.about = profile.about.clone();
                existing.photo_url = profile.photo_url.clone();
                existing.linkedin_url = profile.linkedin_url.clone();
                existing.website_url = profile.website_url.clone();
                existing.resume_url = profile.resume_url.clone();
                existing.approved = false;
                existing.updated_at = now;
            }
            None => {
                profiles.insert(
                    profile.id,
                    Profile {
                        id: profile.id,
                        full_name: profile.full_name.clone(),
                        slug: profile.slug.clone(),
                        graduation_year: profile.graduation_year,
                        title: profile.title.clone(),
                        employer: profile.employer.clone(),
                        location: profile.location.clone(),
                        about: profile.about.clone(),
                        photo_url: profile.photo_url.clone(),
                        linkedin_url: profile.linkedin_url.clone(),
                        website_url: profile.website_url.clone(),
                        resume_url: profile.resume_url.clone(),
                        approved: false,
                        is_admin: false,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }

        Ok(())
    }

    async fn get_profile(&self, id: &Uuid) -> Result<Option<Profile>, AppError> {
        Ok(self.inner.profiles.lock().unwrap().get(id).cloned())
    }

    async fn get_profile_by_slug(&self, slug: &str) -> Result<Option<Profile>, AppError> {
        Ok(self
            .inner
            .profiles
            .lock()
            .unwrap()
            .values()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn slug_taken(&self, slug: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        Ok(self
            .inner
            .profiles
            .lock()
            .unwrap()
            .values()
            .any(|p| p.slug == slug && Some(p.id) != exclude_id))
    }

    async fn approve_profile(&self, id: &Uuid) -> Result<u64, AppError> {
        match self.inner.profiles.lock().unwrap().get_mut(id) {
            Some(profile) => {
                profile.approved = true;
                profile.updated_at = Utc::now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_profile(
        &self,
        id: &Uuid,
        update: &UpdateProfileRequest,
    ) -> Result<Profile, AppError> {
        let mut profiles = self.inner.profiles.lock().unwrap();
        let profile = profiles
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

        if let Some(v) = &update.full_name {
            profile.full_name = v.clone();
        }
        if let Some(v) = update.graduation_year {
            profile.graduation_year = v;
        }
        if let Some(v) = &update.title {
            profile.title = v.clone();
        }
        if let Some(v) = &update.employer {
            profile.employer = v.clone();
        }
        if let Some(v) = &update.location {
            profile.location = v.clone();
        }
        if let Some(v) = &update.about {
            profile.about = v.clone();
        }
        if let Some(v) = &update.photo_url {
            profile.photo_url = Some(v.clone());
        }
        if let Some(v) = &update.linkedin_url {
            profile.linkedin_url = Some(v.clone());
        }
        if let Some(v) = &update.website_url {
            profile.website_url = Some(v.clone());
        }
        if let Some(v) = &update.resume_url {
            profile.resume_url = v.clone();
        }
        profile.updated_at = Utc::now();

        Ok(profile.clone())
    }

    async fn list_approved(
        &self,
        filter: &DirectoryFilter,
    ) -> Result<(Vec<ProfileCard>, i64), AppError> {
        let profiles = self.inner.profiles.lock().unwrap();

        let mut matched: Vec<&Profile> = profiles
            .values()
            .filter(|p| {
                p.approved
                    && filter.cohort.is_none_or(|c| p.graduation_year == c)
                    && filter.search.as_ref().is_none_or(|s| {
                        let needle = s.to_lowercase();
                        p.full_name.to_lowercase().contains(&needle)
                            || p.title.to_lowercase().contains(&needle)
                            || p.about.to_lowercase().contains(&needle)
                    })
            })
            .collect();
        matched.sort_by(|a, b| a.full_name.cmp(&b.full_name));

        let total = matched.len() as i64;
        let offset = (filter.page.max(1) - 1) as usize * filter.per_page as usize;
        let cards = matched
            .into_iter()
            .skip(offset)
            .take(filter.per_page as usize)
            .map(|p| ProfileCard {
                id: p.id,
                slug: p.slug.clone(),
                full_name: p.full_name.clone(),
                photo_url: p.photo_url.clone(),
                graduation_year: p.graduation_year,
                title: p.title.clone(),
                employer: p.employer.clone(),
                resume_url: p.resume_url.clone(),
            })
            .collect();

        Ok((cards, total))
    }

    async fn list_cohorts(&self) -> Result<Vec<i32>, AppError> {
        let mut years: Vec<i32> = self
            .inner
            .profiles
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.approved)
            .map(|p| p.graduation_year)
            .collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        Ok(years)
    }

    async fn list_pending(&self) -> Result<Vec<PendingProfile>, AppError> {
        let mut pending: Vec<PendingProfile> = self
            .inner
            .profiles
            .lock()
            .unwrap()
            .values()
            .filter(|p| !p.approved)
            .map(|p| PendingProfile {
                id: p.id,
                slug: p.slug.clone(),
                full_name: p.full_name.clone(),
                graduation_year: p.graduation_year,
                created_at: p.created_at,
            })
            .collect();
        pending.sort_by_key(|p| p.created_at);
        Ok(pending)
    }

    async fn delete_profile_with_articles(&self, id: &Uuid) -> Result<TeardownRows, AppError> {
        let mut articles = self.inner.articles.lock().unwrap();
        let doomed: Vec<Uuid> = articles
            .values()
            .filter(|a| a.author_id == *id)
            .map(|a| a.id)
            .collect();
        for article_id in &doomed {
            articles.remove(article_id);
            self.inner.related.lock().unwrap().remove(article_id);
        }

        let profile_deleted = self.inner.profiles.lock().unwrap().remove(id).is_some();

        Ok(TeardownRows {
            articles_deleted: doomed.len() as u64,
            profile_deleted,
        })
    }
}

#[async_trait]
impl ArticleRepository for FakeBackend {
    async fn create_article(
        &self,
        article: &ArticleInsert,
        related: &[Uuid],
    ) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.inner.articles.lock().unwrap().insert(
            id,
            Article {
                id,
                author_id: article.author_id,
                author_name: article.author_name.clone(),
                title: article.title.clone(),
                excerpt: article.excerpt.clone(),
                content: article.content.clone(),
                image_url: article.image_url.clone(),
                date: article.date,
                category: article.category.clone(),
                featured: article.featured,
                created_at: now,
                updated_at: now,
            },
        );
        self.inner
            .related
            .lock()
            .unwrap()
            .insert(id, related.to_vec());
        Ok(id)
    }

    async fn get_article(&self, id: &Uuid) -> Result<Option<Article>, AppError> {
        Ok(self.inner.articles.lock().unwrap().get(id).cloned())
    }

    async fn update_article(
        &self,
        id: &Uuid,
        update: &UpdateArticleRequest,
    ) -> Result<Article, AppError> {
        let mut articles = self.inner.articles.lock().unwrap();
        let article = articles
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound("Article not found".to_string()))?;

        if let Some(v) = &update.title {
            article.title = v.clone();
        }
        if let Some(v) = &update.excerpt {
            article.excerpt = v.clone();
        }
        if let Some(v) = &update.content {
            article.content = v.clone();
        }
        if let Some(v) = &update.image_url {
            article.image_url = Some(v.clone());
        }
        if let Some(v) = update.date {
            article.date = v;
        }
        if let Some(v) = &update.category {
            article.category = v.clone();
        }
        if let Some(v) = update.featured {
            article.featured = v;
        }
        if let Some(related) = &update.related_ids {
            self.inner.related.lock().unwrap().insert(*id, related.clone());
        }
        article.updated_at = Utc::now();

        Ok(article.clone())
    }

    async fn delete_article(&self, id: &Uuid) -> Result<bool, AppError> {
        self.inner.related.lock().unwrap().remove(id);
        Ok(self.inner.articles.lock().unwrap().remove(id).is_some())
    }

    async fn list_articles(&self, filter: &ArticleFilter) -> Result<(Vec<Article>, i64), AppError> {
        let articles = self.inner.articles.lock().unwrap();

        let mut matched: Vec<&Article> = articles
            .values()
            .filter(|a| {
                filter.category.as_ref().is_none_or(|c| a.category == *c)
                    && filter.featured.is_none_or(|f| a.featured == f)
            })
            .collect();
        matched.sort_by(|a, b| b.date.cmp(&a.date));

        let total = matched.len() as i64;
        let offset = (filter.page.max(1) - 1) as usize * filter.per_page as usize;
        let page = matched
            .into_iter()
            .skip(offset)
            .take(filter.per_page as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn list_by_author(&self, author_id: &Uuid) -> Result<Vec<Article>, AppError> {
        let mut mine: Vec<Article> = self
            .inner
            .articles
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.author_id == *author_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(mine)
    }

    async fn related_articles(&self, id: &Uuid) -> Result<Vec<Article>, AppError> {
        let related = self
            .inner
            .related
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .unwrap_or_default();
        let articles = self.inner.articles.lock().unwrap();
        Ok(related
            .iter()
            .filter_map(|rid| articles.get(rid).cloned())
            .collect())
    }
}

#[async_trait]
impl ObjectStorage for FakeBackend {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        self.inner
            .objects
            .lock()
            .unwrap()
            .entry(bucket.to_string())
            .or_default()
            .push(path.to_string());
        Ok(())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .inner
            .objects
            .lock()
            .unwrap()
            .get(bucket)
            .map(|keys| {
                keys.iter()
                    .filter(|k| k.starts_with(prefix))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), StorageError> {
        if let Some(keys) = self.inner.objects.lock().unwrap().get_mut(bucket) {
            keys.retain(|k| !paths.contains(k));
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("https://storage.test/{}/{}", bucket, path)
    }
}
