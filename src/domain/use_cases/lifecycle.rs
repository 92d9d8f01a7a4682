use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::entities::profile::{PendingProfile, Profile};
use crate::errors::AppError;
use crate::infrastructure::storage::{ObjectStorage, StorageBuckets};
use crate::repositories::profile::ProfileRepository;
use crate::interfaces::repositories::account::AccountRepository;

/// Whether a teardown step may fail without stopping the sequence. An
/// orphaned storage object is recoverable; an orphaned identity or profile
/// row is not, so row and identity deletion stay fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPolicy {
    BestEffort,
    Critical,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "detail")]
pub enum StepOutcome {
    Completed,
    /// Error swallowed under a best-effort policy.
    Skipped(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct TeardownStep {
    pub name: &'static str,
    pub policy: StepPolicy,
    pub outcome: StepOutcome,
}

#[derive(Debug, Default, Serialize)]
pub struct TeardownReport {
    pub steps: Vec<TeardownStep>,
    pub articles_deleted: u64,
}

impl TeardownReport {
    fn record(&mut self, name: &'static str, policy: StepPolicy, outcome: StepOutcome) {
        self.steps.push(TeardownStep { name, policy, outcome });
    }
}

/// Approval and teardown of member accounts. Admin status is always
/// re-derived from a fresh profile row, never from token claims.
pub struct LifecycleHandler<P, U>
where
    P: ProfileRepository,
    U: AccountRepository,
{
    pub profile_repo: P,
    pub account_repo: U,
    pub storage: Arc<dyn ObjectStorage>,
    buckets: StorageBuckets,
}

impl<P, U> LifecycleHandler<P, U>
where
    P: ProfileRepository,
    U: AccountRepository,
{
    pub fn new(
        profile_repo: P,
        account_repo: U,
        storage: Arc<dyn ObjectStorage>,
        buckets: StorageBuckets,
    ) -> Self {
        LifecycleHandler {
            profile_repo,
            account_repo,
            storage,
            buckets,
        }
    }

    async fn require_admin(&self, caller_id: &Uuid) -> Result<Profile, AppError> {
        let caller = self
            .profile_repo
            .get_profile(caller_id)
            .await?
            .ok_or_else(|| AppError::Forbidden("Admin access required".to_string()))?;

        if !caller.is_admin {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(caller)
    }

    /// Marks a profile approved. Idempotent: re-approving an approved
    /// profile is a success no-op.
    pub async fn approve(&self, caller_id: &Uuid, target_id: &Uuid) -> Result<(), AppError> {
        self.require_admin(caller_id).await?;

        let affected = self.profile_repo.approve_profile(target_id).await?;
        if affected == 0 {
            return Err(AppError::NotFound("Profile not found".to_string()));
        }

        tracing::info!(profile_id = %target_id, "Profile approved");
        Ok(())
    }

    /// Admin rejection: full teardown of the target member.
    pub async fn reject(
        &self,
        caller_id: &Uuid,
        target_id: &Uuid,
    ) -> Result<TeardownReport, AppError> {
        self.require_admin(caller_id).await?;
        self.teardown(target_id).await
    }

    /// Self-service deletion: the target is the caller's own identity.
    pub async fn delete_account(&self, caller_id: &Uuid) -> Result<TeardownReport, AppError> {
        self.teardown(caller_id).await
    }

    pub async fn pending_profiles(&self, caller_id: &Uuid) -> Result<Vec<PendingProfile>, AppError> {
        self.require_admin(caller_id).await?;
        self.profile_repo.list_pending().await
    }

    /// Ordered teardown of everything belonging to one identity:
    ///
    /// 1. storage cleanup per bucket (best-effort),
    /// 2. article + profile rows in one transaction (critical),
    /// 3. identity deletion last (critical; "already gone" tolerated).
    async fn teardown(&self, target_id: &Uuid) -> Result<TeardownReport, AppError> {
        let mut report = TeardownReport::default();
        let prefix = format!("{}/", target_id);

        for (name, bucket) in [
            ("resume_storage_cleanup", &self.buckets.resumes),
            ("photo_storage_cleanup", &self.buckets.photos),
        ] {
            let outcome = self.cleanup_bucket(bucket, &prefix).await;
            report.record(name, StepPolicy::BestEffort, outcome);
        }

        let rows = self.profile_repo.delete_profile_with_articles(target_id).await?;
        report.articles_deleted = rows.articles_deleted;
        report.record("row_deletion", StepPolicy::Critical, StepOutcome::Completed);

        let identity_deleted = self
            .account_repo
            .delete_account(target_id)
            .await
            .map_err(|e| AppError::InternalError(format!("Identity deletion failed: {}", e)))?;
        report.record("identity_deletion", StepPolicy::Critical, StepOutcome::Completed);

        if !rows.profile_deleted && !identity_deleted {
            return Err(AppError::NotFound("Account already removed".to_string()));
        }

        tracing::info!(
            user_id = %target_id,
            articles_deleted = rows.articles_deleted,
            identity_deleted,
            "Account teardown completed"
        );

        Ok(report)
    }

    async fn cleanup_bucket(&self, bucket: &str, prefix: &str) -> StepOutcome {
        let paths = match self.storage.list(bucket, prefix).await {
            Ok(paths) => paths,
            Err(e) => {
                tracing::warn!(bucket, prefix, "Storage listing failed during teardown: {}", e);
                return StepOutcome::Skipped(e.to_string());
            }
        };

        if paths.is_empty() {
            return StepOutcome::Completed;
        }

        match self.storage.remove(bucket, &paths).await {
            Ok(()) => StepOutcome::Completed,
            Err(e) => {
                tracing::warn!(bucket, prefix, "Storage removal failed during teardown: {}", e);
                StepOutcome::Skipped(e.to_string())
            }
        }
    }
}
