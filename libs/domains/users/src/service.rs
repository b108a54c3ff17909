use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, NewUser, UpdateOutcome, UpdateUser, User};
use crate::pagination::{Page, PageRequest, Window, normalize};
use crate::repository::UserRepository;

/// Source of creation timestamps
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Service layer for User business logic
///
/// The only caller of the repository. Every contract violation is reported
/// before the store is touched; "not found" is an outcome, never an error.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_clock(repository, SystemClock)
    }

    pub fn with_clock(repository: R, clock: impl Clock + 'static) -> Self {
        Self {
            repository: Arc::new(repository),
            clock: Arc::new(clock),
        }
    }

    /// Create a user, stamping `created` with the service clock
    #[instrument(skip_all)]
    pub async fn create(&self, input: CreateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::InvalidInput(e.to_string()))?;

        let user = NewUser {
            email: input.email,
            given_name: input.given_name,
            family_name: input.family_name,
            created: self.clock.now_millis(),
        };

        self.repository.save(user).await
    }

    /// Fetch one window of users together with the total count
    #[instrument(skip(self))]
    pub async fn find_page(&self, from: i64, size: i64) -> UserResult<Page<User>> {
        let window = Window::new(from, size)?;
        let (result, total_count) = self
            .repository
            .find_page(window.offset(), window.limit())
            .await?;

        Ok(Page::new(result, total_count, window))
    }

    /// Apply the paging rules to raw query parameters, then fetch the page
    pub async fn list(&self, request: PageRequest) -> UserResult<Page<User>> {
        let window = normalize(request)?;
        self.find_page(window.from, window.size).await
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: &str) -> UserResult<Option<User>> {
        let id = parse_id(id)?;
        self.repository.find_by_id(id).await
    }

    /// Merge `patch` into the user, then return the stored result.
    ///
    /// The store gives no affected-row count, so a missing user shows up as an
    /// empty re-fetch.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: UpdateUser) -> UserResult<UpdateOutcome> {
        let id = parse_id(id)?;

        if patch.is_empty() {
            return Err(UserError::InvalidInput(
                "update requires at least one field".to_string(),
            ));
        }
        patch
            .validate()
            .map_err(|e| UserError::InvalidInput(e.to_string()))?;

        self.repository.update(id, &patch).await?;

        Ok(match self.repository.find_by_id(id).await? {
            Some(user) => UpdateOutcome::Updated(user),
            None => UpdateOutcome::NotFound,
        })
    }

    /// Delete the user if it exists. Returns whether anything was deleted.
    ///
    /// A concurrent delete between the check and the delete is not detected.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> UserResult<bool> {
        let id = parse_id(id)?;

        if !self.repository.exists(id).await? {
            return Ok(false);
        }

        self.repository.delete(id).await?;
        Ok(true)
    }
}

fn parse_id(id: &str) -> UserResult<Uuid> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(UserError::InvalidId(id.to_string()));
    }
    Uuid::parse_str(trimmed).map_err(|_| UserError::InvalidId(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use database::DatabaseError;
    use mockall::{Sequence, predicate::eq};

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now_millis(&self) -> i64 {
            self.0
        }
    }

    fn user(id: Uuid, family_name: &str) -> User {
        User {
            id,
            email: "a@b.com".to_string(),
            given_name: "Mike".to_string(),
            family_name: family_name.to_string(),
            created: 1_000,
        }
    }

    fn store_error() -> UserError {
        UserError::Store(DatabaseError::ConnectionFailed("connection reset".to_string()))
    }

    #[tokio::test]
    async fn test_create_stamps_clock_and_returns_store_id() {
        let mut mock_repo = MockUserRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_save()
            .withf(|u| u.created == 1_234 && u.given_name == "Mike")
            .times(1)
            .returning(move |u| Ok(u.into_user(id)));

        let service = UserService::with_clock(mock_repo, FixedClock(1_234));
        let created = service
            .create(CreateUser::new("a@b.com", "Mike", "Millers"))
            .await
            .unwrap();

        assert_eq!(created.id, id);
        assert_eq!(created.created, 1_234);
        assert_eq!(created.email, "a@b.com");
        assert_eq!(created.family_name, "Millers");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_before_store() {
        // No expectations: any store call panics
        let service = UserService::new(MockUserRepository::new());

        let mut input = CreateUser::new("a@b.com", "Mike", "Millers");
        input.created = Some(5);

        let err = service.create(input).await.unwrap_err();
        assert!(matches!(err, UserError::InvalidInput(_)));

        let err = service
            .create(CreateUser::new("nope", "Mike", "Millers"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_find_page_echoes_window() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_page()
            .with(eq(0), eq(10))
            .returning(|_, _| {
                let users = (0..3).map(|_| user(Uuid::now_v7(), "Millers")).collect();
                Ok((users, 3))
            });

        let service = UserService::new(mock_repo);
        let page = service.find_page(0, 10).await.unwrap();

        assert_eq!(page.result.len(), 3);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.from, 0);
        assert_eq!(page.size, 10);
    }

    #[tokio::test]
    async fn test_find_page_rejects_bad_window_before_store() {
        let service = UserService::new(MockUserRepository::new());

        assert!(matches!(
            service.find_page(-1, 10).await,
            Err(UserError::InvalidPagingParameter(_))
        ));
        assert!(matches!(
            service.find_page(0, 0).await,
            Err(UserError::InvalidPagingParameter(_))
        ));
        assert!(matches!(
            service.find_page(0, 101).await,
            Err(UserError::PageSizeTooLarge)
        ));
    }

    #[tokio::test]
    async fn test_list_defaults_and_rejects_half_window() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_page()
            .with(eq(0), eq(10))
            .times(1)
            .returning(|_, _| Ok((vec![], 0)));

        let service = UserService::new(mock_repo);

        let page = service.list(PageRequest::default()).await.unwrap();
        assert_eq!((page.from, page.size, page.total_count), (0, 10, 0));

        let half = PageRequest {
            from: Some(5),
            size: None,
        };
        assert!(matches!(
            service.list(half).await,
            Err(UserError::MissingPagingParameter)
        ));
    }

    #[tokio::test]
    async fn test_find_one_rejects_empty_and_malformed_ids() {
        let service = UserService::new(MockUserRepository::new());

        for id in ["", "   ", "not-a-uuid"] {
            assert!(matches!(
                service.find_one(id).await,
                Err(UserError::InvalidId(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_find_one_missing_is_none() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_find_by_id().returning(|_| Ok(None));

        let service = UserService::new(mock_repo);
        let found = service.find_one(&Uuid::now_v7().to_string()).await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_update_writes_then_refetches() {
        let mut mock_repo = MockUserRepository::new();
        let mut seq = Sequence::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_update()
            .withf(move |uid, patch| {
                *uid == id && patch.family_name.as_deref() == Some("X") && patch.email.is_none()
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        mock_repo
            .expect_find_by_id()
            .with(eq(id))
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(user(id, "X"))));

        let service = UserService::new(mock_repo);
        let patch = UpdateUser {
            family_name: Some("X".to_string()),
            ..Default::default()
        };

        let outcome = service.update(&id.to_string(), patch).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated(user(id, "X")));
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found_outcome() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_update().returning(|_, _| Ok(()));
        mock_repo.expect_find_by_id().returning(|_| Ok(None));

        let service = UserService::new(mock_repo);
        let patch = UpdateUser {
            email: Some("new@b.com".to_string()),
            ..Default::default()
        };

        let outcome = service
            .update(&Uuid::now_v7().to_string(), patch)
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_update_rejects_empty_and_invalid_patches() {
        let service = UserService::new(MockUserRepository::new());
        let id = Uuid::now_v7().to_string();

        assert!(matches!(
            service.update(&id, UpdateUser::default()).await,
            Err(UserError::InvalidInput(_))
        ));

        let blank = UpdateUser {
            given_name: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(&id, blank).await,
            Err(UserError::InvalidInput(_))
        ));

        let patch = UpdateUser {
            given_name: Some("Ann".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update("", patch).await,
            Err(UserError::InvalidId(_))
        ));
    }

    #[tokio::test]
    async fn test_update_store_error_skips_refetch() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_update()
            .returning(|_, _| Err(store_error()));
        mock_repo.expect_find_by_id().never();

        let service = UserService::new(mock_repo);
        let patch = UpdateUser {
            given_name: Some("Ann".to_string()),
            ..Default::default()
        };

        let err = service
            .update(&Uuid::now_v7().to_string(), patch)
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Store(_)));
    }

    #[tokio::test]
    async fn test_remove_missing_never_deletes() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_exists().returning(|_| Ok(false));
        mock_repo.expect_delete().never();

        let service = UserService::new(mock_repo);
        let removed = service.remove(&Uuid::now_v7().to_string()).await.unwrap();

        assert!(!removed);
    }

    #[tokio::test]
    async fn test_remove_existing_deletes() {
        let mut mock_repo = MockUserRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_exists()
            .with(eq(id))
            .returning(|_| Ok(true));
        mock_repo
            .expect_delete()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(()));

        let service = UserService::new(mock_repo);
        assert!(service.remove(&id.to_string()).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_propagates_store_error() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_exists().returning(|_| Err(store_error()));
        mock_repo.expect_delete().never();

        let service = UserService::new(mock_repo);
        let err = service
            .remove(&Uuid::now_v7().to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::Store(_)));
    }
}
