//! Item request board service

use crate::{
    error::{AppError, AppResult},
    models::{
        item_request::{CreateItemRequest, ItemRequest, ItemRequestDetails},
        Page,
    },
    repository::Repository,
};

use super::now;

#[derive(Clone)]
pub struct ItemRequestsService {
    repository: Repository,
}

impl ItemRequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create_request(&self, requestor_id: i64, request: CreateItemRequest) -> AppResult<ItemRequestDetails> {
        if request.description.trim().is_empty() {
            return Err(AppError::Validation("Request description must not be blank".to_string()));
        }
        self.repository.users.get_by_id(requestor_id).await?;

        let created = self
            .repository
            .requests
            .create(requestor_id, &request.description, now())
            .await?;
        tracing::info!(request_id = created.id, requestor_id, "Item request posted");
        Ok(ItemRequestDetails::new(created, &[]))
    }

    /// Requests posted by `requestor_id`, newest first
    pub async fn list_own(&self, requestor_id: i64) -> AppResult<Vec<ItemRequestDetails>> {
        self.repository.users.get_by_id(requestor_id).await?;
        let requests = self.repository.requests.list_by_requestor(requestor_id).await?;
        self.with_items(requests).await
    }

    /// Requests posted by other users, newest first
    pub async fn list_others(&self, user_id: i64, page: Page) -> AppResult<Vec<ItemRequestDetails>> {
        self.repository.users.get_by_id(user_id).await?;
        let requests = self.repository.requests.list_others(user_id, page).await?;
        self.with_items(requests).await
    }

    pub async fn get_request(&self, user_id: i64, request_id: i64) -> AppResult<ItemRequestDetails> {
        self.repository.users.get_by_id(user_id).await?;
        let request = self.repository.requests.get_by_id(request_id).await?;
        let items = self.repository.items.list_by_request_ids(&[request_id]).await?;
        Ok(ItemRequestDetails::new(request, &items))
    }

    async fn with_items(&self, requests: Vec<ItemRequest>) -> AppResult<Vec<ItemRequestDetails>> {
        let ids: Vec<i64> = requests.iter().map(|r| r.id).collect();
        let items = self.repository.items.list_by_request_ids(&ids).await?;
        Ok(requests
            .into_iter()
            .map(|request| ItemRequestDetails::new(request, &items))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::Item,
        services::test_support::{user, Mocks},
    };
    use chrono::Duration;

    fn request(id: i64, requestor_id: i64, age_h: i64) -> ItemRequest {
        ItemRequest {
            id,
            description: format!("request {}", id),
            requestor_id,
            created: now() - Duration::hours(age_h),
        }
    }

    #[tokio::test]
    async fn own_requests_carry_their_items() {
        let mut mocks = Mocks::default();
        mocks.users.expect_get_by_id().returning(|id| Ok(user(id)));
        mocks
            .requests
            .expect_list_by_requestor()
            .returning(|id| Ok(vec![request(2, id, 1), request(1, id, 5)]));
        mocks
            .items
            .expect_list_by_request_ids()
            .withf(|ids| ids.len() == 2)
            .returning(|_| {
                Ok(vec![Item {
                    id: 10,
                    name: "Ladder".to_string(),
                    description: "Three metres".to_string(),
                    available: true,
                    owner_id: 4,
                    request_id: Some(1),
                }])
            });

        let svc = ItemRequestsService::new(mocks.into_repository());
        let own = svc.list_own(1).await.unwrap();
        assert_eq!(own.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 1]);
        assert!(own[0].items.is_empty());
        assert_eq!(own[1].items[0].id, 10);
    }

    #[tokio::test]
    async fn blank_description_is_rejected() {
        let svc = ItemRequestsService::new(Mocks::default().into_repository());
        let err = svc
            .create_request(1, CreateItemRequest { description: " ".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_request_is_not_found() {
        let mut mocks = Mocks::default();
        mocks.users.expect_get_by_id().returning(|id| Ok(user(id)));
        mocks
            .requests
            .expect_get_by_id()
            .returning(|id| Err(AppError::NotFound(format!("Item request with id {} not found", id))));

        let svc = ItemRequestsService::new(mocks.into_repository());
        let err = svc.get_request(1, 99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
