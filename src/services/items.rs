//! Item catalog and comment service

use crate::{
    config::RulesConfig,
    error::{AppError, AppResult},
    models::{
        booking::last_and_next,
        comment::{Comment, CreateComment, NewComment},
        item::{CreateItem, Item, ItemDetails, UpdateItem},
        Page,
    },
    repository::Repository,
};

use super::now;

#[derive(Clone)]
pub struct ItemsService {
    repository: Repository,
    rules: RulesConfig,
}

impl ItemsService {
    pub fn new(repository: Repository, rules: RulesConfig) -> Self {
        Self { repository, rules }
    }

    /// List a new item owned by `owner_id`
    pub async fn create_item(&self, owner_id: i64, item: CreateItem) -> AppResult<Item> {
        if item.available.is_none() {
            return Err(AppError::Validation("Item availability must be set".to_string()));
        }
        self.repository.users.get_by_id(owner_id).await?;
        if let Some(request_id) = item.request_id {
            self.repository.requests.get_by_id(request_id).await?;
        }

        let created = self.repository.items.create(owner_id, &item).await?;
        tracing::info!(item_id = created.id, owner_id, "Item created");
        Ok(created)
    }

    /// Apply a partial update to one of `owner_id`'s items
    pub async fn update_item(&self, owner_id: i64, item_id: i64, changes: UpdateItem) -> AppResult<Item> {
        let mut item = self.owned_item(owner_id, item_id).await?;
        changes.apply_to(&mut item);
        self.repository.items.update(&item).await
    }

    pub async fn delete_item(&self, owner_id: i64, item_id: i64) -> AppResult<()> {
        self.owned_item(owner_id, item_id).await?;
        self.repository.items.delete(item_id).await?;
        tracing::info!(item_id, owner_id, "Item deleted");
        Ok(())
    }

    /// Item with comments; the owner also sees the last and next approved bookings
    pub async fn get_item(&self, user_id: i64, item_id: i64) -> AppResult<ItemDetails> {
        let item = self.repository.items.get_by_id(item_id).await?;
        let comments = self.repository.comments.list_by_items(&[item_id]).await?;

        if item.owner_id != user_id {
            return Ok(ItemDetails::new(item, comments));
        }

        let bookings = self.repository.bookings.list_by_items(&[item_id]).await?;
        let (last, next) = last_and_next(&bookings, item_id, now());
        Ok(ItemDetails::new(item, comments).with_bookings(last, next))
    }

    /// Items listed by `owner_id` with their comments and surrounding bookings
    pub async fn list_owner_items(&self, owner_id: i64, page: Page) -> AppResult<Vec<ItemDetails>> {
        self.repository.users.get_by_id(owner_id).await?;
        let items = self.repository.items.list_by_owner(owner_id, page).await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        let bookings = self.repository.bookings.list_by_items(&ids).await?;
        let mut comments = self.repository.comments.list_by_items(&ids).await?;
        let now = now();

        let details = items
            .into_iter()
            .map(|item| {
                let (last, next) = last_and_next(&bookings, item.id, now);
                let (own, rest): (Vec<Comment>, Vec<Comment>) =
                    comments.drain(..).partition(|c| c.item_id == item.id);
                comments = rest;
                ItemDetails::new(item, own).with_bookings(last, next)
            })
            .collect();
        Ok(details)
    }

    /// Available items matching `text`; blank text matches nothing
    pub async fn search(&self, text: &str, page: Page) -> AppResult<Vec<Item>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        self.repository.items.search(text, page).await
    }

    /// Comment on an item the author has an eligible approved booking for
    pub async fn add_comment(&self, author_id: i64, item_id: i64, comment: CreateComment) -> AppResult<Comment> {
        if comment.text.trim().is_empty() {
            return Err(AppError::Validation("Comment text must not be blank".to_string()));
        }

        self.repository.users.get_by_id(author_id).await?;
        let item = self.repository.items.get_by_id(item_id).await?;

        let now = now();
        let bookings = self.repository.bookings.list_by_booker(author_id).await?;
        let eligible = item.owner_id != author_id
            && bookings.iter().any(|b| {
                b.item_id == item_id
                    && b.is_approved()
                    && if self.rules.comment_requires_completed_booking {
                        b.is_past(now)
                    } else {
                        b.is_in_progress(now)
                    }
            });
        if !eligible {
            tracing::debug!(author_id, item_id, "Comment refused: no eligible booking");
            return Err(AppError::Validation(format!(
                "User with id {} has no eligible approved booking of item {}",
                author_id, item_id
            )));
        }

        let created = self
            .repository
            .comments
            .create(&NewComment {
                item_id,
                author_id,
                text: comment.text,
                created: now,
            })
            .await?;
        tracing::info!(comment_id = created.id, item_id, author_id, "Comment added");
        Ok(created)
    }

    async fn owned_item(&self, owner_id: i64, item_id: i64) -> AppResult<Item> {
        let item = self.repository.items.get_by_id(item_id).await?;
        if item.owner_id != owner_id {
            return Err(AppError::NotFound(format!(
                "Item with id {} not found for user {}",
                item_id, owner_id
            )));
        }
        Ok(item)
    }
}
