//! Items repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        item::{CreateItem, Item},
        Page,
    },
};

const ITEM_COLUMNS: &str = "id, name, description, available, owner_id, request_id";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemsRepository: Send + Sync {
    /// Fails with `NotFound` when no item has this id
    async fn get_by_id(&self, id: i64) -> AppResult<Item>;

    /// Items listed by `owner_id`, ordered by id
    async fn list_by_owner(&self, owner_id: i64, page: Page) -> AppResult<Vec<Item>>;

    /// Available items whose name or description contains `text`, ignoring case
    async fn search(&self, text: &str, page: Page) -> AppResult<Vec<Item>>;

    /// Items answering any of the given item requests
    async fn list_by_request_ids(&self, request_ids: &[i64]) -> AppResult<Vec<Item>>;

    async fn create(&self, owner_id: i64, item: &CreateItem) -> AppResult<Item>;

    /// Persist the mutable fields of `item`
    async fn update(&self, item: &Item) -> AppResult<Item>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

#[derive(Clone)]
pub struct PgItemsRepository {
    pool: Pool<Postgres>,
}

impl PgItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemsRepository for PgItemsRepository {
    async fn get_by_id(&self, id: i64) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(&format!("SELECT {} FROM items WHERE id = $1", ITEM_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    async fn list_by_owner(&self, owner_id: i64, page: Page) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM items WHERE owner_id = $1 ORDER BY id LIMIT $2 OFFSET $3",
            ITEM_COLUMNS
        ))
        .bind(owner_id)
        .bind(page.size)
        .bind(page.from)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn search(&self, text: &str, page: Page) -> AppResult<Vec<Item>> {
        // STRPOS keeps '%' and '_' in the search text literal
        let items = sqlx::query_as::<_, Item>(&format!(
            r#"
            SELECT {} FROM items
            WHERE available
              AND (STRPOS(LOWER(name), LOWER($1)) > 0 OR STRPOS(LOWER(description), LOWER($1)) > 0)
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
            ITEM_COLUMNS
        ))
        .bind(text)
        .bind(page.size)
        .bind(page.from)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn list_by_request_ids(&self, request_ids: &[i64]) -> AppResult<Vec<Item>> {
        if request_ids.is_empty() {
            return Ok(Vec::new());
        }
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM items WHERE request_id = ANY($1) ORDER BY id",
            ITEM_COLUMNS
        ))
        .bind(request_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn create(&self, owner_id: i64, item: &CreateItem) -> AppResult<Item> {
        let created = sqlx::query_as::<_, Item>(&format!(
            r#"
            INSERT INTO items (name, description, available, owner_id, request_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.available.unwrap_or(false))
        .bind(owner_id)
        .bind(item.request_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update(&self, item: &Item) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(&format!(
            "UPDATE items SET name = $2, description = $3, available = $4 WHERE id = $1 RETURNING {}",
            ITEM_COLUMNS
        ))
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.available)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", item.id)))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Item with id {} not found", id)));
        }
        Ok(())
    }
}
