//! Item request (wishlist posting) model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{item::Item, not_blank};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub id: i64,
    pub description: String,
    pub requestor_id: i64,
    pub created: NaiveDateTime,
}

/// Item request together with the items listed in answer to it
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequestDetails {
    pub id: i64,
    pub description: String,
    pub requestor_id: i64,
    pub created: NaiveDateTime,
    pub items: Vec<Item>,
}

impl ItemRequestDetails {
    /// Attach the items whose `request_id` points at `request`
    pub fn new(request: ItemRequest, items: &[Item]) -> Self {
        let items = items
            .iter()
            .filter(|item| item.request_id == Some(request.id))
            .cloned()
            .collect();
        Self {
            id: request.id,
            description: request.description,
            requestor_id: request.requestor_id,
            created: request.created,
            items,
        }
    }
}

/// Create item request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(custom(function = "not_blank"))]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(id: i64, request_id: Option<i64>) -> Item {
        Item {
            id,
            name: format!("item {}", id),
            description: "thing".to_string(),
            available: true,
            owner_id: 2,
            request_id,
        }
    }

    #[test]
    fn details_keep_only_answering_items() {
        let request = ItemRequest {
            id: 7,
            description: "Need a ladder".to_string(),
            requestor_id: 1,
            created: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        };
        let items = vec![item(1, Some(7)), item(2, None), item(3, Some(8)), item(4, Some(7))];

        let details = ItemRequestDetails::new(request, &items);
        let ids: Vec<i64> = details.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }
}
