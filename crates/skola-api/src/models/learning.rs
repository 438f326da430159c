// Learning-content models: plans, groups, courses, items, cards, media.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeFilter {
    pub attribute_id: String,
    pub filter_operator: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateLearningGroupRequest {
    pub name: String,
    pub attributes: Vec<AttributeFilter>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub user_count: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub organization_id: String,
    pub title: String,
    pub version_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Course {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLearningItemRequest {
    /// IRI of the owning course, e.g. `/api/courses/{id}`.
    pub course: String,
    pub description: String,
    pub name: String,
    pub points: i32,
    pub sequence_order: i32,
    pub state: String,
    #[serde(rename = "type")]
    pub item_type: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningItem {
    pub id: String,
    #[serde(default)]
    pub learning_item_version_id: String,
}

/// One block inside a card's JSON layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContentBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardJson {
    pub version: String,
    pub description: String,
    pub template_type: Option<String>,
    pub content_blocks: Vec<CardContentBlock>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    /// IRI of the owning learning item. Omitted for bulk creation, where
    /// the item is part of the URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_item: Option<String>,
    #[serde(rename = "type")]
    pub card_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    pub title: String,
    pub sequence_order: i32,
    pub confidence_check: bool,
    pub json: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCardsRequest {
    pub cards: Vec<CreateCardRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub media: Vec<Media>,
    pub json: CardJson,
}

/// Body for a merge-patch card update; the card id rides in the URL.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateCardRequest {
    #[serde(skip)]
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,
    pub media: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMediaRequest {
    pub file_name: String,
    pub mime_type: String,
}

/// A media item plus short-lived upload/download URLs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: String,
    #[serde(default)]
    pub temporary_put_url: String,
    #[serde(default)]
    pub temporary_get_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLearningPlanRequest {
    pub name: String,
    pub activated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPlan {
    pub id: String,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub learning_groups: Vec<LearningGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddCoursesToLearningPlanRequest {
    #[serde(skip)]
    pub learning_plan_id: String,
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddGroupsToLearningPlanRequest {
    #[serde(skip)]
    pub learning_plan_id: String,
    pub learning_group_ids: Vec<String>,
}
