// Learning-content endpoints: plans, groups, courses, items, cards, media.

use reqwest::Method;
use serde_json::json;

use crate::auth::Credentials;
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    Card, Course, CreateCardRequest, CreateCardsRequest, CreateCourseRequest,
    CreateLearningGroupRequest,
    CreateLearningItemRequest, CreateLearningPlanRequest, CreateMediaRequest, LearningGroup,
    LearningItem, LearningPlan, Media, UpdateCardRequest,
};
use crate::models::{AddCoursesToLearningPlanRequest, AddGroupsToLearningPlanRequest};
use crate::transport::{MERGE_PATCH, RequestOption};

impl ApiClient {
    /// Create a new learning plan.
    pub async fn create_learning_plan(
        &self,
        req: &CreateLearningPlanRequest,
        credentials: &Credentials,
    ) -> Result<LearningPlan, Error> {
        self.send_request(
            Method::POST,
            "/v1/learning_plans",
            Self::json_body(req)?,
            Some(credentials),
            Vec::new(),
        )
        .await
    }

    /// Activate a learning plan (merge-patch partial update).
    pub async fn activate_learning_plan(
        &self,
        learning_plan_id: &str,
        credentials: &Credentials,
    ) -> Result<LearningPlan, Error> {
        self.send_request(
            Method::PATCH,
            &format!("/v1/learning_plans/{learning_plan_id}"),
            Some(json!({ "state": 1 })),
            Some(credentials),
            vec![RequestOption::content_type(MERGE_PATCH)],
        )
        .await
    }

    /// Create a new learning group from attribute filters.
    pub async fn create_learning_group(
        &self,
        req: &CreateLearningGroupRequest,
        credentials: &Credentials,
    ) -> Result<LearningGroup, Error> {
        self.send_request(
            Method::POST,
            "/v1/learning_groups",
            Self::json_body(req)?,
            Some(credentials),
            Vec::new(),
        )
        .await
    }

    /// Add one or more learning groups to a learning plan.
    pub async fn add_groups_to_learning_plan(
        &self,
        req: &AddGroupsToLearningPlanRequest,
        credentials: &Credentials,
    ) -> Result<LearningPlan, Error> {
        self.send_request(
            Method::POST,
            &format!(
                "/v1/learning_plans/{}/learning_plan_groups",
                req.learning_plan_id
            ),
            Self::json_body(req)?,
            Some(credentials),
            Vec::new(),
        )
        .await
    }

    /// Create a new course.
    pub async fn create_course(
        &self,
        req: &CreateCourseRequest,
        credentials: &Credentials,
    ) -> Result<Course, Error> {
        self.send_request(
            Method::POST,
            "/v1/courses",
            Self::json_body(req)?,
            Some(credentials),
            Vec::new(),
        )
        .await
    }

    /// Publish a course (merge-patch partial update).
    pub async fn activate_course(
        &self,
        course_id: &str,
        credentials: &Credentials,
    ) -> Result<Course, Error> {
        self.send_request(
            Method::PATCH,
            &format!("/v1/courses/{course_id}"),
            Some(json!({ "state": "published" })),
            Some(credentials),
            vec![RequestOption::content_type(MERGE_PATCH)],
        )
        .await
    }

    /// Add one or more courses to a learning plan.
    pub async fn add_courses_to_learning_plan(
        &self,
        req: &AddCoursesToLearningPlanRequest,
        credentials: &Credentials,
    ) -> Result<LearningPlan, Error> {
        self.send_request(
            Method::POST,
            &format!("/v1/learning_plan/{}/courses", req.learning_plan_id),
            Self::json_body(req)?,
            Some(credentials),
            Vec::new(),
        )
        .await
    }

    /// Add a new learning item to a course.
    pub async fn create_learning_item(
        &self,
        req: &CreateLearningItemRequest,
        credentials: &Credentials,
    ) -> Result<LearningItem, Error> {
        self.send_request(
            Method::POST,
            "/v1/learning_items",
            Self::json_body(req)?,
            Some(credentials),
            Vec::new(),
        )
        .await
    }

    /// Add a single card to a learning item.
    pub async fn create_card(
        &self,
        req: &CreateCardRequest,
        credentials: &Credentials,
    ) -> Result<Card, Error> {
        self.send_request(
            Method::POST,
            "/v1/cards",
            Self::json_body(req)?,
            Some(credentials),
            Vec::new(),
        )
        .await
    }

    /// Bulk-create cards under a learning item.
    pub async fn create_cards(
        &self,
        learning_item_id: &str,
        req: &CreateCardsRequest,
        credentials: &Credentials,
    ) -> Result<Vec<Card>, Error> {
        #[derive(serde::Deserialize)]
        struct Response {
            cards: Vec<Card>,
        }

        let resp: Response = self
            .send_request(
                Method::POST,
                &format!("/v1/learning_items/{learning_item_id}/cards"),
                Self::json_body(req)?,
                Some(credentials),
                Vec::new(),
            )
            .await?;

        Ok(resp.cards)
    }

    /// Partially update a card (merge-patch).
    pub async fn update_card(
        &self,
        req: &UpdateCardRequest,
        credentials: &Credentials,
    ) -> Result<Card, Error> {
        self.send_request(
            Method::PATCH,
            &format!("/v1/cards/{}", req.id),
            Self::json_body(req)?,
            Some(credentials),
            vec![RequestOption::content_type(MERGE_PATCH)],
        )
        .await
    }

    /// List a learning item's cards in sequence order.
    pub async fn learning_item_cards(
        &self,
        learning_item_id: &str,
        credentials: &Credentials,
    ) -> Result<Vec<Card>, Error> {
        #[derive(serde::Deserialize)]
        struct Response {
            #[serde(rename = "hydra:member")]
            cards: Vec<Card>,
        }

        let resp: Response = self
            .send_request(
                Method::GET,
                &format!("/v1/learning_items/{learning_item_id}/cards"),
                None,
                Some(credentials),
                vec![RequestOption::query("order[sequenceOrder]", "asc")],
            )
            .await?;

        Ok(resp.cards)
    }

    /// Create a media item; the response carries a temporary upload URL.
    pub async fn create_media(
        &self,
        req: &CreateMediaRequest,
        credentials: &Credentials,
    ) -> Result<Media, Error> {
        self.send_request(
            Method::POST,
            "/v1/media",
            Self::json_body(req)?,
            Some(credentials),
            Vec::new(),
        )
        .await
    }
}
