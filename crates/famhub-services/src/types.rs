//! Row shapes of the family tables, plus the insert/update payloads sent back.
//!
//! Field names match the column names so the same structs serve the REST
//! client and the SQLite store.

use chrono::{DateTime, Utc};
use famhub_calendar::{DateKey, TimeOfDay};
use famhub_core::ValidationError;
use serde::{Deserialize, Serialize};

/// Shown when an author id has no matching member.
pub const UNKNOWN_MEMBER: &str = "Unknown";

/// Spending categories offered on the card benefit pages. Values are the
/// stored `category` strings.
pub const CARD_CATEGORIES: &[&str] = &[
    "주유",
    "쇼핑",
    "대중교통",
    "대형마트",
    "편의점",
    "외식",
    "카페/베이커리",
    "영화",
    "관리비",
    "통신",
    "교육",
    "의료",
    "육아",
    "문화",
    "뷰티",
    "생활",
];

/// Welfare categories compared across companies.
pub const COMPANY_CATEGORIES: &[&str] = &[
    "경조사",
    "의료비",
    "건강검진",
    "교육비",
    "자녀학자금",
    "휴가/휴무",
    "자기계발",
    "문화/여가",
    "기타",
];

fn require(value: &str, err: ValidationError) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(err)
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
}

/// Name of `id` among `members`, or [`UNKNOWN_MEMBER`].
pub fn member_name<'a>(members: &'a [Member], id: &str) -> &'a str {
    members
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.name.as_str())
        .unwrap_or(UNKNOWN_MEMBER)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    #[serde(default)]
    pub is_notice: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub is_notice: bool,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.author_id, ValidationError::MissingAuthor)?;
        require(&self.title, ValidationError::MissingTitle)?;
        require(&self.content, ValidationError::MissingContent)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
}

impl PostUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.title, ValidationError::MissingTitle)?;
        require(&self.content, ValidationError::MissingContent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewComment {
    pub post_id: String,
    pub author_id: String,
    pub content: String,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.author_id, ValidationError::MissingAuthor)?;
        require(&self.content, ValidationError::MissingContent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub post_id: String,
    pub file_name: String,
    pub file_url: String,
    /// Object path inside the storage bucket.
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAttachment {
    pub post_id: String,
    pub file_name: String,
    pub file_url: String,
    pub file_path: String,
}

/// Bucket path for an uploaded attachment: `{post_id}/{millis}_{file_name}`.
pub fn attachment_path(post_id: &str, uploaded_at: DateTime<Utc>, file_name: &str) -> String {
    format!("{}/{}_{}", post_id, uploaded_at.timestamp_millis(), file_name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSchedule {
    pub title: String,
    pub schedule_date: DateKey,
    pub schedule_time: TimeOfDay,
    pub author_id: String,
}

impl NewSchedule {
    pub fn validate(&self, step_minutes: u32) -> Result<(), ValidationError> {
        require(&self.author_id, ValidationError::MissingAuthor)?;
        require(&self.title, ValidationError::MissingTitle)?;
        if self.schedule_time.is_on_grid(step_minutes) {
            Ok(())
        } else {
            Err(ValidationError::InvalidTime)
        }
    }
}

/// Only title and time of a schedule entry can change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleUpdate {
    pub title: String,
    pub schedule_time: TimeOfDay,
}

impl ScheduleUpdate {
    pub fn validate(&self, step_minutes: u32) -> Result<(), ValidationError> {
        require(&self.title, ValidationError::MissingTitle)?;
        if self.schedule_time.is_on_grid(step_minutes) {
            Ok(())
        } else {
            Err(ValidationError::InvalidTime)
        }
    }
}

/// Free-text notice a member pins to the home page. One per member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub author_id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub card_name: String,
    pub owner_id: String,
    #[serde(default)]
    pub monthly_requirement: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CardInput {
    pub card_name: String,
    pub owner_id: String,
    pub monthly_requirement: Option<String>,
}

impl CardInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.card_name.trim().is_empty() || self.owner_id.trim().is_empty() {
            return Err(ValidationError::MissingCardFields);
        }
        Ok(())
    }

    /// Blank requirement text is stored as null.
    pub fn normalized(mut self) -> Self {
        self.monthly_requirement = self
            .monthly_requirement
            .filter(|r| !r.trim().is_empty());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardBenefit {
    pub card_id: String,
    pub category: String,
    pub benefit_description: String,
}

/// Card columns embedded in a category lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSummary {
    pub card_name: String,
    pub owner_id: String,
    #[serde(default)]
    pub monthly_requirement: Option<String>,
}

/// A benefit row joined with the card it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBenefit {
    pub card_id: String,
    pub category: String,
    pub benefit_description: String,
    /// Null when the card row has gone away.
    #[serde(default)]
    pub cards: Option<CardSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub company_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyBenefit {
    pub company_id: String,
    pub category: String,
    pub content: String,
}

/// `(category, text)` pairs with blank text dropped and text trimmed.
pub fn non_blank_entries<'a, I>(entries: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    entries
        .into_iter()
        .filter_map(|(category, text)| {
            let text = text.trim();
            (!text.is_empty()).then(|| (category.clone(), text.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    #[test]
    fn test_member_name_fallback() {
        let members = vec![Member {
            id: "m1".into(),
            name: "Mom".into(),
        }];
        assert_eq!(member_name(&members, "m1"), "Mom");
        assert_eq!(member_name(&members, "ghost"), UNKNOWN_MEMBER);
    }

    #[test]
    fn test_new_post_validation_order() {
        let mut post = NewPost::default();
        assert_eq!(post.validate(), Err(ValidationError::MissingAuthor));
        post.author_id = "m1".into();
        assert_eq!(post.validate(), Err(ValidationError::MissingTitle));
        post.title = "  ".into();
        assert_eq!(post.validate(), Err(ValidationError::MissingTitle));
        post.title = "Trip".into();
        assert_eq!(post.validate(), Err(ValidationError::MissingContent));
        post.content = "Packing list".into();
        assert!(post.validate().is_ok());
    }

    #[test]
    fn test_schedule_validation_rejects_off_grid_time() {
        let schedule = NewSchedule {
            title: "Dentist".into(),
            schedule_date: DateKey::parse("2026-02-03").unwrap(),
            schedule_time: TimeOfDay::at(9, 5).unwrap(),
            author_id: "m1".into(),
        };
        assert_eq!(schedule.validate(10), Err(ValidationError::InvalidTime));
        assert!(schedule.validate(5).is_ok());
    }

    #[test]
    fn test_new_schedule_serializes_all_day_sentinel() {
        let schedule = NewSchedule {
            title: "Holiday trip".into(),
            schedule_date: DateKey::parse("2026-02-16").unwrap(),
            schedule_time: TimeOfDay::AllDay,
            author_id: "m1".into(),
        };
        let json = serde_json::to_value(&schedule).unwrap();
        assert_eq!(json["schedule_date"], "2026-02-16");
        assert_eq!(json["schedule_time"], "ALL_DAY");
    }

    #[test]
    fn test_card_input_normalizes_blank_requirement() {
        let input = CardInput {
            card_name: "Deep Dream".into(),
            owner_id: "m1".into(),
            monthly_requirement: Some("  ".into()),
        }
        .normalized();
        assert!(input.monthly_requirement.is_none());
        assert!(input.validate().is_ok());

        let missing_owner = CardInput {
            card_name: "Deep Dream".into(),
            ..CardInput::default()
        };
        assert_eq!(
            missing_owner.validate(),
            Err(ValidationError::MissingCardFields)
        );
    }

    #[test]
    fn test_category_benefit_with_embedded_card() {
        let json = r#"{
            "card_id": "c1",
            "category": "주유",
            "benefit_description": "60 won/L off",
            "cards": {"card_name": "Oil Card", "owner_id": "m1", "monthly_requirement": null}
        }"#;
        let row: CategoryBenefit = serde_json::from_str(json).unwrap();
        let card = row.cards.unwrap();
        assert_eq!(card.card_name, "Oil Card");
        assert!(card.monthly_requirement.is_none());
    }

    #[test]
    fn test_attachment_path_layout() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            attachment_path("p1", at, "photo.jpg"),
            format!("p1/{}_photo.jpg", at.timestamp_millis())
        );
    }

    #[test]
    fn test_non_blank_entries() {
        let mut map = BTreeMap::new();
        map.insert("주유".to_string(), " 5% ".to_string());
        map.insert("쇼핑".to_string(), "   ".to_string());
        let entries = non_blank_entries(&map);
        assert_eq!(entries, vec![("주유".to_string(), "5%".to_string())]);
    }
}
