use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::collection::Document;
use crate::db::{Collectable, Identifiable};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_data: Option<String>,
    /// Free-form date as entered by the user. Never parsed.
    pub date: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AchievementInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_data: Option<String>,
    pub date: String,
}

impl Collectable for Achievement {
    fn get_collection_name() -> &'static str {
        "achievements"
    }
}

impl Identifiable for Achievement {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl Document for Achievement {
    type Input = AchievementInput;
    const NAME: &'static str = "achievement";

    fn from_input(input: AchievementInput, id: Uuid, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            image_data: input.image_data,
            date: input.date,
            timestamp,
        }
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
