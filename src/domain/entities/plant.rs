use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: Uuid,
    pub common_name: String,
    pub scientific_name: String,
    pub description: String,
    pub care_instructions: String,
    pub images: Vec<String>,
    pub identified_by: PlantSource,
    pub used_in_projects: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// How a plant entry was identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlantSource {
    VisionApi,
    Gpt,
    #[default]
    Manual,
}

impl PlantSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlantSource::VisionApi => "vision_api",
            PlantSource::Gpt => "gpt",
            PlantSource::Manual => "manual",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "vision_api" => PlantSource::VisionApi,
            "gpt" => PlantSource::Gpt,
            _ => PlantSource::Manual,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PlantDraft {
    #[validate(length(min = 1, max = 200, message = "Common name must be 1-200 characters"))]
    pub common_name: String,
    #[validate(length(max = 200, message = "Scientific name is too long"))]
    pub scientific_name: String,
    pub description: String,
    pub care_instructions: String,
    pub images: Vec<String>,
    pub identified_by: PlantSource,
    pub used_in_projects: Vec<Uuid>,
}

impl PlantDraft {
    pub fn into_plant(self, id: Uuid, now: DateTime<Utc>) -> Plant {
        Plant {
            id,
            common_name: self.common_name,
            scientific_name: self.scientific_name,
            description: self.description,
            care_instructions: self.care_instructions,
            images: self.images,
            identified_by: self.identified_by,
            used_in_projects: self.used_in_projects,
            created_at: now,
        }
    }

    pub fn applied_to(&self, existing: &Plant) -> Plant {
        self.clone().into_plant(existing.id, existing.created_at)
    }
}

/// Row shape for the `plants` table; `identified_by` is stored as text.
#[derive(Debug, sqlx::FromRow)]
pub struct PlantRow {
    pub id: Uuid,
    pub common_name: String,
    pub scientific_name: String,
    pub description: String,
    pub care_instructions: String,
    pub images: Vec<String>,
    pub identified_by: String,
    pub used_in_projects: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<PlantRow> for Plant {
    fn from(row: PlantRow) -> Self {
        Plant {
            id: row.id,
            common_name: row.common_name,
            scientific_name: row.scientific_name,
            description: row.description,
            care_instructions: row.care_instructions,
            images: row.images,
            identified_by: PlantSource::parse(&row.identified_by),
            used_in_projects: row.used_in_projects,
            created_at: row.created_at,
        }
    }
}
