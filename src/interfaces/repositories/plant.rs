use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::plant::{Plant, PlantRow},
    errors::AppError,
    repositories::sqlx_repo::SqlxPlantRepo,
};

#[async_trait]
pub trait PlantRepository: Send + Sync {
    async fn list_plants(&self) -> Result<Vec<Plant>, AppError>;
    async fn get_plant(&self, id: &Uuid) -> Result<Plant, AppError>;
    async fn insert_plant(&self, plant: &Plant) -> Result<(), AppError>;
    async fn update_plant(&self, plant: &Plant) -> Result<(), AppError>;
    async fn delete_plant(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxPlantRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxPlantRepo { pool }
    }
}

#[async_trait]
impl PlantRepository for SqlxPlantRepo {
    async fn list_plants(&self) -> Result<Vec<Plant>, AppError> {
        let rows = sqlx::query_as::<_, PlantRow>(
            "SELECT * FROM plants ORDER BY common_name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Plant::from).collect())
    }

    async fn get_plant(&self, id: &Uuid) -> Result<Plant, AppError> {
        let row = sqlx::query_as::<_, PlantRow>(
            "SELECT * FROM plants WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Plant not found".into()))?;

        Ok(Plant::from(row))
    }

    async fn insert_plant(&self, plant: &Plant) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO plants (
                id, common_name, scientific_name, description, care_instructions,
                images, identified_by, used_in_projects, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(plant.id)
        .bind(&plant.common_name)
        .bind(&plant.scientific_name)
        .bind(&plant.description)
        .bind(&plant.care_instructions)
        .bind(&plant.images)
        .bind(plant.identified_by.as_str())
        .bind(&plant.used_in_projects)
        .bind(plant.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_plant(&self, plant: &Plant) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE plants
            SET common_name = $2, scientific_name = $3, description = $4,
                care_instructions = $5, images = $6, identified_by = $7,
                used_in_projects = $8
            WHERE id = $1
            "#,
        )
        .bind(plant.id)
        .bind(&plant.common_name)
        .bind(&plant.scientific_name)
        .bind(&plant.description)
        .bind(&plant.care_instructions)
        .bind(&plant.images)
        .bind(plant.identified_by.as_str())
        .bind(&plant.used_in_projects)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Plant not found".into()));
        }
        Ok(())
    }

    async fn delete_plant(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM plants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Plant not found".into()));
        }
        Ok(())
    }
}
