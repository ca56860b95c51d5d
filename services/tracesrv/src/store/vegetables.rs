use async_trait::async_trait;
use errors::{TraceError, TraceResult};
use tracing::debug;

use super::{SqliteStore, VegetableRepository};
use crate::vegetables::{NewVegetable, Vegetable, VegetableEdit};

fn not_found(id: i64) -> TraceError {
    TraceError::not_found(format!("vegetable {}", id))
}

#[async_trait]
impl VegetableRepository for SqliteStore {
    async fn list(&self) -> TraceResult<Vec<Vegetable>> {
        let rows = sqlx::query_as::<_, Vegetable>(
            "SELECT id, name, quantity FROM vegetables ORDER BY id",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: i64) -> TraceResult<Vegetable> {
        sqlx::query_as::<_, Vegetable>("SELECT id, name, quantity FROM vegetables WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn create(&self, new: &NewVegetable) -> TraceResult<Vegetable> {
        let created = sqlx::query_as::<_, Vegetable>(
            "INSERT INTO vegetables (name, quantity) VALUES (?, ?) RETURNING id, name, quantity",
        )
        .bind(new.normalized_name())
        .bind(new.quantity)
        .fetch_one(self.pool())
        .await?;
        Ok(created)
    }

    async fn edit(&self, id: i64, edit: &VegetableEdit) -> TraceResult<Vegetable> {
        let mut tx = self.pool().begin().await?;

        // No-op write: takes the write lock before the row is read and
        // doubles as the existence check
        let touched = sqlx::query("UPDATE vegetables SET quantity = quantity WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if touched.rows_affected() == 0 {
            return Err(not_found(id));
        }

        let mut vegetable =
            sqlx::query_as::<_, Vegetable>("SELECT id, name, quantity FROM vegetables WHERE id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        edit.apply(&mut vegetable);

        sqlx::query("UPDATE vegetables SET name = ?, quantity = ? WHERE id = ?")
            .bind(&vegetable.name)
            .bind(vegetable.quantity)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!("Applied {} to vegetable {}", edit.kind(), id);
        Ok(vegetable)
    }

    async fn delete(&self, id: i64) -> TraceResult<()> {
        let result = sqlx::query("DELETE FROM vegetables WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}
