use tokio_postgres::Row;
use tracing::info;

use super::Database;
use crate::error::ApiError;
use crate::models::{ModuleCount, Resource, StoredResource};

fn resource_from_row(row: &Row) -> Resource {
    let id: i32 = row.get("id");
    Resource {
        id,
        title: row.get("title"),
        module: row.get("module"),
        file_name: row.get("file_name"),
        url: Resource::download_url(id),
        file_path: row.get("file_path"),
        created_at: row.get("created_at"),
    }
}

impl Database {
    /// Newest first, optionally limited to one module.
    pub async fn list_resources(&self, module: Option<&str>) -> Result<Vec<Resource>, ApiError> {
        let client = self.get_connection().await?;

        let rows = match module {
            Some(module) => {
                client
                    .query(
                        r#"
                        SELECT id, title, module, file_name, file_path, created_at
                        FROM resources WHERE module = $1
                        ORDER BY created_at DESC, id DESC
                        "#,
                        &[&module],
                    )
                    .await?
            }
            None => {
                client
                    .query(
                        r#"
                        SELECT id, title, module, file_name, file_path, created_at
                        FROM resources ORDER BY created_at DESC, id DESC
                        "#,
                        &[],
                    )
                    .await?
            }
        };

        Ok(rows.iter().map(resource_from_row).collect())
    }

    pub async fn list_resource_modules(&self) -> Result<Vec<ModuleCount>, ApiError> {
        let client = self.get_connection().await?;

        let rows = client
            .query(
                "SELECT module, COUNT(*) AS count FROM resources GROUP BY module ORDER BY module",
                &[],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| ModuleCount {
                module: row.get("module"),
                count: row.get("count"),
            })
            .collect())
    }

    pub async fn get_resource(&self, id: i32) -> Result<Resource, ApiError> {
        let client = self.get_connection().await?;

        let row = client
            .query_opt(
                "SELECT id, title, module, file_name, file_path, created_at FROM resources WHERE id = $1",
                &[&id],
            )
            .await?;

        match row {
            Some(row) => Ok(resource_from_row(&row)),
            None => Err(ApiError::not_found("Resource")),
        }
    }

    /// Records a file that has already been written to the upload store.
    pub async fn create_resource(&self, resource: StoredResource) -> Result<Resource, ApiError> {
        let file_path = resource.file_path.to_string_lossy().into_owned();

        let client = self.get_connection().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO resources (title, module, file_name, file_path)
                VALUES ($1, $2, $3, $4)
                RETURNING id, title, module, file_name, file_path, created_at
                "#,
                &[&resource.title, &resource.module, &resource.file_name, &file_path],
            )
            .await?;

        let created = resource_from_row(&row);
        info!("Created resource {} '{}' in module {}", created.id, created.title, created.module);
        Ok(created)
    }

    /// Deletes the row and hands back what was removed so the caller can
    /// clean up the stored file.
    pub async fn delete_resource(&self, id: i32) -> Result<Resource, ApiError> {
        let client = self.get_connection().await?;

        let row = client
            .query_opt(
                "DELETE FROM resources WHERE id = $1 RETURNING id, title, module, file_name, file_path, created_at",
                &[&id],
            )
            .await?;

        match row {
            Some(row) => {
                info!("Deleted resource {}", id);
                Ok(resource_from_row(&row))
            }
            None => Err(ApiError::not_found("Resource")),
        }
    }
}
