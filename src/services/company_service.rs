use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::company_dto::{CreateCompanyPayload, UpdateCompanyPayload};
use crate::error::{db_error_code, Error, Result, SQLSTATE_FOREIGN_KEY_VIOLATION, SQLSTATE_UNIQUE_VIOLATION};
use crate::models::company::Company;

const COMPANY_COLUMNS: &str =
    "id, name, description, website, youtube_video, twitter_handle, instagram_handle, logo_url";

#[derive(Clone)]
pub struct CompanyService {
    pool: PgPool,
}

impl CompanyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Company>> {
        let companies = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies ORDER BY name",
            COMPANY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(companies)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Company> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE id = $1",
            COMPANY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        company.ok_or(Error::CompanyNotFound)
    }

    pub async fn by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Company>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let companies = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE id = ANY($1)",
            COMPANY_COLUMNS
        ))
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(companies
            .into_iter()
            .map(|company| (company.id, company))
            .collect())
    }

    async fn name_taken(&self, name: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM companies WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn create(&self, payload: CreateCompanyPayload) -> Result<Company> {
        // Advisory pre-check; the unique constraint is the authoritative
        // guard under concurrent creation.
        if self.name_taken(&payload.name).await? {
            return Err(Error::CompanyAlreadyExists);
        }

        let company = sqlx::query_as::<_, Company>(&format!(
            "INSERT INTO companies ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            COMPANY_COLUMNS, COMPANY_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(payload.name)
        .bind(payload.description)
        .bind(payload.website)
        .bind(payload.youtube_video)
        .bind(payload.twitter_handle)
        .bind(payload.instagram_handle)
        .bind(payload.logo_url)
        .fetch_one(&self.pool)
        .await
        .map_err(translate_company_write_error)?;
        Ok(company)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateCompanyPayload) -> Result<Company> {
        let current = self.get_by_id(id).await?;

        if let Some(name) = &payload.name {
            if *name != current.name && self.name_taken(name).await? {
                return Err(Error::CompanyAlreadyExists);
            }
        }

        // Nothing supplied, or nothing that differs: no write at all.
        let Some(mut query) = build_company_update(&current, &payload) else {
            return Ok(current);
        };

        let company = query
            .build_query_as::<Company>()
            .fetch_one(&self.pool)
            .await
            .map_err(translate_company_write_error)?;
        Ok(company)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| match db_error_code(&err).as_deref() {
                Some(SQLSTATE_FOREIGN_KEY_VIOLATION) => Error::CompanyInUse,
                _ => Error::Database(err),
            })?;
        if result.rows_affected() == 0 {
            return Err(Error::CompanyNotFound);
        }
        Ok(())
    }
}

fn translate_company_write_error(err: sqlx::Error) -> Error {
    match db_error_code(&err).as_deref() {
        Some(SQLSTATE_UNIQUE_VIOLATION) => Error::CompanyAlreadyExists,
        _ => Error::Database(err),
    }
}

/// Stages a column only when the caller supplied a value that differs from
/// the stored one. Returns None when no column is staged.
fn build_company_update(
    current: &Company,
    payload: &UpdateCompanyPayload,
) -> Option<QueryBuilder<'static, Postgres>> {
    let mut changes: Vec<(&'static str, String)> = Vec::new();

    if let Some(name) = &payload.name {
        if *name != current.name {
            changes.push(("name", name.clone()));
        }
    }
    let optional_fields = [
        ("description", &payload.description, &current.description),
        ("website", &payload.website, &current.website),
        ("youtube_video", &payload.youtube_video, &current.youtube_video),
        ("twitter_handle", &payload.twitter_handle, &current.twitter_handle),
        (
            "instagram_handle",
            &payload.instagram_handle,
            &current.instagram_handle,
        ),
        ("logo_url", &payload.logo_url, &current.logo_url),
    ];
    for (column, supplied, stored) in optional_fields {
        if let Some(value) = supplied {
            if stored.as_deref() != Some(value.as_str()) {
                changes.push((column, value.clone()));
            }
        }
    }

    if changes.is_empty() {
        return None;
    }

    let mut query = QueryBuilder::new("UPDATE companies SET ");
    {
        let mut set = query.separated(", ");
        for (column, value) in changes {
            set.push(column);
            set.push_unseparated(" = ");
            set.push_bind_unseparated(value);
        }
    }
    query.push(" WHERE id = ");
    query.push_bind(current.id);
    query.push(&format!(" RETURNING {}", COMPANY_COLUMNS));
    Some(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company() -> Company {
        Company {
            id: Uuid::new_v4(),
            name: "ACME".into(),
            description: Some("rockets".into()),
            website: None,
            youtube_video: None,
            twitter_handle: None,
            instagram_handle: None,
            logo_url: None,
        }
    }

    #[test]
    fn renaming_to_current_name_stages_nothing() {
        let current = company();
        let payload = UpdateCompanyPayload {
            name: Some("ACME".into()),
            ..Default::default()
        };
        assert!(build_company_update(&current, &payload).is_none());
    }

    #[test]
    fn unchanged_optional_field_stages_nothing() {
        let current = company();
        let payload = UpdateCompanyPayload {
            description: Some("rockets".into()),
            ..Default::default()
        };
        assert!(build_company_update(&current, &payload).is_none());
    }

    #[test]
    fn changed_fields_are_staged_in_one_update() {
        let current = company();
        let payload = UpdateCompanyPayload {
            name: Some("ACME Corp".into()),
            website: Some("https://acme.example".into()),
            ..Default::default()
        };
        let query = build_company_update(&current, &payload).expect("staged update");
        let sql = query.sql().to_string();
        assert!(sql.contains("name = $1"));
        assert!(sql.contains("website = $2"));
        assert!(sql.contains("WHERE id = $3"));
        assert!(!sql.contains("description = "));
    }
}
