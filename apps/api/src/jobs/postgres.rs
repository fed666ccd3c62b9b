use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

use crate::jobs::{JobStore, JobStoreError};
use crate::models::candidate::ExperienceLevel;
use crate::models::job::{JobPosting, JobRow, NewJobPosting};

const SELECT_JOBS: &str = r#"SELECT id, title, company, location, "type", experience_level,
    salary_range, description, requirements, benefits FROM jobs"#;

/// PostgreSQL-backed job store. Expects a `jobs` table whose `requirements` and
/// `benefits` columns are JSONB string arrays; schema management lives elsewhere.
#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub async fn connect(database_url: &str) -> Result<Self, JobStoreError> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn find(
        &self,
        skills: &BTreeSet<String>,
        level: Option<ExperienceLevel>,
    ) -> Result<Vec<JobPosting>, JobStoreError> {
        let mut query = build_find_query(skills, level);
        let rows: Vec<JobRow> = query.build_query_as().fetch_all(&self.pool).await?;
        debug!("Job query (level={:?}) returned {} rows", level, rows.len());
        Ok(rows.into_iter().map(JobPosting::from).collect())
    }

    async fn insert(&self, job: NewJobPosting) -> Result<i64, JobStoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO jobs
                (title, company, location, "type", experience_level,
                 salary_range, description, requirements, benefits)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.job_type)
        .bind(&job.experience_level)
        .bind(&job.salary_range)
        .bind(&job.description)
        .bind(Json(&job.requirements))
        .bind(Json(&job.benefits))
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted job {} ({} at {})", id, job.title, job.company);
        Ok(id)
    }
}

fn build_find_query(
    skills: &BTreeSet<String>,
    level: Option<ExperienceLevel>,
) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::<Postgres>::new(SELECT_JOBS);
    let mut has_where = false;

    if let Some(level) = level {
        query.push(" WHERE experience_level = ");
        query.push_bind(level.as_str());
        has_where = true;
    }

    if !skills.is_empty() {
        query.push(if has_where { " AND (" } else { " WHERE (" });
        let mut any_skill = query.separated(" OR ");
        for skill in skills {
            any_skill.push("requirements::text ILIKE ");
            any_skill.push_bind_unseparated(like_pattern(skill));
        }
        any_skill.push_unseparated(")");
    }

    query.push(" ORDER BY id");
    query
}

/// `%skill%` with LIKE metacharacters escaped.
fn like_pattern(skill: &str) -> String {
    let escaped = skill
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
