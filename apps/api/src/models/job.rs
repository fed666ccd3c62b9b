use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A job posting as held by the job store. Read-only to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub experience_level: String,
    pub salary_range: Option<String>,
    pub description: String,
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub experience_level: String,
    #[serde(default)]
    pub salary_range: Option<String>,
    pub description: String,
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

impl NewJobPosting {
    pub fn with_id(self, id: i64) -> JobPosting {
        JobPosting {
            id,
            title: self.title,
            company: self.company,
            location: self.location,
            job_type: self.job_type,
            experience_level: self.experience_level,
            salary_range: self.salary_range,
            description: self.description,
            requirements: self.requirements,
            benefits: self.benefits,
        }
    }
}

/// Row shape of the `jobs` table. Requirements and benefits are JSONB arrays.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    #[sqlx(rename = "type")]
    pub job_type: String,
    pub experience_level: String,
    pub salary_range: Option<String>,
    pub description: String,
    pub requirements: Json<Vec<String>>,
    pub benefits: Option<Json<Vec<String>>>,
}

impl From<JobRow> for JobPosting {
    fn from(row: JobRow) -> Self {
        JobPosting {
            id: row.id,
            title: row.title,
            company: row.company,
            location: row.location,
            job_type: row.job_type,
            experience_level: row.experience_level,
            salary_range: row.salary_range,
            description: row.description,
            requirements: row.requirements.0,
            benefits: row.benefits.map(|b| b.0).unwrap_or_default(),
        }
    }
}
