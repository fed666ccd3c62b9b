use std::collections::BTreeSet;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::info;

use crate::jobs::{JobStore, JobStoreError};
use crate::models::candidate::ExperienceLevel;
use crate::models::job::{JobPosting, NewJobPosting};

/// Job store held in process memory. Concurrent readers share the read lock.
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<Vec<JobPosting>>,
}

impl InMemoryJobStore {
    pub fn new(jobs: Vec<JobPosting>) -> Self {
        Self {
            jobs: RwLock::new(jobs),
        }
    }

    /// Loads a JSON array of postings (without ids); ids are assigned from 1.
    pub fn from_seed_file(path: &Path) -> Result<Self, JobStoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| JobStoreError::SeedRead {
            path: path.display().to_string(),
            source,
        })?;
        let postings: Vec<NewJobPosting> = serde_json::from_str(&raw)?;
        let jobs: Vec<JobPosting> = postings
            .into_iter()
            .zip(1..)
            .map(|(posting, id)| posting.with_id(id))
            .collect();
        info!("Seeded in-memory job store with {} postings", jobs.len());
        Ok(Self::new(jobs))
    }
}

fn matches_query(job: &JobPosting, skills: &BTreeSet<String>, level: Option<ExperienceLevel>) -> bool {
    if let Some(level) = level {
        if job.experience_level != level.as_str() {
            return false;
        }
    }
    if skills.is_empty() {
        return true;
    }
    let requirements: Vec<String> = job.requirements.iter().map(|r| r.to_lowercase()).collect();
    skills
        .iter()
        .any(|skill| requirements.iter().any(|req| req.contains(skill.as_str())))
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn find(
        &self,
        skills: &BTreeSet<String>,
        level: Option<ExperienceLevel>,
    ) -> Result<Vec<JobPosting>, JobStoreError> {
        let jobs = self.jobs.read().map_err(|_| JobStoreError::Poisoned)?;
        Ok(jobs
            .iter()
            .filter(|job| matches_query(job, skills, level))
            .cloned()
            .collect())
    }

    async fn insert(&self, job: NewJobPosting) -> Result<i64, JobStoreError> {
        let mut jobs = self.jobs.write().map_err(|_| JobStoreError::Poisoned)?;
        let id = jobs.iter().map(|j| j.id).max().unwrap_or(0) + 1;
        jobs.push(job.with_id(id));
        Ok(id)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::BTreeSet;

    use async_trait::async_trait;

    use crate::jobs::{JobStore, JobStoreError};
    use crate::models::candidate::ExperienceLevel;
    use crate::models::job::{JobPosting, NewJobPosting};

    /// Every call fails, as a dead database would.
    pub struct UnavailableStore;

    #[async_trait]
    impl JobStore for UnavailableStore {
        async fn find(
            &self,
            _skills: &BTreeSet<String>,
            _level: Option<ExperienceLevel>,
        ) -> Result<Vec<JobPosting>, JobStoreError> {
            Err(JobStoreError::Poisoned)
        }

        async fn insert(&self, _job: NewJobPosting) -> Result<i64, JobStoreError> {
            Err(JobStoreError::Poisoned)
        }
    }

    pub fn posting(title: &str, level: &str, requirements: &[&str]) -> NewJobPosting {
        NewJobPosting {
            title: title.to_string(),
            company: "Acme Robotics".to_string(),
            location: "Pittsburgh".to_string(),
            job_type: "Full-time".to_string(),
            experience_level: level.to_string(),
            salary_range: Some("$100k-$140k".to_string()),
            description: format!("{title} role"),
            requirements: requirements.iter().map(|r| r.to_string()).collect(),
            benefits: vec!["Health".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::fixtures::posting;
    use super::*;

    fn skills(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    async fn store() -> InMemoryJobStore {
        let store = InMemoryJobStore::default();
        store.insert(posting("Backend", "Mid-level", &["Python", "SQL"])).await.unwrap();
        store.insert(posting("DevOps", "Senior", &["Docker", "Kubernetes"])).await.unwrap();
        store.insert(posting("Embedded", "Junior", &["C", "RTOS"])).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_find_by_level_and_skill() {
        let store = store().await;
        let jobs = store
            .find(&skills(&["python"]), Some(ExperienceLevel::MidLevel))
            .await
            .unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Backend");
    }

    #[tokio::test]
    async fn test_level_filter_can_exclude_skill_matches() {
        let store = store().await;
        let jobs = store
            .find(&skills(&["docker"]), Some(ExperienceLevel::Junior))
            .await
            .unwrap();
        assert!(jobs.is_empty());
        let unfiltered = store.find(&skills(&["docker"]), None).await.unwrap();
        assert_eq!(unfiltered.len(), 1);
    }

    #[tokio::test]
    async fn test_skill_match_is_substring_of_requirement() {
        let store = store().await;
        // "kube" is a substring of "kubernetes"
        let jobs = store.find(&skills(&["kube"]), None).await.unwrap();
        assert_eq!(jobs[0].title, "DevOps");
    }

    #[tokio::test]
    async fn test_empty_skills_returns_all_in_store_order() {
        let store = store().await;
        let jobs = store.find(&BTreeSet::new(), None).await.unwrap();
        let ids: Vec<i64> = jobs.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_seed_file_assigns_sequential_ids() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let seed = serde_json::to_string(&vec![
            posting("A", "Junior", &["python"]),
            posting("B", "Senior", &["rust"]),
        ])
        .unwrap();
        file.write_all(seed.as_bytes()).unwrap();

        let store = InMemoryJobStore::from_seed_file(file.path()).unwrap();
        let jobs = store.jobs.read().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1].id, 2);
        assert_eq!(jobs[1].title, "B");
    }

    #[test]
    fn test_missing_seed_file_is_typed_error() {
        let err = InMemoryJobStore::from_seed_file(Path::new("/nonexistent/jobs.json")).unwrap_err();
        assert!(matches!(err, JobStoreError::SeedRead { .. }));
    }
}
