//! Workflow: runs one application through every stage over a single context.
//!
//! initiated → extraction → analysis → matching → screening → recommendation → completed
//!
//! Any stage error moves the context to `failed`, records the stage and message,
//! and stops. Outputs of stages that already finished are kept.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::analysis::{analyze_profile, AnalysisResult};
use crate::extraction::{extract_document, ExtractedDocument, ExtractionError, ResumeInput};
use crate::jobs::{JobStore, JobStoreError};
use crate::llm_client::JudgeHandle;
use crate::matching::{match_jobs, JobMatches};
use crate::recommendation::{recommend, FinalRecommendation};
use crate::screening::{screen_candidate, ScreeningReport};
use crate::workflow::progress::{ProgressReporter, TracingProgress};

pub mod handlers;
pub mod progress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extraction,
    Analysis,
    Matching,
    Screening,
    Recommendation,
}

/// Execution order.
pub const PIPELINE: [Stage; 5] = [
    Stage::Extraction,
    Stage::Analysis,
    Stage::Matching,
    Stage::Screening,
    Stage::Recommendation,
];

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Extraction => "extraction",
            Stage::Analysis => "analysis",
            Stage::Matching => "matching",
            Stage::Screening => "screening",
            Stage::Recommendation => "recommendation",
        }
    }

    /// Progress reported when the stage starts.
    pub fn progress(&self) -> u8 {
        match self {
            Stage::Extraction => 10,
            Stage::Analysis => 20,
            Stage::Matching => 40,
            Stage::Screening => 60,
            Stage::Recommendation => 80,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Initiated,
    InProgress,
    Completed,
    Failed,
}

impl WorkflowStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStatus::Completed | WorkflowStatus::Failed)
    }
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    JobStore(#[from] JobStoreError),

    #[error("Stage input missing: {0}")]
    MissingInput(&'static str),

    #[error("Stage task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// The aggregate threaded through every stage of one application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowContext {
    pub application_id: Uuid,
    pub resume_input: ResumeInput,
    pub status: WorkflowStatus,
    pub current_stage: Option<Stage>,
    pub extracted_data: Option<ExtractedDocument>,
    pub analysis_results: Option<AnalysisResult>,
    pub job_matches: Option<JobMatches>,
    pub screening_results: Option<ScreeningReport>,
    pub final_recommendation: Option<FinalRecommendation>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl WorkflowContext {
    pub fn new(resume_input: ResumeInput) -> Self {
        Self {
            application_id: Uuid::new_v4(),
            resume_input,
            status: WorkflowStatus::Initiated,
            current_stage: None,
            extracted_data: None,
            analysis_results: None,
            job_matches: None,
            screening_results: None,
            final_recommendation: None,
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Moves to `stage`. Ignored once terminal or when it would go backwards.
    pub fn enter(&mut self, stage: Stage) -> bool {
        if self.status.is_terminal() || self.current_stage.is_some_and(|s| s > stage) {
            return false;
        }
        self.status = WorkflowStatus::InProgress;
        self.current_stage = Some(stage);
        true
    }

    pub fn complete(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.status = WorkflowStatus::Completed;
        self.finished_at = Some(Utc::now());
    }

    /// `current_stage` is left on the stage that failed.
    pub fn fail(&mut self, err: &StageError) {
        if self.status.is_terminal() {
            return;
        }
        self.status = WorkflowStatus::Failed;
        self.error = Some(err.to_string());
        self.finished_at = Some(Utc::now());
    }
}

/// Owns the collaborators every stage needs. One instance can serve many
/// concurrent applications; each call gets its own context.
#[derive(Clone)]
pub struct Orchestrator {
    judge: JudgeHandle,
    jobs: Arc<dyn JobStore>,
    progress: Arc<dyn ProgressReporter>,
}

impl Orchestrator {
    pub fn new(judge: JudgeHandle, jobs: Arc<dyn JobStore>) -> Self {
        Self {
            judge,
            jobs,
            progress: Arc::new(TracingProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Runs every stage in order and returns the final context, completed or failed.
    pub async fn process_application(&self, input: ResumeInput) -> WorkflowContext {
        let mut ctx = WorkflowContext::new(input);
        info!("Application {} initiated", ctx.application_id);

        for stage in PIPELINE {
            if !ctx.enter(stage) {
                break;
            }
            self.progress.report(stage, stage.progress());

            if let Err(e) = self.run_stage(stage, &mut ctx).await {
                error!(
                    "Application {} failed at {}: {e}",
                    ctx.application_id,
                    stage.as_str()
                );
                ctx.fail(&e);
                return ctx;
            }
        }

        ctx.complete();
        self.progress.report(Stage::Recommendation, 100);
        info!("Application {} completed", ctx.application_id);
        ctx
    }

    async fn run_stage(&self, stage: Stage, ctx: &mut WorkflowContext) -> Result<(), StageError> {
        match stage {
            Stage::Extraction => {
                let input = ctx.resume_input.clone();
                // pdf decoding is CPU-bound
                let document = tokio::task::spawn_blocking(move || extract_document(&input)).await??;
                ctx.extracted_data = Some(document);
            }
            Stage::Analysis => {
                let document = ctx
                    .extracted_data
                    .as_ref()
                    .ok_or(StageError::MissingInput("extracted_data"))?;
                ctx.analysis_results = Some(analyze_profile(document, &self.judge).await);
            }
            Stage::Matching => {
                let analysis = ctx
                    .analysis_results
                    .as_ref()
                    .ok_or(StageError::MissingInput("analysis_results"))?;
                let matches =
                    match_jobs(&analysis.skills_analysis, self.jobs.as_ref(), &self.judge).await?;
                ctx.job_matches = Some(matches);
            }
            Stage::Screening => {
                let (Some(analysis), Some(matches)) = (&ctx.analysis_results, &ctx.job_matches)
                else {
                    return Err(StageError::MissingInput("job_matches"));
                };
                ctx.screening_results = Some(screen_candidate(analysis, matches, &self.judge).await);
            }
            Stage::Recommendation => {
                let (Some(extracted), Some(analysis), Some(matches), Some(screening)) = (
                    &ctx.extracted_data,
                    &ctx.analysis_results,
                    &ctx.job_matches,
                    &ctx.screening_results,
                ) else {
                    return Err(StageError::MissingInput("screening_results"));
                };
                ctx.final_recommendation =
                    Some(recommend(extracted, analysis, matches, screening, &self.judge).await);
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{full_run_replies, PROFILE_JSON, RESUME};
    use super::*;
    use crate::jobs::memory::fixtures::{posting, UnavailableStore};
    use crate::jobs::memory::InMemoryJobStore;
    use crate::llm_client::testing::ScriptedJudge;
    use crate::recommendation::ConfidenceLevel;
    use crate::workflow::progress::RecordingProgress;

    fn text(s: &str) -> ResumeInput {
        ResumeInput::Text {
            text: s.to_string(),
        }
    }

    fn backend_store() -> Arc<dyn JobStore> {
        Arc::new(InMemoryJobStore::new(vec![posting(
            "Backend Engineer",
            "Mid-level",
            &["Python", "SQL", "Docker"],
        )
        .with_id(1)]))
    }

    #[tokio::test]
    async fn test_full_run_completes_with_every_output() {
        let orchestrator = Orchestrator::new(ScriptedJudge::new(full_run_replies()).handle(), backend_store());
        let ctx = orchestrator.process_application(text(RESUME)).await;

        assert_eq!(ctx.status, WorkflowStatus::Completed);
        assert_eq!(ctx.current_stage, Some(Stage::Recommendation));
        assert!(ctx.error.is_none());
        assert!(ctx.finished_at.is_some());

        let extracted = ctx.extracted_data.as_ref().unwrap();
        assert_eq!(extracted.contact_info.email.as_deref(), Some("grace@example.com"));

        let analysis = ctx.analysis_results.as_ref().unwrap();
        assert_eq!(analysis.skills_analysis.years_of_experience, 3.3);

        let matches = ctx.job_matches.as_ref().unwrap();
        assert_eq!(matches.count, 1);
        assert_eq!(matches.matched_jobs[0].job.title, "Backend Engineer");

        let screening = ctx.screening_results.as_ref().unwrap();
        assert_eq!(screening.screening_summary, "Solid backend screen.");
        assert_eq!(screening.screening_score.computed_role, "Backend Engineer");

        let recommendation = ctx.final_recommendation.as_ref().unwrap();
        assert_eq!(recommendation.final_recommendation, "Advance to technical interview.");
        assert_ne!(recommendation.confidence_level, ConfidenceLevel::Low);
    }

    #[tokio::test]
    async fn test_store_failure_halts_at_matching_and_keeps_earlier_outputs() {
        let judge = ScriptedJudge::new([PROFILE_JSON]).handle();
        let orchestrator = Orchestrator::new(judge, Arc::new(UnavailableStore));
        let ctx = orchestrator.process_application(text(RESUME)).await;

        assert_eq!(ctx.status, WorkflowStatus::Failed);
        assert_eq!(ctx.current_stage, Some(Stage::Matching));
        assert_eq!(ctx.error.as_deref(), Some("Job store lock poisoned"));
        assert!(ctx.extracted_data.is_some());
        assert!(ctx.analysis_results.is_some());
        assert!(ctx.job_matches.is_none());
        assert!(ctx.screening_results.is_none());
        assert!(ctx.final_recommendation.is_none());
    }

    #[tokio::test]
    async fn test_empty_document_fails_at_extraction() {
        let orchestrator = Orchestrator::new(ScriptedJudge::new(full_run_replies()).handle(), backend_store());
        let ctx = orchestrator.process_application(text("  \n ")).await;

        assert_eq!(ctx.status, WorkflowStatus::Failed);
        assert_eq!(ctx.current_stage, Some(Stage::Extraction));
        assert!(ctx.extracted_data.is_none());
        assert!(ctx.error.unwrap().contains("no extractable text"));
    }

    #[tokio::test]
    async fn test_no_jobs_is_still_a_completed_run() {
        let judge = ScriptedJudge::new([PROFILE_JSON, "Screen.", "Recommend."]).handle();
        let orchestrator = Orchestrator::new(judge, Arc::new(InMemoryJobStore::default()));
        let ctx = orchestrator.process_application(text(RESUME)).await;

        assert_eq!(ctx.status, WorkflowStatus::Completed);
        assert_eq!(ctx.job_matches.as_ref().unwrap().count, 0);
        let screening = ctx.screening_results.as_ref().unwrap();
        assert_eq!(screening.screening_score.computed_role, "general");
    }

    #[tokio::test]
    async fn test_progress_is_reported_per_stage() {
        let progress = Arc::new(RecordingProgress::default());
        let orchestrator = Orchestrator::new(ScriptedJudge::new(full_run_replies()).handle(), backend_store())
            .with_progress(progress.clone());
        orchestrator.process_application(text(RESUME)).await;

        assert_eq!(
            progress.updates(),
            vec![
                (Stage::Extraction, 10),
                (Stage::Analysis, 20),
                (Stage::Matching, 40),
                (Stage::Screening, 60),
                (Stage::Recommendation, 80),
                (Stage::Recommendation, 100),
            ]
        );
    }

    #[tokio::test]
    async fn test_progress_stops_at_failed_stage() {
        let progress = Arc::new(RecordingProgress::default());
        let orchestrator = Orchestrator::new(ScriptedJudge::new([PROFILE_JSON]).handle(), Arc::new(UnavailableStore))
            .with_progress(progress.clone());
        orchestrator.process_application(text(RESUME)).await;

        let updates = progress.updates();
        assert_eq!(updates.last(), Some(&(Stage::Matching, 40)));
    }

    #[test]
    fn test_transitions_only_move_forward() {
        let mut ctx = WorkflowContext::new(text(RESUME));
        assert_eq!(ctx.status, WorkflowStatus::Initiated);
        assert!(ctx.enter(Stage::Analysis));
        assert!(!ctx.enter(Stage::Extraction));
        assert_eq!(ctx.current_stage, Some(Stage::Analysis));
        assert!(ctx.enter(Stage::Matching));
    }

    #[test]
    fn test_failed_is_terminal() {
        let mut ctx = WorkflowContext::new(text(RESUME));
        ctx.enter(Stage::Extraction);
        ctx.fail(&StageError::MissingInput("extracted_data"));
        assert!(!ctx.enter(Stage::Analysis));
        ctx.complete();
        assert_eq!(ctx.status, WorkflowStatus::Failed);
        assert_eq!(ctx.current_stage, Some(Stage::Extraction));
    }

    #[test]
    fn test_context_serializes_with_snake_case_states() {
        let mut ctx = WorkflowContext::new(text(RESUME));
        ctx.enter(Stage::Screening);
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["current_stage"], "screening");
        assert_eq!(json["resume_input"]["kind"], "text");
    }

    #[test]
    fn test_pipeline_is_ordered() {
        assert!(PIPELINE.windows(2).all(|w| w[0] < w[1]));
    }
}
