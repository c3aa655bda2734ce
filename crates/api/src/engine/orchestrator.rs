//! The per-(video, hand) analysis state machine.
//!
//! States: none -> processing -> {completed | error}. A re-analyze
//! request forces any state back through none.
//!
//! There is no in-process locking here. The store's unique constraint on
//! (video_id, hand_choice), reached through the conditional insert and
//! the transactional replace, is the arbiter for concurrent starts: the
//! loser of a race sees zero inserted rows and gets a conflict, never a
//! second scoring run for the same pair.

use swinglab_core::artifacts;
use swinglab_core::error::CoreError;
use swinglab_core::hand::Hand;
use swinglab_core::status::{AnalysisStatus, VideoStatus};
use swinglab_core::types::DbId;
use swinglab_db::models::analysis::{Analysis, CompleteAnalysis, StartAnalysis};
use swinglab_db::repositories::{AnalysisRepo, VideoRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Run (or short-circuit) one analysis for a (video, hand) pair.
///
/// Blocks the calling task for the whole scoring run, up to the scoring
/// client's timeout. On scoring failure the error state is persisted on
/// both rows before the error is returned to the caller.
pub async fn start_analysis(
    state: &AppState,
    video_id: DbId,
    input: &StartAnalysis,
) -> AppResult<Analysis> {
    let video = VideoRepo::find_by_id(&state.pool, video_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id: video_id,
        }))?;

    let analysis = if input.re_analyze {
        let (prior, fresh) = AnalysisRepo::replace(&state.pool, video_id, input.hand).await?;
        if let Some(prior) = prior {
            let removed = artifacts::remove_manifest(
                &state.config.storage_root,
                prior.output_arr.as_ref(),
            )
            .await;
            tracing::info!(
                video_id,
                hand = %input.hand,
                removed,
                "discarded prior analysis and its segment artifacts",
            );
        }
        fresh
    } else {
        if let Some(existing) =
            AnalysisRepo::find_by_video_and_hand(&state.pool, video_id, input.hand).await?
        {
            if existing.status == AnalysisStatus::Completed.as_str() {
                tracing::debug!(
                    video_id,
                    hand = %input.hand,
                    "analysis already completed, returning existing result",
                );
                return Ok(existing);
            }
        }

        AnalysisRepo::create_if_absent(&state.pool, video_id, input.hand)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(format!(
                    "an analysis for video {video_id} ({}) already exists; \
                     pass re_analyze to discard it",
                    input.hand
                )))
            })?
    };

    // Recorded unconditionally, independent of any in-flight run for the
    // other hand.
    VideoRepo::set_status(&state.pool, video_id, VideoStatus::Processing).await?;

    let video_path = artifacts::resolve(&state.config.storage_root, &video.file_path);

    match state.scoring.score(&video_path, input.hand).await {
        Ok(result) => {
            let outcome = CompleteAnalysis {
                case_arr: result.case_arr,
                score_arr: result.score_arr,
                output_arr: result.output_arr,
                average_score: result.average_score,
                suggestions: result.suggestions,
            };
            let analysis =
                AnalysisRepo::finalize_success(&state.pool, analysis.id, video_id, &outcome)
                    .await?;
            tracing::info!(
                video_id,
                hand = %input.hand,
                average_score = outcome.average_score,
                "analysis completed",
            );
            Ok(analysis)
        }
        Err(e) => {
            tracing::error!(video_id, hand = %input.hand, error = %e, "scoring run failed");
            AnalysisRepo::finalize_failure(
                &state.pool,
                analysis.id,
                video_id,
                &format!("analysis failed: {e}"),
            )
            .await?;
            Err(AppError::Scoring(e))
        }
    }
}

/// Delete one analysis run and its segment artifacts.
pub async fn delete_analysis(state: &AppState, video_id: DbId, hand: Hand) -> AppResult<()> {
    let removed = AnalysisRepo::delete_by_video_and_hand(&state.pool, video_id, hand)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Analysis",
            id: video_id,
        }))?;

    let removed_files =
        artifacts::remove_manifest(&state.config.storage_root, removed.output_arr.as_ref()).await;
    tracing::info!(
        video_id,
        hand = %hand,
        removed_files,
        "analysis deleted",
    );
    Ok(())
}
