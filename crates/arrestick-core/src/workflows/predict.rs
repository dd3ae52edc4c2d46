use crate::core::io::source::ModelSource;
use crate::core::models::prediction::Prediction;
use crate::core::models::query::ProteinQuery;
use crate::core::models::scored::ScoredSequence;
use crate::core::scoring::alphabet::ValidationError;
use crate::core::scoring::convolution::Scorer;
use crate::core::scoring::regions;
use crate::engine::cancel::CancelSignal;
use crate::engine::context::{EngineContext, ResolvedQuery};
use crate::engine::error::PredictError;
use crate::engine::fetcher::ConfidenceFetcher;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::{Stage, StageTracker};
use tracing::{debug, info, instrument};

/// Runs one query through resolution, optional confidence retrieval, scoring
/// and region extraction.
///
/// The context is only read, so any number of requests may share it. Every
/// failure surfaces as a distinct [`PredictError`] variant; nothing degrades
/// into an empty prediction.
#[instrument(skip_all, name = "predict_workflow", fields(query = %query))]
pub async fn run<S: ModelSource>(
    context: &EngineContext,
    source: &S,
    query: &ProteinQuery,
    cancel: &CancelSignal,
    reporter: &ProgressReporter<'_>,
) -> Result<Prediction, PredictError> {
    let mut stages = StageTracker::new(reporter);

    stages.advance(Stage::Validating);
    if query.is_empty() {
        return Err(reject(&mut stages, ValidationError::Empty));
    }

    stages.advance(Stage::Resolving);
    let resolved = context
        .resolve(query)
        .map_err(|e| reject(&mut stages, e))?;

    let (accession, sequence, confidence) = match resolved {
        ResolvedQuery::Accession(accession) => {
            if accession != query.as_str() {
                reporter.report(Progress::Message(format!(
                    "{} resolved to accession {}",
                    query, accession
                )));
            }
            stages.advance(Stage::Fetching);
            info!("Fetching structural confidence for {}", accession);
            let fetched = ConfidenceFetcher::new(source, context.fetch())
                .fetch(&accession, cancel, reporter)
                .await
                .map_err(|e| reject(&mut stages, e))?;
            context
                .params()
                .alphabet()
                .check(&fetched.sequence)
                .map_err(|e| reject(&mut stages, e))?;
            (Some(accession), fetched.sequence, Some(fetched.confidence))
        }
        ResolvedQuery::Sequence(sequence) => (None, sequence, None),
    };

    stages.advance(Stage::Scoring);
    let region_config = context.regions();
    let probability = Scorer::new(context.params())
        .with_trailing_fill(region_config.trailing_fill)
        .score(&sequence)
        .map_err(|e| reject(&mut stages, e))?;

    stages.advance(Stage::Extracting);
    let regions = regions::extract(
        &sequence,
        &probability,
        context.params().kernel_len(),
        region_config.threshold,
    );
    debug!(
        "Found {} region(s) at threshold {}",
        regions.len(),
        region_config.threshold
    );

    let scored = ScoredSequence::new(sequence, probability, confidence)
        .map_err(|e| PredictError::Internal(e.to_string()))?
        .with_window_length(context.params().kernel_len());
    stages.advance(Stage::Assembled);
    info!(
        "Prediction complete: {} residues, {} region(s).",
        scored.len(),
        regions.len()
    );

    Ok(Prediction::assemble(
        query.as_str(),
        accession,
        scored,
        regions,
    ))
}

fn reject(stages: &mut StageTracker<'_>, error: impl Into<PredictError>) -> PredictError {
    let error = error.into();
    debug!("Request rejected during '{}': {}", stages.current(), error);
    stages.advance(Stage::Rejected);
    error
}
