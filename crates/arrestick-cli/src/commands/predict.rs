use crate::cli::PredictArgs;
use crate::config::PartialArrestickConfig;
use crate::error::Result;
use crate::output;
use crate::utils::progress::CliProgressHandler;
use arrestick::core::io::source::OfflineSource;
use arrestick::core::models::prediction::Prediction;
use arrestick::core::models::query::ProteinQuery;
use arrestick::engine::cancel::CancelSignal;
use arrestick::engine::context::EngineContext;
use arrestick::engine::progress::ProgressReporter;
use arrestick::workflows;
use tracing::info;

pub async fn run(args: PredictArgs, cancel: CancelSignal, show_progress: bool) -> Result<()> {
    let progress = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };

    let result = predict(&args, &cancel, &progress).await;
    progress.finish();
    let prediction = result?;

    eprintln!("{}", output::summary(&prediction));
    println!("{}", output::render(&prediction, args.format)?.trim_end());
    Ok(())
}

async fn predict(
    args: &PredictArgs,
    cancel: &CancelSignal,
    progress: &CliProgressHandler,
) -> Result<Prediction> {
    let partial_config = PartialArrestickConfig::locate(args.config.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args.config, Some(&args.tuning))?;

    let context = EngineContext::load(&config)?;
    let query = ProteinQuery::new(&args.query.join(""));
    let reporter = ProgressReporter::with_callback(progress.get_callback());

    info!("Invoking the prediction workflow for '{}'", query);
    let prediction = if config.fetch.enabled {
        let client = config.fetch.client()?;
        workflows::predict::run(&context, &client, &query, cancel, &reporter).await?
    } else {
        info!("AlphaFold DB access is disabled; no HTTP client is created.");
        workflows::predict::run(&context, &OfflineSource, &query, cancel, &reporter).await?
    };
    Ok(prediction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::error::CliError;
    use arrestick::core::io::source::RetrievalError;
    use arrestick::engine::error::PredictError;
    use clap::Parser;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_resources(dir: &Path) -> (String, String) {
        let params = dir.join("model_params.toml");
        let entries = dir.join("uniprot_entries.tsv");
        fs::write(
            &params,
            "[model_1]\nkernel_weights = [1.0, 1.0]\nconv_bias = 0.0\n\
             sigmoid_weight = 1.0\nsigmoid_bias = 0.0\n[model_1.aa_dict]\nA = 1.0\nB = -1.0\n",
        )
        .unwrap();
        fs::write(&entries, "Entry\tEntry Name\nP49407\tARRB1_HUMAN\n").unwrap();
        (
            params.to_string_lossy().into_owned(),
            entries.to_string_lossy().into_owned(),
        )
    }

    fn args(extra: &[&str]) -> PredictArgs {
        let mut argv = vec!["arrestick", "predict"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Predict(args) => args,
            _ => panic!("Expected 'predict' subcommand"),
        }
    }

    #[tokio::test]
    async fn literal_sequence_is_predicted_offline() {
        let dir = tempdir().unwrap();
        let (params, entries) = write_resources(dir.path());
        let args = args(&[
            "A", "A B", "--params", &params, "--entries", &entries, "--no-confidence",
        ]);

        let prediction = predict(&args, &CancelSignal::never(), &CliProgressHandler::hidden())
            .await
            .unwrap();

        assert_eq!(prediction.sequence(), "AAB");
        assert_eq!(prediction.regions.len(), 1);
        assert_eq!(prediction.regions[0].end, 3);
    }

    #[tokio::test]
    async fn accession_fails_distinctly_when_offline() {
        let dir = tempdir().unwrap();
        let (params, entries) = write_resources(dir.path());
        let args = args(&[
            "arrb1_human", "--params", &params, "--entries", &entries, "--no-confidence",
        ]);

        let result = predict(&args, &CancelSignal::never(), &CliProgressHandler::hidden()).await;
        assert!(matches!(
            result,
            Err(CliError::Prediction(PredictError::Retrieval(
                RetrievalError::Disabled { .. }
            )))
        ));
    }

    #[tokio::test]
    async fn missing_parameter_file_is_a_setup_error() {
        let dir = tempdir().unwrap();
        let (_, entries) = write_resources(dir.path());
        let absent = dir.path().join("absent.toml");
        let args = args(&[
            "AAB",
            "--params",
            absent.to_str().unwrap(),
            "--entries",
            &entries,
        ]);

        let result = predict(&args, &CancelSignal::never(), &CliProgressHandler::hidden()).await;
        assert!(matches!(result, Err(CliError::Setup(_))));
    }
}
