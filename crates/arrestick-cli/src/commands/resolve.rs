use crate::cli::ResolveArgs;
use crate::config::PartialArrestickConfig;
use crate::error::Result;
use arrestick::core::entries::index::EntryIndex;
use arrestick::core::models::query::ProteinQuery;
use arrestick::engine::error::{ConfigError, PredictError};
use tracing::info;

pub fn run(args: ResolveArgs) -> Result<()> {
    println!("{}", resolve(&args)?);
    Ok(())
}

fn resolve(args: &ResolveArgs) -> Result<String> {
    let partial_config = PartialArrestickConfig::locate(args.config.config.as_deref())?;
    let config = partial_config.merge_with_cli(&args.config, None)?;

    info!("Loading entry table from {:?}", config.resources.entries_path);
    let index = EntryIndex::load(&config.resources.entries_path).map_err(ConfigError::from)?;

    let query = ProteinQuery::new(&args.identifier);
    match index.resolve(query.as_str()) {
        Some(accession) => Ok(accession.to_string()),
        None => Err(PredictError::UnresolvedIdentifier {
            identifier: query.to_string(),
        }
        .into()),
    }
}
