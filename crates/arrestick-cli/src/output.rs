use crate::cli::OutputFormat;
use crate::error::{CliError, Result};
use arrestick::core::models::prediction::Prediction;
use serde::Serialize;

pub fn render(prediction: &Prediction, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(prediction)
            .map_err(|e| CliError::Output(e.to_string())),
        OutputFormat::Tsv => tab_separated(prediction.regions.iter()),
        OutputFormat::Residues => tab_separated(prediction.residues()),
    }
}

/// A short human-readable summary for stderr, so stdout stays machine-readable.
pub fn summary(prediction: &Prediction) -> String {
    let mut line = match &prediction.accession {
        Some(accession) => format!("{} ({} residues)", accession, prediction.scored.len()),
        None => format!("Sequence of {} residues", prediction.scored.len()),
    };
    line.push_str(&format!(": {} region(s)", prediction.regions.len()));
    if prediction.accession.is_some() {
        line.push_str(&format!(
            ", {} high-confidence residue(s)",
            prediction.high_confidence_count()
        ));
    }
    line
}

fn tab_separated<T, I>(rows: I) -> Result<String>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| CliError::Output(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CliError::Output(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CliError::Output(e.to_string()))
}
