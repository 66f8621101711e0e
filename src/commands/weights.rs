use std::path::PathBuf;
use std::process::ExitCode;

use isi_lib::{
    IsiError, IsiOutput, WeightReport, WeightSource, WeightsOutput, ISI_OUTPUT_VERSION,
};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::load_config;

/// Run the weights command.
pub fn run_weights(
    config_path: Option<PathBuf>,
    profile: Option<String>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    let selection = match config.weight_selection(profile.as_deref()) {
        Ok(selection) => selection,
        Err(err) => return render_error(err.into(), format, output),
    };
    let outcome = match selection.weights() {
        Ok(outcome) => outcome,
        Err(err) => return render_error(err, format, output),
    };
    for warning in &outcome.warnings {
        tracing::warn!(%warning, "weight configuration");
    }

    let body = IsiOutput::Weights(WeightsOutput {
        version: ISI_OUTPUT_VERSION.to_string(),
        weights: WeightReport::from(&outcome),
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(IsiError::Io(err), format, output);
    }
    ExitCode::SUCCESS
}
