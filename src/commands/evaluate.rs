use std::path::{Path, PathBuf};
use std::process::ExitCode;

use isi_lib::{
    Comparability, Config, DeviceAttributes, DeviceReport, EvaluateOutput, EvaluationContext,
    EvaluationSet, IsiError, IsiOutput, ScoringEngine, WeightReport, ISI_OUTPUT_VERSION,
};
use serde::Deserialize;

use crate::cli::OutputFormat;
use crate::formatting::{render_error, render_payload, write_output};
use crate::settings::load_config;

#[derive(Debug, Deserialize)]
struct DeviceDocument {
    devices: Vec<DeviceEntry>,
}

#[derive(Debug, Deserialize)]
struct DeviceEntry {
    #[serde(flatten)]
    attributes: DeviceAttributes,
    #[serde(default = "default_included")]
    included: bool,
    /// Overrides the command-line profile for this device.
    #[serde(default)]
    profile: Option<String>,
}

fn default_included() -> bool {
    true
}

/// Contexts keyed by profile name, in order of first use.
#[derive(Default)]
struct ContextCache {
    contexts: Vec<(Option<String>, EvaluationContext)>,
}

impl ContextCache {
    fn get_or_build(
        &mut self,
        config: &Config,
        profile: Option<&str>,
    ) -> Result<&EvaluationContext, IsiError> {
        let position = self
            .contexts
            .iter()
            .position(|(name, _)| name.as_deref() == profile);
        let index = match position {
            Some(index) => index,
            None => {
                let selection = config.weight_selection(profile)?;
                let ctx = EvaluationContext::from_source(&selection, config.calculator())?;
                tracing::debug!(label = %ctx.label(), "built evaluation context");
                self.contexts.push((profile.map(str::to_string), ctx));
                self.contexts.len() - 1
            }
        };
        Ok(&self.contexts[index].1)
    }

    fn reports(&self) -> Vec<WeightReport> {
        self.contexts
            .iter()
            .map(|(_, ctx)| WeightReport::from(ctx.outcome()))
            .collect()
    }

    fn warnings(&self) -> Vec<String> {
        self.contexts
            .iter()
            .flat_map(|(_, ctx)| {
                let label = ctx.label();
                ctx.warnings()
                    .iter()
                    .map(move |w| format!("{label}: {w}"))
            })
            .collect()
    }
}

fn read_devices(path: &Path) -> Result<Vec<DeviceEntry>, IsiError> {
    let content = std::fs::read_to_string(path)?;
    let doc: DeviceDocument = serde_json::from_str(&content)?;
    Ok(doc.devices)
}

/// Run the evaluate command.
#[allow(clippy::too_many_arguments)]
pub fn run_evaluate(
    config_path: Option<PathBuf>,
    input: PathBuf,
    profile: Option<String>,
    min_index: Option<f64>,
    strict: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    if let Some(min) = min_index {
        if !(0.0..=10.0).contains(&min) {
            return render_error(
                IsiError::Config(format!("--min-index must be within [0, 10], got {min}")),
                format,
                output,
            );
        }
    }
    let devices = match read_devices(&input) {
        Ok(devices) => devices,
        Err(err) => return render_error(err, format, output),
    };
    tracing::debug!(count = devices.len(), input = %input.display(), "loaded devices");

    let mut cache = ContextCache::default();
    let mut set = EvaluationSet::new();
    for device in &devices {
        let device_profile = device.profile.as_deref().or(profile.as_deref());
        let evaluated = cache
            .get_or_build(&config, device_profile)
            .and_then(|ctx| ScoringEngine.evaluate(ctx, &device.attributes));
        match evaluated {
            Ok(result) => {
                set.push(result, device.included);
            }
            Err(err) => {
                let mut payload = err.to_payload();
                payload.message = format!("{}: {}", device.attributes.name, payload.message);
                return render_payload(payload, format, output);
            }
        }
    }

    let mut warnings = cache.warnings();
    let aggregate = if set.included_count() == 0 {
        if min_index.is_some() {
            return render_error(IsiError::NoEvaluationsSelected, format, output);
        }
        warnings.push("No devices included; global statistics skipped".to_string());
        None
    } else {
        let aggregated = if strict {
            set.aggregate_strict()
        } else {
            set.aggregate()
        };
        match aggregated {
            Ok(agg) => Some(agg),
            Err(err) => return render_error(err, format, output),
        }
    };

    if let Some(Comparability::Mixed { labels }) = aggregate.as_ref().map(|a| &a.comparability) {
        warnings.push(format!(
            "Devices were scored under different weights ({}); the global index mixes them",
            labels.join(", ")
        ));
    }

    let passed = match (min_index, &aggregate) {
        (Some(min), Some(agg)) => agg.global_index >= min,
        _ => true,
    };
    if !passed {
        tracing::warn!(min_index, "global index below minimum");
    }

    let body = IsiOutput::Evaluate(EvaluateOutput {
        version: ISI_OUTPUT_VERSION.to_string(),
        weights: cache.reports(),
        devices: set
            .entries()
            .iter()
            .map(|entry| DeviceReport::new(entry.result.clone(), entry.included))
            .collect(),
        recommendations: aggregate
            .as_ref()
            .map(|agg| agg.recommendations())
            .unwrap_or_default(),
        aggregate,
        min_index,
        passed,
        warnings,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(IsiError::Io(err), format, output);
    }
    exit_code_for_evaluate(passed)
}

fn exit_code_for_evaluate(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
