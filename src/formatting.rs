use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use isi_lib::output::WeightReport;
use isi_lib::{Comparability, ErrorOutput, ErrorPayload, IsiError, IsiOutput, ISI_OUTPUT_VERSION};

use crate::cli::OutputFormat;

/// Serializes `body` in the requested format to `output`, or to stdout.
///
/// `Pretty` only renders the human summary when stdout is a terminal and no
/// file was requested; otherwise it emits indented JSON.
pub fn write_output(
    body: &IsiOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> io::Result<()> {
    let human = format == OutputFormat::Pretty && output.is_none() && io::stdout().is_terminal();
    let content = match format {
        _ if human => format_pretty(body, true),
        OutputFormat::Json => serde_json::to_string(body)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(body)?,
    };
    emit(&content, output.as_deref())
}

fn emit(content: &str, output: Option<&Path>) -> io::Result<()> {
    match output {
        Some(path) => std::fs::write(path, content),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

pub fn render_error(err: IsiError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    render_payload(err.to_payload(), format, output)
}

/// Reports a failure as an `error` document and returns exit code 2.
pub fn render_payload(
    error_payload: ErrorPayload,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    tracing::debug!(category = ?error_payload.category, message = %error_payload.message, "command failed");
    let body = IsiOutput::Error(ErrorOutput {
        version: ISI_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    let to_file = output.is_some();
    if let Err(err) = write_output(&body, format, output) {
        tracing::warn!(%err, "could not write error document");
        if to_file {
            if let Err(err) = write_output(&body, format, None) {
                tracing::warn!(%err, "could not print error document");
            }
        }
    }
    ExitCode::from(2)
}

pub fn format_pretty(body: &IsiOutput, colorize: bool) -> String {
    let format_index = |index: f64| paint(&format!("{index:.2}"), index_tone(index), colorize);

    match body {
        IsiOutput::Evaluate(out) => {
            let mut buf = String::new();
            let header = paint("[EVALUATE]", Tone::Cyan, colorize);
            writeln!(buf, "{} {} device(s)", header, out.devices.len()).ok();

            for report in &out.weights {
                format_weight_report(&mut buf, report);
            }

            writeln!(buf, "Devices:").ok();
            for device in &out.devices {
                let marker = if device.included { "x" } else { " " };
                writeln!(
                    buf,
                    "- [{marker}] {:24} {} ({})",
                    device.result.entity,
                    format_index(device.result.sustainability_index),
                    device.result.weights_label
                )
                .ok();
                for advice in &device.recommendations {
                    writeln!(buf, "      * {advice}").ok();
                }
            }

            if let Some(agg) = &out.aggregate {
                writeln!(
                    buf,
                    "Global index: {} over {} device(s)",
                    format_index(agg.global_index),
                    agg.count
                )
                .ok();
                match agg.index_std_dev {
                    Some(sd) => writeln!(buf, "Std deviation: {sd:.2}").ok(),
                    None => writeln!(buf, "Std deviation: n/a (single device)").ok(),
                };
                writeln!(buf, "Metric means:").ok();
                for (code, mean) in &agg.global_metric_mean {
                    writeln!(buf, "- {:20} {:.2}", code.name(), mean).ok();
                }
                if let Comparability::Uniform { label, .. } = &agg.comparability {
                    writeln!(buf, "Weights: {label}").ok();
                }
                if !out.recommendations.is_empty() {
                    writeln!(buf, "Recommendations:").ok();
                    for advice in &out.recommendations {
                        writeln!(buf, "- {advice}").ok();
                    }
                }
            }

            if let Some(min) = out.min_index {
                let status = if out.passed { "PASS" } else { "FAIL" };
                let status = paint(status, if out.passed { Tone::Green } else { Tone::Red }, colorize);
                writeln!(buf, "{status} (minimum index {min:.2})").ok();
            }

            if !out.warnings.is_empty() {
                writeln!(buf, "Warnings:").ok();
                for warning in &out.warnings {
                    writeln!(buf, "- {warning}").ok();
                }
            }
            buf
        }
        IsiOutput::Weights(out) => {
            let mut buf = String::new();
            let header = paint("[WEIGHTS]", Tone::Blue, colorize);
            writeln!(buf, "{header}").ok();
            format_weight_report(&mut buf, &out.weights);
            buf
        }
        IsiOutput::Error(out) => {
            let mut buf = String::new();
            let header = paint("[ERROR]", Tone::Red, colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

fn format_weight_report(buf: &mut String, report: &WeightReport) {
    writeln!(buf, "Weights: {}", report.label).ok();
    for (code, weight) in report.weights.iter() {
        let importance = report
            .importance
            .get(&code)
            .map(|i| format!("{i:?}").to_lowercase())
            .unwrap_or_default();
        writeln!(buf, "- {} {:20} {:.3} {}", code, code.name(), weight, importance).ok();
    }
    if let Some(c) = &report.consistency {
        let verdict = if c.is_acceptable() { "consistent" } else { "inconsistent" };
        writeln!(buf, "Consistency: CI {:.3}, CR {:.3} ({verdict})", c.ci, c.cr).ok();
    }
    for warning in &report.warnings {
        writeln!(buf, "Warning: {warning}").ok();
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Red = 31,
    Green = 32,
    Yellow = 33,
    Blue = 34,
    Cyan = 36,
}

fn paint(text: &str, tone: Tone, colorize: bool) -> String {
    match colorize {
        true => format!("\x1b[{}m{text}\x1b[0m", tone as u8),
        false => text.to_owned(),
    }
}

/// Green from 7, yellow from 5, red below.
fn index_tone(index: f64) -> Tone {
    match index {
        i if i >= 7.0 => Tone::Green,
        i if i >= 5.0 => Tone::Yellow,
        _ => Tone::Red,
    }
}
