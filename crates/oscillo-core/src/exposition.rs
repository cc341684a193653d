//! Exposition encoder.
//!
//! Renders a `Snapshot` as Prometheus text (0.0.4) or OpenMetrics text (1.0.0).
//! Families without any series are skipped. All families are gauges.

use std::fmt::Write;

use crate::error::{OscilloError, Result};
use crate::registry::{FamilySnapshot, Snapshot};

pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";
pub const OPENMETRICS_CONTENT_TYPE: &str =
    "application/openmetrics-text; version=1.0.0; charset=utf-8";

const TEXT_MEDIA_TYPE: &str = "text/plain";
const OPENMETRICS_MEDIA_TYPE: &str = "application/openmetrics-text";
const OPENMETRICS_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    OpenMetrics,
}

impl Format {
    pub fn content_type(self) -> &'static str {
        match self {
            Format::Text => TEXT_CONTENT_TYPE,
            Format::OpenMetrics => OPENMETRICS_CONTENT_TYPE,
        }
    }

    /// Pick a format from an `Accept` header value.
    ///
    /// The supported range with the highest `q` wins (default `q` is 1, ties go
    /// to the earlier range). OpenMetrics ranges asking for a version other
    /// than 1.0.0 are not supported. Absent headers, `*/*`, and anything
    /// unrecognized fall back to text.
    pub fn negotiate(accept: Option<&str>) -> Format {
        let Some(accept) = accept else { return Format::Text; };
        let mut best: Option<(f32, Format)> = None;
        for range in accept.split(',') {
            let mut parts = range.split(';');
            let media = parts.next().unwrap_or_default().trim();
            let mut q = 1.0f32;
            let mut version = None;
            for p in parts {
                let Some((k, v)) = p.split_once('=') else { continue; };
                let (k, v) = (k.trim(), v.trim().trim_matches('"'));
                if k.eq_ignore_ascii_case("q") {
                    q = v.parse().unwrap_or(0.0);
                } else if k.eq_ignore_ascii_case("version") {
                    version = Some(v);
                }
            }

            let format = if media.eq_ignore_ascii_case(OPENMETRICS_MEDIA_TYPE) {
                match version {
                    None | Some(OPENMETRICS_VERSION) => Format::OpenMetrics,
                    Some(_) => continue,
                }
            } else if media.eq_ignore_ascii_case(TEXT_MEDIA_TYPE) {
                Format::Text
            } else {
                continue;
            };

            if q.is_nan() || q <= 0.0 {
                continue;
            }
            match best {
                Some((best_q, _)) if best_q >= q => {}
                _ => best = Some((q, format)),
            }
        }
        best.map(|(_, f)| f).unwrap_or(Format::Text)
    }
}

/// Encode into any `fmt::Write` sink.
pub fn encode<W: Write>(snapshot: &Snapshot, format: Format, out: &mut W) -> Result<()> {
    for family in snapshot.families().iter().filter(|f| !f.series.is_empty()) {
        encode_family(family, format, out).map_err(|e| {
            OscilloError::Serialization(format!("family {}: {e}", family.name))
        })?;
    }
    if format == Format::OpenMetrics {
        out.write_str("# EOF\n")
            .map_err(|e| OscilloError::Serialization(format!("trailer: {e}")))?;
    }
    Ok(())
}

pub fn encode_to_string(snapshot: &Snapshot, format: Format) -> Result<String> {
    let mut out = String::new();
    encode(snapshot, format, &mut out)?;
    Ok(out)
}

fn encode_family<W: Write>(f: &FamilySnapshot, format: Format, out: &mut W) -> std::fmt::Result {
    if !f.help.is_empty() {
        writeln!(out, "# HELP {} {}", f.name, escape_help(&f.help, format))?;
    }
    writeln!(out, "# TYPE {} gauge", f.name)?;
    for s in &f.series {
        out.write_str(&f.name)?;
        if !f.label_names.is_empty() {
            let label_str = f
                .label_names
                .iter()
                .zip(&s.label_values)
                .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                .collect::<Vec<_>>()
                .join(",");
            write!(out, "{{{}}}", label_str)?;
        }
        writeln!(out, " {}", format_value(s.value))?;
    }
    Ok(())
}

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str, format: Format) -> String {
    let s = v.replace('\\', "\\\\").replace('\n', "\\n");
    match format {
        Format::Text => s,
        Format::OpenMetrics => s.replace('"', "\\\""),
    }
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v == f64::INFINITY {
        "+Inf".into()
    } else if v == f64::NEG_INFINITY {
        "-Inf".into()
    } else {
        v.to_string()
    }
}
