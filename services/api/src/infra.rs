use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Command-line parser for rupee amounts such as `--final-ctc 1200000`.
pub(crate) fn parse_amount(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .replace(',', "")
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as an amount ({err})"))?;

    if !value.is_finite() || value < 0.0 {
        return Err(format!("amount '{raw}' must be a non-negative number"));
    }
    Ok(value)
}
