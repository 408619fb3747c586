use std::{sync::Mutex, time::Duration};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::trace;

/// Interval between two upkeep passes over the recorder's histograms.
const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

// `PrometheusBuilder::install_recorder` installs a process-wide recorder and fails on a second
// call, while tests call `init_metrics_handle` many times. The handle is cached behind a mutex
// because the initialization is fallible.
static PROMETHEUS_HANDLE: Mutex<Option<PrometheusHandle>> = Mutex::new(None);

/// Installs the Prometheus recorder once and returns a handle for rendering.
///
/// When a Tokio runtime is available, a background task periodically runs upkeep so that the
/// recorder does not grow without bound. Later calls return clones of the cached handle and the
/// `run_label` of the first call stays in effect.
pub fn init_metrics_handle(run_label: Option<&str>) -> Result<PrometheusHandle, BuildError> {
    let mut prometheus_handle = PROMETHEUS_HANDLE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(handle) = &*prometheus_handle {
        return Ok(handle.clone());
    }

    let mut builder = PrometheusBuilder::new();
    if let Some(run_label) = run_label {
        builder = builder.add_global_label("run", run_label);
    }

    let handle = builder.install_recorder()?;
    *prometheus_handle = Some(handle.clone());

    if let Ok(runtime) = tokio::runtime::Handle::try_current() {
        let upkeep_handle = handle.clone();
        runtime.spawn(async move {
            loop {
                tokio::time::sleep(UPKEEP_INTERVAL).await;
                trace!("running metrics upkeep");
                upkeep_handle.run_upkeep();
            }
        });
    }

    Ok(handle)
}
