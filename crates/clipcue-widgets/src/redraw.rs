//! Fixed-cadence waveform redraws
//!
//! While media plays the bars need recolouring as the playhead moves, but not
//! on every position tick. [`spawn_redraw`] recomputes them on a tokio interval
//! and hands each result to a sink (typically a channel into the UI).
//!
//! The task lives exactly as long as its [`RedrawHandle`]: stopping or
//! dropping the handle aborts it, so a torn-down view never receives a late
//! redraw.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{RenderError, RenderResult};
use crate::theme::WaveformConfig;
use crate::waveform::{compute_bars_with_epsilon, RenderedBar};

/// Owner of a running redraw task
#[derive(Debug)]
pub struct RedrawHandle {
    task: Option<JoinHandle<()>>,
}

impl RedrawHandle {
    /// Abort the task; further calls do nothing
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            log::debug!("RedrawHandle::stop: redraw task aborted");
        }
    }

    /// True until `stop` is called or the task exits
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for RedrawHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start recomputing bars every `config.redraw_interval()`
///
/// `progress` is sampled on each tick for the played ratio; `sink` receives
/// the bars. The first redraw happens immediately.
///
/// Must be called from within a tokio runtime.
pub fn spawn_redraw<P, S>(
    config: &WaveformConfig,
    samples: Arc<[f32]>,
    progress: P,
    mut sink: S,
) -> RenderResult<RedrawHandle>
where
    P: Fn() -> f64 + Send + 'static,
    S: FnMut(Vec<RenderedBar>) + Send + 'static,
{
    if config.bar_count == 0 {
        return Err(RenderError::InvalidBarCount(0));
    }
    let runtime = tokio::runtime::Handle::try_current().map_err(|_| RenderError::NoRuntime)?;

    let bar_count = config.bar_count;
    let epsilon = config.epsilon;
    let period = config.redraw_interval();

    let task = runtime.spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match compute_bars_with_epsilon(&samples, bar_count, progress(), epsilon) {
                Ok(bars) => sink(bars),
                Err(e) => {
                    log::warn!("spawn_redraw: stopping: {}", e);
                    break;
                }
            }
        }
    });

    log::debug!("spawn_redraw: {} bars every {:?}", bar_count, period);
    Ok(RedrawHandle { task: Some(task) })
}
