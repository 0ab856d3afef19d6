use super::{FrameReader, RX_BUF_LEN, RateLimitedDiagnostics};
use anyhow::Result;
use async_std::task::{self, JoinHandle};
use atomic_counter::{AtomicCounter, RelaxedCounter};
use gtpu_filter::{Frame, Verdict};
use slog::{Logger, info, warn};
use std::sync::Arc;
use stop_token::{StopSource, StopToken};
use stop_token::prelude::*;

pub mod rx_counter_indices {
    pub const RX_PKTS: usize = 0;
    pub const RX_BYTES: usize = 1;
    pub const RX_FORWARD: usize = 2;
    pub const RX_DROP: usize = 3;
    pub const RX_ABORT: usize = 4;
    pub const RX_NUM_COUNTERS: usize = 5;
}
use rx_counter_indices::*;

pub type RxCounters = [RelaxedCounter; RX_NUM_COUNTERS];

/// Point-in-time copy of the receive counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerdictStats {
    pub rx_pkts: usize,
    pub rx_bytes: usize,
    pub forwarded: usize,
    pub dropped: usize,
    pub aborted: usize,
    pub diagnostics_suppressed: usize,
}

impl VerdictStats {
    pub(super) fn snapshot(counters: &RxCounters, diagnostics: &RateLimitedDiagnostics) -> Self {
        VerdictStats {
            rx_pkts: counters[RX_PKTS].get(),
            rx_bytes: counters[RX_BYTES].get(),
            forwarded: counters[RX_FORWARD].get(),
            dropped: counters[RX_DROP].get(),
            aborted: counters[RX_ABORT].get(),
            diagnostics_suppressed: diagnostics.suppressed(),
        }
    }
}

impl std::fmt::Display for VerdictStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pkts={} bytes={} forward={} drop={} abort={} diag_suppressed={}",
            self.rx_pkts,
            self.rx_bytes,
            self.forwarded,
            self.dropped,
            self.aborted,
            self.diagnostics_suppressed
        )
    }
}

/// Classifies every frame from a source, in arrival order, and counts the verdicts.
pub struct RxPipeline {
    frame_reader: FrameReader,
    ingress_ifindex: u32,
    counters: Arc<RxCounters>,
    diagnostics: Arc<RateLimitedDiagnostics>,
}

impl RxPipeline {
    pub fn new(
        frame_reader: FrameReader,
        ingress_ifindex: u32,
        counters: Arc<RxCounters>,
        diagnostics: Arc<RateLimitedDiagnostics>,
    ) -> Self {
        Self {
            frame_reader,
            ingress_ifindex,
            counters,
            diagnostics,
        }
    }

    /// `exited` is dropped when the pipeline stops for any reason, waking every token taken
    /// from it.
    pub fn run(
        mut self,
        stop_token: StopToken,
        exited: StopSource,
        logger: Logger,
    ) -> JoinHandle<()> {
        task::spawn(async move {
            let _exited = exited;
            let mut buf = vec![0u8; RX_BUF_LEN];
            loop {
                match self
                    .handle_next_frame(&mut buf)
                    .timeout_at(stop_token.clone())
                    .await
                {
                    Ok(Ok(true)) => {}
                    Ok(Ok(false)) => {
                        info!(logger, "Frame source exhausted");
                        break;
                    }
                    Ok(Err(e)) => {
                        warn!(logger, "Exiting receive pipeline with error {e}");
                        break;
                    }
                    Err(_) => break,
                }
            }
        })
    }

    // Returns false when the source has no more frames.
    async fn handle_next_frame(&mut self, buf: &mut [u8]) -> Result<bool> {
        let Some(data) = self.frame_reader.next_frame(buf).await? else {
            return Ok(false);
        };
        self.counters[RX_PKTS].inc();
        self.counters[RX_BYTES].add(data.len());

        let frame = Frame {
            data,
            ingress_ifindex: self.ingress_ifindex,
            rx_queue_index: 0,
        };
        match gtpu_filter::classify(&frame, self.diagnostics.as_ref()) {
            Verdict::Forward => {
                self.counters[RX_FORWARD].inc();
            }
            Verdict::Drop => {
                self.counters[RX_DROP].inc();
            }
            Verdict::Abort => {
                self.counters[RX_ABORT].inc();
                self.diagnostics.abort(data.len(), self.ingress_ifindex);
            }
        }
        Ok(true)
    }
}
