use super::{FrameReader, FrameSource, RateLimitedDiagnostics, RxCounters, RxPipeline, VerdictStats};
use crate::Config;
use anyhow::Result;
use async_std::task::JoinHandle;
use slog::{Logger, info, o, warn};
use std::sync::Arc;
use std::time::Duration;
use stop_token::prelude::*;
use stop_token::{StopSource, StopToken};

pub struct PacketProcessor {
    counters: Arc<RxCounters>,
    diagnostics: Arc<RateLimitedDiagnostics>,
    stop_source: StopSource,
    rx_exited: StopToken,
    rx_task: JoinHandle<()>,
    stats_task: JoinHandle<()>,
}

impl PacketProcessor {
    pub fn new(source: &FrameSource, config: &Config, logger: &Logger) -> Result<Self> {
        // Open the frame source.
        let (frame_reader, ingress_ifindex) = FrameReader::open(source, logger)?;

        let counters = Arc::new(RxCounters::default());
        let diagnostics = Arc::new(RateLimitedDiagnostics::new(
            &config.diagnostics,
            logger.new(o!("diag" => 1)),
        ));
        let stop_source = StopSource::new();

        // Start the receive pipeline.
        let rx_pipeline = RxPipeline::new(
            frame_reader,
            ingress_ifindex,
            counters.clone(),
            diagnostics.clone(),
        );
        let rx_exited = StopSource::new();
        let rx_exited_token = rx_exited.token();
        let rx_task = rx_pipeline.run(stop_source.token(), rx_exited, logger.clone());

        // Spawn the stats task
        let stats_task = async_std::task::spawn(dump_stats(
            logger.clone(),
            counters.clone(),
            diagnostics.clone(),
            config.stats_interval(),
            stop_source.token(),
        ));

        Ok(PacketProcessor {
            counters,
            diagnostics,
            stop_source,
            rx_exited: rx_exited_token,
            rx_task,
            stats_task,
        })
    }

    pub fn stats(&self) -> VerdictStats {
        VerdictStats::snapshot(&self.counters, &self.diagnostics)
    }

    /// Resolves once the receive pipeline has stopped, whether the source ran dry, failed or
    /// was shut down.
    pub fn rx_stopped(&self) -> StopToken {
        self.rx_exited.clone()
    }

    /// Wait for the frame source to run dry, then stop.
    pub async fn run_to_completion(self) -> VerdictStats {
        let PacketProcessor {
            counters,
            diagnostics,
            stop_source,
            rx_task,
            stats_task,
            ..
        } = self;
        rx_task.await;
        drop(stop_source);
        stats_task.await;
        VerdictStats::snapshot(&counters, &diagnostics)
    }

    pub async fn shutdown(self) -> VerdictStats {
        let PacketProcessor {
            counters,
            diagnostics,
            stop_source,
            rx_task,
            stats_task,
            ..
        } = self;
        drop(stop_source);
        rx_task.await;
        stats_task.await;
        VerdictStats::snapshot(&counters, &diagnostics)
    }
}

async fn dump_stats(
    logger: Logger,
    counters: Arc<RxCounters>,
    diagnostics: Arc<RateLimitedDiagnostics>,
    interval: Duration,
    stop_token: StopToken,
) {
    let mut last = VerdictStats::default();

    loop {
        if async_std::task::sleep(interval)
            .timeout_at(stop_token.clone())
            .await
            .is_err()
        {
            break;
        }
        let current = VerdictStats::snapshot(&counters, &diagnostics);

        if current.rx_pkts != last.rx_pkts {
            info!(
                &logger,
                "RX pkts={} bytes={} forward={}",
                current.rx_pkts,
                current.rx_bytes,
                current.forwarded
            );
        }

        if current.dropped != last.dropped
            || current.aborted != last.aborted
            || current.diagnostics_suppressed != last.diagnostics_suppressed
        {
            warn!(
                &logger,
                "RX DROPS drop={} abort={} diag_suppressed={}",
                current.dropped,
                current.aborted,
                current.diagnostics_suppressed
            );
        }

        last = current;
    }
}
