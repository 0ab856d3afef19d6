use crate::Config;
use crate::userplane::{FrameSource, PacketProcessor, VerdictStats};
use anyhow::Result;
use slog::{Logger, info};
use stop_token::StopToken;

/// Userspace host for the GTP-U classifier.  Feeds it frames from a source and keeps count of
/// the verdicts.
pub struct Upf {
    logger: Logger,
    packet_processor: PacketProcessor,
}

impl Upf {
    pub async fn start(config: Config, source: FrameSource, logger: Logger) -> Result<Self> {
        let packet_processor = PacketProcessor::new(&source, &config, &logger)?;
        info!(&logger, "Classifying frames from {:?}", source);
        Ok(Self {
            logger,
            packet_processor,
        })
    }

    pub fn stats(&self) -> VerdictStats {
        self.packet_processor.stats()
    }

    /// Resolves once no more frames will be classified.
    pub fn rx_stopped(&self) -> StopToken {
        self.packet_processor.rx_stopped()
    }

    /// Run until the frame source is exhausted.  Only a replay source ever is.
    pub async fn run_to_completion(self) -> VerdictStats {
        let stats = self.packet_processor.run_to_completion().await;
        info!(&self.logger, "Finished: {}", stats);
        stats
    }

    pub async fn graceful_shutdown(self) -> VerdictStats {
        info!(&self.logger, "Shutting down");
        let stats = self.packet_processor.shutdown().await;
        info!(&self.logger, "Final stats: {}", stats);
        stats
    }
}
