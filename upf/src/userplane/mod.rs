mod diagnostics;
mod frame_source;
mod packet_processor;
mod rx_pipeline;

use diagnostics::RateLimitedDiagnostics;
use frame_source::FrameReader;
use gtpu_filter::eth::{ETH_LEN, VLAN_LEN};
use rx_pipeline::{RxCounters, RxPipeline};

pub use frame_source::{FrameSource, parse_replay};
pub use packet_processor::PacketProcessor;
pub use rx_pipeline::VerdictStats;

// The largest IPv4 packet behind a tagged Ethernet header, so no frame is cut short whatever
// the interface MTU or offload settings.
const RX_BUF_LEN: usize = u16::MAX as usize + ETH_LEN + VLAN_LEN;
