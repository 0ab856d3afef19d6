mod frame_builder;

pub use frame_builder::{FrameBuilder, GTP_MESSAGE_TYPE_GPU, GTPU_PORT, non_ip_frame};
