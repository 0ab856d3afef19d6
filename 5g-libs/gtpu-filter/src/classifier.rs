use crate::{BoundedView, Diagnostics, Verdict, eth};

/// Packet descriptor handed over by the dataplane hook.
///
/// `data` delimits the only memory the classifier may touch.  The interface and queue indices
/// are carried for the caller's benefit and are not consulted.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub data: &'a [u8],
    pub ingress_ifindex: u32,
    pub rx_queue_index: u32,
}

impl<'a> Frame<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            ingress_ifindex: 0,
            rx_queue_index: 0,
        }
    }
}

/// Classify one received frame.
///
/// Stateless: the same bytes always give the same verdict, whatever `diagnostics` does.
pub fn classify<D: Diagnostics + ?Sized>(frame: &Frame, diagnostics: &D) -> Verdict {
    let view = BoundedView::new(frame.data);
    eth::handle(&view, diagnostics)
}

/// Classify a bare buffer with diagnostics disabled.
pub fn classify_bytes(data: &[u8]) -> Verdict {
    classify(&Frame::new(data), &())
}
