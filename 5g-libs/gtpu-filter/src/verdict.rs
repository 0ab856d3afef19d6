use num_enum::{IntoPrimitive, TryFromPrimitive};

/// What the receive path should do with a frame.
///
/// Discriminants are the XDP action codes handed back to the dataplane hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u32)]
pub enum Verdict {
    /// Error path (XDP_ABORTED).  Callers count these separately from drops.
    Abort = 0,
    /// Silently discard (XDP_DROP).
    Drop = 1,
    /// Deliver to the normal network stack (XDP_PASS).
    Forward = 2,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Abort => "abort",
            Verdict::Drop => "drop",
            Verdict::Forward => "forward",
        }
    }
}

impl core::fmt::Display for Verdict {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
