/// Slot shapes and presence-detect bounds, in microseconds.
///
/// The defaults stay inside the standard-speed 1-Wire windows: write slots of
/// at least 60us with a "1" released well within 15us, read slots sampled within
/// 15us of the falling edge, and a reset pulse longer than the 480us minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Low time of a write-1 slot
    pub write_1_low_us: u32,
    /// Released time after a write-1 slot
    pub write_1_high_us: u32,
    /// Low time of a write-0 slot
    pub write_0_low_us: u32,
    /// Released time after a write-0 slot, doubles as the inter-slot recovery
    pub write_0_high_us: u32,
    /// Low time that starts a read slot
    pub read_low_us: u32,
    /// Wait between releasing the line and sampling it
    pub read_sample_us: u32,
    /// Padding after the sample that completes the read slot
    pub read_slot_us: u32,
    /// Recovery between consecutive read slots
    pub read_recovery_us: u32,
    /// Reset pulse low time
    pub reset_low_us: u32,
    /// Wait after the reset pulse before sampling for presence
    pub presence_wait_us: u32,
    /// Number of 1us polls to wait for the presence pulse to begin
    pub presence_high_limit: u32,
    /// Number of 1us polls to wait for the presence pulse to end
    pub presence_low_limit: u32,
    /// Settle time between a successful presence check and the ROM command
    pub settle_us: u32,
    /// Gap between the two temperature bytes of a scratchpad read
    pub byte_gap_us: u32,
}

impl Timing {
    pub const STANDARD: Timing = Timing {
        write_1_low_us: 2,
        write_1_high_us: 60,
        write_0_low_us: 60,
        write_0_high_us: 2,
        read_low_us: 2,
        read_sample_us: 5,
        read_slot_us: 60,
        read_recovery_us: 2,
        reset_low_us: 750,
        presence_wait_us: 15,
        presence_high_limit: 200,
        presence_low_limit: 240,
        settle_us: 2,
        byte_gap_us: 100,
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::STANDARD
    }
}
