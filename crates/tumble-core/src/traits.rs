use crate::raster::CharGrid;

/// Receives each finished frame.
///
/// The engine hands over an owned snapshot: the sink may keep it as long as
/// it likes, the engine's own buffer is overwritten on the next tick.
///
/// Implémenté par : `Vec<CharGrid>` (collecte) et les sinks de
/// l'application (terminal, stdout).
///
/// # Example
/// ```
/// use tumble_core::traits::FrameSink;
/// use tumble_core::raster::CharGrid;
///
/// struct CountingSink(usize);
/// impl FrameSink for CountingSink {
///     fn deliver(&mut self, _frame: CharGrid) { self.0 += 1; }
/// }
/// ```
pub trait FrameSink {
    /// Consume one complete frame.
    fn deliver(&mut self, frame: CharGrid);
}

impl FrameSink for Vec<CharGrid> {
    fn deliver(&mut self, frame: CharGrid) {
        self.push(frame);
    }
}
