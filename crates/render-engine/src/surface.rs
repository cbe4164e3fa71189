//! Host-provided drawing surfaces.

use heatlens_common::error::HeatResult;
use heatlens_processing_core::pixel::PixelBuffer;

/// A 2-D pixel surface owned by the host.
///
/// The renderer never creates or disposes surfaces. `acquire` may fail
/// (e.g. a lost context); the failure aborts that render call only.
pub trait Surface {
    /// Borrow the drawable pixels for one render call.
    fn acquire(&mut self) -> HeatResult<&mut PixelBuffer>;
}

impl Surface for PixelBuffer {
    fn acquire(&mut self) -> HeatResult<&mut PixelBuffer> {
        Ok(self)
    }
}
