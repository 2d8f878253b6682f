/// Error taxonomy of the encoder.
///
/// Every variant is a programming-contract violation: local,
/// synchronous, reported immediately. There are no transient faults
/// and no retry path — encoding either produces a valid packet or
/// fails outright.

use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum CdgError {
    /// More data than a packet (or its consumer) can carry.
    #[error("payload is {got} bytes, limit is {max}")]
    InvalidPayload { got: usize, max: usize },

    /// Tile/pixel coordinates outside the screen, or a scroll step
    /// outside its legal range.
    #[error("{what} {value} outside 0..={max}")]
    OutOfBounds {
        what: &'static str,
        value: usize,
        max: usize,
    },

    /// Palette index or color channel outside its 4-bit range, or a
    /// half-palette call given more colors than its half holds.
    #[error("{what} {value} outside palette range 0..={max}")]
    PaletteRange {
        what: &'static str,
        value: usize,
        max: usize,
    },

    /// Fewer colors than slots, with no permission to duplicate and no
    /// prior values to retain.
    #[error("{got} colors for {want} palette slots and duplication not allowed")]
    AmbiguousFill { got: usize, want: usize },
}
