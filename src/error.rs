use thiserror::Error;

/// Error types for `DynArray` and `RawBuffer` allocation
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DynArrayError {
    /// Requested slot count cannot be represented as an allocation
    #[error("Capacity overflow: {requested} slots exceed the maximum allocation size")]
    CapacityOverflow {
        /// Number of slots requested
        requested: usize,
    },
    /// The global allocator could not satisfy the request
    #[error("Allocation failed: {size} bytes with alignment {align}")]
    AllocFailed {
        /// Size of the rejected allocation in bytes
        size: usize,
        /// Alignment of the rejected allocation
        align: usize,
    },
}
