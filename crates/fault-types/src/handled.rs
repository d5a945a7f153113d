//! # Dedup Marker Protocol
//!
//! A convention for tagging an error value as "already handled" so that later
//! observers of the same error skip re-processing it.
//!
//! The marker is carried on the error value itself, not in a side table,
//! because the same instance is the unit of identity as it threads from the
//! request gate to the fallback trap.

/// Out-of-band "already handled" marker on an error value.
///
/// Marking is idempotent and must not change the value's equality or message
/// semantics. Collaborators depend on this trait rather than the concrete
/// report type.
pub trait Handled {
    /// Whether the value has already been centrally reported.
    fn is_handled(&self) -> bool;

    /// Mark the value as handled.
    ///
    /// Returns `true` if this call performed the marking, `false` if the
    /// value was already marked (a no-op).
    fn mark_handled(&self) -> bool;
}
