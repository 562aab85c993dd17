//! Session-scoped handles and the reserved tags every object answers to.

/// Opaque, session-scoped object handle ("hvo").
///
/// Handles are not stable across sessions; an object's persistent identity
/// is its GUID.
pub type Hvo = i32;

/// Field tag ("flid"), unique across the whole schema.
pub type Flid = i32;

/// Class identifier from the meta-data catalog.
pub type ClassId = i32;

/// Writing system handle. `0` means "no writing system".
pub type Ws = i32;

/// "No object".
pub const NULL_HVO: Hvo = 0;

/// Marker left behind for an object that has been deleted.
pub const HVO_DELETED: Hvo = -42;

/// Marker for a handle that was never assigned.
pub const HVO_UNINITIALIZED: Hvo = -1;

/// Tags shared by every class (declared on the `CmObject` root).
pub mod tags {
    use super::Flid;

    /// Persistent identity of the object.
    pub const GUID: Flid = 100;
    /// Class id of the object; doubles as an existence probe.
    pub const CLASS: Flid = 101;
    /// Handle of the owning object, `0` for roots.
    pub const OWNER: Flid = 102;
    /// Tag of the owning property, `0` for roots.
    pub const OWN_FLID: Flid = 103;
    /// Position inside the owning sequence, `-1` when not in a sequence.
    pub const OWN_ORD: Flid = 104;

    /// Returns true for the reserved tags above.
    pub fn is_reserved(tag: Flid) -> bool {
        (GUID..=OWN_ORD).contains(&tag)
    }
}

/// Returns true if `hvo` could name a live object.
///
/// The null handle and both sentinels are never valid.
pub fn is_real_handle(hvo: Hvo) -> bool {
    hvo > NULL_HVO
}
