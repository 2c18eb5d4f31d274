//! Opaque ID newtypes for architecture entities.

use dpo_common::define_id;

define_id!(
    /// Opaque, copyable ID for a placement region. Region 0 is the default
    /// region that covers everything not claimed by a fence.
    RegionId
);

impl RegionId {
    /// The default region.
    pub const DEFAULT: RegionId = RegionId(0);

    /// Returns `true` for the default region.
    pub fn is_default(self) -> bool {
        self == Self::DEFAULT
    }
}

impl Default for RegionId {
    fn default() -> Self {
        Self::DEFAULT
    }
}
