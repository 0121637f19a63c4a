//! Wire <-> canonical packet id remapping.
//!
//! Two wire slots have been reclaimed and reassigned meaning over the life
//! of the protocol: slot 11 (originally a standalone "irc user joined"
//! notice) and slot 51 (originally a standalone "change beatmap" request).
//! Dialects that still carry the old scheme special-case those two slots
//! and shift everything above them down by one, cascading. The widest
//! dialect retires both holes: slot 11 is `HandleOsuUpdate` directly and
//! the irc-join notice becomes a degenerate payload of that packet, and
//! slot 51 is `MatchChangeMods`, `MatchChangeBeatmap` having been fully
//! superseded by `MatchChangeSettings`.
//!
//! Forward (wire -> canonical): apply the slot-11 exception, then the
//! slot-51 exception, then shift any id above 11 down by one, then shift
//! any id above 50 down by one again.
//!
//! Reverse (canonical -> wire) undoes the same transform in the opposite
//! order; see the bucket derivation in the tests below.

use crate::model::CanonicalId;

#[derive(Debug, Clone, Copy)]
pub struct Remap {
    pub irc_join_hole: bool,
    pub match_change_beatmap_hole: bool,
}

impl Remap {
    pub const NONE: Remap = Remap {
        irc_join_hole: false,
        match_change_beatmap_hole: false,
    };

    pub const FIRST_HOLE_ONLY: Remap = Remap {
        irc_join_hole: true,
        match_change_beatmap_hole: false,
    };

    pub const BOTH_HOLES: Remap = Remap {
        irc_join_hole: true,
        match_change_beatmap_hole: true,
    };

    pub const fn both(irc_join_hole: bool, match_change_beatmap_hole: bool) -> Remap {
        Remap {
            irc_join_hole,
            match_change_beatmap_hole,
        }
    }

    /// Wire identifier actually seen on the socket -> canonical identifier.
    /// `None` means the wire slot carries no meaning in this dialect (a
    /// true hole, e.g. 6/45/84, or a shifted id that still lands outside
    /// the enumerated vocabulary).
    pub fn wire_to_canonical(self, wire: u16) -> Option<CanonicalId> {
        if self.irc_join_hole && wire == 11 {
            return Some(CanonicalId::IrcJoin);
        }
        if self.match_change_beatmap_hole && wire == 51 {
            return Some(CanonicalId::MatchChangeBeatmap);
        }
        let mut id = wire;
        if self.irc_join_hole && id > 11 {
            id -= 1;
        }
        if self.match_change_beatmap_hole && id > 50 {
            id -= 1;
        }
        CanonicalId::from_u16(id)
    }

    /// Canonical identifier -> wire identifier for this dialect.
    pub fn canonical_to_wire(self, canonical: CanonicalId) -> u16 {
        if canonical == CanonicalId::IrcJoin {
            return 11;
        }
        if canonical == CanonicalId::MatchChangeBeatmap {
            return 51;
        }
        let mut id = canonical.wire_value();
        if self.match_change_beatmap_hole && id >= 50 {
            id += 1;
        }
        if self.irc_join_hole && id >= 11 {
            id += 1;
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_holes_is_identity() {
        let r = Remap::NONE;
        for wire in [0u16, 41, 50, 70, 109] {
            assert_eq!(r.wire_to_canonical(wire).unwrap().wire_value(), wire);
        }
    }

    #[test]
    fn first_hole_only_shifts_above_eleven() {
        let r = Remap::both(true, false);
        assert_eq!(r.wire_to_canonical(11), Some(CanonicalId::IrcJoin));
        assert_eq!(r.wire_to_canonical(12).unwrap().wire_value(), 11);
        assert_eq!(r.wire_to_canonical(42).unwrap().wire_value(), 41);
        assert_eq!(r.wire_to_canonical(10).unwrap().wire_value(), 10);
    }

    #[test]
    fn both_holes_cascade() {
        let r = Remap::both(true, true);
        assert_eq!(r.wire_to_canonical(11), Some(CanonicalId::IrcJoin));
        assert_eq!(
            r.wire_to_canonical(51),
            Some(CanonicalId::MatchChangeBeatmap)
        );
        assert_eq!(r.wire_to_canonical(12).unwrap().wire_value(), 11);
        assert_eq!(r.wire_to_canonical(50).unwrap().wire_value(), 49);
        assert_eq!(r.wire_to_canonical(52).unwrap().wire_value(), 50);
        assert_eq!(r.wire_to_canonical(53).unwrap().wire_value(), 51);
    }

    #[test]
    fn round_trips_through_both_directions() {
        let r = Remap::both(true, true);
        for wire in (0u16..120).filter(|&w| w != 11 && w != 51) {
            let Some(canonical) = r.wire_to_canonical(wire) else {
                continue;
            };
            assert_eq!(r.canonical_to_wire(canonical), wire, "wire {wire}");
        }
        assert_eq!(r.canonical_to_wire(CanonicalId::IrcJoin), 11);
        assert_eq!(r.canonical_to_wire(CanonicalId::MatchChangeBeatmap), 51);
    }

    #[test]
    fn sentinels_never_appear_as_plain_wire_values() {
        let r = Remap::both(true, true);
        for wire in 0u16..120 {
            let c = r.wire_to_canonical(wire);
            if wire != 11 && wire != 51 {
                assert_ne!(c, Some(CanonicalId::IrcJoin));
                assert_ne!(c, Some(CanonicalId::MatchChangeBeatmap));
            }
        }
    }
}
