//! A dialect is a snapshot of everything one client build expects: how
//! packet ids are shifted on the wire, whether frames carry a compression
//! flag, and which field layout each packet type uses.
//!
//! Dialects are built once at process start by cloning the previous
//! dialect's codec table and overwriting the handful of entries that
//! changed, then frozen into the global registry. Nothing here is ever
//! mutated again after registration; per-connection knobs (`slot_size`,
//! `protocol_sub_version` overrides) are threaded through a [`Context`]
//! instead of living on the shared `Dialect`.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::codecs::Era;
use crate::error::{BanchoError, Result};
use crate::frame::FramingStyle;
use crate::model::CanonicalId;
use crate::payload::PacketPayload;
use crate::remap::Remap;

pub type Encoder = fn(&PacketPayload, Era) -> Result<Vec<u8>>;
pub type Decoder = fn(&[u8], Era) -> Result<PacketPayload>;

#[derive(Clone, Copy)]
pub struct PacketCodec {
    pub encode: Encoder,
    pub decode: Decoder,
}

#[derive(Clone)]
pub struct Dialect {
    pub build_number: u32,
    pub remap: Remap,
    pub framing: FramingStyle,
    pub default_era: Era,
    codecs: HashMap<CanonicalId, PacketCodec>,
}

impl Dialect {
    pub fn new(build_number: u32, remap: Remap, default_era: Era) -> Self {
        Dialect {
            build_number,
            remap,
            framing: FramingStyle::for_build(build_number),
            default_era,
            codecs: HashMap::new(),
        }
    }

    /// Clone `self` as the starting point for the next dialect in the
    /// chain, so the caller only has to overwrite what actually changed.
    pub fn derive(&self, build_number: u32, default_era: Era) -> Self {
        Dialect {
            build_number,
            remap: self.remap,
            framing: FramingStyle::for_build(build_number),
            default_era,
            codecs: self.codecs.clone(),
        }
    }

    pub fn register(&mut self, id: CanonicalId, codec: PacketCodec) {
        self.codecs.insert(id, codec);
    }

    pub fn supports(&self, id: CanonicalId) -> bool {
        self.codecs.contains_key(&id)
    }

    fn codec_for(&self, id: CanonicalId) -> Result<PacketCodec> {
        self.codecs.get(&id).copied().ok_or(BanchoError::UnsupportedPacket {
            canonical_id: id.wire_value(),
            build_number: self.build_number,
        })
    }

    pub fn encode(&self, id: CanonicalId, payload: &PacketPayload, ctx: &Context) -> Result<Vec<u8>> {
        let codec = self.codec_for(id)?;
        (codec.encode)(payload, ctx.era(self))
    }

    pub fn decode(&self, id: CanonicalId, bytes: &[u8], ctx: &Context) -> Result<PacketPayload> {
        let codec = self.codec_for(id)?;
        (codec.decode)(bytes, ctx.era(self))
    }

    pub fn wire_id_for(&self, id: CanonicalId) -> u16 {
        self.remap.canonical_to_wire(id)
    }

    pub fn canonical_id_for(&self, wire: u16) -> Option<CanonicalId> {
        self.remap.wire_to_canonical(wire)
    }
}

/// Per-connection overrides that must never be written back onto the
/// shared, immutable [`Dialect`]. Both fields default to the dialect's own
/// values; a server only sets them when a specific client negotiated
/// something narrower.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context {
    pub slot_size_override: Option<usize>,
    pub protocol_sub_version_override: Option<u8>,
    /// Test-only escape hatch (§8 property 7): skip padding/truncating a
    /// `Match`'s slots to the dialect's `slot_size` on encode.
    pub ignore_match_slot_size: bool,
}

impl Context {
    pub fn era(&self, dialect: &Dialect) -> Era {
        let mut era = dialect.default_era;
        if let Some(size) = self.slot_size_override {
            era.slot_size = size;
        }
        if let Some(version) = self.protocol_sub_version_override {
            era.protocol_sub_version = version;
        }
        era.ignore_match_slot_size = self.ignore_match_slot_size;
        era
    }
}

static REGISTRY: OnceLock<Vec<Dialect>> = OnceLock::new();

/// Build (if needed) and return the ordered, immutable dialect table,
/// oldest build first. Populated by [`crate::dialects::build_table`].
pub fn registry() -> &'static [Dialect] {
    REGISTRY.get_or_init(crate::dialects::build_table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::Era;

    const TEST_ERA: Era = Era {
        build_number: 282,
        protocol_sub_version: 0,
        slot_size: 8,
        wide_mods: false,
        score_checksum: false,
        hp_alias_254: false,
        completeness_byte: false,
        bool_array_slots: true,
        ignore_match_slot_size: false,
    };

    #[test]
    fn unsupported_packet_is_a_result_error_not_a_panic() {
        let dialect = Dialect::new(282, Remap::NONE, TEST_ERA);
        let ctx = Context::default();
        let err = dialect
            .encode(CanonicalId::MatchNew, &PacketPayload::Ping, &ctx)
            .unwrap_err();
        assert!(matches!(err, BanchoError::UnsupportedPacket { .. }));
    }

    #[test]
    fn derive_carries_forward_registered_codecs() {
        let mut base = Dialect::new(282, Remap::NONE, TEST_ERA);
        base.register(
            CanonicalId::Ping,
            PacketCodec {
                encode: |_, _| Ok(Vec::new()),
                decode: |_, _| Ok(PacketPayload::Ping),
            },
        );
        let next = base.derive(291, TEST_ERA);
        assert!(next.supports(CanonicalId::Ping));
    }

    #[test]
    fn context_override_replaces_default_slot_size() {
        let dialect = Dialect::new(282, Remap::NONE, TEST_ERA);
        let ctx = Context {
            slot_size_override: Some(16),
            ..Default::default()
        };
        assert_eq!(ctx.era(&dialect).slot_size, 16);
    }

    #[test]
    fn context_default_leaves_dialect_era_untouched() {
        let dialect = Dialect::new(282, Remap::NONE, TEST_ERA);
        let ctx = Context::default();
        assert_eq!(ctx.era(&dialect).slot_size, TEST_ERA.slot_size);
    }

    #[test]
    fn context_ignore_match_slot_size_defaults_off_and_is_overridable() {
        let dialect = Dialect::new(282, Remap::NONE, TEST_ERA);
        assert!(!Context::default().era(&dialect).ignore_match_slot_size);
        let ctx = Context {
            ignore_match_slot_size: true,
            ..Default::default()
        };
        assert!(ctx.era(&dialect).ignore_match_slot_size);
    }
}
