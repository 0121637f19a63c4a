//! Frame (envelope) codec: wire id, optional compression flag, length, and
//! payload bytes. Packet-specific encoding lives one layer up in
//! [`crate::dialect`]; this module only knows about the outer shell.

use std::io::{Read, Write};

use crate::error::Result;
use crate::gzip::{gzip_compress, gzip_decompress};
use crate::primitives::{read_u16, read_u32, read_u8, write_u16, write_u32, write_u8};

/// Build number at and after which every frame carries an explicit
/// compression-flag byte between the wire id and the length. Before this
/// build the flag is implicit: every frame is gzip-compressed.
pub const V_FRAMING_FLAG: u32 = 334;

/// Minimum payload size, in bytes, that triggers compression on dialects at
/// or above [`V_FRAMING_FLAG`]. Below this threshold the payload goes out
/// raw and the flag byte is `0`.
pub const COMPRESSION_THRESHOLD: usize = 150;

#[derive(Debug, Clone)]
pub struct Frame {
    pub wire_id: u16,
    pub payload: Vec<u8>,
}

/// Whether frames in a dialect carry an explicit compression flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingStyle {
    /// No flag byte; every frame is always gzip-compressed.
    AlwaysCompressed,
    /// A flag byte follows the wire id; compression only applies to
    /// payloads at or above [`COMPRESSION_THRESHOLD`] bytes.
    ExplicitFlag,
}

impl FramingStyle {
    pub fn for_build(build_number: u32) -> Self {
        if build_number >= V_FRAMING_FLAG {
            FramingStyle::ExplicitFlag
        } else {
            FramingStyle::AlwaysCompressed
        }
    }
}

pub fn read_frame(source: &mut impl Read, style: FramingStyle) -> Result<Frame> {
    let wire_id = read_u16(source)?;
    let compressed = match style {
        FramingStyle::AlwaysCompressed => true,
        FramingStyle::ExplicitFlag => read_u8(source)? != 0,
    };
    let length = read_u32(source)? as usize;
    let mut raw = vec![0u8; length];
    if length > 0 {
        read_exact(source, &mut raw)?;
    }
    let payload = if compressed {
        gzip_decompress(&raw)?
    } else {
        raw
    };
    Ok(Frame { wire_id, payload })
}

pub fn write_frame(sink: &mut impl Write, frame: &Frame, style: FramingStyle) -> Result<()> {
    write_u16(sink, frame.wire_id)?;
    let (compress, body): (bool, Vec<u8>) = match style {
        FramingStyle::AlwaysCompressed => (true, gzip_compress(&frame.payload)?),
        FramingStyle::ExplicitFlag => {
            if frame.payload.len() >= COMPRESSION_THRESHOLD {
                (true, gzip_compress(&frame.payload)?)
            } else {
                (false, frame.payload.clone())
            }
        }
    };
    if matches!(style, FramingStyle::ExplicitFlag) {
        write_u8(sink, compress as u8)?;
    }
    write_u32(sink, body.len() as u32)?;
    sink.write_all(&body)
        .map_err(|e| crate::error::BanchoError::SinkError(e.to_string()))?;
    Ok(())
}

fn read_exact(source: &mut impl Read, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = source
            .read(&mut buf[filled..])
            .map_err(|e| crate::error::BanchoError::SourceError(e.to_string()))?;
        if n == 0 {
            return Err(crate::error::BanchoError::eof(buf.len(), filled));
        }
        filled += n;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn always_compressed_round_trips() {
        let frame = Frame {
            wire_id: 5,
            payload: b"hello world".to_vec(),
        };
        let mut buf = Vec::new();
        write_frame(&mut buf, &frame, FramingStyle::AlwaysCompressed).unwrap();
        let mut cur = Cursor::new(buf);
        let out = read_frame(&mut cur, FramingStyle::AlwaysCompressed).unwrap();
        assert_eq!(out.wire_id, 5);
        assert_eq!(out.payload, frame.payload);
    }

    #[test]
    fn explicit_flag_leaves_small_payload_uncompressed() {
        let frame = Frame {
            wire_id: 7,
            payload: vec![1, 2, 3],
        };
        let mut buf = Vec::new();
        write_frame(&mut buf, &frame, FramingStyle::ExplicitFlag).unwrap();
        // wire_id(2) + flag(1) + length(4) + payload(3)
        assert_eq!(buf.len(), 2 + 1 + 4 + 3);
        assert_eq!(buf[2], 0);
    }

    #[test]
    fn explicit_flag_compresses_large_payload() {
        let frame = Frame {
            wire_id: 7,
            payload: vec![0x41u8; COMPRESSION_THRESHOLD],
        };
        let mut buf = Vec::new();
        write_frame(&mut buf, &frame, FramingStyle::ExplicitFlag).unwrap();
        assert_eq!(buf[2], 1);
        let mut cur = Cursor::new(buf);
        let out = read_frame(&mut cur, FramingStyle::ExplicitFlag).unwrap();
        assert_eq!(out.payload, frame.payload);
    }

    #[test]
    fn explicit_flag_boundary_is_inclusive() {
        let at_threshold = Frame {
            wire_id: 1,
            payload: vec![0u8; COMPRESSION_THRESHOLD],
        };
        let below_threshold = Frame {
            wire_id: 1,
            payload: vec![0u8; COMPRESSION_THRESHOLD - 1],
        };
        let mut buf = Vec::new();
        write_frame(&mut buf, &at_threshold, FramingStyle::ExplicitFlag).unwrap();
        assert_eq!(buf[2], 1);

        let mut buf = Vec::new();
        write_frame(&mut buf, &below_threshold, FramingStyle::ExplicitFlag).unwrap();
        assert_eq!(buf[2], 0);
    }

    #[test]
    fn empty_payload_round_trips() {
        let frame = Frame {
            wire_id: 2,
            payload: Vec::new(),
        };
        let mut buf = Vec::new();
        write_frame(&mut buf, &frame, FramingStyle::ExplicitFlag).unwrap();
        let mut cur = Cursor::new(buf);
        let out = read_frame(&mut cur, FramingStyle::ExplicitFlag).unwrap();
        assert!(out.payload.is_empty());
    }

    #[test]
    fn framing_style_switches_at_334() {
        assert_eq!(FramingStyle::for_build(333), FramingStyle::AlwaysCompressed);
        assert_eq!(FramingStyle::for_build(334), FramingStyle::ExplicitFlag);
    }
}
