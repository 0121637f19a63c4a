//! Function-pointer adapters between [`crate::payload::PacketPayload`] and
//! the field-level codecs in [`crate::codecs`]. One pair per packet shape,
//! reused as-is across every dialect that shares that shape; only the
//! handful of builds where the shape itself changes need a different pair.

use std::io::Cursor;

use crate::codecs::{self, Era};
use crate::error::{BanchoError, Result};
use crate::payload::PacketPayload;
use crate::primitives::{read_i32, write_i32};

fn mismatch(reason: &str) -> BanchoError {
    BanchoError::TypeMismatch {
        canonical_id: 0,
        reason: reason.to_string(),
    }
}

pub fn encode_empty(_payload: &PacketPayload, _era: Era) -> Result<Vec<u8>> {
    Ok(Vec::new())
}

pub fn decode_empty(_bytes: &[u8], _era: Era) -> Result<PacketPayload> {
    Ok(PacketPayload::Empty)
}

pub fn decode_ping(_bytes: &[u8], _era: Era) -> Result<PacketPayload> {
    Ok(PacketPayload::Ping)
}

pub fn encode_i32(payload: &PacketPayload, _era: Era) -> Result<Vec<u8>> {
    match payload {
        PacketPayload::I32(v) => {
            let mut buf = Vec::new();
            write_i32(&mut buf, *v)?;
            Ok(buf)
        }
        _ => Err(mismatch("expected I32 payload")),
    }
}

pub fn decode_i32(bytes: &[u8], _era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::I32(read_i32(&mut cur)?))
}

pub fn encode_text(payload: &PacketPayload, _era: Era) -> Result<Vec<u8>> {
    match payload {
        PacketPayload::Text(s) => {
            let mut buf = Vec::new();
            crate::primitives::write_string(&mut buf, s)?;
            Ok(buf)
        }
        _ => Err(mismatch("expected Text payload")),
    }
}

pub fn decode_text(bytes: &[u8], _era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::Text(crate::primitives::read_string(
        &mut cur,
    )?))
}

/// `FriendsList`'s wire form: a 16-bit count followed by that many
/// little-endian `i32` user ids.
pub fn encode_user_id_list(payload: &PacketPayload, _era: Era) -> Result<Vec<u8>> {
    let ids = payload.as_user_id_list()?;
    let mut buf = Vec::new();
    crate::primitives::write_list_u16_i32(&mut buf, ids)?;
    Ok(buf)
}

pub fn decode_user_id_list(bytes: &[u8], _era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::UserIdList(
        crate::primitives::read_list_u16_i32(&mut cur)?,
    ))
}

pub fn encode_user_status(payload: &PacketPayload, era: Era) -> Result<Vec<u8>> {
    let status = payload.as_user_status()?;
    let mut buf = Vec::new();
    codecs::write_user_status(&mut buf, status, era)?;
    Ok(buf)
}

pub fn decode_user_status(bytes: &[u8], era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::UserStatus(codecs::read_user_status(
        &mut cur, era,
    )?))
}

pub fn encode_score_frame(payload: &PacketPayload, era: Era) -> Result<Vec<u8>> {
    let frame = payload.as_score_frame()?;
    let mut buf = Vec::new();
    codecs::write_score_frame(&mut buf, frame, era)?;
    Ok(buf)
}

pub fn decode_score_frame(bytes: &[u8], era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::ScoreFrame(codecs::read_score_frame(
        &mut cur, era,
    )?))
}

pub fn encode_user_info_full(payload: &PacketPayload, era: Era) -> Result<Vec<u8>> {
    let user = payload.as_user_info()?;
    let mut buf = Vec::new();
    codecs::write_user_info_full(&mut buf, user, era)?;
    Ok(buf)
}

pub fn decode_user_info_full(bytes: &[u8], era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::UserInfo(codecs::read_user_info_full(
        &mut cur, era,
    )?))
}

pub fn encode_user_info_stats_only(payload: &PacketPayload, era: Era) -> Result<Vec<u8>> {
    let user = payload.as_user_info()?;
    let mut buf = Vec::new();
    codecs::write_user_info_stats_only(&mut buf, user, era)?;
    Ok(buf)
}

/// Picks the full presence+stats bundle or the lighter stats-only form
/// based on `UserStatus::update_stats`, for dialects that support both
/// (`era.completeness_byte`). Dialects that predate the distinction always
/// take the full-bundle path regardless of the flag.
pub fn encode_user_info_auto(payload: &PacketPayload, era: Era) -> Result<Vec<u8>> {
    let user = payload.as_user_info()?;
    if era.completeness_byte && user.status.update_stats {
        encode_user_info_stats_only(payload, era)
    } else {
        encode_user_info_full(payload, era)
    }
}

pub fn encode_user_presence_packet(payload: &PacketPayload, era: Era) -> Result<Vec<u8>> {
    let user = payload.as_user_info()?;
    let mut buf = Vec::new();
    codecs::write_user_presence_packet(&mut buf, user, era)?;
    Ok(buf)
}

pub fn decode_user_presence_packet(bytes: &[u8], era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::UserInfo(codecs::read_user_presence_packet(
        &mut cur, era,
    )?))
}

pub fn encode_user_quit(payload: &PacketPayload, era: Era) -> Result<Vec<u8>> {
    let quit = payload.as_user_quit()?;
    let mut buf = Vec::new();
    codecs::write_user_quit(&mut buf, quit, era)?;
    Ok(buf)
}

pub fn decode_user_quit(bytes: &[u8], era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::UserQuit(codecs::read_user_quit(
        &mut cur, era,
    )?))
}

pub fn encode_message(payload: &PacketPayload, _era: Era) -> Result<Vec<u8>> {
    let msg = payload.as_message()?;
    let mut buf = Vec::new();
    codecs::write_message(&mut buf, msg, true)?;
    Ok(buf)
}

pub fn decode_message(bytes: &[u8], _era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::Message(codecs::read_message(
        &mut cur, true,
    )?))
}

pub fn decode_message_private_legacy(bytes: &[u8], _era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::Message(codecs::read_message_private_legacy(
        &mut cur,
    )?))
}

pub fn encode_channel(payload: &PacketPayload, _era: Era) -> Result<Vec<u8>> {
    let channel = payload.as_channel()?;
    let mut buf = Vec::new();
    codecs::write_channel(&mut buf, channel)?;
    Ok(buf)
}

pub fn decode_channel(bytes: &[u8], _era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::Channel(codecs::read_channel(&mut cur)?))
}

pub fn encode_beatmap_info_request(payload: &PacketPayload, _era: Era) -> Result<Vec<u8>> {
    let req = payload.as_beatmap_info_request()?;
    let mut buf = Vec::new();
    codecs::write_beatmap_info_request(&mut buf, req)?;
    Ok(buf)
}

pub fn decode_beatmap_info_request(bytes: &[u8], _era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::BeatmapInfoRequest(
        codecs::read_beatmap_info_request(&mut cur)?,
    ))
}

pub fn encode_beatmap_info_reply(payload: &PacketPayload, era: Era) -> Result<Vec<u8>> {
    let reply = payload.as_beatmap_info_reply()?;
    let mut buf = Vec::new();
    codecs::write_beatmap_info_reply(&mut buf, reply, era.protocol_sub_version)?;
    Ok(buf)
}

pub fn decode_beatmap_info_reply(bytes: &[u8], era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::BeatmapInfoReply(
        codecs::read_beatmap_info_reply(&mut cur, era.protocol_sub_version)?,
    ))
}

pub fn encode_replay_frame_bundle(payload: &PacketPayload, era: Era) -> Result<Vec<u8>> {
    let bundle = payload.as_replay_frame_bundle()?;
    let mut buf = Vec::new();
    codecs::write_replay_frame_bundle(&mut buf, bundle, era)?;
    Ok(buf)
}

pub fn decode_replay_frame_bundle(bytes: &[u8], era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::ReplayFrameBundle(
        codecs::read_replay_frame_bundle(&mut cur, era)?,
    ))
}

pub fn encode_match(payload: &PacketPayload, era: Era) -> Result<Vec<u8>> {
    let m = payload.as_match()?;
    let mut buf = Vec::new();
    codecs::write_match(&mut buf, m, era)?;
    Ok(buf)
}

pub fn decode_match(bytes: &[u8], era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::Match(codecs::read_match(&mut cur, era)?))
}

pub fn encode_match_join(payload: &PacketPayload, _era: Era) -> Result<Vec<u8>> {
    let join = payload.as_match_join()?;
    let mut buf = Vec::new();
    codecs::write_match_join(&mut buf, join)?;
    Ok(buf)
}

pub fn decode_match_join(bytes: &[u8], _era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::MatchJoin(codecs::read_match_join(
        &mut cur,
    )?))
}

pub fn encode_title_update(payload: &PacketPayload, _era: Era) -> Result<Vec<u8>> {
    let update = payload.as_title_update()?;
    let mut buf = Vec::new();
    codecs::write_title_update(&mut buf, update)?;
    Ok(buf)
}

pub fn decode_title_update(bytes: &[u8], _era: Era) -> Result<PacketPayload> {
    let mut cur = Cursor::new(bytes);
    Ok(PacketPayload::TitleUpdate(codecs::read_title_update(
        &mut cur,
    )?))
}
