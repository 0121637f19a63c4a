//! Sum type over every decoded packet shape.
//!
//! Keeping this as a closed enum (rather than `Box<dyn Any>`) makes a type
//! mismatch between what a caller expects and what a dialect actually
//! produced a plain `match` failure instead of a downcast failure, so
//! [`crate::error::BanchoError::TypeMismatch`] can be raised structurally.

use crate::model::*;

#[derive(Debug, Clone, PartialEq)]
pub enum PacketPayload {
    Empty,
    Ping,
    I32(i32),
    Text(String),
    UserStatus(UserStatus),
    UserStats(UserStats),
    UserPresence(UserPresence),
    UserInfo(UserInfo),
    UserQuit(UserQuit),
    Message(Message),
    Channel(Channel),
    BeatmapInfoRequest(BeatmapInfoRequest),
    BeatmapInfoReply(BeatmapInfoReply),
    ReplayFrameBundle(ReplayFrameBundle),
    ScoreFrame(ScoreFrame),
    Match(Match),
    MatchJoin(MatchJoin),
    TitleUpdate(TitleUpdate),
    UserIdList(Vec<i32>),
}

macro_rules! payload_accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub fn $name(&self) -> crate::error::Result<&$ty> {
            match self {
                PacketPayload::$variant(v) => Ok(v),
                _ => Err(crate::error::BanchoError::TypeMismatch {
                    canonical_id: 0,
                    reason: format!(
                        "expected {}, got {:?}",
                        stringify!($variant),
                        std::mem::discriminant(self)
                    ),
                }),
            }
        }
    };
}

impl PacketPayload {
    payload_accessor!(as_user_status, UserStatus, UserStatus);
    payload_accessor!(as_user_info, UserInfo, UserInfo);
    payload_accessor!(as_user_quit, UserQuit, UserQuit);
    payload_accessor!(as_message, Message, Message);
    payload_accessor!(as_channel, Channel, Channel);
    payload_accessor!(as_beatmap_info_request, BeatmapInfoRequest, BeatmapInfoRequest);
    payload_accessor!(as_beatmap_info_reply, BeatmapInfoReply, BeatmapInfoReply);
    payload_accessor!(as_replay_frame_bundle, ReplayFrameBundle, ReplayFrameBundle);
    payload_accessor!(as_match, Match, Match);
    payload_accessor!(as_match_join, MatchJoin, MatchJoin);
    payload_accessor!(as_title_update, TitleUpdate, TitleUpdate);
    payload_accessor!(as_user_id_list, UserIdList, Vec<i32>);
    payload_accessor!(as_score_frame, ScoreFrame, ScoreFrame);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessor_returns_type_mismatch_for_wrong_variant() {
        let payload = PacketPayload::Ping;
        assert!(payload.as_message().is_err());
    }

    #[test]
    fn accessor_returns_inner_value_for_matching_variant() {
        let payload = PacketPayload::Message(Message {
            content: "hi".into(),
            ..Default::default()
        });
        assert_eq!(payload.as_message().unwrap().content, "hi");
    }
}
