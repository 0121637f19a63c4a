//! Stable, version-independent data model and canonical packet vocabulary.
//!
//! These are the types the caller sees. None of them know which dialect
//! produced or will consume them; fields a given dialect cannot carry are
//! silently dropped on encode and reset to a documented default on decode.

use bitflags::bitflags;

// ============================================================
// Canonical packet identifiers
// ============================================================

/// A version-independent packet identifier. Numeric values match the final
/// (widest) dialect's wire numbering; earlier dialects remap to and from
/// these through [`crate::remap::Remap`].
///
/// `IrcJoin` and `MatchChangeBeatmap` are sentinels: no dialect ever puts
/// these literal values on the wire. See [`crate::remap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum CanonicalId {
    SendUserStatus = 0,
    SendIrcMessage = 1,
    Exit = 2,
    RequestStatusUpdate = 3,
    Pong = 4,
    LoginReply = 5,
    SendMessage = 7,
    Ping = 8,
    HandleIrcChangeUsername = 9,
    HandleIrcQuit = 10,
    HandleOsuUpdate = 11,
    HandleOsuQuit = 12,
    SpectatorJoined = 13,
    SpectatorLeft = 14,
    SpectateFrames = 15,
    StartSpectating = 16,
    StopSpectating = 17,
    SpectateFramesRequest = 18,
    VersionUpdate = 19,
    ErrorReport = 20,
    CantSpectate = 21,
    SpectatorCantSpectate = 22,
    GetAttention = 23,
    Announce = 24,
    SendIrcMessagePrivate = 25,
    MatchUpdate = 26,
    MatchNew = 27,
    MatchDisband = 28,
    LobbyPart = 29,
    LobbyJoin = 30,
    MatchCreate = 31,
    MatchJoin = 32,
    MatchPart = 33,
    BanchoLobbyJoin = 34,
    BanchoLobbyPart = 35,
    MatchJoinSuccess = 36,
    MatchJoinFail = 37,
    MatchChangeSlot = 38,
    MatchReady = 39,
    MatchLock = 40,
    MatchChangeSettings = 41,
    FellowSpectatorJoined = 42,
    FellowSpectatorLeft = 43,
    MatchStartRequest = 44,
    MatchStart = 46,
    MatchScoreUpdateRequest = 47,
    MatchScoreUpdate = 48,
    MatchCompleteRequest = 49,
    MatchTransferHost = 50,
    MatchChangeMods = 51,
    MatchLoadComplete = 52,
    MatchAllPlayersLoaded = 53,
    MatchNoBeatmap = 54,
    MatchNotReady = 55,
    MatchFailed = 56,
    MatchPlayerFailed = 57,
    MatchComplete = 58,
    MatchHasBeatmap = 59,
    MatchSkipRequest = 60,
    MatchSkip = 61,
    Unauthorized = 62,
    ChannelJoin = 63,
    ChannelJoinSuccess = 64,
    ChannelAvailable = 65,
    ChannelRevoked = 66,
    ChannelAvailableAutojoin = 67,
    BeatmapInfoRequest = 68,
    BeatmapInfoReply = 69,
    MatchTransferHostRequest = 70,
    LoginPermissions = 71,
    FriendsList = 72,
    FriendsAdd = 73,
    FriendsRemove = 74,
    ProtocolNegotiation = 75,
    TitleUpdate = 76,
    MatchChangeTeam = 77,
    ChannelLeave = 78,
    ReceiveUpdates = 79,
    Monitor = 80,
    MatchPlayerSkipped = 81,
    SetIrcAwayMessage = 82,
    UserPresence = 83,
    UserStatsRequest = 85,
    Restart = 86,
    Invite = 87,
    BanchoInvite = 88,
    ChannelInfoComplete = 89,
    MatchChangePasswordRequest = 90,
    MatchChangePassword = 91,
    SilenceInfo = 92,
    TournamentMatchInfo = 93,
    UserSilenced = 94,
    UserPresenceSingle = 95,
    UserPresenceBundle = 96,
    PresenceRequest = 97,
    PresenceRequestAll = 98,
    ChangeFriendOnlyDMs = 99,
    UserDMsBlocked = 100,
    TargetIsSilenced = 101,
    VersionUpdateForced = 102,
    SwitchServer = 103,
    AccountRestricted = 104,
    RTX = 105,
    MatchAbort = 106,
    SwitchTournamentServer = 107,
    TournamentJoinMatchChannel = 108,
    TournamentLeaveMatchChannel = 109,

    /// Out-of-band: an IRC user joined. Never appears on the wire as this
    /// literal value; the remap redirects it to a real slot, or (in the
    /// widest dialects) folds it into [`CanonicalId::HandleOsuUpdate`] as a
    /// degenerate payload.
    IrcJoin = 0xFFFF,
    /// Out-of-band: client asked to change the match beatmap. Superseded by
    /// [`CanonicalId::MatchChangeSettings`] in later dialects.
    MatchChangeBeatmap = 0xFFFE,
}

impl CanonicalId {
    pub fn wire_value(self) -> u16 {
        self as u16
    }

    /// Inverse of [`CanonicalId::wire_value`] restricted to the enumerated
    /// vocabulary. Numbers that were never assigned a meaning (holes like
    /// 6, 45, 84) return `None`, as do the two out-of-band sentinels --
    /// those never arise from a plain numeric lookup.
    pub fn from_u16(v: u16) -> Option<CanonicalId> {
        use CanonicalId::*;
        Some(match v {
            0 => SendUserStatus,
            1 => SendIrcMessage,
            2 => Exit,
            3 => RequestStatusUpdate,
            4 => Pong,
            5 => LoginReply,
            7 => SendMessage,
            8 => Ping,
            9 => HandleIrcChangeUsername,
            10 => HandleIrcQuit,
            11 => HandleOsuUpdate,
            12 => HandleOsuQuit,
            13 => SpectatorJoined,
            14 => SpectatorLeft,
            15 => SpectateFrames,
            16 => StartSpectating,
            17 => StopSpectating,
            18 => SpectateFramesRequest,
            19 => VersionUpdate,
            20 => ErrorReport,
            21 => CantSpectate,
            22 => SpectatorCantSpectate,
            23 => GetAttention,
            24 => Announce,
            25 => SendIrcMessagePrivate,
            26 => MatchUpdate,
            27 => MatchNew,
            28 => MatchDisband,
            29 => LobbyPart,
            30 => LobbyJoin,
            31 => MatchCreate,
            32 => MatchJoin,
            33 => MatchPart,
            34 => BanchoLobbyJoin,
            35 => BanchoLobbyPart,
            36 => MatchJoinSuccess,
            37 => MatchJoinFail,
            38 => MatchChangeSlot,
            39 => MatchReady,
            40 => MatchLock,
            41 => MatchChangeSettings,
            42 => FellowSpectatorJoined,
            43 => FellowSpectatorLeft,
            44 => MatchStartRequest,
            46 => MatchStart,
            47 => MatchScoreUpdateRequest,
            48 => MatchScoreUpdate,
            49 => MatchCompleteRequest,
            50 => MatchTransferHost,
            51 => MatchChangeMods,
            52 => MatchLoadComplete,
            53 => MatchAllPlayersLoaded,
            54 => MatchNoBeatmap,
            55 => MatchNotReady,
            56 => MatchFailed,
            57 => MatchPlayerFailed,
            58 => MatchComplete,
            59 => MatchHasBeatmap,
            60 => MatchSkipRequest,
            61 => MatchSkip,
            62 => Unauthorized,
            63 => ChannelJoin,
            64 => ChannelJoinSuccess,
            65 => ChannelAvailable,
            66 => ChannelRevoked,
            67 => ChannelAvailableAutojoin,
            68 => BeatmapInfoRequest,
            69 => BeatmapInfoReply,
            70 => MatchTransferHostRequest,
            71 => LoginPermissions,
            72 => FriendsList,
            73 => FriendsAdd,
            74 => FriendsRemove,
            75 => ProtocolNegotiation,
            76 => TitleUpdate,
            77 => MatchChangeTeam,
            78 => ChannelLeave,
            79 => ReceiveUpdates,
            80 => Monitor,
            81 => MatchPlayerSkipped,
            82 => SetIrcAwayMessage,
            83 => UserPresence,
            85 => UserStatsRequest,
            86 => Restart,
            87 => Invite,
            88 => BanchoInvite,
            89 => ChannelInfoComplete,
            90 => MatchChangePasswordRequest,
            91 => MatchChangePassword,
            92 => SilenceInfo,
            93 => TournamentMatchInfo,
            94 => UserSilenced,
            95 => UserPresenceSingle,
            96 => UserPresenceBundle,
            97 => PresenceRequest,
            98 => PresenceRequestAll,
            99 => ChangeFriendOnlyDMs,
            100 => UserDMsBlocked,
            101 => TargetIsSilenced,
            102 => VersionUpdateForced,
            103 => SwitchServer,
            104 => AccountRestricted,
            105 => RTX,
            106 => MatchAbort,
            107 => SwitchTournamentServer,
            108 => TournamentJoinMatchChannel,
            109 => TournamentLeaveMatchChannel,
            _ => return None,
        })
    }
}

// ============================================================
// Enumerations
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Idle,
    Afk,
    Playing,
    Editing,
    Modding,
    Multiplayer,
    Watching,
    Unknown,
    Testing,
    Submitting,
    StatsUpdate,
    Lobby,
    Multiplaying,
    OsuDirect,
    /// A wire value outside the enumerated set. Preserved, not an error.
    Other(u8),
}

impl UserAction {
    pub fn from_wire(v: u8) -> Self {
        match v {
            0 => UserAction::Idle,
            1 => UserAction::Afk,
            2 => UserAction::Playing,
            3 => UserAction::Editing,
            4 => UserAction::Modding,
            5 => UserAction::Multiplayer,
            6 => UserAction::Watching,
            7 => UserAction::Unknown,
            8 => UserAction::Testing,
            9 => UserAction::Submitting,
            10 => UserAction::StatsUpdate,
            11 => UserAction::Lobby,
            12 => UserAction::Multiplaying,
            13 => UserAction::OsuDirect,
            other => UserAction::Other(other),
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            UserAction::Idle => 0,
            UserAction::Afk => 1,
            UserAction::Playing => 2,
            UserAction::Editing => 3,
            UserAction::Modding => 4,
            UserAction::Multiplayer => 5,
            UserAction::Watching => 6,
            UserAction::Unknown => 7,
            UserAction::Testing => 8,
            UserAction::Submitting => 9,
            UserAction::StatsUpdate => 10,
            UserAction::Lobby => 11,
            UserAction::Multiplaying => 12,
            UserAction::OsuDirect => 13,
            UserAction::Other(v) => v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Osu,
    Taiko,
    Catch,
    Mania,
}

impl GameMode {
    pub fn from_wire(v: u8) -> Self {
        match v {
            1 => GameMode::Taiko,
            2 => GameMode::Catch,
            3 => GameMode::Mania,
            _ => GameMode::Osu,
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            GameMode::Osu => 0,
            GameMode::Taiko => 1,
            GameMode::Catch => 2,
            GameMode::Mania => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitState {
    Gone,
    OsuRemaining,
    IrcRemaining,
}

impl QuitState {
    pub fn to_wire(self) -> u8 {
        match self {
            QuitState::Gone => 0,
            QuitState::OsuRemaining => 1,
            QuitState::IrcRemaining => 2,
        }
    }

    pub fn from_wire(v: u8) -> Self {
        match v {
            1 => QuitState::OsuRemaining,
            2 => QuitState::IrcRemaining,
            _ => QuitState::Gone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTeam {
    Neutral,
    Blue,
    Red,
}

impl SlotTeam {
    pub fn from_wire(v: u8) -> Self {
        match v {
            1 => SlotTeam::Blue,
            2 => SlotTeam::Red,
            _ => SlotTeam::Neutral,
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            SlotTeam::Neutral => 0,
            SlotTeam::Blue => 1,
            SlotTeam::Red => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankedStatus {
    Pending,
    Ranked,
    Approved,
    Qualified,
    Other(i8),
}

impl RankedStatus {
    pub fn from_wire(v: i8) -> Self {
        match v {
            0 => RankedStatus::Pending,
            1 => RankedStatus::Ranked,
            2 => RankedStatus::Approved,
            3 => RankedStatus::Qualified,
            other => RankedStatus::Other(other),
        }
    }

    pub fn to_wire(self) -> i8 {
        match self {
            RankedStatus::Pending => 0,
            RankedStatus::Ranked => 1,
            RankedStatus::Approved => 2,
            RankedStatus::Qualified => 3,
            RankedStatus::Other(v) => v,
        }
    }

    pub fn is_ranked(self) -> bool {
        matches!(self, RankedStatus::Ranked | RankedStatus::Approved)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Mods: u32 {
        const NO_FAIL      = 1 << 0;
        const EASY         = 1 << 1;
        const NO_VIDEO     = 1 << 2;
        const HIDDEN       = 1 << 3;
        const HARD_ROCK    = 1 << 4;
        const SUDDEN_DEATH = 1 << 5;
        const DOUBLE_TIME  = 1 << 6;
        const RELAX        = 1 << 7;
        const HALF_TIME    = 1 << 8;
        const NIGHTCORE    = 1 << 9;
        const FLASHLIGHT   = 1 << 10;
        const AUTOPLAY     = 1 << 11;
        const SPUN_OUT     = 1 << 12;
        const AUTOPILOT    = 1 << 13;
        const PERFECT      = 1 << 14;
        const KEY4         = 1 << 15;
        const KEY5         = 1 << 16;
        const KEY6         = 1 << 17;
        const KEY7         = 1 << 18;
        const KEY8         = 1 << 19;
        const FADE_IN      = 1 << 20;
        const RANDOM       = 1 << 21;
        const CINEMA       = 1 << 22;
        const TARGET       = 1 << 23;
        const KEY9         = 1 << 24;
        const KEY_COOP     = 1 << 25;
        const KEY1         = 1 << 26;
        const KEY3         = 1 << 27;
        const KEY2         = 1 << 28;
        const SCORE_V2     = 1 << 29;
        const MIRROR       = 1 << 30;
        const _ = !0;
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Permissions: u8 {
        const REGULAR    = 1 << 0;
        const BAT        = 1 << 1;
        const SUPPORTER  = 1 << 2;
        const FRIEND     = 1 << 3;
        const PEPPY      = 1 << 4;
        const TOURNAMENT = 1 << 5;
        const _ = !0;
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ButtonState: u8 {
        const LEFT1  = 1 << 0;
        const RIGHT1 = 1 << 1;
        const LEFT2  = 1 << 2;
        const RIGHT2 = 1 << 3;
        const SMOKE  = 1 << 4;
        const _ = !0;
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SlotStatus: u8 {
        const OPEN      = 1 << 0;
        const LOCKED    = 1 << 1;
        const NOT_READY = 1 << 2;
        const READY     = 1 << 3;
        const NO_MAP    = 1 << 4;
        const PLAYING   = 1 << 5;
        const COMPLETE  = 1 << 6;
        const QUIT      = 1 << 7;
        const _ = !0;
    }
}

impl SlotStatus {
    pub const HAS_PLAYER: SlotStatus = SlotStatus::NOT_READY
        .union(SlotStatus::READY)
        .union(SlotStatus::NO_MAP)
        .union(SlotStatus::PLAYING)
        .union(SlotStatus::COMPLETE);

    pub fn has_player(self) -> bool {
        self.intersects(Self::HAS_PLAYER)
    }
}

// ============================================================
// Data model
// ============================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserStatus {
    pub action: UserAction,
    pub text: String,
    pub beatmap_checksum: String,
    pub mods: Mods,
    pub mode: GameMode,
    pub beatmap_id: i32,
    /// Transient: asks the dialect's writer to force `action = StatsUpdate`.
    /// Never itself read back from the wire.
    pub update_stats: bool,
}

impl Default for UserAction {
    fn default() -> Self {
        UserAction::Idle
    }
}

impl Default for Mods {
    fn default() -> Self {
        Mods::empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserStats {
    pub rank: i32,
    pub rscore: u64,
    pub tscore: u64,
    pub accuracy: f64,
    pub playcount: i32,
    pub pp: u16,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserPresence {
    pub is_irc: bool,
    pub timezone: i8,
    pub country_index: u8,
    pub permissions: Permissions,
    pub longitude: f32,
    pub latitude: f32,
    pub city: String,
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::empty()
    }
}

impl UserPresence {
    /// Composed "country, city" string used by the b338/b490-era wire form.
    pub fn location(&self) -> String {
        if self.city.is_empty() {
            String::new()
        } else {
            self.city.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserInfo {
    pub id: i32,
    pub name: String,
    pub presence: UserPresence,
    pub status: UserStatus,
    pub stats: UserStats,
}

impl UserInfo {
    pub fn avatar_filename(&self) -> String {
        format!("{}_000.png", self.id)
    }

    /// IRC-only users encode with their id negated where the dialect asks
    /// for a signed user id in the wide presence record.
    pub fn wire_id(&self) -> i32 {
        if self.presence.is_irc {
            -self.id
        } else {
            self.id
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitStateKind {
    Gone,
    OsuRemaining,
    IrcRemaining,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserQuit {
    pub info: UserInfo,
    pub quit_state: QuitState,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Message {
    pub sender: String,
    pub content: String,
    pub target: String,
    pub sender_id: i32,
}

impl Message {
    pub fn is_channel(&self) -> bool {
        self.target.starts_with('#')
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Channel {
    pub name: String,
    pub topic: String,
    pub owner: String,
    pub user_count: i16,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BeatmapInfo {
    pub index: i16,
    pub beatmap_id: i32,
    pub beatmap_set_id: i32,
    pub thread_id: i32,
    pub ranked_status: RankedStatus,
    pub osu_rank: i8,
    pub taiko_rank: i8,
    pub fruits_rank: i8,
    pub mania_rank: i8,
    pub checksum: String,
}

impl Default for RankedStatus {
    fn default() -> Self {
        RankedStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BeatmapInfoReply {
    pub beatmaps: Vec<BeatmapInfo>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BeatmapInfoRequest {
    pub filenames: Vec<String>,
    pub ids: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReplayFrame {
    pub button_state: ButtonState,
    pub legacy_byte: u8,
    pub mouse_x: f32,
    pub mouse_y: f32,
    pub time: i32,
}

impl Default for ButtonState {
    fn default() -> Self {
        ButtonState::empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreFrame {
    pub time: i32,
    pub id: u8,
    pub total_300: u16,
    pub total_100: u16,
    pub total_50: u16,
    pub total_geki: u16,
    pub total_katu: u16,
    pub total_miss: u16,
    pub total_score: u32,
    pub max_combo: u16,
    pub current_combo: u16,
    pub perfect: bool,
    pub hp: u8,
    pub tag_byte: u8,
}

/// Encode-time clamp applied from build 365 onward to avoid crashing old
/// clients on very large scores.
pub const TOTAL_SCORE_ENCODE_CLAMP: u32 = 2_000_000_000;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplayFrameBundle {
    pub extra: i32,
    pub frames: Vec<ReplayFrame>,
    pub action: u8,
    pub score_frame: Option<ScoreFrame>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchSlot {
    pub user_id: i32,
    pub status: SlotStatus,
    pub team: SlotTeam,
    pub mods: Mods,
}

impl Default for MatchSlot {
    fn default() -> Self {
        MatchSlot {
            user_id: -1,
            status: SlotStatus::LOCKED,
            team: SlotTeam::Neutral,
            mods: Mods::empty(),
        }
    }
}

impl MatchSlot {
    pub fn has_player(&self) -> bool {
        self.status.has_player()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Match {
    pub id: i32,
    pub in_progress: bool,
    pub match_type: u8,
    pub mods: Mods,
    pub name: String,
    pub password: String,
    pub beatmap_text: String,
    pub beatmap_id: i32,
    pub beatmap_checksum: String,
    pub slots: Vec<MatchSlot>,
    pub host_id: i32,
    pub mode: u8,
    pub scoring_type: u8,
    pub team_type: u8,
    pub freemod: bool,
    pub seed: i32,
}

impl Match {
    /// Truncate or pad `slots` to exactly `slot_size`, matching the
    /// canonical "locked, no player" default. A no-op if `ignore_slot_size`
    /// is set (a test-only escape hatch, §8 property 7).
    pub fn normalize_slots(&mut self, slot_size: usize, ignore_slot_size: bool) {
        if ignore_slot_size || self.slots.len() == slot_size {
            return;
        }
        if self.slots.len() > slot_size {
            self.slots.truncate(slot_size);
        } else {
            while self.slots.len() < slot_size {
                self.slots.push(MatchSlot::default());
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchJoin {
    pub match_id: i32,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TitleUpdate {
    pub image_url: String,
    pub redirect_url: String,
}

impl TitleUpdate {
    pub fn wire_form(&self) -> String {
        format!("{}|{}", self.image_url, self.redirect_url)
    }

    pub fn from_wire_form(s: &str) -> Self {
        match s.split_once('|') {
            Some((image, redirect)) => TitleUpdate {
                image_url: image.to_string(),
                redirect_url: redirect.to_string(),
            },
            None => TitleUpdate {
                image_url: s.to_string(),
                redirect_url: String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_action_round_trips_known_values() {
        for v in 0u8..=13 {
            assert_eq!(UserAction::from_wire(v).to_wire(), v);
        }
    }

    #[test]
    fn user_action_preserves_unknown_bits() {
        let a = UserAction::from_wire(200);
        assert_eq!(a, UserAction::Other(200));
        assert_eq!(a.to_wire(), 200);
    }

    #[test]
    fn slot_status_has_player_matches_spec_mask() {
        assert!(!SlotStatus::OPEN.has_player());
        assert!(!SlotStatus::LOCKED.has_player());
        assert!(SlotStatus::NOT_READY.has_player());
        assert!(SlotStatus::READY.has_player());
        assert!(SlotStatus::PLAYING.has_player());
    }

    #[test]
    fn match_slot_default_is_locked_no_player() {
        let slot = MatchSlot::default();
        assert_eq!(slot.user_id, -1);
        assert_eq!(slot.status, SlotStatus::LOCKED);
        assert!(!slot.has_player());
    }

    #[test]
    fn match_normalize_pads_with_default_slots() {
        let mut m = Match {
            slots: vec![MatchSlot {
                user_id: 5,
                status: SlotStatus::READY,
                team: SlotTeam::Blue,
                mods: Mods::empty(),
            }],
            ..Default::default()
        };
        m.normalize_slots(4, false);
        assert_eq!(m.slots.len(), 4);
        assert_eq!(m.slots[1], MatchSlot::default());
    }

    #[test]
    fn match_normalize_truncates() {
        let mut m = Match {
            slots: vec![MatchSlot::default(); 10],
            ..Default::default()
        };
        m.normalize_slots(8, false);
        assert_eq!(m.slots.len(), 8);
    }

    #[test]
    fn match_normalize_respects_ignore_flag() {
        let mut m = Match {
            slots: vec![MatchSlot::default(); 3],
            ..Default::default()
        };
        m.normalize_slots(8, true);
        assert_eq!(m.slots.len(), 3);
    }

    #[test]
    fn title_update_wire_form_joins_with_pipe() {
        let t = TitleUpdate {
            image_url: "http://img".into(),
            redirect_url: "http://redirect".into(),
        };
        assert_eq!(t.wire_form(), "http://img|http://redirect");
        assert_eq!(TitleUpdate::from_wire_form(&t.wire_form()), t);
    }

    #[test]
    fn message_is_channel_detects_hash_prefix() {
        let m = Message {
            target: "#osu".into(),
            ..Default::default()
        };
        assert!(m.is_channel());
        let m = Message {
            target: "cookiezi".into(),
            ..Default::default()
        };
        assert!(!m.is_channel());
    }

    #[test]
    fn user_info_negates_id_for_irc_on_wire() {
        let mut u = UserInfo {
            id: 42,
            ..Default::default()
        };
        u.presence.is_irc = true;
        assert_eq!(u.wire_id(), -42);
        u.presence.is_irc = false;
        assert_eq!(u.wire_id(), 42);
    }
}
