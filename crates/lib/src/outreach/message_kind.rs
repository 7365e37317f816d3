//! Prerecorded call messages and the audio asset each one plays.

use std::fmt;
use std::str::FromStr;

/// Which prerecorded message an outbound call plays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MessageKind {
    #[default]
    Percy1,
    Percy2,
    Percy3,
    Someone1,
    Someone2,
    Someone3,
}

impl MessageKind {
    pub const ALL: [MessageKind; 6] = [
        MessageKind::Percy1,
        MessageKind::Percy2,
        MessageKind::Percy3,
        MessageKind::Someone1,
        MessageKind::Someone2,
        MessageKind::Someone3,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Percy1 => "percy1",
            MessageKind::Percy2 => "percy2",
            MessageKind::Percy3 => "percy3",
            MessageKind::Someone1 => "someone1",
            MessageKind::Someone2 => "someone2",
            MessageKind::Someone3 => "someone3",
        }
    }

    /// Path of the audio file under the public base URL, without a leading slash.
    pub fn asset_path(self) -> String {
        format!("static/audio/{}.mp3", self.as_str())
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown message kind {0:?} (expected one of percy1, percy2, percy3, someone1, someone2, someone3)")]
pub struct UnknownMessageKind(pub String);

impl FromStr for MessageKind {
    type Err = UnknownMessageKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        MessageKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| UnknownMessageKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_paths_follow_name() {
        assert_eq!(MessageKind::Percy1.asset_path(), "static/audio/percy1.mp3");
        assert_eq!(MessageKind::Someone3.asset_path(), "static/audio/someone3.mp3");
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Someone2".parse::<MessageKind>(), Ok(MessageKind::Someone2));
        assert_eq!(" percy3 ".parse::<MessageKind>(), Ok(MessageKind::Percy3));
    }

    #[test]
    fn rejects_unknown_name() {
        let err = "percy4".parse::<MessageKind>().unwrap_err();
        assert_eq!(err, UnknownMessageKind("percy4".to_string()));
    }

    #[test]
    fn default_is_percy1() {
        assert_eq!(MessageKind::default(), MessageKind::Percy1);
    }
}
