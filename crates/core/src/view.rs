use serde::{Deserialize, Serialize};
use std::fmt;

use crate::CoreError;

/// Screen whose decoration collection is addressed. Collections of different
/// views never share decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewId {
    Calendar,
    Matrix,
    Category,
    Record,
    Diary,
    Timeline,
}

impl ViewId {
    pub const ALL: [ViewId; 6] = [
        Self::Calendar,
        Self::Matrix,
        Self::Category,
        Self::Record,
        Self::Diary,
        Self::Timeline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Matrix => "matrix",
            Self::Category => "category",
            Self::Record => "record",
            Self::Diary => "diary",
            Self::Timeline => "timeline",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "calendar" => Ok(Self::Calendar),
            "matrix" => Ok(Self::Matrix),
            "category" => Ok(Self::Category),
            "record" => Ok(Self::Record),
            "diary" => Ok(Self::Diary),
            "timeline" => Ok(Self::Timeline),
            _ => Err(CoreError::InvalidData(format!("unknown view: {s}"))),
        }
    }

    /// Maps a host UI tab key to the view whose decorations it shows.
    /// Sub-tabs share their parent screen's collection.
    pub fn from_tab_key(tab: &str) -> Option<Self> {
        let view = match tab {
            "calendar" | "calendar.month" | "calendar.week" => Self::Calendar,
            "todo.matrix" | "matrix" => Self::Matrix,
            "todo.category" | "category" => Self::Category,
            "record" | "record.memo" => Self::Record,
            "diary" => Self::Diary,
            "timeline" | "timeblock" => Self::Timeline,
            _ => return None,
        };
        Some(view)
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_parse_agree() {
        for view in ViewId::ALL {
            assert_eq!(ViewId::parse(view.as_str()).unwrap(), view);
        }
    }

    #[test]
    fn unknown_view_is_rejected() {
        assert!(ViewId::parse("settings").is_err());
    }

    #[test]
    fn sub_tabs_share_parent_view() {
        assert_eq!(ViewId::from_tab_key("calendar.week"), Some(ViewId::Calendar));
        assert_eq!(ViewId::from_tab_key("todo.matrix"), Some(ViewId::Matrix));
        assert_eq!(ViewId::from_tab_key("settings"), None);
    }
}
