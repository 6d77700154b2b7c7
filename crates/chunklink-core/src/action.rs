//! Change action classification and gutter icon lookup

use crate::chunk::{ChangeKind, ChangeRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default action selected for the whole comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Replace,
    Delete,
    Insert,
}

/// Action a gutter click performs. The available actions are exactly the
/// modes, so a classified action is reported as a [`Mode`].
pub type Action = Mode;

impl Mode {
    /// Next mode in toolbar toggle order
    pub fn next(self) -> Self {
        match self {
            Mode::Replace => Mode::Delete,
            Mode::Delete => Mode::Insert,
            Mode::Insert => Mode::Replace,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Replace => "replace",
            Mode::Delete => "delete",
            Mode::Insert => "insert",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" | "apply" => Ok(Mode::Replace),
            "delete" => Ok(Mode::Delete),
            "insert" | "copy" => Ok(Mode::Insert),
            other => Err(format!("unknown mode: {}", other)),
        }
    }
}

/// Classify the action a change allows, given the mode and which panes can
/// be edited. Returns `None` when the change is inert.
pub fn classify(
    change: &ChangeRecord,
    mode: Mode,
    editable_from: bool,
    editable_to: bool,
) -> Option<Action> {
    if !editable_from && !editable_to {
        return None;
    }

    match change.action_kind() {
        ChangeKind::Delete => {
            if editable_from && (mode == Mode::Delete || !editable_to) {
                Some(Mode::Delete)
            } else if editable_to {
                Some(Mode::Replace)
            } else {
                None
            }
        }
        ChangeKind::Replace => {
            if !editable_from {
                matches!(mode, Mode::Insert | Mode::Replace).then_some(mode)
            } else if !editable_to {
                Some(Mode::Delete)
            } else {
                Some(mode)
            }
        }
        ChangeKind::Insert => (editable_from && editable_to).then_some(mode),
        // action_kind never yields a conflict
        ChangeKind::Conflict => None,
    }
}

/// Text direction of the widget hosting a gutter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Direction in which changes flow out of a gutter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

impl Direction {
    /// Resolve from pane ordering, flipped for right-to-left text
    pub fn resolve(from_pane: usize, to_pane: usize, text_direction: TextDirection) -> Self {
        let ltr = from_pane < to_pane;
        match (ltr, text_direction) {
            (true, TextDirection::Ltr) | (false, TextDirection::Rtl) => Direction::LeftToRight,
            _ => Direction::RightToLeft,
        }
    }
}

/// Icon shown for a classified action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionIcon {
    ApplyRight,
    ApplyLeft,
    Delete,
    Copy,
}

const ICONS_LTR: [(Action, ActionIcon); 3] = [
    (Mode::Replace, ActionIcon::ApplyRight),
    (Mode::Delete, ActionIcon::Delete),
    (Mode::Insert, ActionIcon::Copy),
];

const ICONS_RTL: [(Action, ActionIcon); 3] = [
    (Mode::Replace, ActionIcon::ApplyLeft),
    (Mode::Delete, ActionIcon::Delete),
    (Mode::Insert, ActionIcon::Copy),
];

impl ActionIcon {
    pub fn for_action(direction: Direction, action: Action) -> Self {
        let table = match direction {
            Direction::LeftToRight => &ICONS_LTR,
            Direction::RightToLeft => &ICONS_RTL,
        };
        table
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, icon)| *icon)
            .unwrap_or(ActionIcon::Copy)
    }

    /// Icon theme name
    pub fn name(self) -> &'static str {
        match self {
            ActionIcon::ApplyRight => "change-apply-right",
            ActionIcon::ApplyLeft => "change-apply-left",
            ActionIcon::Delete => "change-delete",
            ActionIcon::Copy => "change-copy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [Mode; 3] = [Mode::Replace, Mode::Delete, Mode::Insert];
    const EDITABILITY: [(bool, bool); 4] = [(true, true), (true, false), (false, true), (false, false)];

    fn record(kind: ChangeKind) -> ChangeRecord {
        match kind {
            ChangeKind::Insert => ChangeRecord::new(kind, 2, 2, 2, 5),
            ChangeKind::Delete => ChangeRecord::new(kind, 2, 5, 2, 2),
            _ => ChangeRecord::new(kind, 2, 4, 2, 5),
        }
    }

    #[test]
    fn test_nothing_editable_is_inert() {
        for kind in ChangeKind::ALL {
            for mode in MODES {
                assert_eq!(classify(&record(kind), mode, false, false), None);
            }
        }
    }

    #[test]
    fn test_delete_classification() {
        let change = record(ChangeKind::Delete);
        assert_eq!(classify(&change, Mode::Replace, true, true), Some(Mode::Replace));
        assert_eq!(classify(&change, Mode::Delete, true, true), Some(Mode::Delete));
        assert_eq!(classify(&change, Mode::Insert, true, true), Some(Mode::Replace));
        assert_eq!(classify(&change, Mode::Replace, true, false), Some(Mode::Delete));
        assert_eq!(classify(&change, Mode::Delete, false, true), Some(Mode::Replace));
    }

    #[test]
    fn test_delete_never_needs_readonly_target() {
        let change = record(ChangeKind::Delete);
        for mode in MODES {
            assert_ne!(classify(&change, mode, true, false), Some(Mode::Replace));
        }
    }

    #[test]
    fn test_replace_classification() {
        let change = record(ChangeKind::Replace);
        for mode in MODES {
            assert_eq!(classify(&change, mode, true, true), Some(mode));
            assert_eq!(classify(&change, mode, true, false), Some(Mode::Delete));
        }
        assert_eq!(classify(&change, Mode::Replace, false, true), Some(Mode::Replace));
        assert_eq!(classify(&change, Mode::Insert, false, true), Some(Mode::Insert));
        assert_eq!(classify(&change, Mode::Delete, false, true), None);
    }

    #[test]
    fn test_insert_honors_mode_when_both_editable() {
        let change = record(ChangeKind::Insert);
        for mode in MODES {
            assert_eq!(classify(&change, mode, true, true), Some(mode));
            assert_eq!(classify(&change, mode, true, false), None);
            assert_eq!(classify(&change, mode, false, true), None);
        }
    }

    #[test]
    fn test_conflict_matches_normalized_kind() {
        let cases = [
            (ChangeRecord::new(ChangeKind::Conflict, 3, 3, 1, 4), ChangeKind::Insert),
            (ChangeRecord::new(ChangeKind::Conflict, 3, 6, 1, 1), ChangeKind::Delete),
            (ChangeRecord::new(ChangeKind::Conflict, 3, 6, 1, 4), ChangeKind::Replace),
        ];
        for (conflict, kind) in cases {
            let plain = ChangeRecord { kind, ..conflict };
            for mode in MODES {
                for (from, to) in EDITABILITY {
                    assert_eq!(
                        classify(&conflict, mode, from, to),
                        classify(&plain, mode, from, to),
                        "{:?} {:?} {} {}",
                        kind,
                        mode,
                        from,
                        to
                    );
                }
            }
        }
    }

    #[test]
    fn test_direction_resolution() {
        assert_eq!(Direction::resolve(0, 1, TextDirection::Ltr), Direction::LeftToRight);
        assert_eq!(Direction::resolve(1, 0, TextDirection::Ltr), Direction::RightToLeft);
        assert_eq!(Direction::resolve(0, 1, TextDirection::Rtl), Direction::RightToLeft);
        assert_eq!(Direction::resolve(2, 1, TextDirection::Rtl), Direction::LeftToRight);
    }

    #[test]
    fn test_icon_table() {
        assert_eq!(
            ActionIcon::for_action(Direction::LeftToRight, Mode::Replace),
            ActionIcon::ApplyRight
        );
        assert_eq!(
            ActionIcon::for_action(Direction::RightToLeft, Mode::Replace),
            ActionIcon::ApplyLeft
        );
        for direction in [Direction::LeftToRight, Direction::RightToLeft] {
            assert_eq!(ActionIcon::for_action(direction, Mode::Delete), ActionIcon::Delete);
            assert_eq!(ActionIcon::for_action(direction, Mode::Insert), ActionIcon::Copy);
        }
        assert_eq!(ActionIcon::ApplyLeft.name(), "change-apply-left");
    }

    #[test]
    fn test_mode_cycle_and_parse() {
        assert_eq!(Mode::default().next(), Mode::Delete);
        assert_eq!(Mode::Insert.next(), Mode::Replace);
        assert_eq!("Copy".parse::<Mode>(), Ok(Mode::Insert));
        assert!("bogus".parse::<Mode>().is_err());
    }
}
