//! Pointer events as seen by the clamp engine.
//!
//! The numeric codes match Quartz's `CGEventType` values so the macOS layer
//! can convert with [`PointerEventKind::from_raw`] and build the tap's
//! interest mask with [`EventMask`] without a second lookup table.
//!
//! | Kind                      | Left | Right | Other |
//! |---------------------------|------|-------|-------|
//! | button down               | 1    | 3     | 25    |
//! | button up                 | 2    | 4     | 26    |
//! | dragged                   | 6    | 7     | 27    |
//!
//! `MouseMoved` is 5.  The two tap-disabled notifications use
//! `0xFFFF_FFFE` (timeout) and `0xFFFF_FFFF` (user input); they are delivered
//! to every tap regardless of its mask.

use super::geometry::Point;

const RAW_LEFT_MOUSE_DOWN: u32 = 1;
const RAW_LEFT_MOUSE_UP: u32 = 2;
const RAW_RIGHT_MOUSE_DOWN: u32 = 3;
const RAW_RIGHT_MOUSE_UP: u32 = 4;
const RAW_MOUSE_MOVED: u32 = 5;
const RAW_LEFT_MOUSE_DRAGGED: u32 = 6;
const RAW_RIGHT_MOUSE_DRAGGED: u32 = 7;
const RAW_OTHER_MOUSE_DOWN: u32 = 25;
const RAW_OTHER_MOUSE_UP: u32 = 26;
const RAW_OTHER_MOUSE_DRAGGED: u32 = 27;
const RAW_TAP_DISABLED_BY_TIMEOUT: u32 = 0xFFFF_FFFE;
const RAW_TAP_DISABLED_BY_USER_INPUT: u32 = 0xFFFF_FFFF;

/// Mouse button identifier used in [`PointerEventKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    /// Middle and any additional buttons.
    Other,
}

/// The type tag of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    MouseMoved,
    ButtonDown(MouseButton),
    ButtonUp(MouseButton),
    Dragged(MouseButton),
    /// The OS disabled the tap because a callback took too long.
    TapDisabledByTimeout,
    /// The tap was disabled by user input (e.g. secure input mode).
    TapDisabledByUserInput,
    /// Any other event type; always passed through untouched.
    Other(u32),
}

impl PointerEventKind {
    /// Every kind the clamp engine knows how to act on, in raw-code order.
    pub const MOUSE_KINDS: [PointerEventKind; 10] = [
        PointerEventKind::ButtonDown(MouseButton::Left),
        PointerEventKind::ButtonUp(MouseButton::Left),
        PointerEventKind::ButtonDown(MouseButton::Right),
        PointerEventKind::ButtonUp(MouseButton::Right),
        PointerEventKind::MouseMoved,
        PointerEventKind::Dragged(MouseButton::Left),
        PointerEventKind::Dragged(MouseButton::Right),
        PointerEventKind::ButtonDown(MouseButton::Other),
        PointerEventKind::ButtonUp(MouseButton::Other),
        PointerEventKind::Dragged(MouseButton::Other),
    ];

    /// Converts a Quartz `CGEventType` code into a kind.
    ///
    /// Unknown codes map to [`PointerEventKind::Other`]; this never fails.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            RAW_LEFT_MOUSE_DOWN => Self::ButtonDown(MouseButton::Left),
            RAW_LEFT_MOUSE_UP => Self::ButtonUp(MouseButton::Left),
            RAW_RIGHT_MOUSE_DOWN => Self::ButtonDown(MouseButton::Right),
            RAW_RIGHT_MOUSE_UP => Self::ButtonUp(MouseButton::Right),
            RAW_MOUSE_MOVED => Self::MouseMoved,
            RAW_LEFT_MOUSE_DRAGGED => Self::Dragged(MouseButton::Left),
            RAW_RIGHT_MOUSE_DRAGGED => Self::Dragged(MouseButton::Right),
            RAW_OTHER_MOUSE_DOWN => Self::ButtonDown(MouseButton::Other),
            RAW_OTHER_MOUSE_UP => Self::ButtonUp(MouseButton::Other),
            RAW_OTHER_MOUSE_DRAGGED => Self::Dragged(MouseButton::Other),
            RAW_TAP_DISABLED_BY_TIMEOUT => Self::TapDisabledByTimeout,
            RAW_TAP_DISABLED_BY_USER_INPUT => Self::TapDisabledByUserInput,
            other => Self::Other(other),
        }
    }

    /// Returns the Quartz `CGEventType` code for this kind.
    pub fn raw(self) -> u32 {
        match self {
            Self::ButtonDown(MouseButton::Left) => RAW_LEFT_MOUSE_DOWN,
            Self::ButtonUp(MouseButton::Left) => RAW_LEFT_MOUSE_UP,
            Self::ButtonDown(MouseButton::Right) => RAW_RIGHT_MOUSE_DOWN,
            Self::ButtonUp(MouseButton::Right) => RAW_RIGHT_MOUSE_UP,
            Self::MouseMoved => RAW_MOUSE_MOVED,
            Self::Dragged(MouseButton::Left) => RAW_LEFT_MOUSE_DRAGGED,
            Self::Dragged(MouseButton::Right) => RAW_RIGHT_MOUSE_DRAGGED,
            Self::ButtonDown(MouseButton::Other) => RAW_OTHER_MOUSE_DOWN,
            Self::ButtonUp(MouseButton::Other) => RAW_OTHER_MOUSE_UP,
            Self::Dragged(MouseButton::Other) => RAW_OTHER_MOUSE_DRAGGED,
            Self::TapDisabledByTimeout => RAW_TAP_DISABLED_BY_TIMEOUT,
            Self::TapDisabledByUserInput => RAW_TAP_DISABLED_BY_USER_INPUT,
            Self::Other(raw) => raw,
        }
    }

    /// Pure cursor motion, or a drag (motion with a button held).
    pub fn is_motion_or_drag(self) -> bool {
        matches!(self, Self::MouseMoved | Self::Dragged(_))
    }

    /// Button presses, releases and drags: anything that can interact with
    /// what lies under the cursor.
    pub fn is_click(self) -> bool {
        matches!(self, Self::ButtonDown(_) | Self::ButtonUp(_) | Self::Dragged(_))
    }

    /// The OS revoked the hook and expects it to be re-enabled.
    pub fn is_tap_disabled(self) -> bool {
        matches!(
            self,
            Self::TapDisabledByTimeout | Self::TapDisabledByUserInput
        )
    }
}

/// A pointer event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    /// Location in top-down global coordinates.
    pub position: Point,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::MouseMoved, x, y)
    }

    pub fn button_down(button: MouseButton, x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::ButtonDown(button), x, y)
    }

    pub fn button_up(button: MouseButton, x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::ButtonUp(button), x, y)
    }

    pub fn dragged(button: MouseButton, x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Dragged(button), x, y)
    }
}

/// Bitmask of event kinds a tap registers interest in (`1 << raw`).
///
/// Kinds whose raw code does not fit in 64 bits (the tap-disabled
/// notifications) are never part of a mask; the OS delivers them anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventMask(u64);

impl EventMask {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = PointerEventKind>) -> Self {
        kinds.into_iter().fold(Self::empty(), Self::with)
    }

    #[must_use]
    pub fn with(self, kind: PointerEventKind) -> Self {
        match kind.raw() {
            raw if raw < 64 => Self(self.0 | (1u64 << raw)),
            _ => self,
        }
    }

    pub fn contains(self, kind: PointerEventKind) -> bool {
        let raw = kind.raw();
        raw < 64 && self.0 & (1u64 << raw) != 0
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    /// Returns the known mouse kinds included in this mask.
    pub fn kinds(self) -> Vec<PointerEventKind> {
        PointerEventKind::MOUSE_KINDS
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_kind_survives_raw_conversion() {
        let all = PointerEventKind::MOUSE_KINDS.into_iter().chain([
            PointerEventKind::TapDisabledByTimeout,
            PointerEventKind::TapDisabledByUserInput,
        ]);
        for kind in all {
            assert_eq!(PointerEventKind::from_raw(kind.raw()), kind);
        }
    }

    #[test]
    fn test_unknown_raw_code_maps_to_other() {
        // 22 is kCGEventScrollWheel, which the clamp engine does not handle.
        assert_eq!(PointerEventKind::from_raw(22), PointerEventKind::Other(22));
        assert_eq!(PointerEventKind::Other(22).raw(), 22);
    }

    #[test]
    fn test_click_classification_covers_down_up_and_drag() {
        assert!(PointerEventKind::ButtonDown(MouseButton::Right).is_click());
        assert!(PointerEventKind::ButtonUp(MouseButton::Other).is_click());
        assert!(PointerEventKind::Dragged(MouseButton::Left).is_click());
        assert!(!PointerEventKind::MouseMoved.is_click());
        assert!(!PointerEventKind::TapDisabledByTimeout.is_click());
    }

    #[test]
    fn test_motion_or_drag_excludes_buttons() {
        assert!(PointerEventKind::MouseMoved.is_motion_or_drag());
        assert!(PointerEventKind::Dragged(MouseButton::Other).is_motion_or_drag());
        assert!(!PointerEventKind::ButtonDown(MouseButton::Left).is_motion_or_drag());
    }

    #[test]
    fn test_event_mask_sets_bit_per_raw_code() {
        let mask = EventMask::from_kinds([
            PointerEventKind::MouseMoved,
            PointerEventKind::ButtonDown(MouseButton::Left),
        ]);

        assert_eq!(mask.bits(), (1 << 5) | (1 << 1));
        assert!(mask.contains(PointerEventKind::MouseMoved));
        assert!(!mask.contains(PointerEventKind::ButtonUp(MouseButton::Left)));
    }

    #[test]
    fn test_event_mask_ignores_tap_disabled_kinds() {
        let mask = EventMask::empty().with(PointerEventKind::TapDisabledByTimeout);

        assert_eq!(mask, EventMask::empty());
        assert!(!mask.contains(PointerEventKind::TapDisabledByUserInput));
    }

    #[test]
    fn test_event_mask_kinds_lists_members_in_raw_order() {
        let mask = EventMask::from_kinds([
            PointerEventKind::Dragged(MouseButton::Other),
            PointerEventKind::MouseMoved,
        ]);

        assert_eq!(
            mask.kinds(),
            vec![
                PointerEventKind::MouseMoved,
                PointerEventKind::Dragged(MouseButton::Other)
            ]
        );
    }
}
