// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction kinds and the native events behind them.

use NativeEventName as N;

/// The input device an event manager serves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Device {
    /// Mouse and wheel input.
    Mouse,
    /// Touch input.
    Touch,
}

/// Native events the host forwards to an event manager.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NativeEventName {
    /// `click`
    Click,
    /// `mousedown`
    MouseDown,
    /// `mouseup`
    MouseUp,
    /// `mousemove`
    MouseMove,
    /// `wheel`
    Wheel,
    /// `touchstart`
    TouchStart,
    /// `touchmove`
    TouchMove,
    /// `touchend`
    TouchEnd,
    /// `touchcancel`
    TouchCancel,
}

impl NativeEventName {
    /// The device that produces this event.
    pub fn device(self) -> Device {
        match self {
            Self::Click | Self::MouseDown | Self::MouseUp | Self::MouseMove | Self::Wheel => {
                Device::Mouse
            }
            Self::TouchStart | Self::TouchMove | Self::TouchEnd | Self::TouchCancel => {
                Device::Touch
            }
        }
    }

    /// The DOM event name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::MouseMove => "mousemove",
            Self::Wheel => "wheel",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::TouchCancel => "touchcancel",
        }
    }
}

/// A logical interaction a callback can be registered for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InteractionKind {
    /// Mouse click.
    Click,
    /// Mouse button pressed.
    MouseDown,
    /// Mouse button released.
    MouseUp,
    /// Pointer entered a mark.
    MouseOver,
    /// Pointer left a mark.
    MouseOut,
    /// Mouse drag session: start, drag, end.
    MouseDrag,
    /// Pointer moved inside a section.
    MouseMove,
    /// Wheel scrolled inside a section.
    Wheel,
    /// Finger down.
    TouchDown,
    /// Finger up.
    TouchUp,
    /// Finger entered a mark.
    TouchOver,
    /// Finger left a mark.
    TouchOut,
    /// Touch drag session: start, drag, end.
    TouchDrag,
    /// Finger moved inside a section.
    TouchMove,
    /// Two-finger pinch inside a section.
    Pinch,
}

impl InteractionKind {
    /// The device whose events drive this kind.
    pub fn device(self) -> Device {
        match self {
            Self::Click
            | Self::MouseDown
            | Self::MouseUp
            | Self::MouseOver
            | Self::MouseOut
            | Self::MouseDrag
            | Self::MouseMove
            | Self::Wheel => Device::Mouse,
            Self::TouchDown
            | Self::TouchUp
            | Self::TouchOver
            | Self::TouchOut
            | Self::TouchDrag
            | Self::TouchMove
            | Self::Pinch => Device::Touch,
        }
    }

    /// Native listeners this kind needs while any callback is registered for it.
    pub fn native_events(self) -> &'static [NativeEventName] {
        match self {
            Self::Click => &[N::Click],
            Self::MouseDown => &[N::MouseDown],
            Self::MouseUp => &[N::MouseUp],
            Self::MouseOver | Self::MouseOut | Self::MouseMove => &[N::MouseMove],
            Self::MouseDrag => &[N::MouseDown, N::MouseMove, N::MouseUp],
            Self::Wheel => &[N::Wheel],
            Self::TouchDown => &[N::TouchStart],
            Self::TouchUp => &[N::TouchEnd],
            Self::TouchMove => &[N::TouchMove],
            Self::TouchOver | Self::TouchOut | Self::TouchDrag | Self::Pinch => {
                &[N::TouchStart, N::TouchMove, N::TouchEnd, N::TouchCancel]
            }
        }
    }

    /// Returns `true` if marks and layers may register this kind.
    pub fn on_marks(self) -> bool {
        !matches!(
            self,
            Self::MouseMove | Self::Wheel | Self::TouchMove | Self::Pinch
        )
    }

    /// Returns `true` if sections may register this kind.
    pub fn on_sections(self) -> bool {
        matches!(
            self,
            Self::Click
                | Self::MouseDown
                | Self::MouseUp
                | Self::MouseMove
                | Self::Wheel
                | Self::TouchDown
                | Self::TouchUp
                | Self::TouchMove
                | Self::Pinch
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_events_match_the_kind_device() {
        let all = [
            InteractionKind::Click,
            InteractionKind::MouseDown,
            InteractionKind::MouseUp,
            InteractionKind::MouseOver,
            InteractionKind::MouseOut,
            InteractionKind::MouseDrag,
            InteractionKind::MouseMove,
            InteractionKind::Wheel,
            InteractionKind::TouchDown,
            InteractionKind::TouchUp,
            InteractionKind::TouchOver,
            InteractionKind::TouchOut,
            InteractionKind::TouchDrag,
            InteractionKind::TouchMove,
            InteractionKind::Pinch,
        ];
        for kind in all {
            assert!(kind.on_marks() || kind.on_sections(), "{kind:?}");
            for name in kind.native_events() {
                assert_eq!(name.device(), kind.device(), "{kind:?} {name:?}");
            }
        }
    }

    #[test]
    fn section_only_kinds() {
        assert!(!InteractionKind::Pinch.on_marks());
        assert!(InteractionKind::Pinch.on_sections());
        assert!(InteractionKind::MouseOver.on_marks());
        assert!(!InteractionKind::MouseOver.on_sections());
        assert!(InteractionKind::Click.on_marks() && InteractionKind::Click.on_sections());
    }
}
