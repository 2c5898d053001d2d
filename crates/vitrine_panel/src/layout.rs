//! Panel layout shift
//!
//! Opening the panel pushes the demo content left by half the panel's footprint
//! so it stays centred in the remaining space. The floating toggle control must
//! move by exactly the same amount. Both read one shared spring, so they cannot
//! drift apart mid-animation.

use crate::motion::{Spring, SpringConfig};

/// Width of the code panel in logical pixels
pub const PANEL_WIDTH: f32 = 672.0;
/// Gap between the panel and the viewport edge
pub const PANEL_MARGIN: f32 = 16.0;
/// Horizontal travel of the toggle knob
pub const KNOB_TRAVEL: f32 = 20.0;

/// Rest positions for one open/closed state, computed once per change
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShiftTarget {
    /// Horizontal offset applied to both the content and the toggle
    pub offset: f32,
    /// Width removed from the content area
    pub inset: f32,
    /// Drawer offset from its resting place (fully hidden at `PANEL_WIDTH`)
    pub drawer: f32,
    pub knob: f32,
}

impl ShiftTarget {
    pub fn for_state(open: bool) -> Self {
        let footprint = PANEL_WIDTH + PANEL_MARGIN;
        if open {
            Self {
                offset: -footprint / 2.0,
                inset: footprint,
                drawer: 0.0,
                knob: KNOB_TRAVEL,
            }
        } else {
            Self {
                offset: 0.0,
                inset: 0.0,
                drawer: PANEL_WIDTH,
                knob: 0.0,
            }
        }
    }
}

/// Positions to draw this frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutFrame {
    pub content_offset: f32,
    pub toggle_offset: f32,
    pub content_width: f32,
    pub drawer_offset: f32,
    pub knob_offset: f32,
}

/// Animated layout for one panel
#[derive(Clone, Debug)]
pub struct PanelLayout {
    target: ShiftTarget,
    shift: Spring,
    inset: Spring,
    drawer: Spring,
    knob: Spring,
}

impl PanelLayout {
    /// Layout already at rest for `open`. Nothing animates on first mount.
    pub fn at_rest(open: bool) -> Self {
        let target = ShiftTarget::for_state(open);
        Self {
            target,
            shift: Spring::new(SpringConfig::panel(), target.offset),
            inset: Spring::new(SpringConfig::panel(), target.inset),
            drawer: Spring::new(SpringConfig::panel(), target.drawer),
            knob: Spring::new(SpringConfig::knob(), target.knob),
        }
    }

    pub fn target(&self) -> ShiftTarget {
        self.target
    }

    pub fn retarget(&mut self, open: bool) {
        let target = ShiftTarget::for_state(open);
        if target == self.target {
            return;
        }
        tracing::trace!("Panel layout retarget: offset {}", target.offset);
        self.target = target;
        self.shift.set_target(target.offset);
        self.inset.set_target(target.inset);
        self.drawer.set_target(target.drawer);
        self.knob.set_target(target.knob);
    }

    pub fn step(&mut self, dt: f32) {
        self.shift.step(dt);
        self.inset.step(dt);
        self.drawer.step(dt);
        self.knob.step(dt);
    }

    pub fn is_settled(&self) -> bool {
        self.shift.is_settled()
            && self.inset.is_settled()
            && self.drawer.is_settled()
            && self.knob.is_settled()
    }

    pub fn frame(&self, viewport_width: f32) -> LayoutFrame {
        let offset = self.shift.value();
        LayoutFrame {
            content_offset: offset,
            toggle_offset: offset,
            content_width: (viewport_width - self.inset.value()).max(0.0),
            drawer_offset: self.drawer.value(),
            knob_offset: self.knob.value(),
        }
    }
}
