//! Move page: homing and jogging

use dgus_protocol::{Action, KeyValue, Page};

use crate::handler::{dispatch_common, Axis, Context, HostRequest, Screen};
use crate::scheduler::reached;

pub const X_HOME: u16 = 0x0001;
pub const Y_HOME: u16 = 0x0002;
pub const Z_HOME: u16 = 0x0003;
pub const ALL_HOME: u16 = 0x0004;
pub const DISABLE_MOTORS: u16 = 0x0005;

/// Jog distance of X and Y (tenths of mm)
const XY_STEP: i16 = 100;
/// Jog distance of Z and E (tenths of mm)
const ZE_STEP: i16 = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct Motion {
    /// Earliest time of the next jog
    next_move_ms: Option<u32>,
}

impl Motion {
    pub const fn new() -> Self {
        Self { next_move_ms: None }
    }

    /// Axis and distance of a jog action
    pub fn jog_of(action: Action) -> Option<(Axis, i16)> {
        let jog = match action {
            Action::MoveXMinus => (Axis::X, -XY_STEP),
            Action::MoveXPlus => (Axis::X, XY_STEP),
            Action::MoveYMinus => (Axis::Y, -XY_STEP),
            Action::MoveYPlus => (Axis::Y, XY_STEP),
            Action::MoveZMinus => (Axis::Z, -ZE_STEP),
            Action::MoveZPlus => (Axis::Z, ZE_STEP),
            Action::MoveEMinus => (Axis::E, -ZE_STEP),
            Action::MoveEPlus => (Axis::E, ZE_STEP),
            _ => return None,
        };
        Some(jog)
    }

    /// Jog, ignoring presses that repeat faster than the move interval
    pub fn jog(&mut self, ctx: &mut Context, axis: Axis, distance: i16) {
        if let Some(next) = self.next_move_ms {
            if !reached(ctx.now_ms, next) {
                debug!("Jog ignored");
                return;
            }
        }
        self.next_move_ms = Some(ctx.now_ms.wrapping_add(ctx.config.move_interval_ms));
        ctx.request(HostRequest::Jog { axis, distance });
    }
}

impl Screen for Motion {
    fn prepare_page(&mut self, _ctx: &mut Context) -> Option<Page> {
        Some(Page::Move)
    }

    fn dispatch(&mut self, ctx: &mut Context, key: KeyValue) -> bool {
        let request = match key.value() {
            X_HOME => HostRequest::Home(Some(Axis::X)),
            Y_HOME => HostRequest::Home(Some(Axis::Y)),
            Z_HOME => HostRequest::Home(Some(Axis::Z)),
            ALL_HOME => HostRequest::Home(None),
            DISABLE_MOTORS => HostRequest::DisableMotors,
            _ => return dispatch_common(self, ctx, key),
        };
        ctx.request(request);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelConfig;

    #[test]
    fn test_jog_is_throttled() {
        let mut ctx = Context::new(PanelConfig::default());
        let mut motion = Motion::new();

        motion.jog(&mut ctx, Axis::X, XY_STEP);
        ctx.now_ms = 20;
        motion.jog(&mut ctx, Axis::X, XY_STEP);
        ctx.now_ms = 50;
        motion.jog(&mut ctx, Axis::Z, -ZE_STEP);

        assert_eq!(
            ctx.pop_request(),
            Some(HostRequest::Jog {
                axis: Axis::X,
                distance: 100
            })
        );
        assert_eq!(
            ctx.pop_request(),
            Some(HostRequest::Jog {
                axis: Axis::Z,
                distance: -10
            })
        );
        assert_eq!(ctx.pop_request(), None);
    }

    #[test]
    fn test_home_keys() {
        let mut ctx = Context::new(PanelConfig::default());
        Motion::new().handle(&mut ctx, KeyValue::new(ALL_HOME));
        assert_eq!(ctx.pop_request(), Some(HostRequest::Home(None)));
        Motion::new().handle(&mut ctx, KeyValue::new(Y_HOME));
        assert_eq!(ctx.pop_request(), Some(HostRequest::Home(Some(Axis::Y))));
    }

    #[test]
    fn test_jog_of() {
        assert_eq!(Motion::jog_of(Action::MoveEMinus), Some((Axis::E, -10)));
        assert_eq!(Motion::jog_of(Action::BedPlus), None);
    }
}
