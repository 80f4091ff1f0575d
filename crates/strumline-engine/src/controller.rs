//! Instrument controller.
//!
//! Owns the registry of strings and points, runs the grab/drag/release state
//! machine, and composes one frame:
//!
//! 1. Pointer input (grab, drag, release, swap)
//! 2. Proximity detection over all points and strings
//! 3. Vibrato smoothing and device modulation
//! 4. Animators and polylines
//! 5. Event publication

use crossbeam_channel::Receiver;

use crate::animation::Collision;
use crate::config::InteractionConfig;
use crate::events::{EventBus, GrabTarget, InstrumentEvent, PointId, StringId};
use crate::frame::{FrameInput, PolylineRenderer};
use crate::geometry::Vec2;
use crate::instrument::{PointInstrument, StringInstrument};
use crate::proximity::InteractionDetector;

/// What the pointer holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrabState {
    /// Nothing held.
    Idle,
    /// Dragging an anchor.
    Grabbed {
        /// What is held.
        target: GrabTarget,
        /// Anchor position minus pointer position at grab time.
        offset: Vec2,
    },
}

/// Runs the instruments frame by frame.
#[derive(Debug)]
pub struct InstrumentController {
    strings: Vec<(StringId, StringInstrument)>,
    points: Vec<(PointId, PointInstrument)>,
    next_id: u32,
    detector: InteractionDetector,
    grab_radius: f32,
    grab: GrabState,
    bus: EventBus,
}

impl InstrumentController {
    /// Creates an empty controller.
    pub fn new(interaction: &InteractionConfig) -> Self {
        Self {
            strings: Vec::new(),
            points: Vec::new(),
            next_id: 0,
            detector: InteractionDetector::new(interaction.detection_radius),
            grab_radius: interaction.grab_radius,
            grab: GrabState::Idle,
            bus: EventBus::new(),
        }
    }

    /// Registers a string.
    pub fn add_string(&mut self, string: StringInstrument) -> StringId {
        let id = StringId(self.allocate_id());
        self.strings.push((id, string));
        id
    }

    /// Registers a point.
    pub fn add_point(&mut self, point: PointInstrument) -> PointId {
        let id = PointId(self.allocate_id());
        self.points.push((id, point));
        id
    }

    /// Unregisters a string, dropping any grab on it.
    pub fn remove_string(&mut self, id: StringId) -> Option<StringInstrument> {
        let index = self.strings.iter().position(|(sid, _)| *sid == id)?;
        if let GrabState::Grabbed {
            target: GrabTarget::StringOrigin(held) | GrabTarget::StringCenter(held),
            ..
        } = self.grab
        {
            if held == id {
                self.grab = GrabState::Idle;
            }
        }
        Some(self.strings.remove(index).1)
    }

    /// Unregisters a point, dropping any grab on it.
    pub fn remove_point(&mut self, id: PointId) -> Option<PointInstrument> {
        let index = self.points.iter().position(|(pid, _)| *pid == id)?;
        if self.grab_target() == Some(GrabTarget::Point(id)) {
            self.grab = GrabState::Idle;
        }
        Some(self.points.remove(index).1)
    }

    /// Looks up a string.
    pub fn string(&self, id: StringId) -> Option<&StringInstrument> {
        self.strings.iter().find(|(sid, _)| *sid == id).map(|(_, s)| s)
    }

    /// Looks up a string mutably.
    pub fn string_mut(&mut self, id: StringId) -> Option<&mut StringInstrument> {
        self.strings.iter_mut().find(|(sid, _)| *sid == id).map(|(_, s)| s)
    }

    /// Looks up a point.
    pub fn point(&self, id: PointId) -> Option<&PointInstrument> {
        self.points.iter().find(|(pid, _)| *pid == id).map(|(_, p)| p)
    }

    /// Looks up a point mutably.
    pub fn point_mut(&mut self, id: PointId) -> Option<&mut PointInstrument> {
        self.points.iter_mut().find(|(pid, _)| *pid == id).map(|(_, p)| p)
    }

    /// Registered string ids in registration order.
    pub fn string_ids(&self) -> Vec<StringId> {
        self.strings.iter().map(|(id, _)| *id).collect()
    }

    /// Registered point ids in registration order.
    pub fn point_ids(&self) -> Vec<PointId> {
        self.points.iter().map(|(id, _)| *id).collect()
    }

    /// Opens an event subscription.
    pub fn subscribe(&mut self) -> Receiver<InstrumentEvent> {
        self.bus.subscribe()
    }

    /// Current grab state.
    pub fn grab_state(&self) -> GrabState {
        self.grab
    }

    /// Target currently held, if any.
    pub fn grab_target(&self) -> Option<GrabTarget> {
        match self.grab {
            GrabState::Grabbed { target, .. } => Some(target),
            GrabState::Idle => None,
        }
    }

    /// Runs one frame.
    pub fn tick(&mut self, frame: &FrameInput) {
        let pointer = frame.pointer;
        if pointer.pressed && self.grab == GrabState::Idle {
            self.press(pointer.position);
        }
        if pointer.held {
            self.drag(pointer.position);
        }
        if pointer.released {
            self.release();
        }

        self.detect_interactions();

        let (dt, time) = (frame.delta_time, frame.elapsed_time);
        for (_, string) in &mut self.strings {
            string.tick(dt, time);
        }
        for (_, point) in &mut self.points {
            point.tick(dt);
        }

        self.flush_notices();
    }

    /// Draws every string, then every point.
    pub fn render(&self, renderer: &mut dyn PolylineRenderer) {
        for (id, string) in &self.strings {
            renderer.draw_polyline(*id, string.polyline());
        }
        for (id, point) in &self.points {
            renderer.draw_point(*id, point.position(), point.scale());
        }
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn press(&mut self, position: Vec2) {
        let Some((target, anchor)) = self.pick(position) else {
            return;
        };
        log::debug!(target: "strumline::controller", "grabbed {:?}", target);
        self.grab = GrabState::Grabbed {
            target,
            offset: anchor - position,
        };

        match target {
            GrabTarget::StringOrigin(id) | GrabTarget::StringCenter(id) => {
                if let Some(string) = self.string_mut(id) {
                    string.play_note();
                }
                // Notes come before the grab itself
                self.flush_notices();
            }
            GrabTarget::Point(id) => {
                if let Some(point) = self.point_mut(id) {
                    point.click();
                }
                self.bus.publish(InstrumentEvent::Clicked { point: id });
            }
        }
        self.bus.publish(InstrumentEvent::Grabbed { target });
    }

    /// Finds the anchor under the pointer: string origins and centers first,
    /// in registry order, then points.
    fn pick(&self, position: Vec2) -> Option<(GrabTarget, Vec2)> {
        for (id, string) in &self.strings {
            if position.distance(string.origin()) < self.grab_radius {
                return Some((GrabTarget::StringOrigin(*id), string.origin()));
            }
            if position.distance(string.center()) < self.grab_radius {
                return Some((GrabTarget::StringCenter(*id), string.center()));
            }
        }
        self.points
            .iter()
            .find(|(_, point)| position.distance(point.position()) < self.grab_radius)
            .map(|(id, point)| (GrabTarget::Point(*id), point.position()))
    }

    fn drag(&mut self, position: Vec2) {
        let GrabState::Grabbed { target, offset } = self.grab else {
            return;
        };
        let anchor = position + offset;
        match target {
            GrabTarget::StringOrigin(id) => {
                if let Some(string) = self.string_mut(id) {
                    string.set_origin(anchor);
                }
            }
            GrabTarget::StringCenter(id) => {
                if let Some(string) = self.string_mut(id) {
                    string.set_center(anchor);
                }
            }
            GrabTarget::Point(id) => {
                if let Some(point) = self.point_mut(id) {
                    point.set_position(anchor);
                }
            }
        }
    }

    fn release(&mut self) {
        let GrabState::Grabbed { target, .. } = self.grab else {
            return;
        };
        self.grab = GrabState::Idle;

        // A dropped center becomes the new origin
        if let GrabTarget::StringCenter(id) = target {
            if let Some(string) = self.string_mut(id) {
                string.swap_endpoints();
            }
        }
        self.flush_notices();
        log::debug!(target: "strumline::controller", "released {:?}", target);
        self.bus.publish(InstrumentEvent::Released { target });
    }

    fn detect_interactions(&mut self) {
        let positions: Vec<Vec2> = self.points.iter().map(|(_, p)| p.position()).collect();
        let segments: Vec<(Vec2, Vec2)> = self
            .strings
            .iter()
            .map(|(_, s)| (s.origin(), s.center()))
            .collect();

        let radius = self.detector.detection_radius();
        let strongest = self.detector.strongest_per_string(&positions, &segments);
        for ((_, string), interaction) in self.strings.iter_mut().zip(strongest) {
            string.set_contact(interaction.map(|hit| {
                (
                    hit.strength,
                    Collision {
                        point: hit.position,
                        radius,
                    },
                )
            }));
        }
    }

    fn flush_notices(&mut self) {
        for (id, string) in &mut self.strings {
            for notice in string.drain_notices() {
                self.bus.publish(notice.into_event(*id));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::frame::PointerSample;

    fn frame(pointer: PointerSample) -> FrameInput {
        FrameInput {
            delta_time: 1.0 / 60.0,
            elapsed_time: 0.0,
            pointer,
        }
    }

    fn controller_with_string() -> (InstrumentController, StringId) {
        let config = EngineConfig::default();
        let mut controller = InstrumentController::new(&config.interaction);
        let string = StringInstrument::new(Vec2::new(0.0, 2.5), Vec2::ZERO, &config).unwrap();
        let id = controller.add_string(string);
        (controller, id)
    }

    #[test]
    fn test_ids_are_unique_across_kinds() {
        let config = EngineConfig::default();
        let (mut controller, string) = controller_with_string();
        let point = controller
            .add_point(PointInstrument::new(Vec2::new(9.0, 9.0), &config, "p").unwrap());
        assert_eq!(string, StringId(0));
        assert_eq!(point, PointId(1));
        assert_eq!(controller.point_ids(), vec![point]);
    }

    #[test]
    fn test_press_outside_radius_stays_idle() {
        let (mut controller, _) = controller_with_string();
        controller.tick(&frame(PointerSample::press(Vec2::new(5.0, 5.0))));
        assert_eq!(controller.grab_state(), GrabState::Idle);
    }

    #[test]
    fn test_origin_wins_over_center_when_both_in_reach() {
        let config = EngineConfig::default();
        let mut controller = InstrumentController::new(&config.interaction);
        let id = controller.add_string(
            StringInstrument::new(Vec2::new(0.0, 0.3), Vec2::ZERO, &config).unwrap(),
        );
        controller.tick(&frame(PointerSample::press(Vec2::new(0.0, 0.15))));
        assert_eq!(controller.grab_target(), Some(GrabTarget::StringOrigin(id)));
    }

    #[test]
    fn test_grab_offset_preserved_while_dragging() {
        let (mut controller, id) = controller_with_string();
        controller.tick(&frame(PointerSample::press(Vec2::new(0.1, 2.4))));
        controller.tick(&frame(PointerSample::drag(Vec2::new(1.1, 2.4))));
        let origin = controller.string(id).unwrap().origin();
        assert!((origin.x - 1.0).abs() < 1e-6);
        assert!((origin.y - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_remove_grabbed_string_resets_grab() {
        let (mut controller, id) = controller_with_string();
        controller.tick(&frame(PointerSample::press(Vec2::new(0.0, 2.5))));
        assert!(controller.remove_string(id).is_some());
        assert_eq!(controller.grab_state(), GrabState::Idle);
        assert!(controller.remove_string(id).is_none());
    }

    #[test]
    fn test_release_without_grab_is_silent() {
        let (mut controller, _) = controller_with_string();
        let events = controller.subscribe();
        controller.tick(&frame(PointerSample::release(Vec2::ZERO)));
        assert!(events.try_recv().is_err());
    }
}
