//! End-to-end controller scenarios driven by scripted pointer frames.

use crossbeam_channel::Receiver;
use pretty_assertions::assert_eq;
use strumline_engine::{
    EngineConfig, FrameCapture, FrameInput, GrabState, GrabTarget, InstrumentController,
    InstrumentEvent, OfflineDevice, PlaybackDevice, PointId, PointInstrument, PointerSample,
    StringId, StringInstrument, Vec2,
};

const DT: f32 = 1.0 / 60.0;

struct Session {
    controller: InstrumentController,
    events: Receiver<InstrumentEvent>,
    string_device: OfflineDevice,
    point_device: OfflineDevice,
    string: StringId,
    point: PointId,
    time: f32,
}

impl Session {
    /// One string pointing at 91° (D#) three radii long, one point far away.
    fn new() -> Self {
        let config = EngineConfig {
            seed: Some(1),
            ..EngineConfig::default()
        };
        let string_device = OfflineDevice::new(config.sample_rate);
        let point_device = OfflineDevice::new(config.sample_rate);

        let mut controller = InstrumentController::new(&config.interaction);
        let events = controller.subscribe();
        let string = controller.add_string(
            StringInstrument::new(origin_at(91.0), Vec2::ZERO, &config)
                .unwrap()
                .with_device(Box::new(string_device.clone())),
        );
        let point = controller.add_point(
            PointInstrument::new(Vec2::new(10.0, 10.0), &config, "point-0")
                .unwrap()
                .with_device(Box::new(point_device.clone())),
        );

        Self {
            controller,
            events,
            string_device,
            point_device,
            string,
            point,
            time: 0.0,
        }
    }

    fn step(&mut self, pointer: PointerSample) {
        self.controller.tick(&FrameInput {
            delta_time: DT,
            elapsed_time: self.time,
            pointer,
        });
        self.string_device.advance(DT);
        self.point_device.advance(DT);
        self.time += DT;
    }

    fn drain(&self) -> Vec<InstrumentEvent> {
        self.events.try_iter().collect()
    }

    fn notes_played(events: &[InstrumentEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, InstrumentEvent::NotePlayed { .. }))
            .count()
    }
}

fn origin_at(angle: f32) -> Vec2 {
    Vec2::from_clock_angle(angle, 6.1)
}

#[test]
fn test_grab_plays_note_then_reports_grab() {
    let mut session = Session::new();
    session.step(PointerSample::press(origin_at(91.0)));

    let events = session.drain();
    match &events[0] {
        InstrumentEvent::NotePlayed {
            string,
            frequency_hz,
            note,
        } => {
            assert_eq!(*string, session.string);
            assert_eq!(note, "D#5");
            assert!((frequency_hz - 622.25).abs() < 0.01);
        }
        other => panic!("expected a note first, got {:?}", other),
    }
    assert_eq!(
        events[1],
        InstrumentEvent::Grabbed {
            target: GrabTarget::StringOrigin(session.string)
        }
    );
    assert_eq!(session.string_device.play_count(), 1);
    assert!(session.string_device.is_playing());
}

#[test]
fn test_retrigger_threshold() {
    let mut session = Session::new();
    session.step(PointerSample::press(origin_at(91.0)));
    assert_eq!(Session::notes_played(&session.drain()), 1);

    // 1.5° is 0.05 of a semitone: below the threshold
    session.step(PointerSample::drag(origin_at(92.5)));
    assert_eq!(Session::notes_played(&session.drain()), 0);

    // 6° from the last played note is 0.2 of a semitone
    session.step(PointerSample::drag(origin_at(97.0)));
    assert_eq!(Session::notes_played(&session.drain()), 1);

    session.step(PointerSample::drag(origin_at(97.0)));
    assert_eq!(Session::notes_played(&session.drain()), 0);
    assert_eq!(session.string_device.play_count(), 2);
}

#[test]
fn test_octave_change_retriggers() {
    let mut session = Session::new();
    session.step(PointerSample::press(origin_at(91.0)));
    session.drain();

    session.step(PointerSample::drag(Vec2::from_clock_angle(91.0, 8.1)));
    let events = session.drain();
    assert_eq!(Session::notes_played(&events), 1);
    let string = session.controller.string(session.string).unwrap();
    assert_eq!(string.note_name(), "D#6");
}

#[test]
fn test_center_release_swaps_endpoints() {
    let mut session = Session::new();
    let old_origin = session.controller.string(session.string).unwrap().origin();

    session.step(PointerSample::press(Vec2::new(0.1, 0.0)));
    assert_eq!(
        session.controller.grab_target(),
        Some(GrabTarget::StringCenter(session.string))
    );
    session.step(PointerSample::drag(Vec2::new(1.1, 1.0)));
    session.drain();

    session.step(PointerSample::release(Vec2::new(1.1, 1.0)));
    let events = session.drain();

    let string = session.controller.string(session.string).unwrap();
    assert_eq!(string.center(), old_origin);
    assert!(string.origin().distance(Vec2::new(1.0, 1.0)) < 1e-6);
    assert!(events.iter().any(|e| matches!(e, InstrumentEvent::PitchChanged { .. })));
    assert_eq!(
        events.last(),
        Some(&InstrumentEvent::Released {
            target: GrabTarget::StringCenter(session.string)
        })
    );
    assert_eq!(session.controller.grab_state(), GrabState::Idle);
}

#[test]
fn test_release_never_stops_audio() {
    let mut session = Session::new();
    session.step(PointerSample::press(origin_at(91.0)));
    let stops_after_grab = session.string_device.stop_count();

    session.step(PointerSample::release(origin_at(91.0)));
    assert_eq!(session.string_device.stop_count(), stops_after_grab);
    assert!(session.string_device.is_playing());
}

#[test]
fn test_point_click_breathes_and_reports() {
    let mut session = Session::new();
    session.step(PointerSample::press(Vec2::new(10.0, 10.2)));

    let events = session.drain();
    assert_eq!(
        events,
        vec![
            InstrumentEvent::Clicked {
                point: session.point
            },
            InstrumentEvent::Grabbed {
                target: GrabTarget::Point(session.point)
            },
        ]
    );
    assert_eq!(session.point_device.play_count(), 1);
    assert_eq!(session.string_device.play_count(), 0);

    session.step(PointerSample::drag(Vec2::new(10.0, 10.2)));
    let mut frame = FrameCapture::default();
    session.controller.render(&mut frame);
    assert_eq!(frame.points.len(), 1);
    assert!(frame.points[0].2 > 1.0);
}

#[test]
fn test_point_near_string_bends_and_modulates() {
    let mut session = Session::new();
    // Start the note, let go, then bring the point over
    session.step(PointerSample::press(origin_at(91.0)));
    session.step(PointerSample::release(origin_at(91.0)));
    session.step(PointerSample::press(Vec2::new(10.0, 10.0)));

    let mut ratios = Vec::new();
    for _ in 0..20 {
        session.step(PointerSample::drag(Vec2::new(3.0, 0.5)));
        ratios.push(session.string_device.last_modulation().pitch_ratio);
    }

    let string = session.controller.string(session.string).unwrap();
    assert!(string.vibrato_intensity() > 0.5);
    assert!(string.deformation_intensity() > 0.1);
    assert!(ratios.iter().any(|&r| r > 1.0));

    let mut frame = FrameCapture::default();
    session.controller.render(&mut frame);
    let polyline = frame.polyline(session.string).unwrap();
    assert!(polyline.len() > 2);

    // Take the point away: vibrato releases and the string straightens
    for _ in 0..300 {
        session.step(PointerSample::drag(Vec2::new(20.0, 20.0)));
    }
    let string = session.controller.string(session.string).unwrap();
    assert!(string.vibrato_intensity() < 1e-3);
    assert_eq!(string.polyline().len(), 2);
}

#[test]
fn test_idle_string_renders_straight() {
    let mut session = Session::new();
    session.step(PointerSample::hover(Vec2::new(-5.0, -5.0)));

    let mut frame = FrameCapture::default();
    session.controller.render(&mut frame);
    assert_eq!(
        frame.polyline(session.string).unwrap(),
        &[origin_at(91.0), Vec2::ZERO]
    );
    assert!(session.drain().is_empty());
}
