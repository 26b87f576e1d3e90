#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use dragdeck_core::event::{Event, PointerEvent};
use dragdeck_core::geometry::{Point, Rect, Size};
use dragdeck_widgets::{DragDropScope, PositionTracking};
use libfuzzer_sys::fuzz_target;
use web_time::Instant;

#[derive(Debug, Arbitrary)]
enum Step {
    Press { x: u8, y: u8 },
    Move { x: u8, y: u8 },
    Release,
    Cancel,
    Wait { ms: u16 },
    Tick,
    Relayout { target: u8, x: u8, width: u8 },
    GhostLayout { w: u8, h: u8 },
    Render,
}

#[derive(Debug, Arbitrary)]
struct Input {
    tracking: u8,
    steps: Vec<Step>,
}

fuzz_target!(|input: Input| {
    let tracking = match input.tracking % 3 {
        0 => PositionTracking::Off,
        1 => PositionTracking::Continuous,
        _ => PositionTracking::OnRelease,
    };
    let scope: DragDropScope<u8, u8, ()> = DragDropScope::new();
    let mut sources: Vec<_> = (0..3u8)
        .map(|i| {
            let mut source = scope
                .drag_source(i, usize::from(i), i)
                .content(|_, _| ())
                .build()
                .expect("content given");
            source.on_layout(Rect::new(f32::from(i) * 80.0, 0.0, 80.0, 80.0));
            source
        })
        .collect();
    let mut targets: Vec<_> = (0..3u8)
        .map(|i| {
            let mut target = scope
                .drop_target(i)
                .tracking(tracking)
                .content(|_| ())
                .build()
                .expect("content given");
            target.on_layout(Rect::new(f32::from(i) * 80.0, 0.0, 80.0, 255.0));
            target
        })
        .collect();

    let mut now = Instant::now();
    for step in input.steps.iter().take(256) {
        let event: Option<Event> = match *step {
            Step::Press { x, y } => {
                Some(PointerEvent::down(f32::from(x), f32::from(y)).into())
            }
            Step::Move { x, y } => Some(PointerEvent::moved(f32::from(x), f32::from(y)).into()),
            Step::Release => Some(PointerEvent::up(0.0, 0.0).into()),
            Step::Cancel => Some(Event::Focus(false)),
            Step::Wait { ms } => {
                now += Duration::from_millis(u64::from(ms));
                None
            }
            Step::Tick => {
                for source in &mut sources {
                    source.tick(now);
                }
                None
            }
            Step::Relayout { target, x, width } => {
                let idx = usize::from(target) % targets.len();
                let bounds = Rect::new(f32::from(x), 0.0, f32::from(width), 255.0);
                scope.layout_pass(|| targets[idx].on_layout(bounds));
                None
            }
            Step::GhostLayout { w, h } => {
                scope.on_ghost_layout(Size::new(f32::from(w), f32::from(h)));
                None
            }
            Step::Render => {
                scope.render(|| ());
                None
            }
        };
        if let Some(event) = event {
            for source in &mut sources {
                if source.handle_event(&event, now).is_consumed() {
                    break;
                }
            }
        }

        let session = scope.snapshot();
        let owners = sources.iter().filter(|s| s.is_dragging()).count();
        assert!(owners <= 1, "two sources own the drag");
        assert_eq!(session.is_dragging, owners == 1);
        if !session.is_dragging {
            assert_eq!(session.drag_delta, Point::ZERO);
            for target in &targets {
                // Relayouts may make targets overlap; none of them may
                // accept a drop back into the origin column.
                if target.payload().is_some() && tracking != PositionTracking::Off {
                    assert_ne!(session.column_position.from, Some(*target.column()));
                }
            }
        }
    }
});
