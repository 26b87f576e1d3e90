#![no_main]

use std::time::Duration;

use dragdeck_core::event::{Event, PointerEvent, PointerId};
use dragdeck_core::gesture::{DragGesture, LongPressDragRecognizer};
use libfuzzer_sys::fuzz_target;
use web_time::Instant;

fuzz_target!(|data: &[u8]| {
    // Each 4-byte chunk is one step: op, pointer, x, y.
    let mut recognizer = LongPressDragRecognizer::default();
    let mut now = Instant::now();
    let mut active = false;

    for chunk in data.chunks_exact(4) {
        let (op, pointer, x, y) = (chunk[0], chunk[1] % 3, f32::from(chunk[2]), f32::from(chunk[3]));
        let pointer = PointerId(u64::from(pointer));
        let gestures = match op % 7 {
            0 => recognizer.process(&PointerEvent::down(x, y).with_pointer(pointer).into(), now),
            1 => recognizer.process(&PointerEvent::moved(x, y).with_pointer(pointer).into(), now),
            2 => recognizer.process(&PointerEvent::up(x, y).with_pointer(pointer).into(), now),
            3 => recognizer.process(&PointerEvent::cancel(x, y).with_pointer(pointer).into(), now),
            4 => recognizer.process(&Event::Focus(op & 0x80 != 0), now),
            5 => recognizer.check_long_press(now).into_iter().collect(),
            _ => {
                now += Duration::from_millis(u64::from(chunk[2]) * 4);
                Vec::new()
            }
        };

        // Start → Move* → End | Cancel, never nested.
        for gesture in gestures {
            match gesture {
                DragGesture::Start { .. } => {
                    assert!(!active, "nested drag start");
                    active = true;
                }
                DragGesture::Move { .. } => assert!(active, "move outside a drag"),
                DragGesture::End { .. } | DragGesture::Cancel => {
                    assert!(active, "end outside a drag");
                    active = false;
                }
            }
        }
        assert_eq!(recognizer.is_dragging(), active);
    }
});
