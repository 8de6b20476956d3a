use spectrum_player::audio::{SpectrumSlot, SpectrumSnapshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const OPS: u64 = 10_000;
const SLOTS: usize = 64;

/// Every snapshot is filled with its own sequence number, so a torn read
/// shows up as mixed values.
fn uniform(seq: u64) -> SpectrumSnapshot {
    SpectrumSnapshot::new(vec![seq as f32; SLOTS], seq)
}

fn assert_whole(snap: &SpectrumSnapshot) {
    assert_eq!(snap.values.len(), SLOTS);
    assert!(snap.values.iter().all(|&v| v == snap.frame as f32), "torn snapshot at {}", snap.frame);
}

#[test]
fn interleaved_publish_and_take_never_tear() {
    let slot = Arc::new(SpectrumSlot::new());
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let slot = Arc::clone(&slot);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for seq in 1..=OPS {
                assert!(slot.publish(uniform(seq)));
                if seq % 128 == 0 {
                    thread::yield_now();
                }
            }
            done.store(true, Ordering::Release);
        })
    };

    let mut seen = 0u64;
    let mut last = 0u64;
    loop {
        let finished = done.load(Ordering::Acquire);
        while let Some(snap) = slot.take() {
            assert_whole(&snap);
            assert!(snap.frame > last, "went backwards: {} after {last}", snap.frame);
            last = snap.frame;
            seen += 1;
        }
        if let Some(latest) = slot.latest() {
            assert_whole(&latest);
        }
        if finished {
            break;
        }
    }
    writer.join().unwrap();

    assert_eq!(last, OPS);
    assert_eq!(seen + slot.dropped(), OPS);
}

#[test]
fn waiting_reader_ends_on_final_frame() {
    let slot = Arc::new(SpectrumSlot::new());

    let reader = {
        let slot = Arc::clone(&slot);
        thread::spawn(move || {
            let mut last = 0u64;
            while let Some(snap) = slot.wait_take(Duration::from_secs(5)) {
                assert_whole(&snap);
                assert!(snap.frame > last);
                last = snap.frame;
            }
            last
        })
    };

    for seq in 1..=OPS {
        slot.publish(uniform(seq));
    }
    // a pending snapshot is still handed out after close
    slot.close();

    assert_eq!(reader.join().unwrap(), OPS);
}
