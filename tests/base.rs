use std::{sync::Arc, thread};

use straw::{BlockingStraw, LocalStraw, SharedStraw};
use tokio::sync::Barrier;

const N: usize = 1_000;

/// One write script, replayed against every variant.
const SCRIPT: &[&[u8]] = &[b"one", b"..", b"three", b"4", b"", b"sixsix"];

fn script_bytes() -> Vec<u8> {
    SCRIPT.concat()
}

/// Drains a straw as: 1 exact byte, then up-to-4-byte bites until dry.
macro_rules! drain {
    ($read_exact:expr, $read_up_to:expr) => {{
        let mut out: Vec<u8> = $read_exact(1);
        loop {
            let piece: Vec<u8> = $read_up_to(4);
            if piece.is_empty() {
                break;
            }
            out.extend(piece);
        }
        out
    }};
}

#[test]
fn variants_agree_on_the_byte_stream() {
    let expected = script_bytes();

    // Unsynchronized
    let mut local = LocalStraw::new();
    local.write_all(SCRIPT.iter().map(|s| s.to_vec()));
    let drained = drain!(
        |n| local.read_exact(n).unwrap().to_vec(),
        |n| local.read_up_to(n).to_vec()
    );
    assert_eq!(drained, expected);

    // Lock-based coalesced
    let shared = SharedStraw::new();
    shared.write_all(SCRIPT);
    let drained = drain!(
        |n| shared.read_exact(n).unwrap().to_vec(),
        |n| shared.read_up_to(n).to_vec()
    );
    assert_eq!(drained, expected);

    // Blocking chunked
    let blocking = BlockingStraw::new();
    blocking.write_all(SCRIPT.iter().map(|s| s.to_vec()));
    let drained = drain!(|n| blocking.read_exact(n).to_vec(), |n| blocking.read_up_to(n).to_vec());
    assert_eq!(drained, expected);
}

#[tokio::test]
async fn async_variant_agrees_on_the_byte_stream() {
    let (straw, _task) = straw::straw();
    straw.write_all(SCRIPT.iter().map(|s| s.to_vec())).await.unwrap();

    let mut out = straw.read_exact(1).await.unwrap().to_vec();
    loop {
        let piece = straw.read_up_to(4).await.unwrap();
        if piece.is_empty() {
            break;
        }
        out.extend(piece.to_vec());
    }
    assert_eq!(out, script_bytes());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn async_pipe() {
    let (straw, _task) = straw::straw();
    let barrier = Arc::new(Barrier::new(2));

    // Producer task: N frames of varying sizes
    let producer = straw.clone();
    let gate = barrier.clone();
    let feeder = tokio::spawn(async move {
        gate.wait().await;
        for i in 0..N {
            let frame = vec![(i % 251) as u8; 1 + i % 17];
            producer.write(frame).await.unwrap();
        }
    });

    barrier.wait().await;
    feeder.await.unwrap();

    // Consumer drains in fixed-size bites that ignore frame boundaries
    let total: usize = (0..N).map(|i| 1 + i % 17).sum();
    let mut seen = 0;
    while seen < total {
        let bite = straw.read_up_to(64).await.unwrap();
        assert!(bite.len() <= 64);
        seen += bite.len();
    }
    assert!(straw.is_empty().await.unwrap());
}

#[test]
fn blocking_pipe_across_threads() {
    let straw = BlockingStraw::new();

    let producer = straw.clone();
    let feeder = thread::spawn(move || {
        for i in 0..N {
            producer.write(vec![(i % 251) as u8; 1 + i % 17]);
        }
    });

    // The consumer's exact-size reads span frame boundaries and block until
    // the producer catches up.
    let total: usize = (0..N).map(|i| 1 + i % 17).sum();
    let mut seen = 0;
    while seen + 64 <= total {
        let bite = straw.read_exact(64);
        assert_eq!(bite.len(), 64);
        seen += 64;
    }
    let tail = straw.read_exact(total - seen);
    assert_eq!(tail.len(), total - seen);

    feeder.join().unwrap();
    assert!(straw.is_empty());
}

#[test]
fn facade_pipe_between_threads() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (straw, _task) = runtime.block_on(async { straw::straw() });

    let writer = straw.blocking();
    let reader = straw.blocking();

    let feeder = thread::spawn(move || {
        for i in 0..N {
            writer.write(vec![(i % 251) as u8]).unwrap();
        }
    });

    let mut seen = 0;
    while seen < N {
        let piece = reader.read_up_to(32).unwrap();
        seen += piece.len();
    }
    feeder.join().unwrap();
    assert_eq!(seen, N);
    assert!(reader.is_empty().unwrap());
}
