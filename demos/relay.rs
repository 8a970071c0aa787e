use std::thread;

use clap::Parser;
use straw::BlockingStraw;

/// Re-frames an uneven byte stream into fixed-size cells: the producer
/// writes messages of whatever size it likes, the consumer blocks until a
/// whole cell is available.
fn main() {
    env_logger::init();
    let Args { count, cell } = Args::parse();

    let straw = BlockingStraw::new();

    let producer = straw.clone();
    let feeder = thread::spawn(move || {
        let mut total = 0;
        for i in 0..count {
            let message = format!("message {i};");
            total += message.len();
            producer.write(message);
        }
        total
    });

    let total = feeder.join().unwrap();

    let mut cells = 0;
    while straw.len() >= cell {
        let frame = straw.read_exact(cell);
        println!("cell {cells:3}: {}", String::from_utf8_lossy(&frame.to_vec()));
        cells += 1;
    }

    // Whatever doesn't fill a cell stays buffered for the next round
    println!("{} cells of {} bytes relayed, {} bytes left over", cells, cell, total - cells * cell);
}

#[derive(Debug, Parser)]
struct Args {
    #[arg(short = 'n', long, default_value = "64")]
    count: usize,
    #[arg(short, long, default_value = "16")]
    cell: usize,
}
