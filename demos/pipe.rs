use clap::Parser;

#[tokio::main]
async fn main() {
    env_logger::init();
    let Args { count, bite } = Args::parse();

    // Create the cooperative straw and its owner task
    let (straw, task) = straw::straw();

    // Producer: messages of uneven sizes
    let producer = straw.clone();
    let feeder = tokio::spawn(async move {
        for i in 0..count {
            producer.write(format!("[{i:4}] hello from the producer\n")).await.unwrap();
        }
    });
    feeder.await.unwrap();

    // Consumer: fixed-size bites that ignore message boundaries
    loop {
        let piece = straw.read_up_to(bite).await.unwrap();
        if piece.is_empty() {
            break;
        }
        print!("{}", String::from_utf8_lossy(&piece.to_vec()));
    }

    let residue = task.shutdown().await;
    assert!(residue.is_empty());
}

#[derive(Debug, Parser)]
struct Args {
    #[arg(short, long, default_value = "32")]
    count: usize,
    #[arg(short, long, default_value = "8")]
    bite: usize,
}
