//! Connect to a Pixy bridge, grab one frame and print detected blocks until Ctrl-C.
//!
//! ```text
//! cargo run -p pixycam --features cli --example hello-pixy -- /tmp/pixycam.sock
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pixycam::session::{status_text, BlockKind};
use pixycam::{Block, FrameRequest};

const BLOCK_BUFFER_SIZE: u16 = 25;
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() {
    let socket = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/pixycam.sock".to_string());

    if let Err(err) = run(&socket) {
        eprintln!("hello-pixy: {err} [{}]", err.code());
        std::process::exit(1);
    }
}

fn run(socket: &str) -> pixycam::session::Result<()> {
    println!("Hello Pixy:\n pixycam version: {}", env!("CARGO_PKG_VERSION"));

    let mut session = pixycam::connect(socket)?;
    let version = session.firmware_version()?;
    println!(" Pixy firmware version: {version}");

    {
        let frame = session.get_frame(FrameRequest::default())?;
        println!(
            " frame: status {} ({}) format {} {}x{} pixels {}",
            frame.status(),
            status_text(frame.status()),
            frame.pixel_format(),
            frame.width(),
            frame.height(),
            frame.pixel_count()
        );
    }

    session.set_auto_white_balance(true)?;
    println!(" auto white balance: {}", session.auto_white_balance()?);
    session.set_auto_white_balance(false)?;

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    if let Err(err) = ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst)) {
        eprintln!("hello-pixy: cannot install Ctrl-C handler: {err}");
    }

    println!("Detecting blocks...");
    let mut blocks = vec![Block::default(); usize::from(BLOCK_BUFFER_SIZE)];
    while running.load(Ordering::SeqCst) {
        match session.get_blocks(BLOCK_BUFFER_SIZE, &mut blocks) {
            Ok(count) => {
                for block in &blocks[..count] {
                    print_block(block);
                }
            }
            Err(err) => eprintln!("get_blocks: {}", status_text(err.code())),
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    println!("\nBye!");
    session.close()?;
    Ok(())
}

fn print_block(block: &Block) {
    match block.kind {
        BlockKind::Normal => println!(
            "[sig:{:2} w:{:3} h:{:3} x:{:3} y:{:3}]",
            block.signature, block.width, block.height, block.x, block.y
        ),
        BlockKind::ColorCode => println!(
            "[sig:{:2} w:{:3} h:{:3} x:{:3} y:{:3} ang:{:3}]",
            block.signature, block.width, block.height, block.x, block.y, block.angle
        ),
    }
}
