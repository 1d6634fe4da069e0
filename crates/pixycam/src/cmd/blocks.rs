use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pixycam_session::{Block, BlockKind};
use serde::Serialize;
use tracing::info;

use crate::cmd::{BlocksArgs, ConnectOptions};
use crate::exit::{session_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_report, OutputFormat, Report};

#[derive(Serialize)]
struct BlockOutput {
    kind: &'static str,
    signature: u16,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    angle: Option<i16>,
}

impl From<&Block> for BlockOutput {
    fn from(block: &Block) -> Self {
        let color_code = block.kind == BlockKind::ColorCode;
        Self {
            kind: if color_code { "color-code" } else { "normal" },
            signature: block.signature,
            x: block.x,
            y: block.y,
            width: block.width,
            height: block.height,
            angle: color_code.then_some(block.angle),
        }
    }
}

#[derive(Serialize)]
struct PollOutput {
    frame: u64,
    count: usize,
    blocks: Vec<BlockOutput>,
}

impl Report for PollOutput {
    fn table(&self) -> (Vec<&'static str>, Vec<Vec<String>>) {
        let rows = self
            .blocks
            .iter()
            .enumerate()
            .map(|(i, b)| {
                vec![
                    i.to_string(),
                    b.kind.to_string(),
                    b.signature.to_string(),
                    b.x.to_string(),
                    b.y.to_string(),
                    b.width.to_string(),
                    b.height.to_string(),
                    b.angle.map(|a| a.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        (
            vec!["#", "KIND", "SIG", "X", "Y", "WIDTH", "HEIGHT", "ANGLE"],
            rows,
        )
    }

    fn pretty(&self) -> String {
        let mut out = format!("frame {}: {} block(s)", self.frame, self.count);
        for (i, b) in self.blocks.iter().enumerate() {
            out.push_str(&format!(
                "\n  block {i}: sig: {} x: {} y: {} width: {} height: {}",
                b.signature, b.x, b.y, b.width, b.height
            ));
            if let Some(angle) = b.angle {
                out.push_str(&format!(" angle: {angle}"));
            }
        }
        out
    }

    fn raw(&self) -> String {
        self.count.to_string()
    }
}

pub fn run(args: BlocksArgs, conn: &ConnectOptions, format: OutputFormat) -> CliResult<i32> {
    let mut session = conn.connect()?;
    let mut buffer = vec![Block::default(); usize::from(args.max)];

    let running = Arc::new(AtomicBool::new(true));
    if args.watch {
        install_ctrlc_handler(running.clone())?;
    }

    let mut frame = 0u64;
    while running.load(Ordering::SeqCst) {
        let count = session
            .get_blocks(args.max, &mut buffer)
            .map_err(|err| session_error("blocks failed", err))?;

        // A watch only prints polls that found something.
        if !args.watch || count > 0 {
            let out = PollOutput {
                frame,
                count,
                blocks: buffer[..count].iter().map(BlockOutput::from).collect(),
            };
            print_report(&out, format);
        }

        if !args.watch {
            break;
        }
        frame = frame.wrapping_add(1);
        std::thread::sleep(args.interval);
    }

    if args.watch {
        info!(polls = frame, "watch stopped");
    }
    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_only_for_color_codes() {
        let normal = Block {
            signature: 1,
            angle: 45,
            ..Block::default()
        };
        assert_eq!(BlockOutput::from(&normal).angle, None);

        let cc = Block {
            kind: BlockKind::ColorCode,
            angle: -30,
            ..normal
        };
        let out = BlockOutput::from(&cc);
        assert_eq!(out.kind, "color-code");
        assert_eq!(out.angle, Some(-30));
    }

    #[test]
    fn json_skips_missing_angle() {
        let out = PollOutput {
            frame: 0,
            count: 1,
            blocks: vec![BlockOutput::from(&Block {
                signature: 2,
                x: 10,
                y: 20,
                width: 5,
                height: 6,
                ..Block::default()
            })],
        };
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains(r#""signature":2"#));
        assert!(!json.contains("angle"));
    }
}
