use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use pixycam_session::{status_text, FrameRequest};
use serde::Serialize;
use tracing::info;

use crate::cmd::{ConnectOptions, FrameArgs};
use crate::exit::{image_error, io_error, session_error, CliError, CliResult, FAILURE, SUCCESS};
use crate::output::{print_report, OutputFormat, Report};

#[derive(Serialize)]
struct FrameOutput {
    status: i32,
    format: &'static str,
    format_code: i32,
    render_flags: i8,
    width: u16,
    height: u16,
    pixel_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    ppm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<String>,
}

impl Report for FrameOutput {
    fn table(&self) -> (Vec<&'static str>, Vec<Vec<String>>) {
        (
            vec!["STATUS", "FORMAT", "WIDTH", "HEIGHT", "PIXELS"],
            vec![vec![
                self.status.to_string(),
                self.format.to_string(),
                self.width.to_string(),
                self.height.to_string(),
                self.pixel_count.to_string(),
            ]],
        )
    }

    fn pretty(&self) -> String {
        let mut out = format!(
            "{} frame {}x{} ({} pixels, status {})",
            self.format, self.width, self.height, self.pixel_count, self.status
        );
        if let Some(path) = &self.ppm {
            out.push_str(&format!("\n  image: {path}"));
        }
        if let Some(path) = &self.raw {
            out.push_str(&format!("\n  raw:   {path}"));
        }
        out
    }

    fn raw(&self) -> String {
        format!("{} {} {}", self.format, self.width, self.height)
    }
}

pub fn run(args: FrameArgs, conn: &ConnectOptions, format: OutputFormat) -> CliResult<i32> {
    let request = FrameRequest {
        mode: args.mode,
        x_offset: args.x,
        y_offset: args.y,
        width: args.width,
        height: args.height,
    };

    let mut session = conn.connect()?;
    let frame = session
        .get_frame(request)
        .map_err(|err| session_error("frame failed", err))?;

    if frame.status() < 0 {
        return Err(CliError::new(
            FAILURE,
            format!(
                "frame failed: device returned {} ({})",
                frame.status(),
                status_text(frame.status())
            ),
        ));
    }

    if let (Some(path), Some(pixels)) = (&args.raw, frame.pixels()) {
        write_file(path, pixels)?;
        info!(path = %path.display(), bytes = pixels.len(), "raw frame written");
    }

    if let Some(path) = &args.output {
        let planes = frame
            .to_owned_frame()
            .render()
            .map_err(|err| image_error("render failed", err))?;
        let file = File::create(path).map_err(|err| io_error("create image file", err))?;
        planes
            .write_ppm(BufWriter::new(file))
            .map_err(|err| image_error("write image", err))?;
        info!(path = %path.display(), "image written");
    }

    let out = FrameOutput {
        status: frame.status(),
        format: frame.pixel_format().as_str(),
        format_code: frame.pixel_format().code(),
        render_flags: frame.render_flags(),
        width: frame.width(),
        height: frame.height(),
        pixel_count: frame.pixel_count(),
        ppm: args.output.as_ref().map(|p| p.display().to_string()),
        raw: args.raw.as_ref().map(|p| p.display().to_string()),
    };
    print_report(&out, format);
    Ok(SUCCESS)
}

fn write_file(path: &Path, bytes: &[u8]) -> CliResult<()> {
    let mut file = File::create(path).map_err(|err| io_error("create raw file", err))?;
    file.write_all(bytes)
        .and_then(|()| file.flush())
        .map_err(|err| io_error("write raw file", err))
}
