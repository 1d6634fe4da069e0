#![cfg(all(unix, feature = "cli"))]

use std::io::{Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;
use std::process::Command;
use std::thread::{self, JoinHandle};

use bytes::BytesMut;
use pixycam::chirp::{encode_results, ResultValue};
use pixycam::image::fourcc;
use pixycam::session::BlockKind;
use pixycam::transport::envelope::{
    decode_envelope, encode_hello, encode_reply, parse_call, EnvelopeKind, PROTOCOL_VERSION,
};
use pixycam::transport::DEFAULT_MAX_REPLY_SIZE;
use pixycam::Block;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/pxcli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

/// Serve one client: acknowledge the hello, answer each call with `reply`,
/// and return the names of the calls seen once the client leaves.
fn spawn_bridge<F>(listener: UnixListener, reply: F) -> JoinHandle<Vec<String>>
where
    F: Fn(&str) -> Vec<u8> + Send + 'static,
{
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("bridge should accept");
        let mut rx = BytesMut::new();
        let mut seen = Vec::new();

        while let Some(kind) = next_envelope(&mut stream, &mut rx, &mut seen) {
            let mut tx = BytesMut::new();
            match kind {
                EnvelopeKind::Hello => {
                    encode_hello(EnvelopeKind::HelloAck, PROTOCOL_VERSION, &mut tx)
                        .expect("hello ack should encode");
                }
                EnvelopeKind::Call => {
                    let name = seen.last().expect("call name recorded");
                    encode_reply(0, &reply(name), &mut tx).expect("reply should encode");
                }
                EnvelopeKind::Bye => break,
                other => panic!("unexpected envelope {other:?}"),
            }
            stream.write_all(&tx).expect("bridge write");
        }
        seen
    })
}

fn next_envelope(
    stream: &mut UnixStream,
    rx: &mut BytesMut,
    seen: &mut Vec<String>,
) -> Option<EnvelopeKind> {
    loop {
        if let Some(env) = decode_envelope(rx, DEFAULT_MAX_REPLY_SIZE).expect("valid envelope") {
            if env.kind == EnvelopeKind::Call {
                let (name, _) = parse_call(env.body).expect("valid call");
                seen.push(name);
            }
            return Some(env.kind);
        }
        let mut chunk = [0u8; 512];
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return None,
            Ok(n) => rx.extend_from_slice(&chunk[..n]),
        }
    }
}

fn results(values: &[ResultValue<'_>]) -> Vec<u8> {
    let mut out = BytesMut::new();
    encode_results(values, &mut out);
    out.to_vec()
}

/// A 4x3 BA81 frame reply with a flat gray Bayer plane.
fn gray_frame(status: i32) -> Vec<u8> {
    results(&[
        ResultValue::I32(status),
        ResultValue::U32(fourcc(*b"BA81")),
        ResultValue::I8(0),
        ResultValue::U16(4),
        ResultValue::U16(3),
        ResultValue::U32(12),
        ResultValue::Bytes(&[90u8; 12]),
    ])
}

fn pixycam() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pixycam"));
    cmd.arg("--log-level").arg("error");
    cmd
}

#[test]
fn error_describes_status_codes() {
    let output = pixycam()
        .args(["--format", "json", "error", "-151"])
        .output()
        .expect("error should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"code\":-151"));
    assert!(stdout.contains("Chirp"));

    let output = pixycam()
        .args(["--format", "raw", "error", "-9999"])
        .output()
        .expect("error should run");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Undefined error");
}

#[test]
fn client_version_needs_no_device() {
    let output = pixycam()
        .args(["--format", "json", "version", "--client"])
        .output()
        .expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"name\":\"pixycam\""));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn blocks_against_fake_bridge() {
    let dir = unique_temp_dir("blocks");
    let sock_path = dir.join("bridge.sock");
    let listener = UnixListener::bind(&sock_path).expect("listener should bind");

    let records: Vec<u8> = [
        Block {
            signature: 1,
            x: 160,
            y: 100,
            width: 20,
            height: 30,
            ..Block::default()
        },
        Block {
            kind: BlockKind::ColorCode,
            signature: 12,
            x: 40,
            y: 50,
            width: 8,
            height: 9,
            angle: -45,
        },
    ]
    .iter()
    .flat_map(|b| b.to_record())
    .collect();

    let bridge = spawn_bridge(listener, move |name| {
        assert_eq!(name, "blk_getBlocks");
        results(&[ResultValue::I32(2), ResultValue::Bytes(&records[..])])
    });

    let output = pixycam()
        .arg("--socket")
        .arg(&sock_path)
        .args(["--format", "json", "blocks", "--max", "5"])
        .output()
        .expect("blocks should run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"count\":2"));
    assert!(stdout.contains("\"kind\":\"color-code\""));
    assert!(stdout.contains("\"angle\":-45"));

    let seen = bridge.join().expect("bridge thread should complete");
    assert_eq!(seen, ["blk_getBlocks"]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn get_brightness_against_fake_bridge() {
    let dir = unique_temp_dir("get");
    let sock_path = dir.join("bridge.sock");
    let listener = UnixListener::bind(&sock_path).expect("listener should bind");

    let bridge = spawn_bridge(listener, |_| results(&[ResultValue::I32(80)]));

    let output = pixycam()
        .arg("--socket")
        .arg(&sock_path)
        .args(["--format", "raw", "get", "brightness"])
        .output()
        .expect("get should run");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "80");

    let seen = bridge.join().expect("bridge thread should complete");
    assert_eq!(seen, ["cam_getBrightness"]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn frame_writes_image_and_raw_dump() {
    let dir = unique_temp_dir("frame");
    let sock_path = dir.join("bridge.sock");
    let listener = UnixListener::bind(&sock_path).expect("listener should bind");
    let ppm_path = dir.join("frame.ppm");
    let raw_path = dir.join("frame.raw");

    let bridge = spawn_bridge(listener, |name| {
        assert_eq!(name, "cam_getFrame");
        gray_frame(0)
    });

    let output = pixycam()
        .arg("--socket")
        .arg(&sock_path)
        .args(["--format", "json", "frame", "--output"])
        .arg(&ppm_path)
        .arg("--raw")
        .arg(&raw_path)
        .output()
        .expect("frame should run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"pixel_count\":12"));

    // Demosaicing drops the border, so 4x3 becomes 2x1.
    let header = b"P6\n2 1\n255\n";
    let ppm = std::fs::read(&ppm_path).expect("image should be written");
    assert!(ppm.starts_with(header));
    assert_eq!(ppm.len(), header.len() + 6);
    assert!(ppm[header.len()..].iter().all(|&b| b == 90));

    let raw = std::fs::read(&raw_path).expect("raw dump should be written");
    assert_eq!(raw, [90u8; 12]);

    let seen = bridge.join().expect("bridge thread should complete");
    assert_eq!(seen, ["cam_getFrame"]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn failed_frame_writes_nothing() {
    let dir = unique_temp_dir("frame-fail");
    let sock_path = dir.join("bridge.sock");
    let listener = UnixListener::bind(&sock_path).expect("listener should bind");
    let ppm_path = dir.join("frame.ppm");
    let raw_path = dir.join("frame.raw");

    let bridge = spawn_bridge(listener, |_| gray_frame(-1));

    let output = pixycam()
        .arg("--socket")
        .arg(&sock_path)
        .args(["frame", "--output"])
        .arg(&ppm_path)
        .arg("--raw")
        .arg(&raw_path)
        .output()
        .expect("frame should run");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("-1"));
    assert!(!ppm_path.exists());
    assert!(!raw_path.exists());

    let seen = bridge.join().expect("bridge thread should complete");
    assert_eq!(seen, ["cam_getFrame"]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn out_of_range_servo_is_usage_without_a_call() {
    let dir = unique_temp_dir("servo");
    let sock_path = dir.join("bridge.sock");
    let listener = UnixListener::bind(&sock_path).expect("listener should bind");

    let bridge = spawn_bridge(listener, |name| panic!("unexpected call {name}"));

    let output = pixycam()
        .arg("--socket")
        .arg(&sock_path)
        .args(["set", "servo", "2", "500"])
        .output()
        .expect("set should run");

    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[-150]"));

    let seen = bridge.join().expect("bridge thread should complete");
    assert!(seen.is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_bridge_returns_3() {
    let dir = unique_temp_dir("missing");

    let output = pixycam()
        .arg("--socket")
        .arg(dir.join("absent.sock"))
        .args(["version"])
        .output()
        .expect("version should run");

    assert_eq!(output.status.code(), Some(3));
    let _ = std::fs::remove_dir_all(&dir);
}
