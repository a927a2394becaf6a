#![cfg(all(unix, feature = "cli"))]

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use conbridge::transport::ChannelSocket;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/conbridge-e2e-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn spawn_bridge(outbound: &Path, inbound: &Path, stdin: Stdio) -> Child {
    Command::new(env!("CARGO_BIN_EXE_conbridge"))
        .arg("--send-to")
        .arg(outbound)
        .arg("--recv-from")
        .arg(inbound)
        .arg("--connect-timeout")
        .arg("5s")
        .arg("--color")
        .arg("never")
        .arg("--log-level")
        .arg("error")
        .stdin(stdin)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("bridge should start")
}

fn wait_for_exit(child: &mut Child, timeout: Duration) -> std::process::ExitStatus {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().expect("wait should not error") {
            return status;
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            panic!("bridge did not exit within {timeout:?}");
        }
        thread::sleep(Duration::from_millis(50));
    }
}

#[test]
fn session_prints_then_closes_on_command() {
    let dir = unique_temp_dir("print-close");
    let outbound = dir.join("bridge-out.sock");
    let inbound = dir.join("bridge-in.sock");

    // The host's channel must exist before the bridge's bounded connect
    // gives up.
    let host_socket = ChannelSocket::bind(&inbound).expect("host socket should bind");

    let mut child = spawn_bridge(&outbound, &inbound, Stdio::null());

    let mut to_bridge = host_socket.accept().expect("bridge should dial in");
    let mut from_bridge = ChannelSocket::connect_timeout(&outbound, Duration::from_secs(5))
        .expect("bridge outbound socket should come up");

    to_bridge
        .write_all(b"print hello from host\0close\0")
        .expect("host write should succeed");

    let status = wait_for_exit(&mut child, Duration::from_secs(10));
    assert_eq!(status.code(), Some(0), "close command is a clean exit");

    let mut transcript = String::new();
    child
        .stdout
        .take()
        .expect("stdout should be piped")
        .read_to_string(&mut transcript)
        .expect("transcript should be readable");
    assert!(
        transcript.contains("hello from host"),
        "transcript was: {transcript:?}"
    );

    // Teardown notifies the host before the outbound channel closes.
    let mut notice = String::new();
    from_bridge
        .read_to_string(&mut notice)
        .expect("outbound channel should drain");
    assert_eq!(notice, "/exit");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn typed_lines_are_echoed_and_forwarded_raw() {
    let dir = unique_temp_dir("input");
    let outbound = dir.join("bridge-out.sock");
    let inbound = dir.join("bridge-in.sock");

    let host_socket = ChannelSocket::bind(&inbound).expect("host socket should bind");

    let mut child = spawn_bridge(&outbound, &inbound, Stdio::piped());

    let mut to_bridge = host_socket.accept().expect("bridge should dial in");
    let mut from_bridge = ChannelSocket::connect_timeout(&outbound, Duration::from_secs(5))
        .expect("bridge outbound socket should come up");

    // A whitespace-only line must produce no outbound write and no echo.
    let mut stdin = child.stdin.take().expect("stdin should be piped");
    stdin
        .write_all(b"   \nhello host\n")
        .expect("stdin write should succeed");
    drop(stdin); // EOF only ends the input path, not the bridge

    let mut received = Vec::new();
    let expected = b"hello host";
    let mut buf = [0u8; 64];
    while received.len() < expected.len() {
        let n = from_bridge.read(&mut buf).expect("host read should succeed");
        assert!(n > 0, "bridge hung up before forwarding the line");
        received.extend_from_slice(&buf[..n]);
    }
    assert_eq!(received, expected);

    to_bridge
        .write_all(b"close\0")
        .expect("host write should succeed");

    let status = wait_for_exit(&mut child, Duration::from_secs(10));
    assert_eq!(status.code(), Some(0));

    let mut transcript = String::new();
    child
        .stdout
        .take()
        .expect("stdout should be piped")
        .read_to_string(&mut transcript)
        .expect("transcript should be readable");
    assert!(
        transcript.contains("> hello host"),
        "transcript was: {transcript:?}"
    );

    // Only the shutdown notice remains on the outbound channel.
    let mut rest = String::new();
    from_bridge
        .read_to_string(&mut rest)
        .expect("outbound channel should drain");
    assert_eq!(rest, "/exit");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_host_is_a_connect_timeout() {
    let dir = unique_temp_dir("no-host");
    let outbound = dir.join("bridge-out.sock");
    let inbound = dir.join("bridge-in.sock");

    let mut child = Command::new(env!("CARGO_BIN_EXE_conbridge"))
        .arg("--send-to")
        .arg(&outbound)
        .arg("--recv-from")
        .arg(&inbound)
        .arg("--connect-timeout")
        .arg("200ms")
        .arg("--color")
        .arg("never")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .expect("bridge should start");

    let status = wait_for_exit(&mut child, Duration::from_secs(10));
    assert_eq!(status.code(), Some(124), "connect timeout exit code");

    let mut stderr = String::new();
    child
        .stderr
        .take()
        .expect("stderr should be piped")
        .read_to_string(&mut stderr)
        .expect("stderr should be readable");
    assert!(stderr.contains("failed to reach host"), "stderr: {stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}
