use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_logpacker").to_string()
}

const LOG: &[u8] = b"2024-01-01 00:00:00,000 100    INFO  start\n\
                     2024-01-01 00:00:00,500 101    ERROR fail\n\
                     \tat Foo.bar(Foo.java:1)\n\
                     2024-01-01 00:00:02,000 102    WARN  retry\n";

#[test]
fn cli_pack_unpack_roundtrip() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("app.log");
    let packed = dir.path().join("app.log.lp");
    let restored = dir.path().join("restored.log");
    std::fs::write(&log, LOG).unwrap();

    let st = Command::new(bin()).arg(&log).arg(&packed).status().unwrap();
    assert!(st.success());
    assert_eq!(&std::fs::read(&packed).unwrap()[..2], &[0x1f, 0x8b]);

    let st = Command::new(bin())
        .arg("-d")
        .arg(&packed)
        .arg(&restored)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(&restored).unwrap(), LOG);
}

#[test]
fn cli_no_gzip_writes_packed_text() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("app.log");
    let packed = dir.path().join("app.txt");
    std::fs::write(&log, LOG).unwrap();

    let st = Command::new(bin())
        .arg("--no-gzip")
        .arg(&log)
        .arg(&packed)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(
        std::fs::read(&packed).unwrap(),
        b"20240101000000000 100 1 start\n\
          500 1 0 fail\n\
          \tat Foo.bar(Foo.java:1)\n\
          20240101000002000 2 WARN retry\n"
    );
}

#[test]
fn cli_stdin_to_stdout() {
    let mut child = Command::new(bin())
        .arg("--no-gzip")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(LOG).unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());
    assert!(out.stdout.starts_with(b"20240101000000000 100 1 start\n"));
}

#[test]
fn cli_refuses_to_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("app.log");
    let packed = dir.path().join("app.log.lp");
    std::fs::write(&log, LOG).unwrap();
    std::fs::write(&packed, b"existing").unwrap();

    let out = Command::new(bin()).arg(&log).arg(&packed).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("use -f to overwrite"));
    assert_eq!(std::fs::read(&packed).unwrap(), b"existing");

    let st = Command::new(bin())
        .arg("-f")
        .arg(&log)
        .arg(&packed)
        .status()
        .unwrap();
    assert!(st.success());
}

#[test]
fn cli_missing_input_fails() {
    let dir = tempdir().unwrap();
    let out = Command::new(bin())
        .arg(dir.path().join("missing.log"))
        .arg(dir.path().join("out"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).starts_with("logpacker: input file:"));
}

#[test]
fn cli_unpack_rejects_non_gzip() {
    let dir = tempdir().unwrap();
    let bogus = dir.path().join("bogus.lp");
    std::fs::write(&bogus, b"not gzip").unwrap();

    let out = Command::new(bin())
        .arg("-d")
        .arg(&bogus)
        .arg(dir.path().join("out.log"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("logpacker: unpack:"));
}

#[test]
fn cli_invalid_arguments_exit_2() {
    let out = Command::new(bin()).args(["--level", "12"]).output().unwrap();
    assert_eq!(out.status.code(), Some(2));

    let out = Command::new(bin()).args(["a", "b", "c"]).output().unwrap();
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn cli_json_stats() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("app.log");
    let packed = dir.path().join("app.log.lp");
    std::fs::write(&log, LOG).unwrap();

    let out = Command::new(bin())
        .arg("--json")
        .arg(&log)
        .arg(&packed)
        .output()
        .unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("\"command\": \"pack\""));
    assert!(stderr.contains("\"records\": 3"));
}
