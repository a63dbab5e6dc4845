use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn cargo_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_hwpmaker"))
}

fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos")
}

#[test]
fn test_cli_basic_generation() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("out/section0.xml");

    let result = Command::new(cargo_bin())
        .arg(demos_path().join("context_tables.json"))
        .arg("-o")
        .arg(&output)
        .output()
        .unwrap();

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Generated 2 question(s) at"));
    let xml = std::fs::read_to_string(&output).unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<hs:sec"));
}

#[test]
fn test_cli_default_output_filename() {
    let tmp = tempfile::tempdir().unwrap();

    let status = Command::new(cargo_bin())
        .arg("--sample")
        .current_dir(tmp.path())
        .status()
        .unwrap();

    assert!(status.success());
    assert!(tmp.path().join("generated-section.xml").exists());
}

#[test]
fn test_cli_stdout() {
    let result = Command::new(cargo_bin())
        .arg("--sample")
        .arg("--stdout")
        .output()
        .unwrap();

    assert!(result.status.success());
    let stdout = String::from_utf8(result.stdout).unwrap();
    assert!(stdout.starts_with("<?xml"));
    assert!(stdout.ends_with("</hs:sec>\n"));
    assert!(stdout.contains("샘플 문제"));
}

#[test]
fn test_cli_stdin_input() {
    let mut child = Command::new(cargo_bin())
        .arg("-")
        .arg("--stdout")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(r#"[{"prompt":"표준 입력 문항","choices":["가","나"]}]"#.as_bytes())
        .unwrap();

    let result = child.wait_with_output().unwrap();
    assert!(result.status.success());
    let stdout = String::from_utf8(result.stdout).unwrap();
    assert!(stdout.contains("표준 입력 문항"));
    assert!(stdout.contains("② 나"));
}

#[test]
fn test_cli_options_and_base_ids() {
    let result = Command::new(cargo_bin())
        .arg(demos_path().join("bare_array.json"))
        .arg("--stdout")
        .arg("--pretty")
        .arg("--options")
        .arg(r#"{"spacersPerQuestion":0}"#)
        .arg("--base-paragraph")
        .arg("500")
        .arg("--base-table")
        .arg("900")
        .output()
        .unwrap();

    assert!(result.status.success());
    let stdout = String::from_utf8(result.stdout).unwrap();
    assert!(stdout.contains(r#"<hp:p id="500""#));
    assert!(stdout.contains(r#"<hp:tbl id="900""#));
    assert!(stdout.contains("\n  <hp:p "));
    // 문단형 선택지 6개, 여백 문단 없음
    assert_eq!(stdout.matches(r#"paraPrIDRef="6" styleIDRef="10""#).count(), 6);
}

#[test]
fn test_cli_answer_output() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("section0.xml");
    let answers = tmp.path().join("answers/section1.xml");

    let status = Command::new(cargo_bin())
        .arg("--sample")
        .arg("-o")
        .arg(&output)
        .arg("--answer-output")
        .arg(&answers)
        .status()
        .unwrap();

    assert!(status.success());
    let xml = std::fs::read_to_string(&answers).unwrap();
    assert!(xml.contains("정답: ⑤"));
    assert!(xml.contains("해설: "));
}

#[test]
fn test_cli_validate_only() {
    let tmp = tempfile::tempdir().unwrap();

    let result = Command::new(cargo_bin())
        .arg(demos_path().join("sample.json"))
        .arg("--validate")
        .arg("--json")
        .current_dir(tmp.path())
        .output()
        .unwrap();

    assert!(result.status.success());
    let body: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(body["valid"], true);
    assert_eq!(body["questionCount"], 1);
    assert!(!tmp.path().join("generated-section.xml").exists());
}

#[test]
fn test_cli_validation_error_exit_code() {
    let result = Command::new(cargo_bin())
        .arg(demos_path().join("invalid_missing_prompt.json"))
        .arg("--stdout")
        .output()
        .unwrap();

    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("오류: 검증 에러: Question at index 1 is missing a prompt."));
}

#[test]
fn test_cli_json_error_output() {
    let result = Command::new(cargo_bin())
        .arg("does-not-exist.json")
        .arg("--json")
        .output()
        .unwrap();

    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    let line = stderr.lines().last().unwrap();
    let body: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(body["error"]["code"], "INPUT_ERROR");
    assert_eq!(body["exitCode"], 1);
}

#[test]
fn test_cli_bad_options_json() {
    let result = Command::new(cargo_bin())
        .arg("--sample")
        .arg("--stdout")
        .arg("--options")
        .arg("{oops")
        .output()
        .unwrap();

    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("--options 파싱 실패"));
}

#[test]
fn test_cli_scalar_payload_is_input_error() {
    let mut child = Command::new(cargo_bin())
        .arg("-")
        .arg("--stdout")
        .stdin(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"42").unwrap();

    let result = child.wait_with_output().unwrap();
    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("입력 에러: 입력 JSON은 객체 또는 배열이어야 합니다"));
}
