use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use serde_json::{json, Map, Value};
use tracing_subscriber::EnvFilter;

use hwpmaker::exam::{self, ExamError, GeneratedSection, QuestionSet};

/// `--sample` 입력
const SAMPLE_PAYLOAD: &str = include_str!("../../demos/sample.json");

#[derive(Parser)]
#[command(name = "hwpmaker", version, about = "문항 JSON을 HWPX 구역 XML로 생성")]
struct Cli {
    /// 입력 JSON 파일 경로 ('-'이면 stdin에서 읽기)
    #[arg(required_unless_present = "sample", conflicts_with = "sample")]
    input: Option<String>,

    /// 출력 XML 파일 경로
    #[arg(short, long, default_value = "generated-section.xml")]
    output: PathBuf,

    /// 파일 대신 표준 출력으로 XML 출력
    #[arg(long)]
    stdout: bool,

    /// 생성 옵션 JSON (입력 파일의 options 위에 덮어씀)
    #[arg(long, value_name = "JSON")]
    options: Option<String>,

    /// 태그 사이 공백 없이 출력
    #[arg(long, conflicts_with = "pretty")]
    minify: bool,

    /// 두 칸 들여쓰기로 출력
    #[arg(long)]
    pretty: bool,

    /// 내장 샘플 문항 사용
    #[arg(long)]
    sample: bool,

    /// 시작 문단 ID
    #[arg(long, value_name = "N")]
    base_paragraph: Option<u64>,

    /// 시작 표 ID
    #[arg(long, value_name = "N")]
    base_table: Option<u64>,

    /// 정답 구역 XML 저장 경로
    #[arg(long, value_name = "PATH")]
    answer_output: Option<PathBuf>,

    /// JSON 형식으로 결과/에러 출력
    #[arg(long)]
    json: bool,

    /// 검증만 수행 (생성하지 않음)
    #[arg(long)]
    validate: bool,
}

fn main() {
    let cli = Cli::parse();

    // 표준 에러는 진행/에러 출력과 같이 쓰므로 기본은 warn
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    if let Err(e) = run(&cli) {
        let code = e.exit_code();
        if cli.json {
            let body = json!({
                "error": {
                    "code": e.error_code(),
                    "message": e.to_string(),
                },
                "exitCode": code,
            });
            eprintln!("{}", body);
        } else {
            eprintln!("오류: {}", e);
        }
        process::exit(code);
    }
}

fn run(cli: &Cli) -> Result<(), ExamError> {
    let json_str = match (&cli.input, cli.sample) {
        (_, true) => SAMPLE_PAYLOAD.to_string(),
        (Some(input), false) => read_input(input)?,
        (None, false) => return Err(ExamError::Input("입력 파일이 필요합니다".to_string())),
    };

    let payload: Value = serde_json::from_str(&json_str)?;
    let payload = apply_cli_options(payload, cli)?;
    let set = QuestionSet::from_value(&payload)?;

    if cli.validate {
        if cli.json {
            println!("{}", json!({ "valid": true, "questionCount": set.questions.len() }));
        } else {
            eprintln!("검증 성공: {}개 문항", set.questions.len());
        }
        return Ok(());
    }

    let generated = exam::generate(&set)?;

    if cli.stdout {
        let mut out = std::io::stdout().lock();
        out.write_all(generated.section_xml.as_bytes())?;
        if !generated.section_xml.ends_with('\n') {
            out.write_all(b"\n")?;
        }
    } else {
        write_file(&cli.output, &generated.section_xml)?;
    }

    let answer_path = match (&cli.answer_output, &generated.answer_section_xml) {
        (Some(path), Some(xml)) => {
            write_file(path, xml)?;
            Some(path.as_path())
        }
        (Some(path), None) => {
            tracing::warn!(
                path = %path.display(),
                "정답/해설이 있는 문항이 없어 정답 구역을 만들지 않음"
            );
            None
        }
        _ => None,
    };

    report(cli, &generated, answer_path);
    Ok(())
}

/// 입력 소스에서 JSON 문자열 읽기
fn read_input(input: &str) -> Result<String, ExamError> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| ExamError::Input(format!("stdin 읽기 실패: {}", e)))?;
        Ok(buf)
    } else {
        let path = PathBuf::from(input);
        std::fs::read_to_string(&path).map_err(|e| {
            ExamError::Input(format!("입력 파일 읽기 실패: {} ({})", path.display(), e))
        })
    }
}

/// `--options`, `--base-*`, `--minify`/`--pretty`를 입력의 options 위에 합친다.
/// 문항 배열만 있는 입력은 `{questions}` 객체로 감싼다.
fn apply_cli_options(payload: Value, cli: &Cli) -> Result<Value, ExamError> {
    let mut root = match payload {
        Value::Array(questions) => {
            let mut obj = Map::new();
            obj.insert("questions".to_string(), Value::Array(questions));
            obj
        }
        Value::Object(obj) => obj,
        _ => {
            return Err(ExamError::Input(
                "입력 JSON은 객체 또는 배열이어야 합니다".to_string(),
            ))
        }
    };

    let mut options = match root.remove("options") {
        Some(Value::Object(obj)) => obj,
        _ => Map::new(),
    };

    if let Some(raw) = &cli.options {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(extra)) => options.extend(extra),
            Ok(_) => {
                return Err(ExamError::Input(
                    "--options 값은 JSON 객체여야 합니다".to_string(),
                ))
            }
            Err(e) => {
                return Err(ExamError::Input(format!("--options 파싱 실패: {}", e)));
            }
        }
    }
    if let Some(id) = cli.base_paragraph {
        options.insert("baseParagraphId".to_string(), json!(id));
    }
    if let Some(id) = cli.base_table {
        options.insert("baseTableId".to_string(), json!(id));
    }
    if cli.minify {
        options.insert("minifyOutput".to_string(), json!(true));
    } else if cli.pretty {
        options.insert("minifyOutput".to_string(), json!(false));
    }

    root.insert("options".to_string(), Value::Object(options));
    Ok(Value::Object(root))
}

/// 상위 디렉토리를 만들고 파일 저장
fn write_file(path: &Path, contents: &str) -> Result<(), ExamError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}

fn report(cli: &Cli, generated: &GeneratedSection, answer_path: Option<&Path>) {
    let output = if cli.stdout {
        None
    } else {
        Some(cli.output.as_path())
    };

    if cli.json {
        let body = json!({
            "questionCount": generated.question_count,
            "output": output.map(|p| p.display().to_string()),
            "answerOutput": answer_path.map(|p| p.display().to_string()),
            "hasAnswerSection": generated.answer_section_xml.is_some(),
        });
        if cli.stdout {
            eprintln!("{}", body);
        } else {
            println!("{}", body);
        }
        return;
    }

    if let Some(path) = output {
        println!(
            "Generated {} question(s) at {}",
            generated.question_count,
            path.display()
        );
    }
    if let Some(path) = answer_path {
        println!("Answer section written to {}", path.display());
    }
}
