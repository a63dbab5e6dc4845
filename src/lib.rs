//! 객관식 문항 JSON을 HWPX 구역(section) XML로 만드는 라이브러리.
//!
//! `hwpx` 모듈은 문단·표·구역 속성을 요소 트리로 구성하고 한 번에 직렬화한다.
//! `exam` 모듈은 문항(지문, 보기, 선택지, 정답, 해설)을 그 트리로 배치한다.
//!
//! ```no_run
//! let json = r#"{"questions":[{"prompt":"다음 중 옳은 것은?","choices":["가","나"]}]}"#;
//! let section = hwpmaker::exam::generate_from_str(json).unwrap();
//! println!("{}", section.section_xml);
//! ```

pub mod error;
pub mod exam;
pub mod hwpx;

pub use error::{HwpError, Result};
pub use exam::{generate, generate_from_str, generate_from_value, ExamError, GeneratedSection};
