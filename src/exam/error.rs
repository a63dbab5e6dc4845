use thiserror::Error;

/// 문항 목록 검증 실패. 하나라도 걸리면 전체 생성을 중단한다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("\"questions\" must be a non-empty array.")]
    EmptyQuestions,

    #[error("Question at index {index} must be an object.")]
    NotAnObject { index: usize },

    #[error("Question at index {index} is missing a prompt.")]
    MissingPrompt { index: usize },

    #[error("Question at index {index} must include at least one choice.")]
    MissingChoices { index: usize },

    #[error("{namespace} ids starting at {base} run past the largest id.")]
    IdOverflow { namespace: &'static str, base: u64 },
}

impl ValidationError {
    /// 문제가 된 문항 인덱스
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::EmptyQuestions | Self::IdOverflow { .. } => None,
            Self::NotAnObject { index }
            | Self::MissingPrompt { index }
            | Self::MissingChoices { index } => Some(*index),
        }
    }
}

/// 문항 XML 생성 과정에서 발생할 수 있는 에러 타입
#[derive(Debug, Error)]
pub enum ExamError {
    /// 문항 목록 검증 실패 (exit code 1)
    #[error("검증 에러: {0}")]
    Validation(#[from] ValidationError),

    /// 입력 JSON 파싱 실패 (exit code 1)
    #[error("입력 에러: {0}")]
    Input(String),

    /// 파일 IO 에러 (exit code 3)
    #[error("IO 에러: {0}")]
    Io(#[from] std::io::Error),

    /// XML 직렬화 에러 (exit code 2)
    #[error("HWPX 에러: {0}")]
    Hwpx(String),
}

impl ExamError {
    /// CLI 종료 코드 반환
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::Input(_) => 1,
            Self::Hwpx(_) => 2,
            Self::Io(_) => 3,
        }
    }

    /// 에러 코드 문자열 반환 (JSON 출력용)
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Input(_) => "INPUT_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Hwpx(_) => "HWPX_ERROR",
        }
    }
}

impl From<crate::error::HwpError> for ExamError {
    fn from(err: crate::error::HwpError) -> Self {
        match err {
            crate::error::HwpError::Io(e) => Self::Io(e),
            other => Self::Hwpx(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ExamError {
    fn from(err: serde_json::Error) -> Self {
        Self::Input(format!("JSON 파싱 실패: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, ExamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::EmptyQuestions.to_string(),
            "\"questions\" must be a non-empty array."
        );
        assert_eq!(
            ValidationError::MissingPrompt { index: 0 }.to_string(),
            "Question at index 0 is missing a prompt."
        );
        assert_eq!(
            ValidationError::NotAnObject { index: 2 }.to_string(),
            "Question at index 2 must be an object."
        );
        assert_eq!(ValidationError::MissingChoices { index: 4 }.index(), Some(4));
    }

    #[test]
    fn test_exit_codes() {
        let err: ExamError = ValidationError::EmptyQuestions.into();
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let err = ExamError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "x"));
        assert_eq!(err.exit_code(), 3);

        let err: ExamError = crate::error::HwpError::Xml("bad".into()).into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.error_code(), "HWPX_ERROR");
    }

    #[test]
    fn test_json_error_is_input_error() {
        let err: ExamError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.error_code(), "INPUT_ERROR");
        assert!(err.to_string().starts_with("입력 에러"));
    }
}
