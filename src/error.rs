use thiserror::Error;

/// HWPX 마크업 생성 계층의 에러
#[derive(Debug, Error)]
pub enum HwpError {
    /// XML 직렬화 실패
    #[error("XML 직렬화 에러: {0}")]
    Xml(String),

    #[error("IO 에러: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwpError>;
