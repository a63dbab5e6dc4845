//! 객관식 문항 배치.
//!
//! 입력 JSON을 [`QuestionSet`]으로 한 번 정규화한 뒤, 문항마다
//! 발문 → 지문 → 보기 → 선택지 → 정답 → 해설 → 여백 순서로 블록을 만든다.
//! 모든 ID는 호출마다 새로 만든 [`IdSpace`]에서 문서 순서대로 할당된다.

pub mod answers;
pub mod api;
pub mod choices;
pub mod context;
pub mod error;
pub mod estimate;
pub mod generator;
pub mod ids;
pub mod model;
pub mod statements;

pub use error::{ExamError, Result, ValidationError};
pub use generator::{
    generate, generate_from_str, generate_from_value, generate_to_file, GeneratedSection,
};
pub use ids::{IdAllocator, IdSpace};
pub use model::{
    ChoiceLayout, ContextEntry, DataTable, GeneratorOptions, Question, QuestionSet, TextEntry,
};
