use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::answers::build_answer_section;
use super::choices::{build_choice_blocks, spacer_paragraph};
use super::context::build_context_block;
use super::error::Result;
use super::ids::IdSpace;
use super::model::{GeneratorOptions, Question, QuestionSet};
use super::statements::build_statement_block;
use crate::hwpx::paragraph::run;
use crate::hwpx::writer::{page_setup_controls, section_properties_run};
use crate::hwpx::{paragraph, paragraph_with_runs, write_section, Element, LineSeg, ParaStyle};

const PROMPT_STYLE: ParaStyle = ParaStyle::new(55, 1, 3);
const ANSWER_STYLE: ParaStyle = ParaStyle::new(46, 0, 49);
const EXPLANATION_STYLE: ParaStyle = ParaStyle::new(58, 1, 3);

/// 문항 발문 줄 배치
fn prompt_line() -> LineSeg {
    LineSeg::new()
        .height(1400)
        .baseline(1190)
        .spacing(560)
        .flags(2490368)
}

/// 생성 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSection {
    /// 문항 구역 XML
    pub section_xml: String,
    /// 정답 구역 XML (정답/해설이 있는 문항이 없으면 `None`)
    pub answer_section_xml: Option<String>,
    pub question_count: usize,
}

/// 문서 첫 문단: 구역 속성 run + 쪽 설정 컨트롤과 첫 발문 run
fn opening_paragraph(prompt: &str, options: &GeneratorOptions, ids: &mut IdSpace) -> Element {
    let paragraph_id = ids.paragraph();
    let banner_table_id = ids.table();

    let controls = run(PROMPT_STYLE.char_pr)
        .children(page_setup_controls(&options.page, banner_table_id))
        .child(Element::new("hp:t").text(prompt));

    paragraph_with_runs(
        paragraph_id,
        PROMPT_STYLE,
        vec![
            section_properties_run(&options.page, PROMPT_STYLE.char_pr),
            controls,
        ],
        &[
            prompt_line().vertpos(9041),
            LineSeg::new().textpos(101).vertpos(11001).flags(1441792),
        ],
    )
}

fn prompt_paragraph(
    index: usize,
    prompt: &str,
    options: &GeneratorOptions,
    ids: &mut IdSpace,
) -> Element {
    if index == 0 {
        opening_paragraph(prompt, options, ids)
    } else {
        paragraph(ids.paragraph(), PROMPT_STYLE, prompt, prompt_line(), false)
    }
}

/// 문항 하나: 발문, 지문, 보기, 선택지, 정답, 해설, 여백 순서
pub fn build_question_blocks(
    index: usize,
    question: &Question,
    options: &GeneratorOptions,
    ids: &mut IdSpace,
) -> Vec<Element> {
    let mut blocks = vec![prompt_paragraph(index, &question.prompt, options, ids)];

    blocks.extend(build_context_block(&question.context_entries, options, ids));
    blocks.extend(build_statement_block(
        question.statement_title.as_deref(),
        &question.statements,
        options,
        ids,
    ));

    let layout = question.resolved_layout(options.choice_layout);
    blocks.extend(build_choice_blocks(&question.choices, layout, options, ids));

    if let Some(answer) = &question.answer {
        blocks.push(paragraph(
            ids.paragraph(),
            ANSWER_STYLE,
            &format!("정답: {}", answer),
            LineSeg::new(),
            false,
        ));
    }
    if let Some(explanation) = &question.explanation {
        blocks.push(paragraph(
            ids.paragraph(),
            EXPLANATION_STYLE,
            explanation,
            LineSeg::new().flags(1441792),
            false,
        ));
    }

    for _ in 0..options.spacers_per_question {
        blocks.push(spacer_paragraph(ids.paragraph()));
    }

    debug!(
        index,
        blocks = blocks.len(),
        layout = ?layout,
        "문항 배치"
    );
    blocks
}

/// 문항 구역 본문 문단 전체. ID가 `u64` 범위를 넘으면 검증 에러.
pub fn build_section_blocks(set: &QuestionSet) -> Result<Vec<Element>> {
    let options = &set.options;
    let mut ids = IdSpace::new(options.base_paragraph_id, options.base_table_id);

    let blocks: Vec<Element> = set
        .questions
        .iter()
        .enumerate()
        .flat_map(|(index, question)| build_question_blocks(index, question, options, &mut ids))
        .collect();

    if ids.collides_with_sentinel() {
        warn!(
            base = options.base_paragraph_id,
            next = ?ids.paragraphs.peek(),
            "문단 ID 범위가 머리말/꼬리말 고정 ID와 겹침"
        );
    }
    ids.ensure_in_range()?;
    debug!(
        paragraphs = ids.paragraphs.issued(),
        tables = ids.tables.issued(),
        "ID 할당 완료"
    );
    Ok(blocks)
}

/// 검증된 문항 목록으로 문항 구역과 정답 구역 XML 생성
pub fn generate(set: &QuestionSet) -> Result<GeneratedSection> {
    set.validate()?;

    let format = set.options.xml_format();
    let section_xml = write_section(build_section_blocks(set)?, format)?;
    let answer_section_xml = build_answer_section(&set.questions, &set.options)?
        .map(|blocks| write_section(blocks, format))
        .transpose()?;

    info!(
        questions = set.questions.len(),
        bytes = section_xml.len(),
        answer_section = answer_section_xml.is_some(),
        "구역 XML 생성 완료"
    );

    Ok(GeneratedSection {
        section_xml,
        answer_section_xml,
        question_count: set.questions.len(),
    })
}

/// JSON 값(`{questions, options}` 또는 문항 배열)에서 바로 생성
pub fn generate_from_value(value: &Value) -> Result<GeneratedSection> {
    generate(&QuestionSet::from_value(value)?)
}

pub fn generate_from_str(json: &str) -> Result<GeneratedSection> {
    generate(&QuestionSet::from_json_str(json)?)
}

/// 문항 구역 XML을 파일로 저장 (상위 디렉토리 자동 생성)
pub fn generate_to_file(set: &QuestionSet, path: &Path) -> Result<GeneratedSection> {
    let generated = generate(set)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &generated.section_xml)?;
    info!(path = %path.display(), "구역 XML 저장");
    Ok(generated)
}
