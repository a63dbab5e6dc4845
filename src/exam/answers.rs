//! 정답 및 해설 구역.
//!
//! 정답이나 해설이 있는 문항만 모아 별도 구역 문서로 만든다. 번호는 정답지
//! 안에서 1부터 이어 붙이고, ID는 본문과 겹치지 않도록 따로 할당한다.

use tracing::{debug, warn};

use super::choices::spacer_paragraph;
use super::error::Result;
use super::ids::IdSpace;
use super::model::{GeneratorOptions, Question};
use crate::hwpx::paragraph::run;
use crate::hwpx::table::sub_list;
use crate::hwpx::{
    paragraph, paragraph_with_runs, Cell, Element, LineSeg, Margin, ParaStyle, Position, Table,
    VertAlign,
};

const HEADING_STYLE: ParaStyle = ParaStyle::new(70, 0, 53);
const HEADING_TEXT_STYLE: ParaStyle = ParaStyle::new(46, 0, 53);
const ROW_HOST_STYLE: ParaStyle = ParaStyle::new(60, 10, 0);
const CELL_STYLE: ParaStyle = ParaStyle::new(44, 0, 53);
const EXPLANATION_STYLE: ParaStyle = ParaStyle::new(69, 48, 77);

const RECT_WIDTH: u32 = 66614;
const RECT_HEIGHT: u32 = 7200;
const RECT_ORIGINAL_SIZE: u32 = 8504;

const NUMBER_CELL_WIDTH: u32 = 1379;
const ANSWER_CELL_WIDTH: u32 = 29236;
const ANSWER_ROW_HEIGHT: u32 = 1431;
const ANSWER_COLUMNS: u32 = 10;
const ANSWER_Z_ORDER: u32 = 29;
const ANSWER_MARGIN: Margin = Margin::uniform(140);

/// 정답 구역에 들어갈 문항 하나
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerEntry<'a> {
    /// 정답지 안에서 1부터 이어지는 번호
    pub number: usize,
    /// 본문에서의 문항 인덱스 (0부터)
    pub question_index: usize,
    pub answer: Option<&'a str>,
    pub explanation: Option<&'a str>,
}

/// 정답이나 해설이 있는 문항만 골라 번호를 새로 매긴다
pub fn answer_entries(questions: &[Question]) -> Vec<AnswerEntry<'_>> {
    questions
        .iter()
        .enumerate()
        .filter(|(_, q)| q.is_answerable())
        .enumerate()
        .map(|(position, (index, q))| AnswerEntry {
            number: position + 1,
            question_index: index,
            answer: q.answer.as_deref(),
            explanation: q.explanation.as_deref(),
        })
        .collect()
}

/// 소수 여섯 자리까지, 뒤쪽 0은 생략
fn ratio(value: u32, base: u32) -> String {
    let formatted = format!("{:.6}", f64::from(value) / f64::from(base));
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

fn matrix(name: &'static str, e1: &str, e5: &str) -> Element {
    Element::new(name)
        .attr("e1", e1)
        .attr("e2", 0)
        .attr("e3", 0)
        .attr("e4", 0)
        .attr("e5", e5)
        .attr("e6", 0)
}

/// 제목을 담은 사각형 개체 (`hp:rect`)
fn heading_rect(shape_id: u64, text_paragraph_id: u64, heading: &str) -> Element {
    Element::new("hp:rect")
        .attr("id", shape_id)
        .attr("zOrder", 24)
        .attr("numberingType", "PICTURE")
        .attr("textWrap", "TOP_AND_BOTTOM")
        .attr("textFlow", "BOTH_SIDES")
        .attr("lock", 0)
        .attr("dropcapstyle", "None")
        .attr("href", "")
        .attr("groupLevel", 0)
        .attr("instid", shape_id)
        .attr("ratio", 10)
        .child(Element::new("hp:offset").attr("x", 0).attr("y", 0))
        .child(
            Element::new("hp:orgSz")
                .attr("width", RECT_ORIGINAL_SIZE)
                .attr("height", RECT_ORIGINAL_SIZE),
        )
        .child(
            Element::new("hp:curSz")
                .attr("width", RECT_WIDTH)
                .attr("height", RECT_HEIGHT),
        )
        .child(
            Element::new("hp:flip")
                .attr("horizontal", 0)
                .attr("vertical", 0),
        )
        .child(
            Element::new("hp:rotationInfo")
                .attr("angle", 0)
                .attr("centerX", RECT_WIDTH / 2)
                .attr("centerY", RECT_HEIGHT / 2)
                .attr("rotateimage", 1),
        )
        .child(
            Element::new("hp:renderingInfo")
                .child(matrix("hc:transMatrix", "1", "1"))
                .child(matrix(
                    "hc:scaMatrix",
                    &ratio(RECT_WIDTH, RECT_ORIGINAL_SIZE),
                    &ratio(RECT_HEIGHT, RECT_ORIGINAL_SIZE),
                ))
                .child(matrix("hc:rotMatrix", "1", "1")),
        )
        .child(
            Element::new("hp:lineShape")
                .attr("color", "#000000")
                .attr("width", 172)
                .attr("style", "SOLID")
                .attr("endCap", "FLAT")
                .attr("headStyle", "NORMAL")
                .attr("tailStyle", "NORMAL")
                .attr("headfill", 1)
                .attr("tailfill", 1)
                .attr("headSz", "SMALL_SMALL")
                .attr("tailSz", "SMALL_SMALL")
                .attr("outlineStyle", "NORMAL")
                .attr("alpha", 0),
        )
        .child(
            Element::new("hp:shadow")
                .attr("type", "NONE")
                .attr("color", "#B2B2B2")
                .attr("offsetX", 0)
                .attr("offsetY", 0)
                .attr("alpha", 0),
        )
        .child(
            Element::new("hp:drawText")
                .attr("lastWidth", RECT_WIDTH)
                .attr("name", "")
                .attr("editable", 0)
                .child(sub_list(VertAlign::Center, 0, 0).child(paragraph(
                    text_paragraph_id,
                    HEADING_TEXT_STYLE,
                    heading,
                    LineSeg::new().width(RECT_WIDTH - 566),
                    false,
                )))
                .child(Margin::uniform(283).to_element("hp:textMargin")),
        )
        .child(
            Position {
                treat_as_char: false,
                flow_with_text: false,
                allow_overlap: true,
                vert_rel_to: "PAPER",
                horz_rel_to: "PAPER",
                horz_align: "CENTER",
                vert_offset: 9895,
                ..Position::INLINE
            }
            .to_element(),
        )
        .child(Margin::new(0, 0, 0, 1417).to_element("hp:outMargin"))
}

fn heading_paragraph(heading: &str, ids: &mut IdSpace) -> Element {
    let paragraph_id = ids.paragraph();
    let shape_id = ids.table();
    let rect = heading_rect(shape_id, ids.paragraph(), heading);
    paragraph_with_runs(
        paragraph_id,
        HEADING_STYLE,
        vec![run(HEADING_STYLE.char_pr).child(rect)],
        &[LineSeg::new()
            .height(RECT_HEIGHT)
            .baseline(RECT_HEIGHT * 85 / 100)
            .width(30558)],
    )
}

/// 번호 셀 + 정답 셀(9칸 병합) 한 행짜리 표 문단
fn answer_row(entry: &AnswerEntry<'_>, ids: &mut IdSpace) -> Element {
    let paragraph_id = ids.paragraph();
    let table_id = ids.table();
    let answer_line = format!("{}. 정답: {}", entry.number, entry.answer.unwrap_or(""));
    let answer_text = answer_line.trim_end();

    let number_cell = Cell::new(0, 0)
        .size(NUMBER_CELL_WIDTH, ANSWER_ROW_HEIGHT)
        .border_fill(22)
        .paragraph(paragraph(
            ids.paragraph(),
            CELL_STYLE,
            &entry.number.to_string(),
            LineSeg::new().width(1440),
            false,
        ));
    let answer_cell = Cell::new(1, 0)
        .span(ANSWER_COLUMNS - 1, 1)
        .size(ANSWER_CELL_WIDTH, ANSWER_ROW_HEIGHT)
        .border_fill(22)
        .has_margin(true)
        .margin(Margin::new(184, 0, 0, 0))
        .paragraph(paragraph(
            ids.paragraph(),
            CELL_STYLE,
            answer_text,
            LineSeg::new().width(ANSWER_CELL_WIDTH - 184),
            false,
        ));

    let table = Table::new(table_id, ANSWER_COLUMNS)
        .z_order(ANSWER_Z_ORDER)
        .no_adjust(true)
        .size(NUMBER_CELL_WIDTH + ANSWER_CELL_WIDTH, ANSWER_ROW_HEIGHT)
        .position(Position {
            horz_rel_to: "COLUMN",
            ..Position::INLINE
        })
        .out_margin(ANSWER_MARGIN)
        .in_margin(ANSWER_MARGIN)
        .row(vec![number_cell, answer_cell])
        .into_element();

    paragraph_with_runs(
        paragraph_id,
        ROW_HOST_STYLE,
        vec![run(ROW_HOST_STYLE.char_pr)
            .child(table)
            .child(Element::new("hp:t"))],
        &[LineSeg::new()
            .height(ANSWER_ROW_HEIGHT)
            .baseline(ANSWER_ROW_HEIGHT - 215)
            .width(30700)],
    )
}

fn explanation_paragraph(id: u64, explanation: &str) -> Element {
    paragraph(
        id,
        EXPLANATION_STYLE,
        &format!("해설: {}", explanation),
        LineSeg::new().height(1100).baseline(935).width(31116),
        false,
    )
}

/// 정답 구역 본문 문단들. 정답/해설이 있는 문항이 없으면 `None`.
pub fn build_answer_section(
    questions: &[Question],
    options: &GeneratorOptions,
) -> Result<Option<Vec<Element>>> {
    let entries = answer_entries(questions);
    if entries.is_empty() {
        return Ok(None);
    }

    let mut ids = IdSpace::new(
        options.base_answer_paragraph_id,
        options.base_answer_table_id,
    );
    let mut blocks = vec![heading_paragraph(&options.answer_heading, &mut ids)];

    for entry in &entries {
        blocks.push(answer_row(entry, &mut ids));
        if let Some(explanation) = entry.explanation {
            blocks.push(explanation_paragraph(ids.paragraph(), explanation));
        }
        for _ in 0..options.answer_spacers_per_question {
            blocks.push(spacer_paragraph(ids.paragraph()));
        }
    }

    if ids.collides_with_sentinel() {
        warn!(
            base = options.base_answer_paragraph_id,
            "정답 구역 문단 ID 범위가 머리말/꼬리말 고정 ID와 겹침"
        );
    }
    ids.ensure_in_range()?;
    debug!(entries = entries.len(), blocks = blocks.len(), "정답 구역 생성");

    Ok(Some(blocks))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        vec![
            Question::new("하나").with_answer("③"),
            Question::new("둘"),
            Question::new("셋").with_explanation("설명만 있음"),
            Question::new("넷").with_answer("1").with_explanation("풀이"),
        ]
    }

    #[test]
    fn test_entries_are_numbered_contiguously() {
        let qs = questions();
        let entries = answer_entries(&qs);
        let numbers: Vec<usize> = entries.iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        let indices: Vec<usize> = entries.iter().map(|e| e.question_index).collect();
        assert_eq!(indices, vec![0, 2, 3]);
        assert_eq!(entries[1].answer, None);
        assert_eq!(entries[2].explanation, Some("풀이"));
    }

    #[test]
    fn test_no_answerable_questions() {
        let qs = vec![Question::new("a"), Question::new("b")];
        assert!(build_answer_section(&qs, &GeneratorOptions::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_section_layout() {
        let options = GeneratorOptions::default();
        let blocks = build_answer_section(&questions(), &options).unwrap().unwrap();
        // 제목 + (표 + 여백) + (표 + 해설 + 여백) + (표 + 해설 + 여백)
        assert_eq!(blocks.len(), 1 + 2 + 3 + 3);

        let heading = &blocks[0];
        assert_eq!(heading.get_attr("paraPrIDRef"), Some("70"));
        assert!(heading.text_content().contains("정답 및 해설"));
        let rect = heading.descendants("hp:rect")[0];
        let sca = rect.descendants("hc:scaMatrix")[0];
        assert_eq!(sca.get_attr("e1"), Some("7.833255"));
        assert_eq!(sca.get_attr("e5"), Some("0.84666"));

        let first_row = &blocks[1];
        let cells = first_row.descendants("hp:tc");
        assert_eq!(cells[0].text_content(), "1");
        assert_eq!(cells[1].text_content(), "1. 정답: ③");
        let tbl = first_row.descendants("hp:tbl")[0];
        assert_eq!(tbl.get_attr("colCnt"), Some("10"));
        assert_eq!(tbl.get_attr("noAdjust"), Some("1"));
        assert_eq!(cells[1].first_child("hp:cellSpan").unwrap().get_attr("colSpan"), Some("9"));

        // 정답 없이 해설만 있는 문항
        assert_eq!(blocks[3].descendants("hp:tc")[1].text_content(), "2. 정답:");
        assert_eq!(blocks[4].text_content(), "해설: 설명만 있음");
        assert_eq!(blocks[4].get_attr("paraPrIDRef"), Some("69"));
    }

    #[test]
    fn test_own_id_space() {
        let options = GeneratorOptions {
            base_answer_paragraph_id: 500,
            base_answer_table_id: 900,
            ..GeneratorOptions::default()
        };
        let blocks = build_answer_section(&questions(), &options).unwrap().unwrap();
        assert_eq!(blocks[0].attr_u64("id"), Some(500));
        let rect = blocks[0].descendants("hp:rect")[0];
        assert_eq!(rect.attr_u64("id"), Some(900));
        let tbl = blocks[1].descendants("hp:tbl")[0];
        assert_eq!(tbl.attr_u64("id"), Some(901));
    }

    #[test]
    fn test_answer_spacers_option() {
        let options = GeneratorOptions {
            answer_spacers_per_question: 0,
            ..GeneratorOptions::default()
        };
        let qs = vec![Question::new("a").with_answer("1")];
        let blocks = build_answer_section(&qs, &options).unwrap().unwrap();
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_answer_id_overflow_is_error() {
        let options = GeneratorOptions {
            base_answer_table_id: u64::MAX,
            ..GeneratorOptions::default()
        };
        let qs = vec![Question::new("a").with_answer("1")];
        // 제목 사각형과 정답 표가 표 ID를 하나씩 쓴다
        assert!(build_answer_section(&qs, &options).is_err());
    }
}
