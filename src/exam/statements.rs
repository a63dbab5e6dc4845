//! 보기 상자: 제목 탭이 있는 3x3 표.
//!
//! ```text
//! | 여백 | 제목 | 여백 |   (0행, 제목은 rowSpan 2)
//! | 여백 |      | 여백 |   (1행)
//! |      보기 문장       |   (2행, colSpan 3)
//! ```

use tracing::debug;

use super::estimate::estimate_statement_height;
use super::ids::IdSpace;
use super::model::GeneratorOptions;
use crate::hwpx::paragraph::{column_ctrl, run, text_run};
use crate::hwpx::{
    decode_common_entities, paragraph, paragraph_with_runs, Cell, Element, LineSeg, Margin,
    ParaStyle, Table, VertAlign,
};

pub const DEFAULT_STATEMENT_TITLE: &str = "<보 기>";
pub const STATEMENT_TABLE_WIDTH: u32 = 30557;

/// 보기 글머리표와 한글 자음 선택지에 쓰는 순서
pub const KOREAN_CONSONANTS: [char; 14] = [
    'ㄱ', 'ㄴ', 'ㄷ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅅ', 'ㅇ', 'ㅈ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

const TITLE_WIDTH: u32 = 4535;
const LEFT_WIDTH: u32 = (STATEMENT_TABLE_WIDTH - TITLE_WIDTH) / 2;
const RIGHT_WIDTH: u32 = STATEMENT_TABLE_WIDTH - TITLE_WIDTH - LEFT_WIDTH;
const SPACER_ROW_HEIGHT: u32 = 645;
const TITLE_HEIGHT: u32 = SPACER_ROW_HEIGHT * 2;
const SMALL_CELL_MARGIN: Margin = Margin::uniform(141);
const STATEMENT_CELL_MARGIN: Margin = Margin::new(850, 850, 708, 850);
const STATEMENT_TEXT_WIDTH: u32 = STATEMENT_TABLE_WIDTH - 850 * 2 - 1;

const HOST_STYLE: ParaStyle = ParaStyle::new(59, 8, 62);
const SPACER_STYLE: ParaStyle = ParaStyle::new(48, 0, 59);
const TITLE_STYLE: ParaStyle = ParaStyle::new(61, 38, 35);
const STATEMENT_STYLE: ParaStyle = ParaStyle::new(63, 0, 53);
const STATEMENT_Z_ORDER: u32 = 22;

/// 제목 정규화: 비어 있으면 기본값, `&lt;`/`&gt;` 복원, `<보기>` 변형은 `<보 기>`로 통일
pub fn normalize_statement_title(title: Option<&str>) -> String {
    let Some(title) = title.filter(|t| !t.trim().is_empty()) else {
        return DEFAULT_STATEMENT_TITLE.to_string();
    };

    let decoded = decode_common_entities(title);
    let trimmed = decoded.trim();
    let is_bogi = trimmed
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .map(|inner| inner.chars().filter(|c| !c.is_whitespace()).collect::<String>() == "보기")
        .unwrap_or(false);

    if is_bogi {
        DEFAULT_STATEMENT_TITLE.to_string()
    } else {
        decoded
    }
}

/// `ㄱ.`, `ㄴ.`, ... 14개를 넘으면 처음부터 반복
pub fn bullet_label(index: usize) -> String {
    format!("{}.", KOREAN_CONSONANTS[index % KOREAN_CONSONANTS.len()])
}

fn spacer_cell(id: u64, col: u32, row: u32, width: u32, border_fill: u32) -> Cell {
    Cell::new(col, row)
        .size(width, SPACER_ROW_HEIGHT)
        .border_fill(border_fill)
        .margin(SMALL_CELL_MARGIN)
        .paragraph(paragraph(
            id,
            SPACER_STYLE,
            "",
            LineSeg::new()
                .height(100)
                .baseline(85)
                .spacing(40)
                .width(width.saturating_sub(SMALL_CELL_MARGIN.left + SMALL_CELL_MARGIN.right)),
            true,
        ))
}

fn statement_paragraph(id: u64, text: &str, with_column_ctrl: bool) -> Element {
    let mut runs = Vec::with_capacity(2);
    if with_column_ctrl {
        runs.push(run(STATEMENT_STYLE.char_pr).child(column_ctrl(1, 0)));
    }
    runs.push(text_run(STATEMENT_STYLE.char_pr, text, false));

    paragraph_with_runs(
        id,
        STATEMENT_STYLE,
        runs,
        &[LineSeg::new()
            .baseline(575)
            .width(STATEMENT_TEXT_WIDTH)
            .flags(2490368)],
    )
}

/// 보기 상자 문단. 제목과 문장이 모두 없으면 `None`.
pub fn build_statement_block(
    title: Option<&str>,
    statements: &[String],
    options: &GeneratorOptions,
    ids: &mut IdSpace,
) -> Option<Element> {
    let lines: Vec<String> = statements
        .iter()
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(index, s)| {
            if options.statement_bullets {
                format!("{} {}", bullet_label(index), s)
            } else {
                s.clone()
            }
        })
        .collect();
    let has_title = title.is_some_and(|t| !t.trim().is_empty());
    if lines.is_empty() && !has_title {
        return None;
    }

    let paragraph_id = ids.paragraph();
    let table_id = ids.table();
    let title = normalize_statement_title(title);

    let top_left = spacer_cell(ids.paragraph(), 0, 0, LEFT_WIDTH, 8);
    let title_cell = Cell::new(1, 0)
        .span(1, 2)
        .size(TITLE_WIDTH, TITLE_HEIGHT)
        .border_fill(9)
        .margin(SMALL_CELL_MARGIN)
        .vert_align(VertAlign::Top)
        .paragraph(paragraph(
            ids.paragraph(),
            TITLE_STYLE,
            &title,
            LineSeg::new()
                .spacing(748)
                .width(TITLE_WIDTH.saturating_sub(3)),
            false,
        ));
    let top_right = spacer_cell(ids.paragraph(), 2, 0, RIGHT_WIDTH, 8);
    let second_left = spacer_cell(ids.paragraph(), 0, 1, LEFT_WIDTH, 10);
    let second_right = spacer_cell(ids.paragraph(), 2, 1, RIGHT_WIDTH, 11);

    let statement_height = estimate_statement_height(&lines);
    let body_paragraphs: Vec<Element> = lines
        .iter()
        .enumerate()
        .map(|(index, line)| statement_paragraph(ids.paragraph(), line, index == 0))
        .collect();
    let body = Cell::new(0, 2)
        .span(3, 1)
        .size(STATEMENT_TABLE_WIDTH, statement_height)
        .border_fill(12)
        .has_margin(true)
        .margin(STATEMENT_CELL_MARGIN)
        .vert_align(VertAlign::Top)
        .paragraphs(body_paragraphs);

    let height = TITLE_HEIGHT + statement_height;
    debug!(statements = lines.len(), height, "보기 블록 생성");

    let table = Table::new(table_id, 3)
        .z_order(STATEMENT_Z_ORDER)
        .border_fill(5)
        .size(STATEMENT_TABLE_WIDTH, height)
        .row(vec![top_left, title_cell, top_right])
        .row(vec![second_left, second_right])
        .row(vec![body])
        .into_element();

    Some(paragraph_with_runs(
        paragraph_id,
        HOST_STYLE,
        vec![run(HOST_STYLE.char_pr)
            .child(table)
            .child(Element::new("hp:t"))],
        &[LineSeg::new()
            .height(height)
            .baseline(height.saturating_sub(1566).max(8872))
            .horz(1100, 30588)],
    ))
}
