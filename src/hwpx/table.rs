use std::collections::{HashMap, HashSet};

use super::element::Element;

/// 셀 병합 범위
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub col_span: u32,
    pub row_span: u32,
}

impl Default for CellSpan {
    fn default() -> Self {
        Self {
            col_span: 1,
            row_span: 1,
        }
    }
}

/// 좌/우/상/하 여백 (HWPUNIT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Margin {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Margin {
    pub const ZERO: Margin = Margin::uniform(0);

    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub const fn uniform(value: u32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn to_element(self, name: &'static str) -> Element {
        Element::new(name)
            .attr("left", self.left)
            .attr("right", self.right)
            .attr("top", self.top)
            .attr("bottom", self.bottom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VertAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

impl VertAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "TOP",
            Self::Center => "CENTER",
            Self::Bottom => "BOTTOM",
        }
    }
}

/// 표 주변 본문 배치 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextWrap {
    #[default]
    TopAndBottom,
    Square,
}

impl TextWrap {
    fn as_str(self) -> &'static str {
        match self {
            Self::TopAndBottom => "TOP_AND_BOTTOM",
            Self::Square => "SQUARE",
        }
    }
}

/// 개체 위치 (`hp:pos`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub treat_as_char: bool,
    pub flow_with_text: bool,
    pub allow_overlap: bool,
    pub vert_rel_to: &'static str,
    pub horz_rel_to: &'static str,
    pub vert_align: &'static str,
    pub horz_align: &'static str,
    pub vert_offset: u32,
    pub horz_offset: u32,
}

impl Position {
    /// 글자처럼 취급되는 본문 안 개체
    pub const INLINE: Position = Position {
        treat_as_char: true,
        flow_with_text: true,
        allow_overlap: false,
        vert_rel_to: "PARA",
        horz_rel_to: "PARA",
        vert_align: "TOP",
        horz_align: "LEFT",
        vert_offset: 0,
        horz_offset: 0,
    };

    pub fn to_element(&self) -> Element {
        Element::new("hp:pos")
            .attr("treatAsChar", u8::from(self.treat_as_char))
            .attr("affectLSpacing", 0)
            .attr("flowWithText", u8::from(self.flow_with_text))
            .attr("allowOverlap", u8::from(self.allow_overlap))
            .attr("holdAnchorAndSO", 0)
            .attr("vertRelTo", self.vert_rel_to)
            .attr("horzRelTo", self.horz_rel_to)
            .attr("vertAlign", self.vert_align)
            .attr("horzAlign", self.horz_align)
            .attr("vertOffset", self.vert_offset)
            .attr("horzOffset", self.horz_offset)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::INLINE
    }
}

/// 셀·머리말·꼬리말 안의 문단 목록 (`hp:subList`)
pub fn sub_list(vert_align: VertAlign, text_width: u32, text_height: u32) -> Element {
    Element::new("hp:subList")
        .attr("id", "")
        .attr("textDirection", "HORIZONTAL")
        .attr("lineWrap", "BREAK")
        .attr("vertAlign", vert_align.as_str())
        .attr("linkListIDRef", 0)
        .attr("linkListNextIDRef", 0)
        .attr("textWidth", text_width)
        .attr("textHeight", text_height)
        .attr("hasTextRef", 0)
        .attr("hasNumRef", 0)
}

/// 표 셀 (`hp:tc`)
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub col: u32,
    pub row: u32,
    pub span: CellSpan,
    pub width: u32,
    pub height: u32,
    pub border_fill: u32,
    pub has_margin: bool,
    pub margin: Margin,
    pub vert_align: VertAlign,
    pub paragraphs: Vec<Element>,
}

impl Cell {
    pub fn new(col: u32, row: u32) -> Self {
        Self {
            col,
            row,
            span: CellSpan::default(),
            width: 0,
            height: 0,
            border_fill: 3,
            has_margin: false,
            margin: Margin::ZERO,
            vert_align: VertAlign::Center,
            paragraphs: Vec::new(),
        }
    }

    pub fn span(mut self, col_span: u32, row_span: u32) -> Self {
        self.span = CellSpan { col_span, row_span };
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn border_fill(mut self, id: u32) -> Self {
        self.border_fill = id;
        self
    }

    pub fn margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    pub fn has_margin(mut self, has_margin: bool) -> Self {
        self.has_margin = has_margin;
        self
    }

    pub fn vert_align(mut self, align: VertAlign) -> Self {
        self.vert_align = align;
        self
    }

    pub fn paragraph(mut self, paragraph: Element) -> Self {
        self.paragraphs.push(paragraph);
        self
    }

    pub fn paragraphs(mut self, paragraphs: impl IntoIterator<Item = Element>) -> Self {
        self.paragraphs.extend(paragraphs);
        self
    }

    pub fn into_element(self) -> Element {
        Element::new("hp:tc")
            .attr("name", "")
            .attr("header", 0)
            .attr("hasMargin", u8::from(self.has_margin))
            .attr("protect", 0)
            .attr("editable", 0)
            .attr("dirty", 0)
            .attr("borderFillIDRef", self.border_fill)
            .child(sub_list(self.vert_align, 0, 0).children(self.paragraphs))
            .child(
                Element::new("hp:cellAddr")
                    .attr("colAddr", self.col)
                    .attr("rowAddr", self.row),
            )
            .child(
                Element::new("hp:cellSpan")
                    .attr("colSpan", self.span.col_span)
                    .attr("rowSpan", self.span.row_span),
            )
            .child(
                Element::new("hp:cellSz")
                    .attr("width", self.width)
                    .attr("height", self.height),
            )
            .child(self.margin.to_element("hp:cellMargin"))
    }
}

/// 표 (`hp:tbl`). `rowCnt`는 추가된 행 수로 정해진다.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub id: u64,
    pub z_order: u32,
    pub text_wrap: TextWrap,
    pub page_break: &'static str,
    pub col_cnt: u32,
    pub border_fill: u32,
    pub no_adjust: bool,
    pub width: u32,
    pub height: u32,
    pub protect: bool,
    pub position: Position,
    pub out_margin: Margin,
    pub in_margin: Margin,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(id: u64, col_cnt: u32) -> Self {
        Self {
            id,
            z_order: 0,
            text_wrap: TextWrap::TopAndBottom,
            page_break: "NONE",
            col_cnt,
            border_fill: 3,
            no_adjust: false,
            width: 0,
            height: 0,
            protect: false,
            position: Position::INLINE,
            out_margin: Margin::ZERO,
            in_margin: Margin::ZERO,
            rows: Vec::new(),
        }
    }

    pub fn z_order(mut self, z_order: u32) -> Self {
        self.z_order = z_order;
        self
    }

    pub fn text_wrap(mut self, wrap: TextWrap) -> Self {
        self.text_wrap = wrap;
        self
    }

    pub fn page_break(mut self, page_break: &'static str) -> Self {
        self.page_break = page_break;
        self
    }

    pub fn border_fill(mut self, id: u32) -> Self {
        self.border_fill = id;
        self
    }

    pub fn no_adjust(mut self, no_adjust: bool) -> Self {
        self.no_adjust = no_adjust;
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn protect(mut self, protect: bool) -> Self {
        self.protect = protect;
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn out_margin(mut self, margin: Margin) -> Self {
        self.out_margin = margin;
        self
    }

    pub fn in_margin(mut self, margin: Margin) -> Self {
        self.in_margin = margin;
        self
    }

    pub fn row(mut self, cells: Vec<Cell>) -> Self {
        self.rows.push(cells);
        self
    }

    pub fn push_row(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn into_element(self) -> Element {
        let tbl = Element::new("hp:tbl")
            .attr("id", self.id)
            .attr("zOrder", self.z_order)
            .attr("numberingType", "TABLE")
            .attr("textWrap", self.text_wrap.as_str())
            .attr("textFlow", "BOTH_SIDES")
            .attr("lock", 0)
            .attr("dropcapstyle", "None")
            .attr("pageBreak", self.page_break)
            .attr("repeatHeader", 1)
            .attr("rowCnt", self.rows.len())
            .attr("colCnt", self.col_cnt)
            .attr("cellSpacing", 0)
            .attr("borderFillIDRef", self.border_fill)
            .attr("noAdjust", u8::from(self.no_adjust))
            .child(
                Element::new("hp:sz")
                    .attr("width", self.width)
                    .attr("widthRelTo", "ABSOLUTE")
                    .attr("height", self.height)
                    .attr("heightRelTo", "ABSOLUTE")
                    .attr("protect", u8::from(self.protect)),
            )
            .child(self.position.to_element())
            .child(self.out_margin.to_element("hp:outMargin"))
            .child(self.in_margin.to_element("hp:inMargin"));

        tbl.children(self.rows.into_iter().map(|cells| {
            Element::new("hp:tr").children(cells.into_iter().map(Cell::into_element))
        }))
    }
}

/// 병합 정보를 가진 텍스트 격자.
///
/// 병합의 시작 셀만 텍스트를 가지며, 가려진 셀은 출력에서 건너뛴다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableGrid {
    pub rows: Vec<Vec<String>>,
    /// 병합 시작 셀 (row, col) 기준 범위
    pub cell_spans: HashMap<(usize, usize), CellSpan>,
    covered: HashSet<(usize, usize)>,
}

impl TableGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![vec![String::new(); cols]; rows],
            ..Self::default()
        }
    }

    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: &str) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value.to_string();
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// 병합 범위를 지정하고 가려지는 셀을 표시
    pub fn set_cell_span(&mut self, row: usize, col: usize, col_span: u32, row_span: u32) {
        if col_span <= 1 && row_span <= 1 {
            return;
        }
        self.cell_spans
            .insert((row, col), CellSpan { col_span, row_span });
        for r in row..row + row_span as usize {
            for c in col..col + col_span as usize {
                if r != row || c != col {
                    self.covered.insert((r, c));
                }
            }
        }
    }

    pub fn is_covered(&self, row: usize, col: usize) -> bool {
        self.covered.contains(&(row, col))
    }

    pub fn get_cell_span(&self, row: usize, col: usize) -> CellSpan {
        self.cell_spans
            .get(&(row, col))
            .copied()
            .unwrap_or_default()
    }

    pub fn has_spans(&self) -> bool {
        !self.cell_spans.is_empty()
    }

    /// 행 길이를 `cols`로 맞춘다 (모자라면 빈 문자열, 넘치면 절단)
    pub fn normalize_width(&mut self, cols: usize) {
        for row in &mut self.rows {
            row.resize(cols, String::new());
        }
    }
}
