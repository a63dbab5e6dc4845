use super::element::{to_document, Element, XmlFormat};
use super::paragraph::{ctrl, paragraph, run, LineSeg, ParaStyle};
use super::table::{sub_list, Cell, Margin, Position, Table, TextWrap, VertAlign};
use crate::error::Result;

// XML namespace declarations for HWPX 2011 format
pub const HWPX_NAMESPACES: [(&str, &str); 15] = [
    ("xmlns:ha", "http://www.hancom.co.kr/hwpml/2011/app"),
    ("xmlns:hp", "http://www.hancom.co.kr/hwpml/2011/paragraph"),
    ("xmlns:hp10", "http://www.hancom.co.kr/hwpml/2016/paragraph"),
    ("xmlns:hs", "http://www.hancom.co.kr/hwpml/2011/section"),
    ("xmlns:hc", "http://www.hancom.co.kr/hwpml/2011/core"),
    ("xmlns:hh", "http://www.hancom.co.kr/hwpml/2011/head"),
    ("xmlns:hhs", "http://www.hancom.co.kr/hwpml/2011/history"),
    ("xmlns:hm", "http://www.hancom.co.kr/hwpml/2011/master-page"),
    ("xmlns:hpf", "http://www.hancom.co.kr/schema/2011/hpf"),
    ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
    ("xmlns:opf", "http://www.idpf.org/2007/opf/"),
    ("xmlns:ooxmlchart", "http://www.hancom.co.kr/hwpml/2016/ooxmlchart"),
    ("xmlns:hwpunitchar", "http://www.hancom.co.kr/hwpml/2016/HwpUnitChar"),
    ("xmlns:epub", "http://www.idpf.org/2007/ops"),
    ("xmlns:config", "urn:oasis:names:tc:opendocument:xmlns:config:1.0"),
];

/// 머리말/꼬리말 템플릿 문단이 쓰는 고정 문단 ID.
/// 문단 ID 할당 범위가 이 값을 지나지 않도록 시작값을 골라야 한다.
pub const SENTINEL_PARAGRAPH_ID: u64 = 2147483648;

/// 머리말/꼬리말 적용 페이지
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFooterApplyTo {
    All,
    Odd,
    Even,
}

impl HeaderFooterApplyTo {
    fn as_hwpx(self) -> &'static str {
        match self {
            Self::All => "BOTH",
            Self::Odd => "ODD",
            Self::Even => "EVEN",
        }
    }
}

/// 구역 용지/여백/단 설정 (HWPUNIT)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub width: u32,
    pub height: u32,
    pub margin_header: u32,
    pub margin_footer: u32,
    pub margin_gutter: u32,
    pub margin_left: u32,
    pub margin_right: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub column_count: u32,
    pub column_gap: u32,
    pub master_page_count: u32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: 77102,
            height: 111685,
            margin_header: 4960,
            margin_footer: 3401,
            margin_gutter: 0,
            margin_left: 5300,
            margin_right: 5300,
            margin_top: 6236,
            margin_bottom: 5952,
            column_count: 2,
            column_gap: 3120,
            master_page_count: 4,
        }
    }
}

impl PageLayout {
    /// 좌우 여백을 뺀 본문 폭
    pub fn text_width(&self) -> u32 {
        self.width
            .saturating_sub(self.margin_left + self.margin_right)
    }
}

/// `hs:sec` 루트 (15개 네임스페이스 선언 포함)
pub fn section_root(children: impl IntoIterator<Item = Element>) -> Element {
    let mut root = Element::new("hs:sec");
    for (key, uri) in HWPX_NAMESPACES {
        root.set_attr(key, uri);
    }
    root.children(children)
}

/// XML 선언을 붙여 구역 문서를 직렬화
pub fn write_section(
    children: impl IntoIterator<Item = Element>,
    format: XmlFormat,
) -> Result<String> {
    to_document(&section_root(children), format)
}

fn note_properties(
    name: &'static str,
    line_length: i64,
    between_notes: u32,
    place: &str,
) -> Element {
    Element::new(name)
        .child(
            Element::new("hp:autoNumFormat")
                .attr("type", "DIGIT")
                .attr("userChar", "")
                .attr("prefixChar", "")
                .attr("suffixChar", ")")
                .attr("supscript", 0),
        )
        .child(
            Element::new("hp:noteLine")
                .attr("length", line_length)
                .attr("type", "SOLID")
                .attr("width", "0.12 mm")
                .attr("color", "#000000"),
        )
        .child(
            Element::new("hp:noteSpacing")
                .attr("betweenNotes", between_notes)
                .attr("belowLine", 567)
                .attr("aboveLine", 850),
        )
        .child(
            Element::new("hp:numbering")
                .attr("type", "CONTINUOUS")
                .attr("newNum", 1),
        )
        .child(
            Element::new("hp:placement")
                .attr("place", place)
                .attr("beneathText", 0),
        )
}

fn page_border_fill(kind: &str) -> Element {
    Element::new("hp:pageBorderFill")
        .attr("type", kind)
        .attr("borderFillIDRef", 1)
        .attr("textBorder", "PAPER")
        .attr("headerInside", 0)
        .attr("footerInside", 0)
        .attr("fillArea", "PAPER")
        .child(
            Element::new("hp:offset")
                .attr("left", 1417)
                .attr("right", 1417)
                .attr("top", 1417)
                .attr("bottom", 1417),
        )
}

/// 구역 속성 (`hp:secPr`)
pub fn section_properties(layout: &PageLayout) -> Element {
    let mut sec_pr = Element::new("hp:secPr")
        .attr("id", "")
        .attr("textDirection", "HORIZONTAL")
        .attr("spaceColumns", 1134)
        .attr("tabStop", 8000)
        .attr("tabStopVal", 4000)
        .attr("tabStopUnit", "HWPUNIT")
        .attr("outlineShapeIDRef", 1)
        .attr("memoShapeIDRef", 0)
        .attr("textVerticalWidthHead", 0)
        .attr("masterPageCnt", layout.master_page_count)
        .child(
            Element::new("hp:grid")
                .attr("lineGrid", 0)
                .attr("charGrid", 0)
                .attr("wonggojiFormat", 0),
        )
        .child(
            Element::new("hp:startNum")
                .attr("pageStartsOn", "BOTH")
                .attr("page", 0)
                .attr("pic", 0)
                .attr("tbl", 0)
                .attr("equation", 0),
        )
        .child(
            Element::new("hp:visibility")
                .attr("hideFirstHeader", 0)
                .attr("hideFirstFooter", 0)
                .attr("hideFirstMasterPage", 0)
                .attr("border", "SHOW_ALL")
                .attr("fill", "SHOW_ALL")
                .attr("hideFirstPageNum", 0)
                .attr("hideFirstEmptyLine", 0)
                .attr("showLineNumber", 0),
        )
        .child(
            Element::new("hp:lineNumberShape")
                .attr("restartType", 0)
                .attr("countBy", 0)
                .attr("distance", 0)
                .attr("startNumber", 0),
        )
        .child(
            Element::new("hp:pagePr")
                .attr("landscape", "WIDELY")
                .attr("width", layout.width)
                .attr("height", layout.height)
                .attr("gutterType", "LEFT_RIGHT")
                .child(
                    Element::new("hp:margin")
                        .attr("header", layout.margin_header)
                        .attr("footer", layout.margin_footer)
                        .attr("gutter", layout.margin_gutter)
                        .attr("left", layout.margin_left)
                        .attr("right", layout.margin_right)
                        .attr("top", layout.margin_top)
                        .attr("bottom", layout.margin_bottom),
                ),
        )
        .child(note_properties("hp:footNotePr", -1, 283, "EACH_COLUMN"))
        .child(note_properties("hp:endNotePr", 14692344, 0, "END_OF_DOCUMENT"))
        .child(page_border_fill("BOTH"))
        .child(page_border_fill("EVEN"))
        .child(page_border_fill("ODD"));

    for idx in 0..layout.master_page_count {
        sec_pr.push(Element::new("hp:masterPage").attr("idRef", format!("masterpage{}", idx)));
    }
    sec_pr
}

fn header_footer_paragraph(id: u64, style: ParaStyle, line: LineSeg) -> Element {
    paragraph(id, style, "", line, false)
}

/// 빈 머리말 컨트롤
pub fn header_ctrl(layout: &PageLayout, id: u32, apply_to: HeaderFooterApplyTo) -> Element {
    let text_width = layout.text_width();
    let (style, line) = match apply_to {
        HeaderFooterApplyTo::Even => (
            ParaStyle::new(28, 33, 25),
            LineSeg::new().height(900).baseline(765).spacing(452),
        ),
        _ => (ParaStyle::new(44, 0, 53), LineSeg::new()),
    };

    ctrl(
        Element::new("hp:header")
            .attr("id", id)
            .attr("applyPageType", apply_to.as_hwpx())
            .child(
                sub_list(VertAlign::Top, text_width, layout.margin_header).child(
                    header_footer_paragraph(0, style, line.width(text_width.saturating_sub(2))),
                ),
            ),
    )
}

/// 빈 꼬리말 컨트롤. 문단 ID는 고정 값을 쓴다.
pub fn footer_ctrl(layout: &PageLayout, id: u32, apply_to: HeaderFooterApplyTo) -> Element {
    let text_width = layout.text_width();
    ctrl(
        Element::new("hp:footer")
            .attr("id", id)
            .attr("applyPageType", apply_to.as_hwpx())
            .child(
                sub_list(VertAlign::Bottom, text_width, layout.margin_footer).child(
                    header_footer_paragraph(
                        SENTINEL_PARAGRAPH_ID,
                        ParaStyle::new(54, 0, 53),
                        LineSeg::new()
                            .baseline(1150)
                            .width(text_width.saturating_sub(2)),
                    ),
                ),
            ),
    )
}

/// 첫 쪽 상단 배너 표 (1x1, 용지 기준 배치)
pub fn banner_table(layout: &PageLayout, table_id: u64) -> Element {
    const BANNER_HEIGHT: u32 = 13888;
    let width = layout.text_width().saturating_sub(30);

    let cell = Cell::new(0, 0)
        .size(width, BANNER_HEIGHT)
        .border_fill(20)
        .margin(Margin::uniform(141))
        .vert_align(VertAlign::Top)
        .paragraph(paragraph(
            SENTINEL_PARAGRAPH_ID,
            ParaStyle::new(45, 0, 52),
            "",
            LineSeg::new().spacing(804).width(width),
            false,
        ));

    Table::new(table_id, 1)
        .z_order(8)
        .text_wrap(TextWrap::Square)
        .page_break("CELL")
        .size(width, BANNER_HEIGHT)
        .position(Position {
            treat_as_char: false,
            vert_rel_to: "PAPER",
            horz_rel_to: "PAGE",
            horz_align: "CENTER",
            vert_offset: 5215,
            ..Position::INLINE
        })
        .out_margin(Margin::new(0, 0, 0, 1134))
        .row(vec![cell])
        .into_element()
}

/// 문서 첫 문단의 두 번째 run에 들어가는 쪽 번호·머리말·꼬리말·배너·감추기 컨트롤
pub fn page_setup_controls(layout: &PageLayout, banner_table_id: u64) -> Vec<Element> {
    vec![
        ctrl(Element::new("hp:newNum").attr("num", 1).attr("numType", "PAGE")),
        footer_ctrl(layout, 3, HeaderFooterApplyTo::All),
        header_ctrl(layout, 1, HeaderFooterApplyTo::Odd),
        header_ctrl(layout, 2, HeaderFooterApplyTo::Even),
        banner_table(layout, banner_table_id),
        ctrl(
            Element::new("hp:pageHiding")
                .attr("hideHeader", 1)
                .attr("hideFooter", 0)
                .attr("hideMasterPage", 0)
                .attr("hideBorder", 0)
                .attr("hideFill", 0)
                .attr("hidePageNum", 0),
        ),
    ]
}

/// 구역 속성을 담는 첫 run (다단 설정 + secPr)
pub fn section_properties_run(layout: &PageLayout, char_pr: u32) -> Element {
    run(char_pr)
        .child(super::paragraph::column_ctrl(layout.column_count, layout.column_gap))
        .child(section_properties(layout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_root_declares_namespaces() {
        let root = section_root(Vec::new());
        assert_eq!(root.name(), "hs:sec");
        assert_eq!(
            root.get_attr("xmlns:hp"),
            Some("http://www.hancom.co.kr/hwpml/2011/paragraph")
        );
        assert_eq!(
            root.get_attr("xmlns:config"),
            Some("urn:oasis:names:tc:opendocument:xmlns:config:1.0")
        );
    }

    #[test]
    fn test_write_section_has_declaration() {
        let xml = write_section(Vec::new(), XmlFormat::Compact).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(xml.contains("<hs:sec xmlns:ha="));
        assert!(xml.contains("xmlns:hp10="));
    }

    #[test]
    fn test_section_properties_layout() {
        let layout = PageLayout::default();
        let sec_pr = section_properties(&layout);
        assert_eq!(sec_pr.get_attr("masterPageCnt"), Some("4"));
        assert_eq!(sec_pr.descendants("hp:masterPage").len(), 4);
        assert_eq!(sec_pr.descendants("hp:pageBorderFill").len(), 3);

        let page = sec_pr.first_child("hp:pagePr").unwrap();
        assert_eq!(page.get_attr("width"), Some("77102"));
        assert_eq!(page.get_attr("height"), Some("111685"));
        let margin = page.first_child("hp:margin").unwrap();
        assert_eq!(margin.get_attr("top"), Some("6236"));
        assert_eq!(margin.get_attr("bottom"), Some("5952"));
    }

    #[test]
    fn test_text_width() {
        assert_eq!(PageLayout::default().text_width(), 66502);
    }

    #[test]
    fn test_header_footer_controls() {
        let layout = PageLayout::default();
        let footer = footer_ctrl(&layout, 3, HeaderFooterApplyTo::All);
        let footer_el = footer.first_child("hp:footer").unwrap();
        assert_eq!(footer_el.get_attr("applyPageType"), Some("BOTH"));
        let p = footer.descendants("hp:p")[0];
        assert_eq!(p.attr_u64("id"), Some(SENTINEL_PARAGRAPH_ID));

        let even = header_ctrl(&layout, 2, HeaderFooterApplyTo::Even);
        let p = even.descendants("hp:p")[0];
        assert_eq!(p.get_attr("paraPrIDRef"), Some("28"));
        assert_eq!(p.get_attr("styleIDRef"), Some("33"));
    }

    #[test]
    fn test_page_setup_controls_carry_banner_table() {
        let controls = page_setup_controls(&PageLayout::default(), 1900000001);
        assert_eq!(controls.len(), 6);
        let banner = controls.iter().find(|el| el.name() == "hp:tbl").unwrap();
        assert_eq!(banner.attr_u64("id"), Some(1900000001));
        assert_eq!(banner.get_attr("textWrap"), Some("SQUARE"));
        let pos = banner.first_child("hp:pos").unwrap();
        assert_eq!(pos.get_attr("vertRelTo"), Some("PAPER"));
        assert_eq!(pos.get_attr("treatAsChar"), Some("0"));
    }
}
