pub mod element;
pub mod escape;
pub mod paragraph;
pub mod table;
pub mod writer;

pub use element::{to_document, Element, Node, XmlFormat};
pub use escape::{decode_common_entities, escape_optional, escape_xml};
pub use paragraph::{lineseg_array, paragraph, paragraph_with_runs, LineSeg, ParaStyle};
pub use table::{Cell, CellSpan, Margin, Position, Table, TableGrid, TextWrap, VertAlign};
pub use writer::{
    section_root, write_section, HeaderFooterApplyTo, PageLayout, SENTINEL_PARAGRAPH_ID,
};
