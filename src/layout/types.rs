//! Canonical (V2) page layout types
//!
//! These types only ever hold normalized data: build them through
//! [`normalize_layout`](super::normalize_layout) or mutate them through
//! [`LayoutEditor`](super::LayoutEditor), never by hand.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// 当前布局 schema 版本
pub const CURRENT_LAYOUT_VERSION: u32 = 2;
/// 每个 section 的最小列数
pub const MIN_COLUMNS: u8 = 1;
/// 每个 section 的最大列数
pub const MAX_COLUMNS: u8 = 3;

/// 输入文档被识别出的 schema 版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum LayoutVersion {
    /// 空文档或无法识别的文档
    #[strum(to_string = "empty")]
    Empty,
    #[strum(to_string = "v1")]
    V1,
    #[strum(to_string = "v2")]
    V2,
}

/// Block 类型
///
/// 解析时忽略大小写，并接受编辑器历史上用过的别名。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum BlockType {
    #[strum(to_string = "hero")]
    Hero,
    #[strum(
        to_string = "text",
        serialize = "paragraph",
        serialize = "richtext",
        serialize = "rich-text",
        serialize = "heading"
    )]
    Text,
    #[strum(to_string = "image", serialize = "img", serialize = "picture")]
    Image,
    #[strum(to_string = "button", serialize = "btn")]
    Button,
    #[strum(to_string = "cards", serialize = "feature-cards")]
    Cards,
    #[strum(to_string = "form", serialize = "contact-form")]
    Form,
    #[strum(to_string = "services")]
    Services,
    #[strum(
        to_string = "cta",
        serialize = "call-to-action",
        serialize = "call_to_action"
    )]
    Cta,
    #[strum(to_string = "spacer")]
    Spacer,
    #[strum(to_string = "divider")]
    Divider,
    #[strum(to_string = "video")]
    Video,
    #[strum(to_string = "gallery")]
    Gallery,
    #[strum(to_string = "testimonials")]
    Testimonials,
}

impl BlockType {
    /// Parse an editor-supplied type name (trimmed, case-insensitive, aliases allowed)
    pub fn parse_loose(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }

    /// Canonical type name
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// 内容块
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// 所在列（从 0 开始）
    pub column: u8,
    /// 列内行号，按列连续编号
    pub row_index: u32,
    pub col_span: u8,
    pub visible: bool,
    pub is_locked: bool,
    pub data: Map<String, Value>,
}

impl Block {
    pub fn is_hero(&self) -> bool {
        self.block_type == BlockType::Hero
    }
}

/// 页面中的一行，包含 1-3 列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub columns: u8,
    pub settings: Map<String, Value>,
    /// 按 (column, rowIndex) 排序
    pub blocks: Vec<Block>,
}

impl Section {
    /// Blocks of one column in row order
    pub fn column_blocks(&self, column: u8) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(move |b| b.column == column)
    }
}

/// Canonical page layout document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub version: u32,
    pub sections: Vec<Section>,
}

impl PageLayout {
    /// The page's hero block; always present on a normalized layout
    pub fn hero(&self) -> Option<&Block> {
        self.sections
            .first()
            .and_then(|s| s.blocks.first())
            .filter(|b| b.is_hero())
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.sections.iter().flat_map(|s| s.blocks.iter())
    }

    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|s| s.blocks.len()).sum()
    }

    /// Locate a block by id, returning `(section index, block index)`
    pub fn find_block(&self, id: &str) -> Option<(usize, usize)> {
        self.sections.iter().enumerate().find_map(|(si, section)| {
            section
                .blocks
                .iter()
                .position(|b| b.id == id)
                .map(|bi| (si, bi))
        })
    }

    pub fn find_section(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Copy for the public site: hidden blocks are removed and rows renumbered
    pub fn public_view(&self) -> PageLayout {
        let sections = self
            .sections
            .iter()
            .map(|section| {
                let mut blocks: Vec<Block> =
                    section.blocks.iter().filter(|b| b.visible).cloned().collect();
                renumber_rows(&mut blocks);
                Section {
                    id: section.id.clone(),
                    columns: section.columns,
                    settings: section.settings.clone(),
                    blocks,
                }
            })
            .collect();

        PageLayout {
            version: self.version,
            sections,
        }
    }

    pub fn to_value(&self) -> Value {
        // 所有字段都是 JSON 原生类型，序列化不会失败
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Sort blocks by `(column, rowIndex)` and renumber rows `0..n` per column.
/// The sort is stable, so ties keep their current order.
pub(crate) fn renumber_rows(blocks: &mut [Block]) {
    blocks.sort_by_key(|b| (b.column, b.row_index));
    let mut next_row = [0u32; MAX_COLUMNS as usize];
    for block in blocks.iter_mut() {
        let column = usize::from(block.column.min(MAX_COLUMNS - 1));
        block.row_index = next_row[column];
        next_row[column] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn block(id: &str, column: u8, row: u32) -> Block {
        Block {
            id: id.to_string(),
            block_type: BlockType::Text,
            column,
            row_index: row,
            col_span: 1,
            visible: true,
            is_locked: false,
            data: Map::new(),
        }
    }

    #[test]
    fn test_block_type_aliases() {
        assert_eq!(BlockType::parse_loose(" Paragraph "), Some(BlockType::Text));
        assert_eq!(BlockType::parse_loose("HERO"), Some(BlockType::Hero));
        assert_eq!(BlockType::parse_loose("call_to_action"), Some(BlockType::Cta));
        assert_eq!(BlockType::parse_loose("btn"), Some(BlockType::Button));
        assert_eq!(BlockType::parse_loose("marquee"), None);
        assert_eq!(BlockType::parse_loose(""), None);
    }

    #[test]
    fn test_block_type_names_are_canonical() {
        for t in BlockType::iter() {
            assert_eq!(BlockType::parse_loose(t.as_str()), Some(t));
            assert_eq!(t.to_string(), t.as_str());
            let json = serde_json::to_value(t).unwrap();
            assert_eq!(json, Value::String(t.as_str().to_string()));
        }
    }

    #[test]
    fn test_renumber_rows_per_column() {
        let mut blocks = vec![block("c", 1, 9), block("a", 0, 5), block("b", 0, 2)];
        renumber_rows(&mut blocks);
        let order: Vec<(&str, u8, u32)> = blocks
            .iter()
            .map(|b| (b.id.as_str(), b.column, b.row_index))
            .collect();
        assert_eq!(order, vec![("b", 0, 0), ("a", 0, 1), ("c", 1, 0)]);
    }

    #[test]
    fn test_public_view_drops_hidden_blocks() {
        let mut hidden = block("hidden", 0, 1);
        hidden.visible = false;
        let layout = PageLayout {
            version: CURRENT_LAYOUT_VERSION,
            sections: vec![Section {
                id: "section-1".to_string(),
                columns: 1,
                settings: Map::new(),
                blocks: vec![block("a", 0, 0), hidden, block("b", 0, 2)],
            }],
        };

        let public = layout.public_view();
        let ids: Vec<&str> = public.blocks().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(public.sections[0].blocks[1].row_index, 1);
        assert_eq!(layout.block_count(), 3);
    }
}
