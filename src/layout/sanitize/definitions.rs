//! Block 数据字段定义 - 单一数据源
//!
//! 每种 block 类型的 `data` 允许哪些字段、字段类型和默认值都在这里定义。
//! 规范化时只保留表中的字段，缺失字段补默认值。
//!
//! # 添加新 block 类型的步骤
//!
//! 1. 在 `BlockType` 中添加变体
//! 2. 在这里添加字段表
//! 3. 在 `fields_for` 中添加映射

use super::{DefaultValue, FieldKind, FieldSpec};
use crate::layout::BlockType;

// ============================================================
// 字段构造函数
// ============================================================

const fn text(name: &'static str, max: usize) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Text { max },
        default: DefaultValue::Str(""),
    }
}

const fn text_or(name: &'static str, max: usize, default: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Text { max },
        default: DefaultValue::Str(default),
    }
}

const fn rich_text(name: &'static str, max: usize) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::RichText { max },
        default: DefaultValue::Str(""),
    }
}

const fn link(name: &'static str) -> FieldSpec {
    link_or(name, "")
}

const fn link_or(name: &'static str, default: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Link,
        default: DefaultValue::Str(default),
    }
}

const fn media(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Media,
        default: DefaultValue::Str(""),
    }
}

const fn boolean(name: &'static str, default: bool) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Bool,
        default: DefaultValue::Bool(default),
    }
}

const fn integer(name: &'static str, min: i64, max: i64, default: i64) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Integer { min, max },
        default: DefaultValue::Int(default),
    }
}

const fn number(name: &'static str, min: f64, max: f64, default: f64) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Number { min, max },
        default: DefaultValue::Num(default),
    }
}

const fn choice(
    name: &'static str,
    options: &'static [&'static str],
    default: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Choice(options),
        default: DefaultValue::Str(default),
    }
}

const fn color(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Color,
        default: DefaultValue::Str(""),
    }
}

const fn string_list(name: &'static str, max_items: usize, max_len: usize) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::StringList { max_items, max_len },
        default: DefaultValue::EmptyList,
    }
}

const fn list(name: &'static str, fields: &'static [FieldSpec], max_items: usize) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::List { fields, max_items },
        default: DefaultValue::EmptyList,
    }
}

// ============================================================
// 共用选项
// ============================================================

const ALIGNMENTS: &[&str] = &["left", "center", "right"];
const TEXT_ALIGNMENTS: &[&str] = &["left", "center", "right", "justify"];
const HERO_HEIGHTS: &[&str] = &["small", "medium", "large", "full"];
const BUTTON_VARIANTS: &[&str] = &["primary", "secondary", "outline", "link"];
const CTA_STYLES: &[&str] = &["banner", "card", "minimal"];
const DIVIDER_STYLES: &[&str] = &["solid", "dashed", "dotted"];
const SECTION_PADDINGS: &[&str] = &["none", "sm", "md", "lg", "xl"];

/// 表单字段类型
pub const FORM_FIELD_TYPES: &[&str] = &[
    "text", "email", "tel", "textarea", "select", "checkbox", "number", "date",
];

/// Max length of a form field name
pub const FORM_FIELD_NAME_MAX: usize = 64;

// ============================================================
// 字段表
// ============================================================

pub const HERO_FIELDS: &[FieldSpec] = &[
    text("title", 200),
    text("subtitle", 500),
    media("backgroundImage"),
    text("ctaText", 80),
    link("ctaUrl"),
    number("overlayOpacity", 0.0, 1.0, 0.4),
    choice("alignment", ALIGNMENTS, "center"),
    choice("height", HERO_HEIGHTS, "large"),
];

pub const TEXT_FIELDS: &[FieldSpec] = &[
    rich_text("content", 50_000),
    choice("alignment", TEXT_ALIGNMENTS, "left"),
];

pub const IMAGE_FIELDS: &[FieldSpec] = &[
    media("src"),
    text("alt", 300),
    text("caption", 500),
    link("link"),
    integer("width", 10, 100, 100),
    boolean("rounded", false),
];

pub const BUTTON_FIELDS: &[FieldSpec] = &[
    text_or("label", 80, "Learn more"),
    link_or("url", "#"),
    choice("variant", BUTTON_VARIANTS, "primary"),
    boolean("openInNewTab", false),
    choice("alignment", ALIGNMENTS, "left"),
];

const CARD_ITEM_FIELDS: &[FieldSpec] = &[
    text("title", 200),
    text("description", 1000),
    media("image"),
    link("link"),
    text("linkText", 80),
];

pub const CARDS_FIELDS: &[FieldSpec] = &[
    text("title", 200),
    integer("columns", 1, 4, 3),
    list("items", CARD_ITEM_FIELDS, 12),
];

const FORM_FIELD_FIELDS: &[FieldSpec] = &[
    text("name", FORM_FIELD_NAME_MAX),
    text("label", 200),
    choice("type", FORM_FIELD_TYPES, "text"),
    boolean("required", false),
    text("placeholder", 200),
    string_list("options", 50, 200),
];

pub const FORM_FIELDS: &[FieldSpec] = &[
    text("title", 200),
    text_or("submitLabel", 80, "Submit"),
    text_or("successMessage", 500, "Thank you! We will be in touch."),
    text("recipient", 254),
    list("fields", FORM_FIELD_FIELDS, 25),
];

const SERVICE_ITEM_FIELDS: &[FieldSpec] = &[
    text("title", 200),
    text("description", 1000),
    text("icon", 64),
    text("price", 64),
    link("link"),
];

pub const SERVICES_FIELDS: &[FieldSpec] = &[
    text("title", 200),
    text("subtitle", 500),
    list("items", SERVICE_ITEM_FIELDS, 24),
];

pub const CTA_FIELDS: &[FieldSpec] = &[
    text("title", 200),
    text("description", 1000),
    text_or("buttonText", 80, "Get started"),
    link_or("buttonUrl", "#"),
    color("background"),
    choice("style", CTA_STYLES, "banner"),
];

pub const SPACER_FIELDS: &[FieldSpec] = &[integer("height", 0, 400, 40)];

pub const DIVIDER_FIELDS: &[FieldSpec] = &[
    choice("style", DIVIDER_STYLES, "solid"),
    integer("thickness", 1, 10, 1),
    color("color"),
];

pub const VIDEO_FIELDS: &[FieldSpec] = &[
    media("url"),
    text("caption", 500),
    boolean("autoplay", false),
    boolean("controls", true),
    boolean("loop", false),
];

const GALLERY_IMAGE_FIELDS: &[FieldSpec] = &[
    media("src"),
    text("alt", 300),
    text("caption", 500),
];

pub const GALLERY_FIELDS: &[FieldSpec] = &[
    integer("columns", 1, 6, 3),
    list("images", GALLERY_IMAGE_FIELDS, 60),
];

const TESTIMONIAL_FIELDS: &[FieldSpec] = &[
    text("quote", 2000),
    text("author", 200),
    text("role", 200),
    media("avatar"),
];

pub const TESTIMONIALS_FIELDS: &[FieldSpec] = &[
    text("title", 200),
    list("items", TESTIMONIAL_FIELDS, 20),
];

/// Section 级设置
pub const SECTION_SETTINGS_FIELDS: &[FieldSpec] = &[
    color("background"),
    media("backgroundImage"),
    choice("padding", SECTION_PADDINGS, "md"),
    boolean("fullWidth", false),
    text("anchor", 64),
];

/// 根据 block 类型获取字段表
pub fn fields_for(block_type: BlockType) -> &'static [FieldSpec] {
    match block_type {
        BlockType::Hero => HERO_FIELDS,
        BlockType::Text => TEXT_FIELDS,
        BlockType::Image => IMAGE_FIELDS,
        BlockType::Button => BUTTON_FIELDS,
        BlockType::Cards => CARDS_FIELDS,
        BlockType::Form => FORM_FIELDS,
        BlockType::Services => SERVICES_FIELDS,
        BlockType::Cta => CTA_FIELDS,
        BlockType::Spacer => SPACER_FIELDS,
        BlockType::Divider => DIVIDER_FIELDS,
        BlockType::Video => VIDEO_FIELDS,
        BlockType::Gallery => GALLERY_FIELDS,
        BlockType::Testimonials => TESTIMONIALS_FIELDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    fn check_table(table: &[FieldSpec]) {
        let mut names = HashSet::new();
        for spec in table {
            assert!(names.insert(spec.name), "duplicate field {}", spec.name);
            match (&spec.kind, &spec.default) {
                (FieldKind::Choice(options), DefaultValue::Str(d)) => {
                    assert!(options.contains(d), "default {} not an option", d);
                }
                (FieldKind::Integer { min, max }, DefaultValue::Int(d)) => {
                    assert!(min <= d && d <= max);
                }
                (FieldKind::Number { min, max }, DefaultValue::Num(d)) => {
                    assert!(min <= d && d <= max);
                }
                (FieldKind::List { fields, .. }, DefaultValue::EmptyList) => check_table(fields),
                (FieldKind::StringList { .. }, DefaultValue::EmptyList) => {}
                (FieldKind::Bool, DefaultValue::Bool(_)) => {}
                (
                    FieldKind::Text { .. }
                    | FieldKind::RichText { .. }
                    | FieldKind::Link
                    | FieldKind::Media
                    | FieldKind::Color,
                    DefaultValue::Str(_),
                ) => {}
                _ => panic!("field {} has a default of the wrong kind", spec.name),
            }
        }
    }

    #[test]
    fn test_tables_are_consistent() {
        for block_type in BlockType::iter() {
            check_table(fields_for(block_type));
        }
        check_table(SECTION_SETTINGS_FIELDS);
    }
}
