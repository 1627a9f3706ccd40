//! Hero block 不变量
//!
//! 每个页面恰好有一个 hero：位于第一个 section 的第 0 列第 0 行，
//! 锁定、可见，并横跨该 section 的全部列。

use serde_json::json;

use super::ids::LayoutIds;
use super::normalize::NormalizeOptions;
use super::report::{IssueKind, IssueLog, index_path};
use super::sanitize::{sanitize_block_data, sanitize_section_settings};
use super::types::{Block, BlockType, MIN_COLUMNS, PageLayout, Section, renumber_rows};

pub(crate) fn enforce_hero(
    layout: &mut PageLayout,
    ids: &mut LayoutIds,
    options: &NormalizeOptions,
    issues: &mut IssueLog,
) {
    let hero = take_hero(layout);

    if layout.sections.is_empty() {
        layout.sections.push(Section {
            id: ids.sections.claim_preferred("section-1"),
            columns: MIN_COLUMNS,
            settings: sanitize_section_settings(None, "", &mut IssueLog::default()),
            blocks: Vec::new(),
        });
    }

    let mut hero = match hero {
        Some((location, hero)) => {
            if location != (0, 0) || hero.column != 0 {
                issues.push(
                    &index_path("sections", location.0),
                    IssueKind::HeroRelocated,
                    format!("hero '{}' moved to the top of the page", hero.id),
                );
            }
            hero
        }
        None => {
            issues.push(
                "sections[0]",
                IssueKind::HeroInserted,
                "page had no hero block, a default one was added",
            );
            default_hero(ids, options)
        }
    };

    let section = &mut layout.sections[0];
    hero.column = 0;
    hero.row_index = 0;
    hero.col_span = section.columns;
    hero.is_locked = true;
    hero.visible = true;

    section.blocks.insert(0, hero);
    renumber_rows(&mut section.blocks);

    // hero 挤进来之后 section 可能超出上限，按规范顺序丢弃最后一个 block
    while section.blocks.len() > options.max_blocks_per_section.max(1) {
        if let Some(dropped) = section.blocks.pop() {
            issues.push(
                "sections[0]",
                IssueKind::BlockLimitExceeded,
                format!("block '{}' dropped to make room for the hero", dropped.id),
            );
            ids.blocks.release(&dropped.id);
        }
    }
    renumber_rows(&mut section.blocks);
}

/// Remove the hero from the layout, returning it and where it was found as
/// `(section, block)` indices. Extra heroes were already dropped while the
/// sections were normalized, so there is at most one.
fn take_hero(layout: &mut PageLayout) -> Option<((usize, usize), Block)> {
    layout
        .sections
        .iter_mut()
        .enumerate()
        .find_map(|(si, section)| {
            let bi = section.blocks.iter().position(Block::is_hero)?;
            let hero = section.blocks.remove(bi);
            renumber_rows(&mut section.blocks);
            Some(((si, bi), hero))
        })
}

fn default_hero(ids: &mut LayoutIds, options: &NormalizeOptions) -> Block {
    // 走一遍清洗，保证配置中的标题与再次规范化的结果一致
    let data = sanitize_block_data(
        BlockType::Hero,
        Some(&json!({ "title": options.default_hero_title })),
        "",
        &mut IssueLog::default(),
    );

    Block {
        id: ids.blocks.claim_preferred("hero"),
        block_type: BlockType::Hero,
        column: 0,
        row_index: 0,
        col_span: 1,
        visible: true,
        is_locked: true,
        data,
    }
}

#[cfg(test)]
mod tests {
    use crate::layout::{IssueKind, NormalizeOptions, normalize_layout_with};
    use serde_json::{Value, json};

    fn normalize(doc: Value) -> crate::layout::NormalizeOutcome {
        normalize_layout_with(&doc, &NormalizeOptions::default()).unwrap()
    }

    #[test]
    fn test_hero_inserted_at_top() {
        let outcome = normalize(json!({"sections": [
            {"id": "s", "columns": 2, "blocks": [{"id": "t", "type": "text"}]}
        ]}));
        let section = &outcome.layout.sections[0];
        assert_eq!(section.blocks[0].id, "hero");
        assert_eq!(section.blocks[0].col_span, 2);
        assert!(section.blocks[0].is_locked);
        assert_eq!((section.blocks[1].id.as_str(), section.blocks[1].row_index), ("t", 1));
    }

    #[test]
    fn test_synthesized_hero_avoids_taken_id() {
        let outcome = normalize(json!({"sections": [
            {"id": "s", "blocks": [{"id": "hero", "type": "text"}]}
        ]}));
        assert_eq!(outcome.layout.hero().unwrap().id, "hero-1");
    }

    #[test]
    fn test_hero_title_from_options() {
        let options = NormalizeOptions {
            default_hero_title: "  Hello there  ".to_string(),
            ..NormalizeOptions::default()
        };
        let outcome = normalize_layout_with(&json!({"sections": []}), &options).unwrap();
        assert_eq!(outcome.layout.hero().unwrap().data["title"], json!("Hello there"));
    }

    #[test]
    fn test_duplicates_removed_and_first_relocated() {
        let outcome = normalize(json!({"sections": [
            {"id": "a", "blocks": [{"id": "t", "type": "text"}]},
            {"id": "b", "columns": 2, "blocks": [
                {"id": "h1", "type": "hero", "column": 1, "visible": false},
                {"id": "h2", "type": "hero"}
            ]}
        ]}));

        // h1 comes first in the input even though h2 sorts before it
        let hero = outcome.layout.hero().unwrap();
        assert_eq!(hero.id, "h1");
        assert_eq!(hero.col_span, 1);
        assert!(hero.visible);
        assert_eq!(outcome.layout.sections[0].blocks.len(), 2);
        assert!(outcome.layout.sections[1].blocks.is_empty());

        let kinds: Vec<IssueKind> = outcome.issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![IssueKind::DuplicateHeroRemoved, IssueKind::HeroRelocated]
        );
    }

    #[test]
    fn test_hero_beyond_block_limit_is_kept() {
        let options = NormalizeOptions {
            max_blocks_per_section: 2,
            ..NormalizeOptions::default()
        };
        let doc = json!({"sections": [{"id": "s", "blocks": [
            {"id": "a", "type": "text"},
            {"id": "b", "type": "text"},
            {"id": "myhero", "type": "hero", "data": {"title": "Real Title"}}
        ]}]});
        let outcome = normalize_layout_with(&doc, &options).unwrap();

        let hero = outcome.layout.hero().unwrap();
        assert_eq!(hero.id, "myhero");
        assert_eq!(hero.data["title"], json!("Real Title"));
        let ids: Vec<&str> = outcome.layout.blocks().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["myhero", "a"]);

        let kinds: Vec<IssueKind> = outcome.issues.iter().map(|i| i.kind).collect();
        assert!(!kinds.contains(&IssueKind::HeroInserted));
        assert_eq!(
            kinds,
            vec![IssueKind::HeroRelocated, IssueKind::BlockLimitExceeded]
        );
    }

    #[test]
    fn test_hero_respects_block_limit() {
        let options = NormalizeOptions {
            max_blocks_per_section: 2,
            ..NormalizeOptions::default()
        };
        let doc = json!({"sections": [{"id": "s", "blocks": [
            {"id": "a", "type": "text"}, {"id": "b", "type": "text"}
        ]}]});
        let outcome = normalize_layout_with(&doc, &options).unwrap();
        let ids: Vec<&str> = outcome.layout.blocks().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["hero", "a"]);

        let again = normalize_layout_with(&outcome.layout.to_value(), &options).unwrap();
        assert!(again.is_clean());
    }
}
