use pagecraft::errors::PagecraftError;
use pagecraft::layout::{BlockType, LayoutEditor, NormalizeOptions, is_canonical};
use serde_json::{Value, json};

fn editor() -> LayoutEditor {
    let (editor, _) = LayoutEditor::from_value(&Value::Null, NormalizeOptions::default()).unwrap();
    editor
}

fn assert_canonical(editor: &LayoutEditor) {
    let value = editor.layout().to_value();
    assert!(
        is_canonical(&value, &NormalizeOptions::default()).unwrap(),
        "layout not canonical: {}",
        value
    );
}

#[cfg(test)]
mod section_tests {
    use super::*;

    #[test]
    fn test_add_section_never_goes_before_hero() {
        let mut ed = editor();
        let id = ed.add_section(2, Some(0)).unwrap();

        assert_eq!(ed.layout().sections.len(), 2);
        assert_eq!(ed.layout().sections[1].id, id);
        assert!(ed.layout().hero().is_some());
        assert_canonical(&ed);
    }

    #[test]
    fn test_add_section_rejects_bad_columns_and_limit() {
        let mut ed = editor();
        assert!(matches!(
            ed.add_section(4, None).unwrap_err(),
            PagecraftError::Validation(_)
        ));

        let opts = NormalizeOptions {
            max_sections: 1,
            ..NormalizeOptions::default()
        };
        let (mut small, _) = LayoutEditor::from_value(&Value::Null, opts).unwrap();
        let err = small.add_section(1, None).unwrap_err();
        assert_eq!(err.code(), "E022");
    }

    #[test]
    fn test_hero_section_cannot_be_removed() {
        let mut ed = editor();
        let hero_section = ed.layout().sections[0].id.clone();
        let err = ed.remove_section(&hero_section).unwrap_err();
        assert!(matches!(err, PagecraftError::LayoutLocked(_)));

        let other = ed.add_section(1, None).unwrap();
        ed.remove_section(&other).unwrap();
        assert_eq!(ed.layout().sections.len(), 1);
    }

    #[test]
    fn test_shrinking_columns_moves_blocks() {
        let mut ed = editor();
        let section = ed.add_section(3, None).unwrap();
        let a = ed.add_block(&section, 0, BlockType::Text, None).unwrap();
        let b = ed.add_block(&section, 2, BlockType::Image, None).unwrap();

        ed.set_section_columns(&section, 1).unwrap();

        let s = &ed.layout().sections[1];
        assert_eq!(s.columns, 1);
        let ids: Vec<_> = s.blocks.iter().map(|blk| blk.id.clone()).collect();
        assert_eq!(ids, vec![a, b]);
        assert!(s.blocks.iter().all(|blk| blk.column == 0 && blk.col_span == 1));
        assert_canonical(&ed);
    }

    #[test]
    fn test_section_settings_are_sanitized() {
        let mut ed = editor();
        let section = ed.add_section(1, None).unwrap();
        let issues = ed
            .update_section_settings(&section, &json!({"background": "not-a-color"}))
            .unwrap();
        assert!(!issues.is_empty());
        assert_canonical(&ed);
    }
}

#[cfg(test)]
mod block_tests {
    use super::*;

    #[test]
    fn test_add_block_uses_defaults_and_type_ids() {
        let mut ed = editor();
        let section = ed.layout().sections[0].id.clone();
        let first = ed.add_block(&section, 0, BlockType::Button, None).unwrap();
        let second = ed.add_block(&section, 0, BlockType::Button, None).unwrap();

        assert_eq!(first, "button-1");
        assert_eq!(second, "button-2");
        let (si, bi) = ed.layout().find_block(&first).unwrap();
        let block = &ed.layout().sections[si].blocks[bi];
        assert_eq!(block.data["label"], "Learn more");
        assert_eq!(block.row_index, 1);
        assert_canonical(&ed);
    }

    #[test]
    fn test_row_zero_in_hero_column_stays_with_hero() {
        let mut ed = editor();
        let section = ed.layout().sections[0].id.clone();
        ed.add_block(&section, 0, BlockType::Text, Some(0)).unwrap();

        assert!(ed.layout().sections[0].blocks[0].is_hero());
        assert_eq!(ed.layout().sections[0].blocks[1].row_index, 1);
    }

    #[test]
    fn test_second_hero_is_rejected() {
        let mut ed = editor();
        let section = ed.layout().sections[0].id.clone();
        let err = ed.add_block(&section, 0, BlockType::Hero, None).unwrap_err();
        assert_eq!(err.code(), "E022");
    }

    #[test]
    fn test_add_block_to_missing_column_or_section() {
        let mut ed = editor();
        let section = ed.layout().sections[0].id.clone();
        assert!(matches!(
            ed.add_block(&section, 1, BlockType::Text, None).unwrap_err(),
            PagecraftError::Validation(_)
        ));
        assert!(matches!(
            ed.add_block("nope", 0, BlockType::Text, None).unwrap_err(),
            PagecraftError::NotFound(_)
        ));
    }

    #[test]
    fn test_block_capacity() {
        let opts = NormalizeOptions {
            max_blocks_per_section: 2,
            ..NormalizeOptions::default()
        };
        let (mut ed, _) = LayoutEditor::from_value(&Value::Null, opts).unwrap();
        let section = ed.layout().sections[0].id.clone();
        ed.add_block(&section, 0, BlockType::Text, None).unwrap();
        let err = ed.add_block(&section, 0, BlockType::Text, None).unwrap_err();
        assert_eq!(err.code(), "E022");
    }

    #[test]
    fn test_move_block_between_sections() {
        let mut ed = editor();
        let first = ed.layout().sections[0].id.clone();
        let second = ed.add_section(2, None).unwrap();
        let a = ed.add_block(&first, 0, BlockType::Text, None).unwrap();
        let b = ed.add_block(&second, 1, BlockType::Image, None).unwrap();

        ed.move_block(&a, &second, 1, 0).unwrap();

        let s = &ed.layout().sections[1];
        let order: Vec<_> = s.column_blocks(1).map(|blk| blk.id.clone()).collect();
        assert_eq!(order, vec![a, b]);
        assert_eq!(ed.layout().sections[0].blocks.len(), 1);
        assert_canonical(&ed);
    }

    #[test]
    fn test_hero_is_locked() {
        let mut ed = editor();
        let hero = ed.layout().hero().unwrap().id.clone();
        let other = ed.add_section(1, None).unwrap();

        for err in [
            ed.move_block(&hero, &other, 0, 0).unwrap_err(),
            ed.remove_block(&hero).unwrap_err(),
            ed.set_block_visibility(&hero, false).unwrap_err(),
            ed.set_block_col_span(&hero, 1).unwrap_err(),
        ] {
            assert_eq!(err.code(), "E021");
        }
        // 数据仍可编辑
        ed.update_block_data(&hero, &json!({"title": "New title"}))
            .unwrap();
        assert_eq!(ed.layout().hero().unwrap().data["title"], "New title");
    }

    #[test]
    fn test_update_block_data_merges_and_reports() {
        let mut ed = editor();
        let section = ed.layout().sections[0].id.clone();
        let id = ed.add_block(&section, 0, BlockType::Button, None).unwrap();

        let issues = ed
            .update_block_data(&id, &json!({"url": "javascript:alert(1)", "label": "Go"}))
            .unwrap();

        assert_eq!(issues.len(), 1);
        let (si, bi) = ed.layout().find_block(&id).unwrap();
        let data = &ed.layout().sections[si].blocks[bi].data;
        assert_eq!(data["label"], "Go");
        assert_eq!(data["url"], "#");
        assert_eq!(data["variant"], "primary");
    }

    #[test]
    fn test_visibility_and_col_span() {
        let mut ed = editor();
        let section = ed.add_section(3, None).unwrap();
        let id = ed.add_block(&section, 1, BlockType::Text, None).unwrap();

        ed.set_block_col_span(&id, 2).unwrap();
        assert!(ed.set_block_col_span(&id, 3).is_err());
        ed.set_block_visibility(&id, false).unwrap();

        let (si, bi) = ed.layout().find_block(&id).unwrap();
        let block = &ed.layout().sections[si].blocks[bi];
        assert_eq!(block.col_span, 2);
        assert!(!block.visible);

        let public = ed.layout().public_view();
        assert!(public.find_block(&id).is_none());
        assert_canonical(&ed);
    }
}
