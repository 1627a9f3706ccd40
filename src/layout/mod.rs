//! 页面布局引擎
//!
//! 编辑器保存的布局文档来自不同时期的格式，这里负责把它们统一为
//! 规范的 V2 结构：
//!
//! 1. `detect`    - 识别文档版本
//! 2. `migration` - V1 → V2
//! 3. `normalize` - section / block 结构修正、id 分配、行号整理
//! 4. `sanitize`  - 按字段表清洗 block 数据
//! 5. `hero`      - hero block 不变量
//!
//! 之后的每一次修改都通过 [`LayoutEditor`] 完成。

mod coerce;
mod detect;
mod editor;
mod hero;
mod ids;
mod migration;
mod normalize;
pub mod report;
pub mod sanitize;
pub mod types;

pub use detect::detect_layout_version;
pub use editor::LayoutEditor;
pub use normalize::{
    NormalizeOptions, NormalizeOutcome, is_canonical, layout_from_value, normalize_layout,
    normalize_layout_with,
};
pub use report::{IssueKind, LayoutIssue};
pub use sanitize::default_block_data;
pub use types::{
    Block, BlockType, CURRENT_LAYOUT_VERSION, LayoutVersion, MAX_COLUMNS, MIN_COLUMNS, PageLayout,
    Section,
};
