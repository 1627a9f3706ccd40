//! 配置值验证模块
//!
//! 启动时对静态配置做一次整体校验，避免非法值在运行中才暴露。

use super::StaticConfig;
use crate::errors::{PagecraftError, Result};

/// 支持的存储后端
pub const STORAGE_BACKENDS: &[&str] = &["file", "memory"];

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["text", "json"];

/// 验证完整的静态配置
pub fn validate_static_config(config: &StaticConfig) -> Result<()> {
    validate_storage_backend(&config.storage.backend)?;

    if config.storage.backend == "file" && config.storage.data_file.trim().is_empty() {
        return Err(PagecraftError::config_load(
            "storage.data_file cannot be empty for the file backend",
        ));
    }

    if config.layout.max_sections == 0 {
        return Err(PagecraftError::config_load(
            "layout.max_sections must be at least 1",
        ));
    }

    if config.layout.max_blocks_per_section == 0 {
        return Err(PagecraftError::config_load(
            "layout.max_blocks_per_section must be at least 1",
        ));
    }

    validate_log_level(&config.logging.level)?;
    validate_log_format(&config.logging.format)?;

    Ok(())
}

pub fn validate_storage_backend(backend: &str) -> Result<()> {
    if STORAGE_BACKENDS.contains(&backend) {
        Ok(())
    } else {
        Err(PagecraftError::config_load(format!(
            "Invalid storage backend: '{}'. Valid: {}",
            backend,
            STORAGE_BACKENDS.join(", ")
        )))
    }
}

/// 日志级别既可以是单个级别，也可以是 EnvFilter 指令（如 "pagecraft=debug,info"）
pub fn validate_log_level(level: &str) -> Result<()> {
    let level = level.trim();
    if level.is_empty() {
        return Err(PagecraftError::config_load("logging.level cannot be empty"));
    }

    if level.contains('=') || level.contains(',') {
        return Ok(());
    }

    if LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(PagecraftError::config_load(format!(
            "Invalid log level: '{}'. Valid: {}",
            level,
            LOG_LEVELS.join(", ")
        )))
    }
}

pub fn validate_log_format(format: &str) -> Result<()> {
    if LOG_FORMATS.contains(&format) {
        Ok(())
    } else {
        Err(PagecraftError::config_load(format!(
            "Invalid log format: '{}'. Valid: {}",
            format,
            LOG_FORMATS.join(", ")
        )))
    }
}
