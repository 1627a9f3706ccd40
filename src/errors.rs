use std::fmt;

#[derive(Debug, Clone)]
pub enum PagecraftError {
    ConfigLoad(String),
    FileOperation(String),
    Serialization(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    StorageOperation(String),
    StoragePluginNotFound(String),
    UnsupportedLayoutVersion(String),
    LayoutLocked(String),
    LayoutOperation(String),
}

impl PagecraftError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            PagecraftError::ConfigLoad(_) => "E001",
            PagecraftError::FileOperation(_) => "E002",
            PagecraftError::Serialization(_) => "E003",
            PagecraftError::Validation(_) => "E004",
            PagecraftError::NotFound(_) => "E005",
            PagecraftError::Conflict(_) => "E006",
            PagecraftError::StorageOperation(_) => "E007",
            PagecraftError::StoragePluginNotFound(_) => "E008",
            PagecraftError::UnsupportedLayoutVersion(_) => "E020",
            PagecraftError::LayoutLocked(_) => "E021",
            PagecraftError::LayoutOperation(_) => "E022",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            PagecraftError::ConfigLoad(_) => "Configuration Error",
            PagecraftError::FileOperation(_) => "File Operation Error",
            PagecraftError::Serialization(_) => "Serialization Error",
            PagecraftError::Validation(_) => "Validation Error",
            PagecraftError::NotFound(_) => "Resource Not Found",
            PagecraftError::Conflict(_) => "Resource Conflict",
            PagecraftError::StorageOperation(_) => "Storage Operation Error",
            PagecraftError::StoragePluginNotFound(_) => "Storage Plugin Not Found",
            PagecraftError::UnsupportedLayoutVersion(_) => "Unsupported Layout Version",
            PagecraftError::LayoutLocked(_) => "Layout Block Locked",
            PagecraftError::LayoutOperation(_) => "Layout Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            PagecraftError::ConfigLoad(msg)
            | PagecraftError::FileOperation(msg)
            | PagecraftError::Serialization(msg)
            | PagecraftError::Validation(msg)
            | PagecraftError::NotFound(msg)
            | PagecraftError::Conflict(msg)
            | PagecraftError::StorageOperation(msg)
            | PagecraftError::StoragePluginNotFound(msg)
            | PagecraftError::UnsupportedLayoutVersion(msg)
            | PagecraftError::LayoutLocked(msg)
            | PagecraftError::LayoutOperation(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for PagecraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for PagecraftError {}

// 便捷的构造函数
impl PagecraftError {
    pub fn config_load<T: Into<String>>(msg: T) -> Self {
        PagecraftError::ConfigLoad(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        PagecraftError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        PagecraftError::Serialization(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        PagecraftError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        PagecraftError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        PagecraftError::Conflict(msg.into())
    }

    pub fn storage_operation<T: Into<String>>(msg: T) -> Self {
        PagecraftError::StorageOperation(msg.into())
    }

    pub fn storage_plugin_not_found<T: Into<String>>(msg: T) -> Self {
        PagecraftError::StoragePluginNotFound(msg.into())
    }

    pub fn unsupported_layout_version<T: Into<String>>(msg: T) -> Self {
        PagecraftError::UnsupportedLayoutVersion(msg.into())
    }

    pub fn layout_locked<T: Into<String>>(msg: T) -> Self {
        PagecraftError::LayoutLocked(msg.into())
    }

    pub fn layout_operation<T: Into<String>>(msg: T) -> Self {
        PagecraftError::LayoutOperation(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for PagecraftError {
    fn from(err: std::io::Error) -> Self {
        PagecraftError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for PagecraftError {
    fn from(err: serde_json::Error) -> Self {
        PagecraftError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for PagecraftError {
    fn from(err: toml::ser::Error) -> Self {
        PagecraftError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for PagecraftError {
    fn from(err: config::ConfigError) -> Self {
        PagecraftError::ConfigLoad(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PagecraftError>;
