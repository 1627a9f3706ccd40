//! URL 验证模块
//!
//! 页面内容里的链接既可能是绝对地址，也可能是站内相对路径、锚点、
//! mailto/tel。媒体地址只允许 http(s) 和站内路径。危险协议一律拒绝。

use url::Url;

/// URL 验证错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(f, "Protocol not allowed here: {}", proto),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// URL 用途
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// 超链接：http(s)、/path、#anchor、mailto:、tel:
    Link,
    /// 媒体资源：http(s)、/path
    Media,
}

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// 验证 URL 安全性
///
/// 检查项目：
/// 1. URL 不为空
/// 2. 不是危险协议（javascript:, data:, file: 等）
/// 3. 相对路径 / 锚点 / mailto / tel 按用途放行
/// 4. 绝对地址必须是 http(s) 且格式有效
pub fn validate_url(url: &str, kind: UrlKind) -> Result<(), UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    // 浏览器会忽略协议中的空白和控制字符，先剔除再比较
    let url_lower: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_lowercase();

    for proto in DANGEROUS_PROTOCOLS {
        if url_lower.starts_with(proto) {
            return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
        }
    }

    // 站内路径（排除 protocol-relative 的 //host）
    if url.starts_with('/') && !url.starts_with("//") {
        return Ok(());
    }

    if kind == UrlKind::Link {
        if url.starts_with('#') {
            return Ok(());
        }
        if let Some(rest) = url_lower.strip_prefix("mailto:") {
            return if rest.contains('@') {
                Ok(())
            } else {
                Err(UrlValidationError::InvalidFormat(
                    "mailto link without address".to_string(),
                ))
            };
        }
        if let Some(rest) = url_lower.strip_prefix("tel:") {
            return if !rest.is_empty()
                && rest
                    .chars()
                    .all(|c| c.is_ascii_digit() || "+-(). ".contains(c))
            {
                Ok(())
            } else {
                Err(UrlValidationError::InvalidFormat(
                    "tel link must contain a phone number".to_string(),
                ))
            };
        }
    }

    if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
        let proto = url_lower
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(UrlValidationError::InvalidProtocol(proto));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    if parsed.host_str().is_none_or(|h| h.is_empty()) {
        return Err(UrlValidationError::InvalidFormat("missing host".to_string()));
    }

    Ok(())
}

/// 简单的 e-mail 形状检查（local@domain.tld）
pub fn is_plausible_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_links() {
        assert!(validate_url("http://example.com", UrlKind::Link).is_ok());
        assert!(validate_url("https://example.com/path?query=1", UrlKind::Link).is_ok());
        assert!(validate_url("/about-us", UrlKind::Link).is_ok());
        assert!(validate_url("#contact", UrlKind::Link).is_ok());
        assert!(validate_url("mailto:hello@example.com", UrlKind::Link).is_ok());
        assert!(validate_url("tel:+1 (555) 010-0100", UrlKind::Link).is_ok());
    }

    #[test]
    fn test_media_is_stricter() {
        assert!(validate_url("https://cdn.example.com/a.png", UrlKind::Media).is_ok());
        assert!(validate_url("/uploads/a.png", UrlKind::Media).is_ok());
        assert!(matches!(
            validate_url("#top", UrlKind::Media),
            Err(UrlValidationError::InvalidProtocol(_))
        ));
        assert!(matches!(
            validate_url("mailto:a@b.c", UrlKind::Media),
            Err(UrlValidationError::InvalidProtocol(_))
        ));
    }

    #[test]
    fn test_dangerous_protocols() {
        for url in [
            "javascript:alert(1)",
            "JAVASCRIPT:alert(1)",
            " java\tscript:alert(1)",
            "data:text/html,<script>alert(1)</script>",
            "file:///etc/passwd",
            "vbscript:msgbox(1)",
        ] {
            assert!(
                matches!(
                    validate_url(url, UrlKind::Link),
                    Err(UrlValidationError::DangerousProtocol(_))
                ),
                "expected {url} to be blocked"
            );
        }
    }

    #[test]
    fn test_protocol_relative_and_unknown_schemes() {
        assert!(validate_url("//evil.example.com/x", UrlKind::Link).is_err());
        assert!(matches!(
            validate_url("ftp://example.com", UrlKind::Link),
            Err(UrlValidationError::InvalidProtocol(_))
        ));
    }

    #[test]
    fn test_empty_and_malformed() {
        assert_eq!(validate_url("   ", UrlKind::Link), Err(UrlValidationError::EmptyUrl));
        assert!(validate_url("mailto:nobody", UrlKind::Link).is_err());
        assert!(validate_url("tel:call-me", UrlKind::Link).is_err());
        assert!(validate_url("https://", UrlKind::Link).is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(is_plausible_email("editor@example.com"));
        assert!(!is_plausible_email("editor@localhost"));
        assert!(!is_plausible_email("editor example@x.com"));
        assert!(!is_plausible_email("@example.com"));
    }
}
