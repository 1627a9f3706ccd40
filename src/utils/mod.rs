pub mod slug;
pub mod url_validator;

pub use slug::{is_valid_slug, slugify, slugify_with};
pub use url_validator::{UrlKind, UrlValidationError, is_plausible_email, validate_url};
