use crate::{error::AppError, models::Post};

pub const BODY_PREVIEW_CHARS: usize = 200;

/// Listing previews: bodies of 200 characters or more are cut to 200 and
/// marked with `...`.
pub fn shorten_body(body: &str) -> String {
    if body.chars().count() < BODY_PREVIEW_CHARS {
        return body.to_string();
    }

    let cut: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
    format!("{cut}...")
}

pub fn preview(mut post: Post) -> Post {
    post.body = shorten_body(&post.body);
    post
}

/// `?page=` is optional and defaults to 1; anything else must be a positive
/// integer.
pub fn parse_page(raw: Option<&str>) -> Result<usize, AppError> {
    let Some(raw) = raw else {
        return Ok(1);
    };

    match raw.trim().parse::<usize>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(AppError::InvalidPage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_body_untouched() {
        assert_eq!(shorten_body("hello"), "hello");
        let just_under = "a".repeat(199);
        assert_eq!(shorten_body(&just_under), just_under);
    }

    #[test]
    fn test_long_body_cut() {
        let long = "a".repeat(500);
        let short = shorten_body(&long);
        assert_eq!(short.len(), 203);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn test_exactly_limit_is_marked() {
        let exact = "a".repeat(200);
        assert_eq!(shorten_body(&exact), format!("{exact}..."));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let korean = "가".repeat(250);
        let short = shorten_body(&korean);
        assert_eq!(short.chars().count(), 203);
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None).unwrap(), 1);
        assert_eq!(parse_page(Some("3")).unwrap(), 3);
        assert!(parse_page(Some("0")).is_err());
        assert!(parse_page(Some("-1")).is_err());
        assert!(parse_page(Some("abc")).is_err());
    }
}
