use sea_orm::sea_query::{Expr, IntoColumnRef, LikeExpr, SimpleExpr};

pub mod database_service;
pub mod pagination;
pub mod partnerships;
pub mod players;
pub mod retry;
pub mod withdrawal_requests;

/// Search form of free text. Folded here rather than with SQL `LOWER()`, which
/// SQLite applies to ASCII only.
pub(crate) fn search_key(text: &str) -> String {
    text.to_lowercase()
}

/// Substring match of `needle` against a column holding [`search_key`] text, with
/// `%`, `_` and `\` in the needle taken literally.
pub(crate) fn contains_ci(key_col: impl IntoColumnRef, needle: &str) -> SimpleExpr {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in search_key(needle).chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Expr::col(key_col).like(LikeExpr::new(pattern).escape('\\'))
}

/// Trimmed search text, or `None` when there is nothing to search for.
pub(crate) fn search_term(search: Option<&str>) -> Option<&str> {
    search.map(str::trim).filter(|s| !s.is_empty())
}
