//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument.

pub mod favorite_repo;
pub mod hospital_ward_repo;
pub mod insight_repo;
pub mod scrape_run_repo;

pub use favorite_repo::FavoriteRepo;
pub use hospital_ward_repo::HospitalWardRepo;
pub use insight_repo::InsightRepo;
pub use scrape_run_repo::ScrapeRunRepo;

/// Escape `%`, `_` and `\` so user text matches literally inside `ILIKE`.
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Wrap user text into a case-insensitive substring pattern.
pub(crate) fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like(input))
}
