//! Slug generation for movies.
//!
//! A slug is the URL-safe alternate key for a movie, derived from its title
//! and release year. It must be deterministic: the uniqueness validation and
//! lookup-by-slug both rely on re-invocation over identical input yielding
//! an identical slug.

/// Derives a URL-safe slug from a movie title and release year.
///
/// Lower-cases the title, collapses every run of non-alphanumeric
/// characters into a single `-`, and appends the year as a disambiguator:
/// `slugify("The Matrix", 1999)` is `"the-matrix-1999"`.
pub fn slugify(title: &str, year_of_release: i32) -> String {
    let mut slug = String::with_capacity(title.len() + 5);
    let mut pending_separator = false;

    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    if !slug.is_empty() {
        slug.push('-');
    }
    slug.push_str(&year_of_release.to_string());
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_joins_with_year() {
        assert_eq!(slugify("The Matrix", 1999), "the-matrix-1999");
    }

    #[test]
    fn test_collapses_non_alphanumeric_runs() {
        assert_eq!(slugify("Spider-Man: No Way Home", 2021), "spider-man-no-way-home-2021");
        assert_eq!(slugify("What's  up,   Doc?", 1972), "what-s-up-doc-1972");
    }

    #[test]
    fn test_trims_leading_and_trailing_separators() {
        assert_eq!(slugify("  Heat  ", 1995), "heat-1995");
        assert_eq!(slugify("...Rec", 2007), "rec-2007");
    }

    #[test]
    fn test_empty_title_is_just_the_year() {
        assert_eq!(slugify("", 2020), "2020");
        assert_eq!(slugify("!!!", 2020), "2020");
    }

    #[test]
    fn test_deterministic() {
        let a = slugify("Zorro", 1940);
        let b = slugify("Zorro", 1940);
        assert_eq!(a, b);
        assert_eq!(a, "zorro-1940");
    }

    #[test]
    fn test_year_disambiguates_remakes() {
        assert_ne!(slugify("Dune", 1984), slugify("Dune", 2021));
    }
}
