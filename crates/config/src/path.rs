use itertools::Itertools;

/// Runs of anything but letters, combining marks and decimal digits.
static NON_WORD: once_cell::sync::Lazy<regex::Regex> =
    once_cell::sync::Lazy::new(|| regex::Regex::new(r"[^\p{M}\p{L}\p{Nd}]+").unwrap());

/// The `:slug` of a document, following Jekyll's `default` slugify mode.
///
/// Letters outside ASCII are kept; everything else becomes a single `-`.
pub fn slugify(name: &str) -> String {
    NON_WORD
        .replace_all(name, "-")
        .trim_matches('-')
        .to_lowercase()
}

/// The title Jekyll gives a post whose front matter has none.
///
/// Each slug word is capitalized and the rest of it lowercased.
pub fn titleize_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars
                .next()
                .map(|first| {
                    first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect::<String>()
                })
                .unwrap_or_default()
        })
        .join(" ")
}


pub fn split_ext(name: &str) -> (&str, Option<&str>) {
    name.rsplit_once('.')
        .map(|(n, e)| (n, Some(e)))
        .unwrap_or((name, None))
}

static DATE_PREFIX_REF: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
    regex::Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})[- ](.*)$").unwrap()
});

/// Split a post's file stem into its publish date and the rest of the name.
pub fn parse_file_stem(stem: &str) -> (Option<crate::DateTime>, String) {
    let parts = DATE_PREFIX_REF.captures(stem).and_then(|caps| {
        let year: i32 = caps.get(1)?.as_str().parse().ok()?;
        let month: u8 = caps.get(2)?.as_str().parse().ok()?;
        let day: u8 = caps.get(3)?.as_str().parse().ok()?;
        let published = crate::DateTime::from_ymd(year, month, day)?;
        Some((Some(published), caps.get(4)?.as_str().to_owned()))
    });

    parts.unwrap_or_else(|| (None, stem.to_owned()))
}

#[cfg(test)]
mod test_stem {
    use super::*;

    #[test]
    fn split_ext_none() {
        assert_eq!(split_ext("README"), ("README", None));
    }

    #[test]
    fn split_ext_last() {
        assert_eq!(split_ext("feed.xml.liquid"), ("feed.xml", Some("liquid")));
    }

    #[test]
    fn parse_file_stem_empty() {
        assert_eq!(parse_file_stem(""), (None, "".to_owned()));
    }

    #[test]
    fn parse_file_stem_none() {
        assert_eq!(
            parse_file_stem("First Blog Post"),
            (None, "First Blog Post".to_owned())
        );
    }

    #[test]
    fn parse_file_stem_out_of_range_month() {
        assert_eq!(
            parse_file_stem("2017-30-5 First Blog Post"),
            (None, "2017-30-5 First Blog Post".to_owned())
        );
    }

    #[test]
    fn parse_file_stem_out_of_range_day() {
        assert_eq!(
            parse_file_stem("2017-3-50 First Blog Post"),
            (None, "2017-3-50 First Blog Post".to_owned())
        );
    }

    #[test]
    fn parse_file_stem_single_digit() {
        assert_eq!(
            parse_file_stem("2017-3-5 First Blog Post"),
            (
                crate::DateTime::from_ymd(2017, 3, 5),
                "First Blog Post".to_owned()
            )
        );
    }

    #[test]
    fn parse_file_stem_double_digit_leading_zero() {
        assert_eq!(
            parse_file_stem("2017-03-05 First Blog Post"),
            (
                crate::DateTime::from_ymd(2017, 3, 5),
                "First Blog Post".to_owned()
            )
        );
    }

    #[test]
    fn parse_file_stem_dashed() {
        assert_eq!(
            parse_file_stem("2020-06-14-replace-loop-with-pipeline"),
            (
                crate::DateTime::from_ymd(2020, 6, 14),
                "replace-loop-with-pipeline".to_owned()
            )
        );
    }
}
