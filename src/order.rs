//! Ordering of scanned entries.
//!
//! Applied once to the flat list after the walk:
//!
//! 1. `depth` ascending (root-level entries first)
//! 2. directories before files at the same depth
//! 3. the configured [`SortBy`] key
//! 4. name, collated the way a `zh` locale sorts, so the order is total
//!    and repeatable
//!
//! `date` and `size` only apply when both entries carry the value (files);
//! otherwise the comparison falls through to the name.

use crate::config::SortBy;
use crate::scan::Entry;
use icu_collator::{Collator, CollatorOptions};
use icu_locid::locale;
use std::cmp::Ordering;

/// Sort entries in place. The sort is stable.
pub fn sort_entries(entries: &mut [Entry], sort_by: SortBy) {
    entries.sort_by(|a, b| compare_entries(a, b, sort_by));
}

pub fn compare_entries(a: &Entry, b: &Entry, sort_by: SortBy) -> Ordering {
    a.depth
        .cmp(&b.depth)
        .then_with(|| b.is_dir.cmp(&a.is_dir))
        .then_with(|| match sort_by {
            SortBy::Name => Ordering::Equal,
            SortBy::Date => match (a.modified, b.modified) {
                (Some(am), Some(bm)) => bm.cmp(&am),
                _ => Ordering::Equal,
            },
            SortBy::Size => match (a.size, b.size) {
                (Some(asz), Some(bsz)) => bsz.cmp(&asz),
                _ => Ordering::Equal,
            },
        })
        .then_with(|| compare_names(&a.name, &b.name))
}

/// Dictionary-style name comparison under the `zh` collation.
///
/// Punctuation sorts before digits, digits before letters, accented Latin
/// letters next to their base letter, and Han characters by pinyin. Names
/// that differ only in case put the lowercase form first. Names the
/// collator ranks equal fall back to code point order, so the result is
/// total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| match collator {
            Some(collator) => collator.compare(a, b),
            None => fold_compare(a, b),
        })
        .then_with(|| a.cmp(b))
}

thread_local! {
    static COLLATOR: Option<Collator> = build_collator();
}

fn build_collator() -> Option<Collator> {
    match Collator::try_new(&locale!("zh").into(), CollatorOptions::new()) {
        Ok(collator) => Some(collator),
        Err(e) => {
            tracing::warn!(error = %e, "zh collator unavailable, using case-folded order");
            None
        }
    }
}

/// Case-folded comparison, used only when collation data cannot be loaded.
fn fold_compare(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{dir_entry, file_entry};
    use std::time::{Duration, SystemTime};

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.relative_path.as_str()).collect()
    }

    #[test]
    fn depth_is_primary_key() {
        let mut entries = vec![
            file_entry("a/b/aaa.md"),
            file_entry("zzz.md"),
        ];
        sort_entries(&mut entries, SortBy::Name);
        assert_eq!(names(&entries), vec!["zzz.md", "a/b/aaa.md"]);
    }

    #[test]
    fn directories_before_files_at_same_depth() {
        let mut entries = vec![file_entry("a.md"), dir_entry("zeta")];
        sort_entries(&mut entries, SortBy::Name);
        assert_eq!(names(&entries), vec!["zeta", "a.md"]);
    }

    #[test]
    fn digits_sort_before_letters() {
        let mut entries = vec![file_entry("guide.md"), file_entry("01-intro.md")];
        sort_entries(&mut entries, SortBy::Name);
        assert_eq!(names(&entries), vec!["01-intro.md", "guide.md"]);
    }

    #[test]
    fn name_sort_ignores_case_first() {
        let mut entries = vec![
            file_entry("beta.md"),
            file_entry("Alpha.md"),
            file_entry("alpha.md"),
            file_entry("Gamma.md"),
        ];
        sort_entries(&mut entries, SortBy::Name);
        assert_eq!(
            names(&entries),
            vec!["alpha.md", "Alpha.md", "beta.md", "Gamma.md"]
        );
    }

    #[test]
    fn date_sort_newest_first() {
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        let mut old = file_entry("a.md");
        old.modified = Some(base);
        let mut new = file_entry("b.md");
        new.modified = Some(base + Duration::from_secs(60));

        let mut entries = vec![old, new];
        sort_entries(&mut entries, SortBy::Date);
        assert_eq!(names(&entries), vec!["b.md", "a.md"]);
    }

    #[test]
    fn date_sort_without_times_falls_back_to_name() {
        let mut entries = vec![dir_entry("b"), dir_entry("a")];
        sort_entries(&mut entries, SortBy::Date);
        assert_eq!(names(&entries), vec!["a", "b"]);
    }

    #[test]
    fn size_sort_largest_first_then_name() {
        let mut small = file_entry("a.md");
        small.size = Some(10);
        let mut big = file_entry("z.md");
        big.size = Some(500);
        let mut tie = file_entry("m.md");
        tie.size = Some(10);

        let mut entries = vec![small, tie, big];
        sort_entries(&mut entries, SortBy::Size);
        assert_eq!(names(&entries), vec!["z.md", "a.md", "m.md"]);
    }

    #[test]
    fn size_sort_keeps_depth_and_type_precedence() {
        let mut deep = file_entry("x/huge.md");
        deep.size = Some(1_000_000);
        let mut top = file_entry("tiny.md");
        top.size = Some(1);

        let mut entries = vec![deep, top, dir_entry("x")];
        sort_entries(&mut entries, SortBy::Size);
        assert_eq!(names(&entries), vec!["x", "tiny.md", "x/huge.md"]);
    }

    #[test]
    fn punctuation_sorts_before_digits() {
        assert_eq!(compare_names("_coverpage.md", "01-intro.md"), Ordering::Less);
        let mut entries = vec![
            file_entry("guide.md"),
            file_entry("01-intro.md"),
            file_entry("_navbar.md"),
        ];
        sort_entries(&mut entries, SortBy::Name);
        assert_eq!(names(&entries), vec!["_navbar.md", "01-intro.md", "guide.md"]);
    }

    #[test]
    fn accented_letters_sort_with_base_letter() {
        assert_eq!(compare_names("éclair.md", "fable.md"), Ordering::Less);
        assert_eq!(compare_names("Zeta", "Ärger"), Ordering::Greater);
        assert_eq!(compare_names("eclair", "éclair"), Ordering::Less);
    }

    #[test]
    fn han_names_sort_by_pinyin() {
        // 北 (bei) before 上 (shang), although U+4E0A < U+5317.
        assert_eq!(compare_names("北京", "上海"), Ordering::Less);
        let mut entries = vec![dir_entry("上海"), dir_entry("北京")];
        sort_entries(&mut entries, SortBy::Name);
        assert_eq!(names(&entries), vec!["北京", "上海"]);
    }

    #[test]
    fn fold_compare_ignores_case() {
        assert_eq!(fold_compare("Alpha", "alpha"), Ordering::Equal);
        assert_eq!(fold_compare("beta", "Alpha"), Ordering::Greater);
    }

    #[test]
    fn compare_names_is_total() {
        assert_eq!(compare_names("a", "a"), Ordering::Equal);
        assert_eq!(compare_names("a", "ab"), Ordering::Less);
        assert_eq!(compare_names("B", "a"), Ordering::Greater);
        assert_eq!(compare_names("a", "A"), Ordering::Less);
    }
}
