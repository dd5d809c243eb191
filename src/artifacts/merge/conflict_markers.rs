//! Conflict marker files
//!
//! ```text
//! <<<<<<< HEAD
//! <current content>=======
//! <given content>>>>>>>>
//! ```
//!
//! Both sides are written verbatim. A side that deleted the file contributes
//! nothing, and a side without a trailing newline runs into the next marker.

use bytes::Bytes;

pub const CURRENT_MARKER: &str = "<<<<<<< HEAD\n";
pub const SEPARATOR_MARKER: &str = "=======\n";
pub const GIVEN_MARKER: &str = ">>>>>>>\n";

pub fn write_conflict(current: Option<&[u8]>, given: Option<&[u8]>) -> Bytes {
    let mut content = Vec::new();

    content.extend_from_slice(CURRENT_MARKER.as_bytes());
    content.extend_from_slice(current.unwrap_or_default());
    content.extend_from_slice(SEPARATOR_MARKER.as_bytes());
    content.extend_from_slice(given.unwrap_or_default());
    content.extend_from_slice(GIVEN_MARKER.as_bytes());

    content.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    /// Both sides of a conflict file; the current side is taken up to the first separator
    fn split_conflict(content: &[u8]) -> Option<(Bytes, Bytes)> {
        let body = content
            .strip_prefix(CURRENT_MARKER.as_bytes())?
            .strip_suffix(GIVEN_MARKER.as_bytes())?;

        let separator = SEPARATOR_MARKER.as_bytes();
        let position = body
            .windows(separator.len())
            .position(|window| window == separator)?;

        Some((
            Bytes::copy_from_slice(&body[..position]),
            Bytes::copy_from_slice(&body[position + separator.len()..]),
        ))
    }

    fn contains_separator(side: &[u8]) -> bool {
        side.windows(SEPARATOR_MARKER.len())
            .any(|window| window == SEPARATOR_MARKER.as_bytes())
    }

    #[test]
    fn both_sides_are_bracketed_by_markers() {
        let conflict = write_conflict(Some(b"world\n"), Some(b"moon\n"));

        assert_eq!(
            conflict,
            Bytes::from_static(b"<<<<<<< HEAD\nworld\n=======\nmoon\n>>>>>>>\n")
        );
    }

    #[test]
    fn deleted_side_is_empty_and_contents_are_kept_verbatim() {
        let conflict = write_conflict(None, Some(b"no newline"));

        assert_eq!(
            conflict,
            Bytes::from_static(b"<<<<<<< HEAD\n=======\nno newline>>>>>>>\n")
        );
    }

    #[test]
    fn sides_without_trailing_newlines_split_back_unchanged() {
        let conflict = write_conflict(Some(b"world"), Some(b"moon"));

        assert_eq!(
            split_conflict(&conflict),
            Some((Bytes::from_static(b"world"), Bytes::from_static(b"moon")))
        );
    }

    #[test]
    fn plain_files_are_not_conflicts() {
        assert_eq!(split_conflict(b"just text\n"), None);
    }

    proptest! {
        #[test]
        fn splitting_recovers_both_sides(
            current in prop::collection::vec(any::<u8>(), 0..64),
            given in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            prop_assume!(!contains_separator(&current));

            let conflict = write_conflict(Some(current.as_slice()), Some(given.as_slice()));
            let (split_current, split_given) = split_conflict(&conflict).unwrap();

            prop_assert_eq!(split_current, Bytes::from(current));
            prop_assert_eq!(split_given, Bytes::from(given));
        }
    }
}
