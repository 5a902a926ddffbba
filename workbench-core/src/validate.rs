//! Pure input predicates guarding every operation that touches storage or
//! launches a process.
//!
//! The governing rule is reject-before-touch: each predicate is
//! side-effect-free and every relevant predicate runs to completion before
//! any directory is created or any binary spawned.

use crate::error::ValidationError;

/// The one file extension accepted on upload, matched case-insensitively.
pub const ALLOWED_EXTENSION: &str = ".cha";

/// Upload size ceiling in bytes (100 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// Characters refused in arguments: shell metacharacters plus the two
/// control characters that terminate lines.
///
/// Invocation never goes through a shell, so none of these carry meaning
/// at spawn time; they are refused anyway as a second line of defense.
const FORBIDDEN_ARG_CHARS: [char; 7] = [';', '&', '|', '`', '$', '\n', '\r'];

/// Check a file name for use as a single path component.
///
/// Applied identically on the upload and read paths: conservative charset
/// (letters, digits, `.`, `-`, `_`), no path separator, no `..` anywhere.
///
/// # Errors
/// Returns [`ValidationError`] naming the `filename` field.
pub fn file_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new("filename", "must not be empty"));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(ValidationError::new(
            "filename",
            "path separators and parent references are not allowed",
        ));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        return Err(ValidationError::new(
            "filename",
            "only letters, digits, '.', '-' and '_' are allowed",
        ));
    }
    Ok(())
}

/// Check an uploaded file name: [`file_name`] plus the extension rule.
///
/// The extension is not re-checked when reading a file back; executed
/// binaries may produce artifacts under other extensions.
///
/// # Errors
/// Returns [`ValidationError`] naming the `filename` field.
pub fn upload_filename(name: &str) -> Result<(), ValidationError> {
    file_name(name)?;
    if !name.to_ascii_lowercase().ends_with(ALLOWED_EXTENSION) {
        return Err(ValidationError::new(
            "filename",
            format!("must end with {ALLOWED_EXTENSION}"),
        ));
    }
    Ok(())
}

/// Check a binary name: letters, digits, `-`, `_` only.
///
/// No separator or dot passes, so a path cannot be smuggled in through
/// this field; lookup is always by base name inside the tool directory.
///
/// # Errors
/// Returns [`ValidationError`] naming the `binary` field.
pub fn binary_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new("binary", "must not be empty"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
        return Err(ValidationError::new(
            "binary",
            "only letters, digits, '-' and '_' are allowed",
        ));
    }
    Ok(())
}

/// Check an argument list. One bad element rejects the whole list.
///
/// Refused per element: the characters in [`FORBIDDEN_ARG_CHARS`],
/// absolute paths, and `..` anywhere — argument-derived paths stay inside
/// the workspace.
///
/// # Errors
/// Returns [`ValidationError`] naming the `args` field and quoting the
/// offending element.
pub fn arguments(args: &[String]) -> Result<(), ValidationError> {
    for arg in args {
        if arg.chars().any(|c| FORBIDDEN_ARG_CHARS.contains(&c)) {
            return Err(ValidationError::new(
                "args",
                format!("argument contains a forbidden character: {arg:?}"),
            ));
        }
        if arg.starts_with('/') || arg.contains("..") {
            return Err(ValidationError::new(
                "args",
                format!("argument escapes the workspace: {arg:?}"),
            ));
        }
    }
    Ok(())
}

/// Check that uploaded bytes decode as UTF-8 text.
///
/// # Errors
/// Returns [`ValidationError`] naming the `content` field.
pub fn content(bytes: &[u8]) -> Result<(), ValidationError> {
    std::str::from_utf8(bytes)
        .map(|_| ())
        .map_err(|_| ValidationError::new("content", "must be valid UTF-8 text"))
}

/// Check uploaded content length against a ceiling.
///
/// # Errors
/// Returns [`ValidationError`] naming the `content` field.
pub fn content_size(len: usize, ceiling: u64) -> Result<(), ValidationError> {
    if len as u64 > ceiling {
        return Err(ValidationError::new(
            "content",
            format!("exceeds the upload ceiling of {ceiling} bytes"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_accepts_plain_names() {
        for ok in ["chip.cha", "a-b_c.1", "X.Y", "out.txt", ".cha"] {
            assert!(file_name(ok).is_ok(), "{ok:?} should pass");
        }
    }

    #[test]
    fn file_name_rejects_traversal() {
        for bad in ["../x", "a/b", "a\\b", "..", "a..b", "x/..", "../../etc/passwd"] {
            assert!(file_name(bad).is_err(), "{bad:?} must be rejected");
        }
    }

    #[test]
    fn file_name_rejects_charset_violations() {
        for bad in ["", "a b", "a;b", "spät.cha", "a\0b", "a\nb"] {
            assert!(file_name(bad).is_err(), "{bad:?} must be rejected");
        }
    }

    #[test]
    fn upload_filename_requires_the_extension() {
        assert!(upload_filename("chip.cha").is_ok());
        assert!(upload_filename("CHIP.CHA").is_ok(), "extension match is case-insensitive");
        assert!(upload_filename("chip.txt").is_err());
        assert!(upload_filename("chip").is_err());
    }

    #[test]
    fn upload_filename_still_rejects_traversal() {
        assert!(upload_filename("../evil.cha").is_err());
        assert!(upload_filename("a/b.cha").is_err());
    }

    #[test]
    fn binary_name_rejects_separators_and_dots() {
        for bad in ["../../bin/freq", "bin/freq", "freq.sh", "a b", "", "$PATH"] {
            assert!(binary_name(bad).is_err(), "{bad:?} must be rejected");
        }
        for ok in ["freq", "word_count", "tool-2"] {
            assert!(binary_name(ok).is_ok(), "{ok:?} should pass");
        }
    }

    #[test]
    fn arguments_rejects_each_metacharacter() {
        for ch in [';', '&', '|', '`', '$', '\n', '\r'] {
            let args = vec![format!("a{ch}b")];
            assert!(arguments(&args).is_err(), "{ch:?} must reject the list");
        }
    }

    #[test]
    fn arguments_rejects_whole_list_on_one_bad_element() {
        let args = vec!["fine.cha".to_owned(), "also-fine".to_owned(), "bad;rm".to_owned()];
        assert!(arguments(&args).is_err());
    }

    #[test]
    fn arguments_rejects_absolute_and_parent_paths() {
        assert!(arguments(&["/etc/passwd".to_owned()]).is_err());
        assert!(arguments(&["../secret".to_owned()]).is_err());
        assert!(arguments(&["sub/dir/file".to_owned()]).is_ok(), "relative refs within stay legal");
    }

    #[test]
    fn arguments_accepts_empty_list() {
        assert!(arguments(&[]).is_ok());
    }

    #[test]
    fn content_accepts_utf8_rejects_binary() {
        assert!(content(b"a b c").is_ok());
        assert!(content("héllo".as_bytes()).is_ok());
        assert!(content(&[0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn content_size_enforces_the_ceiling() {
        assert!(content_size(100, 100).is_ok());
        assert!(content_size(101, 100).is_err());
        assert!(content_size(0, 0).is_ok());
    }

    proptest::proptest! {
        #[test]
        fn proptest_file_name_never_passes_separators(s in ".*") {
            if s.contains('/') || s.contains('\\') || s.contains("..") {
                proptest::prop_assert!(file_name(&s).is_err());
            }
        }

        #[test]
        fn proptest_accepted_file_names_are_single_components(
            s in "[A-Za-z0-9._-]{1,64}",
        ) {
            if file_name(&s).is_ok() {
                proptest::prop_assert!(!s.contains('/'));
                proptest::prop_assert!(!s.contains(".."));
            }
        }

        #[test]
        fn proptest_arguments_never_pass_metacharacters(s in ".*") {
            let has_forbidden = s.chars().any(|c| FORBIDDEN_ARG_CHARS.contains(&c));
            if has_forbidden {
                proptest::prop_assert!(arguments(&[s]).is_err());
            }
        }

        #[test]
        fn proptest_binary_name_alphanumeric_dash_underscore_only(s in ".*") {
            if binary_name(&s).is_ok() {
                proptest::prop_assert!(!s.is_empty());
                proptest::prop_assert!(
                    s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
                );
            }
        }
    }
}
