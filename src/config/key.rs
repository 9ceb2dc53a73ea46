//! Composite key formatting.
//!
//! A logical key `(base, name)` is stored as `base.name`, or as plain `name`
//! when `base` is empty.

use std::borrow::Cow;

use super::error::KeyTruncated;

/// Composes the storage key for `(base, name)`.
pub fn compose_key<'a>(base: &str, name: &'a str) -> Cow<'a, str> {
    if base.is_empty() {
        Cow::Borrowed(name)
    } else {
        let mut key = String::with_capacity(base.len() + 1 + name.len());
        key.push_str(base);
        key.push('.');
        key.push_str(name);
        Cow::Owned(key)
    }
}

/// Writes `name.extension` into `buf`.
///
/// The separator is always written, even for an empty `name`; the flat-key
/// rule belongs to [`compose_key`]. If the key does not fit, the
/// longest prefix ending on a character boundary is written and
/// [`KeyTruncated`] reports how many bytes were needed. Nothing is ever
/// written past the end of `buf`.
pub fn write_key<'b>(
    buf: &'b mut [u8],
    name: &str,
    extension: &str,
) -> Result<&'b str, KeyTruncated> {
    let pieces = [name, ".", extension];
    let needed: usize = pieces.iter().map(|p| p.len()).sum();
    let capacity = buf.len();

    let mut written = 0;
    for piece in pieces {
        let room = capacity - written;
        if piece.len() > room {
            let mut cut = room;
            while !piece.is_char_boundary(cut) {
                cut -= 1;
            }
            buf[written..written + cut].copy_from_slice(&piece.as_bytes()[..cut]);
            written += cut;
            return Err(KeyTruncated {
                needed,
                capacity,
                written,
            });
        }
        buf[written..written + piece.len()].copy_from_slice(piece.as_bytes());
        written += piece.len();
    }

    // SAFETY: `buf[..written]` is the concatenation of whole `&str` pieces.
    Ok(unsafe { std::str::from_utf8_unchecked(&buf[..written]) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_with_base() {
        assert_eq!(compose_key("db", "port"), "db.port");
    }

    #[test]
    fn test_compose_flat_key_borrows() {
        let key = compose_key("", "standalone");
        assert!(matches!(key, Cow::Borrowed("standalone")));
    }

    #[test]
    fn test_write_key_fits() {
        let mut buf = [0u8; 16];
        assert_eq!(write_key(&mut buf, "cache", "size").unwrap(), "cache.size");
    }

    #[test]
    fn test_write_key_exact_fit() {
        let mut buf = [0u8; 6];
        assert_eq!(write_key(&mut buf, "ab", "cde").unwrap(), "ab.cde");
    }

    #[test]
    fn test_write_key_truncates_without_overflow() {
        let mut buf = [0xffu8; 8];
        let err = write_key(&mut buf[..5], "cache", "size").unwrap_err();
        assert_eq!(
            err,
            KeyTruncated {
                needed: 10,
                capacity: 5,
                written: 5
            }
        );
        assert_eq!(&buf[..5], b"cache");
        assert_eq!(&buf[5..], &[0xff; 3]);
    }

    #[test]
    fn test_write_key_truncates_on_char_boundary() {
        let mut buf = [0u8; 4];
        let err = write_key(&mut buf, "a", "éé").unwrap_err();
        // "a." plus one two-byte 'é' fits; the second would split.
        assert_eq!(err.written, 4);
        assert_eq!(std::str::from_utf8(&buf[..err.written]).unwrap(), "a.é");

        let mut buf = [0u8; 3];
        let err = write_key(&mut buf, "a", "éé").unwrap_err();
        assert_eq!(err.written, 2);
    }

    #[test]
    fn test_write_key_keeps_separator_for_empty_name() {
        let mut buf = [0u8; 16];
        assert_eq!(write_key(&mut buf, "", "raw").unwrap(), ".raw");
    }

    #[test]
    fn test_write_key_empty_buffer() {
        let mut buf = [0u8; 0];
        let err = write_key(&mut buf, "a", "b").unwrap_err();
        assert_eq!(err.written, 0);
        assert_eq!(err.needed, 3);
    }
}
