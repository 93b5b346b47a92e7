//! Netlink attribute (nlattr) handling.

use super::error::{Error, Result};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Netlink attribute alignment.
pub const NLA_ALIGNTO: usize = 4;

/// Align a length to NLA_ALIGNTO boundary.
#[inline]
pub const fn nla_align(len: usize) -> usize {
    (len + NLA_ALIGNTO - 1) & !(NLA_ALIGNTO - 1)
}

/// Size of the attribute header.
pub const NLA_HDRLEN: usize = 4;

/// Netlink attribute header (mirrors struct nlattr).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlAttr {
    /// Length including header.
    pub nla_len: u16,
    /// Attribute type.
    pub nla_type: u16,
}

/// Attribute type flags.
pub const NLA_F_NESTED: u16 = 1 << 15;
pub const NLA_F_NET_BYTEORDER: u16 = 1 << 14;
pub const NLA_TYPE_MASK: u16 = !(NLA_F_NESTED | NLA_F_NET_BYTEORDER);

impl NlAttr {
    /// Create a new attribute header.
    pub fn new(attr_type: u16, data_len: usize) -> Self {
        Self {
            nla_len: (NLA_HDRLEN + data_len) as u16,
            nla_type: attr_type,
        }
    }

    /// Get the attribute type without flags.
    pub fn kind(&self) -> u16 {
        self.nla_type & NLA_TYPE_MASK
    }

    /// Check if this is a nested attribute.
    pub fn is_nested(&self) -> bool {
        self.nla_type & NLA_F_NESTED != 0
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }
}

/// Iterator over netlink attributes in a buffer.
///
/// Yields `(type, payload)` pairs in wire order; the type has the nested
/// and byte-order flags masked off.
pub struct AttrIter<'a> {
    data: &'a [u8],
}

impl<'a> AttrIter<'a> {
    /// Create a new attribute iterator.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for AttrIter<'a> {
    /// Returns (attribute type, payload data).
    type Item = (u16, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.len() < NLA_HDRLEN {
            return None;
        }

        let attr = match NlAttr::from_bytes(self.data) {
            Ok(a) => a,
            Err(_) => return None,
        };

        let len = attr.nla_len as usize;
        if len < NLA_HDRLEN || len > self.data.len() {
            return None;
        }

        let payload = &self.data[NLA_HDRLEN..len];
        let aligned_len = nla_align(len);

        // Move to next attribute
        if aligned_len >= self.data.len() {
            self.data = &[];
        } else {
            self.data = &self.data[aligned_len..];
        }

        Some((attr.kind(), payload))
    }
}

/// Helper functions for extracting typed values from attribute payloads.
pub mod get {
    use super::*;

    /// Extract a u16 value (native endian).
    pub fn u16_ne(data: &[u8]) -> Result<u16> {
        if data.len() < 2 {
            return Err(Error::InvalidAttribute("truncated u16 attribute".into()));
        }
        Ok(u16::from_ne_bytes([data[0], data[1]]))
    }

    /// Extract a u32 value (native endian).
    pub fn u32_ne(data: &[u8]) -> Result<u32> {
        if data.len() < 4 {
            return Err(Error::InvalidAttribute("truncated u32 attribute".into()));
        }
        Ok(u32::from_ne_bytes([data[0], data[1], data[2], data[3]]))
    }

    /// Extract a u64 value (native endian).
    pub fn u64_ne(data: &[u8]) -> Result<u64> {
        if data.len() < 8 {
            return Err(Error::InvalidAttribute("truncated u64 attribute".into()));
        }
        Ok(u64::from_ne_bytes([
            data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
        ]))
    }

    /// Extract an i32 value (native endian).
    pub fn i32_ne(data: &[u8]) -> Result<i32> {
        if data.len() < 4 {
            return Err(Error::InvalidAttribute("truncated i32 attribute".into()));
        }
        Ok(i32::from_ne_bytes([data[0], data[1], data[2], data[3]]))
    }

    /// Extract an i64 value (native endian).
    pub fn i64_ne(data: &[u8]) -> Result<i64> {
        if data.len() < 8 {
            return Err(Error::InvalidAttribute("truncated i64 attribute".into()));
        }
        Ok(i64::from_ne_bytes([
            data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
        ]))
    }

    /// Extract a signed value whose wire width varies.
    ///
    /// A 4-byte payload is sign-extended from s32, an 8-byte payload is
    /// taken as s64. Any other width is a decode error; callers treat the
    /// field as absent.
    pub fn signed_ne(data: &[u8]) -> Result<i64> {
        match data.len() {
            4 => Ok(i64::from(i32_ne(data)?)),
            8 => i64_ne(data),
            n => Err(Error::InvalidAttribute(format!(
                "signed attribute with unexpected width {}",
                n
            ))),
        }
    }

    /// Extract a null-terminated string.
    pub fn string(data: &[u8]) -> Result<&str> {
        // Find null terminator or use whole buffer
        let len = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        std::str::from_utf8(&data[..len])
            .map_err(|e| Error::InvalidAttribute(format!("invalid UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment() {
        assert_eq!(nla_align(0), 0);
        assert_eq!(nla_align(1), 4);
        assert_eq!(nla_align(4), 4);
        assert_eq!(nla_align(5), 8);
    }

    #[test]
    fn test_attr_kind_masks_flags() {
        let attr = NlAttr::new(18 | NLA_F_NESTED, 0);
        assert_eq!(attr.kind(), 18);
        assert!(attr.is_nested());
    }

    #[test]
    fn test_iter_walks_in_wire_order() {
        // Two attributes: type 1 u32, type 2 two bytes (padded).
        let mut buf = Vec::new();
        buf.extend_from_slice(NlAttr::new(1, 4).as_bytes());
        buf.extend_from_slice(&0xdead_beef_u32.to_ne_bytes());
        buf.extend_from_slice(NlAttr::new(2, 2).as_bytes());
        buf.extend_from_slice(&[0xaa, 0xbb, 0, 0]);

        let attrs: Vec<_> = AttrIter::new(&buf).collect();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].0, 1);
        assert_eq!(get::u32_ne(attrs[0].1).unwrap(), 0xdead_beef);
        assert_eq!(attrs[1].0, 2);
        assert_eq!(attrs[1].1, &[0xaa, 0xbb]);
    }

    #[test]
    fn test_iter_stops_on_truncated_attr() {
        let mut buf = Vec::new();
        buf.extend_from_slice(NlAttr::new(1, 4).as_bytes());
        buf.extend_from_slice(&[1, 2]); // shorter than declared

        assert_eq!(AttrIter::new(&buf).count(), 0);
    }

    #[test]
    fn test_get_string() {
        assert_eq!(get::string(b"ice\0").unwrap(), "ice");
        assert_eq!(get::string(b"ice").unwrap(), "ice");
    }

    #[test]
    fn test_get_signed_widths() {
        let narrow = (-42i32).to_ne_bytes();
        assert_eq!(get::signed_ne(&narrow).unwrap(), -42);

        let wide = (-5_000_000_000i64).to_ne_bytes();
        assert_eq!(get::signed_ne(&wide).unwrap(), -5_000_000_000);

        assert!(get::signed_ne(&[0, 1]).is_err());
        assert!(get::signed_ne(&[]).is_err());
    }
}
