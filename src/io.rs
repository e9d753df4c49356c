//! Various traits to help parsing of DNS messages.

use crate::bail;
use crate::types::Type;
use byteorder::{ReadBytesExt, BE};
use std::io;
use std::io::Cursor;
use std::io::SeekFrom;

/// Maximum length of a encoded domain name, including the terminating zero
/// label. See [rfc1035#section-3.1].
///
/// [rfc1035#section-3.1]: https://datatracker.ietf.org/doc/html/rfc1035#section-3.1
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of a single label.
pub const MAX_LABEL_LEN: usize = 63;

/// How many compression pointers may be followed while reading one name.
const MAX_POINTER_JUMPS: usize = 16;

pub trait SeekExt: io::Seek {
    /// Returns the number of bytes remaining to be consumed.
    /// This is used as a way to check for malformed input.
    fn remaining(&mut self) -> io::Result<u64> {
        let pos = self.stream_position()?;
        let len = self.seek(SeekFrom::End(0))?;

        // reset position
        self.seek(SeekFrom::Start(pos))?;

        Ok(len.saturating_sub(pos))
    }
}

impl<'a> SeekExt for Cursor<&'a [u8]> {
    fn remaining(&mut self) -> io::Result<u64> {
        let len = self.get_ref().len() as u64;
        Ok(len.saturating_sub(self.position()))
    }
}

/// All types that implement `Read` and `Seek` get methods defined
/// in `DNSReadExt` for free.
impl<R: io::Read + ?Sized + io::Seek> DNSReadExt for R {}

/// Extensions to io::Read to add some DNS specific types.
pub trait DNSReadExt: io::Read + io::Seek {
    /// Reads a domain name, following any compression pointers.
    ///
    /// The name is returned as ASCII, without the trailing dot. The root
    /// domain is returned as ".". Afterwards the stream is positioned just
    /// past the name as it appeared in place (i.e. after the first pointer,
    /// if there was one).
    ///
    /// # Errors
    ///
    /// Will return a io::Error(InvalidData) if the name is longer than 255
    /// bytes, contains a non-ASCII or NUL byte, or uses a pointer that does
    /// not point backwards. Returns io::Error(UnexpectedEof) if the name runs
    /// off the end of the stream.
    fn read_qname(&mut self) -> io::Result<String> {
        let mut qname = String::new();

        // Where to continue from once we have jumped through a pointer.
        let mut resume = None;
        let mut jumps = 0;

        // Start of the labels currently being read. Pointers must point
        // strictly before this, which makes loops impossible.
        let mut segment_start = self.stream_position()?;

        // Encoded length of the name, as if it were uncompressed.
        let mut wire_len = 1;

        loop {
            let len = self.read_u8()?;

            match len & 0xC0 {
                // No compression
                0x00 => {
                    if len == 0 {
                        break;
                    }

                    wire_len += 1 + usize::from(len);
                    if wire_len > MAX_NAME_LEN {
                        bail!(InvalidData, "name longer than {} bytes", MAX_NAME_LEN);
                    }

                    let mut label = vec![0; len.into()];
                    self.read_exact(&mut label)?;

                    if label.iter().any(|b| *b == 0 || !b.is_ascii()) {
                        bail!(
                            InvalidData,
                            "invalid label '{}': not valid ascii",
                            String::from_utf8_lossy(&label)
                        );
                    }

                    if !qname.is_empty() {
                        qname.push('.');
                    }
                    // Already checked it's ascii, so this can't fail.
                    qname.push_str(&String::from_utf8_lossy(&label));
                }

                // Compression
                0xC0 => {
                    // Read the 14 bit pointer.
                    let b2 = self.read_u8()?;
                    let ptr = u64::from(u16::from(len & !0xC0) << 8 | u16::from(b2));

                    if ptr >= segment_start {
                        bail!(
                            InvalidData,
                            "invalid compressed pointer to {} from {}",
                            ptr,
                            segment_start
                        );
                    }

                    jumps += 1;
                    if jumps > MAX_POINTER_JUMPS {
                        bail!(InvalidData, "too many compressed pointers");
                    }

                    if resume.is_none() {
                        resume = Some(self.stream_position()?);
                    }

                    segment_start = ptr;
                    self.seek(SeekFrom::Start(ptr))?;
                }

                // Unknown
                _ => bail!(
                    InvalidData,
                    "unsupported compression type {0:b}",
                    len & 0xC0
                ),
            }
        }

        if let Some(pos) = resume {
            self.seek(SeekFrom::Start(pos))?;
        }

        if qname.is_empty() {
            qname.push('.') // Root domain
        }

        Ok(qname)
    }

    /// Reads a DNS Type.
    fn read_type(&mut self) -> io::Result<Type> {
        Ok(Type::from(self.read_u16::<BE>()?))
    }

    /// Reads a DNS Class. Unknown classes are kept, not rejected.
    fn read_class(&mut self) -> io::Result<u16> {
        self.read_u16::<BE>()
    }
}
