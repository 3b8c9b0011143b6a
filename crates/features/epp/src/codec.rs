use crate::error::EppError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// Size of the length prefix, which the length itself includes.
pub const HEADER_LEN: usize = 4;

/// Frames `u32` big-endian length (prefix included) + payload.
///
/// A declared length of four or less yields an empty payload, which sessions treat as a
/// clean close. A stream that ends mid-frame also ends cleanly.
#[derive(Debug, Clone, Copy)]
pub struct EppCodec {
    max_frame: usize,
}

impl EppCodec {
    #[must_use]
    pub const fn new(max_frame: usize) -> Self {
        Self { max_frame }
    }
}

impl Decoder for EppCodec {
    type Item = Bytes;
    type Error = EppError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>, EppError> {
        if src.len() < HEADER_LEN {
            return Ok(None);
        }

        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&src[..HEADER_LEN]);
        let length = usize::try_from(u32::from_be_bytes(header))
            .map_err(|_| EppError::protocol("frame length does not fit in memory"))?;

        if length > self.max_frame {
            return Err(EppError::FrameTooLarge { length, max: self.max_frame, context: None });
        }

        let length = length.max(HEADER_LEN);
        if src.len() < length {
            src.reserve(length - src.len());
            return Ok(None);
        }

        src.advance(HEADER_LEN);
        Ok(Some(src.split_to(length - HEADER_LEN).freeze()))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Bytes>, EppError> {
        match self.decode(buf)? {
            Some(frame) => Ok(Some(frame)),
            None => {
                buf.clear();
                Ok(None)
            },
        }
    }
}

impl Encoder<String> for EppCodec {
    type Error = EppError;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), EppError> {
        let length = u32::try_from(item.len() + HEADER_LEN)
            .map_err(|_| EppError::protocol("outgoing frame too large"))?;
        dst.reserve(item.len() + HEADER_LEN);
        dst.put_u32(length);
        dst.extend_from_slice(item.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framed(payload: &[u8]) -> BytesMut {
        let mut buf = BytesMut::new();
        buf.put_u32(u32::try_from(payload.len() + HEADER_LEN).unwrap());
        buf.extend_from_slice(payload);
        buf
    }

    #[test]
    fn test_decode_waits_for_full_frame() {
        let mut codec = EppCodec::new(1024);
        let full = framed(b"<epp/>");
        let mut partial = BytesMut::from(&full[..7]);

        assert!(codec.decode(&mut partial).unwrap().is_none());
        partial.extend_from_slice(&full[7..]);
        assert_eq!(codec.decode(&mut partial).unwrap().as_deref(), Some(&b"<epp/>"[..]));
        assert!(partial.is_empty());
    }

    #[test]
    fn test_decode_two_frames_in_one_read() {
        let mut codec = EppCodec::new(1024);
        let mut buf = framed(b"one");
        buf.extend_from_slice(&framed(b"two"));

        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some(&b"one"[..]));
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some(&b"two"[..]));
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_header_only_frame_is_empty() {
        let mut codec = EppCodec::new(1024);
        let mut buf = BytesMut::from(&[0u8, 0, 0, 4][..]);
        assert_eq!(codec.decode(&mut buf).unwrap().map(|b| b.len()), Some(0));

        let mut short = BytesMut::from(&[0u8, 0, 0, 1][..]);
        assert_eq!(codec.decode(&mut short).unwrap().map(|b| b.len()), Some(0));
    }

    #[test]
    fn test_oversized_frame_is_rejected() {
        let mut codec = EppCodec::new(16);
        let mut buf = framed(&[b'x'; 32]);
        assert!(matches!(codec.decode(&mut buf), Err(EppError::FrameTooLarge { length: 36, max: 16, .. })));
    }

    #[test]
    fn test_truncated_stream_ends_cleanly() {
        let mut codec = EppCodec::new(1024);
        let mut buf = BytesMut::from(&[0u8, 0][..]);
        assert!(codec.decode_eof(&mut buf).unwrap().is_none());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_encode_counts_prefix() {
        let mut codec = EppCodec::new(1024);
        let mut dst = BytesMut::new();
        codec.encode("<epp/>".to_owned(), &mut dst).unwrap();
        assert_eq!(&dst[..4], &10u32.to_be_bytes());
        assert_eq!(&dst[4..], b"<epp/>");
    }
}
