//! Line-ending translation for ASCII (`TYPE A`) transfers.
//!
//! Both directions are single-pass streaming transforms over read-sized
//! chunks; no line is ever buffered whole. The only state carried between
//! chunks is whether the previous chunk ended in a CR, which is what makes
//! a CRLF split across two reads come out right.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

const COPY_BUF_SIZE: usize = 32 * 1024;

/// Wire form to host form: CR, LF and CRLF all become a single LF.
#[derive(Debug, Default)]
pub(crate) struct AsciiDecoder {
    pending_cr: bool,
}

impl AsciiDecoder {
    pub fn push(&mut self, input: &[u8], out: &mut Vec<u8>) {
        for &b in input {
            if self.pending_cr {
                // The CR we held back turned out to be a line ending,
                // either bare or as the first half of a CRLF.
                self.pending_cr = false;
                out.push(b'\n');
                if b == b'\n' {
                    continue;
                }
            }
            if b == b'\r' {
                self.pending_cr = true;
            } else {
                out.push(b);
            }
        }
    }

    /// Flushes a CR left dangling at end of stream.
    pub fn finish(&mut self, out: &mut Vec<u8>) {
        if self.pending_cr {
            self.pending_cr = false;
            out.push(b'\n');
        }
    }
}

/// Host form to wire form: LF, bare CR and CRLF each become exactly CRLF.
#[derive(Debug, Default)]
pub(crate) struct AsciiEncoder {
    pending_cr: bool,
}

impl AsciiEncoder {
    pub fn push(&mut self, input: &[u8], out: &mut Vec<u8>) {
        for &b in input {
            match b {
                b'\r' => {
                    out.extend_from_slice(b"\r\n");
                    self.pending_cr = true;
                }
                b'\n' => {
                    // An LF right after a CR belongs to the CRLF already
                    // emitted; a lone LF is a line ending of its own.
                    if self.pending_cr {
                        self.pending_cr = false;
                    } else {
                        out.extend_from_slice(b"\r\n");
                    }
                }
                other => {
                    self.pending_cr = false;
                    out.push(other);
                }
            }
        }
    }
}

/// Copies an ASCII upload from the data connection into the file,
/// normalizing line endings to LF. Returns the bytes written to the file.
pub(crate) async fn copy_inbound<R, W>(reader: &mut R, writer: &mut W) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut decoder = AsciiDecoder::default();
    let mut buf = vec![0u8; COPY_BUF_SIZE];
    let mut out = Vec::with_capacity(COPY_BUF_SIZE);
    let mut written: u64 = 0;
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        out.clear();
        decoder.push(&buf[..n], &mut out);
        writer.write_all(&out).await?;
        written += out.len() as u64;
    }
    out.clear();
    decoder.finish(&mut out);
    if !out.is_empty() {
        writer.write_all(&out).await?;
        written += out.len() as u64;
    }
    writer.flush().await?;
    Ok(written)
}

/// Copies an ASCII download from the file onto the data connection,
/// emitting CRLF line endings. Returns the bytes written to the wire.
pub(crate) async fn copy_outbound<R, W>(reader: &mut R, writer: &mut W) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut encoder = AsciiEncoder::default();
    let mut buf = vec![0u8; COPY_BUF_SIZE];
    let mut out = Vec::with_capacity(COPY_BUF_SIZE + 1);
    let mut written: u64 = 0;
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        out.clear();
        encoder.push(&buf[..n], &mut out);
        writer.write_all(&out).await?;
        written += out.len() as u64;
    }
    writer.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode(chunks: &[&[u8]]) -> Vec<u8> {
        let mut decoder = AsciiDecoder::default();
        let mut out = Vec::new();
        for chunk in chunks {
            decoder.push(chunk, &mut out);
        }
        decoder.finish(&mut out);
        out
    }

    fn encode(chunks: &[&[u8]]) -> Vec<u8> {
        let mut encoder = AsciiEncoder::default();
        let mut out = Vec::new();
        for chunk in chunks {
            encoder.push(chunk, &mut out);
        }
        out
    }

    #[test]
    fn decode_normalizes_all_line_endings() {
        assert_eq!(decode(&[b"a\r\nb\nc\rd"]), b"a\nb\nc\nd");
    }

    #[test]
    fn decode_handles_crlf_split_across_reads() {
        assert_eq!(decode(&[b"a\r", b"\nb"]), b"a\nb");
    }

    #[test]
    fn decode_handles_bare_cr_split_across_reads() {
        assert_eq!(decode(&[b"a\r", b"b"]), b"a\nb");
    }

    #[test]
    fn decode_flushes_trailing_cr_at_eof() {
        assert_eq!(decode(&[b"a\r"]), b"a\n");
    }

    #[test]
    fn decode_consecutive_bare_crs_are_two_endings() {
        assert_eq!(decode(&[b"a\r\rb"]), b"a\n\nb");
    }

    #[test]
    fn encode_emits_crlf_for_every_ending() {
        assert_eq!(encode(&[b"a\nb\rc\r\nd"]), b"a\r\nb\r\nc\r\nd");
    }

    #[test]
    fn encode_does_not_double_split_crlf() {
        assert_eq!(encode(&[b"a\r", b"\nb"]), b"a\r\nb");
    }

    #[test]
    fn upload_then_download_round_trip() {
        // The store side turns "a\r\nb\n" into "a\nb\n" on disk; sending
        // that back out produces "a\r\nb\r\n".
        let stored = decode(&[b"a\r\nb\n"]);
        assert_eq!(stored, b"a\nb\n");
        assert_eq!(encode(&[&stored]), b"a\r\nb\r\n");
    }

    #[tokio::test]
    async fn copy_inbound_counts_destination_bytes() {
        let mut input: &[u8] = b"one\r\ntwo\r\n";
        let mut sink = Vec::new();
        let n = copy_inbound(&mut input, &mut sink).await.unwrap();
        assert_eq!(sink, b"one\ntwo\n");
        assert_eq!(n, 8);
    }

    #[tokio::test]
    async fn copy_outbound_counts_wire_bytes() {
        let mut input: &[u8] = b"a\nb\n";
        let mut sink = Vec::new();
        let n = copy_outbound(&mut input, &mut sink).await.unwrap();
        assert_eq!(sink, b"a\r\nb\r\n");
        assert_eq!(n, 6);
    }
}
