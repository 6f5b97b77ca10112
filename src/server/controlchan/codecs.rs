use super::{error::ControlChanError, Reply};

use bytes::{Bytes, BytesMut};
use std::io::Write;
use tokio_util::codec::{Decoder, Encoder};

// Commands longer than this are rejected outright; no sane client needs
// more than a few hundred bytes per line.
const MAX_LINE_LENGTH: usize = 4096;

// FtpCodec implements tokio's `Decoder` and `Encoder` traits for the
// control channel. It yields raw command lines (parsing happens in the
// control loop, where a bad line can be answered without tearing down the
// connection) and encodes replies.
pub(crate) struct FtpCodec {
    // Stored index of the next index to examine for a '\n' character. This
    // is used to optimize searching. For example, if `decode` was called
    // with `abc`, it would hold `3`, because that is the next index to
    // examine. The next time `decode` is called with `abcde\n`, we will
    // only look at `de\n` before returning.
    next_index: usize,
}

impl FtpCodec {
    pub fn new() -> Self {
        FtpCodec { next_index: 0 }
    }
}

impl Decoder for FtpCodec {
    type Item = Bytes;
    type Error = ControlChanError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Bytes>, Self::Error> {
        loop {
            if let Some(newline_offset) = buf[self.next_index..].iter().position(|b| *b == b'\n') {
                let newline_index = newline_offset + self.next_index;
                let line = buf.split_to(newline_index + 1);
                self.next_index = 0;
                if line.len() > MAX_LINE_LENGTH {
                    return Err(ControlChanError::CommandLineTooLong);
                }
                // Some clients send blank lines to keep the connection
                // warm; swallow them instead of erroring.
                if line.iter().all(|b| *b == b'\r' || *b == b'\n') {
                    continue;
                }
                return Ok(Some(line.freeze()));
            }
            self.next_index = buf.len();
            if buf.len() > MAX_LINE_LENGTH {
                return Err(ControlChanError::CommandLineTooLong);
            }
            return Ok(None);
        }
    }
}

impl Encoder<Reply> for FtpCodec {
    type Error = ControlChanError;

    // Here we encode the outgoing reply.
    fn encode(&mut self, reply: Reply, buf: &mut BytesMut) -> Result<(), Self::Error> {
        let mut buffer = vec![];
        match reply {
            Reply::None => {
                return Ok(());
            }
            Reply::CodeAndMsg { code, msg } => {
                if msg.is_empty() {
                    writeln!(buffer, "{}\r", code as u32)?;
                } else {
                    writeln!(buffer, "{} {}\r", code as u32, msg)?;
                }
            }
            Reply::MultiLine { code, mut lines } => {
                // The last line is preceded by the reply code and a space.
                let last_line = lines.pop().unwrap_or_default();

                // Lines starting with a digit should be indented
                for it in lines.iter_mut() {
                    if it.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                        it.insert(0, ' ');
                    }
                }
                if lines.is_empty() {
                    writeln!(buffer, "{} {}\r", code as u32, last_line)?;
                } else {
                    write!(buffer, "{}-{}\r\n{} {}\r\n", code as u32, lines.join("\r\n"), code as u32, last_line)?;
                }
            }
        }
        buf.extend(&buffer);
        Ok(())
    }
}
