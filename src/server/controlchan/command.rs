use super::parse_error::{ParseError, Result};

use bytes::Bytes;
use std::{fmt, str};

/// A parsed FTP command. Path arguments stay as raw bytes because their
/// interpretation depends on the session's wire charset; handlers decode
/// them at execution time.
#[derive(Debug, PartialEq, Clone)]
pub(crate) enum Command {
    User {
        /// The bytes making up the actual username.
        username: Bytes,
    },
    Pass {
        /// The bytes making up the actual password.
        password: Bytes,
    },
    Quit,
    Pwd,
    Cwd {
        /// The path the client would like to change directory to.
        path: Bytes,
    },
    Cdup,
    Type {
        /// The representation type argument, uppercased (`A`, `I`, `L`,
        /// `L 8`, ...). Unsupported values get a 504 from the handler.
        param: String,
    },
    Port {
        /// The raw `h1,h2,h3,h4,p1,p2` argument.
        addr: Bytes,
    },
    Eprt {
        /// The raw `|proto|host|port|` argument.
        addr: Bytes,
    },
    Pasv,
    Epsv,
    List {
        /// The path to list; flag tokens such as `-la` are discarded.
        path: Option<Bytes>,
    },
    Nlst {
        /// The path to list names of.
        path: Option<Bytes>,
    },
    Stor {
        /// The path to the file the client would like to store.
        path: Bytes,
    },
    Appe {
        /// The path to the file the client would like to append to.
        path: Bytes,
    },
    Retr {
        /// The path to the file the client would like to retrieve.
        path: Bytes,
    },
    Dele {
        /// The file to delete.
        path: Bytes,
    },
    Mkd {
        /// The directory to create.
        path: Bytes,
    },
    Rmd {
        /// The directory to remove.
        path: Bytes,
    },
    Rnfr {
        /// The file to be renamed.
        path: Bytes,
    },
    Rnto {
        /// The filename to rename to.
        path: Bytes,
    },
    Size {
        /// The file whose size is requested.
        path: Bytes,
    },
    Mdtm {
        /// The file whose modification time is requested.
        path: Bytes,
    },
    Rest {
        /// The restart offset for the next transfer.
        offset: u64,
    },
    Syst,
    Noop,
    Feat,
    Opts {
        /// The raw option argument, e.g. `UTF8 ON`.
        option: Bytes,
    },
    Stat {
        /// The path about which information is requested, if given.
        path: Option<Bytes>,
    },
    /// A verb we don't implement; replied to with 500 after the auth gate.
    Other {
        /// The uppercased verb.
        command: String,
    },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Command {
    /// Parse one CRLF- (or LF-) terminated line into a [`Command`].
    pub fn parse<T: AsRef<[u8]> + Into<Bytes>>(buf: T) -> Result<Command> {
        let vec = buf.into().to_vec();
        let mut iter = vec.splitn(2, |&b| b == b' ' || b == b'\r' || b == b'\n');
        let cmd_token = normalize(iter.next().unwrap_or(&[]))?;
        let cmd_params = Bytes::copy_from_slice(iter.next().unwrap_or(&[]));

        let cmd = match &*cmd_token {
            "USER" => {
                let username = parse_to_eol(cmd_params)?;
                if username.is_empty() {
                    return Err(ParseError::InvalidCommand);
                }
                Command::User { username }
            }
            "PASS" => {
                let password = parse_to_eol(cmd_params)?;
                Command::Pass { password }
            }
            "QUIT" => Command::Quit,
            "PWD" | "XPWD" => Command::Pwd,
            "CWD" | "XCWD" => {
                let path = parse_to_eol(cmd_params)?;
                if path.is_empty() {
                    return Err(ParseError::InvalidCommand);
                }
                Command::Cwd { path }
            }
            "CDUP" => Command::Cdup,
            "TYPE" => {
                let params = parse_to_eol(cmd_params)?;
                if params.is_empty() {
                    return Err(ParseError::InvalidCommand);
                }
                let param = String::from_utf8_lossy(&params).trim().to_uppercase();
                Command::Type { param }
            }
            "PORT" => {
                let addr = parse_to_eol(cmd_params)?;
                if addr.is_empty() {
                    return Err(ParseError::InvalidCommand);
                }
                Command::Port { addr }
            }
            "EPRT" => {
                let addr = parse_to_eol(cmd_params)?;
                if addr.is_empty() {
                    return Err(ParseError::InvalidCommand);
                }
                Command::Eprt { addr }
            }
            "PASV" => Command::Pasv,
            "EPSV" => Command::Epsv,
            "LIST" => {
                let line = parse_to_eol(cmd_params)?;
                // Clients like to pass ls flags; drop them and keep the
                // first path-looking token.
                let path = line
                    .split(|&b| b == b' ')
                    .filter(|t| !t.is_empty() && !t.starts_with(b"-"))
                    .map(Bytes::copy_from_slice)
                    .next();
                Command::List { path }
            }
            "NLST" => {
                let path = parse_to_eol(cmd_params)?;
                let path = if path.is_empty() { None } else { Some(path) };
                Command::Nlst { path }
            }
            "STOR" => {
                let path = parse_to_eol(cmd_params)?;
                if path.is_empty() {
                    return Err(ParseError::InvalidCommand);
                }
                Command::Stor { path }
            }
            "APPE" => {
                let path = parse_to_eol(cmd_params)?;
                if path.is_empty() {
                    return Err(ParseError::InvalidCommand);
                }
                Command::Appe { path }
            }
            "RETR" => {
                let path = parse_to_eol(cmd_params)?;
                if path.is_empty() {
                    return Err(ParseError::InvalidCommand);
                }
                Command::Retr { path }
            }
            "DELE" => {
                let path = parse_to_eol(cmd_params)?;
                if path.is_empty() {
                    return Err(ParseError::InvalidCommand);
                }
                Command::Dele { path }
            }
            "MKD" | "XMKD" => {
                let path = parse_to_eol(cmd_params)?;
                if path.is_empty() {
                    return Err(ParseError::InvalidCommand);
                }
                Command::Mkd { path }
            }
            "RMD" | "XRMD" => {
                let path = parse_to_eol(cmd_params)?;
                if path.is_empty() {
                    return Err(ParseError::InvalidCommand);
                }
                Command::Rmd { path }
            }
            "RNFR" => {
                let path = parse_to_eol(cmd_params)?;
                if path.is_empty() {
                    return Err(ParseError::InvalidCommand);
                }
                Command::Rnfr { path }
            }
            "RNTO" => {
                let path = parse_to_eol(cmd_params)?;
                if path.is_empty() {
                    return Err(ParseError::InvalidCommand);
                }
                Command::Rnto { path }
            }
            "SIZE" => {
                let path = parse_to_eol(cmd_params)?;
                if path.is_empty() {
                    return Err(ParseError::InvalidCommand);
                }
                Command::Size { path }
            }
            "MDTM" => {
                let path = parse_to_eol(cmd_params)?;
                if path.is_empty() {
                    return Err(ParseError::InvalidCommand);
                }
                Command::Mdtm { path }
            }
            "REST" => {
                let params = parse_to_eol(cmd_params)?;
                let offset = str::from_utf8(&params)
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .ok_or(ParseError::InvalidCommand)?;
                Command::Rest { offset }
            }
            "SYST" => Command::Syst,
            "NOOP" => Command::Noop,
            "FEAT" => Command::Feat,
            "OPTS" => {
                let option = parse_to_eol(cmd_params)?;
                if option.is_empty() {
                    return Err(ParseError::InvalidCommand);
                }
                Command::Opts { option }
            }
            "STAT" => {
                let path = parse_to_eol(cmd_params)?;
                let path = if path.is_empty() { None } else { Some(path) };
                Command::Stat { path }
            }
            _ => Command::Other { command: cmd_token },
        };

        Ok(cmd)
    }
}

/// Validates a buffer of bytes up to the end of line and returns the part
/// before it.
fn parse_to_eol<T: AsRef<[u8]> + Into<Bytes>>(bytes: T) -> Result<Bytes> {
    let mut pos: usize = 0;
    let mut bytes: Bytes = bytes.into();
    if bytes.is_empty() {
        // A verb-only command terminated by a bare LF leaves nothing
        // behind, not even the line ending.
        return Ok(bytes);
    }
    let mut iter = bytes.as_ref().iter();

    loop {
        let b = match iter.next() {
            Some(b) => b,
            _ => return Err(ParseError::InvalidEol),
        };

        if *b == b'\r' {
            match iter.next() {
                Some(b'\n') => return Ok(bytes.split_to(pos)),
                _ => return Err(ParseError::InvalidEol),
            }
        }

        if *b == b'\n' {
            return Ok(bytes.split_to(pos));
        }

        if !is_valid_token_char(*b) {
            return Err(ParseError::InvalidToken { token: *b });
        }

        pos += 1;
    }
}

fn normalize(token: &[u8]) -> Result<String> {
    str::from_utf8(token).map(|t| t.to_uppercase()).map_err(|_| ParseError::InvalidUtf8)
}

// Control characters are out; high bytes are in, they may be part of a
// multi-byte filename encoding.
fn is_valid_token_char(b: u8) -> bool {
    b > 0x1f && b != 0x7f
}
