//! End-to-end tests driving a listening server over real TCP connections
//! with a small line-oriented FTP test client.

use pretty_assertions::assert_eq;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};

fn start_server(root: &Path, port: u16) -> easyftp::Server {
    let server = easyftp::Server::new(root);
    server.set_port(&port.to_string());
    server.start().unwrap();
    server
}

struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    greeting: String,
}

impl TestClient {
    async fn connect(port: u16) -> TestClient {
        let stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
        let (read_half, write_half) = stream.into_split();
        let mut client = TestClient {
            reader: BufReader::new(read_half),
            writer: write_half,
            greeting: String::new(),
        };
        client.greeting = client.read_reply().await;
        client
    }

    /// Reads one reply, following multi-line replies through to their
    /// closing `NNN ` line.
    async fn read_reply(&mut self) -> String {
        let mut reply = String::new();
        self.reader.read_line(&mut reply).await.unwrap();
        if reply.len() >= 4 && reply.as_bytes()[3] == b'-' {
            let terminator = format!("{} ", &reply[..3]);
            loop {
                let mut line = String::new();
                self.reader.read_line(&mut line).await.unwrap();
                reply.push_str(&line);
                if line.starts_with(&terminator) {
                    break;
                }
            }
        }
        reply
    }

    async fn send_raw(&mut self, raw: &[u8]) -> String {
        self.writer.write_all(raw).await.unwrap();
        self.writer.write_all(b"\r\n").await.unwrap();
        self.read_reply().await
    }

    async fn cmd(&mut self, line: &str) -> String {
        self.send_raw(line.as_bytes()).await
    }

    async fn login(&mut self) {
        let reply = self.cmd("USER admin").await;
        assert!(reply.starts_with("331"), "unexpected USER reply: {}", reply);
        let reply = self.cmd("PASS 123456").await;
        assert!(reply.starts_with("230"), "unexpected PASS reply: {}", reply);
    }

    /// Issues PASV and connects to the announced port.
    async fn pasv(&mut self) -> TcpStream {
        let reply = self.cmd("PASV").await;
        assert!(reply.starts_with("227"), "unexpected PASV reply: {}", reply);
        TcpStream::connect(("127.0.0.1", parse_pasv_port(&reply))).await.unwrap()
    }
}

fn parse_pasv_port(reply: &str) -> u16 {
    let inner = reply.split('(').nth(1).unwrap().split(')').next().unwrap();
    let nums: Vec<u16> = inner.split(',').map(|n| n.trim().parse().unwrap()).collect();
    nums[4] * 256 + nums[5]
}

async fn read_to_end(mut socket: TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    socket.read_to_end(&mut buf).await.unwrap();
    buf
}

#[tokio::test]
async fn login_then_pwd() {
    let root = tempfile::tempdir().unwrap();
    let _server = start_server(root.path(), 2141);

    let mut client = TestClient::connect(2141).await;
    assert_eq!(client.greeting, "220 Welcome to Go FTP Server\r\n");
    assert_eq!(client.cmd("USER admin").await, "331 Please enter password\r\n");
    assert_eq!(client.cmd("PASS 123456").await, "230 Login successful\r\n");
    assert_eq!(client.cmd("PWD").await, "257 \"/\" is current directory\r\n");
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let root = tempfile::tempdir().unwrap();
    let _server = start_server(root.path(), 2142);

    let mut client = TestClient::connect(2142).await;
    client.cmd("USER admin").await;
    let reply = client.cmd("PASS wrong").await;
    assert!(reply.starts_with("530"), "{}", reply);
    // Still locked out, and a fresh handshake works.
    let reply = client.cmd("PWD").await;
    assert!(reply.starts_with("530"), "{}", reply);
    client.login().await;
}

#[tokio::test]
async fn commands_require_login() {
    let root = tempfile::tempdir().unwrap();
    let _server = start_server(root.path(), 2143);

    let mut client = TestClient::connect(2143).await;
    for cmd in ["PWD", "LIST", "SIZE x", "FOO"] {
        let reply = client.cmd(cmd).await;
        assert!(reply.starts_with("530"), "{} got {}", cmd, reply);
    }
    // PASS before USER is a sequence error, not an auth error.
    let reply = client.cmd("PASS 123456").await;
    assert!(reply.starts_with("503"), "{}", reply);
}

#[tokio::test]
async fn path_escape_is_refused() {
    let root = tempfile::tempdir().unwrap();
    let _server = start_server(root.path(), 2144);

    let mut client = TestClient::connect(2144).await;
    client.login().await;
    let reply = client.cmd("CWD ../../etc").await;
    assert!(reply.starts_with("550"), "{}", reply);
    assert_eq!(client.cmd("PWD").await, "257 \"/\" is current directory\r\n");
}

#[tokio::test]
async fn cwd_dotdot_at_root_stays_at_root() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join("sub")).unwrap();
    let _server = start_server(root.path(), 2145);

    let mut client = TestClient::connect(2145).await;
    client.login().await;
    assert!(client.cmd("CWD ..").await.starts_with("250"));
    assert_eq!(client.cmd("PWD").await, "257 \"/\" is current directory\r\n");
    assert!(client.cmd("CWD sub").await.starts_with("250"));
    assert_eq!(client.cmd("PWD").await, "257 \"/sub\" is current directory\r\n");
    assert!(client.cmd("CDUP").await.starts_with("250"));
    assert_eq!(client.cmd("PWD").await, "257 \"/\" is current directory\r\n");
}

#[tokio::test]
async fn passive_binary_upload_roundtrip() {
    let root = tempfile::tempdir().unwrap();
    let _server = start_server(root.path(), 2146);

    let mut client = TestClient::connect(2146).await;
    client.login().await;

    let payload: Vec<u8> = (0..=255u8).collect();
    let mut data = client.pasv().await;
    let reply = client.cmd("STOR hello.bin").await;
    assert!(reply.starts_with("150"), "{}", reply);
    data.write_all(&payload).await.unwrap();
    data.shutdown().await.unwrap();
    drop(data);
    let reply = client.read_reply().await;
    assert_eq!(reply, "226 Transfer complete, 256 bytes received\r\n");

    assert_eq!(client.cmd("SIZE hello.bin").await, "213 256\r\n");
    assert_eq!(std::fs::read(root.path().join("hello.bin")).unwrap(), payload);

    // And back out again, byte for byte.
    let data = client.pasv().await;
    let reply = client.cmd("RETR hello.bin").await;
    assert!(reply.starts_with("150"), "{}", reply);
    let echoed = read_to_end(data).await;
    let reply = client.read_reply().await;
    assert_eq!(reply, "226 Transfer complete, 256 bytes sent\r\n");
    assert_eq!(echoed, payload);
}

#[tokio::test]
async fn ascii_mode_round_trip() {
    let root = tempfile::tempdir().unwrap();
    let _server = start_server(root.path(), 2147);

    let mut client = TestClient::connect(2147).await;
    client.login().await;
    assert!(client.cmd("TYPE A").await.starts_with("200"));

    let mut data = client.pasv().await;
    let reply = client.cmd("STOR note.txt").await;
    assert!(reply.starts_with("150"), "{}", reply);
    data.write_all(b"a\r\nb\n").await.unwrap();
    data.shutdown().await.unwrap();
    drop(data);
    let reply = client.read_reply().await;
    assert!(reply.starts_with("226"), "{}", reply);
    assert_eq!(std::fs::read(root.path().join("note.txt")).unwrap(), b"a\nb\n");

    let data = client.pasv().await;
    let reply = client.cmd("RETR note.txt").await;
    assert!(reply.starts_with("150"), "{}", reply);
    let echoed = read_to_end(data).await;
    let reply = client.read_reply().await;
    assert_eq!(reply, "226 Transfer complete, 6 bytes sent\r\n");
    assert_eq!(echoed, b"a\r\nb\r\n");
}

#[tokio::test]
async fn binary_extension_overrides_ascii_mode() {
    let root = tempfile::tempdir().unwrap();
    let _server = start_server(root.path(), 2148);

    let mut client = TestClient::connect(2148).await;
    client.login().await;
    assert!(client.cmd("TYPE A").await.starts_with("200"));

    let payload = b"\x89PNG\r\n\x1a\nrest".to_vec();
    let mut data = client.pasv().await;
    let reply = client.cmd("STOR img.png").await;
    assert!(reply.starts_with("150"), "{}", reply);
    data.write_all(&payload).await.unwrap();
    data.shutdown().await.unwrap();
    drop(data);
    let reply = client.read_reply().await;
    assert!(reply.starts_with("226"), "{}", reply);
    // The CRLF inside the PNG magic survived untouched.
    assert_eq!(std::fs::read(root.path().join("img.png")).unwrap(), payload);
    // The session type itself is still ASCII.
    let reply = client.cmd("STAT").await;
    assert!(reply.contains("Type: ASCII"), "{}", reply);
}

#[tokio::test]
async fn rename_sequence() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("a.txt"), b"x").unwrap();
    let _server = start_server(root.path(), 2149);

    let mut client = TestClient::connect(2149).await;
    client.login().await;
    assert!(client.cmd("RNFR a.txt").await.starts_with("350"));
    assert!(client.cmd("RNTO b.txt").await.starts_with("250"));
    assert!(root.path().join("b.txt").exists());
    assert!(!root.path().join("a.txt").exists());
    // The source is gone now.
    assert!(client.cmd("RNFR a.txt").await.starts_with("550"));
    // And RNTO without RNFR is out of sequence.
    assert!(client.cmd("RNTO c.txt").await.starts_with("503"));
}

#[tokio::test]
async fn rename_from_is_cleared_by_interleaved_command() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("a.txt"), b"x").unwrap();
    let _server = start_server(root.path(), 2150);

    let mut client = TestClient::connect(2150).await;
    client.login().await;
    assert!(client.cmd("RNFR a.txt").await.starts_with("350"));
    client.cmd("NOOP").await;
    assert!(client.cmd("RNTO b.txt").await.starts_with("503"));
    assert!(root.path().join("a.txt").exists());
}

#[tokio::test]
async fn unknown_verb_after_login() {
    let root = tempfile::tempdir().unwrap();
    let _server = start_server(root.path(), 2151);

    let mut client = TestClient::connect(2151).await;
    client.login().await;
    assert_eq!(client.cmd("FOO").await, "500 Unknown command\r\n");
}

#[tokio::test]
async fn concurrent_sessions_list_independently() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("seed.txt"), b"seed").unwrap();
    let _server = start_server(root.path(), 2152);

    async fn list_session(port: u16) -> String {
        let mut client = TestClient::connect(port).await;
        client.login().await;
        let data = client.pasv().await;
        let reply = client.cmd("LIST").await;
        assert!(reply.starts_with("150"), "{}", reply);
        let listing = read_to_end(data).await;
        let reply = client.read_reply().await;
        assert!(reply.starts_with("226"), "{}", reply);
        String::from_utf8(listing).unwrap()
    }

    let (first, second) = tokio::join!(list_session(2152), list_session(2152));
    assert!(first.contains("seed.txt"), "{}", first);
    assert!(second.contains("seed.txt"), "{}", second);
    assert!(first.ends_with("\r\n"));
}

#[tokio::test]
async fn list_lines_look_like_ls() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("file.txt"), b"hello").unwrap();
    std::fs::create_dir(root.path().join("dir")).unwrap();
    let _server = start_server(root.path(), 2153);

    let mut client = TestClient::connect(2153).await;
    client.login().await;
    let data = client.pasv().await;
    let reply = client.cmd("LIST").await;
    assert!(reply.starts_with("150"), "{}", reply);
    let listing = String::from_utf8(read_to_end(data).await).unwrap();
    client.read_reply().await;

    let file_line = listing.lines().find(|l| l.ends_with("file.txt")).unwrap();
    assert!(file_line.starts_with('-'), "{}", file_line);
    assert!(file_line.contains("       5 "), "{}", file_line);
    let dir_line = listing.lines().find(|l| l.ends_with("dir")).unwrap();
    assert!(dir_line.starts_with('d'), "{}", dir_line);
}

#[tokio::test]
async fn nlst_returns_names_only() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("one.txt"), b"1").unwrap();
    std::fs::write(root.path().join("two.txt"), b"2").unwrap();
    let _server = start_server(root.path(), 2154);

    let mut client = TestClient::connect(2154).await;
    client.login().await;
    let data = client.pasv().await;
    let reply = client.cmd("NLST").await;
    assert!(reply.starts_with("150"), "{}", reply);
    let listing = String::from_utf8(read_to_end(data).await).unwrap();
    client.read_reply().await;
    assert_eq!(listing, "one.txt\r\ntwo.txt\r\n");
}

#[tokio::test]
async fn active_mode_list_dials_back() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("seen.txt"), b"x").unwrap();
    let _server = start_server(root.path(), 2155);

    let mut client = TestClient::connect(2155).await;
    client.login().await;

    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let reply = client.cmd(&format!("PORT 127,0,0,1,{},{}", port / 256, port % 256)).await;
    assert_eq!(reply, "200 PORT command successful\r\n");

    client.writer.write_all(b"LIST\r\n").await.unwrap();
    let (data, _) = listener.accept().await.unwrap();
    let reply = client.read_reply().await;
    assert!(reply.starts_with("150"), "{}", reply);
    let listing = String::from_utf8(read_to_end(data).await).unwrap();
    let reply = client.read_reply().await;
    assert!(reply.starts_with("226"), "{}", reply);
    assert!(listing.contains("seen.txt"), "{}", listing);
}

#[tokio::test]
async fn epsv_announces_port_only() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("f.txt"), b"x").unwrap();
    let _server = start_server(root.path(), 2156);

    let mut client = TestClient::connect(2156).await;
    client.login().await;
    let reply = client.cmd("EPSV").await;
    assert!(reply.starts_with("229"), "{}", reply);
    let port: u16 = reply.split("|||").nth(1).unwrap().split('|').next().unwrap().parse().unwrap();
    let data = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    let reply = client.cmd("NLST").await;
    assert!(reply.starts_with("150"), "{}", reply);
    let listing = String::from_utf8(read_to_end(data).await).unwrap();
    client.read_reply().await;
    assert_eq!(listing, "f.txt\r\n");
}

#[tokio::test]
async fn transfer_without_data_endpoint_is_425() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("f.txt"), b"x").unwrap();
    let _server = start_server(root.path(), 2157);

    let mut client = TestClient::connect(2157).await;
    client.login().await;
    assert!(client.cmd("RETR f.txt").await.starts_with("425"));
    assert!(client.cmd("LIST").await.starts_with("425"));
}

#[tokio::test]
async fn mkd_rmd_dele_lifecycle() {
    let root = tempfile::tempdir().unwrap();
    let _server = start_server(root.path(), 2158);

    let mut client = TestClient::connect(2158).await;
    client.login().await;
    assert_eq!(client.cmd("MKD deep/nested").await, "257 \"deep/nested\" created\r\n");
    assert!(root.path().join("deep/nested").is_dir());

    std::fs::write(root.path().join("deep/nested/f.txt"), b"x").unwrap();
    let reply = client.cmd("RMD deep/nested").await;
    assert!(reply.starts_with("550"), "{}", reply);

    assert!(client.cmd("DELE deep/nested/f.txt").await.starts_with("250"));
    assert!(client.cmd("RMD deep/nested").await.starts_with("250"));
    assert!(!root.path().join("deep/nested").exists());

    assert!(client.cmd("DELE missing.txt").await.starts_with("550"));
}

#[tokio::test]
async fn size_and_mdtm_report_file_facts() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("f.bin"), vec![0u8; 42]).unwrap();
    std::fs::create_dir(root.path().join("d")).unwrap();
    let _server = start_server(root.path(), 2159);

    let mut client = TestClient::connect(2159).await;
    client.login().await;
    assert_eq!(client.cmd("SIZE f.bin").await, "213 42\r\n");
    assert!(client.cmd("SIZE d").await.starts_with("550"));
    assert!(client.cmd("SIZE missing").await.starts_with("550"));

    let reply = client.cmd("MDTM f.bin").await;
    assert!(reply.starts_with("213 "), "{}", reply);
    let stamp = reply[4..].trim();
    assert_eq!(stamp.len(), 14, "{}", stamp);
    assert!(stamp.chars().all(|c| c.is_ascii_digit()), "{}", stamp);
}

#[tokio::test]
async fn feat_lists_the_extensions() {
    let root = tempfile::tempdir().unwrap();
    let _server = start_server(root.path(), 2160);

    let mut client = TestClient::connect(2160).await;
    client.login().await;
    let reply = client.cmd("FEAT").await;
    assert!(reply.starts_with("211-"), "{}", reply);
    for feature in ["UTF8", "SIZE", "MDTM", "REST STREAM", "PASV", "EPSV", "EPRT"] {
        assert!(reply.contains(&format!("\r\n {}\r\n", feature)), "missing {} in {}", feature, reply);
    }
    assert!(reply.ends_with("211 End\r\n"), "{}", reply);
}

#[tokio::test]
async fn rest_resumes_a_download() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("f.bin"), b"0123456789").unwrap();
    let _server = start_server(root.path(), 2161);

    let mut client = TestClient::connect(2161).await;
    client.login().await;
    assert!(client.cmd("REST 4").await.starts_with("350"));
    let data = client.pasv().await;
    let reply = client.cmd("RETR f.bin").await;
    assert!(reply.starts_with("150"), "{}", reply);
    let tail = read_to_end(data).await;
    let reply = client.read_reply().await;
    assert_eq!(reply, "226 Transfer complete, 6 bytes sent\r\n");
    assert_eq!(tail, b"456789");

    // The offset was consumed; the next RETR starts from zero.
    let data = client.pasv().await;
    client.cmd("RETR f.bin").await;
    assert_eq!(read_to_end(data).await, b"0123456789");
    client.read_reply().await;
}

#[tokio::test]
async fn appe_appends_to_existing_file() {
    let root = tempfile::tempdir().unwrap();
    let _server = start_server(root.path(), 2162);

    let mut client = TestClient::connect(2162).await;
    client.login().await;

    for (cmd, payload) in [("STOR f.txt", b"abc"), ("APPE f.txt", b"def")] {
        let mut data = client.pasv().await;
        let reply = client.cmd(cmd).await;
        assert!(reply.starts_with("150"), "{}", reply);
        data.write_all(payload).await.unwrap();
        data.shutdown().await.unwrap();
        drop(data);
        let reply = client.read_reply().await;
        assert!(reply.starts_with("226"), "{}", reply);
    }

    assert_eq!(std::fs::read(root.path().join("f.txt")).unwrap(), b"abcdef");
}

#[tokio::test]
async fn stor_creates_missing_parent_directories() {
    let root = tempfile::tempdir().unwrap();
    let _server = start_server(root.path(), 2163);

    let mut client = TestClient::connect(2163).await;
    client.login().await;
    let mut data = client.pasv().await;
    let reply = client.cmd("STOR a/b/c.txt").await;
    assert!(reply.starts_with("150"), "{}", reply);
    data.write_all(b"nested").await.unwrap();
    data.shutdown().await.unwrap();
    drop(data);
    let reply = client.read_reply().await;
    assert!(reply.starts_with("226"), "{}", reply);
    assert_eq!(std::fs::read(root.path().join("a/b/c.txt")).unwrap(), b"nested");
}

#[tokio::test]
async fn gbk_filenames_decode_to_unicode_on_disk() {
    let root = tempfile::tempdir().unwrap();
    let _server = start_server(root.path(), 2164);

    let mut client = TestClient::connect(2164).await;
    client.login().await;
    let mut data = client.pasv().await;
    // "文件.txt" in GBK bytes; the session default charset is GBK.
    let reply = client.send_raw(b"STOR \xce\xc4\xbc\xfe.txt").await;
    assert!(reply.starts_with("150"), "{}", reply);
    data.write_all(b"hi").await.unwrap();
    data.shutdown().await.unwrap();
    drop(data);
    let reply = client.read_reply().await;
    assert!(reply.starts_with("226"), "{}", reply);
    assert!(root.path().join("\u{6587}\u{4ef6}.txt").exists());
}

#[tokio::test]
async fn opts_utf8_switches_the_session_charset() {
    let root = tempfile::tempdir().unwrap();
    let _server = start_server(root.path(), 2165);

    let mut client = TestClient::connect(2165).await;
    client.login().await;
    assert_eq!(client.cmd("OPTS UTF8 ON").await, "200 UTF8 mode enabled\r\n");

    let name = "\u{6587}\u{4ef6}.txt";
    let mut data = client.pasv().await;
    let reply = client.send_raw(format!("STOR {}", name).as_bytes()).await;
    assert!(reply.starts_with("150"), "{}", reply);
    data.write_all(b"hi").await.unwrap();
    data.shutdown().await.unwrap();
    drop(data);
    let reply = client.read_reply().await;
    assert!(reply.starts_with("226"), "{}", reply);
    assert!(root.path().join(name).exists());

    assert_eq!(client.cmd("OPTS UTF8 OFF").await, "200 UTF8 mode disabled\r\n");
    assert!(client.cmd("OPTS MLST Type").await.starts_with("501"));
}

#[tokio::test]
async fn stat_reports_session_and_files() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("f.txt"), b"hello").unwrap();
    let _server = start_server(root.path(), 2166);

    let mut client = TestClient::connect(2166).await;
    client.login().await;
    let reply = client.cmd("STAT").await;
    assert!(reply.starts_with("211-"), "{}", reply);
    assert!(reply.contains("Logged in as: admin"), "{}", reply);
    assert!(reply.contains("Working Directory: /"), "{}", reply);

    let reply = client.cmd("STAT f.txt").await;
    assert!(reply.starts_with("213-"), "{}", reply);
    assert!(reply.contains("f.txt"), "{}", reply);
}

#[tokio::test]
async fn type_accepts_binary_aliases() {
    let root = tempfile::tempdir().unwrap();
    let _server = start_server(root.path(), 2167);

    let mut client = TestClient::connect(2167).await;
    client.login().await;
    assert!(client.cmd("TYPE I").await.starts_with("200"));
    assert!(client.cmd("TYPE L").await.starts_with("200"));
    assert!(client.cmd("TYPE L 8").await.starts_with("200"));
    assert!(client.cmd("TYPE A").await.starts_with("200"));
    assert!(client.cmd("TYPE E").await.starts_with("504"));
    assert!(client.cmd("SYST").await.starts_with("215 UNIX Type: L8"));
    assert!(client.cmd("NOOP").await.starts_with("200"));
}

#[tokio::test]
async fn eprt_accepts_ipv4_and_rejects_unknown_protocols() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("f.txt"), b"x").unwrap();
    let _server = start_server(root.path(), 2168);

    let mut client = TestClient::connect(2168).await;
    client.login().await;

    assert!(client.cmd("EPRT |3|1.2.3.4|6000|").await.starts_with("522"));
    assert!(client.cmd("EPRT |1|garbage|6000|").await.starts_with("500"));

    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let reply = client.cmd(&format!("EPRT |1|127.0.0.1|{}|", port)).await;
    assert_eq!(reply, "200 EPRT command successful\r\n");

    client.writer.write_all(b"NLST\r\n").await.unwrap();
    let (data, _) = listener.accept().await.unwrap();
    let reply = client.read_reply().await;
    assert!(reply.starts_with("150"), "{}", reply);
    let listing = String::from_utf8(read_to_end(data).await).unwrap();
    client.read_reply().await;
    assert_eq!(listing, "f.txt\r\n");
}

#[tokio::test]
async fn quit_closes_the_session() {
    let root = tempfile::tempdir().unwrap();
    let _server = start_server(root.path(), 2169);

    let mut client = TestClient::connect(2169).await;
    assert_eq!(client.cmd("QUIT").await, "221 Goodbye\r\n");
    let mut rest = String::new();
    client.reader.read_line(&mut rest).await.unwrap();
    assert_eq!(rest, "");
}

#[tokio::test]
async fn start_twice_fails_and_stop_tears_down() {
    let root = tempfile::tempdir().unwrap();
    let server = start_server(root.path(), 2170);
    assert!(server.is_running());
    assert!(matches!(server.start(), Err(easyftp::ServerError::AlreadyRunning)));

    server.stop().unwrap();
    assert!(!server.is_running());
    // Stopping again is a no-op.
    server.stop().unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(TcpStream::connect(("127.0.0.1", 2170)).await.is_err());

    // The port is free again for a fresh start.
    server.start().unwrap();
    let mut client = TestClient::connect(2170).await;
    client.login().await;
}
