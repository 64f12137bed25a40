//! Unix Socket / TCP 流式传输
//!
//! 连接建立后先完成握手（`Connect` → `ConnectAck`），之后所有调用共用一条连接：
//! - 写端由互斥锁保护，每次写入一帧完整的 `Call`
//! - 读线程持续读取应答，按序列号分发给等待中的调用方
//!
//! 因此在一个线程阻塞于 `solve` 时，另一个线程仍可发出 `interruptPathPlanning`。

use crate::{RemoteError, Transport, TransportError};
use crossbeam_channel::{RecvTimeoutError, Sender};
use hpp_protocol::{
    Call, Connect, HEADER_LEN, Message, MessageHeader, PROTOCOL_VERSION, decode_payload,
    encode_message,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// 服务地址（支持 UDS 和 TCP）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceAddr {
    Unix(PathBuf), // UDS 路径
    Tcp(String),   // host:port
}

impl ServiceAddr {
    /// 解析地址字符串
    ///
    /// 以 `/` 或 `.` 开头、或以 `.sock` 结尾的视为 UDS 路径，其余视为 TCP 地址。
    pub fn parse(addr: &str) -> Self {
        if addr.starts_with('/') || addr.starts_with('.') || addr.ends_with(".sock") {
            ServiceAddr::Unix(PathBuf::from(addr))
        } else {
            ServiceAddr::Tcp(addr.to_string())
        }
    }
}

impl std::fmt::Display for ServiceAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceAddr::Unix(path) => write!(f, "unix:{}", path.display()),
            ServiceAddr::Tcp(addr) => write!(f, "tcp:{addr}"),
        }
    }
}

/// 流式传输配置
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    /// 命名服务上下文
    pub context: String,
    /// 建立连接和握手的超时
    pub connect_timeout: Duration,
    /// 单次调用超时（`None` 表示一直等待）
    pub call_timeout: Option<Duration>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            context: "corbaserver".to_string(),
            connect_timeout: Duration::from_secs(5),
            call_timeout: None,
        }
    }
}

/// Socket（支持 UDS 和 TCP）
enum Stream {
    Unix(UnixStream),
    Tcp(TcpStream),
}

impl Stream {
    fn try_clone(&self) -> io::Result<Self> {
        match self {
            Stream::Unix(s) => s.try_clone().map(Stream::Unix),
            Stream::Tcp(s) => s.try_clone().map(Stream::Tcp),
        }
    }

    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        match self {
            Stream::Unix(s) => s.set_read_timeout(timeout),
            Stream::Tcp(s) => s.set_read_timeout(timeout),
        }
    }

    fn shutdown(&self) -> io::Result<()> {
        match self {
            Stream::Unix(s) => s.shutdown(Shutdown::Both),
            Stream::Tcp(s) => s.shutdown(Shutdown::Both),
        }
    }
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Stream::Unix(s) => s.read(buf),
            Stream::Tcp(s) => s.read(buf),
        }
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Stream::Unix(s) => s.write(buf),
            Stream::Tcp(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Stream::Unix(s) => s.flush(),
            Stream::Tcp(s) => s.flush(),
        }
    }
}

/// 等待应答的调用（序列号 → 一次性通道）
///
/// 应答负载无法解析时，解析错误直接交给对应的调用方。
type PendingCalls = Arc<Mutex<HashMap<u32, Sender<Result<Message, TransportError>>>>>;

/// 流式传输
pub struct StreamTransport {
    /// 写端（读端由读线程持有）
    writer: Mutex<Stream>,

    /// 等待应答的调用
    pending: PendingCalls,

    /// 序列号（0 保留给握手）
    seq_counter: AtomicU32,

    /// 连接是否已关闭
    closed: Arc<AtomicBool>,

    /// 读线程句柄
    reader_handle: Mutex<Option<thread::JoinHandle<()>>>,

    call_timeout: Option<Duration>,

    /// 服务端协议版本
    server_version: String,
}

impl StreamTransport {
    /// 连接到服务并完成握手
    pub fn connect(addr: &ServiceAddr, config: &StreamConfig) -> Result<Self, TransportError> {
        debug!("Connecting to problem solver at {}", addr);
        let stream = match addr {
            ServiceAddr::Unix(path) => Stream::Unix(UnixStream::connect(path)?),
            ServiceAddr::Tcp(host) => {
                let stream = connect_tcp(host, config.connect_timeout)?;
                stream.set_nodelay(true)?;
                Stream::Tcp(stream)
            },
        };
        Self::handshake(stream, config)
    }

    /// 在已建立的 Unix Socket 上完成握手
    pub fn from_unix_stream(
        stream: UnixStream,
        config: &StreamConfig,
    ) -> Result<Self, TransportError> {
        Self::handshake(Stream::Unix(stream), config)
    }

    fn handshake(mut stream: Stream, config: &StreamConfig) -> Result<Self, TransportError> {
        stream.set_read_timeout(Some(config.connect_timeout))?;

        let hello = Message::Connect(Connect {
            context: config.context.clone(),
            version: PROTOCOL_VERSION.to_string(),
        });
        stream.write_all(&encode_message(0, &hello)?)?;
        stream.flush()?;

        let server_version = match read_frame(&mut stream) {
            Ok((_, Message::ConnectAck(ack))) => {
                if ack.status != 0 {
                    return Err(TransportError::Connection(format!(
                        "Connect rejected with status: {}",
                        ack.status
                    )));
                }
                check_version(&ack.version)?;
                ack.version
            },
            Ok((_, Message::Error(e))) => {
                return Err(TransportError::Connection(format!(
                    "Connect error {}: {}",
                    e.code, e.message
                )));
            },
            Ok((header, _)) => {
                return Err(TransportError::Connection(format!(
                    "Unexpected {:?} during handshake",
                    header.msg_type
                )));
            },
            Err(TransportError::Io(e))
                if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) =>
            {
                return Err(TransportError::Timeout);
            },
            Err(e) => return Err(e),
        };
        debug!(
            "Handshake complete (context: {}, server version: {})",
            config.context, server_version
        );

        // 握手之后读线程一直阻塞读取
        stream.set_read_timeout(None)?;

        let pending: PendingCalls = Arc::new(Mutex::new(HashMap::new()));
        let closed = Arc::new(AtomicBool::new(false));
        let reader = stream.try_clone()?;
        let handle = {
            let pending = Arc::clone(&pending);
            let closed = Arc::clone(&closed);
            thread::Builder::new()
                .name("hpp-reader".into())
                .spawn(move || reader_loop(reader, pending, closed))?
        };

        Ok(Self {
            writer: Mutex::new(stream),
            pending,
            seq_counter: AtomicU32::new(1),
            closed,
            reader_handle: Mutex::new(Some(handle)),
            call_timeout: config.call_timeout,
            server_version,
        })
    }

    /// 服务端协议版本
    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    /// 检查连接状态
    pub fn is_connected(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }

    fn next_seq(&self) -> u32 {
        loop {
            let seq = self.seq_counter.fetch_add(1, Ordering::Relaxed);
            if seq != 0 {
                return seq;
            }
        }
    }

    fn send_frame(&self, frame: &[u8]) -> io::Result<()> {
        let mut writer = self.writer.lock();
        writer.write_all(frame)?;
        writer.flush()
    }
}

impl Transport for StreamTransport {
    fn call(&self, method: &str, args: Value) -> Result<Value, TransportError> {
        if !self.is_connected() {
            return Err(TransportError::Closed);
        }

        let seq = self.next_seq();
        let frame = encode_message(
            seq,
            &Message::Call(Call {
                method: method.to_string(),
                args,
            }),
        )?;

        let (tx, rx) = crossbeam_channel::bounded(1);
        self.pending.lock().insert(seq, tx);

        // 读线程先置 closed 再清空 pending，这里的顺序保证不会永久等待
        if !self.is_connected() {
            self.pending.lock().remove(&seq);
            return Err(TransportError::Closed);
        }

        trace!("-> [{}] {}", seq, method);
        if let Err(e) = self.send_frame(&frame) {
            self.pending.lock().remove(&seq);
            return Err(e.into());
        }

        let message = match self.call_timeout {
            Some(timeout) => rx.recv_timeout(timeout).map_err(|e| {
                self.pending.lock().remove(&seq);
                match e {
                    RecvTimeoutError::Timeout => TransportError::Timeout,
                    RecvTimeoutError::Disconnected => TransportError::Closed,
                }
            })?,
            None => rx.recv().map_err(|_| TransportError::Closed)?,
        }?;

        match message {
            Message::Reply(reply) => {
                trace!("<- [{}] {}", seq, method);
                Ok(reply.result)
            },
            Message::Error(e) => {
                debug!("<- [{}] {} raised {}: {}", seq, method, e.code, e.message);
                Err(RemoteError::new(method, e.code, e.message).into())
            },
            other => Err(TransportError::Connection(format!(
                "Unexpected {:?} in reply to {}",
                other.message_type(),
                method
            ))),
        }
    }
}

impl Drop for StreamTransport {
    fn drop(&mut self) {
        let was_connected = !self.closed.swap(true, Ordering::SeqCst);

        // 发送断开通知（尽力而为）
        if was_connected {
            if let Ok(frame) = encode_message(0, &Message::Disconnect) {
                let _ = self.send_frame(&frame);
            }
        }

        // 关闭 socket 让读线程退出
        let _ = self.writer.lock().shutdown();
        if let Some(handle) = self.reader_handle.lock().take() {
            let _ = handle.join();
        }
    }
}

/// 检查服务端主版本号是否一致
fn check_version(server: &str) -> Result<(), TransportError> {
    let parse = |v: &str| {
        semver::Version::parse(v)
            .map_err(|e| TransportError::Connection(format!("Invalid protocol version {v:?}: {e}")))
    };
    let ours = parse(PROTOCOL_VERSION)?;
    let theirs = parse(server)?;
    if ours.major != theirs.major {
        return Err(TransportError::Connection(format!(
            "Incompatible protocol version: client {ours}, server {theirs}"
        )));
    }
    Ok(())
}

/// 依次尝试解析出的每个地址，每次连接都受 `timeout` 限制
fn connect_tcp(host: &str, timeout: Duration) -> Result<TcpStream, TransportError> {
    let mut last_err = None;
    for addr in host.to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                debug!("Connect to {} failed: {}", addr, e);
                last_err = Some(e);
            },
        }
    }

    match last_err {
        Some(e) if e.kind() == io::ErrorKind::TimedOut => Err(TransportError::Timeout),
        Some(e) => Err(e.into()),
        None => Err(TransportError::Connection(format!(
            "No address resolved for {host}"
        ))),
    }
}

/// 读取消息头和负载（不解析负载）
fn read_raw_frame(reader: &mut impl Read) -> Result<(MessageHeader, Vec<u8>), TransportError> {
    let mut head = [0u8; HEADER_LEN];
    reader.read_exact(&mut head)?;
    let header = MessageHeader::decode(&head)?;

    let mut payload = vec![0u8; header.length as usize];
    reader.read_exact(&mut payload)?;
    Ok((header, payload))
}

/// 从流中读取一帧完整消息
fn read_frame(reader: &mut impl Read) -> Result<(MessageHeader, Message), TransportError> {
    let (header, payload) = read_raw_frame(reader)?;
    let message = decode_payload(&header, &payload)?;
    Ok((header, message))
}

/// 读线程：按序列号分发应答，直到连接关闭
///
/// 负载解析失败不影响帧边界，连接继续可用。
fn reader_loop(mut stream: Stream, pending: PendingCalls, closed: Arc<AtomicBool>) {
    loop {
        let (header, payload) = match read_raw_frame(&mut stream) {
            Ok(frame) => frame,
            Err(e) => {
                if !closed.load(Ordering::SeqCst) {
                    warn!("Problem solver connection lost: {}", e);
                }
                break;
            },
        };

        let reply = match decode_payload(&header, &payload) {
            Ok(message @ (Message::Reply(_) | Message::Error(_))) => Ok(message),
            Ok(_) => {
                debug!("Ignoring unsolicited {:?}", header.msg_type);
                continue;
            },
            Err(e) => {
                warn!("Malformed reply for call #{}: {}", header.seq, e);
                Err(TransportError::Protocol(e))
            },
        };

        let waiter = pending.lock().remove(&header.seq);
        match waiter {
            Some(tx) => {
                let _ = tx.send(reply);
            },
            None => warn!("Dropping reply for unknown call #{}", header.seq),
        }
    }

    closed.store(true, Ordering::SeqCst);
    // 丢弃所有发送端，唤醒等待中的调用方（返回 Closed）
    pending.lock().clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpp_protocol::{ConnectAck, ErrorCode, ErrorReply, MessageType, ProtocolError, Reply};
    use serde_json::json;

    fn write_msg(stream: &mut UnixStream, seq: u32, msg: &Message) {
        stream.write_all(&encode_message(seq, msg).unwrap()).unwrap();
    }

    fn accept_handshake(server: &mut UnixStream, version: &str) -> Connect {
        let (header, msg) = read_frame(server).unwrap();
        assert_eq!(header.seq, 0);
        let Message::Connect(hello) = msg else {
            panic!("Expected Connect message");
        };
        write_msg(
            server,
            0,
            &Message::ConnectAck(ConnectAck {
                status: 0,
                version: version.to_string(),
            }),
        );
        hello
    }

    /// 替身服务：回显参数，`fail` 操作返回远程异常
    fn spawn_echo_server(mut server: UnixStream) -> thread::JoinHandle<Connect> {
        thread::spawn(move || {
            let hello = accept_handshake(&mut server, PROTOCOL_VERSION);
            while let Ok((header, msg)) = read_frame(&mut server) {
                match msg {
                    Message::Call(call) if call.method.ends_with("::fail") => write_msg(
                        &mut server,
                        header.seq,
                        &Message::Error(ErrorReply {
                            code: ErrorCode::Remote,
                            message: "expected failure".to_string(),
                        }),
                    ),
                    Message::Call(call) => write_msg(
                        &mut server,
                        header.seq,
                        &Message::Reply(Reply { result: call.args }),
                    ),
                    Message::Disconnect => break,
                    _ => {},
                }
            }
            hello
        })
    }

    #[test]
    fn test_service_addr_parse() {
        assert_eq!(
            ServiceAddr::parse("/tmp/hpp.sock"),
            ServiceAddr::Unix(PathBuf::from("/tmp/hpp.sock"))
        );
        assert_eq!(
            ServiceAddr::parse("hpp.sock"),
            ServiceAddr::Unix(PathBuf::from("hpp.sock"))
        );
        assert_eq!(
            ServiceAddr::parse("127.0.0.1:13331"),
            ServiceAddr::Tcp("127.0.0.1:13331".to_string())
        );
        assert_eq!(
            ServiceAddr::parse("localhost:2809").to_string(),
            "tcp:localhost:2809"
        );
    }

    #[test]
    fn test_call_round_trip() {
        let (client, server) = UnixStream::pair().unwrap();
        let server = spawn_echo_server(server);

        let config = StreamConfig {
            context: "test-context".to_string(),
            ..StreamConfig::default()
        };
        let transport = StreamTransport::from_unix_stream(client, &config).unwrap();
        assert!(transport.is_connected());
        assert_eq!(transport.server_version(), PROTOCOL_VERSION);

        let result = transport
            .call("hpp/problem::pathLength", json!([3]))
            .unwrap();
        assert_eq!(result, json!([3]));

        drop(transport);
        let hello = server.join().unwrap();
        assert_eq!(hello.context, "test-context");
        assert_eq!(hello.version, PROTOCOL_VERSION);
    }

    #[test]
    fn test_remote_error_is_propagated() {
        let (client, server) = UnixStream::pair().unwrap();
        let _server = spawn_echo_server(server);
        let transport = StreamTransport::from_unix_stream(client, &StreamConfig::default()).unwrap();

        let err = transport.call("hpp/problem::fail", json!([])).unwrap_err();
        match err {
            TransportError::Remote(remote) => {
                assert_eq!(remote.method, "hpp/problem::fail");
                assert_eq!(remote.code, ErrorCode::Remote);
                assert_eq!(remote.message, "expected failure");
            },
            other => panic!("Expected Remote error, got {other:?}"),
        }
    }

    #[test]
    fn test_replies_dispatched_by_sequence_number() {
        let (client, mut server) = UnixStream::pair().unwrap();
        let server = thread::spawn(move || {
            accept_handshake(&mut server, PROTOCOL_VERSION);
            // 先收齐两个调用，再倒序应答
            let (first, call_a) = read_frame(&mut server).unwrap();
            let (second, call_b) = read_frame(&mut server).unwrap();
            for (header, call) in [(second, call_b), (first, call_a)] {
                let Message::Call(call) = call else {
                    panic!("Expected Call message");
                };
                write_msg(
                    &mut server,
                    header.seq,
                    &Message::Reply(Reply {
                        result: json!(call.method),
                    }),
                );
            }
            // 等待断开
            let _ = read_frame(&mut server);
        });

        let transport =
            Arc::new(StreamTransport::from_unix_stream(client, &StreamConfig::default()).unwrap());
        let solving = {
            let transport = Arc::clone(&transport);
            thread::spawn(move || transport.call("hpp/problem::solve", json!([])))
        };
        // 确保 solve 先发出
        thread::sleep(Duration::from_millis(50));
        let interrupt = transport
            .call("hpp/problem::interruptPathPlanning", json!([]))
            .unwrap();
        assert_eq!(interrupt, json!("hpp/problem::interruptPathPlanning"));
        assert_eq!(
            solving.join().unwrap().unwrap(),
            json!("hpp/problem::solve")
        );

        drop(transport);
        server.join().unwrap();
    }

    #[test]
    fn test_handshake_rejects_incompatible_version() {
        let (client, mut server) = UnixStream::pair().unwrap();
        let _server = thread::spawn(move || {
            accept_handshake(&mut server, "2.0.0");
        });
        let result = StreamTransport::from_unix_stream(client, &StreamConfig::default());
        assert!(matches!(result, Err(TransportError::Connection(_))));
    }

    #[test]
    fn test_handshake_rejected_status() {
        let (client, mut server) = UnixStream::pair().unwrap();
        let _server = thread::spawn(move || {
            let _ = read_frame(&mut server).unwrap();
            write_msg(
                &mut server,
                0,
                &Message::ConnectAck(ConnectAck {
                    status: 3,
                    version: PROTOCOL_VERSION.to_string(),
                }),
            );
        });
        let result = StreamTransport::from_unix_stream(client, &StreamConfig::default());
        match result {
            Err(TransportError::Connection(msg)) => assert!(msg.contains("status: 3")),
            _ => panic!("Expected Connection error"),
        }
    }

    #[test]
    fn test_handshake_timeout() {
        let (client, server) = UnixStream::pair().unwrap();
        let config = StreamConfig {
            connect_timeout: Duration::from_millis(50),
            ..StreamConfig::default()
        };
        let result = StreamTransport::from_unix_stream(client, &config);
        assert!(matches!(result, Err(TransportError::Timeout)));
        drop(server);
    }

    #[test]
    fn test_call_after_server_exit_returns_closed() {
        let (client, mut server) = UnixStream::pair().unwrap();
        let server = thread::spawn(move || {
            accept_handshake(&mut server, PROTOCOL_VERSION);
            // 不应答，直接关闭
        });
        let transport = StreamTransport::from_unix_stream(client, &StreamConfig::default()).unwrap();
        server.join().unwrap();

        // 读线程检测到 EOF 后，调用应返回 Closed 或 IO 错误
        let err = transport.call("hpp/problem::solve", json!([])).unwrap_err();
        assert!(
            matches!(err, TransportError::Closed | TransportError::Io(_)),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_malformed_reply_goes_to_its_caller() {
        let (client, mut server) = UnixStream::pair().unwrap();
        let _server = thread::spawn(move || {
            accept_handshake(&mut server, PROTOCOL_VERSION);
            // 第一个调用收到无法解析的负载
            let (header, _) = read_frame(&mut server).unwrap();
            let garbage = b"{not json";
            let head = MessageHeader::new(MessageType::Reply, garbage.len() as u32, header.seq);
            server.write_all(&head.to_bytes()).unwrap();
            server.write_all(garbage).unwrap();
            // 第二个调用正常应答
            let (header, _) = read_frame(&mut server).unwrap();
            write_msg(
                &mut server,
                header.seq,
                &Message::Reply(Reply { result: json!(7) }),
            );
            let _ = read_frame(&mut server);
        });

        let transport = StreamTransport::from_unix_stream(client, &StreamConfig::default()).unwrap();
        let err = transport.call("hpp/problem::numberPaths", json!([])).unwrap_err();
        assert!(
            matches!(err, TransportError::Protocol(ProtocolError::Json(_))),
            "unexpected error: {err:?}"
        );

        assert!(transport.is_connected());
        let result = transport.call("hpp/problem::numberPaths", json!([])).unwrap();
        assert_eq!(result, json!(7));
    }

    #[test]
    fn test_tcp_connect_timeout_applies() {
        // 不可路由地址：要么在超时后返回，要么被网络直接拒绝
        let config = StreamConfig {
            connect_timeout: Duration::from_millis(200),
            ..StreamConfig::default()
        };
        let start = std::time::Instant::now();
        let result = StreamTransport::connect(&ServiceAddr::parse("10.255.255.1:13331"), &config);
        assert!(result.is_err());
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_tcp_silent_peer_times_out() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let _server = thread::spawn(move || {
            // 接受连接但从不应答握手
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_secs(1));
            drop(stream);
        });

        let config = StreamConfig {
            connect_timeout: Duration::from_millis(100),
            ..StreamConfig::default()
        };
        let result = StreamTransport::connect(&ServiceAddr::Tcp(addr), &config);
        assert!(matches!(result, Err(TransportError::Timeout)));
    }

    #[test]
    fn test_tcp_unresolvable_host() {
        let err = connect_tcp("no-such-host.invalid:13331", Duration::from_millis(100)).unwrap_err();
        assert!(matches!(
            err,
            TransportError::Io(_) | TransportError::Connection(_)
        ));
    }

    #[test]
    fn test_call_timeout() {
        let (client, mut server) = UnixStream::pair().unwrap();
        let _server = thread::spawn(move || {
            accept_handshake(&mut server, PROTOCOL_VERSION);
            // 读取但从不应答
            while read_frame(&mut server).is_ok() {}
        });
        let config = StreamConfig {
            call_timeout: Some(Duration::from_millis(50)),
            ..StreamConfig::default()
        };
        let transport = StreamTransport::from_unix_stream(client, &config).unwrap();
        let err = transport.call("hpp/problem::solve", json!([])).unwrap_err();
        assert!(matches!(err, TransportError::Timeout));
        assert!(transport.pending.lock().is_empty());
    }
}
