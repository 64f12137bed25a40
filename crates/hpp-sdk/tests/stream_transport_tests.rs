//! 端到端测试：通过真实 socket 连接进程内的替身服务
//!
//! 替身服务只实现少量操作：
//! - 初始构型的读写
//! - `solve` 阻塞直到收到 `interruptPathPlanning`
//! - 其他操作返回 UnknownOperation

use crossbeam_channel::{Receiver, Sender};
use hpp_sdk::prelude::*;
use hpp_sdk::protocol::{
    ConnectAck, ErrorCode, ErrorReply, HEADER_LEN, Interface, Message, MessageHeader,
    PROTOCOL_VERSION, Reply, decode_payload, encode_message,
};
use serde_json::{Value, json};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::os::unix::net::UnixListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

fn read_frame(reader: &mut impl Read) -> Option<(MessageHeader, Message)> {
    let mut head = [0u8; HEADER_LEN];
    reader.read_exact(&mut head).ok()?;
    let header = MessageHeader::decode(&head).ok()?;
    let mut payload = vec![0u8; header.length as usize];
    reader.read_exact(&mut payload).ok()?;
    Some((header, decode_payload(&header, &payload).ok()?))
}

fn write_frame(writer: &SharedWriter, seq: u32, message: &Message) {
    let frame = encode_message(seq, message).unwrap();
    let mut writer = writer.lock().unwrap();
    // 客户端可能已经断开
    let _ = writer.write_all(&frame);
}

fn reply(result: Value) -> Message {
    Message::Reply(Reply { result })
}

fn error(code: ErrorCode, message: &str) -> Message {
    Message::Error(ErrorReply {
        code,
        message: message.to_string(),
    })
}

/// 处理一个连接，返回收到的操作名
fn serve(mut reader: impl Read, writer: SharedWriter) -> Vec<String> {
    let mut methods = Vec::new();

    match read_frame(&mut reader) {
        Some((_, Message::Connect(hello))) => {
            assert_eq!(hello.context, "corbaserver");
            write_frame(
                &writer,
                0,
                &Message::ConnectAck(ConnectAck {
                    status: 0,
                    version: PROTOCOL_VERSION.to_string(),
                }),
            );
        },
        _ => return methods,
    }

    let mut initial_config = json!([]);
    let (interrupt_tx, interrupt_rx): (Sender<()>, Receiver<()>) = crossbeam_channel::unbounded();

    while let Some((header, message)) = read_frame(&mut reader) {
        let call = match message {
            Message::Call(call) => call,
            Message::Disconnect => break,
            _ => continue,
        };
        methods.push(call.method.clone());

        let Some((Interface::BasicProblem, operation)) = Interface::parse_method(&call.method)
        else {
            write_frame(
                &writer,
                header.seq,
                &error(ErrorCode::UnknownOperation, &call.method),
            );
            continue;
        };

        match operation {
            "setInitialConfig" => {
                initial_config = call.args[0].clone();
                write_frame(&writer, header.seq, &reply(Value::Null));
            },
            "getInitialConfig" => {
                write_frame(&writer, header.seq, &reply(initial_config.clone()));
            },
            "solve" => {
                // 在独立线程中等待中断，读循环继续处理后续调用
                let writer = Arc::clone(&writer);
                let interrupted = interrupt_rx.clone();
                thread::spawn(move || {
                    let message = match interrupted.recv_timeout(Duration::from_secs(5)) {
                        Ok(()) => error(ErrorCode::Remote, "Interrupted"),
                        Err(_) => reply(json!([0, 0, 5, 0])),
                    };
                    write_frame(&writer, header.seq, &message);
                });
            },
            "interruptPathPlanning" => {
                let _ = interrupt_tx.send(());
                write_frame(&writer, header.seq, &reply(Value::Null));
            },
            _ => write_frame(
                &writer,
                header.seq,
                &error(ErrorCode::UnknownOperation, &call.method),
            ),
        }
    }
    methods
}

/// 在临时目录中启动 Unix Socket 替身服务
fn spawn_unix_server() -> (tempfile::TempDir, String, thread::JoinHandle<Vec<String>>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hpp.sock");
    let listener = UnixListener::bind(&path).unwrap();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let writer: Box<dyn Write + Send> = Box::new(stream.try_clone().unwrap());
        serve(stream, Arc::new(Mutex::new(writer)))
    });
    (dir, path.to_string_lossy().into_owned(), handle)
}

fn solver(address: &str) -> ProblemSolver<HumanoidRobot> {
    let client = ClientBuilder::new()
        .address(address)
        .connect_timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let robot = HumanoidRobot::new(client, "robot", "robot/l_ankle", "robot/r_ankle");
    ProblemSolver::new(Arc::new(robot))
}

#[test]
fn test_round_trip_over_unix_socket() {
    let (_dir, path, server) = spawn_unix_server();
    let ps = solver(&path);

    ps.set_initial_config(&[0.0, 0.5, 1.0]).unwrap();
    assert_eq!(ps.get_initial_config().unwrap(), vec![0.0, 0.5, 1.0]);

    drop(ps);
    assert_eq!(
        server.join().unwrap(),
        vec!["hpp/problem::setInitialConfig", "hpp/problem::getInitialConfig"]
    );
}

#[test]
fn test_round_trip_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let writer: Box<dyn Write + Send> = Box::new(stream.try_clone().unwrap());
        serve(stream, Arc::new(Mutex::new(writer)))
    });

    let ps = solver(&address);
    ps.set_initial_config(&[1.0]).unwrap();
    assert_eq!(ps.get_initial_config().unwrap(), vec![1.0]);

    drop(ps);
    assert_eq!(server.join().unwrap().len(), 2);
}

#[test]
fn test_interrupt_from_another_thread() {
    let (_dir, path, _server) = spawn_unix_server();
    let ps = Arc::new(solver(&path));

    let solving = {
        let ps = Arc::clone(&ps);
        thread::spawn(move || ps.solve())
    };
    thread::sleep(Duration::from_millis(100));
    ps.interrupt_path_planning().unwrap();

    let err = solving.join().unwrap().unwrap_err();
    let remote = err.as_remote().expect("remote error");
    assert_eq!(remote.method, "hpp/problem::solve");
    assert_eq!(remote.code, ErrorCode::Remote);
    assert_eq!(remote.message, "Interrupted");
}

#[test]
fn test_unknown_operation_is_remote_error() {
    let (_dir, path, _server) = spawn_unix_server();
    let ps = solver(&path);

    let err = ps.number_paths().unwrap_err();
    match err {
        ClientError::Remote(e) => {
            assert_eq!(e.code, ErrorCode::UnknownOperation);
            assert_eq!(e.message, "hpp/problem::numberPaths");
        },
        other => panic!("Expected remote error, got {other:?}"),
    }

    // 非基础接口的调用同样返回
    let err = ps.select_problem("other").unwrap_err();
    assert!(err.is_remote());
}

#[test]
fn test_connect_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nobody.sock");
    let err = ClientBuilder::new()
        .address(path.to_string_lossy())
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Io(_))
    ));
}
