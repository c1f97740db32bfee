use std::io::{BufReader, Cursor};
use std::process::{Child, Command, Stdio};

use kjudge_core::judging::{Communicator, Error, TestCase};

fn spawn_solver(script: &str) -> Child {
    Command::new("/bin/sh")
        .arg("-c")
        .arg(script)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap()
}

fn exchange(script: &str, solver: &str) -> (Result<usize, Error>, String) {
    let script = TestCase::parse(&mut Cursor::new(script)).unwrap();
    let mut child = spawn_solver(solver);
    let stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();

    let mut transcript = Vec::new();
    let mut comm = Communicator::new(BufReader::new(stdout), stdin);
    let res = comm.run(&script, &mut transcript).map(|s| s.rounds);
    drop(comm);
    child.wait().unwrap();

    (res, String::from_utf8(transcript).unwrap())
}

const ECHO: &str = r#"read n; i=0; while [ "$i" -lt "$n" ]; do read line; echo "$line"; i=$((i+1)); done"#;

#[test]
fn echo_solver_over_real_pipes() {
    let (res, transcript) = exchange("2\nq1\nq2\n", ECHO);
    assert_eq!(res.unwrap(), 2);
    assert_eq!(transcript, "q1\nq2\n");
}

#[test]
fn solver_waits_for_each_query() {
    // The solver answers with the number of queries it has seen so far, which
    // only works if every query is flushed before the communicator blocks.
    let counter = r#"read n; i=0; while [ "$i" -lt "$n" ]; do read q; i=$((i+1)); echo "$i:$q"; done"#;
    let (res, transcript) = exchange("3\na\nb\nc\n", counter);
    assert_eq!(res.unwrap(), 3);
    assert_eq!(transcript, "1:a\n2:b\n3:c\n");
}

#[test]
fn solver_quitting_early_is_a_protocol_violation() {
    let (res, transcript) = exchange("3\na\nb\nc\n", "read n; read q; echo $q");
    match res {
        Err(Error::ProtocolViolation { expected, received }) => {
            assert_eq!((expected, received), (3, 1));
        }
        other => panic!("expected protocol violation, got {:?}", other),
    }
    assert_eq!(transcript, "a\n");
}

#[test]
fn silent_solver_is_a_protocol_violation() {
    let (res, transcript) = exchange("1\na\n", "exit 0");
    assert!(res.unwrap_err().is_protocol_violation());
    assert!(transcript.is_empty());
}

#[test]
fn chatty_solver_is_a_protocol_violation() {
    let (res, transcript) = exchange("1\na\n", "read n; read q; echo $q; echo extra; echo more");
    match res {
        Err(Error::ProtocolViolation { expected, received }) => {
            assert_eq!((expected, received), (1, 3));
        }
        other => panic!("expected protocol violation, got {:?}", other),
    }
    assert_eq!(transcript, "a\n");
}
