use std::io::{self, BufRead, ErrorKind, Write};

use super::{
    error::{Error, Result, SOLVER_INPUT, SOLVER_OUTPUT},
    lines::{read_line, TestCase},
};

/// A two-way line channel to a peer process.
///
/// `send` writes and flushes in one step, so nothing is left sitting in a
/// buffer when the caller goes on to block in `recv`.
#[derive(Debug)]
pub struct LineChannel<R, W> {
    reader: R,
    writer: Option<W>,
}

impl<R: BufRead, W: Write> LineChannel<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer: Some(writer),
        }
    }

    /// Fails with `BrokenPipe` once the channel is closed.
    pub fn send(&mut self, line: &str) -> io::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::from(ErrorKind::BrokenPipe))?;
        writeln!(writer, "{}", line)?;
        writer.flush()
    }

    /// Blocks until the peer sends a line. `None` means the peer closed its end.
    pub fn recv(&mut self) -> io::Result<Option<String>> {
        read_line(&mut self.reader)
    }

    /// Drops the writing half so the peer sees end of input.
    pub fn close(&mut self) {
        self.writer = None;
    }

    /// Reads until the peer closes its end, returning how many lines were left.
    /// Lines are counted as raw bytes, so unreadable text still counts.
    pub fn drain(&mut self) -> io::Result<usize> {
        let mut count = 0;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if self.reader.read_until(b'\n', &mut buf)? == 0 {
                return Ok(count);
            }
            count += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeSummary {
    pub rounds: usize,
}

/// Replays a query script to the solver, one query and one response at a time,
/// and records every response in the transcript.
///
/// After the last response the solver's input is closed and whatever it still
/// prints is counted: any leftover line is a protocol violation.
pub struct Communicator<R, W> {
    solver: LineChannel<R, W>,
}

impl<R: BufRead, W: Write> Communicator<R, W> {
    /// `solver_output` is what the solver prints, `solver_input` is its stdin.
    pub fn new(solver_output: R, solver_input: W) -> Self {
        Self {
            solver: LineChannel::new(solver_output, solver_input),
        }
    }

    pub fn run(
        &mut self,
        script: &TestCase,
        transcript: &mut impl Write,
    ) -> Result<ExchangeSummary> {
        let expected = script.declared_line_count();
        let violation = |received| Error::ProtocolViolation { expected, received };

        log::debug!("Announcing {} queries to the solver", expected);
        self.send(&expected.to_string())
            .map_err(|e| e.or_violation(violation(0)))?;

        for (round, query) in script.lines().iter().enumerate() {
            self.send(query)
                .map_err(|e| e.or_violation(violation(round)))?;

            let Some(response) = self
                .solver
                .recv()
                .map_err(|e| Error::Io(SOLVER_OUTPUT, e))?
            else {
                log::warn!("Solver closed its output after {} of {} responses", round, expected);
                return Err(violation(round));
            };
            log::trace!("#{}: {:?} -> {:?}", round + 1, query, response);

            writeln!(transcript, "{}", response).map_err(|e| Error::Io("transcript", e))?;
        }
        transcript.flush().map_err(|e| Error::Io("transcript", e))?;

        self.solver.close();
        let extra = self
            .solver
            .drain()
            .map_err(|e| Error::Io(SOLVER_OUTPUT, e))?;
        if extra > 0 {
            log::warn!("Solver sent {} line(s) nobody asked for", extra);
            return Err(violation(expected + extra));
        }

        Ok(ExchangeSummary { rounds: expected })
    }

    fn send(&mut self, line: &str) -> std::result::Result<(), SendError> {
        self.solver.send(line).map_err(SendError)
    }
}

struct SendError(io::Error);

impl SendError {
    /// A broken pipe means the solver is gone before the exchange finished.
    fn or_violation(self, violation: Error) -> Error {
        match self.0.kind() {
            ErrorKind::BrokenPipe => violation,
            _ => Error::Io(SOLVER_INPUT, self.0),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    /// Counts flushes so tests can see how many handoffs happened.
    #[derive(Default)]
    struct FlushCounter {
        buf: Vec<u8>,
        flushes: usize,
    }

    impl Write for FlushCounter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn script(src: &str) -> TestCase {
        TestCase::parse(&mut Cursor::new(src)).unwrap()
    }

    #[test]
    fn echo_solver_transcript() {
        let mut sent = FlushCounter::default();
        let mut transcript = Vec::new();
        let mut comm = Communicator::new(Cursor::new("q1\nq2\n"), &mut sent);

        let summary = comm.run(&script("2\nq1\nq2\n"), &mut transcript).unwrap();
        drop(comm);
        assert_eq!(summary.rounds, 2);
        assert_eq!(String::from_utf8(transcript).unwrap(), "q1\nq2\n");

        assert_eq!(String::from_utf8(sent.buf).unwrap(), "2\nq1\nq2\n");
        // announcement + one per query
        assert_eq!(sent.flushes, 3);
    }

    #[test]
    fn transcript_keeps_responses_verbatim() {
        let mut comm = Communicator::new(Cursor::new("yes \n\nNO\n"), Vec::new());
        let mut transcript = Vec::new();
        comm.run(&script("3\na\nb\nc\n"), &mut transcript).unwrap();
        assert_eq!(String::from_utf8(transcript).unwrap(), "yes \n\nNO\n");
    }

    #[test]
    fn early_eof_is_protocol_violation() {
        let mut comm = Communicator::new(Cursor::new("only-one\n"), Vec::new());
        let mut transcript = Vec::new();
        let err = comm
            .run(&script("3\na\nb\nc\n"), &mut transcript)
            .unwrap_err();
        assert!(err.is_protocol_violation());
        assert!(matches!(
            err,
            Error::ProtocolViolation {
                expected: 3,
                received: 1
            }
        ));
    }

    #[test]
    fn broken_pipe_is_protocol_violation() {
        let mut comm = Communicator::new(Cursor::new(""), ClosedPipe);
        let err = comm.run(&script("1\na\n"), &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::ProtocolViolation {
                expected: 1,
                received: 0
            }
        ));
    }

    #[test]
    fn unsolicited_lines_are_protocol_violation() {
        let mut comm = Communicator::new(Cursor::new("A\nEXTRA\nMORE\n"), Vec::new());
        let mut transcript = Vec::new();
        let err = comm.run(&script("1\na\n"), &mut transcript).unwrap_err();
        assert!(matches!(
            err,
            Error::ProtocolViolation {
                expected: 1,
                received: 3
            }
        ));
        // The answered rounds are still recorded.
        assert_eq!(transcript, b"A\n");
    }

    #[test]
    fn unreadable_response_is_a_solver_fault() {
        let mut comm = Communicator::new(Cursor::new(b"\xff\n".to_vec()), Vec::new());
        let err = comm.run(&script("1\na\n"), &mut Vec::new()).unwrap_err();
        assert!(err.is_solver_fault(), "{:?}", err);
        assert!(!err.is_protocol_violation());
    }

    #[test]
    fn empty_script_only_announces() {
        let mut sent = Vec::new();
        let mut transcript = Vec::new();
        let summary = Communicator::new(Cursor::new(""), &mut sent)
            .run(&script("0\n"), &mut transcript)
            .unwrap();
        assert_eq!(summary.rounds, 0);
        assert!(transcript.is_empty());
        assert_eq!(sent, b"0\n");

        let err = Communicator::new(Cursor::new("unsolicited\n"), Vec::new())
            .run(&script("0\n"), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ProtocolViolation {
                expected: 0,
                received: 1
            }
        ));
    }

    #[test]
    fn send_after_close_is_a_broken_pipe() {
        let mut channel = LineChannel::new(Cursor::new(""), Vec::new());
        channel.send("x").unwrap();
        channel.close();
        let err = channel.send("y").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BrokenPipe);
    }
}
