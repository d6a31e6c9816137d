mod seed;
mod state;

use std::io::{self, BufWriter, ErrorKind, Write};
use crate::seed::OsSeedSource;
use crate::state::Pcg32;

// Seed once, report the seed on stderr, then print forever
fn main() -> io::Result<()> {
    let rng = Pcg32::from_source(&mut OsSeedSource::new());
    rng.write_report(&mut io::stderr().lock())?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    emit(rng, &mut out)
}

// A closed pipe on the reading end is how this normally stops
fn emit<W: Write>(values: impl IntoIterator<Item = u32>, out: &mut W) -> io::Result<()> {
    let result = values
        .into_iter()
        .try_for_each(|v| writeln!(out, "0x{:08x}", v))
        .and_then(|_| out.flush());

    match result {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_hex_line(line: &str) -> bool {
        line.len() == 10
            && line.starts_with("0x")
            && line[2..].bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    #[test]
    fn emits_fixed_width_lowercase() {
        let mut out = Vec::new();
        emit([0, 0xa, 0xdeadbeef, u32::MAX], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0x00000000\n0x0000000a\n0xdeadbeef\n0xffffffff\n"
        );
    }

    #[test]
    fn generator_lines_match_format() {
        let rng = Pcg32::new(0x853c49e6748fea9b, 0xda3e39cb94b95bb5);
        let mut out = Vec::new();
        emit(rng.take(4096), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 4096);
        assert!(text.lines().all(is_hex_line));
        assert!(text.starts_with("0x152ca78d\n0x027c6003\n"));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn broken_pipe_ends_cleanly() {
        let rng = Pcg32::new(1, 1);
        assert!(emit(rng, &mut ClosedPipe).is_ok());
    }

    struct Full;

    impl Write for Full {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn other_errors_propagate() {
        let rng = Pcg32::new(1, 1);
        let err = emit(rng, &mut Full).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
