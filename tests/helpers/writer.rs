use std::io;

/// An `io::Write` sink that collects output and can be told to fail.
///
/// With a budget every call to `write` spends one unit, once it is spent
/// the next call fails with `AddrInUse` so tests can tell the error apart.
#[derive(Debug, Default)]
pub struct Writer {
    out: Vec<u8>,
    budget: Option<usize>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max(writes: usize) -> Self {
        Self {
            out: Vec::new(),
            budget: Some(writes),
        }
    }

    #[track_caller]
    pub fn into_string(self) -> String {
        String::from_utf8(self.out).expect("spliced output is UTF-8")
    }
}

impl io::Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(budget) = &mut self.budget {
            *budget = budget
                .checked_sub(1)
                .ok_or_else(|| io::Error::from(io::ErrorKind::AddrInUse))?;
        }
        self.out.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
