/// TAP (Test Anything Protocol) v14 report of a suite run.
use std::io::{self, Write};

pub struct Tap {
    tests: Vec<TapTest>,
}

struct TapTest {
    ok: bool,
    desc: String,
    diagnostics: Option<String>,
}

impl Tap {
    pub fn new() -> Self {
        Tap { tests: Vec::new() }
    }

    pub fn ok(&mut self, desc: impl Into<String>) {
        self.tests.push(TapTest {
            ok: true,
            desc: desc.into(),
            diagnostics: None,
        });
    }

    pub fn not_ok(&mut self, desc: impl Into<String>, diagnostics: impl Into<String>) {
        self.tests.push(TapTest {
            ok: false,
            desc: desc.into(),
            diagnostics: Some(diagnostics.into()),
        });
    }

    pub fn failure_count(&self) -> usize {
        self.tests.iter().filter(|t| !t.ok).count()
    }

    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "TAP version 14")?;
        writeln!(out, "1..{}", self.tests.len())?;
        for (i, t) in self.tests.iter().enumerate() {
            let n = i + 1;
            if t.ok {
                writeln!(out, "ok {} - {}", n, t.desc)?;
            } else {
                writeln!(out, "not ok {} - {}", n, t.desc)?;
                if let Some(diag) = &t.diagnostics {
                    for line in diag.lines() {
                        writeln!(out, "  # {}", line)?;
                    }
                }
            }
        }
        let fail = self.failure_count();
        writeln!(out, "# tests {}", self.tests.len())?;
        writeln!(out, "# pass  {}", self.tests.len() - fail)?;
        writeln!(out, "# fail  {}", fail)?;
        Ok(())
    }

    pub fn finish(self) {
        // Nothing sensible to do if stdout is gone.
        let _ = self.write_to(&mut io::stdout().lock());
    }
}
