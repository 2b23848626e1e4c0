//! JSON-lines output backend: `states.jsonl`, one [`SimulationState`] per
//! line in the same shape `current_state` serializes to.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use wh_sim::SimulationState;

use crate::writer::OutputWriter;
use crate::{OutputResult, TickSummaryRow};

pub struct JsonLinesWriter {
    out:      BufWriter<File>,
    lines:    u64,
    finished: bool,
}

impl JsonLinesWriter {
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let file = File::create(dir.join("states.jsonl"))?;
        Ok(Self { out: BufWriter::new(file), lines: 0, finished: false })
    }

    /// States written so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }
}

impl OutputWriter for JsonLinesWriter {
    fn write_state(&mut self, state: &SimulationState) -> OutputResult<()> {
        serde_json::to_writer(&mut self.out, state)?;
        self.out.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    /// Tick summaries are not part of the state stream.
    fn write_tick_summary(&mut self, _row: &TickSummaryRow) -> OutputResult<()> {
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        log::debug!("wrote {} states", self.lines);
        Ok(())
    }
}
