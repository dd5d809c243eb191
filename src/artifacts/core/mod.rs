//! Output plumbing shared by the commands

use derive_new::new;
use minus::Pager;
use std::io::{self, Write};

/// Feeds everything written to it into a `minus` pager
///
/// `log` and `global-log` write through this when paging is enabled; the
/// pager is shown once the command has finished writing.
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = std::str::from_utf8(buf)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;
        self.pager.push_str(text).map_err(io::Error::other)?;

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
