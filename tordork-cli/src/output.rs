//! Result file writing

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tordork_core::LinkSet;

/// Overwrite `path` with one link per line, in set order
pub fn write_links(path: &Path, links: &LinkSet) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for link in links {
        writeln!(writer, "{}", link)?;
    }
    writer.flush()
}
