use crate::commands::load_catalog;
use crate::error::CliResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

pub fn execute(manifest: PathBuf, out: PathBuf) -> CliResult<()> {
    let catalog = load_catalog(&manifest)?;

    if out.exists() {
        println!(
            "Output file already exists and will be overwritten: {}",
            out.display()
        );
    }

    let mut writer = BufWriter::new(File::create(&out)?);
    serde_json::to_writer_pretty(&mut writer, catalog.all_entries())?;
    writer.flush()?;

    println!("✅ Exported {} entries to {}", catalog.len(), out.display());
    Ok(())
}
