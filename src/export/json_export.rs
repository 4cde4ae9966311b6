use crate::error::ExportError;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};

pub fn write_json<W: Write, T: Serialize + ?Sized>(mut out: W, value: &T) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

pub fn export_to_json<T: Serialize + ?Sized>(value: &T, path: &str) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_json(BufWriter::new(file), value)
}
