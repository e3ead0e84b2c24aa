use anyhow::Context;
use formatx::formatx;
use std::fmt::Debug;
use std::fs::{create_dir_all, File};
use std::io;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Destination for the report files an audit produces. Each report asks for a
/// writer under a location key ("model_accuracy", "heat_transfer_breakdown"
/// and so on) and the implementation decides where that lands.
pub trait Output: Debug {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write>;
    /// Whether this output can be considered a no-op and therefore that any code that only writes to the output can be skipped.
    fn is_noop(&self) -> bool {
        false
    }
}

/// Writes each location key to its own file in a directory, named through a
/// template with a `{}` placeholder (for example `audit_{}.csv`). The
/// directory is created on first use.
#[derive(Debug)]
pub struct FileOutput {
    directory_path: PathBuf,
    file_template: String,
}

impl FileOutput {
    pub fn new(directory_path: PathBuf, file_template: String) -> Self {
        Self {
            directory_path,
            file_template,
        }
    }
}

impl Output for FileOutput {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write> {
        let file_name = formatx!(&self.file_template, location_key)
            .with_context(|| format!("applying file template {:?}", self.file_template))?;
        create_dir_all(&self.directory_path).with_context(|| {
            format!(
                "creating output directory {}",
                self.directory_path.display()
            )
        })?;
        let path = self.directory_path.join(file_name);
        let file = File::create(&path)
            .with_context(|| format!("creating report file {}", path.display()))?;
        Ok(BufWriter::new(file))
    }
}

/// An output that goes to nowhere/ a "sink"/ /dev/null.
#[derive(Debug, Default)]
pub struct SinkOutput;

impl Output for SinkOutput {
    fn writer_for_location_key(&self, _location_key: &str) -> anyhow::Result<impl Write> {
        Ok(io::sink())
    }

    fn is_noop(&self) -> bool {
        true
    }
}
