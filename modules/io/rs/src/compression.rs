use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use eyre::{ensure, Context, Result};
use flate2::read::MultiGzDecoder;

/// Compression of the input stream. Chosen explicitly by the caller or derived from the file
/// extension, the content is never sniffed.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Compression {
    #[default]
    Plain,
    Gzip,
}

impl Compression {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| match ext.to_ascii_lowercase().as_str() {
                "gz" | "gzip" | "bgz" => Compression::Gzip,
                _ => Compression::Plain,
            })
            .unwrap_or(Compression::Plain)
    }

    /// Wrap a raw byte stream into a buffered, decompressed one.
    pub fn decode(
        self,
        stream: impl Read + Send + 'static,
    ) -> Box<dyn BufRead + Send + 'static> {
        match self {
            Compression::Plain => Box::new(BufReader::new(stream)),
            // BGZF files are valid multi-member gzip streams
            Compression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(stream))),
        }
    }

    pub fn open(self, path: impl AsRef<Path>) -> Result<Box<dyn BufRead + Send + 'static>> {
        let path = path.as_ref();
        ensure!(path.exists(), "File {} does not exist", path.display());

        let file =
            File::open(path).wrap_err_with(|| format!("Failed to open {}", path.display()))?;
        Ok(self.decode(file))
    }
}
