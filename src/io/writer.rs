/*! Delimited corpus writer.

Each record is written on its own line as `[LEN\t]CONTENT\n`,
encoded with the configured [encoding_rs] encoding.
!*/
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::corpus::OutputUnit;
use crate::error::Error;

/// Serialization options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Prepend each record with its length and a tab.
    pub write_len: bool,
    /// WHATWG label of the output encoding.
    pub encoding: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            write_len: true,
            encoding: "utf-8".to_string(),
        }
    }
}

impl WriteOptions {
    /// Resolve the encoding label.
    ///
    /// Labels that [encoding_rs] can only decode (UTF-16, `replacement`...) are rejected:
    /// their encoder would silently produce UTF-8.
    pub fn resolve_encoding(&self) -> Result<&'static Encoding, Error> {
        let encoding = Encoding::for_label(self.encoding.as_bytes())
            .ok_or_else(|| Error::InvalidArgument(format!("unknown encoding: {}", self.encoding)))?;
        if encoding.output_encoding() != encoding {
            return Err(Error::InvalidArgument(format!(
                "{} is not supported as an output encoding",
                encoding.name()
            )));
        }
        Ok(encoding)
    }
}

/// Path used when none is provided: `<unix timestamp>.tsv` in the current directory.
pub fn default_path() -> PathBuf {
    let timestamp = chrono::Utc::now().timestamp();
    Path::new(".").join(format!("{}.tsv", timestamp))
}

/// Writes [OutputUnit] records into a file.
///
/// The file is created (or truncated) on construction and flushed on [CorpusWriter::finish].
/// Dropping the writer closes the file too, but errors from the last flush are then lost.
pub struct CorpusWriter {
    handle: BufWriter<File>,
    path: PathBuf,
    write_len: bool,
    encoding: &'static Encoding,
    nb_written: usize,
}

impl CorpusWriter {
    /// Create a writer on `dst`, or on [default_path] if none is provided.
    pub fn new(dst: Option<&Path>, options: &WriteOptions) -> Result<Self, Error> {
        let encoding = options.resolve_encoding()?;
        let path = dst.map_or_else(default_path, Path::to_path_buf);
        debug!("writing corpus to {:?} ({})", path, encoding.name());

        let handle = BufWriter::new(File::create(&path)?);
        Ok(Self {
            handle,
            path,
            write_len: options.write_len,
            encoding,
            nb_written: 0,
        })
    }

    fn format(&self, unit: &OutputUnit) -> String {
        let mut line = String::new();
        if self.write_len {
            line.push_str(&unit.len().to_string());
            line.push('\t');
        }
        line.push_str(&unit.content());
        line.push('\n');
        line
    }

    /// Write a single record.
    ///
    /// Fails with [Error::Encoding] if the record is not representable in the output encoding,
    /// in which case nothing is written.
    pub fn write_single(&mut self, unit: &OutputUnit) -> Result<(), Error> {
        let line = self.format(unit);
        if self.encoding == UTF_8 {
            self.handle.write_all(line.as_bytes())?;
        } else {
            let (bytes, _, unmappable) = self.encoding.encode(&line);
            if unmappable {
                return Err(Error::Encoding(format!(
                    "record {} is not representable in {}",
                    self.nb_written,
                    self.encoding.name()
                )));
            }
            self.handle.write_all(&bytes)?;
        }
        self.nb_written += 1;
        Ok(())
    }

    /// Write every record of `units`, consuming them.
    pub fn write<I>(&mut self, units: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = OutputUnit>,
    {
        for unit in units {
            self.write_single(&unit)?;
        }
        Ok(())
    }

    pub fn nb_written(&self) -> usize {
        self.nb_written
    }

    /// Flush and close the file, returning its path.
    pub fn finish(mut self) -> Result<PathBuf, Error> {
        self.handle.flush()?;
        debug!("wrote {} records to {:?}", self.nb_written, self.path);
        Ok(self.path)
    }
}

/// Write `units` into `dst` (or [default_path]), returning the path of the written file.
pub fn write_delimited<I>(units: I, dst: Option<&Path>, options: &WriteOptions) -> Result<PathBuf, Error>
where
    I: IntoIterator<Item = OutputUnit>,
{
    let mut writer = CorpusWriter::new(dst, options)?;
    writer.write(units)?;
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units() -> Vec<OutputUnit> {
        vec![
            OutputUnit::Ngram(vec!["hello".to_string(), "world".to_string()]),
            OutputUnit::Paragraph("Café au lait.".to_string()),
        ]
    }

    #[test]
    fn with_len() {
        let dst = tempfile::tempdir().unwrap();
        let path = dst.path().join("corpus.tsv");
        let written = write_delimited(units(), Some(path.as_path()), &WriteOptions::default()).unwrap();
        assert_eq!(written, path);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "2\thello world\n3\tCafé au lait.\n");
    }

    #[test]
    fn without_len() {
        let dst = tempfile::tempdir().unwrap();
        let path = dst.path().join("corpus.tsv");
        let options = WriteOptions {
            write_len: false,
            ..Default::default()
        };
        write_delimited(units(), Some(path.as_path()), &options).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "hello world\nCafé au lait.\n");
    }

    #[test]
    fn other_encoding() {
        let dst = tempfile::tempdir().unwrap();
        let path = dst.path().join("corpus.tsv");
        let options = WriteOptions {
            write_len: false,
            encoding: "latin1".to_string(),
        };
        write_delimited(units(), Some(path.as_path()), &options).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes, b"hello world\nCaf\xe9 au lait.\n".to_vec());
    }

    #[test]
    fn unknown_encoding() {
        let dst = tempfile::tempdir().unwrap();
        let path = dst.path().join("corpus.tsv");
        let options = WriteOptions {
            write_len: true,
            encoding: "klingon".to_string(),
        };
        let res = write_delimited(units(), Some(path.as_path()), &options);
        assert!(matches!(res, Err(Error::InvalidArgument(_))));
        assert!(!path.exists());
    }

    #[test]
    fn decode_only_encoding() {
        let dst = tempfile::tempdir().unwrap();
        let path = dst.path().join("corpus.tsv");
        for label in ["utf-16", "utf-16be", "replacement"] {
            let options = WriteOptions {
                write_len: false,
                encoding: label.to_string(),
            };
            assert!(matches!(
                options.resolve_encoding(),
                Err(Error::InvalidArgument(_))
            ));
            let res = write_delimited(
                vec![OutputUnit::Paragraph("hi".to_string())],
                Some(path.as_path()),
                &options,
            );
            assert!(matches!(res, Err(Error::InvalidArgument(_))));
            assert!(!path.exists());
        }
    }

    #[test]
    fn unmappable_record() {
        let dst = tempfile::tempdir().unwrap();
        let path = dst.path().join("corpus.tsv");
        let options = WriteOptions {
            write_len: true,
            encoding: "latin1".to_string(),
        };
        let mut writer = CorpusWriter::new(Some(path.as_path()), &options).unwrap();
        writer
            .write_single(&OutputUnit::Paragraph("Paris city".to_string()))
            .unwrap();
        let res = writer.write_single(&OutputUnit::Paragraph("Москва city".to_string()));
        assert!(matches!(res, Err(Error::Encoding(_))));
        assert_eq!(writer.nb_written(), 1);
        writer.finish().unwrap();

        // no character reference made it to the file
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes, b"2\tParis city\n".to_vec());
    }

    #[test]
    fn unwritable_destination() {
        let dst = tempfile::tempdir().unwrap();
        let path = dst.path().join("missing_dir").join("corpus.tsv");
        let res = write_delimited(units(), Some(path.as_path()), &WriteOptions::default());
        assert!(matches!(res, Err(Error::Io(_))));
    }

    #[test]
    fn default_path_is_timestamped() {
        let path = default_path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with(".tsv"));
        assert!(name.trim_end_matches(".tsv").parse::<i64>().is_ok());
    }
}
