use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

///
/// Get a reader for either a gzip'd or non-gzip'd file, decided by the
/// `.gz` extension.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> std::io::Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{BufRead, Write};

    #[test]
    fn reads_plain_and_gzipped_files() {
        let mut plain = tempfile::NamedTempFile::new().unwrap();
        plain.write_all(b"chr1\t0\t10\t5\n").unwrap();

        let reader = get_dynamic_reader(plain.path()).unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["chr1\t0\t10\t5"]);

        let gz = tempfile::Builder::new().suffix(".bed.gz").tempfile().unwrap();
        {
            let mut encoder = flate2::write::GzEncoder::new(
                File::create(gz.path()).unwrap(),
                flate2::Compression::default(),
            );
            encoder.write_all(b"chr1\t0\t10\t5\n").unwrap();
            encoder.finish().unwrap();
        }

        let reader = get_dynamic_reader(gz.path()).unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["chr1\t0\t10\t5"]);
    }

}
