use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

/// Compresses a byte slice using gzip at the best compression level.
pub fn compress(input: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(input.len() / 4), Compression::best());
    encoder.write_all(input)?;
    encoder.finish()
}

/// Decompress gzip-compressed data as a string.
#[cfg(test)]
pub(crate) fn decompress_to_string(compressed: &[u8]) -> std::io::Result<String> {
    use std::io::Read;

    use flate2::read::GzDecoder;

    let mut decoder = GzDecoder::new(compressed);
    let mut decompressed = String::new();
    decoder.read_to_string(&mut decompressed)?;
    Ok(decompressed)
}

/// The path of the compressed file: `<path>.gz`, or `path` itself if it already ends in `.gz`.
pub fn gzip_path(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz")) {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_compress_roundtrip() {
        let input = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset/>\n";
        let compressed = compress(input.as_bytes()).unwrap();
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);
        let decompressed = decompress_to_string(&compressed).unwrap();
        assert_eq!(input, decompressed);
    }

    #[test]
    fn test_gzip_path() {
        assert_eq!(gzip_path(Path::new("public/sitemap.xml")), PathBuf::from("public/sitemap.xml.gz"));
        assert_eq!(gzip_path(Path::new("public/sitemap.xml.gz")), PathBuf::from("public/sitemap.xml.gz"));
    }
}
