//! Byte sources: random access to the bytes of an in-memory buffer, a local file,
//! or (with the `http` feature) a remote file served with HTTP range requests.

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::io::SeekFrom;
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::{error::TwoBitError, traits::ByteSource};

/// A half-open byte range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Formats as an HTTP `Range` header value; the end is inclusive there.
impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "bytes={}-{}", self.start, self.end.saturating_sub(1))
    }
}

/// An in-memory byte source.
#[derive(Clone, Debug)]
pub struct MemorySource {
    data: Bytes,
}

impl MemorySource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

#[async_trait]
impl ByteSource for MemorySource {
    async fn read_range(&self, range: ByteRange) -> Result<Bytes, TwoBitError> {
        let len = self.data.len() as u64;
        let start = range.start.min(len) as usize;
        let end = range.end.min(len).max(range.start.min(len)) as usize;
        Ok(self.data.slice(start..end))
    }

    fn describe(&self) -> String {
        format!("<memory: {} bytes>", self.data.len())
    }
}

/// A local file. Each read opens its own handle, so concurrent reads never contend
/// over a shared seek position.
#[derive(Clone, Debug)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ByteSource for LocalFile {
    async fn read_range(&self, range: ByteRange) -> Result<Bytes, TwoBitError> {
        let mut file = tokio::fs::File::open(&self.path).await?;
        file.seek(SeekFrom::Start(range.start)).await?;
        let mut buf = Vec::new();
        file.take(range.len()).read_to_end(&mut buf).await?;
        Ok(Bytes::from(buf))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(feature = "http")]
pub use http::HttpSource;

#[cfg(feature = "http")]
mod http {
    use async_trait::async_trait;
    use bytes::Bytes;
    use reqwest::{header::RANGE, Client, StatusCode};

    use super::ByteRange;
    use crate::{error::TwoBitError, traits::ByteSource};

    /// A remote file read with HTTP range requests. The server must answer with
    /// `206 Partial Content`.
    #[derive(Clone, Debug)]
    pub struct HttpSource {
        client: Client,
        url: String,
    }

    impl HttpSource {
        pub fn new(url: impl Into<String>) -> Self {
            Self::with_client(Client::new(), url)
        }

        /// Use an existing [`Client`], e.g. to share its connection pool.
        pub fn with_client(client: Client, url: impl Into<String>) -> Self {
            Self {
                client,
                url: url.into(),
            }
        }
    }

    /// How a range request's response status is read.
    #[derive(Debug, PartialEq, Eq)]
    pub(super) enum RangeStatus {
        /// The body holds the requested bytes.
        Partial,
        /// The whole range lies past the end of the file.
        PastEnd,
    }

    pub(super) fn check_status(status: StatusCode, url: &str) -> Result<RangeStatus, TwoBitError> {
        match status {
            StatusCode::PARTIAL_CONTENT => Ok(RangeStatus::Partial),
            StatusCode::RANGE_NOT_SATISFIABLE => Ok(RangeStatus::PastEnd),
            StatusCode::OK => Err(TwoBitError::Network(format!(
                "server does not support range requests (returned 200 instead of 206): {}",
                url
            ))),
            status if !status.is_success() => Err(TwoBitError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            }),
            _ => Ok(RangeStatus::Partial),
        }
    }

    pub(super) fn check_body_len(range: ByteRange, len: usize) -> Result<(), TwoBitError> {
        if len as u64 > range.len() {
            return Err(TwoBitError::Network(format!(
                "server returned more data than requested: expected {} bytes, got {} bytes",
                range.len(),
                len
            )));
        }
        Ok(())
    }

    #[async_trait]
    impl ByteSource for HttpSource {
        async fn read_range(&self, range: ByteRange) -> Result<Bytes, TwoBitError> {
            if range.is_empty() {
                return Ok(Bytes::new());
            }
            let response = self
                .client
                .get(&self.url)
                .header(RANGE, range.to_string())
                .send()
                .await
                .map_err(|e| TwoBitError::Network(e.to_string()))?;

            if check_status(response.status(), &self.url)? == RangeStatus::PastEnd {
                return Ok(Bytes::new());
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|e| TwoBitError::Network(e.to_string()))?;
            check_body_len(range, bytes.len())?;
            Ok(bytes)
        }

        fn describe(&self) -> String {
            self.url.clone()
        }
    }
}

/// Whether `location` names a remote resource.
pub fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Open a [`ByteSource`] for `location`: an HTTP(S) URL (requires the `http` feature)
/// or a local path.
pub fn open_source(location: &str) -> Result<Box<dyn ByteSource>, TwoBitError> {
    if is_url(location) {
        #[cfg(feature = "http")]
        return Ok(Box::new(HttpSource::new(location)));
        #[cfg(not(feature = "http"))]
        return Err(TwoBitError::Network(format!(
            "cannot open '{}': built without the `http` feature",
            location
        )));
    }
    Ok(Box::new(LocalFile::new(location)))
}

#[async_trait]
impl ByteSource for Box<dyn ByteSource> {
    async fn read_range(&self, range: ByteRange) -> Result<Bytes, TwoBitError> {
        (**self).read_range(range).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::test_utilities::temp_file;

    #[test]
    fn test_byte_range() {
        let range = ByteRange::new(10, 20);
        assert_eq!(range.len(), 10);
        assert_eq!(range.to_string(), "bytes=10-19");
        assert!(ByteRange::new(5, 5).is_empty());
    }

    #[tokio::test]
    async fn test_memory_source_short_reads() {
        let source = MemorySource::new(b"0123456789".to_vec());
        let middle = source.read_range(ByteRange::new(2, 5)).await.unwrap();
        assert_eq!(middle, Bytes::from_static(b"234"));
        let tail = source.read_range(ByteRange::new(8, 20)).await.unwrap();
        assert_eq!(tail, Bytes::from_static(b"89"));
        let past_end = source.read_range(ByteRange::new(30, 40)).await.unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_local_file_matches_memory() {
        let data: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
        let mut file = temp_file();
        file.write_all(&data).unwrap();
        file.flush().unwrap();

        let local = LocalFile::new(file.path());
        let memory = MemorySource::new(data);
        for (start, end) in [(0, 16), (100, 4200), (4990, 5010), (6000, 6001)] {
            let range = ByteRange::new(start, end);
            assert_eq!(
                local.read_range(range).await.unwrap(),
                memory.read_range(range).await.unwrap(),
                "{}",
                range
            );
        }
    }

    #[tokio::test]
    async fn test_local_file_missing() {
        let source = LocalFile::new("definitely/not/here.2bit");
        assert!(matches!(
            source.read_range(ByteRange::new(0, 4)).await,
            Err(TwoBitError::IOError(_))
        ));
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://hgdownload.soe.ucsc.edu/goldenPath/hg38/bigZips/hg38.2bit"));
        assert!(!is_url("tests_data/test.2bit"));
        assert_eq!(
            open_source("tests_data/test.2bit").unwrap().describe(),
            "tests_data/test.2bit"
        );
    }

    #[cfg(feature = "http")]
    mod http {
        use reqwest::StatusCode;

        use super::super::http::{check_body_len, check_status, RangeStatus};
        use super::super::{is_url, open_source, ByteRange};
        use crate::error::TwoBitError;

        const URL: &str = "https://example.org/hg38.2bit";

        #[test]
        fn test_open_source_url() {
            let source = open_source(URL).unwrap();
            assert!(is_url(URL));
            assert_eq!(source.describe(), URL);
        }

        #[test]
        fn test_check_status() {
            assert_eq!(
                check_status(StatusCode::PARTIAL_CONTENT, URL).unwrap(),
                RangeStatus::Partial
            );
            assert_eq!(
                check_status(StatusCode::RANGE_NOT_SATISFIABLE, URL).unwrap(),
                RangeStatus::PastEnd
            );
            assert!(matches!(
                check_status(StatusCode::OK, URL),
                Err(TwoBitError::Network(msg)) if msg.contains("200 instead of 206")
            ));
            assert!(matches!(
                check_status(StatusCode::NOT_FOUND, URL),
                Err(TwoBitError::Http { status: 404, url }) if url == URL
            ));
            assert!(matches!(
                check_status(StatusCode::INTERNAL_SERVER_ERROR, URL),
                Err(TwoBitError::Http { status: 500, .. })
            ));
        }

        #[test]
        fn test_check_body_len() {
            let range = ByteRange::new(100, 110);
            assert!(check_body_len(range, 10).is_ok());
            // short reads happen at the end of the file
            assert!(check_body_len(range, 3).is_ok());
            assert!(matches!(
                check_body_len(range, 11),
                Err(TwoBitError::Network(_))
            ));
        }
    }
}
