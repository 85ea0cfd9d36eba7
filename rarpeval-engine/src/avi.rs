//! Frame counts of raw recordings
//!
//! The reference recordings are AVI (RIFF) containers. The frame count is read
//! from the header list without decoding any video data: the OpenDML `dmlh`
//! total wins when present, then the length of the first video stream header,
//! then the main `avih` header total.

use crate::error::ArtifactError;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Largest header list accepted; real `hdrl` lists are a few KiB
const MAX_HEADER_LIST: u32 = 16 * 1024 * 1024;

/// Source of a recording's total frame count
pub trait FrameCounter: Send + Sync {
    /// Total number of frames in the recording at `path`
    fn frame_count(&self, path: &Path) -> Result<u64, ArtifactError>;
}

/// Reads frame counts from AVI headers
#[derive(Debug, Default, Clone, Copy)]
pub struct AviHeaderCounter;

impl FrameCounter for AviHeaderCounter {
    fn frame_count(&self, path: &Path) -> Result<u64, ArtifactError> {
        let file = File::open(path).map_err(|e| ArtifactError::io(path, e))?;
        let mut reader = BufReader::new(file);
        read_frame_count(&mut reader).map_err(|reason| match reason {
            HeaderError::Io(e) => ArtifactError::io(path, e),
            HeaderError::Format(reason) => ArtifactError::UnsupportedVideo {
                path: path.to_path_buf(),
                reason,
            },
        })
    }
}

enum HeaderError {
    Io(std::io::Error),
    Format(String),
}

impl From<std::io::Error> for HeaderError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            HeaderError::Format("truncated header".to_string())
        } else {
            HeaderError::Io(e)
        }
    }
}

fn read_fourcc<R: Read>(reader: &mut R) -> Result<[u8; 4], HeaderError> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32, HeaderError> {
    Ok(u32::from_le_bytes(read_fourcc(reader)?))
}

fn read_frame_count<R: Read + Seek>(reader: &mut R) -> Result<u64, HeaderError> {
    if &read_fourcc(reader)? != b"RIFF" {
        return Err(HeaderError::Format("not a RIFF file".to_string()));
    }
    let _riff_size = read_u32(reader)?;
    if &read_fourcc(reader)? != b"AVI " {
        return Err(HeaderError::Format("RIFF form is not AVI".to_string()));
    }

    // the header list precedes the movie data
    loop {
        let id = read_fourcc(reader)?;
        let size = read_u32(reader)?;
        if &id == b"LIST" {
            let list_type = read_fourcc(reader)?;
            if &list_type == b"hdrl" {
                if size > MAX_HEADER_LIST {
                    return Err(HeaderError::Format(format!("header list of {size} bytes")));
                }
                let mut body = vec![0u8; size.saturating_sub(4) as usize];
                reader.read_exact(&mut body)?;
                let mut totals = HeaderTotals::default();
                scan_chunks(&body, &mut totals);
                return totals.best().ok_or_else(|| {
                    HeaderError::Format("no frame count in header list".to_string())
                });
            }
            if &list_type == b"movi" {
                break;
            }
            skip(reader, padded(size).saturating_sub(4))?;
        } else {
            skip(reader, padded(size))?;
        }
    }

    Err(HeaderError::Format("movie data precedes the header list".to_string()))
}

fn padded(size: u32) -> u64 {
    u64::from(size) + u64::from(size & 1)
}

fn skip<R: Seek>(reader: &mut R, bytes: u64) -> Result<(), HeaderError> {
    let offset =
        i64::try_from(bytes).map_err(|_| HeaderError::Format("chunk too large".to_string()))?;
    reader.seek(SeekFrom::Current(offset))?;
    Ok(())
}

#[derive(Default)]
struct HeaderTotals {
    main: Option<u32>,
    video_stream: Option<u32>,
    open_dml: Option<u32>,
}

impl HeaderTotals {
    fn best(&self) -> Option<u64> {
        self.open_dml
            .or(self.video_stream)
            .or(self.main)
            .map(u64::from)
    }
}

fn le_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let slice = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

/// Walk the chunks of an in-memory list body
fn scan_chunks(mut body: &[u8], totals: &mut HeaderTotals) {
    while body.len() >= 8 {
        let id = &body[0..4];
        let size = le_u32(body, 4).unwrap_or(0) as usize;
        let end = (8 + size).min(body.len());
        let data = &body[8..end];

        match id {
            b"LIST" if data.len() >= 4 => scan_chunks(&data[4..], totals),
            // dwTotalFrames follows four 32-bit fields
            b"avih" => totals.main = totals.main.or(le_u32(data, 16)),
            // fccType, fccHandler, dwFlags, two words, then 5 dwords up to dwLength
            b"strh" if data.get(0..4) == Some(b"vids".as_slice()) => {
                totals.video_stream = totals.video_stream.or(le_u32(data, 32));
            }
            b"dmlh" => totals.open_dml = totals.open_dml.or(le_u32(data, 0)),
            _ => {}
        }

        let next = (8 + size + (size & 1)).min(body.len());
        body = &body[next..];
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    fn chunk(id: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = id.to_vec();
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(data);
        if data.len() % 2 == 1 {
            out.push(0);
        }
        out
    }

    fn list(list_type: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
        let mut data = list_type.to_vec();
        for child in children {
            data.extend_from_slice(child);
        }
        chunk(b"LIST", &data)
    }

    fn avih(total_frames: u32) -> Vec<u8> {
        let mut data = vec![0u8; 56];
        data[16..20].copy_from_slice(&total_frames.to_le_bytes());
        chunk(b"avih", &data)
    }

    fn strh(kind: &[u8; 4], length: u32) -> Vec<u8> {
        let mut data = vec![0u8; 56];
        data[0..4].copy_from_slice(kind);
        data[32..36].copy_from_slice(&length.to_le_bytes());
        chunk(b"strh", &data)
    }

    fn riff(children: &[Vec<u8>]) -> Vec<u8> {
        let mut body = b"AVI ".to_vec();
        for child in children {
            body.extend_from_slice(child);
        }
        let mut out = b"RIFF".to_vec();
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(&body);
        out
    }

    /// Minimal AVI container whose headers announce `total_frames`
    pub(crate) fn minimal_avi(total_frames: u32) -> Vec<u8> {
        riff(&[
            list(b"hdrl", &[avih(total_frames), list(b"strl", &[strh(b"vids", total_frames)])]),
            list(b"movi", &[]),
        ])
    }

    fn count(bytes: Vec<u8>) -> Result<u64, HeaderError> {
        read_frame_count(&mut Cursor::new(bytes))
    }

    #[test]
    fn test_main_header_total() {
        let bytes = riff(&[list(b"hdrl", &[avih(600)]), list(b"movi", &[])]);
        assert!(matches!(count(bytes), Ok(600)));
    }

    #[test]
    fn test_video_stream_length_preferred() {
        let bytes = riff(&[list(
            b"hdrl",
            &[avih(500), list(b"strl", &[strh(b"auds", 9)]), list(b"strl", &[strh(b"vids", 610)])],
        )]);
        assert!(matches!(count(bytes), Ok(610)));
    }

    #[test]
    fn test_open_dml_total_wins() {
        let dmlh = chunk(b"dmlh", &[0x40, 0x9c, 0, 0, 0, 0, 0, 0]);
        let bytes = riff(&[list(
            b"hdrl",
            &[avih(100), list(b"strl", &[strh(b"vids", 100)]), list(b"odml", &[dmlh])],
        )]);
        assert!(matches!(count(bytes), Ok(40_000)));
    }

    #[test]
    fn test_leading_junk_chunk_skipped() {
        let bytes = riff(&[chunk(b"JUNK", &[0; 7]), list(b"hdrl", &[avih(42)])]);
        assert!(matches!(count(bytes), Ok(42)));
    }

    #[test]
    fn test_not_riff() {
        assert!(matches!(count(b"GIF89a......".to_vec()), Err(HeaderError::Format(_))));
    }

    #[test]
    fn test_truncated() {
        let mut bytes = minimal_avi(10);
        bytes.truncate(30);
        assert!(matches!(count(bytes), Err(HeaderError::Format(_))));
    }

    #[test]
    fn test_counter_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("video_left.avi");
        std::fs::write(&path, minimal_avi(600)).unwrap();
        assert_eq!(AviHeaderCounter.frame_count(&path).unwrap(), 600);

        let bad = dir.path().join("broken.avi");
        std::fs::write(&bad, b"RIFF").unwrap();
        assert!(matches!(
            AviHeaderCounter.frame_count(&bad),
            Err(ArtifactError::UnsupportedVideo { .. })
        ));
    }
}
