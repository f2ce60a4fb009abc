use super::error::MetainfoError;
use super::info_hash::InfoHash;
use crate::bencode::{decode, decode_reader, encode, BencodeError, Value};
use crate::bind::{self, bind_record, Sha1Hash, Timestamp};
use bytes::Bytes;
use std::io::BufRead;
use std::path::PathBuf;
use tracing::debug;

crate::record! {
    /// The top-level dictionary of a `.torrent` file.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Torrent {
        /// Primary tracker URL.
        pub announce: Option<String> => "announce,omitempty",
        /// Multi-tier tracker list ([BEP-12](http://bittorrent.org/beps/bep_0012.html)).
        pub announce_list: Option<Vec<Vec<String>>> => "announce-list,omitempty",
        pub info: Info => "info",
        pub comment: Option<String> => "comment,omitempty",
        /// Name/version of the program that created the torrent.
        pub created_by: Option<String> => "created by,omitempty",
        pub creation_date: Option<Timestamp> => "creation date,omitempty",
        /// Character encoding of the string fields, usually `UTF-8`.
        pub encoding: Option<String> => "encoding,omitempty",
    }
}

crate::record! {
    /// The info dictionary from a torrent file.
    ///
    /// Single-file torrents carry `length`; multi-file torrents carry `files`.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Info {
        /// Suggested name for the file or directory.
        pub name: String => "name",
        pub piece_length: u64 => "piece length",
        /// SHA-1 hash of each piece.
        pub pieces: Vec<Sha1Hash> => "pieces",
        pub length: Option<u64> => "length,omitempty",
        pub files: Option<Vec<FileEntry>> => "files,omitempty",
        /// If set, clients should only use the trackers in the metainfo.
        pub private: Option<bool> => "private,omitempty",
    }
}

crate::record! {
    /// One entry of a multi-file torrent's `files` list.
    #[derive(Debug, Clone, PartialEq)]
    pub struct FileEntry {
        pub length: u64 => "length",
        /// Path components relative to the torrent's root directory.
        pub path: Vec<String> => "path",
    }
}

/// A file laid out within the torrent's piece data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Path to the file (relative to the download directory).
    pub path: PathBuf,
    pub length: u64,
    /// Byte offset within the torrent's piece data.
    pub offset: u64,
}

impl Torrent {
    /// Returns all tracker URLs from both `announce` and `announce-list`.
    ///
    /// The primary tracker comes first. Duplicates are removed.
    pub fn trackers(&self) -> Vec<String> {
        let mut trackers = Vec::new();

        if let Some(ref announce) = self.announce {
            trackers.push(announce.clone());
        }

        for tier in self.announce_list.iter().flatten() {
            for tracker in tier {
                if !trackers.contains(tracker) {
                    trackers.push(tracker.clone());
                }
            }
        }

        trackers
    }
}

impl Info {
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_private(&self) -> bool {
        self.private.unwrap_or(false)
    }

    pub fn is_multi_file(&self) -> bool {
        self.files.is_some()
    }

    /// Total size of all files combined.
    ///
    /// Saturates at `u64::MAX`; [`Metainfo`] never holds an info dictionary
    /// whose total overflows.
    pub fn total_length(&self) -> u64 {
        self.checked_total_length().unwrap_or(u64::MAX)
    }

    fn checked_total_length(&self) -> Option<u64> {
        match (&self.files, self.length) {
            (Some(files), _) => files
                .iter()
                .try_fold(0u64, |total, f| total.checked_add(f.length)),
            (None, Some(length)) => Some(length),
            (None, None) => Some(0),
        }
    }

    /// Lists the files in piece order with their offsets.
    ///
    /// Multi-file paths are rooted at the torrent name.
    pub fn files(&self) -> Vec<File> {
        let Some(entries) = &self.files else {
            return vec![File {
                path: PathBuf::from(&self.name),
                length: self.length.unwrap_or(0),
                offset: 0,
            }];
        };

        let mut offset = 0u64;
        entries
            .iter()
            .map(|entry| {
                let path: PathBuf = std::iter::once(self.name.as_str())
                    .chain(entry.path.iter().map(String::as_str))
                    .collect();
                let file = File {
                    path,
                    length: entry.length,
                    offset,
                };
                offset = offset.saturating_add(entry.length);
                file
            })
            .collect()
    }
}

/// A parsed torrent file together with its info hash.
///
/// # Examples
///
/// ```no_run
/// use ben::metainfo::Metainfo;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let data = std::fs::read("example.torrent")?;
/// let metainfo = Metainfo::from_bytes(&data)?;
///
/// println!("Torrent: {}", metainfo.torrent.info.name);
/// println!("Size: {} bytes", metainfo.torrent.info.total_length());
/// println!("Info hash: {}", metainfo.info_hash);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Metainfo {
    pub torrent: Torrent,
    pub info_hash: InfoHash,
    raw_info: Bytes,
}

impl Metainfo {
    /// Parses a torrent file from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The data is not valid bencode
    /// - A required field is missing or has the wrong shape
    /// - The pieces field length is not a multiple of 20
    /// - Neither `length` nor `files` is present
    /// - The file lengths add up to more than `u64::MAX`
    pub fn from_bytes(data: &[u8]) -> Result<Self, MetainfoError> {
        Self::from_value(decode(data)?)
    }

    /// Parses a torrent file from a buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, MetainfoError> {
        Self::from_value(decode_reader(reader)?)
    }

    pub fn from_value(value: Value) -> Result<Self, MetainfoError> {
        let dict = value.try_dict()?;

        let info_value = dict
            .get(b"info".as_slice())
            .ok_or(MetainfoError::MissingField("info"))?;
        let raw_info = Bytes::from(encode(info_value));
        let info_hash = InfoHash::from_info_bytes(&raw_info);

        let torrent: Torrent = bind_record(dict)?;
        if torrent.info.length.is_none() && torrent.info.files.is_none() {
            return Err(MetainfoError::MissingField("length or files"));
        }
        if torrent.info.checked_total_length().is_none() {
            return Err(BencodeError::InvalidField {
                field: "files",
                reason: "total length overflows u64".into(),
            }
            .in_field("info")
            .into());
        }

        debug!(
            %info_hash,
            name = %torrent.info.name,
            pieces = torrent.info.piece_count(),
            "metainfo parsed"
        );

        Ok(Self {
            torrent,
            info_hash,
            raw_info,
        })
    }

    /// Returns the bencoded info dictionary the info hash was computed from.
    pub fn raw_info(&self) -> &Bytes {
        &self.raw_info
    }

    /// Re-encodes the torrent.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MetainfoError> {
        Ok(bind::to_bytes(&self.torrent)?)
    }
}
