//! Torrent metainfo ([BEP-3]) bound through [`crate::bind`].
//!
//! # Examples
//!
//! ```
//! use ben::metainfo::Metainfo;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut data = b"d8:announce15:http://test.com13:creation datei1711786644e4:info".to_vec();
//! data.extend_from_slice(b"d6:lengthi5e4:name5:a.txt12:piece lengthi16384e6:pieces20:");
//! data.extend_from_slice(&[0u8; 20]);
//! data.extend_from_slice(b"ee");
//!
//! let metainfo = Metainfo::from_bytes(&data)?;
//! let torrent = &metainfo.torrent;
//! assert_eq!(torrent.announce.as_deref(), Some("http://test.com"));
//! assert_eq!(torrent.creation_date.map(|t| t.timestamp()), Some(1711786644));
//! assert_eq!(torrent.info.piece_count(), 1);
//! assert_eq!(torrent.info.total_length(), 5);
//! # Ok(())
//! # }
//! ```
//!
//! # Torrent Structure
//!
//! - **info** - Core torrent metadata (hashed to create the info hash)
//!   - `name` - Suggested file/directory name
//!   - `piece length` - Size of each piece in bytes
//!   - `pieces` - Concatenated SHA1 hashes of each piece
//!   - `length` - Total size (single-file) OR `files` list (multi-file)
//! - **announce** - Primary tracker URL
//! - **announce-list** - Additional tracker tiers (BEP-12)
//! - **creation date** - Unix timestamp when created
//! - **comment** - Optional comment
//! - **created by** - Client that created the torrent
//! - **encoding** - String encoding used in the file
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod error;
mod info_hash;
mod torrent;

pub use error::MetainfoError;
pub use info_hash::InfoHash;
pub use torrent::{File, FileEntry, Info, Metainfo, Torrent};
