// Copyright 2025 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::{registry_entry_id, DataKey};
use crate::{
    constants::{BASE32_SKYLINK_SIZE, BASE64_SKYLINK_SIZE, RAW_SKYLINK_SIZE, SECTOR_SIZE},
    encoding::Hash,
    error::{Error, Result},
    keys::PublicKey,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

const BASE32_ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

/// Smallest offset and fetch size alignment of a V1 skylink.
const V1_ALIGNMENT: u64 = 4096;

/// The highest mode a V1 bitfield can declare.
const V1_MAX_MODE: u32 = 7;

/// A content address on Skynet.
///
/// A V1 skylink points at immutable data through its merkle root, and its bitfield
/// records which slice of the sector to fetch. A V2 skylink points at a registry
/// slot; its "merkle root" is the registry entry id of `(owner, data key)`.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct Skylink {
    bitfield: u16,
    merkle_root: Hash,
}

impl Skylink {
    /// Create a V1 skylink for the `fetch_size` bytes found at `offset` in the sector
    /// with the given merkle root. The fetch size is rounded up to its alignment.
    pub fn new_v1(merkle_root: Hash, offset: u64, fetch_size: u64) -> Result<Self> {
        let bitfield = v1_bitfield(offset, fetch_size)?;
        Ok(Self {
            bitfield,
            merkle_root,
        })
    }

    /// Create the V2 skylink resolving through the registry slot `(owner, data_key)`.
    pub fn new_v2(owner: &PublicKey, data_key: &DataKey) -> Self {
        Self {
            bitfield: 1,
            merkle_root: registry_entry_id(owner, data_key),
        }
    }

    /// Load a skylink from its raw 34 bytes. Malformed input is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != RAW_SKYLINK_SIZE {
            return Err(Error::InvalidSkylinkLength(bytes.len()));
        }
        let bitfield = u16::from_le_bytes([bytes[0], bytes[1]]);
        let mut merkle_root = Hash::default();
        merkle_root.copy_from_slice(&bytes[2..]);

        let skylink = Self {
            bitfield,
            merkle_root,
        };
        skylink.validate()?;
        Ok(skylink)
    }

    pub fn to_bytes(&self) -> [u8; RAW_SKYLINK_SIZE] {
        let mut bytes = [0u8; RAW_SKYLINK_SIZE];
        bytes[..2].copy_from_slice(&self.bitfield.to_le_bytes());
        bytes[2..].copy_from_slice(&self.merkle_root);
        bytes
    }

    pub fn version(&self) -> u16 {
        (self.bitfield & 3) + 1
    }

    pub fn is_v1(&self) -> bool {
        self.version() == 1
    }

    pub fn is_v2(&self) -> bool {
        self.version() == 2
    }

    pub fn bitfield(&self) -> u16 {
        self.bitfield
    }

    /// The merkle root for V1, the registry entry id for V2.
    pub fn merkle_root(&self) -> &Hash {
        &self.merkle_root
    }

    /// Offset and fetch size encoded in a V1 bitfield.
    pub fn offset_and_fetch_size(&self) -> Result<(u64, u64)> {
        if !self.is_v1() {
            return Err(Error::UnsupportedSkylinkVersion(self.version()));
        }
        parse_v1_bitfield(self.bitfield)
    }

    /// The 55 character base32 form, safe for use in subdomains.
    pub fn to_base32(&self) -> String {
        base32_encode(&self.to_bytes())
    }

    fn validate(&self) -> Result<()> {
        match self.version() {
            1 => parse_v1_bitfield(self.bitfield).map(|_| ()),
            2 if self.bitfield == 1 => Ok(()),
            2 => Err(Error::InvalidBitfield("V2 bitfield must not carry extra bits")),
            version => Err(Error::UnsupportedSkylinkVersion(version)),
        }
    }
}

/// Accepts the base64 and base32 forms, optionally with a `sia:` or `sia://` prefix
/// and a trailing path, query or parameters, which are ignored.
impl FromStr for Skylink {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.split_once('&').map_or(s, |(head, _)| head);
        let s = s.split_once('?').map_or(s, |(head, _)| head);
        let s = s.strip_prefix("sia:").unwrap_or(s);
        let s = s.strip_prefix("//").unwrap_or(s);
        let s = s.split_once('/').map_or(s, |(head, _)| head);

        let raw = match s.len() {
            BASE64_SKYLINK_SIZE => URL_SAFE_NO_PAD
                .decode(s)
                .map_err(|err| Error::SkylinkEncoding(err.to_string()))?,
            BASE32_SKYLINK_SIZE => base32_decode(s)?,
            len => {
                return Err(Error::SkylinkEncoding(format!(
                    "unexpected skylink length {len}"
                )))
            }
        };
        Self::from_bytes(&raw)
    }
}

impl fmt::Display for Skylink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", URL_SAFE_NO_PAD.encode(self.to_bytes()))
    }
}

impl fmt::Debug for Skylink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Skylink({self})")
    }
}

impl Serialize for Skylink {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Skylink {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Offset alignment, fetch size alignment and fetch size base of a V1 mode.
/// Each mode doubles the range of fetch sizes of the previous one.
fn v1_alignments(mode: u32) -> (u64, u64, u64) {
    if mode == 0 {
        (V1_ALIGNMENT, V1_ALIGNMENT, 0)
    } else {
        let fetch_align = V1_ALIGNMENT << (mode - 1);
        (V1_ALIGNMENT << mode, fetch_align, fetch_align << 3)
    }
}

/// Layout, from the low bits: 2 version bits (0), `mode` ones and a zero,
/// 3 fetch size bits, then the offset.
fn parse_v1_bitfield(bitfield: u16) -> Result<(u64, u64)> {
    if bitfield & 3 != 0 {
        return Err(Error::InvalidBitfield("bitfield is not declaring version 1"));
    }
    let mut bits = bitfield >> 2;

    let mut mode = 0;
    while bits & 1 == 1 {
        mode += 1;
        bits >>= 1;
    }
    if mode > V1_MAX_MODE {
        return Err(Error::InvalidBitfield("bitfield has invalid mode"));
    }
    bits >>= 1;

    let (offset_align, fetch_align, fetch_base) = v1_alignments(mode);
    let fetch_size = fetch_align * (u64::from(bits & 7) + 1) + fetch_base;
    let offset = u64::from(bits >> 3) * offset_align;
    if offset + fetch_size > SECTOR_SIZE {
        return Err(Error::InvalidOffsetAndFetchSize { offset, fetch_size });
    }
    Ok((offset, fetch_size))
}

fn v1_bitfield(offset: u64, fetch_size: u64) -> Result<u16> {
    let invalid = || Error::InvalidOffsetAndFetchSize { offset, fetch_size };
    if offset
        .checked_add(fetch_size)
        .map_or(true, |end| end > SECTOR_SIZE)
    {
        return Err(invalid());
    }

    let mode = (0..=V1_MAX_MODE)
        .find(|mode| {
            let (_, fetch_align, fetch_base) = v1_alignments(*mode);
            fetch_size <= fetch_base + (fetch_align << 3)
        })
        .ok_or_else(invalid)?;
    let (offset_align, fetch_align, fetch_base) = v1_alignments(mode);
    if offset % offset_align != 0 {
        return Err(invalid());
    }

    let fetch_units = fetch_size
        .saturating_sub(fetch_base)
        .div_ceil(fetch_align)
        .max(1);
    let offset_units = offset / offset_align;
    if offset_units >= 1 << (10 - mode) {
        return Err(invalid());
    }

    let mut bitfield = ((offset_units as u16) << 3) | ((fetch_units - 1) as u16);
    bitfield <<= 1;
    for _ in 0..mode {
        bitfield = (bitfield << 1) | 1;
    }
    bitfield <<= 2;

    // rounding the fetch size up must still fit in the sector
    parse_v1_bitfield(bitfield).map(|_| bitfield)
}

fn base32_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(BASE32_SKYLINK_SIZE);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for byte in bytes {
        buffer = (buffer << 8) | u32::from(*byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(char::from(BASE32_ALPHABET[((buffer >> bits) & 31) as usize]));
        }
        buffer &= (1 << bits) - 1;
    }
    if bits > 0 {
        out.push(char::from(
            BASE32_ALPHABET[((buffer << (5 - bits)) & 31) as usize],
        ));
    }
    out
}

fn base32_decode(s: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(RAW_SKYLINK_SIZE);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for c in s.bytes() {
        let value = BASE32_ALPHABET
            .iter()
            .position(|a| *a == c.to_ascii_lowercase())
            .ok_or_else(|| {
                Error::SkylinkEncoding(format!("invalid base32 character {:?}", char::from(c)))
            })?;
        buffer = (buffer << 5) | value as u32;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }
    // the last character carries padding bits, which must be zero so each link has a
    // single base32 form up to case
    if buffer != 0 {
        return Err(Error::SkylinkEncoding(
            "non-zero trailing bits in base32 skylink".to_string(),
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Keypair;

    fn root(byte: u8) -> Hash {
        [byte; 32]
    }

    #[test]
    fn test_v1_bitfield_layout() {
        let link = Skylink::new_v1(root(1), 0, 4096).unwrap();
        assert_eq!(link.bitfield(), 0);
        assert!(link.is_v1());
        assert_eq!(link.offset_and_fetch_size().unwrap(), (0, 4096));

        let link = Skylink::new_v1(root(1), 4096, 4096).unwrap();
        assert_eq!(link.bitfield(), 64);
        assert_eq!(link.offset_and_fetch_size().unwrap(), (4096, 4096));

        // mode 1 rounds up to 8 KiB steps above 32 KiB
        let link = Skylink::new_v1(root(1), 0, 40_000).unwrap();
        assert_eq!(link.offset_and_fetch_size().unwrap(), (0, 40_960));

        let link = Skylink::new_v1(root(1), 0, SECTOR_SIZE).unwrap();
        assert_eq!(link.offset_and_fetch_size().unwrap(), (0, SECTOR_SIZE));
    }

    #[test]
    fn test_v1_rejects_bad_ranges() {
        assert!(Skylink::new_v1(root(1), 0, SECTOR_SIZE + 1).is_err());
        assert!(Skylink::new_v1(root(1), SECTOR_SIZE, 1).is_err());
        // mode 1 requires 8 KiB aligned offsets
        assert!(Skylink::new_v1(root(1), 4096, 40_000).is_err());
        assert!(Skylink::new_v1(root(1), 100, 4096).is_err());
    }

    #[test]
    fn test_v2_derivation() {
        let owner = Keypair::random().public_key();
        let dk = DataKey::from_name("skydb");
        let link = Skylink::new_v2(&owner, &dk);

        assert!(link.is_v2());
        assert_eq!(link.bitfield(), 1);
        assert_eq!(link.merkle_root(), &registry_entry_id(&owner, &dk));
        assert_eq!(link, Skylink::new_v2(&owner, &dk));
        assert!(link.offset_and_fetch_size().is_err());
    }

    #[test]
    fn test_string_and_bytes_roundtrip() {
        let v1 = Skylink::new_v1(root(42), 8192, 12_000).unwrap();
        let v2 = Skylink::new_v2(&Keypair::random().public_key(), &DataKey::default());

        for link in [v1, v2] {
            let s = link.to_string();
            assert_eq!(s.len(), BASE64_SKYLINK_SIZE);
            assert_eq!(s.parse::<Skylink>().unwrap(), link);

            let b32 = link.to_base32();
            assert_eq!(b32.len(), BASE32_SKYLINK_SIZE);
            assert_eq!(b32.parse::<Skylink>().unwrap(), link);

            assert_eq!(Skylink::from_bytes(&link.to_bytes()).unwrap(), link);
        }
    }

    #[test]
    fn test_parse_strips_prefix_and_suffix() {
        let link = Skylink::new_v1(root(3), 0, 4096).unwrap();
        let s = link.to_string();

        for input in [
            format!("sia:{s}"),
            format!("sia://{s}"),
            format!("{s}/index.html"),
            format!("{s}?format=zip"),
            format!("sia://{s}/dir/file.txt?attachment=true&x=y"),
        ] {
            assert_eq!(input.parse::<Skylink>().unwrap(), link, "input {input}");
        }
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        let link = Skylink::new_v1(root(3), 0, 4096).unwrap();
        let s = link.to_string();

        assert!(matches!(
            s[1..].parse::<Skylink>(),
            Err(Error::SkylinkEncoding(_))
        ));
        assert!(matches!(
            format!("{}!", &s[1..]).parse::<Skylink>(),
            Err(Error::SkylinkEncoding(_))
        ));
        assert!(matches!(
            Skylink::from_bytes(&[0u8; 33]),
            Err(Error::InvalidSkylinkLength(33))
        ));

        // versions 3 and 4 do not exist
        let mut bytes = link.to_bytes();
        bytes[0] = 3;
        assert!(matches!(
            Skylink::from_bytes(&bytes),
            Err(Error::UnsupportedSkylinkVersion(4))
        ));

        // V2 with trailing bits
        bytes[0] = 5;
        assert!(matches!(
            Skylink::from_bytes(&bytes),
            Err(Error::InvalidBitfield(_))
        ));

        // V1 with every mode bit set
        let bytes = {
            let mut b = link.to_bytes();
            b[..2].copy_from_slice(&0xfffcu16.to_le_bytes());
            b
        };
        assert!(matches!(
            Skylink::from_bytes(&bytes),
            Err(Error::InvalidBitfield(_))
        ));
    }

    #[test]
    fn test_each_link_has_one_encoding() {
        let link = Skylink::new_v1(root(7), 0, 4096).unwrap();

        // base32 links live in subdomains, so case does not matter
        let b32 = link.to_base32();
        assert_eq!(b32.to_ascii_uppercase().parse::<Skylink>().unwrap(), link);

        let last = BASE32_ALPHABET
            .iter()
            .position(|c| Some(*c) == b32.bytes().last())
            .unwrap();
        let padded = format!(
            "{}{}",
            &b32[..b32.len() - 1],
            char::from(BASE32_ALPHABET[last ^ 1])
        );
        assert!(matches!(
            padded.parse::<Skylink>(),
            Err(Error::SkylinkEncoding(_))
        ));

        let b64 = link.to_string();
        let flipped = match b64.chars().last().unwrap() {
            'A' => 'B',
            'Q' => 'R',
            'g' => 'h',
            'w' => 'x',
            other => panic!("unexpected final base64 character {other}"),
        };
        let padded = format!("{}{flipped}", &b64[..b64.len() - 1]);
        assert!(matches!(
            padded.parse::<Skylink>(),
            Err(Error::SkylinkEncoding(_))
        ));
    }

    #[test]
    fn test_serde_uses_string_form() {
        let link = Skylink::new_v1(root(5), 0, 4096).unwrap();
        let json = serde_json::to_string(&link).unwrap();
        assert_eq!(json, format!("\"{link}\""));
        let back: Skylink = serde_json::from_str(&json).unwrap();
        assert_eq!(back, link);
    }
}
