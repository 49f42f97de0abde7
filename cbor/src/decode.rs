use super::error::ErrorCode;
use thiserror::Error;
use tracing::trace;

/// Deepest collection nesting accepted while measuring an item.
pub const MAX_RECURSION: usize = 256;

const BREAK: u8 = 0xFF;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("Not enough data for encoded value")]
    NotEnoughData,

    #[error("Invalid minor-type value {0}")]
    InvalidMinorValue(u8),

    #[error("Invalid simple value {0}")]
    InvalidSimpleValue(u8),

    #[error("Tags with no following value")]
    JustTags,

    #[error("Chunked string contains an invalid chunk")]
    InvalidChunk,

    #[error("Break marker outside an indefinite-length item")]
    UnexpectedBreak,

    #[error("Map has key but no value")]
    PartialMap,

    #[error("No more items in the current collection")]
    NoMoreItems,

    #[error("Maximum recursion depth reached")]
    MaxRecursion,

    #[error("Length too large for this platform")]
    TooBig,
}

impl Error {
    /// The catalog code reported for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotEnoughData | Self::JustTags => ErrorCode::NoPayload,
            Self::InvalidMinorValue(_) => ErrorCode::AdditionalInval,
            Self::InvalidSimpleValue(_) => ErrorCode::InvalidValueEncoding,
            Self::InvalidChunk | Self::UnexpectedBreak => ErrorCode::WrongType,
            Self::PartialMap => ErrorCode::MapMisaligned,
            Self::NoMoreItems => ErrorCode::LowElemCount,
            Self::MaxRecursion => ErrorCode::Iterations,
            Self::TooBig => ErrorCode::IntSize,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Major {
    Unsigned = 0,
    Negative = 1,
    Bytes = 2,
    Text = 3,
    Array = 4,
    Map = 5,
    Tag = 6,
    Simple = 7,
}

impl Major {
    fn from_initial(initial: u8) -> Self {
        match initial >> 5 {
            0 => Self::Unsigned,
            1 => Self::Negative,
            2 => Self::Bytes,
            3 => Self::Text,
            4 => Self::Array,
            5 => Self::Map,
            6 => Self::Tag,
            _ => Self::Simple,
        }
    }

    /// Short name used when rendering strings and collections.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Bytes => "bstr",
            Self::Text => "tstr",
            Self::Array => "list",
            Self::Map => "map",
            Self::Unsigned | Self::Negative | Self::Tag | Self::Simple => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Special {
    False,
    True,
    Null,
    Undefined,
    Simple(u8),
    Float16(half::f16),
    Float32(f32),
    Float64(f64),
}

impl Special {
    /// The argument as encoded: the simple number, or the raw float bits.
    pub fn raw(&self) -> u64 {
        match self {
            Self::False => 20,
            Self::True => 21,
            Self::Null => 22,
            Self::Undefined => 23,
            Self::Simple(v) => *v as u64,
            Self::Float16(v) => v.to_bits() as u64,
            Self::Float32(v) => v.to_bits() as u64,
            Self::Float64(v) => v.to_bits(),
        }
    }
}

/// One decoded header. Lengths are `None` for indefinite-length items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item {
    Unsigned(u64),
    Negative(u64),
    Bytes(Option<u64>),
    Text(Option<u64>),
    Array(Option<u64>),
    Map(Option<u64>),
    Tag(u64),
    Simple(Special),
}

impl Item {
    pub fn major(&self) -> Major {
        match self {
            Self::Unsigned(_) => Major::Unsigned,
            Self::Negative(_) => Major::Negative,
            Self::Bytes(_) => Major::Bytes,
            Self::Text(_) => Major::Text,
            Self::Array(_) => Major::Array,
            Self::Map(_) => Major::Map,
            Self::Tag(_) => Major::Tag,
            Self::Simple(_) => Major::Simple,
        }
    }

    pub fn is_indefinite(&self) -> bool {
        matches!(
            self,
            Self::Bytes(None) | Self::Text(None) | Self::Array(None) | Self::Map(None)
        )
    }
}

/// A read-only view of one complete item within a caller-owned buffer.
///
/// `encoded` covers any leading tags, the header and the whole payload,
/// including nested items. `header_offset..payload_offset` is the header
/// of the item itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element<'a> {
    item: Item,
    encoded: &'a [u8],
    header_offset: usize,
    payload_offset: usize,
}

impl<'a> Element<'a> {
    pub fn item(&self) -> Item {
        self.item
    }

    pub fn major(&self) -> Major {
        self.item.major()
    }

    /// The low five bits of the initial byte.
    pub fn additional(&self) -> u8 {
        self.encoded[self.header_offset] & 0x1F
    }

    pub fn is_indefinite(&self) -> bool {
        self.item.is_indefinite()
    }

    /// The header argument: magnitude, length, tag number or simple value.
    /// Indefinite-length items report zero.
    pub fn value(&self) -> u64 {
        match self.item {
            Item::Unsigned(v) | Item::Negative(v) | Item::Tag(v) => v,
            Item::Bytes(len) | Item::Text(len) | Item::Array(len) | Item::Map(len) => {
                len.unwrap_or(0)
            }
            Item::Simple(s) => s.raw(),
        }
    }

    /// The signed value of an integer item, `-1 - value` for negatives.
    pub fn neg_value(&self) -> i128 {
        match self.item {
            Item::Negative(v) => -1 - v as i128,
            _ => self.value() as i128,
        }
    }

    pub fn special(&self) -> Option<Special> {
        match self.item {
            Item::Simple(s) => Some(s),
            _ => None,
        }
    }

    pub fn encoded(&self) -> &'a [u8] {
        self.encoded
    }

    pub fn header(&self) -> &'a [u8] {
        &self.encoded[self.header_offset..self.payload_offset]
    }

    pub fn header_offset(&self) -> usize {
        self.header_offset
    }

    pub fn payload_offset(&self) -> usize {
        self.payload_offset
    }

    pub fn payload(&self) -> &'a [u8] {
        &self.encoded[self.payload_offset..]
    }
}

fn be_bytes<const N: usize>(data: &[u8]) -> Result<[u8; N], Error> {
    data.get(..N)
        .and_then(|b| b.try_into().ok())
        .ok_or(Error::NotEnoughData)
}

fn parse_argument(minor: u8, data: &[u8]) -> Result<(Option<u64>, usize), Error> {
    match minor {
        0..=23 => Ok((Some(minor as u64), 0)),
        24 => data
            .first()
            .map(|v| (Some(*v as u64), 1))
            .ok_or(Error::NotEnoughData),
        25 => be_bytes(data).map(|b| (Some(u16::from_be_bytes(b) as u64), 2)),
        26 => be_bytes(data).map(|b| (Some(u32::from_be_bytes(b) as u64), 4)),
        27 => be_bytes(data).map(|b| (Some(u64::from_be_bytes(b)), 8)),
        31 => Ok((None, 0)),
        _ => Err(Error::InvalidMinorValue(minor)),
    }
}

fn parse_special(minor: u8, arg: Option<u64>) -> Result<Special, Error> {
    match (minor, arg) {
        (20, _) => Ok(Special::False),
        (21, _) => Ok(Special::True),
        (22, _) => Ok(Special::Null),
        (23, _) => Ok(Special::Undefined),
        (0..=19, _) => Ok(Special::Simple(minor)),
        (24, Some(v)) if v < 32 => Err(Error::InvalidSimpleValue(v as u8)),
        (24, Some(v)) => Ok(Special::Simple(v as u8)),
        (25, Some(v)) => Ok(Special::Float16(half::f16::from_bits(v as u16))),
        (26, Some(v)) => Ok(Special::Float32(f32::from_bits(v as u32))),
        (27, Some(v)) => Ok(Special::Float64(f64::from_bits(v))),
        (31, _) => Err(Error::UnexpectedBreak),
        _ => Err(Error::InvalidMinorValue(minor)),
    }
}

/// Decode a single header, returning the item and the header length.
fn parse_header(data: &[u8]) -> Result<(Item, usize), Error> {
    let initial = *data.first().ok_or(Error::NotEnoughData)?;
    let minor = initial & 0x1F;
    let (arg, len) = parse_argument(minor, &data[1..])?;
    let item = match (Major::from_initial(initial), arg) {
        (Major::Unsigned, Some(v)) => Item::Unsigned(v),
        (Major::Negative, Some(v)) => Item::Negative(v),
        (Major::Bytes, len) => Item::Bytes(len),
        (Major::Text, len) => Item::Text(len),
        (Major::Array, len) => Item::Array(len),
        (Major::Map, len) => Item::Map(len),
        (Major::Tag, Some(v)) => Item::Tag(v),
        (Major::Simple, arg) => Item::Simple(parse_special(minor, arg)?),
        _ => return Err(Error::InvalidMinorValue(minor)),
    };
    Ok((item, len + 1))
}

/// Decode a leading tag, if `data` starts with one.
pub fn parse_tag(data: &[u8]) -> Result<Option<(u64, usize)>, Error> {
    match data.first() {
        Some(initial) if Major::from_initial(*initial) == Major::Tag => {
            let minor = initial & 0x1F;
            let (tag, len) = parse_argument(minor, &data[1..])?;
            tag.map(|tag| Some((tag, len + 1)))
                .ok_or(Error::InvalidMinorValue(minor))
        }
        _ => Ok(None),
    }
}

/// Skip any tags and decode the following header.
/// Returns the item, the header offset and the payload offset.
fn parse_head(data: &[u8]) -> Result<(Item, usize, usize), Error> {
    let mut offset = 0;
    while let Some((_, len)) = parse_tag(&data[offset..])? {
        offset += len;
    }
    if offset > 0 && offset >= data.len() {
        return Err(Error::JustTags);
    }
    let (item, len) = parse_header(&data[offset..])?;
    Ok((item, offset, offset + len))
}

fn item_len(data: &[u8], max_recursion: usize) -> Result<usize, Error> {
    let (item, _, payload_offset) = parse_head(data)?;
    Ok(payload_offset + content_len(&item, &data[payload_offset..], max_recursion)?)
}

fn content_len(item: &Item, data: &[u8], max_recursion: usize) -> Result<usize, Error> {
    match *item {
        Item::Bytes(Some(len)) | Item::Text(Some(len)) => {
            let len = usize::try_from(len).map_err(|_| Error::TooBig)?;
            if len > data.len() {
                Err(Error::NotEnoughData)
            } else {
                Ok(len)
            }
        }
        Item::Bytes(None) | Item::Text(None) => chunks_len(item.major(), data),
        Item::Array(count) => items_len(data, count, 1, max_recursion),
        Item::Map(count) => items_len(data, count, 2, max_recursion),
        Item::Unsigned(_) | Item::Negative(_) | Item::Tag(_) | Item::Simple(_) => Ok(0),
    }
}

fn chunks_len(major: Major, data: &[u8]) -> Result<usize, Error> {
    let mut offset = 0;
    loop {
        match data.get(offset) {
            None => return Err(Error::NotEnoughData),
            Some(&BREAK) => return Ok(offset + 1),
            Some(initial) if Major::from_initial(*initial) == major => {
                let (chunk, len) = parse_header(&data[offset..])?;
                if chunk.is_indefinite() {
                    return Err(Error::InvalidChunk);
                }
                offset += len;
                offset += content_len(&chunk, &data[offset..], 0)?;
            }
            Some(_) => return Err(Error::InvalidChunk),
        }
    }
}

fn items_len(
    data: &[u8],
    count: Option<u64>,
    per_entry: u64,
    max_recursion: usize,
) -> Result<usize, Error> {
    if max_recursion == 0 {
        return Err(Error::MaxRecursion);
    }
    let mut offset = 0;
    if let Some(count) = count {
        let count = count.checked_mul(per_entry).ok_or(Error::TooBig)?;
        for _ in 0..count {
            offset += item_len(&data[offset..], max_recursion - 1)?;
        }
        return Ok(offset);
    }

    let mut parsed = 0u64;
    loop {
        match data.get(offset) {
            None => return Err(Error::NotEnoughData),
            Some(&BREAK) if parsed % per_entry != 0 => return Err(Error::PartialMap),
            Some(&BREAK) => return Ok(offset + 1),
            Some(_) => {
                offset += item_len(&data[offset..], max_recursion - 1)?;
                parsed += 1;
            }
        }
    }
}

/// Decode one complete item, including its tags and nested content.
///
/// Returns `None` if `data` is empty. The returned length is the number of
/// bytes the item occupies, so callers can tell whether `data` was
/// consumed in full.
pub fn try_parse_element(data: &[u8]) -> Result<Option<(Element<'_>, usize)>, Error> {
    if data.is_empty() {
        return Ok(None);
    }
    let (item, header_offset, payload_offset) = parse_head(data)?;
    let len = payload_offset + content_len(&item, &data[payload_offset..], MAX_RECURSION)?;
    Ok(Some((
        Element {
            item,
            encoded: &data[..len],
            header_offset,
            payload_offset,
        },
        len,
    )))
}

#[inline]
pub fn parse_element(data: &[u8]) -> Result<(Element<'_>, usize), Error> {
    try_parse_element(data)?.ok_or(Error::NotEnoughData)
}

/// Decode one item, tolerating malformed or truncated content.
///
/// The tags and header must be valid. If the content is not, the element
/// spans the rest of `data`, so that a printer can render what is there
/// and report the failure where it occurs.
pub fn parse_partial(data: &[u8]) -> Result<(Element<'_>, usize), Error> {
    let (item, header_offset, payload_offset) = parse_head(data)?;
    let len = match content_len(&item, &data[payload_offset..], MAX_RECURSION) {
        Ok(len) => payload_offset + len,
        Err(e) => {
            trace!("Item content is malformed: {e}");
            data.len()
        }
    };
    Ok((
        Element {
            item,
            encoded: &data[..len],
            header_offset,
            payload_offset,
        },
        len,
    ))
}

/// A decode cursor over the items of one collection or byte string.
///
/// The expected item count is either definite, or unbounded until a break
/// marker is found.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    data: &'a [u8],
    offset: usize,
    count: Option<u64>,
    error: Option<Error>,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            count: Some(1),
            error: None,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn seek(&mut self, offset: usize) {
        self.offset = offset.min(self.data.len());
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }

    /// Set the number of items still to be read; `None` reads until a
    /// break marker.
    pub fn expect_items(&mut self, count: Option<u64>) {
        self.count = count;
    }

    /// Decode the next tag, if there is one.
    pub fn tag(&mut self) -> Option<u64> {
        match parse_tag(self.remaining()) {
            Ok(Some((tag, len))) => {
                self.offset += len;
                Some(tag)
            }
            Ok(None) => None,
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    /// Decode the next item of the current collection.
    pub fn element(&mut self) -> Result<Element<'a>, Error> {
        self.trace("element");
        match self.count {
            Some(0) => return Err(self.fail(Error::NoMoreItems)),
            None if self.data.get(self.offset) == Some(&BREAK) => {
                self.offset += 1;
                self.count = Some(0);
                return Err(self.fail(Error::NoMoreItems));
            }
            _ => {}
        }
        match parse_element(self.remaining()) {
            Ok((element, len)) => {
                self.offset += len;
                if let Some(count) = &mut self.count {
                    *count -= 1;
                }
                Ok(element)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// True once every expected item has been read, or the break marker
    /// of an unbounded collection has been consumed.
    pub fn at_end(&self) -> bool {
        self.count == Some(0)
    }

    /// The most recent failure, if any.
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    fn fail(&mut self, e: Error) -> Error {
        self.error = Some(e);
        self.trace("failed");
        e
    }

    fn trace(&self, what: &str) {
        trace!(
            remaining = self.data.len() - self.offset,
            current = ?self.data.get(self.offset),
            count = ?self.count,
            error = ?self.error,
            "{what}"
        );
    }
}
