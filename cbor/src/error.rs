/*!
Error-code catalog and its symbolic names.

The codes are stable integers so that they can be logged, passed across
FFI boundaries or stored, and mapped back to a name later with
[`error_name`].
*/

use core::fmt;

/// Returned by [`error_name`] for any code outside the catalog.
pub const UNKNOWN_NAME: &str = "ZCBOR_ERR_UNKNOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,
    NoBackupMem = 1,
    NoBackupActive = 2,
    LowElemCount = 3,
    HighElemCount = 4,
    IntSize = 5,
    FloatSize = 6,
    AdditionalInval = 7,
    NoPayload = 8,
    PayloadNotConsumed = 9,
    WrongType = 10,
    WrongValue = 11,
    WrongRange = 12,
    Iterations = 13,
    Assertion = 14,
    PayloadOutdated = 15,
    ElemNotFound = 16,
    MapMisaligned = 17,
    ElemsNotProcessed = 18,
    NotAtEnd = 19,
    MapFlagsNotAvailable = 20,
    InvalidValueEncoding = 21,
}

impl ErrorCode {
    /// Every code in the catalog, in numeric order.
    pub const ALL: [ErrorCode; 22] = [
        Self::Success,
        Self::NoBackupMem,
        Self::NoBackupActive,
        Self::LowElemCount,
        Self::HighElemCount,
        Self::IntSize,
        Self::FloatSize,
        Self::AdditionalInval,
        Self::NoPayload,
        Self::PayloadNotConsumed,
        Self::WrongType,
        Self::WrongValue,
        Self::WrongRange,
        Self::Iterations,
        Self::Assertion,
        Self::PayloadOutdated,
        Self::ElemNotFound,
        Self::MapMisaligned,
        Self::ElemsNotProcessed,
        Self::NotAtEnd,
        Self::MapFlagsNotAvailable,
        Self::InvalidValueEncoding,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Success => "ZCBOR_SUCCESS",
            Self::NoBackupMem => "ZCBOR_ERR_NO_BACKUP_MEM",
            Self::NoBackupActive => "ZCBOR_ERR_NO_BACKUP_ACTIVE",
            Self::LowElemCount => "ZCBOR_ERR_LOW_ELEM_COUNT",
            Self::HighElemCount => "ZCBOR_ERR_HIGH_ELEM_COUNT",
            Self::IntSize => "ZCBOR_ERR_INT_SIZE",
            Self::FloatSize => "ZCBOR_ERR_FLOAT_SIZE",
            Self::AdditionalInval => "ZCBOR_ERR_ADDITIONAL_INVAL",
            Self::NoPayload => "ZCBOR_ERR_NO_PAYLOAD",
            Self::PayloadNotConsumed => "ZCBOR_ERR_PAYLOAD_NOT_CONSUMED",
            Self::WrongType => "ZCBOR_ERR_WRONG_TYPE",
            Self::WrongValue => "ZCBOR_ERR_WRONG_VALUE",
            Self::WrongRange => "ZCBOR_ERR_WRONG_RANGE",
            Self::Iterations => "ZCBOR_ERR_ITERATIONS",
            Self::Assertion => "ZCBOR_ERR_ASSERTION",
            Self::PayloadOutdated => "ZCBOR_ERR_PAYLOAD_OUTDATED",
            Self::ElemNotFound => "ZCBOR_ERR_ELEM_NOT_FOUND",
            Self::MapMisaligned => "ZCBOR_ERR_MAP_MISALIGNED",
            Self::ElemsNotProcessed => "ZCBOR_ERR_ELEMS_NOT_PROCESSED",
            Self::NotAtEnd => "ZCBOR_ERR_NOT_AT_END",
            Self::MapFlagsNotAvailable => "ZCBOR_ERR_MAP_FLAGS_NOT_AVAILABLE",
            Self::InvalidValueEncoding => "ZCBOR_ERR_INVALID_VALUE_ENCODING",
        }
    }
}

impl TryFrom<i32> for ErrorCode {
    type Error = i32;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(code)
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code as i32
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Map a raw error code to its symbolic name, or [`UNKNOWN_NAME`].
pub fn error_name(code: i32) -> &'static str {
    ErrorCode::try_from(code).map_or(UNKNOWN_NAME, ErrorCode::name)
}

/// Write the symbolic name of `code` followed by a newline.
pub fn print_error(sink: &mut dyn fmt::Write, code: i32) -> fmt::Result {
    writeln!(sink, "{}", error_name(code))
}
