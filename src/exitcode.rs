//! Standard exit codes (BSD sysexits.h compatible)

/// Employee or supervisor id not in the chart
pub const NOTFOUND: i32 = 2;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (malformed chart, duplicate ids)
pub const DATAERR: i32 = 65;

/// Cannot open input
pub const NOINPUT: i32 = 66;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
