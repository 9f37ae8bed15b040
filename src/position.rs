//! Scalar addressing for page positions.
//!
//! A position is a 1-based line and a 1-based byte column. Both are packed into
//! one integer so that positions compare and subtract as plain numbers. The
//! packing assumes a column never reaches [`COLUMN_SPAN`]; a longer line makes
//! positions on it compare wrongly. Page text is wrapped well below that, and
//! the limit is not checked at runtime.

/// Number of columns reserved per line in an address.
pub const COLUMN_SPAN: u32 = 10_000;

/// A packed `(line, column)` pair.
pub type Address = u32;

/// Pack a line and column into an address.
pub const fn encode(line: u32, col: u32) -> Address {
    return line.saturating_mul(COLUMN_SPAN).saturating_add(col);
}

/// Unpack an address into its line and column.
pub const fn decode(addr: Address) -> (u32, u32) {
    return (addr / COLUMN_SPAN, addr % COLUMN_SPAN);
}

/// Line component of an address.
pub const fn line_of(addr: Address) -> u32 {
    return addr / COLUMN_SPAN;
}
