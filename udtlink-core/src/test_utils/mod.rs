//! Shared test helpers.

pub(crate) mod fixtures;
mod mock_cursor;
pub(crate) use mock_cursor::MockCursor;
