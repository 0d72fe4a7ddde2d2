//! SQLite driver for microrm, built directly on `libsqlite3-sys`.
mod cbox;
mod connection;
mod driver;
mod extract;
mod path;
mod prepared;
mod sql_writer;

use std::{
    ffi::{CStr, c_char},
    ptr,
};

pub(crate) use cbox::*;
pub use connection::*;
pub use driver::*;
pub use path::*;
pub(crate) use prepared::*;
pub use sql_writer::*;

pub(crate) fn error_message_from_ptr<'a>(ptr: *const c_char) -> &'a str {
    unsafe {
        if ptr != ptr::null() {
            CStr::from_ptr(ptr)
                .to_str()
                .unwrap_or("Unknown error (the error message was not a valid C string)")
        } else {
            "Unknown error (could not extract the error message)"
        }
    }
}
