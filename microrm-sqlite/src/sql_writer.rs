use libsqlite3_sys::sqlite3_keyword_check;
use microrm_core::{SqlWriter, is_identifier_shaped};
use std::ffi::{c_char, c_int};

/// SQLite dialect: like the default one, but reserved words are quoted too.
#[derive(Default, Debug, Clone, Copy)]
pub struct SqliteSqlWriter {}

impl SqliteSqlWriter {
    pub fn is_keyword(value: &str) -> bool {
        let Ok(len) = c_int::try_from(value.len()) else {
            return false;
        };
        unsafe { sqlite3_keyword_check(value.as_ptr() as *const c_char, len) != 0 }
    }
}

impl SqlWriter for SqliteSqlWriter {
    fn is_plain_identifier(&self, value: &str) -> bool {
        is_identifier_shaped(value) && !Self::is_keyword(value)
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteSqlWriter;
    use microrm_core::SqlWriter;

    #[test]
    fn keywords_are_quoted() {
        let writer = SqliteSqlWriter {};
        let mut out = String::new();
        writer.write_identifier(&mut out, "order");
        out.push(' ');
        writer.write_identifier(&mut out, "user");
        out.push(' ');
        writer.write_identifier(&mut out, "Group");
        out.push(' ');
        writer.write_identifier(&mut out, "first name");
        assert_eq!(out, r#""order" user "Group" "first name""#);
    }
}
