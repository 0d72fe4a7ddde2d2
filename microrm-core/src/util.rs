use std::fmt::{self, Display, Formatter};

pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

const TRUNCATE_AT: usize = 497;

/// Statement shortened for log lines, see [`truncate_long`].
#[derive(Debug, Clone, Copy)]
pub struct Truncated<'a>(&'a str);

impl Display for Truncated<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let query = self.0;
        if query.len() <= TRUNCATE_AT {
            return f.write_str(query.trim_end());
        }
        let end = (0..=TRUNCATE_AT)
            .rev()
            .find(|i| query.is_char_boundary(*i))
            .unwrap_or(0);
        write!(f, "{}...", query[..end].trim_end())
    }
}

/// Shorten a statement to at most 500 characters for logging.
pub fn truncate_long(query: &str) -> Truncated<'_> {
    Truncated(query)
}

#[cfg(test)]
mod tests {
    use super::{separated_by, truncate_long};

    #[test]
    fn separator_only_between_written_items() {
        let mut out = String::from("(");
        separated_by(&mut out, ["a", "", "b"], |out, v| out.push_str(v), ", ");
        out.push(')');
        assert_eq!(out, "(a, b)");
    }

    #[test]
    fn long_queries_are_truncated() {
        let logged = truncate_long(&"x".repeat(600)).to_string();
        assert_eq!(logged.len(), 500);
        assert!(logged.ends_with("..."));
        assert_eq!(truncate_long("SELECT 1").to_string(), "SELECT 1");
        let logged = truncate_long(&"é".repeat(300)).to_string();
        assert!(logged.ends_with("..."));
    }
}
