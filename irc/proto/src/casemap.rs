//! RFC 1459 casemapping.
//!
//! Nicknames and channel names are identities, not strings: `Guest` and
//! `guest` are the same user, and `[]\~` are the uppercase forms of `{}|^`
//! on servers following the original casemapping.

fn lower(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        _ => c.to_ascii_lowercase(),
    }
}

/// Folds a nick or channel name to its canonical lowercase form.
pub fn fold(value: &str) -> String {
    value.chars().map(lower).collect()
}

/// Identity comparison without allocating.
pub fn eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.chars().map(lower).eq(b.chars().map(lower))
}

#[cfg(test)]
mod test {
    use super::{eq, fold};

    #[test]
    fn folding() {
        let tests = [
            ("Guest", "guest"),
            ("[back]chat", "{back}chat"),
            ("nick\\away", "nick|away"),
            ("wave~", "wave^"),
            ("#General", "#general"),
        ];

        for (input, expected) in tests {
            assert_eq!(fold(input), expected);
        }
    }

    #[test]
    fn identity() {
        assert!(eq("NickServ", "nickserv"));
        assert!(eq("[soft]", "{SOFT}"));
        assert!(!eq("alice", "alicia"));
        assert!(!eq("alice", "alice_"));
    }
}
