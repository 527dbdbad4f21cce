//! Plain-text rendering of store state

use journal_core::{Entry, User};

pub const EMPTY_LIST: &str = "No entries yet. Share your first memory!";

/// Format entries for display, newest first as given
pub fn format_entry_list(entries: &[Entry], me: Option<&User>) -> String {
    if entries.is_empty() {
        return EMPTY_LIST.to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&format!(
            "{}  ({})\n",
            entry.author_display(me),
            entry.date_display()
        ));
        for line in entry.text.lines() {
            output.push_str(&format!("    {}\n", line));
        }
        output.push('\n');
    }
    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use journal_core::{Author, AuthorRef};

    #[test]
    fn test_empty_list_message() {
        assert_eq!(format_entry_list(&[], None), EMPTY_LIST);
    }

    #[test]
    fn test_format_entries() {
        let me = User {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
        };
        let entries = vec![
            Entry {
                id: "e2".to_string(),
                text: "line one\nline two".to_string(),
                author: Author::Profile(AuthorRef {
                    id: "u1".to_string(),
                    name: None,
                }),
                date: Utc.with_ymd_and_hms(2024, 2, 14, 9, 0, 0).unwrap(),
            },
            Entry {
                id: "e1".to_string(),
                text: "hi".to_string(),
                author: Author::Inline("Ben".to_string()),
                date: Utc.with_ymd_and_hms(2024, 2, 13, 9, 0, 0).unwrap(),
            },
        ];

        let output = format_entry_list(&entries, Some(&me));
        assert_eq!(
            output,
            "Ana  (Feb 14, 2024)\n    line one\n    line two\n\nBen  (Feb 13, 2024)\n    hi"
        );
    }
}
