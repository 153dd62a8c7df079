//! CSV normalization pre-pass.
//!
//! Rewrites raw CSV text so that comma-containing values in tag/list columns
//! are wrapped in double quotes, making them safe for the naive splitter in
//! [`crate::parse`]. Columns are treated as array-valued when their header
//! contains `tag` or `list` (case-insensitive).

/// Splits one CSV line on commas, respecting double quotes.
///
/// A quote character toggles the in-quotes state and is kept in the field;
/// a comma inside quotes is not a separator. Embedded newlines and `""`
/// escapes are not handled.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Indexes of headers whose name marks an array-valued column.
pub fn array_column_indexes(headers: &[String]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, header)| {
            let lower = header.to_lowercase();
            lower.contains("tag") || lower.contains("list")
        })
        .map(|(index, _)| index)
        .collect()
}

/// Quotes comma-containing values in array columns so the downstream
/// splitter sees them as single fields.
///
/// The first line is taken as the header row. Whitespace-only data lines
/// pass through as empty strings. Input without data lines or without any
/// array column is returned unchanged. Idempotent on already-normalized
/// input: a value that already starts with a quote is left alone.
pub fn normalize_csv_text(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() <= 1 {
        return text.to_string();
    }

    let headers: Vec<String> = lines[0].split(',').map(|h| h.trim().to_string()).collect();
    let array_columns = array_column_indexes(&headers);
    if array_columns.is_empty() {
        return text.to_string();
    }

    let mut processed = Vec::with_capacity(lines.len());
    processed.push(lines[0].to_string());

    for line in &lines[1..] {
        if line.trim().is_empty() {
            processed.push(String::new());
            continue;
        }
        let mut fields = split_line(line);
        for &index in &array_columns {
            if let Some(value) = fields.get_mut(index)
                && value.contains(',')
                && !value.starts_with('"')
            {
                *value = format!("\"{value}\"");
            }
        }
        processed.push(fields.join(","));
    }

    processed.join("\n")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn split_line_respects_quotes() {
        let fields = split_line("a,\"b,c\",d");
        assert_eq!(fields, vec!["a", "\"b,c\"", "d"]);
    }

    #[test]
    fn split_line_keeps_trailing_empty_field() {
        assert_eq!(split_line("a,b,"), vec!["a", "b", ""]);
        assert_eq!(split_line(""), vec![""]);
    }

    #[test]
    fn detects_tag_and_list_columns() {
        let headers = vec![
            "name".to_string(),
            "Tags".to_string(),
            "list_stack".to_string(),
            "city".to_string(),
        ];
        assert_eq!(array_column_indexes(&headers), vec![1, 2]);
    }

    #[test]
    fn already_quoted_array_values_are_left_alone() {
        let input = "name,tags\nA,\"x,y\"\nB,z\n";
        assert_eq!(normalize_csv_text(input), input);
        let leading = "tags,city\n\"a,b\",Austin\nplain,Dallas";
        assert_eq!(normalize_csv_text(leading), leading);
    }

    #[test]
    fn wraps_array_field_with_interior_quoted_comma() {
        // The comma sits inside interior quotes, so the splitter keeps the
        // value as one field, but it does not start with a quote yet.
        let input = "name,tags\nA,x\"y,z\"";
        assert_eq!(normalize_csv_text(input), "name,tags\nA,\"x\"y,z\"\"");
    }

    #[test]
    fn returns_input_unchanged_without_array_columns() {
        let input = "name,city\nA,Austin\nB,Dallas";
        assert_eq!(normalize_csv_text(input), input);
    }

    #[test]
    fn empty_lines_pass_through() {
        let input = "name,tags\nA,x\n\nB,y";
        assert_eq!(normalize_csv_text(input), "name,tags\nA,x\n\nB,y");
    }

    proptest! {
        // Once every array value is quoted, a second pass must not change
        // anything.
        #[test]
        fn normalize_is_idempotent_on_quote_free_input(
            rows in prop::collection::vec(
                (r"[a-z]{0,6}", r"[a-z]{1,4}(,[a-z]{1,4}){0,3}"),
                0..8,
            )
        ) {
            let mut text = String::from("name,tags");
            for (name, tags) in &rows {
                text.push('\n');
                text.push_str(name);
                text.push(',');
                text.push_str(tags);
            }
            let once = normalize_csv_text(&text);
            let twice = normalize_csv_text(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
