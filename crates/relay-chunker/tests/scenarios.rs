// End-to-end behaviour of reply splitting as channel adapters see it.
// These pin the message boundaries users actually receive.

use relay_chunker::{extract_chunks, split_message, split_message_value, Chunk, Limits};

fn numbered(prefix: &str, n: usize) -> String {
    (1..=n)
        .map(|i| format!("{prefix} line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn one_paragraph_per_message() {
    let limits = Limits::default().with_max_paragraphs(1);
    let messages = split_message("Paragraph 1.\n\nParagraph 2.", &limits);
    assert_eq!(messages, vec!["Paragraph 1.", "Paragraph 2."]);
}

#[test]
fn two_fifteen_line_paragraphs_split_at_twenty_lines() {
    let first = numbered("a", 15);
    let second = numbered("b", 15);
    let text = format!("{first}\n\n{second}");

    let messages = split_message(&text, &Limits::default().with_max_lines(20));
    assert_eq!(messages, vec![first, second]);
}

#[test]
fn code_fence_becomes_its_own_message() {
    let text = "Start.\n\n```js\nconsole.log(\"hello\");\n```\n\nEnd.";
    let messages = split_message(text, &Limits::default().with_max_paragraphs(1));
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], "Start.");
    assert_eq!(messages[1], "```js\nconsole.log(\"hello\");\n```");
    assert_eq!(messages[2], "End.");
}

#[test]
fn everything_fits_in_one_message() {
    let text = "P1\n\n```\ncode\n```\n\nP2";
    let messages = split_message(text, &Limits::default().with_max_paragraphs(10));
    assert_eq!(messages, vec![text]);
}

#[test]
fn oversized_code_block_is_never_cut() {
    let body = numbered("code", 40);
    let fence = format!("```\n{body}\n```");
    let text = format!("Here you go:\n\n{fence}\n\nDone.");

    let messages = split_message(&text, &Limits::default());
    assert_eq!(messages, vec!["Here you go:".to_string(), fence, "Done.".to_string()]);
}

#[test]
fn unfenced_long_list_is_one_message() {
    let list = (1..=30).map(|i| format!("- item {i}")).collect::<Vec<_>>().join("\n");
    let messages = split_message(&list, &Limits::default());
    assert_eq!(messages, vec![list]);
}

#[test]
fn messages_reassemble_into_the_chunk_sequence() {
    let text = format!(
        "# Title\n\nIntro text.\r\n\r\n{}\n\n~~~sh\ncargo build\n~~~\n\n```rust\nlet x = 1;\n```\nTrailing words.\n\n\n{}",
        numbered("para", 12),
        numbered("end", 9),
    );
    let expected: Vec<String> = extract_chunks(&text)
        .iter()
        .map(|c| c.as_str().to_string())
        .collect();

    for limits in [Limits::new(1, 1), Limits::new(5, 2), Limits::default(), Limits::new(100, 100)] {
        let messages = split_message(&text, &limits);
        assert!(messages.iter().all(|m| !m.is_empty()), "{limits:?}");

        let rejoined: Vec<String> = messages
            .iter()
            .flat_map(|m| m.split("\n\n"))
            .map(str::to_string)
            .collect();
        assert_eq!(rejoined, expected, "{limits:?}");
    }
}

#[test]
fn every_message_respects_limits_unless_single_chunk() {
    let text = (0..12)
        .map(|i| numbered(&format!("p{i}"), (i % 5) + 1))
        .collect::<Vec<_>>()
        .join("\n\n");
    let limits = Limits::new(7, 3);

    for message in split_message(&text, &limits) {
        let chunks = extract_chunks(&message);
        let lines: usize = chunks.iter().map(Chunk::line_count).sum();
        if chunks.len() > 1 {
            assert!(lines <= limits.max_lines, "{message:?}");
            assert!(chunks.len() <= limits.max_paragraphs, "{message:?}");
        }
    }
}

#[test]
fn non_string_json_is_nothing_to_split() {
    let options = serde_json::json!({"maxLines": 3});
    assert!(split_message_value(&serde_json::Value::Null, &options).is_empty());
    assert!(split_message_value(&serde_json::json!(false), &options).is_empty());
    assert!(split_message_value(&serde_json::json!(""), &options).is_empty());
}
