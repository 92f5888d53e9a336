#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;
    use serde_json::{json, Value};

    use crate::forward::retry::{backoff_delay, truncate_body};
    use crate::forward::{build_batches, ForwardError};

    fn text_message(len: usize) -> Value {
        Value::String("a".repeat(len))
    }

    #[test]
    fn empty_input_yields_no_batches() {
        assert!(build_batches(vec![], 1024).is_empty());
    }

    #[test]
    fn strings_pass_through_and_values_are_serialized() {
        let messages = vec![json!("plain text"), json!({"severity": 3, "kind": "scan"})];

        let batches = build_batches(messages, 1024);
        assert_eq!(batches.len(), 1);
        assert_eq!(
            batches[0].messages(),
            ["plain text", r#"{"kind":"scan","severity":3}"#]
        );
        assert_eq!(
            batches[0].payload(),
            "plain text\n{\"kind\":\"scan\",\"severity\":3}"
        );
    }

    #[test]
    fn oversized_messages_are_dropped() {
        let messages = vec![text_message(4), text_message(100), text_message(4)];

        let batches = build_batches(messages, 16);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].messages(), ["aaaa", "aaaa"]);
    }

    #[test]
    fn all_oversized_yields_no_batches() {
        let messages = vec![text_message(20), text_message(30)];
        assert!(build_batches(messages, 16).is_empty());
    }

    #[test]
    fn order_is_preserved_across_batches() {
        let messages: Vec<Value> = (0..10).map(|i| json!(format!("message-{}", i))).collect();

        // "message-N" is 9 bytes, +1 separator each; three per batch
        let batches = build_batches(messages, 30);

        let flattened: Vec<&str> = batches
            .iter()
            .flat_map(|b| b.messages().iter().map(String::as_str))
            .collect();
        let expected: Vec<String> = (0..10).map(|i| format!("message-{}", i)).collect();
        assert_eq!(flattened, expected);

        for batch in &batches {
            assert!(batch.bytes() <= 30);
        }
    }

    #[rstest]
    #[case(100, 48, 1)] // (48 + 1) * 2 = 98 <= 100, combined
    #[case(100, 50, 2)] // (50 + 1) * 2 = 102 > 100, split
    #[case(100, 49, 1)] // (49 + 1) * 2 = 100, exactly at the ceiling
    fn separator_accounting_controls_the_split(
        #[case] max_batch_bytes: usize,
        #[case] message_len: usize,
        #[case] expected_batches: usize,
    ) {
        let messages = vec![text_message(message_len), text_message(message_len)];

        let batches = build_batches(messages, max_batch_bytes);
        assert_eq!(batches.len(), expected_batches);
        assert_eq!(batches.iter().map(|b| b.len()).sum::<usize>(), 2);
    }

    #[test]
    fn sizes_are_utf8_byte_lengths() {
        // U+00E9 is two bytes in UTF-8
        let messages = vec![json!("ééé")];

        let batches = build_batches(messages.clone(), 6);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].bytes(), 7);

        assert!(build_batches(messages, 5).is_empty());
    }

    #[test]
    fn backoff_delays_double_from_the_base() {
        let base = Duration::from_millis(500);

        assert_eq!(backoff_delay(base, 1), Duration::from_millis(500));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(1000));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(2000));
        assert_eq!(backoff_delay(base, 4), Duration::from_millis(4000));
    }

    #[test]
    fn error_bodies_are_truncated_to_1024_chars() {
        let short = "x".repeat(1024);
        assert_eq!(truncate_body(short.clone()), short);

        let long = "x".repeat(2000);
        let truncated = truncate_body(long);
        assert_eq!(truncated.len(), 1024 + 3);
        assert!(truncated.ends_with("..."));
    }

    #[rstest]
    #[case(500, true)]
    #[case(503, true)]
    #[case(400, false)]
    #[case(404, false)]
    #[case(429, false)]
    fn server_errors_classify_by_status(#[case] status: u16, #[case] retryable: bool) {
        let err = ForwardError::server_error(status, "boom".to_string());
        assert_eq!(err.is_retryable(), retryable);
    }

    #[test]
    fn timeout_is_retryable_with_fixed_message() {
        let err = ForwardError::Timeout;
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "Request timeout (30s)");
    }

    #[test]
    fn serialization_errors_are_terminal() {
        let json_err = serde_json::from_str::<Value>("not json").unwrap_err();
        let err = ForwardError::from(json_err);
        assert!(!err.is_retryable());
    }
}
