// Tests for output formatting
//
// These tests write through a shared in-memory buffer so the rendered text
// can be asserted on.

use super::*;
use chrono::Utc;
use serde_json::json;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn writer(format: OutputFormat) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let writer = OutputWriter::with_writer(format, false, false, Box::new(buffer.clone()));
    (writer, buffer)
}

fn test_result(success: bool) -> TestResult {
    let now = Utc::now();
    TestResult {
        id: "3f1c".to_string(),
        endpoint_id: "ep_chat".to_string(),
        endpoint_name: "chat".to_string(),
        input: json!({"prompt": "hi", "api_key": "sk-1234567890abcdef"}),
        output: if success {
            json!({"text": "hello", "usage": {"input_tokens": 12, "output_tokens": 3}})
        } else {
            Value::Null
        },
        success,
        error: if success {
            None
        } else {
            Some("quota exceeded".to_string())
        },
        started_at: now,
        completed_at: now,
        latency_ms: Some(120),
        input_tokens: success.then_some(12),
        output_tokens: success.then_some(3),
    }
}

#[test]
fn test_validation_result_human() {
    let (mut out, buffer) = writer(OutputFormat::Human);
    let result = ValidationResult::from_errors(vec![
        "root: missing required property \"prompt\"".to_string(),
        "root.temperature: value 3 is greater than maximum 2".to_string(),
    ]);
    out.validation_result(&result).unwrap();

    let text = buffer.contents();
    assert!(text.starts_with("❌ Validation Failed - 2 Error(s)"));
    assert!(text.contains("1. root: missing required property \"prompt\""));
    assert!(text.contains("2. root.temperature: value 3 is greater than maximum 2"));
}

#[test]
fn test_valid_result_human() {
    let (mut out, buffer) = writer(OutputFormat::Human);
    out.validation_result(&ValidationResult::valid()).unwrap();
    assert_eq!(buffer.contents(), "✅ Input is valid\n");
}

#[test]
fn test_validation_result_json() {
    let (mut out, buffer) = writer(OutputFormat::Json);
    out.validation_result(&ValidationResult::from_errors(vec!["root: expected object, got null".to_string()]))
        .unwrap();
    let parsed: Value = serde_json::from_str(buffer.contents().trim()).unwrap();
    assert_eq!(
        parsed,
        json!({"valid": false, "errors": ["root: expected object, got null"]})
    );
}

#[test]
fn test_passing_test_result_human() {
    let (mut out, buffer) = writer(OutputFormat::Human);
    out.test_result(&test_result(true)).unwrap();

    let text = buffer.contents();
    assert!(text.starts_with("✅ PASS chat (ep_chat)"));
    assert!(text.contains("Latency: 120ms"));
    assert!(text.contains("Tokens: 12 in / 3 out (15 total)"));
    assert!(text.contains("api_key: \"***\""));
    assert!(!text.contains("sk-1234567890abcdef"));
}

#[test]
fn test_failing_test_result_human() {
    let (mut out, buffer) = writer(OutputFormat::Human);
    out.test_result(&test_result(false)).unwrap();

    let text = buffer.contents();
    assert!(text.starts_with("❌ FAIL chat"));
    assert!(text.contains("Error: quota exceeded"));
    assert!(!text.contains("Tokens:"));
    assert!(!text.contains("Output:"));
}

#[test]
fn test_test_result_json_keeps_token_counts() {
    let (mut out, buffer) = writer(OutputFormat::Json);
    out.test_result(&test_result(true)).unwrap();

    let parsed: Value = serde_json::from_str(buffer.contents().trim()).unwrap();
    assert_eq!(parsed["output"]["usage"]["input_tokens"], 12);
    assert_eq!(parsed["input"]["api_key"], "***");
    assert_eq!(parsed["latency_ms"], 120);
}

#[test]
fn test_redaction_can_be_disabled() {
    let buffer = SharedBuffer::default();
    let mut out = OutputWriter::with_writer(OutputFormat::Json, false, false, Box::new(buffer.clone()))
        .with_redaction(false);
    out.data(&json!({"api_key": "sk-1234567890abcdef"})).unwrap();
    assert!(buffer.contents().contains("sk-1234567890abcdef"));
}

#[test]
fn test_summary_human() {
    let results = vec![test_result(true), test_result(false)];
    let summary = TestSummary::from_results(&results);

    let (mut out, buffer) = writer(OutputFormat::Human);
    out.summary(&summary).unwrap();

    let text = buffer.contents();
    assert!(text.contains("Total: 2"));
    assert!(text.contains("Pass Rate: 50.0%"));
    assert!(text.contains("Average Latency: 120.0ms"));
    assert!(text.contains("Tokens: 12 in / 3 out"));
}

#[test]
fn test_yaml_data_is_not_double_terminated() {
    let (mut out, buffer) = writer(OutputFormat::Yaml);
    out.data(&json!({"prompt": "sample string"})).unwrap();
    assert_eq!(buffer.contents(), "prompt: sample string\n");
}

#[test]
fn test_messages_are_suppressed_for_machine_formats() {
    let (mut out, buffer) = writer(OutputFormat::Json);
    out.info("loading").unwrap();
    out.success("done").unwrap();
    out.section("Summary").unwrap();
    assert!(buffer.contents().is_empty());
}

#[test]
fn test_compact_values() {
    assert_eq!(format_value_compact(&json!([1, 2, 3, 4])), "[4 items]");
    assert_eq!(format_value_compact(&json!({"a": "x"})), "{a: \"x\"}");
    assert_eq!(format_value_compact(&Value::Null), "null");
}
