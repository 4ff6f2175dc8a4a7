//! Canned provider bodies and agent builders.

#![allow(dead_code)]

use docs_agent::kernel::{MockCompletion, MockFileSearch, TestDependencies};
use docs_agent::DocsAgent;
use serde_json::{json, Value};

/// A Responses API body whose message cites the given files.
pub fn annotated_response(text: &str, files: &[&str]) -> Value {
    let annotations: Vec<Value> = files
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "type": "file_citation",
                "file_id": format!("file-{}", i + 1),
                "filename": name,
                "index": i
            })
        })
        .collect();

    json!({
        "id": "resp_annotated",
        "output": [
            {"type": "file_search_call", "id": "fs_1", "status": "completed"},
            {
                "type": "message",
                "role": "assistant",
                "content": [{"type": "output_text", "text": text, "annotations": annotations}]
            }
        ]
    })
}

/// An older-generation body with citations under `tool_use_outputs`.
pub fn legacy_response(citations: &[(&str, &str)]) -> Value {
    let file_citations: Vec<Value> = citations
        .iter()
        .map(|(text, path)| json!({"text": text, "file_id": "file-legacy", "file_path": path}))
        .collect();

    json!({
        "id": "resp_legacy",
        "output": [],
        "tool_use_outputs": [{"type": "file_search", "file_citations": file_citations}]
    })
}

/// A body with output text but no citation at all.
pub fn plain_text_response(text: &str) -> Value {
    json!({
        "id": "resp_plain",
        "output": [{
            "type": "message",
            "content": [{"type": "output_text", "text": text, "annotations": []}]
        }]
    })
}

pub fn empty_response() -> Value {
    json!({"id": "resp_empty", "output": []})
}

/// Agent over the given mocks; keep `TestDependencies` to inspect calls.
pub fn agent_with(file_search: MockFileSearch, completion: MockCompletion) -> (DocsAgent, TestDependencies) {
    let test_deps = TestDependencies::new()
        .file_search(file_search)
        .completion(completion);
    let agent = DocsAgent::new(test_deps.deps());
    (agent, test_deps)
}

/// System prompt of the `n`th completion request.
pub fn system_prompt_of(test_deps: &TestDependencies, n: usize) -> String {
    test_deps.completion.calls()[n].messages[0].content.clone()
}
