use markslate_babel::format::Format;
use markslate_babel::formats::JsonFormat;
use markslate_babel::slate::Document;
use markslate_babel::{markdown_to_slate, slate_to_markdown, FormatError, ShortcodeRegistry};
use serde_json::json;

#[test]
fn document_json_shape() {
    let doc = markdown_to_slate("# Hi *there*\n\n---", &ShortcodeRegistry::new());
    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(
        value,
        json!({
            "object": "document",
            "nodes": [
                {
                    "object": "block",
                    "type": "heading-one",
                    "nodes": [{
                        "object": "text",
                        "leaves": [
                            {"text": "Hi ", "marks": []},
                            {"text": "there", "marks": ["italic"]}
                        ]
                    }]
                },
                {
                    "object": "block",
                    "type": "thematic-break",
                    "nodes": [{
                        "object": "text",
                        "leaves": [{"text": "", "marks": []}]
                    }]
                }
            ]
        })
    );
}

#[test]
fn list_data() {
    let doc = markdown_to_slate("3. a\n\n4. b", &ShortcodeRegistry::new());
    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(value["nodes"][0]["type"], "numbered-list");
    assert_eq!(value["nodes"][0]["data"], json!({"start": 3, "loose": true}));
    assert_eq!(value["nodes"][0]["nodes"][0]["type"], "list-item");
}

#[test]
fn editor_json_converts_to_markdown() {
    let source = r#"{
        "object": "document",
        "nodes": [
            {
                "object": "block",
                "type": "paragraph",
                "nodes": [
                    {"object": "text", "leaves": [{"text": "see "}]},
                    {
                        "object": "inline",
                        "type": "link",
                        "data": {"url": "https://example.com"},
                        "nodes": [{"object": "text", "leaves": [{"text": "docs", "marks": ["bold"]}]}]
                    }
                ]
            }
        ]
    }"#;
    let doc = JsonFormat
        .parse(source, &ShortcodeRegistry::new())
        .expect("valid document");
    assert_eq!(
        slate_to_markdown(&doc, &ShortcodeRegistry::new()),
        "see **[docs](https://example.com)**"
    );
}

#[test]
fn malformed_json_is_a_parse_error() {
    let result = Document::from_json(r#"{"object": "document", "nodes": [{"object": "blob"}]}"#);
    assert!(matches!(result, Err(FormatError::ParseError(_))));
}
