//! Template resources (`template://<id>`).

use super::protocol::{MCPResource, ResourceContents};
use crate::workflow::TemplateKind;

const URI_SCHEME: &str = "template://";
const MIME_TYPE: &str = "text/markdown";

/// URI of a template resource.
pub fn resource_uri(kind: TemplateKind) -> String {
    format!("{URI_SCHEME}{}", kind.id())
}

/// All template resources, in listing order.
pub fn list_resources() -> Vec<MCPResource> {
    TemplateKind::ALL
        .into_iter()
        .map(|kind| MCPResource {
            uri: resource_uri(kind),
            name: kind.display_name().to_string(),
            description: Some(format!("{} template", kind.display_name())),
            mime_type: Some(MIME_TYPE.to_string()),
        })
        .collect()
}

/// Raw template text behind `uri`, or `None` for an unknown URI.
pub fn read_resource(uri: &str) -> Option<ResourceContents> {
    let kind = uri.strip_prefix(URI_SCHEME).and_then(TemplateKind::from_id)?;
    Some(ResourceContents {
        uri: uri.to_string(),
        mime_type: Some(MIME_TYPE.to_string()),
        text: kind.source().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_resources() {
        let uris: Vec<String> = list_resources().into_iter().map(|r| r.uri).collect();
        assert_eq!(
            uris,
            [
                "template://workflow",
                "template://cycles",
                "template://cycle-readme",
                "template://task",
                "template://pr"
            ]
        );
    }

    #[test]
    fn test_read_resource() {
        let contents = read_resource("template://task").unwrap();
        assert_eq!(contents.mime_type.as_deref(), Some("text/markdown"));
        assert!(contents.text.contains("{{TASK_TITLE}}"));

        assert!(read_resource("template://missing").is_none());
        assert!(read_resource("file:///etc/passwd").is_none());
    }
}
