//! Node and topic name rules
//!
//! Node names are bare identifiers. Topic names are slash-separated tokens;
//! a relative topic is resolved against the root namespace.

use crate::error::{CoreError, CoreResult};

fn is_token(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check a node name: non-empty, `[A-Za-z0-9_]`, not starting with a digit
pub fn validate_node_name(name: &str) -> CoreResult<()> {
    if name.is_empty() {
        return Err(CoreError::invalid_input("Node name must not be empty"));
    }
    if !is_token(name) {
        return Err(CoreError::invalid_input(format!(
            "Invalid node name '{}': use letters, digits and '_' and do not start with a digit",
            name
        )));
    }
    Ok(())
}

/// Resolve a topic name to its fully qualified form
///
/// `chatter` becomes `/chatter`; `/chatter` is kept. Every token between
/// slashes must be a valid identifier, so empty tokens and trailing slashes
/// are rejected.
pub fn resolve_topic_name(topic: &str) -> CoreResult<String> {
    let relative = topic.strip_prefix('/').unwrap_or(topic);
    if relative.is_empty() {
        return Err(CoreError::invalid_input("Topic name must not be empty"));
    }

    if let Some(bad) = relative.split('/').find(|token| !is_token(token)) {
        return Err(CoreError::invalid_input(format!(
            "Invalid topic name '{}': bad token '{}'",
            topic, bad
        )));
    }

    Ok(format!("/{}", relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_node_names() {
        assert!(validate_node_name("minimal_py_publisher").is_ok());
        assert!(validate_node_name("_hidden").is_ok());
        assert!(validate_node_name("node2").is_ok());
    }

    #[test]
    fn test_invalid_node_names() {
        assert!(validate_node_name("").is_err());
        assert!(validate_node_name("2fast").is_err());
        assert!(validate_node_name("has space").is_err());
        assert!(validate_node_name("ns/node").is_err());
    }

    #[test]
    fn test_relative_topic_gets_root_prefix() {
        assert_eq!(resolve_topic_name("py_example_topic").unwrap(), "/py_example_topic");
        assert_eq!(resolve_topic_name("/py_example_topic").unwrap(), "/py_example_topic");
        assert_eq!(resolve_topic_name("robot/cmd_vel").unwrap(), "/robot/cmd_vel");
    }

    #[test]
    fn test_invalid_topics() {
        assert!(resolve_topic_name("").is_err());
        assert!(resolve_topic_name("/").is_err());
        assert!(resolve_topic_name("a//b").is_err());
        assert!(resolve_topic_name("trailing/").is_err());
        assert!(resolve_topic_name("9lives").is_err());
    }
}
