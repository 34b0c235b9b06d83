// Tree-sitter node helpers shared by the Java extractor

use tree_sitter::Node;

/// Extract text from a node
pub fn node_text<'a>(node: Node<'a>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Find the first child of a specific kind
pub fn child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// Collect the named children of a node
pub fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

pub fn is_comment(node: Node) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment" | "comment")
}
